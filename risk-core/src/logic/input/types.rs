//! Raw operator input

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::INPUT_FIELDS;
use crate::error::InputError;
use crate::logic::schema::{reconcile, FeatureSchema, ReconciledRecord, Value};

/// The five applicant attributes collected by the form
///
/// Built fresh for every "Predict" action and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RawInput {
    /// Loan duration in months
    #[validate(range(min = 6, max = 72))]
    pub duration: i64,

    #[validate(range(min = 250, max = 20000))]
    pub credit_amount: i64,

    #[validate(range(min = 18, max = 75))]
    pub age: i64,

    /// Installment rate as a percentage of disposable income (1-4)
    #[validate(range(min = 1, max = 4))]
    pub installment_rate: i64,

    #[validate(range(min = 1, max = 4))]
    pub existing_credits: i64,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            duration: INPUT_FIELDS[0].default,
            credit_amount: INPUT_FIELDS[1].default,
            age: INPUT_FIELDS[2].default,
            installment_rate: INPUT_FIELDS[3].default,
            existing_credits: INPUT_FIELDS[4].default,
        }
    }
}

impl RawInput {
    /// Reject values outside the slider domains
    pub fn checked(self) -> Result<Self, InputError> {
        self.validate()?;
        Ok(self)
    }

    /// Named fields, in form order
    pub fn fields(&self) -> [(&'static str, Value); 5] {
        [
            ("duration", Value::Int(self.duration)),
            ("credit_amount", Value::Int(self.credit_amount)),
            ("age", Value::Int(self.age)),
            ("installment_rate", Value::Int(self.installment_rate)),
            ("existing_credits", Value::Int(self.existing_credits)),
        ]
    }

    /// Pad this input out to the full preprocessor schema
    pub fn reconcile(&self, schema: &FeatureSchema) -> ReconciledRecord {
        reconcile(self.fields(), schema)
    }
}
