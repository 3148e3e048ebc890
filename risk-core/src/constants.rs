//! Central Configuration Constants
//!
//! Single source of truth for business policy and artifact defaults.
//! Values here reproduce the production scoring behaviour bit-for-bit;
//! change them only together with the credit policy they encode.

// ============================================
// Schema reconciliation
// ============================================

/// Placeholder written into every schema column the operator did not supply
pub const SENTINEL: &str = "unknown";

// ============================================
// Decision policy
// ============================================

/// Probability above which an application is rejected
pub const DEFAULT_THRESHOLD_HIGH: f64 = 0.60;

/// Probability above which an application goes to manual review
pub const DEFAULT_THRESHOLD_MEDIUM: f64 = 0.35;

/// Column of `predict_proba` holding the "default" class
///
/// Assumes a binary classifier trained with labels `[0, 1]` where 1 = default.
pub const POSITIVE_CLASS_INDEX: usize = 1;

// ============================================
// Explanation
// ============================================

/// Rows shown in the waterfall before the tail is folded together
pub const DEFAULT_MAX_DISPLAY: usize = 10;

/// Tolerance for `baseline + sum(values) == margin`
pub const ADDITIVITY_TOLERANCE: f64 = 1e-6;

// ============================================
// Artifact files
// ============================================

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

pub const PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const TREE_MODEL_FILE: &str = "model.json";
pub const ONNX_MODEL_FILE: &str = "model.onnx";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

// ============================================
// Input bounds (slider domains)
// ============================================

/// One bounded operator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

/// Operator inputs, in form order
///
/// Keep in sync with the `#[validate(range)]` rules on `RawInput`.
pub const INPUT_FIELDS: [InputField; 5] = [
    InputField { name: "duration", label: "Loan Duration (months)", min: 6, max: 72, default: 24 },
    InputField { name: "credit_amount", label: "Credit Amount", min: 250, max: 20000, default: 5000 },
    InputField { name: "age", label: "Age", min: 18, max: 75, default: 35 },
    InputField { name: "installment_rate", label: "Installment Rate (%)", min: 1, max: 4, default: 2 },
    InputField { name: "existing_credits", label: "Existing Credits", min: 1, max: 4, default: 1 },
];

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
