//! Input Collector - bounded operator fields
//!
//! The five sliders of the scoring form. Bounds live in
//! `constants::INPUT_FIELDS` and are enforced by `validator`.

pub mod types;

pub use types::RawInput;
