use serde::{Deserialize, Serialize};

use crate::refinement::models::RefinedRecord;

pub const MISSING_PRODUCT_INTENT: &str = "Missing product intent";
pub const NO_FEATURES_SPECIFIED: &str = "No features specified";
pub const VALID: &str = "Valid";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
}

impl ValidationResult {
    fn pass() -> Self {
        Self {
            valid: true,
            reason: VALID.to_string(),
        }
    }

    fn fail(reason: &str) -> Self {
        Self {
            valid: false,
            reason: reason.to_string(),
        }
    }
}

/// Acceptance rules, checked in order; the first failure wins.
///
/// Only intent and features gate acceptance. Empty target user, constraints
/// or outputs lower confidence instead.
pub fn validate_refined(record: &RefinedRecord) -> ValidationResult {
    if record.product_intent.trim().is_empty() {
        return ValidationResult::fail(MISSING_PRODUCT_INTENT);
    }
    if record.core_features.is_empty() {
        return ValidationResult::fail(NO_FEATURES_SPECIFIED);
    }
    ValidationResult::pass()
}
