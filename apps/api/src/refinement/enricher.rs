//! Refinement Enricher — deterministic defaults and quality signals.
//!
//! Rules are ordered `(predicate, note)` pairs. Adding a default or a
//! missing-field check means adding one entry to the relevant table.

use crate::refinement::models::{ModalityFlags, RefinedRecord, StructuredRecord};

/// Sentinel stored in `target_user` when the model gave none.
pub const TARGET_USER_NOT_SPECIFIED: &str = "Not specified";

const MISSING_INFO_PENALTY: f64 = 0.3;
const NO_FEATURES_PENALTY: f64 = 0.3;

/// A single enrichment rule: when `applies` holds, `note` is recorded.
pub struct EnrichmentRule {
    pub applies: fn(&RefinedRecord) -> bool,
    pub note: &'static str,
}

/// Defaults substituted for absent fields.
pub const ASSUMPTION_RULES: &[EnrichmentRule] = &[EnrichmentRule {
    applies: target_user_defaulted,
    note: "Target user assumed as general users",
}];

/// Expected fields that are absent.
pub const MISSING_INFORMATION_RULES: &[EnrichmentRule] = &[EnrichmentRule {
    applies: expected_outputs_missing,
    note: "Expected outputs not specified",
}];

fn target_user_defaulted(record: &RefinedRecord) -> bool {
    record.target_user == TARGET_USER_NOT_SPECIFIED
}

fn expected_outputs_missing(record: &RefinedRecord) -> bool {
    record.expected_outputs.is_empty()
}

/// Applies defaults to `record` and computes assumptions, missing-information
/// notes and the confidence score. Never fails.
pub fn refine(record: StructuredRecord, flags: ModalityFlags) -> RefinedRecord {
    let target_user = record
        .target_user
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| TARGET_USER_NOT_SPECIFIED.to_string());

    let mut refined = RefinedRecord {
        product_intent: record.product_intent,
        target_user,
        core_features: record.core_features,
        technical_constraints: record.technical_constraints,
        expected_outputs: record.expected_outputs,
        input_sources: flags,
        assumptions: Vec::new(),
        missing_information: Vec::new(),
        confidence_score: 0.0,
    };

    refined.assumptions = collect_notes(ASSUMPTION_RULES, &refined);
    refined.missing_information = collect_notes(MISSING_INFORMATION_RULES, &refined);
    refined.confidence_score =
        confidence_score(!refined.missing_information.is_empty(), refined.core_features.is_empty());

    refined
}

fn collect_notes(rules: &[EnrichmentRule], record: &RefinedRecord) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(record))
        .map(|rule| rule.note.to_string())
        .collect()
}

/// 1.0 minus one fixed penalty per trigger, floored at 0.0.
/// Rounded to two decimals so 1.0 - 0.3 - 0.3 reads as 0.4.
pub fn confidence_score(has_missing_information: bool, has_no_features: bool) -> f64 {
    let mut score = 1.0;
    if has_missing_information {
        score -= MISSING_INFO_PENALTY;
    }
    if has_no_features {
        score -= NO_FEATURES_PENALTY;
    }
    (score.max(0.0_f64) * 100.0).round() / 100.0
}
