use serde::{Deserialize, Deserializer, Serialize};

/// Which input channels contributed to the aggregated text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityFlags {
    pub text: bool,
    pub image: bool,
    pub document: bool,
}

/// Product description exactly as the model returned it. No defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_intent: String,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical_constraints: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_outputs: Vec<String>,
}

/// Single-valued tag so rejections serialize as `"status": "rejected"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionStatus {
    Rejected,
}

/// Terminal outcome: no usable product description. Same shape whether the
/// model, the parser, or the validator produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub status: RejectionStatus,
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            status: RejectionStatus::Rejected,
            reason: reason.into(),
        }
    }
}

/// What the structured extractor hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Record(StructuredRecord),
    Rejected(Rejection),
}

/// A structured record after defaults and quality signals are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedRecord {
    pub product_intent: String,
    pub target_user: String,
    pub core_features: Vec<String>,
    pub technical_constraints: Vec<String>,
    pub expected_outputs: Vec<String>,
    pub input_sources: ModalityFlags,
    pub assumptions: Vec<String>,
    pub missing_information: Vec<String>,
    /// 0.0 – 1.0
    pub confidence_score: f64,
}

/// Acceptance body: the refined record flattened, plus its rendered prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedRefinement {
    #[serde(flatten)]
    pub record: RefinedRecord,
    pub refined_prompt: String,
}

/// Final pipeline result. Serializes to either the flattened record or
/// `{"status": "rejected", "reason": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RefineOutcome {
    Accepted(AcceptedRefinement),
    Rejected(Rejection),
}

impl RefineOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        RefineOutcome::Rejected(Rejection::new(reason))
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
