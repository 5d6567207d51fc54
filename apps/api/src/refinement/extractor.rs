//! Structured Extractor — asks the model for the product schema and parses
//! its reply into a `StructuredRecord` or a model-issued `Rejection`.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::NOISY_INPUT_INSTRUCTION;
use crate::llm_client::{CompletionClient, LlmError};
use crate::refinement::models::{Extraction, Rejection, StructuredRecord};
use crate::refinement::prompts::{EXTRACTION_PROMPT, EXTRACTION_SYSTEM, NO_PRODUCT_INTENT};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion call failed: {0}")]
    Completion(#[from] LlmError),

    #[error("model output contains no JSON object")]
    NoJsonObject,

    #[error("model output is not a valid product record: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn build_extraction_prompt(input_text: &str) -> String {
    EXTRACTION_PROMPT
        .replace("{noisy_input}", NOISY_INPUT_INSTRUCTION)
        .replace("{input_text}", input_text)
}

/// Runs one completion call and parses the reply.
pub async fn extract_structured(
    input_text: &str,
    llm: &dyn CompletionClient,
) -> Result<Extraction, ExtractionError> {
    let prompt = build_extraction_prompt(input_text);
    let raw = llm.complete(EXTRACTION_SYSTEM, &prompt).await?;
    debug!("Model output: {} chars", raw.len());
    parse_model_output(&raw)
}

/// Tolerant parse of model output.
///
/// The model may wrap its JSON in prose or code fences, so the payload is
/// taken to be everything from the first `{` to the last `}` inclusive.
/// Fields are returned exactly as parsed; defaults are applied later.
pub fn parse_model_output(raw: &str) -> Result<Extraction, ExtractionError> {
    let payload = locate_json_object(raw).ok_or(ExtractionError::NoJsonObject)?;
    let value: Value = serde_json::from_str(payload)?;

    if value.get("status").and_then(Value::as_str) == Some("rejected") {
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or(NO_PRODUCT_INTENT);
        return Ok(Extraction::Rejected(Rejection::new(reason)));
    }

    let record: StructuredRecord = serde_json::from_value(value)?;
    Ok(Extraction::Record(record))
}

fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
