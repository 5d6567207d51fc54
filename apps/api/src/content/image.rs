//! Image transcription via the vision-capable LLM.

use std::path::Path;

use base64::Engine as _;

use super::prompts::{IMAGE_OCR_PROMPT, IMAGE_OCR_SYSTEM};
use super::ContentError;
use crate::llm_client::LlmClient;

/// Reads an image from `path` and returns the text visible in it.
///
/// An image with no text yields an empty string, not an error.
pub async fn extract_image_text(
    llm: &LlmClient,
    path: &Path,
    media_type: &str,
) -> Result<String, ContentError> {
    let bytes = tokio::fs::read(path).await?;
    let encoded = encode_image(&bytes);

    let response = llm
        .call_with_image(IMAGE_OCR_PROMPT, IMAGE_OCR_SYSTEM, media_type, &encoded)
        .await?;

    Ok(response.text().unwrap_or_default().trim().to_string())
}

fn encode_image(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
