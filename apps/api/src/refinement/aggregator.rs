//! Input Aggregator — merges manual text and extracted file text into one blob
//! and records which modalities contributed.

use crate::content::Modality;
use crate::refinement::models::ModalityFlags;

/// Merged input ready for structured extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedInput {
    pub text: String,
    pub flags: ModalityFlags,
}

/// Combines `manual_text` and `extracted_text`.
///
/// Manual text comes first. The two segments are joined by a newline so the
/// last word of one never fuses with the first word of the other.
///
/// `file_modality` is the classification of the upload, if any. Its flag is
/// set whenever the file was handed to extraction, even if extraction
/// produced no text.
pub fn aggregate(
    manual_text: &str,
    extracted_text: &str,
    file_modality: Option<Modality>,
) -> AggregatedInput {
    let has_text = !manual_text.trim().is_empty();
    let has_extracted = !extracted_text.trim().is_empty();

    let text = match (has_text, has_extracted) {
        (true, true) => format!("{manual_text}\n{extracted_text}"),
        (true, false) => manual_text.to_string(),
        (false, true) => extracted_text.to_string(),
        (false, false) => String::new(),
    };

    AggregatedInput {
        text,
        flags: ModalityFlags {
            text: has_text,
            image: file_modality == Some(Modality::Image),
            document: file_modality == Some(Modality::Document),
        },
    }
}
