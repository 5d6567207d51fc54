//! PDF text-layer extraction.

use std::path::{Path, PathBuf};

use super::ContentError;

/// Extracts the embedded text layer of a PDF.
///
/// Scanned PDFs without a text layer come back empty; no OCR fallback.
pub async fn extract_pdf_text(path: &Path) -> Result<String, ContentError> {
    let path: PathBuf = path.to_path_buf();
    // pdf-extract is CPU-bound and synchronous
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&path).map_err(|e| e.to_string())
    })
    .await?
    .map_err(ContentError::Pdf)?;

    Ok(text.trim().to_string())
}
