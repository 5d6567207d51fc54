//! Content extraction — turns an uploaded file into best-effort plain text.
//!
//! Extraction quality is not guaranteed. OCR and document text may be noisy,
//! and the downstream prompt is written to tolerate that.

pub mod docx;
pub mod image;
pub mod pdf;
pub mod prompts;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),

    #[error("Image transcription failed: {0}")]
    Vision(#[from] LlmError),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Which input channel an uploaded file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Document,
}

/// File classification by filename suffix (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Carries the media type sent to the vision model.
    Image(&'static str),
    Pdf,
    Docx,
    Unsupported,
}

impl FileKind {
    pub fn modality(self) -> Option<Modality> {
        match self {
            FileKind::Image(_) => Some(Modality::Image),
            FileKind::Pdf | FileKind::Docx => Some(Modality::Document),
            FileKind::Unsupported => None,
        }
    }

    /// Suffix used for the scratch copy of the upload.
    pub fn suffix(self) -> &'static str {
        match self {
            FileKind::Image("image/png") => ".png",
            FileKind::Image(_) => ".jpg",
            FileKind::Pdf => ".pdf",
            FileKind::Docx => ".docx",
            FileKind::Unsupported => "",
        }
    }
}

/// Classifies an upload by its filename suffix, ignoring case.
///
/// Matches on the suffix rather than `Path::extension`, so a bare `.jpg`
/// still counts as an image.
pub fn classify(filename: &str) -> FileKind {
    let name = filename.to_ascii_lowercase();
    let has_suffix = |suffixes: &[&str]| suffixes.iter().any(|s| name.ends_with(s));

    if has_suffix(&[".png"]) {
        FileKind::Image("image/png")
    } else if has_suffix(&[".jpg", ".jpeg"]) {
        FileKind::Image("image/jpeg")
    } else if has_suffix(&[".pdf"]) {
        FileKind::Pdf
    } else if has_suffix(&[".docx"]) {
        FileKind::Docx
    } else {
        FileKind::Unsupported
    }
}

/// The content extraction capability. Implement this to swap OCR/document
/// backends without touching the handler.
///
/// Carried in `AppState` as `Arc<dyn ContentExtractor>`.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, kind: FileKind, path: &Path) -> Result<String, ContentError>;
}

/// Default extractor: vision transcription for images, `pdf-extract` for PDFs,
/// zip + XML scan for DOCX.
pub struct FileContentExtractor {
    llm: LlmClient,
}

impl FileContentExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentExtractor for FileContentExtractor {
    async fn extract(&self, kind: FileKind, path: &Path) -> Result<String, ContentError> {
        debug!("Extracting {:?} from {}", kind, path.display());
        match kind {
            FileKind::Image(media_type) => {
                image::extract_image_text(&self.llm, path, media_type).await
            }
            FileKind::Pdf => pdf::extract_pdf_text(path).await,
            FileKind::Docx => docx::extract_docx_text(path).await,
            FileKind::Unsupported => Ok(String::new()),
        }
    }
}

/// Writes the upload to a scratch file and runs extraction on it.
///
/// The scratch file is deleted when this returns. Extraction failures are
/// logged and yield empty text: the file still counts as its modality.
/// Only failing to store the upload is an error.
pub async fn extract_upload(
    extractor: &dyn ContentExtractor,
    kind: FileKind,
    bytes: &[u8],
    upload_dir: Option<&PathBuf>,
) -> Result<String, std::io::Error> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(kind.suffix());
    let scratch = match upload_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    tokio::fs::write(scratch.path(), bytes).await?;

    match extractor.extract(kind, scratch.path()).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Content extraction failed for {:?}: {e}", kind);
            Ok(String::new())
        }
    }
}
