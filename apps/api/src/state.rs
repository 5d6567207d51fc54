use std::sync::Arc;

use crate::config::Config;
use crate::content::ContentExtractor;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    /// Completion capability used for structured extraction.
    pub llm: Arc<dyn CompletionClient>,
    /// Pluggable file-to-text extractor. Default: FileContentExtractor.
    pub extractor: Arc<dyn ContentExtractor>,
    pub config: Config,
}
