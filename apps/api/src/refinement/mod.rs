// Refinement pipeline: turns a rough product idea into a structured,
// validated product specification.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod aggregator;
pub mod enricher;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod validation;
