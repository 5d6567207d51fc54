//! Refinement pipeline — orchestrates one request end to end.
//!
//! Flow: aggregated input → structured extraction → (model rejection |
//!       enrichment → validation) → outcome.
//!
//! Every failure becomes a `Rejection` with the same boundary shape. There is
//! no partial success.

use tracing::{error, info};

use crate::llm_client::CompletionClient;
use crate::refinement::aggregator::AggregatedInput;
use crate::refinement::enricher::refine;
use crate::refinement::extractor::extract_structured;
use crate::refinement::models::{AcceptedRefinement, Extraction, RefineOutcome};
use crate::refinement::render::render_prompt;
use crate::refinement::validation::validate_refined;

pub const NO_INPUT_PROVIDED: &str = "No input provided";
pub const EXTRACTION_FAILED: &str = "Could not extract a product specification";

pub async fn run_refinement(input: &AggregatedInput, llm: &dyn CompletionClient) -> RefineOutcome {
    if input.text.trim().is_empty() {
        info!("Rejecting request with no usable input");
        return RefineOutcome::rejected(NO_INPUT_PROVIDED);
    }

    let record = match extract_structured(&input.text, llm).await {
        Ok(Extraction::Record(record)) => record,
        Ok(Extraction::Rejected(rejection)) => {
            info!("Model rejected input: {}", rejection.reason);
            return RefineOutcome::Rejected(rejection);
        }
        Err(e) => {
            error!("Structured extraction failed: {e}");
            return RefineOutcome::rejected(EXTRACTION_FAILED);
        }
    };

    let refined = refine(record, input.flags);

    let validation = validate_refined(&refined);
    if !validation.valid {
        info!("Refined record failed validation: {}", validation.reason);
        return RefineOutcome::rejected(validation.reason);
    }

    info!(
        confidence = refined.confidence_score,
        features = refined.core_features.len(),
        "Refinement accepted"
    );

    let refined_prompt = render_prompt(&refined);
    RefineOutcome::Accepted(AcceptedRefinement {
        record: refined,
        refined_prompt,
    })
}
