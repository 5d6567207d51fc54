// Refinement LLM prompt templates.
// All prompts for the refinement module are defined here.

/// Reason the model is told to use when nothing can be inferred.
pub const NO_PRODUCT_INTENT: &str = "No product intent";

pub const EXTRACTION_SYSTEM: &str = "\
You are an AI product analyst. \
Turn rough product ideas into a structured product specification. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

/// Structured extraction prompt. Replace `{input_text}` and `{noisy_input}` before sending.
pub const EXTRACTION_PROMPT: &str = r#"Infer the product the user wants built from the input below.

{noisy_input}

You must infer the intended product even if the text is noisy or incomplete.

USER INPUT:
{input_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "product_intent": "string",
  "target_user": "string",
  "core_features": ["string"],
  "technical_constraints": ["string"],
  "expected_outputs": ["string"]
}

RULES:
1. product_intent is one sentence naming what is being built.
2. Leave target_user empty if the input does not say who it is for.
3. List features, constraints and outputs in the order they appear in the input.
4. If no reasonable product intent can be inferred, return exactly:
   {"status": "rejected", "reason": "No product intent"}
5. Return ONLY the JSON object — nothing else, no code fences."#;
