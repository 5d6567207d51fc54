//! Renders an accepted record as a copy-pasteable prompt for any AI assistant.

use std::fmt::Write;

use crate::refinement::models::RefinedRecord;

pub fn render_prompt(record: &RefinedRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Product: {}", record.product_intent);
    let _ = writeln!(out, "Target Users: {}", record.target_user);
    push_section(&mut out, "Features", &record.core_features);
    push_section(&mut out, "Constraints", &record.technical_constraints);
    push_section(&mut out, "Expected Outputs", &record.expected_outputs);
    out.trim_end().to_string()
}

fn push_section(out: &mut String, title: &str, items: &[String]) {
    let _ = write!(out, "\n{title}:\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
