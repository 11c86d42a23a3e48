//! Free-text protocol parsing.
//!
//! The pipeline classifies lines, groups them into day buckets, and then runs
//! each extractor over the same line sequence. Extractors never read each
//! other's output, so their order does not matter.

use tracing::debug;

use crate::model::ProtocolFormData;

mod classify;
mod days;
mod lines;
mod measurements;
mod sections;
mod steps;
#[cfg(test)]
mod tests;

pub use classify::{category_scores, classify_category, generate_tags};
pub use days::{DayBucket, DayHeader, group_by_day, parse_day_header};
pub use lines::{ClassifiedLine, LineKind, SectionKind, classify_line, classify_lines};
pub use measurements::extract_measurements;
pub use sections::{
    extract_date, extract_description, extract_estimated_time, extract_experiment_id,
    extract_materials, extract_named_sections, extract_researcher, extract_safety_notes,
    extract_title,
};
pub use steps::{derive_title, extract_duration, extract_steps, is_critical, order_steps};

/// Parses a pasted protocol into form data. Never fails on content.
pub fn parse(raw_text: &str) -> ProtocolFormData {
    let lines = classify_lines(raw_text);
    let full_text = lines
        .iter()
        .map(|line| line.text)
        .collect::<Vec<&str>>()
        .join("\n");
    let mut warnings = Vec::<String>::new();

    let buckets = group_by_day(&lines);
    if !lines.is_empty() && buckets.iter().all(|bucket| !bucket.explicit) {
        warnings.push("no day headers found; all steps assigned to Day 0".to_string());
    }
    debug!(
        lines = lines.len(),
        buckets = buckets.len(),
        bucketed_lines = buckets.iter().map(DayBucket::line_count).sum::<usize>(),
        "grouped protocol lines by day"
    );

    let mut steps = order_steps(extract_steps(&buckets));
    if steps.is_empty() {
        debug!("no steps extracted; using placeholder step");
        warnings.push("no steps detected; added a placeholder step".to_string());
        steps.push(steps::placeholder_step());
    }

    let materials = extract_materials(&lines);
    if materials.iter().all(String::is_empty) {
        warnings.push("no materials section found".to_string());
    }

    ProtocolFormData {
        title: extract_title(&lines),
        description: extract_description(&lines),
        category: classify_category(&full_text),
        tags: generate_tags(&full_text),
        materials,
        safety_notes: extract_safety_notes(&lines),
        estimated_time: extract_estimated_time(&lines),
        steps,
        measurements: extract_measurements(&full_text),
        experiment_id: extract_experiment_id(&lines),
        date: extract_date(&lines),
        researcher: extract_researcher(&lines),
        sections: extract_named_sections(&lines),
        warnings,
    }
}
