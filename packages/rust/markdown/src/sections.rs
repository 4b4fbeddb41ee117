//! Heading detection and section extraction for model-generated outlines.

use blogdraft_shared::{Outline, Section};

/// Character that marks a Markdown ATX heading.
pub const HEADING_MARKER: char = '#';

/// Whether a single outline line is a heading.
///
/// Rule: after trimming surrounding whitespace the line starts with `#`.
/// Any heading depth counts and no space is required after the marker, so
/// `#Intro`, `  ## Setup` and `###` are all headings, while `- # item` and
/// `1. Intro` are not.
pub fn is_heading_line(line: &str) -> bool {
    line.trim().starts_with(HEADING_MARKER)
}

/// Extract the heading lines of an outline, trimmed, in outline order.
///
/// Duplicates are kept. Pure: the same outline always yields the same sections.
pub fn extract_sections(outline: &Outline) -> Vec<Section> {
    outline
        .as_str()
        .lines()
        .filter(|line| is_heading_line(line))
        .map(|line| Section::new(line.trim()))
        .collect()
}
