//! Core domain types for blog post drafting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PostDefaults;

// ---------------------------------------------------------------------------
// Outline / Section
// ---------------------------------------------------------------------------

/// Raw heading-structured text returned by the model for a topic.
///
/// Kept verbatim; sections are derived from it, never edited into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline(String);

impl Outline {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One heading line of an [`Outline`], trimmed, marker included (e.g. `## Setup`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(String);

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self(heading.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PostMeta
// ---------------------------------------------------------------------------

/// Values rendered into a post's front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    /// Rendered as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub cover_image: String,
    pub series: String,
}

impl PostMeta {
    /// Build front-matter values for a post from the configured defaults.
    pub fn new(title: &str, topic: &str, date: NaiveDate, defaults: &PostDefaults) -> Self {
        Self {
            title: title.to_string(),
            date,
            tags: defaults.tags.clone(),
            excerpt: defaults.excerpt_for(topic),
            cover_image: defaults.cover_image.clone(),
            series: defaults.series.clone(),
        }
    }
}
