//! Markdown rendering for drafted posts.
//!
//! Splits model outlines into sections and renders the final document:
//! a YAML front-matter block followed by each section heading and its body.

mod sections;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use blogdraft_shared::{PostMeta, Section};

pub use sections::{HEADING_MARKER, extract_sections, is_heading_line};

/// Delimiter line around the front-matter block.
const FRONT_MATTER_DELIMITER: &str = "---";

// ---------------------------------------------------------------------------
// Document rendering
// ---------------------------------------------------------------------------

/// Render the YAML front-matter block, followed by the blank separator line.
///
/// Key order is fixed: `title`, `date`, `tags`, `excerpt`, `cover_image`, `series`.
pub fn render_front_matter(meta: &PostMeta) -> String {
    let tags = meta
        .tags
        .iter()
        .map(|t| format!("\"{}\"", escape_yaml_string(t)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut fm = String::new();
    fm.push_str(FRONT_MATTER_DELIMITER);
    fm.push('\n');
    fm.push_str(&format!("title: \"{}\"\n", escape_yaml_string(&meta.title)));
    fm.push_str(&format!("date: {}\n", meta.date.format("%Y-%m-%d")));
    fm.push_str(&format!("tags: [{tags}]\n"));
    fm.push_str(&format!("excerpt: \"{}\"\n", escape_yaml_string(&meta.excerpt)));
    fm.push_str(&format!(
        "cover_image: \"{}\"\n",
        escape_yaml_string(&meta.cover_image)
    ));
    fm.push_str(&format!("series: \"{}\"\n", escape_yaml_string(&meta.series)));
    fm.push_str(FRONT_MATTER_DELIMITER);
    fm.push_str("\n\n");
    fm
}

/// Render one section: heading, blank line, body, blank line.
pub fn render_section(section: &Section, content: &str) -> String {
    format!("{section}\n\n{content}\n\n")
}

/// Render a full document from front matter and expanded sections, in the given order.
#[instrument(skip_all, fields(title = %meta.title, sections = sections.len()))]
pub fn render_document(meta: &PostMeta, sections: &[(Section, String)]) -> String {
    let mut doc = render_front_matter(meta);
    for (section, content) in sections {
        doc.push_str(&render_section(section, content));
    }

    debug!(len = doc.len(), "document rendered");
    doc
}

/// Turn a title into a file-name-safe slug (`"Hello, ZIO!"` → `hello-zio`).
pub fn slugify(title: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let lower = title.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Escape special characters in a YAML double-quoted string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
