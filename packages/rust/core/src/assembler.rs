//! Blog post assembler.
//!
//! Asks the chat model for an outline, expands each outline heading into
//! prose, and stitches the results under a front-matter block.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

use blogdraft_llm::{ChatModel, ChatRequest};
use blogdraft_shared::{Outline, PostDefaults, PostMeta, Result, Section};

use crate::prompts;

/// Output of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembledPost {
    /// The complete document: front matter followed by every section.
    pub markdown: String,
    /// Front-matter values that were rendered.
    pub meta: PostMeta,
    /// Sections in the order they appear in the document.
    pub sections: Vec<Section>,
}

/// Drives the remote model through outline → sections → document.
///
/// Holds no mutable state; every call issues fresh requests.
pub struct ContentAssembler<'a> {
    model: &'a dyn ChatModel,
    model_id: String,
    post: PostDefaults,
}

impl<'a> ContentAssembler<'a> {
    pub fn new(model: &'a dyn ChatModel, model_id: impl Into<String>, post: PostDefaults) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            post,
        }
    }

    /// Request an outline for `topic`. The response is returned verbatim.
    #[instrument(skip(self))]
    pub async fn generate_outline(&self, topic: &str) -> Result<Outline> {
        let request = ChatRequest::new(
            &self.model_id,
            prompts::OUTLINE_SYSTEM,
            prompts::outline_user(topic),
        );
        let text = self.model.complete(&request).await?;
        debug!(len = text.len(), "outline received");
        Ok(Outline::new(text))
    }

    /// Heading lines of the outline, in order. See [`blogdraft_markdown::is_heading_line`].
    pub fn extract_sections(&self, outline: &Outline) -> Vec<Section> {
        blogdraft_markdown::extract_sections(outline)
    }

    /// Request prose for one section. Repeated sections are requested again.
    #[instrument(skip_all, fields(section = %section))]
    pub async fn expand_section(&self, outline: &Outline, section: &Section) -> Result<String> {
        let request = ChatRequest::new(
            &self.model_id,
            prompts::SECTION_SYSTEM,
            prompts::section_user(outline.as_str(), section.as_str()),
        );
        self.model.complete(&request).await
    }

    /// Request a standalone code sample. Not part of [`Self::assemble`].
    #[instrument(skip(self))]
    pub async fn generate_code_sample(&self, description: &str) -> Result<String> {
        let request = ChatRequest::new(
            &self.model_id,
            prompts::CODE_SAMPLE_SYSTEM,
            prompts::code_sample_user(description),
        );
        self.model.complete(&request).await
    }

    /// Assemble a full post dated today (local time).
    pub async fn assemble(&self, title: &str, topic: &str) -> Result<AssembledPost> {
        let today = Local::now().date_naive();
        self.assemble_on(title, topic, today, &SilentAssemblyProgress)
            .await
    }

    /// Assemble a full post with an explicit date.
    ///
    /// Sections are expanded one at a time in outline order. The first failed
    /// request aborts the whole assembly.
    #[instrument(skip_all, fields(title = %title, topic = %topic))]
    pub async fn assemble_on(
        &self,
        title: &str,
        topic: &str,
        date: NaiveDate,
        progress: &dyn AssemblyProgress,
    ) -> Result<AssembledPost> {
        progress.phase("Generating outline");
        let outline = self.generate_outline(topic).await?;

        let sections = self.extract_sections(&outline);
        if sections.is_empty() {
            warn!("outline contains no headings; document will hold front matter only");
        }
        info!(sections = sections.len(), "outline parsed");

        progress.phase("Expanding sections");
        let total = sections.len();
        let mut expanded = Vec::with_capacity(total);
        for (i, section) in sections.iter().enumerate() {
            let content = self.expand_section(&outline, section).await?;
            progress.section_expanded(section.as_str(), i + 1, total);
            expanded.push((section.clone(), content));
        }

        let meta = PostMeta::new(title, topic, date, &self.post);
        let markdown = blogdraft_markdown::render_document(&meta, &expanded);

        info!(len = markdown.len(), "post assembled");

        Ok(AssembledPost {
            markdown,
            meta,
            sections,
        })
    }
}

// ---------------------------------------------------------------------------
// Progress trait
// ---------------------------------------------------------------------------

/// Progress callback for assembly.
pub trait AssemblyProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each section's content arrives.
    fn section_expanded(&self, section: &str, current: usize, total: usize);
}

/// No-op assembly progress.
pub struct SilentAssemblyProgress;

impl AssemblyProgress for SilentAssemblyProgress {
    fn phase(&self, _name: &str) {}
    fn section_expanded(&self, _section: &str, _current: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
