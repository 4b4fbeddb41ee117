//! End-to-end `draft` pipeline: topic → outline → sections → post file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use blogdraft_llm::ChatModel;
use blogdraft_shared::{DraftError, PostDefaults, Result};

use crate::assembler::{AssemblyProgress, ContentAssembler};

/// File name used when the title slugifies to nothing.
const FALLBACK_FILE_STEM: &str = "post";

/// Configuration for the `draft_post` pipeline.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Post title, written verbatim to the front matter.
    pub title: String,
    /// Subject the model writes about.
    pub topic: String,
    /// Output file, or an existing directory to place `<slug>.md` in.
    pub output: PathBuf,
    /// Model identifier sent with every request.
    pub model_id: String,
    /// Fixed front-matter values.
    pub post: PostDefaults,
}

/// Result of the `draft_post` pipeline.
#[derive(Debug)]
pub struct DraftResult {
    /// Where the post was written.
    pub output: PathBuf,
    /// Number of sections expanded.
    pub section_count: usize,
    /// Size of the written file.
    pub bytes: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait DraftProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each section is expanded.
    fn section_expanded(&self, section: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &DraftResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl DraftProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn section_expanded(&self, _section: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &DraftResult) {}
}

/// Run the full `draft` pipeline.
///
/// 1. Generate the outline
/// 2. Expand each section
/// 3. Write the document
///
/// Nothing touches the filesystem until every remote call has succeeded.
#[instrument(skip_all, fields(title = %config.title, topic = %config.topic))]
pub async fn draft_post(
    config: &DraftConfig,
    model: &dyn ChatModel,
    progress: &dyn DraftProgress,
) -> Result<DraftResult> {
    let start = Instant::now();
    let output = resolve_output_path(&config.output, &config.title);

    info!(output = %output.display(), model = %config.model_id, "starting draft pipeline");

    let assembler = ContentAssembler::new(model, &config.model_id, config.post.clone());
    let adapter = PipelineAssemblyProgress { inner: progress };
    let today = chrono::Local::now().date_naive();
    let post = assembler
        .assemble_on(&config.title, &config.topic, today, &adapter)
        .await?;

    progress.phase("Writing post");
    write_atomic(&output, &post.markdown)?;

    let result = DraftResult {
        output,
        section_count: post.sections.len(),
        bytes: post.markdown.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        output = %result.output.display(),
        sections = result.section_count,
        bytes = result.bytes,
        elapsed_ms = result.elapsed.as_millis(),
        "draft pipeline complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Assembly progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `DraftProgress` to the `AssemblyProgress` interface.
struct PipelineAssemblyProgress<'a> {
    inner: &'a dyn DraftProgress,
}

impl AssemblyProgress for PipelineAssemblyProgress<'_> {
    fn phase(&self, name: &str) {
        self.inner.phase(name);
    }

    fn section_expanded(&self, section: &str, current: usize, total: usize) {
        self.inner.section_expanded(section, current, total);
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// An existing directory gets `<slug>.md` appended; anything else is used as-is.
pub fn resolve_output_path(output: &Path, title: &str) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }

    let slug = blogdraft_markdown::slugify(title);
    let stem = if slug.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        slug.as_str()
    };
    output.join(format!("{stem}.md"))
}

/// Write `content` to `path` via a sibling temp file and rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| DraftError::validation(format!("output path has no file name: {}", path.display())))?
        .to_string_lossy()
        .to_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| DraftError::io(parent, e))?;
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let temp = dir.join(format!(".{file_name}.tmp"));
    std::fs::write(&temp, content).map_err(|e| DraftError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DraftError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote post");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
