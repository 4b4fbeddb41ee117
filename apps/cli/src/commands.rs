//! CLI definition, tracing setup, and the draft command.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use blogdraft_core::pipeline::{DraftConfig, DraftProgress, DraftResult};
use blogdraft_llm::{ClientOptions, OpenAiClient};
use blogdraft_shared::{load_config, resolve_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// blogdraft: outline, expand, and assemble a blog post with an LLM.
#[derive(Parser)]
#[command(
    name = "blogdraft",
    version,
    about = "Generate a front-matter-tagged blog post draft with a chat-completion model.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Blog post title.
    #[arg(long)]
    pub title: String,

    /// Blog post topic.
    #[arg(long)]
    pub topic: String,

    /// Output file path (an existing directory gets `<title-slug>.md`).
    #[arg(long)]
    pub output: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogdraft=info",
        1 => "blogdraft=debug",
        _ => "blogdraft=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the draft command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;

    // Checked before the client exists, so a missing key never reaches the network
    let api_key = resolve_api_key(&config)?;
    let client = OpenAiClient::new(ClientOptions::from_config(&config.openai, api_key))?;

    let draft_config = DraftConfig {
        title: cli.title,
        topic: cli.topic,
        output: cli.output,
        model_id: config.openai.model.clone(),
        post: config.post.clone(),
    };

    info!(
        title = %draft_config.title,
        topic = %draft_config.topic,
        endpoint = %client.endpoint(),
        "drafting blog post"
    );

    let reporter = CliProgress::new();
    let result = match blogdraft_core::pipeline::draft_post(&draft_config, &client, &reporter).await
    {
        Ok(result) => result,
        Err(e) => {
            reporter.abandon();
            return Err(e.into());
        }
    };

    println!();
    println!("  Draft written!");
    println!("  Path:     {}", result.output.display());
    println!("  Sections: {}", result.section_count);
    println!("  Bytes:    {}", result.bytes);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn abandon(&self) {
        self.spinner.finish_and_clear();
    }
}

impl DraftProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn section_expanded(&self, section: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Expanded [{current}/{total}] {section}"));
    }

    fn done(&self, _result: &DraftResult) {
        self.spinner.finish_and_clear();
    }
}
