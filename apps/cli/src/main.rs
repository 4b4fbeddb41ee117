//! blogdraft CLI: draft a technical blog post with a chat-completion model.
//!
//! Generates an outline for a topic, expands every outline heading, and
//! writes the result as a front-matter-tagged Markdown file.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
