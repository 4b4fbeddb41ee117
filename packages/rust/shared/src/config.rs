//! Application configuration for blogdraft.
//!
//! User config lives at `~/.blogdraft/blogdraft.toml` and is optional.
//! Every field has a default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogdraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogdraft";

/// Placeholder substituted with the topic in `excerpt_template`.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

// ---------------------------------------------------------------------------
// Config structs (matching blogdraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat-completion provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Fixed front-matter values stamped onto every post.
    #[serde(default)]
    pub post: PostDefaults,
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_timeout_secs() -> u64 {
    120
}

/// `[post]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDefaults {
    /// Tag list written to the `tags` key.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Path written to the `cover_image` key.
    #[serde(default = "default_cover_image")]
    pub cover_image: String,

    /// Series name written to the `series` key.
    #[serde(default = "default_series")]
    pub series: String,

    /// Excerpt sentence; `{topic}` is replaced with the post topic.
    #[serde(default = "default_excerpt_template")]
    pub excerpt_template: String,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            cover_image: default_cover_image(),
            series: default_series(),
            excerpt_template: default_excerpt_template(),
        }
    }
}

impl PostDefaults {
    /// Render the excerpt sentence for a topic.
    pub fn excerpt_for(&self, topic: &str) -> String {
        self.excerpt_template.replace(TOPIC_PLACEHOLDER, topic)
    }
}

fn default_tags() -> Vec<String> {
    vec![
        "scala".into(),
        "zio".into(),
        "functional-programming".into(),
    ]
}
fn default_cover_image() -> String {
    "/images/default-cover.jpg".into()
}
fn default_series() -> String {
    "99 Bottles of Scala".into()
}
fn default_excerpt_template() -> String {
    "An exploration of {topic} using Scala and ZIO".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogdraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| DraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogdraft/blogdraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DraftError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| DraftError::config(format!("failed to parse {}: {e}", path.display())))?;

    tracing::debug!(?path, model = %config.openai.model, "loaded config file");
    Ok(config)
}

/// Read the API key from the configured env var.
///
/// A missing or empty variable is a [`DraftError::Config`]; callers must check
/// this before any remote call is attempted.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.openai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(DraftError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}
