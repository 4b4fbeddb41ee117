//! Shared types, error model, and configuration for blogdraft.
//!
//! This crate is the foundation depended on by all other blogdraft crates.
//! It provides:
//! - [`DraftError`]: the unified error type
//! - Domain types ([`Outline`], [`Section`], [`PostMeta`])
//! - Configuration ([`AppConfig`], [`OpenAiConfig`], [`PostDefaults`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, OpenAiConfig, PostDefaults, TOPIC_PLACEHOLDER, config_dir, config_file_path,
    load_config, load_config_from, resolve_api_key,
};
pub use error::{DraftError, Result};
pub use types::{Outline, PostMeta, Section};
