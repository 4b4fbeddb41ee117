//! Chat-completion client for blogdraft.
//!
//! The remote model is reached through the [`ChatModel`] trait so the
//! assembler never depends on a concrete provider. [`OpenAiClient`] is the
//! production implementation for OpenAI-compatible `/chat/completions` APIs.

mod openai;

use async_trait::async_trait;

use blogdraft_shared::Result;

pub use openai::{ClientOptions, OpenAiClient};

/// A single-turn chat request: one system message and one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Model identifier (e.g. `gpt-4`).
    pub model: String,
    /// System role content.
    pub system: String,
    /// User role content.
    pub user: String,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
        }
    }
}

/// A remote model that turns a chat request into one text completion.
///
/// Implementations return the completion text verbatim and map every failure
/// to [`blogdraft_shared::DraftError::RemoteService`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
