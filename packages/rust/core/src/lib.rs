//! Core pipeline orchestration for blogdraft.
//!
//! Ties the chat model, section extraction, and front-matter rendering into
//! end-to-end workflows (e.g., `draft_post`).

pub mod assembler;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
mod testing;
