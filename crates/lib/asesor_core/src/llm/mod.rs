//! Chat completion provider.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (Groq by
//! default). One request per call; failures are returned to the caller, who
//! decides how to apologize.

pub mod client;
pub mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::CompletionClient;
pub use config::LlmConfig;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured for the completion provider")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion provider answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Completion provider returned an empty reply")]
    EmptyReply,
}

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
