//! The `TextModel` trait -- the adapter interface for text-generation
//! backends.
//!
//! The concrete backend (Gemini, in `tasksmith-gemini`) implements this
//! trait. The trait is intentionally object-safe so it can be stored as
//! `Arc<dyn TextModel>` in server state and replaced with scripted mocks
//! in tests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::plan::prompt;

/// A fully-formed generation request: the user prompt, the fixed system
/// instruction, and the output-shape hint the remote service is asked to
/// conform to.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user-facing prompt, with the goal embedded.
    pub prompt: String,
    /// System instruction sent alongside the prompt.
    pub system_instruction: String,
    /// JSON schema descriptor for structured output.
    pub response_schema: Value,
}

impl GenerationRequest {
    /// Build the standard plan-generation request for a goal.
    pub fn for_goal(goal: &str) -> Self {
        Self {
            prompt: prompt::build_user_prompt(goal),
            system_instruction: prompt::SYSTEM_INSTRUCTION.to_string(),
            response_schema: prompt::response_schema(),
        }
    }
}

/// Failures a text-model call can produce.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, connect, timeout,
    /// body read).
    #[error("transport failure: {detail}")]
    Transport { detail: String },

    /// The service answered with a non-success HTTP status.
    #[error("upstream returned HTTP {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// The service answered 200 but the response carried no usable text
    /// (no candidates, empty parts, safety block).
    #[error("upstream returned no usable text")]
    EmptyResponse,

    /// The returned text was not valid JSON for the requested shape.
    #[error("model output is not valid task JSON: {0}")]
    MalformedOutput(String),
}

impl GenerationError {
    /// Whether a retry has a plausible chance of succeeding.
    ///
    /// Transport hiccups, rate limits, server errors, and malformed model
    /// output are all transient: the next attempt may behave differently.
    /// Other 4xx statuses (bad credential, malformed request) are terminal;
    /// retrying them only burns the backoff budget.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::EmptyResponse | Self::MalformedOutput(_) => true,
            Self::Upstream { status, .. } => {
                matches!(*status, 408 | 429) || *status >= 500
            }
        }
    }
}

/// Adapter interface for text-generation backends.
///
/// # Object Safety
///
/// This trait is object-safe: it can be stored as `Arc<dyn TextModel>`
/// and shared across request handlers.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run one generation call and return the raw text payload.
    ///
    /// Implementations must not retry internally; the retry loop in
    /// [`crate::plan::generate`] owns that policy.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

// Compile-time assertion: TextModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextModel) {}
};
