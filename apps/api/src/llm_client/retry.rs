//! Retry policy around remote model calls.
//!
//! `RetryPolicy` is a pure function of the attempt number. `generate_with_retry`
//! applies it and reports progress through a `Notices` sink, so nothing here
//! knows how warnings get displayed.
//!
//! Remote failures never reach the caller as errors: they degrade into
//! [`UNAVAILABLE_PLACEHOLDER`] or [`ERROR_SENTINEL`], which the interview then
//! treats as ordinary interviewer text.

use std::time::Duration;

use tracing::debug;

use crate::llm_client::{ChatMessage, LlmError, TextGenerator};
use crate::notice::Notices;

/// Returned when every attempt hit a quota limit or came back empty.
pub const UNAVAILABLE_PLACEHOLDER: &str = "Interviewer unavailable. Please try later.";
/// Returned immediately on any failure other than a quota limit.
pub const ERROR_SENTINEL: &str = "Error occurred.";

/// Bounded linear backoff: attempt `n` (0-based) waits `base_delay * (n + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

/// A prompt, optionally sent along with prior conversation turns.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub history: Option<&'a [ChatMessage]>,
}

impl<'a> GenerationRequest<'a> {
    pub fn prompt(prompt: &'a str) -> Self {
        Self {
            prompt,
            history: None,
        }
    }

    /// Empty history is sent as a plain prompt.
    pub fn with_history(prompt: &'a str, history: &'a [ChatMessage]) -> Self {
        Self {
            prompt,
            history: (!history.is_empty()).then_some(history),
        }
    }
}

pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    policy: &RetryPolicy,
    request: GenerationRequest<'_>,
    notices: &mut Notices,
) -> String {
    for attempt in 0..policy.max_attempts {
        let result = match request.history {
            Some(history) => {
                generator
                    .generate_with_history(request.prompt, history)
                    .await
            }
            None => generator.generate(request.prompt).await,
        };

        match result {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Remote model replied on attempt {}", attempt + 1);
                return text;
            }
            Ok(_) => notices.error("Empty response from API."),
            Err(e) if e.is_rate_limited() => {
                let wait = policy.delay_for(attempt);
                notices.warning(format!(
                    "Rate limit hit. Retrying in {} seconds...",
                    wait.as_secs()
                ));
                tokio::time::sleep(wait).await;
            }
            Err(LlmError::EmptyContent) => notices.error("Empty response from API."),
            Err(e) => {
                notices.error(format!("Unexpected error: {e}"));
                return ERROR_SENTINEL.to_string();
            }
        }
    }

    UNAVAILABLE_PLACEHOLDER.to_string()
}
