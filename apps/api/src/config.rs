use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interview::scoring::InterviewLimits;
use crate::llm_client::retry::RetryPolicy;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Display name the interviewer introduces itself with.
    pub interviewer_name: String,
    pub operator_username: String,
    pub operator_password: String,
    /// Request body cap for the start form, resume upload included.
    pub max_upload_bytes: usize,
    pub retry_policy: RetryPolicy,
    pub limits: InterviewLimits,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = InterviewLimits::default();

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            interviewer_name: std::env::var("INTERVIEWER_NAME")
                .unwrap_or_else(|_| "Alex".to_string()),
            operator_username: std::env::var("OPERATOR_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            operator_password: std::env::var("OPERATOR_PASSWORD")
                .unwrap_or_else(|_| "hr123".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            retry_policy: RetryPolicy {
                max_attempts: parse_env("LLM_MAX_ATTEMPTS", 3)?,
                base_delay: Duration::from_secs(parse_env("LLM_RETRY_BASE_DELAY_SECS", 60)?),
            },
            limits: InterviewLimits {
                max_questions: parse_env("MAX_QUESTIONS", defaults.max_questions)?,
                low_score_threshold: parse_env(
                    "LOW_SCORE_THRESHOLD",
                    defaults.low_score_threshold,
                )?,
                low_score_streak_limit: parse_env(
                    "LOW_SCORE_STREAK_LIMIT",
                    defaults.low_score_streak_limit,
                )?,
                unparseable_policy: parse_env(
                    "UNPARSEABLE_SCORE_POLICY",
                    defaults.unparseable_policy,
                )?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
