//! Score extraction and the early-termination rule.
//!
//! The evaluation prompt asks the model to open its reply with `Score: N`
//! (0–10). Anything else is an `Unparseable` outcome; `UnparseableScorePolicy`
//! decides whether that counts against the candidate.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_SCORE: u32 = 10;

static SCORE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // Tolerates markdown emphasis around the label, e.g. `**Score:** 7`.
    Regex::new(r"(?i)\bscore\b[*_\s]*:[*_\s]*(\d{1,6})").expect("score pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("evaluation contains no 'Score: N' token")]
    Missing,

    #[error("score {0} is outside 0-10")]
    OutOfRange(u32),

    #[error("unknown unparseable-score policy '{0}' (expected count_as_zero or skip)")]
    UnknownPolicy(String),
}

/// Result of reading a score out of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(u8),
    Unparseable,
}

impl ScoreOutcome {
    pub fn from_evaluation(text: &str) -> (Self, Option<ScoreError>) {
        match parse_score(text) {
            Ok(score) => (ScoreOutcome::Scored(score), None),
            Err(e) => (ScoreOutcome::Unparseable, Some(e)),
        }
    }
}

/// Extracts the first `Score: N` token and validates it against 0–10.
pub fn parse_score(text: &str) -> Result<u8, ScoreError> {
    let captures = SCORE_PATTERN.captures(text).ok_or(ScoreError::Missing)?;
    let value: u32 = captures[1].parse().map_err(|_| ScoreError::Missing)?;
    if value > MAX_SCORE {
        return Err(ScoreError::OutOfRange(value));
    }
    Ok(value as u8)
}

/// How an unparseable evaluation feeds the low-score streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnparseableScorePolicy {
    /// Treat as a score of 0 (counts as low).
    #[default]
    CountAsZero,
    /// Leave the streak as it was.
    Skip,
}

impl FromStr for UnparseableScorePolicy {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count_as_zero" | "zero" => Ok(UnparseableScorePolicy::CountAsZero),
            "skip" => Ok(UnparseableScorePolicy::Skip),
            other => Err(ScoreError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Bounds that end an interview early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterviewLimits {
    pub max_questions: u32,
    /// Scores at or below this are "low".
    pub low_score_threshold: u8,
    pub low_score_streak_limit: u32,
    pub unparseable_policy: UnparseableScorePolicy,
}

impl Default for InterviewLimits {
    fn default() -> Self {
        Self {
            max_questions: 15,
            low_score_threshold: 3,
            low_score_streak_limit: 4,
            unparseable_policy: UnparseableScorePolicy::CountAsZero,
        }
    }
}

impl InterviewLimits {
    /// `Some(true)` extends the streak, `Some(false)` resets it, `None` leaves it.
    pub fn classify(&self, outcome: ScoreOutcome) -> Option<bool> {
        match outcome {
            ScoreOutcome::Scored(score) => Some(score <= self.low_score_threshold),
            ScoreOutcome::Unparseable => match self.unparseable_policy {
                UnparseableScorePolicy::CountAsZero => Some(true),
                UnparseableScorePolicy::Skip => None,
            },
        }
    }

    /// Either bound is enough on its own.
    pub fn should_terminate(&self, question_count: u32, low_score_streak: u32) -> bool {
        low_score_streak >= self.low_score_streak_limit || question_count >= self.max_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_score() {
        assert_eq!(parse_score("Score: 7\nGood use of INDEX/MATCH."), Ok(7));
    }

    #[test]
    fn test_parse_score_out_of_ten() {
        assert_eq!(parse_score("Score: 4/10 - partially correct"), Ok(4));
    }

    #[test]
    fn test_parse_markdown_score() {
        assert_eq!(parse_score("**Score:** 9\nExcellent."), Ok(9));
        assert_eq!(parse_score("**Score: 2**"), Ok(2));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(parse_score("score:10"), Ok(10));
    }

    #[test]
    fn test_first_score_wins() {
        assert_eq!(parse_score("Score: 3. Previous Score: 8"), Ok(3));
    }

    #[test]
    fn test_missing_score() {
        assert_eq!(
            parse_score("Nice answer, you clearly know pivot tables."),
            Err(ScoreError::Missing)
        );
        assert_eq!(parse_score("I would score this highly"), Err(ScoreError::Missing));
    }

    #[test]
    fn test_out_of_range_score() {
        assert_eq!(parse_score("Score: 75"), Err(ScoreError::OutOfRange(75)));
    }

    #[test]
    fn test_outcome_from_malformed_text() {
        let (outcome, err) = ScoreOutcome::from_evaluation("Great job!");
        assert_eq!(outcome, ScoreOutcome::Unparseable);
        assert_eq!(err, Some(ScoreError::Missing));
    }

    #[test]
    fn test_classify_threshold_is_inclusive() {
        let limits = InterviewLimits::default();
        assert_eq!(limits.classify(ScoreOutcome::Scored(3)), Some(true));
        assert_eq!(limits.classify(ScoreOutcome::Scored(4)), Some(false));
        assert_eq!(limits.classify(ScoreOutcome::Scored(0)), Some(true));
    }

    #[test]
    fn test_unparseable_counts_as_zero_by_default() {
        let limits = InterviewLimits::default();
        assert_eq!(limits.classify(ScoreOutcome::Unparseable), Some(true));
    }

    #[test]
    fn test_unparseable_skip_policy() {
        let limits = InterviewLimits {
            unparseable_policy: UnparseableScorePolicy::Skip,
            ..InterviewLimits::default()
        };
        assert_eq!(limits.classify(ScoreOutcome::Unparseable), None);
    }

    #[test]
    fn test_termination_bounds_are_independent() {
        let limits = InterviewLimits::default();
        assert!(!limits.should_terminate(3, 3));
        assert!(limits.should_terminate(4, 4));
        assert!(limits.should_terminate(15, 0));
        assert!(!limits.should_terminate(14, 0));
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&ScoreOutcome::Scored(6)).unwrap(),
            r#"{"scored":6}"#
        );
        assert_eq!(
            serde_json::to_string(&ScoreOutcome::Unparseable).unwrap(),
            r#""unparseable""#
        );
    }
}
