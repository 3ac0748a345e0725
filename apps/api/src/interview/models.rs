use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::scoring::ScoreOutcome;
use crate::llm_client::{ChatMessage, ChatRole};

/// Interview lifecycle. Exactly one at a time per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Initial,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

/// One message in the interview conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn interviewer(text: impl Into<String>) -> Self {
        Self::new(Speaker::Interviewer, text)
    }

    pub fn candidate(text: impl Into<String>) -> Self {
        Self::new(Speaker::Candidate, text)
    }

    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        let role = match self.speaker {
            Speaker::Interviewer => ChatRole::Assistant,
            Speaker::Candidate => ChatRole::User,
        };
        ChatMessage::new(role, self.text.clone())
    }
}

/// Per-session interview record. Lives in the `SessionStore` behind its own
/// mutex; only `InterviewEngine` mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    turns: Vec<Turn>,
    /// One entry per evaluated answer, so `scores.len() == question_count`.
    scores: Vec<ScoreOutcome>,
    pub question_count: u32,
    pub low_score_streak: u32,
    pub candidate_name: Option<String>,
    pub interviewer_name: String,
    pub report: Option<String>,
}

impl Session {
    pub fn new(interviewer_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            phase: Phase::Initial,
            turns: Vec::new(),
            scores: Vec::new(),
            question_count: 0,
            low_score_streak: 0,
            candidate_name: None,
            interviewer_name: interviewer_name.into(),
            report: None,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn scores(&self) -> &[ScoreOutcome] {
        &self.scores
    }

    /// Resets everything an interview accumulates and enters `InProgress`.
    pub(crate) fn begin(&mut self, candidate_name: String) {
        self.candidate_name = Some(candidate_name);
        self.phase = Phase::InProgress;
        self.turns.clear();
        self.scores.clear();
        self.report = None;
        self.question_count = 0;
        self.low_score_streak = 0;
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Counts one evaluated answer. Returns the streak after the update.
    pub(crate) fn record_score(
        &mut self,
        outcome: ScoreOutcome,
        counts_as_low: Option<bool>,
    ) -> u32 {
        match counts_as_low {
            Some(true) => self.low_score_streak += 1,
            Some(false) => self.low_score_streak = 0,
            None => {}
        }
        self.scores.push(outcome);
        self.question_count += 1;
        self.low_score_streak
    }

    pub(crate) fn finish(&mut self, report: String) {
        self.report = Some(report);
        self.phase = Phase::Done;
    }

    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(Turn::to_chat_message).collect()
    }

    /// Serialises the conversation as `Interviewer: …` / `<candidate>: …` lines.
    pub fn transcript(&self) -> String {
        let candidate = self.candidate_name.as_deref().unwrap_or("Candidate");
        self.turns
            .iter()
            .map(|turn| {
                let label = match turn.speaker {
                    Speaker::Interviewer => "Interviewer",
                    Speaker::Candidate => candidate,
                };
                format!("{label}: {}", turn.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            phase: self.phase,
            candidate_name: self.candidate_name.clone(),
            interviewer_name: self.interviewer_name.clone(),
            question_count: self.question_count,
            low_score_streak: self.low_score_streak,
            turns: self.turns.clone(),
            scores: self.scores.clone(),
            report: self.report.clone(),
        }
    }
}

/// Read-only snapshot returned to clients after every action.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub candidate_name: Option<String>,
    pub interviewer_name: String,
    pub question_count: u32,
    pub low_score_streak: u32,
    pub turns: Vec<Turn>,
    pub scores: Vec<ScoreOutcome>,
    pub report: Option<String>,
}
