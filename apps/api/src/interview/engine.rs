//! Interview engine. Drives one session through its phases.
//!
//! Flow per action:
//!   start  → reset → (resume → analysis) → intro → first question
//!   answer → candidate turn → evaluation → score → next question | report
//!   end    → report
//!
//! Every remote call goes through `generate_with_retry`, so an action never
//! fails because of the remote model; degraded replies land in the
//! conversation as interviewer text.
//!
//! Actions run against a draft copy of the session that replaces the stored
//! one only after the last remote call returns. A request dropped mid-action
//! leaves the session exactly as it was before the action.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::interview::models::{Phase, Session, Turn};
use crate::interview::prompts::{self, Participants};
use crate::interview::scoring::{InterviewLimits, ScoreOutcome};
use crate::llm_client::retry::{generate_with_retry, GenerationRequest, RetryPolicy};
use crate::llm_client::TextGenerator;
use crate::notice::Notices;
use crate::reports::archive::ReportArchive;
use crate::resume::{ResumeError, ResumeReader, ResumeUpload};

pub struct InterviewEngine {
    generator: Arc<dyn TextGenerator>,
    resume_reader: Arc<dyn ResumeReader>,
    retry: RetryPolicy,
    limits: InterviewLimits,
    archive: ReportArchive,
}

impl InterviewEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        resume_reader: Arc<dyn ResumeReader>,
        retry: RetryPolicy,
        limits: InterviewLimits,
        archive: ReportArchive,
    ) -> Self {
        Self {
            generator,
            resume_reader,
            retry,
            limits,
            archive,
        }
    }

    /// Starts (or restarts) an interview. Allowed from any phase.
    ///
    /// A blank name is rejected before anything in the session changes.
    pub async fn start(
        &self,
        session: &mut Session,
        candidate_name: &str,
        resume: Option<ResumeUpload>,
    ) -> Result<Notices, AppError> {
        let candidate_name = candidate_name.trim();
        if candidate_name.is_empty() {
            return Err(AppError::Validation("Please enter your Name.".to_string()));
        }

        let mut notices = Notices::new();
        let mut draft = session.clone();
        draft.begin(candidate_name.to_string());

        let resume_summary = match resume {
            Some(upload) => self.summarise_resume(upload, &mut notices).await,
            None => None,
        };

        let intro_prompt = prompts::intro(participants(&draft), resume_summary.as_deref());
        let intro = self.ask(&intro_prompt, &mut notices).await;
        draft.push_turn(Turn::interviewer(intro));

        let first_prompt = prompts::first_question(participants(&draft));
        let first_question = self.ask(&first_prompt, &mut notices).await;
        draft.push_turn(Turn::interviewer(first_question));

        *session = draft;
        info!("Session {}: interview started for {candidate_name}", session.id);
        Ok(notices)
    }

    /// Records and evaluates one candidate answer, then either asks the next
    /// question or, when a termination bound is reached, writes the report.
    pub async fn answer(&self, session: &mut Session, answer: &str) -> Result<Notices, AppError> {
        require_in_progress(session, "No interview in progress. Start an interview first.")?;
        if answer.trim().is_empty() {
            return Err(AppError::Validation("Answer cannot be empty.".to_string()));
        }

        let mut notices = Notices::new();
        let mut draft = session.clone();
        draft.push_turn(Turn::candidate(answer));

        let eval_prompt = prompts::evaluation(participants(&draft), answer);
        let evaluation = self
            .ask_with_history(&eval_prompt, &draft, &mut notices)
            .await;

        let (outcome, parse_error) = ScoreOutcome::from_evaluation(&evaluation);
        draft.push_turn(Turn::interviewer(evaluation));
        if let Some(e) = parse_error {
            notices.warning(format!("Could not read a score from the evaluation: {e}"));
        }

        let streak = draft.record_score(outcome, self.limits.classify(outcome));
        info!(
            "Session {}: answer {} scored {:?}, low-score streak {}",
            draft.id, draft.question_count, outcome, streak
        );

        if self
            .limits
            .should_terminate(draft.question_count, draft.low_score_streak)
        {
            notices.info("Ending interview. Generating final report...");
            self.conclude(&mut draft, &mut notices).await;
        } else {
            let next_prompt = prompts::next_question(participants(&draft));
            let next_question = self
                .ask_with_history(&next_prompt, &draft, &mut notices)
                .await;
            draft.push_turn(Turn::interviewer(next_question));
        }

        *session = draft;
        Ok(notices)
    }

    /// Explicit end action.
    pub async fn end(&self, session: &mut Session) -> Result<Notices, AppError> {
        require_in_progress(session, "No active session to end.")?;
        let mut notices = Notices::new();
        let mut draft = session.clone();
        self.conclude(&mut draft, &mut notices).await;
        *session = draft;
        Ok(notices)
    }

    /// Generates the report and archives it. No await follows the archive
    /// write, so the caller's commit cannot be cut off after it.
    async fn conclude(&self, session: &mut Session, notices: &mut Notices) {
        let report_prompt = prompts::final_report(participants(session), &session.transcript());
        let report = self.ask(&report_prompt, notices).await;

        if let Some(name) = session.candidate_name.as_deref() {
            self.archive.record(name, &report).await;
        }
        session.finish(report);
        info!(
            "Session {}: interview finished after {} answers",
            session.id, session.question_count
        );
    }

    async fn summarise_resume(
        &self,
        upload: ResumeUpload,
        notices: &mut Notices,
    ) -> Option<String> {
        let pdf = match upload {
            ResumeUpload::Pdf(pdf) if pdf.is_empty() => return None,
            ResumeUpload::Pdf(pdf) => pdf,
            ResumeUpload::Unreadable(reason) => {
                notices.error(format!("Error reading PDF: {reason}"));
                return None;
            }
        };

        match self.resume_reader.read_text(pdf).await {
            Ok(text) => {
                let prompt = prompts::resume_analysis(&text);
                Some(self.ask(&prompt, notices).await)
            }
            Err(ResumeError::Empty) => {
                notices.info("Resume has no readable text; continuing without it.");
                None
            }
            Err(e) => {
                notices.error(format!("Error reading PDF: {e}"));
                None
            }
        }
    }

    async fn ask(&self, prompt: &str, notices: &mut Notices) -> String {
        generate_with_retry(
            self.generator.as_ref(),
            &self.retry,
            GenerationRequest::prompt(prompt),
            notices,
        )
        .await
    }

    async fn ask_with_history(
        &self,
        prompt: &str,
        session: &Session,
        notices: &mut Notices,
    ) -> String {
        let history = session.chat_history();
        generate_with_retry(
            self.generator.as_ref(),
            &self.retry,
            GenerationRequest::with_history(prompt, &history),
            notices,
        )
        .await
    }
}

fn participants(session: &Session) -> Participants<'_> {
    Participants {
        candidate_name: session.candidate_name.as_deref().unwrap_or_default(),
        interviewer_name: &session.interviewer_name,
    }
}

fn require_in_progress(session: &Session, message: &str) -> Result<(), AppError> {
    if session.phase == Phase::InProgress {
        Ok(())
    } else {
        Err(AppError::Conflict(message.to_string()))
    }
}
