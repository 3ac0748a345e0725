use std::sync::Arc;

use crate::config::Config;
use crate::interview::engine::InterviewEngine;
use crate::interview::store::SessionStore;
use crate::llm_client::TextGenerator;
use crate::reports::archive::ReportArchive;
use crate::reports::auth::OperatorGate;
use crate::resume::PdfResumeReader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub engine: Arc<InterviewEngine>,
    /// Same archive the engine writes to; read by the operator view.
    pub archive: ReportArchive,
    pub operator: OperatorGate,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        let archive = ReportArchive::new();
        let engine = InterviewEngine::new(
            generator,
            Arc::new(PdfResumeReader),
            config.retry_policy,
            config.limits,
            archive.clone(),
        );
        Self {
            sessions: SessionStore::new(),
            engine: Arc::new(engine),
            archive,
            operator: OperatorGate::new(
                config.operator_username.clone(),
                config.operator_password.clone(),
            ),
            config,
        }
    }
}
