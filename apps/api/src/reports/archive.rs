use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedReport {
    pub candidate_name: String,
    pub report: String,
    pub recorded_at: DateTime<Utc>,
}

/// Process-lifetime map of candidate name to their most recent final report.
/// Shared by every session; a later interview under the same name replaces
/// the earlier report. Nothing is persisted or evicted.
#[derive(Debug, Clone, Default)]
pub struct ReportArchive {
    reports: Arc<RwLock<BTreeMap<String, ArchivedReport>>>,
}

impl ReportArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, candidate_name: &str, report: &str) {
        let entry = ArchivedReport {
            candidate_name: candidate_name.to_string(),
            report: report.to_string(),
            recorded_at: Utc::now(),
        };
        let replaced = self
            .reports
            .write()
            .await
            .insert(candidate_name.to_string(), entry)
            .is_some();
        info!(
            "Archived report for {candidate_name} ({})",
            if replaced { "replaced" } else { "new" }
        );
    }

    pub async fn get(&self, candidate_name: &str) -> Option<ArchivedReport> {
        self.reports.read().await.get(candidate_name).cloned()
    }

    /// All reports, ordered by candidate name.
    pub async fn list(&self) -> Vec<ArchivedReport> {
        self.reports.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }
}
