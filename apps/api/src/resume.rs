//! Resume intake: pulls plain text out of an uploaded PDF.
//!
//! A failure here never blocks an interview; the caller reports it and
//! carries on without resume context.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// What the start form delivered in its `resume` field.
#[derive(Debug, Clone)]
pub enum ResumeUpload {
    Pdf(Bytes),
    /// The upload never arrived intact, e.g. it exceeded the body limit.
    Unreadable(String),
}

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("could not read PDF: {0}")]
    Extract(String),

    #[error("PDF contains no extractable text")]
    Empty,

    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turns an uploaded resume into plain text.
#[async_trait]
pub trait ResumeReader: Send + Sync {
    async fn read_text(&self, pdf: Bytes) -> Result<String, ResumeError>;
}

/// Production reader backed by `pdf-extract`.
pub struct PdfResumeReader;

#[async_trait]
impl ResumeReader for PdfResumeReader {
    async fn read_text(&self, pdf: Bytes) -> Result<String, ResumeError> {
        extract_text(pdf).await
    }
}

/// Extracts text on the blocking pool; pdf parsing is CPU-bound and may panic
/// on malformed input, which surfaces here as `ResumeError::Task`.
pub async fn extract_text(pdf: Bytes) -> Result<String, ResumeError> {
    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await?
        .map_err(|e| ResumeError::Extract(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ResumeError::Empty);
    }

    debug!("Extracted {} chars from {} byte resume", text.len(), size);
    Ok(text)
}
