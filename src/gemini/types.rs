//! Shared types used by the Gemini client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned while interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid Gemini URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Local file backing an upload could not be read.
    #[error("Failed to read upload source: {0}")]
    Io(#[from] std::io::Error),
    /// Gemini responded with an unexpected status code.
    #[error("Unexpected Gemini response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Gemini.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Upload operation completed with a vendor-side error.
    #[error("Upload/indexing error for {display_name}: {message}")]
    OperationFailed {
        /// Display name of the file whose operation failed.
        display_name: String,
        /// Error message reported by the operation resource.
        message: String,
    },
    /// Upload operation did not complete within the configured poll budget.
    #[error("Operation {operation} still pending after {attempts} polls")]
    OperationTimeout {
        /// Name of the operation resource that never completed.
        operation: String,
        /// Number of polls performed before giving up.
        attempts: u32,
    },
    /// Generation call returned no usable candidate text.
    #[error("Gemini returned no candidate text")]
    EmptyResponse,
}

#[derive(Deserialize)]
pub(crate) struct StoreResource {
    pub(crate) name: String,
}

/// Long-running operation resource tracked via polling.
#[derive(Debug, Deserialize)]
pub(crate) struct OperationResource {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) done: bool,
    #[serde(default)]
    pub(crate) error: Option<OperationError>,
}

/// Error payload embedded in a failed operation resource.
#[derive(Debug, Deserialize)]
pub(crate) struct OperationError {
    #[serde(default)]
    pub(crate) code: Option<i64>,
    #[serde(default)]
    pub(crate) message: String,
}

impl OperationError {
    pub(crate) fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{} (code {code})", self.message),
            None => self.message.clone(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub(crate) struct Candidate {
    pub(crate) content: CandidateContent,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<CandidatePart>,
}

/// Non-text parts (grounding metadata and the like) deserialize with
/// `text: None` and are skipped.
#[derive(Deserialize)]
pub(crate) struct CandidatePart {
    #[serde(default)]
    pub(crate) text: Option<String>,
}
