//! Core data types and error definitions for the briefing pipeline.

use crate::briefing::extract::ExtractError;
use crate::gemini::GeminiError;
use serde_json::Value;
use thiserror::Error;

/// A document supplied by the caller, held only for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name as submitted.
    pub name: String,
    /// MIME type declared by the caller.
    pub mime_type: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// Result of a completed brief generation.
#[derive(Debug, Clone)]
pub struct BriefOutcome {
    /// Project identifier assigned to this submission.
    pub project_id: String,
    /// The `brief` field of the model's JSON answer (empty string when absent).
    pub brief: Value,
    /// Resource name of the store the documents were indexed into.
    pub store_name: String,
}

/// Errors emitted while creating a store, indexing files, and generating a brief.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Gemini interaction failed during store creation, upload, or generation.
    #[error("Gemini request failed: {0}")]
    Gemini(#[from] GeminiError),
    /// The model's answer could not be parsed as JSON.
    #[error("Failed to parse brief response: {0}")]
    Response(#[from] ExtractError),
    /// Staging a file to a temporary location failed.
    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors emitted while answering a search query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The project identifier was never registered by a successful brief.
    #[error("Project '{0}' not found.")]
    ProjectNotFound(String),
    /// The query was empty or whitespace-only.
    #[error("Query cannot be empty")]
    EmptyQuery,
    /// Gemini generation call failed.
    #[error("Gemini request failed: {0}")]
    Gemini(#[from] GeminiError),
    /// The model's answer could not be parsed as JSON.
    #[error("Failed to parse search response: {0}")]
    Response(#[from] ExtractError),
}
