//! Briefing service coordinating store creation, uploads, and generation.

use crate::{
    briefing::{
        extract::extract_json,
        prompts::{PROMPT_BRIEF, search_prompt},
        types::{BriefError, BriefOutcome, SearchError, UploadedFile},
    },
    gemini::GeminiClient,
    metrics::{BriefMetrics, MetricsSnapshot},
    registry::{InMemoryProjectStore, ProjectStore},
};
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

/// Coordinates the full briefing flow: store creation, per-file upload and
/// indexing, brief generation, and project registration.
///
/// The service owns the Gemini transport, the project registry, and the
/// metrics registry. Construct it once near process start and share it
/// through an `Arc`.
pub struct BriefingService {
    gemini: GeminiClient,
    registry: Box<dyn ProjectStore>,
    metrics: Arc<BriefMetrics>,
}

/// Abstraction over the briefing flow used by the HTTP surface.
#[async_trait]
pub trait BriefApi: Send + Sync {
    /// Index the submitted files into a fresh store and generate a brief.
    ///
    /// On success the project identifier is registered so later searches can
    /// resolve the store; on failure nothing is registered.
    async fn create_brief(
        &self,
        files: Vec<UploadedFile>,
        project_id: &str,
    ) -> Result<BriefOutcome, BriefError>;

    /// Answer a free-text query against a previously registered project.
    async fn search(&self, project_id: &str, query: &str) -> Result<Value, SearchError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl BriefingService {
    /// Build a new briefing service from environment configuration.
    pub fn new() -> Self {
        let gemini = GeminiClient::new().expect("Failed to initialize Gemini client");
        Self::with_parts(gemini, Box::new(InMemoryProjectStore::new()))
    }

    /// Build a service from explicit components.
    pub fn with_parts(gemini: GeminiClient, registry: Box<dyn ProjectStore>) -> Self {
        Self {
            gemini,
            registry,
            metrics: Arc::new(BriefMetrics::new()),
        }
    }

    /// Create a store, upload every non-empty file, and generate a brief.
    pub async fn create_brief(
        &self,
        files: Vec<UploadedFile>,
        project_id: &str,
    ) -> Result<BriefOutcome, BriefError> {
        let store_name = self
            .gemini
            .create_store(&format!("project-{project_id}"))
            .await?;

        let mut indexed = 0u64;
        for file in &files {
            if file.content.is_empty() {
                tracing::info!(file = %file.name, "Skipping empty file");
                continue;
            }
            tracing::info!(file = %file.name, bytes = file.content.len(), "Processing file");

            // The upload endpoint reads from a path, so stage the bytes in a
            // temp file. Drop semantics delete it on success and failure alike.
            let staged = stage_upload(file)?;
            self.gemini
                .upload_and_index(&store_name, staged.path(), &file.name, &file.mime_type)
                .await?;
            indexed += 1;
        }

        let text = self.gemini.generate(&store_name, PROMPT_BRIEF).await?;
        let parsed = extract_json(&text)?;
        let brief = parsed
            .get("brief")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));

        // Register only after the whole flow succeeded; a failed ingestion
        // must leave the project unresolvable.
        self.registry
            .put(project_id.to_string(), store_name.clone())
            .await;
        self.metrics.record_brief(indexed);
        tracing::info!(project_id, store = %store_name, files = indexed, "Brief generated");

        Ok(BriefOutcome {
            project_id: project_id.to_string(),
            brief,
            store_name,
        })
    }

    /// Answer a query against the store registered for a project.
    pub async fn search(&self, project_id: &str, query: &str) -> Result<Value, SearchError> {
        let store_name = self
            .registry
            .get(project_id)
            .await
            .ok_or_else(|| SearchError::ProjectNotFound(project_id.to_string()))?;

        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        tracing::info!(project_id, store = %store_name, query, "Searching store");
        let text = self.gemini.generate(&store_name, &search_prompt(query)).await?;
        let parsed = extract_json(&text)?;
        self.metrics.record_search();
        Ok(parsed)
    }

    /// Return the current activity counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Write the file's bytes to a named temp file, preserving the extension so
/// the vendor can infer the document format.
fn stage_upload(file: &UploadedFile) -> Result<tempfile::NamedTempFile, std::io::Error> {
    let suffix = match file.name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{ext}"),
        _ => ".txt".to_string(),
    };
    let mut staged = tempfile::Builder::new().suffix(&suffix).tempfile()?;
    staged.write_all(&file.content)?;
    staged.flush()?;
    Ok(staged)
}

#[async_trait]
impl BriefApi for BriefingService {
    async fn create_brief(
        &self,
        files: Vec<UploadedFile>,
        project_id: &str,
    ) -> Result<BriefOutcome, BriefError> {
        BriefingService::create_brief(self, files, project_id).await
    }

    async fn search(&self, project_id: &str, query: &str) -> Result<Value, SearchError> {
        BriefingService::search(self, project_id, query).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        BriefingService::metrics_snapshot(self)
    }
}
