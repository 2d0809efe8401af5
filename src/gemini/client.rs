//! HTTP client wrapper for the Gemini File Search and generation endpoints.

use crate::config::get_config;
use crate::gemini::types::{
    GeminiError, GenerateContentResponse, OperationResource, StoreResource,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Lightweight HTTP client for the Gemini REST API.
///
/// Owns the credential, the target model, and the poll budget applied to
/// asynchronous upload operations.
pub struct GeminiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_max_attempts: u32,
}

impl GeminiClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, GeminiError> {
        let config = get_config();
        Self::with_settings(
            &config.gemini_base_url,
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            Duration::from_millis(config.poll_interval_ms),
            config.poll_max_attempts,
        )
    }

    /// Construct a client against an explicit endpoint and poll budget.
    pub fn with_settings(
        base_url: &str,
        api_key: String,
        model: String,
        poll_interval: Duration,
        poll_max_attempts: u32,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder().user_agent("docbrief/0.1").build()?;
        let base_url = normalize_base_url(base_url).map_err(GeminiError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            model = %model,
            poll_interval_ms = poll_interval.as_millis() as u64,
            poll_max_attempts,
            "Initialized Gemini HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            poll_interval,
            poll_max_attempts,
        })
    }

    /// Create a new file search store and return its resource name.
    pub async fn create_store(&self, display_name: &str) -> Result<String, GeminiError> {
        let response = self
            .request(Method::POST, "v1beta/fileSearchStores")
            .json(&json!({ "displayName": display_name }))
            .send()
            .await?;

        if response.status().is_success() {
            let store: StoreResource = response.json().await?;
            tracing::info!(store = %store.name, display_name, "Store created");
            Ok(store.name)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = GeminiError::UnexpectedStatus { status, body };
            tracing::error!(display_name, error = %error, "Failed to create store");
            Err(error)
        }
    }

    /// Upload a local file into a store and block until indexing completes.
    ///
    /// The upload endpoint returns a long-running operation; the operation is
    /// polled at the configured interval up to the configured attempt cap.
    pub async fn upload_and_index(
        &self,
        store_name: &str,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<(), GeminiError> {
        let bytes = tokio::fs::read(path).await?;
        let metadata = json!({ "file": { "displayName": display_name } });
        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(display_name.to_string())
                    .mime_str(mime_type)?,
            );

        let response = self
            .request(
                Method::POST,
                &format!("upload/v1beta/{store_name}:uploadToFileSearchStore"),
            )
            .header("x-goog-upload-protocol", "multipart")
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = GeminiError::UnexpectedStatus { status, body };
            tracing::error!(store = store_name, display_name, error = %error, "Upload request failed");
            return Err(error);
        }

        let operation: OperationResource = response.json().await?;
        self.wait_for_operation(operation, display_name).await
    }

    /// Poll an operation resource until it reports completion.
    async fn wait_for_operation(
        &self,
        mut operation: OperationResource,
        display_name: &str,
    ) -> Result<(), GeminiError> {
        let mut attempts = 0u32;
        while !operation.done {
            if attempts >= self.poll_max_attempts {
                let error = GeminiError::OperationTimeout {
                    operation: operation.name,
                    attempts,
                };
                tracing::error!(display_name, error = %error, "Gave up polling upload operation");
                return Err(error);
            }
            attempts += 1;
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .request(Method::GET, &format!("v1beta/{}", operation.name))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let error = GeminiError::UnexpectedStatus { status, body };
                tracing::error!(display_name, error = %error, "Operation poll failed");
                return Err(error);
            }

            operation = response.json().await?;
        }

        if let Some(op_error) = operation.error {
            return Err(GeminiError::OperationFailed {
                display_name: display_name.to_string(),
                message: op_error.describe(),
            });
        }

        tracing::info!(display_name, polls = attempts, "File indexed");
        Ok(())
    }

    /// Issue one generation call constrained to a store and return the raw
    /// text of the first candidate.
    pub async fn generate(&self, store_name: &str, prompt: &str) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{
                "fileSearch": {
                    "fileSearchStoreNames": [store_name]
                }
            }],
        });

        let response = self
            .request(
                Method::POST,
                &format!("v1beta/models/{}:generateContent", self.model),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = GeminiError::UnexpectedStatus { status, body };
            tracing::error!(store = store_name, error = %error, "Generation call failed");
            return Err(error);
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
            })
            .ok_or(GeminiError::EmptyResponse)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        self.client
            .request(method, url)
            .header("x-goog-api-key", &self.api_key)
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
