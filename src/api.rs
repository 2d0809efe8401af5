//! HTTP surface for the brief server.
//!
//! This module exposes a compact Axum router with three endpoints:
//!
//! - `POST /brief` – Multipart upload of one or more documents. Creates a file
//!   search store, indexes the files, generates a brief, and returns
//!   `{project_id, brief, store_name}`. The `project_id` keys later searches.
//! - `POST /search` – JSON body `{project_id, query}`. Answers the query from
//!   the project's indexed documents and returns the model's JSON verbatim.
//! - `GET /metrics` – Observe brief/search counters.
//!
//! Every failure responds with `{"detail": <message>}` and the mapped status:
//! 400 for empty submissions and blank queries, 404 for unknown projects, and
//! 500 for upstream or response-shape failures (logged before conversion).

use crate::briefing::{BriefApi, BriefError, SearchError, UploadedFile};
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Build the HTTP router exposing the briefing API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: BriefApi + 'static,
{
    Router::new()
        .route("/brief", post(create_brief::<S>))
        .route("/search", post(search_project::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Success response for the `POST /brief` endpoint.
#[derive(Serialize)]
struct BriefResponse {
    /// Identifier to pass to `POST /search`.
    project_id: String,
    /// The model's brief (shape dictated by the model; usually a string).
    brief: Value,
    /// Vendor store the documents were indexed into.
    store_name: String,
}

/// Upload files and generate a project brief.
///
/// Each multipart part becomes one document: the part's file name (falling
/// back to the field name), its declared content type (falling back to
/// `application/octet-stream`), and its bytes. Submissions with no parts are
/// rejected before any remote call.
async fn create_brief<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<BriefResponse>, ApiError>
where
    S: BriefApi,
{
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        let name = field
            .file_name()
            .map(str::to_string)
            .or_else(|| field.name().map(str::to_string))
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let content = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        files.push(UploadedFile {
            name,
            mime_type,
            content: content.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    let project_id = Uuid::new_v4().to_string();
    tracing::info!(project_id, files = files.len(), "Creating project");

    let outcome = service.create_brief(files, &project_id).await?;
    tracing::info!(project_id, "Brief generated");

    Ok(Json(BriefResponse {
        project_id: outcome.project_id,
        brief: outcome.brief,
        store_name: outcome.store_name,
    }))
}

/// Request body for the `POST /search` endpoint.
#[derive(Deserialize)]
struct SearchRequest {
    /// Project identifier returned by `POST /brief`.
    project_id: String,
    /// Free-text query to answer from the indexed documents.
    query: String,
}

/// Semantic search over a project's indexed documents.
async fn search_project<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Value>, ApiError>
where
    S: BriefApi,
{
    let result = service.search(&request.project_id, &request.query).await?;
    Ok(Json(result))
}

/// Return a concise snapshot of brief/search counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: BriefApi,
{
    Json(service.metrics_snapshot())
}

/// Error envelope translating service failures into HTTP statuses.
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            Self::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<BriefError> for ApiError {
    fn from(inner: BriefError) -> Self {
        tracing::error!(error = %inner, "Brief generation failed");
        Self::Internal(inner.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(inner: SearchError) -> Self {
        match inner {
            SearchError::ProjectNotFound(_) => Self::NotFound(inner.to_string()),
            SearchError::EmptyQuery => Self::BadRequest(inner.to_string()),
            other => {
                tracing::error!(error = %other, "Search failed");
                Self::Internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::briefing::{BriefApi, BriefError, BriefOutcome, SearchError, UploadedFile};
    use crate::metrics::MetricsSnapshot;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docbrief-test-boundary";

    fn multipart_request(parts: &[(&str, &str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (filename, mime, contents) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n{contents}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method(Method::POST)
            .uri("/brief")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    fn search_request(payload: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/search")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_without_calling_the_service() {
        let service = Arc::new(StubBriefService::default());
        let app = create_router(service.clone());

        let response = app
            .oneshot(multipart_request(&[]))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["detail"], "No files uploaded");
        assert_eq!(service.brief_calls().await.len(), 0);
    }

    #[tokio::test]
    async fn brief_returns_project_id_and_store_name() {
        let service = Arc::new(StubBriefService::default());
        let app = create_router(service.clone());

        let response = app
            .oneshot(multipart_request(&[(
                "scope.md",
                "text/markdown",
                "# Scope\nBuild a bridge.",
            )]))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["brief"], "A short summary.");
        assert_eq!(json["store_name"], "fileSearchStores/stub");
        let project_id = json["project_id"].as_str().expect("project id");
        uuid::Uuid::parse_str(project_id).expect("uuid project id");

        let calls = service.brief_calls().await;
        assert_eq!(calls.len(), 1);
        let (files, recorded_id) = &calls[0];
        assert_eq!(recorded_id, project_id);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "scope.md");
        assert_eq!(files[0].mime_type, "text/markdown");
        assert_eq!(files[0].content, b"# Scope\nBuild a bridge.");
    }

    #[tokio::test]
    async fn brief_failure_maps_to_500_with_detail() {
        let malformed = serde_json::from_str::<Value>("not json").expect_err("parse error");
        let service = Arc::new(StubBriefService::default());
        service
            .fail_next_brief(BriefError::Response(malformed.into()))
            .await;
        let app = create_router(service);

        let response = app
            .oneshot(multipart_request(&[("a.txt", "text/plain", "contents")]))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert!(
            json["detail"]
                .as_str()
                .expect("detail")
                .contains("not valid JSON")
        );
    }

    #[tokio::test]
    async fn unknown_project_maps_to_404() {
        let service = Arc::new(StubBriefService::default());
        let app = create_router(service);

        let response = app
            .oneshot(search_request(json!({
                "project_id": "11111111-2222-3333-4444-555555555555",
                "query": "anything"
            })))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert!(json["detail"].as_str().expect("detail").contains("not found"));
    }

    #[tokio::test]
    async fn blank_query_maps_to_400() {
        let service = Arc::new(StubBriefService::default());
        service.register_project("proj-1").await;
        let app = create_router(service);

        let response = app
            .oneshot(search_request(json!({
                "project_id": "proj-1",
                "query": "   "
            })))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["detail"], "Query cannot be empty");
    }

    #[tokio::test]
    async fn search_returns_the_parsed_result_verbatim() {
        let service = Arc::new(StubBriefService::default());
        service.register_project("proj-1").await;
        let app = create_router(service);

        let response = app
            .oneshot(search_request(json!({
                "project_id": "proj-1",
                "query": "deadline?"
            })))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(
            json,
            json!({ "results": [{ "file": "scope.md", "snippet": "Q4 launch" }] })
        );
    }

    #[tokio::test]
    async fn metrics_endpoint_reports_counters() {
        let service = Arc::new(StubBriefService::default());
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["briefs_generated"], 0);
        assert_eq!(json["searches_served"], 0);
    }

    #[derive(Default)]
    struct StubBriefService {
        brief_calls: Mutex<Vec<(Vec<UploadedFile>, String)>>,
        next_brief_error: Mutex<Option<BriefError>>,
        known_projects: Mutex<Vec<String>>,
    }

    impl StubBriefService {
        async fn brief_calls(&self) -> Vec<(Vec<UploadedFile>, String)> {
            self.brief_calls.lock().await.clone()
        }

        async fn fail_next_brief(&self, error: BriefError) {
            *self.next_brief_error.lock().await = Some(error);
        }

        async fn register_project(&self, project_id: &str) {
            self.known_projects.lock().await.push(project_id.to_string());
        }
    }

    #[async_trait]
    impl BriefApi for StubBriefService {
        async fn create_brief(
            &self,
            files: Vec<UploadedFile>,
            project_id: &str,
        ) -> Result<BriefOutcome, BriefError> {
            self.brief_calls
                .lock()
                .await
                .push((files, project_id.to_string()));
            if let Some(error) = self.next_brief_error.lock().await.take() {
                return Err(error);
            }
            Ok(BriefOutcome {
                project_id: project_id.to_string(),
                brief: json!("A short summary."),
                store_name: "fileSearchStores/stub".to_string(),
            })
        }

        async fn search(&self, project_id: &str, query: &str) -> Result<Value, SearchError> {
            if !self
                .known_projects
                .lock()
                .await
                .iter()
                .any(|known| known == project_id)
            {
                return Err(SearchError::ProjectNotFound(project_id.to_string()));
            }
            if query.trim().is_empty() {
                return Err(SearchError::EmptyQuery);
            }
            Ok(json!({ "results": [{ "file": "scope.md", "snippet": "Q4 launch" }] }))
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                briefs_generated: 0,
                files_indexed: 0,
                searches_served: 0,
            }
        }
    }
}
