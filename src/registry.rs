//! Process-local registry mapping project identifiers to vendor store names.
//!
//! The mapping is append-only and lives for the life of the process: a key is
//! registered exactly once, after its brief has been generated successfully,
//! and is never evicted. Nothing is persisted across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Lookup/insert abstraction over the project-to-store mapping.
///
/// The briefing service owns one instance; tests may substitute a fake.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Resolve the store name registered for a project, if any.
    async fn get(&self, project_id: &str) -> Option<String>;

    /// Register the store name for a project.
    async fn put(&self, project_id: String, store_name: String);
}

/// In-memory [`ProjectStore`] backed by a read/write-locked map.
#[derive(Default)]
pub struct InMemoryProjectStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryProjectStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get(&self, project_id: &str) -> Option<String> {
        self.entries.read().await.get(project_id).cloned()
    }

    async fn put(&self, project_id: String, store_name: String) {
        self.entries.write().await.insert(project_id, store_name);
    }
}
