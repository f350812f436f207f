//! Resource store port.
//!
//! The durable store knows which resources already exist for a project
//! beyond the in-memory definitions being validated. Validation only
//! needs one operation from it: listing ids per resource kind.
//!
//! Uses RPITIT (native async fn in traits, Rust 2024 edition).
//! Production implementations live outside this crate; the in-memory
//! implementation below backs tests and embedded use.

use dashmap::DashMap;

use conflux_types::error::StoreError;
use conflux_types::resource::ResourceKind;

/// Read port onto a durable resource store.
pub trait ResourceStore: Send + Sync {
    /// List the ids of all `kind` resources registered under `project`.
    fn list(
        &self,
        project: &str,
        kind: ResourceKind,
    ) -> impl std::future::Future<Output = Result<Vec<String>, StoreError>> + Send;
}

/// In-memory resource store keyed by (project, kind).
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    entries: DashMap<(String, ResourceKind), Vec<String>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource id under a project and kind.
    pub fn insert(&self, project: &str, kind: ResourceKind, id: &str) {
        self.entries
            .entry((project.to_string(), kind))
            .or_default()
            .push(id.to_string());
    }
}

impl ResourceStore for InMemoryResourceStore {
    async fn list(&self, project: &str, kind: ResourceKind) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .get(&(project.to_string(), kind))
            .map(|ids| ids.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_returns_ids_for_project_and_kind() {
        let store = InMemoryResourceStore::new();
        store.insert("demo", ResourceKind::Workflow, "ingest");
        store.insert("demo", ResourceKind::Workflow, "publish");
        store.insert("demo", ResourceKind::Agent, "writer");
        store.insert("other", ResourceKind::Workflow, "unrelated");

        let ids = store.list("demo", ResourceKind::Workflow).await.unwrap();
        assert_eq!(ids, vec!["ingest".to_string(), "publish".to_string()]);
    }

    #[tokio::test]
    async fn list_unknown_project_is_empty() {
        let store = InMemoryResourceStore::new();
        let ids = store.list("nope", ResourceKind::Tool).await.unwrap();
        assert!(ids.is_empty());
    }
}
