//! Resource index: every resource id known to one validation pass.
//!
//! The index merges three provenances -- project-level definitions,
//! per-workflow definitions, and ids listed by the durable store -- into
//! per-kind buckets. The reference walker then marks entries as it
//! resolves references; whatever stays unmarked and local is reported as
//! unused. The index lives for a single pass and is discarded afterward.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use conflux_types::error::ValidationError;
use conflux_types::project::ProjectConfig;
use conflux_types::resource::ResourceKind;
use conflux_types::workflow::WorkflowConfig;

use crate::store::ResourceStore;

/// What the index knows about one resource id.
///
/// Owned exclusively by the index; the `referenced` flag is flipped only
/// through [`ResourceIndex::mark`].
#[derive(Debug)]
pub struct ResourceInfo {
    source: &'static str,
    referenced: bool,
    external: bool,
}

impl ResourceInfo {
    /// Provenance label, e.g. "project.tool" or "store.workflow".
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Whether any reference resolved to this entry during the walk.
    pub fn referenced(&self) -> bool {
        self.referenced
    }

    /// Whether the entry is known only from the durable store.
    pub fn external(&self) -> bool {
        self.external
    }
}

/// A locally defined resource that nothing referenced. Informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedEntry {
    pub kind: ResourceKind,
    pub id: String,
    pub source: &'static str,
}

/// Registry of resources by kind and id for one validation pass.
#[derive(Debug)]
pub struct ResourceIndex {
    project_name: String,
    buckets: HashMap<ResourceKind, HashMap<String, ResourceInfo>>,
}

impl ResourceIndex {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            buckets: HashMap::new(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    fn bucket(&mut self, kind: ResourceKind) -> &mut HashMap<String, ResourceInfo> {
        self.buckets.entry(kind).or_default()
    }

    /// Register an id under a kind. No-op on a blank id. Re-adding an
    /// id keeps the first entry, except that a local re-add of a
    /// store-only entry promotes it: local definitions always win over
    /// store knowledge.
    pub fn add(&mut self, kind: ResourceKind, id: &str, source: &'static str, external: bool) {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return;
        }
        let bucket = self.bucket(kind);
        if let Some(existing) = bucket.get_mut(trimmed) {
            if existing.external && !external {
                existing.external = false;
                existing.source = source;
            }
            return;
        }
        bucket.insert(
            trimmed.to_string(),
            ResourceInfo {
                source,
                referenced: false,
                external,
            },
        );
    }

    /// Flag an id as referenced. Returns false on a blank or unknown id,
    /// which is the caller's signal that the reference is dangling.
    pub fn mark(&mut self, kind: ResourceKind, id: &str) -> bool {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.bucket(kind).get_mut(trimmed) {
            Some(info) => {
                info.referenced = true;
                true
            }
            None => false,
        }
    }

    /// Look up an entry.
    pub fn info(&self, kind: ResourceKind, id: &str) -> Option<&ResourceInfo> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.buckets.get(&kind)?.get(trimmed)
    }

    /// Number of non-external entries: the project's own resource count.
    pub fn count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.values())
            .filter(|info| !info.external)
            .count()
    }

    /// Locally defined entries that nothing referenced, sorted by
    /// (kind, id) for stable output.
    pub fn unused(&self) -> Vec<UnusedEntry> {
        let mut unused: Vec<UnusedEntry> = self
            .buckets
            .iter()
            .flat_map(|(kind, bucket)| {
                bucket
                    .iter()
                    .filter(|(_, info)| !info.external && !info.referenced)
                    .map(|(id, info)| UnusedEntry {
                        kind: *kind,
                        id: id.clone(),
                        source: info.source,
                    })
            })
            .collect();
        unused.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));
        unused
    }
}

fn store_source(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Workflow => "store.workflow",
        ResourceKind::Agent => "store.agent",
        ResourceKind::Tool => "store.tool",
        ResourceKind::KnowledgeBase => "store.knowledge_base",
        ResourceKind::Memory => "store.memory",
        ResourceKind::Embedder => "store.embedder",
        ResourceKind::VectorDb => "store.vector_db",
    }
}

/// Build the index for one validation pass: project resources first,
/// then per-workflow resources, then -- when a store is supplied --
/// everything the store already knows, added as external.
///
/// Store listings are the only fallible and cancellable step; a listing
/// failure aborts the pass immediately.
pub async fn build_resource_index<S: ResourceStore>(
    project: &ProjectConfig,
    workflows: &[WorkflowConfig],
    store: Option<&S>,
    cancel: &CancellationToken,
) -> Result<ResourceIndex, ValidationError> {
    let mut idx = ResourceIndex::new(&project.name);
    add_project_resources(&mut idx, project);
    add_workflow_resources(&mut idx, workflows);
    if let Some(store) = store {
        add_store_resources(&mut idx, store, cancel).await?;
    }
    Ok(idx)
}

fn add_project_resources(idx: &mut ResourceIndex, project: &ProjectConfig) {
    for tool in &project.tools {
        idx.add(ResourceKind::Tool, &tool.id, "project.tool", false);
    }
    for mem in &project.memories {
        let mem = mem.clone().with_defaults();
        idx.add(ResourceKind::Memory, &mem.id, "project.memory", false);
    }
    for kb in &project.knowledge_bases {
        idx.add(ResourceKind::KnowledgeBase, &kb.id, "project.knowledge_base", false);
    }
    for embedder in &project.embedders {
        idx.add(ResourceKind::Embedder, &embedder.id, "project.embedder", false);
    }
    for vector in &project.vector_dbs {
        idx.add(ResourceKind::VectorDb, &vector.id, "project.vector_db", false);
    }
}

fn add_workflow_resources(idx: &mut ResourceIndex, workflows: &[WorkflowConfig]) {
    for wf in workflows {
        idx.add(ResourceKind::Workflow, &wf.id, "workflow", false);
        for agent in &wf.agents {
            idx.add(ResourceKind::Agent, &agent.id, "workflow.agent", false);
        }
        for tool in &wf.tools {
            idx.add(ResourceKind::Tool, &tool.id, "workflow.tool", false);
        }
        for kb in &wf.knowledge_bases {
            idx.add(ResourceKind::KnowledgeBase, &kb.id, "workflow.knowledge_base", false);
        }
    }
}

async fn add_store_resources<S: ResourceStore>(
    idx: &mut ResourceIndex,
    store: &S,
    cancel: &CancellationToken,
) -> Result<(), ValidationError> {
    let project = idx.project_name.clone();
    for kind in ResourceKind::ALL {
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }
        let ids = store
            .list(&project, kind)
            .await
            .map_err(|source| ValidationError::StoreList { kind, source })?;
        for id in ids {
            idx.add(kind, &id, store_source(kind), true);
        }
    }
    Ok(())
}
