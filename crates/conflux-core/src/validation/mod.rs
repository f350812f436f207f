//! Pre-execution validation pass.
//!
//! One pass runs index build -> reference walk -> cycle check -> order
//! plan against already-materialized configuration objects, then is
//! discarded. Store listings are the only fallible I/O and abort the
//! pass immediately; every in-memory step aggregates defects instead of
//! stopping at the first.

mod graph;
mod index;
mod order;
mod refs;

pub use graph::{DependencyGraph, detect_cycles};
pub use index::{ResourceIndex, ResourceInfo, UnusedEntry, build_resource_index};
pub use order::plan_workflow_order;
pub use refs::{BUILTIN_CALL_WORKFLOW, BUILTIN_CALL_WORKFLOWS, validate_references};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use conflux_types::error::ValidationError;
use conflux_types::project::ProjectConfig;
use conflux_types::workflow::WorkflowConfig;

use crate::store::ResourceStore;

/// Summary of one successful validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Number of resources this project defines itself (external
    /// store-only entries excluded).
    pub resource_count: usize,
    /// Locally defined resources that nothing referenced. Informational.
    pub unused: Vec<UnusedEntry>,
    /// Workflow call graph, for order-dependent downstream consumers.
    pub dependency_graph: DependencyGraph,
    /// Deterministic workflow instantiation order.
    pub workflow_order: Vec<String>,
}

/// Validate a project and compute its workflow instantiation order.
///
/// Reference errors are aggregated and returned as one joined error;
/// a call cycle fails with the full chain; a store-listing failure
/// aborts immediately. Unused local resources are logged at warn level
/// and reported, never failed on.
pub async fn validate_and_link<S: ResourceStore>(
    project: &ProjectConfig,
    workflows: &[WorkflowConfig],
    store: Option<&S>,
    cancel: &CancellationToken,
) -> Result<ValidationReport, ValidationError> {
    let mut idx = build_resource_index(project, workflows, store, cancel).await?;
    let graph = validate_references(project, workflows, &mut idx)?;
    detect_cycles(&graph)?;
    let declared: Vec<String> = workflows
        .iter()
        .map(|wf| wf.id.trim().to_string())
        .collect();
    let workflow_order = plan_workflow_order(&declared, &graph)?;

    let unused = idx.unused();
    for entry in &unused {
        warn!(
            kind = %entry.kind,
            id = %entry.id,
            source = entry.source,
            "unused resource definition"
        );
    }
    info!(
        project = %project.name,
        resources = idx.count(),
        workflows = workflow_order.len(),
        "validation and linking complete"
    );
    Ok(ValidationReport {
        resource_count: idx.count(),
        unused,
        dependency_graph: graph,
        workflow_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryResourceStore;
    use conflux_types::agent::AgentConfig;
    use conflux_types::input::Input;
    use conflux_types::knowledge::{EmbedderConfig, KnowledgeBaseConfig, VectorDbConfig};
    use conflux_types::memory::MemoryConfig;
    use conflux_types::resource::ResourceKind;
    use conflux_types::task::TaskConfig;
    use conflux_types::tool::ToolConfig;
    use serde_json::json;

    fn workflow(id: &str) -> WorkflowConfig {
        WorkflowConfig {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Workflow whose single task invokes `target` via the single-call
    /// builtin.
    fn calling_workflow(id: &str, target: &str) -> WorkflowConfig {
        let mut tool = ToolConfig::reference(BUILTIN_CALL_WORKFLOW);
        tool.with = Some(Input::from([("workflow_id".to_string(), json!(target))]));
        let mut wf = workflow(id);
        wf.tasks.push(TaskConfig {
            id: "call".to_string(),
            tool: Some(tool),
            ..Default::default()
        });
        wf
    }

    fn project_with_resources(name: &str) -> ProjectConfig {
        ProjectConfig {
            name: name.to_string(),
            memories: vec![MemoryConfig {
                id: "conversation".to_string(),
                ..Default::default()
            }],
            knowledge_bases: vec![KnowledgeBaseConfig {
                id: "docs".to_string(),
                embedder: "embed".to_string(),
                vector_db: "vdb".to_string(),
                ..Default::default()
            }],
            embedders: vec![EmbedderConfig {
                id: "embed".to_string(),
                ..Default::default()
            }],
            vector_dbs: vec![VectorDbConfig {
                id: "vdb".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn none_store() -> Option<&'static InMemoryResourceStore> {
        None
    }

    // -----------------------------------------------------------------------
    // Full pass
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn full_pass_orders_dependencies_first() {
        let project = project_with_resources("demo");
        // a invokes b and c; b and c invoke d.
        let mut a = calling_workflow("a", "b");
        let mut tool = ToolConfig::reference(BUILTIN_CALL_WORKFLOWS);
        tool.with = Some(Input::from([(
            "workflows".to_string(),
            json!([{"workflow_id": "c"}]),
        )]));
        a.tasks.push(TaskConfig {
            id: "call_more".to_string(),
            tool: Some(tool),
            ..Default::default()
        });
        let workflows = vec![
            a,
            calling_workflow("b", "d"),
            calling_workflow("c", "d"),
            workflow("d"),
        ];

        let cancel = CancellationToken::new();
        let report = validate_and_link(&project, &workflows, none_store(), &cancel)
            .await
            .unwrap();

        let pos = |id: &str| {
            report
                .workflow_order
                .iter()
                .position(|node| node == id)
                .unwrap()
        };
        assert!(pos("d") < pos("b"));
        assert!(pos("d") < pos("c"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("a"));
        // b and c become ready together; b was declared earlier.
        assert!(pos("b") < pos("c"));
    }

    #[tokio::test]
    async fn empty_workflow_set_counts_project_resources_only() {
        let project = project_with_resources("demo");
        let cancel = CancellationToken::new();
        let report = validate_and_link(&project, &[], none_store(), &cancel)
            .await
            .unwrap();

        // conversation, docs, embed, vdb.
        assert_eq!(report.resource_count, 4);
        assert!(report.dependency_graph.is_empty());
        assert!(report.workflow_order.is_empty());
    }

    #[tokio::test]
    async fn call_cycle_fails_with_full_chain() {
        let project = ProjectConfig {
            name: "demo".to_string(),
            ..Default::default()
        };
        let workflows = vec![
            calling_workflow("a", "b"),
            calling_workflow("b", "c"),
            calling_workflow("c", "a"),
        ];
        let cancel = CancellationToken::new();
        let err = validate_and_link(&project, &workflows, none_store(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "workflow dependency cycle: a -> b -> c -> a"
        );
    }

    #[tokio::test]
    async fn missing_references_surface_before_cycle_analysis() {
        let project = ProjectConfig {
            name: "demo".to_string(),
            ..Default::default()
        };
        let workflows = vec![calling_workflow("a", "nowhere")];
        let cancel = CancellationToken::new();
        let err = validate_and_link(&project, &workflows, none_store(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingReferences(_)));
    }

    #[tokio::test]
    async fn unused_resources_are_reported_not_failed() {
        let project = project_with_resources("demo");
        let cancel = CancellationToken::new();
        let report = validate_and_link(&project, &[], none_store(), &cancel)
            .await
            .unwrap();

        let unused_ids: Vec<&str> = report.unused.iter().map(|u| u.id.as_str()).collect();
        // docs' embedder and vector_db were referenced by the knowledge
        // base; the memory and the knowledge base itself were not.
        assert!(unused_ids.contains(&"conversation"));
        assert!(unused_ids.contains(&"docs"));
        assert!(!unused_ids.contains(&"embed"));
        assert!(!unused_ids.contains(&"vdb"));
    }

    #[tokio::test]
    async fn store_known_workflow_resolves_without_graph_edges() {
        let project = ProjectConfig {
            name: "demo".to_string(),
            ..Default::default()
        };
        let workflows = vec![calling_workflow("a", "archived")];
        let store = InMemoryResourceStore::new();
        store.insert("demo", ResourceKind::Workflow, "archived");

        let cancel = CancellationToken::new();
        let report = validate_and_link(&project, &workflows, Some(&store), &cancel)
            .await
            .unwrap();
        assert_eq!(report.dependency_graph.dependencies("a").count(), 0);
        assert_eq!(report.workflow_order, vec!["a"]);
    }

    #[tokio::test]
    async fn repeated_passes_are_idempotent() {
        let project = project_with_resources("demo");
        let workflows = vec![
            calling_workflow("a", "c"),
            workflow("b"),
            workflow("c"),
        ];
        let store = InMemoryResourceStore::new();
        store.insert("demo", ResourceKind::Workflow, "archived");
        store.insert("demo", ResourceKind::Tool, "shared_tool");

        let cancel = CancellationToken::new();
        let first = validate_and_link(&project, &workflows, Some(&store), &cancel)
            .await
            .unwrap();
        let second = validate_and_link(&project, &workflows, Some(&store), &cancel)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn repeated_failing_passes_report_identical_errors() {
        let project = ProjectConfig {
            name: "demo".to_string(),
            ..Default::default()
        };
        let mut wf = workflow("w1");
        wf.tasks.push(TaskConfig {
            id: "t1".to_string(),
            agent: Some(AgentConfig::reference("ghost")),
            memory_ref: Some("gone".to_string()),
            ..Default::default()
        });
        let workflows = vec![wf];

        let cancel = CancellationToken::new();
        let first = validate_and_link(&project, &workflows, none_store(), &cancel)
            .await
            .unwrap_err();
        let second = validate_and_link(&project, &workflows, none_store(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }
}
