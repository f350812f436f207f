//! Reference walker.
//!
//! Visits every structural location in a project/workflow tree that can
//! hold a resource id, resolves it against the [`ResourceIndex`], and
//! collects one [`MissingReference`] per failure -- the walk never stops
//! at the first defect. Call-workflow builtin payloads discovered along
//! the way become edges of the returned [`DependencyGraph`].
//!
//! A task's agent or tool field counts as a reference only when the id
//! is the sole populated attribute; anything richer is an inline
//! definition and is not checked against the index.

use conflux_types::agent::AgentConfig;
use conflux_types::error::{MissingReference, MissingReferences, ValidationError};
use conflux_types::input::Input;
use conflux_types::knowledge::{KnowledgeBaseConfig, KnowledgeBinding};
use conflux_types::project::ProjectConfig;
use conflux_types::resource::ResourceKind;
use conflux_types::task::TaskConfig;
use conflux_types::tool::ToolConfig;
use conflux_types::workflow::WorkflowConfig;

use super::graph::DependencyGraph;
use super::index::ResourceIndex;

/// Engine-reserved tool id invoking a single workflow.
pub const BUILTIN_CALL_WORKFLOW: &str = "cx__call_workflow";
/// Engine-reserved tool id invoking a batch of workflows.
pub const BUILTIN_CALL_WORKFLOWS: &str = "cx__call_workflows";

/// Walk the whole project/workflow tree, marking resolved references in
/// `idx` and collecting workflow call edges.
///
/// Returns the dependency graph on success, or every unresolved
/// reference joined into a single error.
pub fn validate_references(
    project: &ProjectConfig,
    workflows: &[WorkflowConfig],
    idx: &mut ResourceIndex,
) -> Result<DependencyGraph, ValidationError> {
    let mut graph = DependencyGraph::new();
    for wf in workflows {
        graph.add_node(wf.id.trim());
    }
    let mut errs: Vec<MissingReference> = Vec::new();

    check_knowledge_bindings("project.knowledge", &project.knowledge, idx, &mut errs);
    for kb in &project.knowledge_bases {
        let path = format!("project.knowledge_base.{}", kb.id);
        check_knowledge_base(idx, kb, &path, &mut errs);
    }
    for tool in &project.tools {
        check_tool_reference(
            idx,
            &mut graph,
            &project.name,
            "project.tool",
            tool,
            tool.with.as_ref(),
            &mut errs,
        );
    }
    for wf in workflows {
        let wf_id = wf.id.trim();
        let wf_path = format!("workflow.{wf_id}");
        check_workflow(idx, &mut graph, wf_id, wf, &wf_path, &mut errs);
    }

    if errs.is_empty() {
        Ok(graph)
    } else {
        Err(MissingReferences(errs).into())
    }
}

fn check_workflow(
    idx: &mut ResourceIndex,
    graph: &mut DependencyGraph,
    wf_id: &str,
    wf: &WorkflowConfig,
    wf_path: &str,
    errs: &mut Vec<MissingReference>,
) {
    check_knowledge_bindings(&format!("{wf_path}.knowledge"), &wf.knowledge, idx, errs);
    for kb in &wf.knowledge_bases {
        let path = format!("{wf_path}.knowledge_base.{}", kb.id);
        check_knowledge_base(idx, kb, &path, errs);
    }
    for agent in &wf.agents {
        let path = format!("{wf_path}.agent.{}", agent.id);
        check_agent(idx, graph, wf_id, agent, &path, errs);
    }
    for tool in &wf.tools {
        check_tool_reference(
            idx,
            graph,
            wf_id,
            &format!("{wf_path}.tool"),
            tool,
            tool.with.as_ref(),
            errs,
        );
    }
    check_tasks(idx, graph, wf_id, &wf.tasks, &format!("{wf_path}.tasks"), errs);
}

fn check_tasks(
    idx: &mut ResourceIndex,
    graph: &mut DependencyGraph,
    wf_id: &str,
    tasks: &[TaskConfig],
    base_path: &str,
    errs: &mut Vec<MissingReference>,
) {
    for (i, task) in tasks.iter().enumerate() {
        let path = task_path(base_path, &task.id, i);
        check_task(idx, graph, wf_id, task, &path, errs);
    }
}

fn check_task(
    idx: &mut ResourceIndex,
    graph: &mut DependencyGraph,
    wf_id: &str,
    task: &TaskConfig,
    path: &str,
    errs: &mut Vec<MissingReference>,
) {
    if let Some(agent) = &task.agent {
        if is_agent_reference(agent) && !idx.mark(ResourceKind::Agent, &agent.id) {
            errs.push(MissingReference {
                path: format!("{path}.agent"),
                kind: ResourceKind::Agent,
                id: agent.id.clone(),
            });
        }
    }
    if let Some(tool) = &task.tool {
        check_tool_reference(
            idx,
            graph,
            wf_id,
            &format!("{path}.tool"),
            tool,
            task.with.as_ref(),
            errs,
        );
    }
    check_knowledge_bindings(&format!("{path}.knowledge"), &task.knowledge, idx, errs);
    if let Some(memory_ref) = &task.memory_ref {
        if !memory_ref.trim().is_empty() && !idx.mark(ResourceKind::Memory, memory_ref) {
            errs.push(MissingReference {
                path: format!("{path}.memory_ref"),
                kind: ResourceKind::Memory,
                id: memory_ref.clone(),
            });
        }
    }
    if !task.tasks.is_empty() {
        check_tasks(idx, graph, wf_id, &task.tasks, &format!("{path}.tasks"), errs);
    }
    if let Some(child) = &task.task {
        check_task(idx, graph, wf_id, child, &format!("{path}.task"), errs);
    }
}

fn check_agent(
    idx: &mut ResourceIndex,
    graph: &mut DependencyGraph,
    wf_id: &str,
    agent: &AgentConfig,
    base_path: &str,
    errs: &mut Vec<MissingReference>,
) {
    check_knowledge_bindings(&format!("{base_path}.knowledge"), &agent.knowledge, idx, errs);
    for mem in &agent.memory {
        if !idx.mark(ResourceKind::Memory, &mem.id) {
            errs.push(MissingReference {
                path: format!("{base_path}.memory"),
                kind: ResourceKind::Memory,
                id: mem.id.clone(),
            });
        }
    }
    for tool in &agent.tools {
        check_tool_reference(
            idx,
            graph,
            wf_id,
            &format!("{base_path}.tool"),
            tool,
            agent.with.as_ref(),
            errs,
        );
    }
    for action in &agent.actions {
        let action_path = format!("{base_path}.action.{}", action.id);
        for tool in &action.tools {
            check_tool_reference(
                idx,
                graph,
                wf_id,
                &format!("{action_path}.tool"),
                tool,
                action.with.as_ref(),
                errs,
            );
        }
    }
}

fn check_knowledge_bindings(
    path: &str,
    bindings: &[KnowledgeBinding],
    idx: &mut ResourceIndex,
    errs: &mut Vec<MissingReference>,
) {
    for binding in bindings {
        if !idx.mark(ResourceKind::KnowledgeBase, &binding.id) {
            errs.push(MissingReference {
                path: path.to_string(),
                kind: ResourceKind::KnowledgeBase,
                id: binding.id.clone(),
            });
        }
    }
}

fn check_knowledge_base(
    idx: &mut ResourceIndex,
    kb: &KnowledgeBaseConfig,
    path: &str,
    errs: &mut Vec<MissingReference>,
) {
    if !kb.embedder.is_empty() && !idx.mark(ResourceKind::Embedder, &kb.embedder) {
        errs.push(MissingReference {
            path: format!("{path}.embedder"),
            kind: ResourceKind::Embedder,
            id: kb.embedder.clone(),
        });
    }
    if !kb.vector_db.is_empty() && !idx.mark(ResourceKind::VectorDb, &kb.vector_db) {
        errs.push(MissingReference {
            path: format!("{path}.vector_db"),
            kind: ResourceKind::VectorDb,
            id: kb.vector_db.clone(),
        });
    }
}

/// Resolve a tool slot: existence check for plain references, and
/// call-workflow dependency extraction for the two builtins.
///
/// `caller` is the graph node charged with any discovered call edges --
/// the enclosing workflow id, or the project name for project tools.
fn check_tool_reference(
    idx: &mut ResourceIndex,
    graph: &mut DependencyGraph,
    caller: &str,
    path: &str,
    tool: &ToolConfig,
    input: Option<&Input>,
    errs: &mut Vec<MissingReference>,
) {
    let tool_id = tool.id.trim();
    if !tool_id.is_empty()
        && is_tool_reference(tool)
        && !is_builtin_tool(tool_id)
        && !idx.mark(ResourceKind::Tool, tool_id)
    {
        errs.push(MissingReference {
            path: path.to_string(),
            kind: ResourceKind::Tool,
            id: tool_id.to_string(),
        });
    }
    for dep in collect_workflow_dependencies(tool_id, input) {
        let known = idx
            .info(ResourceKind::Workflow, &dep)
            .map(|info| info.external());
        match known {
            None => errs.push(MissingReference {
                path: path.to_string(),
                kind: ResourceKind::Workflow,
                id: dep.clone(),
            }),
            Some(external) => {
                idx.mark(ResourceKind::Workflow, &dep);
                // The internals of store-only workflows are unknown, so
                // they are verified but kept out of cycle/order analysis.
                if !external {
                    graph.add_edge(caller, &dep);
                }
            }
        }
    }
}

fn task_path(base: &str, id: &str, index: usize) -> String {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        format!("{base}[{index}]")
    } else {
        format!("{base}.{trimmed}")
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().unwrap_or("").trim().is_empty()
}

/// An agent slot is a reference when its id is set and every defining
/// attribute is absent.
fn is_agent_reference(agent: &AgentConfig) -> bool {
    if agent.id.trim().is_empty() {
        return false;
    }
    if !is_blank(&agent.instructions) {
        return false;
    }
    if agent.model.is_some() {
        return false;
    }
    if agent.with.as_ref().is_some_and(|with| !with.is_empty()) {
        return false;
    }
    if agent.env.as_ref().is_some_and(|env| !env.is_empty()) {
        return false;
    }
    agent.actions.is_empty()
        && agent.tools.is_empty()
        && agent.knowledge.is_empty()
        && agent.memory.is_empty()
}

/// A tool slot is a reference when its id is set and every defining
/// attribute is absent.
fn is_tool_reference(tool: &ToolConfig) -> bool {
    if tool.id.trim().is_empty() {
        return false;
    }
    tool.name.as_deref().is_none_or(str::is_empty)
        && tool.description.as_deref().is_none_or(str::is_empty)
        && tool.runtime.as_deref().is_none_or(str::is_empty)
        && tool.code.as_deref().is_none_or(str::is_empty)
        && tool.timeout.as_deref().is_none_or(str::is_empty)
        && tool.input_schema.is_none()
        && tool.output_schema.is_none()
        && tool.with.is_none()
        && tool.config.is_none()
        && tool.env.is_none()
}

fn is_builtin_tool(id: &str) -> bool {
    matches!(id, BUILTIN_CALL_WORKFLOW | BUILTIN_CALL_WORKFLOWS)
}

/// Workflow ids a builtin call-workflow tool invocation targets.
///
/// The single-call builtin carries a `workflow_id` string; the batch
/// builtin carries a `workflows` list of maps, each with its own
/// `workflow_id`. Malformed or missing entries are silently skipped.
fn collect_workflow_dependencies(tool_id: &str, input: Option<&Input>) -> Vec<String> {
    match tool_id {
        BUILTIN_CALL_WORKFLOW => collect_single_workflow_dependency(input),
        BUILTIN_CALL_WORKFLOWS => collect_batch_workflow_dependencies(input),
        _ => Vec::new(),
    }
}

fn collect_single_workflow_dependency(input: Option<&Input>) -> Vec<String> {
    let Some(input) = input else {
        return Vec::new();
    };
    match input.get("workflow_id") {
        Some(serde_json::Value::String(id)) if !id.trim().is_empty() => {
            vec![id.trim().to_string()]
        }
        _ => Vec::new(),
    }
}

fn collect_batch_workflow_dependencies(input: Option<&Input>) -> Vec<String> {
    let Some(input) = input else {
        return Vec::new();
    };
    let Some(serde_json::Value::Array(items)) = input.get("workflows") else {
        return Vec::new();
    };
    let mut deps = Vec::with_capacity(items.len());
    for item in items {
        let serde_json::Value::Object(entry) = item else {
            continue;
        };
        if let Some(serde_json::Value::String(id)) = entry.get("workflow_id") {
            if !id.trim().is_empty() {
                deps.push(id.trim().to_string());
            }
        }
    }
    deps
}
