//! Task configuration types.
//!
//! Tasks form the executable tree of a workflow. A task may carry an
//! agent or tool (inline or by reference), attach knowledge and memory,
//! and nest further tasks: container types hold a `tasks` list, and
//! collection-style types wrap a single template `task`.

use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::input::Input;
use crate::knowledge::KnowledgeBinding;
use crate::tool::ToolConfig;

/// Execution strategy of a task node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Basic,
    Parallel,
    Collection,
    Composite,
    Router,
    Wait,
}

/// A single node in a workflow's task tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    /// Agent executing this task; a bare id is a reference to a
    /// workflow-level agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentConfig>,
    /// Tool executing this task; a bare id is a reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolConfig>,
    /// Invocation payload, also consulted for call-workflow builtins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<Input>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge: Vec<KnowledgeBinding>,
    /// Id of the memory resource this task reads and writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_ref: Option<String>,
    /// Child tasks of container types (parallel, composite).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskConfig>,
    /// Template task of collection types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Box<TaskConfig>>,
}
