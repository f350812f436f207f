//! Workflow configuration.

use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::knowledge::{KnowledgeBaseConfig, KnowledgeBinding};
use crate::task::TaskConfig;
use crate::tool::ToolConfig;

/// A workflow definition: its own agents, tools, and knowledge bases,
/// plus the task tree that executes when the workflow runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolConfig>,
    /// Knowledge bases attached to every task of this workflow.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge: Vec<KnowledgeBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_bases: Vec<KnowledgeBaseConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskConfig>,
}
