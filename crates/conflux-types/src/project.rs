//! Project configuration.

use serde::{Deserialize, Serialize};

use crate::knowledge::{EmbedderConfig, KnowledgeBaseConfig, KnowledgeBinding, VectorDbConfig};
use crate::memory::MemoryConfig;
use crate::tool::ToolConfig;

/// A project definition: the shared resources every workflow in the
/// project can reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memories: Vec<MemoryConfig>,
    /// Knowledge bases attached project-wide.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge: Vec<KnowledgeBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_bases: Vec<KnowledgeBaseConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedders: Vec<EmbedderConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector_dbs: Vec<VectorDbConfig>,
}
