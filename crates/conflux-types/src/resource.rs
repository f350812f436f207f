//! Resource kind taxonomy.
//!
//! Every reusable object in a Conflux project belongs to exactly one of
//! seven kinds. The validation core buckets its index by kind, and the
//! durable store lists ids per kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The seven reusable-object categories of a Conflux project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Workflow,
    Agent,
    Tool,
    KnowledgeBase,
    Memory,
    Embedder,
    VectorDb,
}

impl ResourceKind {
    /// All kinds, in the order the store is consulted during index build.
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Workflow,
        ResourceKind::Agent,
        ResourceKind::Tool,
        ResourceKind::KnowledgeBase,
        ResourceKind::Memory,
        ResourceKind::Embedder,
        ResourceKind::VectorDb,
    ];

    /// The canonical snake_case label, as used in error messages and
    /// provenance tags.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Workflow => "workflow",
            ResourceKind::Agent => "agent",
            ResourceKind::Tool => "tool",
            ResourceKind::KnowledgeBase => "knowledge_base",
            ResourceKind::Memory => "memory",
            ResourceKind::Embedder => "embedder",
            ResourceKind::VectorDb => "vector_db",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow" => Ok(ResourceKind::Workflow),
            "agent" => Ok(ResourceKind::Agent),
            "tool" => Ok(ResourceKind::Tool),
            "knowledge_base" => Ok(ResourceKind::KnowledgeBase),
            "memory" => Ok(ResourceKind::Memory),
            "embedder" => Ok(ResourceKind::Embedder),
            "vector_db" => Ok(ResourceKind::VectorDb),
            other => Err(format!("invalid resource kind: '{other}'")),
        }
    }
}
