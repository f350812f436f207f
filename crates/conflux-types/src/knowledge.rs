//! Knowledge base configuration types.
//!
//! A knowledge base pairs an embedder with a vector database; bindings
//! attach an existing knowledge base to a project, workflow, agent, or
//! task by id.

use serde::{Deserialize, Serialize};

/// Attachment of a knowledge base by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBinding {
    pub id: String,
}

impl KnowledgeBinding {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Definition of a knowledge base.
///
/// `embedder` and `vector_db` are ids of separately defined resources;
/// both must resolve during validation when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub embedder: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vector_db: String,
}

/// Definition of an embedding model endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedderConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
}

/// Definition of a vector database connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorDbConfig {
    pub id: String,
    /// Backend discriminator, e.g. "pgvector" or "qdrant".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Backend-specific connection options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}
