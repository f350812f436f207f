//! Memory configuration types.
//!
//! A memory resource is a named conversational store that agents and
//! tasks attach to by id. Agents hold `MemoryReference` entries; tasks
//! use a bare `memory_ref` id.

use serde::{Deserialize, Serialize};

/// Eviction strategy for a memory resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Bounded by a token budget.
    TokenBased,
    /// Bounded by a message count.
    MessageCount,
    /// Unbounded buffer.
    Buffer,
}

/// Definition of a memory resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub id: String,
    /// Resource-type label; defaults to "memory" when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
}

impl MemoryConfig {
    /// Fill the resource label and memory type when the definition left
    /// them out. Existing values are kept.
    pub fn with_defaults(mut self) -> Self {
        if self.resource.as_deref().unwrap_or("").trim().is_empty() {
            self.resource = Some("memory".to_string());
        }
        if self.memory_type.is_none() {
            self.memory_type = Some(MemoryType::TokenBased);
        }
        self
    }
}

/// Attachment of a memory resource to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryReference {
    pub id: String,
    /// Optional key template scoping the memory instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Access mode, e.g. "read-write" or "read-only".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}
