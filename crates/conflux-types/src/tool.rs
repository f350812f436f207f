//! Tool configuration types.
//!
//! A `ToolConfig` is either a full inline definition (runtime, code,
//! schemas) or a bare reference to a tool defined elsewhere -- the
//! distinction is structural: a reference carries an id and nothing
//! else. Validation inspects the populated fields to tell the two apart.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::Input;

/// Definition of, or reference to, an executable tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Execution runtime discriminator, e.g. "node" or "python".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Inline source or entrypoint path, depending on the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Execution timeout, e.g. "30s".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    /// Default invocation payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<Input>,
    /// Runtime-specific configuration block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
}

impl ToolConfig {
    /// A bare reference by id, with no defining attributes.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}
