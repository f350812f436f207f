//! Input payload carrier.

use std::collections::HashMap;

/// Free-form `with:` payload attached to tasks, agents, actions, and
/// tools. Values are opaque to validation except for the reserved
/// call-workflow builtin payloads, which are inspected for workflow ids.
pub type Input = HashMap<String, serde_json::Value>;
