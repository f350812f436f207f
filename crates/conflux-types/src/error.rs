//! Error types for validation and the resource store.

use std::fmt;

use thiserror::Error;

use crate::resource::ResourceKind;

/// Errors from the durable resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("operation cancelled")]
    Cancelled,
}

/// A single unresolved symbolic reference, with the dotted structural
/// path of the location that held it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    /// Dotted path to the referencing location, e.g. `workflow.w1.tasks.t1.agent`.
    pub path: String,
    /// The kind of resource the reference expected to find.
    pub kind: ResourceKind,
    /// The id that failed to resolve, as written.
    pub id: String,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} references missing {} {:?}", self.path, self.kind, self.id)
    }
}

/// Every unresolved reference found in one validation walk, joined into
/// a single error value. The walk never fails fast; callers receive the
/// whole set at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReferences(pub Vec<MissingReference>);

impl fmt::Display for MissingReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, missing) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{missing}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MissingReferences {}

/// Errors from the pre-execution validation pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A store listing failed; the whole pass aborts.
    #[error("list {kind} resources: {source}")]
    StoreList { kind: ResourceKind, source: StoreError },

    /// The pass was cancelled at the store-listing boundary.
    #[error("validation cancelled")]
    Cancelled,

    /// One or more symbolic references did not resolve.
    #[error("{0}")]
    MissingReferences(#[from] MissingReferences),

    /// The workflow call graph contains a cycle; `chain` closes back on
    /// its first node.
    #[error("workflow dependency cycle: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    /// Topological ordering produced fewer nodes than the graph holds.
    #[error("workflow dependency ordering failed due to cycle")]
    OrderingFailed,
}
