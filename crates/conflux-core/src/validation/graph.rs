//! Workflow call graph and cycle detection.
//!
//! The graph maps each locally defined workflow to the set of workflows
//! it invokes through the call-workflow builtins. Ordered maps back the
//! adjacency so node iteration -- and therefore DFS start order and the
//! rendered cycle chain -- is stable across runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use conflux_types::error::ValidationError;

/// Directed graph of workflow-to-workflow call dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with no dependencies yet. No-op on a blank id.
    pub fn add_node(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.edges.entry(id.to_string()).or_default();
    }

    /// Record that `from` invokes `to`. No-op when either id is blank.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from.trim().is_empty() || to.trim().is_empty() {
            return;
        }
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    /// All node ids, in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// The workflows `id` invokes. Empty for unknown ids.
    pub fn dependencies(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(id)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

/// Check the whole graph for circular call dependencies.
///
/// Iterative DFS with an explicit ordered recursion stack. On meeting a
/// node already in the Visiting state, the cycle is the stack suffix
/// from that node's first occurrence, closed by the node itself, and the
/// pass fails with the full chain (e.g. `a -> b -> c -> a`).
pub fn detect_cycles(graph: &DependencyGraph) -> Result<(), ValidationError> {
    let mut state: HashMap<&str, VisitState> = HashMap::new();

    for start in graph.nodes() {
        if state.get(start).copied().unwrap_or(VisitState::Unvisited) != VisitState::Unvisited {
            continue;
        }
        // Each frame holds a node and a cursor into its dependency list;
        // `path` mirrors the frames as the ordered recursion stack.
        let mut frames: Vec<(&str, Vec<&str>, usize)> = Vec::new();
        let mut path: Vec<&str> = Vec::new();

        state.insert(start, VisitState::Visiting);
        path.push(start);
        frames.push((start, graph.dependencies(start).collect(), 0));

        while !frames.is_empty() {
            let next = {
                let (_, deps, cursor) = frames.last_mut().expect("frames is non-empty");
                if *cursor < deps.len() {
                    let dep = deps[*cursor];
                    *cursor += 1;
                    Some(dep)
                } else {
                    None
                }
            };
            match next {
                Some(dep) => match state.get(dep).copied().unwrap_or(VisitState::Unvisited) {
                    VisitState::Unvisited => {
                        state.insert(dep, VisitState::Visiting);
                        path.push(dep);
                        frames.push((dep, graph.dependencies(dep).collect(), 0));
                    }
                    VisitState::Visiting => {
                        let first = path.iter().position(|node| *node == dep).unwrap_or(0);
                        let mut chain: Vec<String> =
                            path[first..].iter().map(|node| node.to_string()).collect();
                        chain.push(dep.to_string());
                        return Err(ValidationError::DependencyCycle { chain });
                    }
                    VisitState::Visited => {}
                },
                None => {
                    let (node, _, _) = frames.pop().expect("frames is non-empty");
                    state.insert(node, VisitState::Visited);
                    path.pop();
                }
            }
        }
    }
    Ok(())
}
