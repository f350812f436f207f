//! Deterministic workflow instantiation order.
//!
//! Kahn's algorithm over the call graph, with one twist: when several
//! nodes are ready at once, the one declared earliest wins. Ties are
//! never broken by container iteration order -- every node carries an
//! explicit declared index.

use std::collections::HashMap;

use conflux_types::error::ValidationError;

use super::graph::DependencyGraph;

/// Compute a linear instantiation order consistent with the call graph:
/// every workflow appears after the workflows it invokes.
///
/// `declared` is the original declaration order and supplies the
/// tie-breaking index; graph nodes missing from it are assigned indices
/// beyond all declared ones. Cycles were rejected before this runs, so a
/// short output here is a safety net, not the primary detector.
pub fn plan_workflow_order(
    declared: &[String],
    graph: &DependencyGraph,
) -> Result<Vec<String>, ValidationError> {
    let mut declared_index: HashMap<&str, usize> = declared
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();
    let mut nodes: Vec<&str> = Vec::with_capacity(graph.node_count());
    for node in graph.nodes() {
        nodes.push(node);
        if !declared_index.contains_key(node) {
            let appended = declared_index.len() + nodes.len();
            declared_index.insert(node, appended);
        }
    }

    // A node's indegree is its dependency count; its dependencies must
    // be instantiated first.
    let mut indegree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in graph.nodes() {
        for dep in graph.dependencies(node) {
            *indegree.entry(node).or_insert(0) += 1;
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut ready: Vec<&str> = nodes
        .iter()
        .copied()
        .filter(|node| indegree.get(node).copied().unwrap_or(0) == 0)
        .collect();
    let mut order: Vec<String> = Vec::with_capacity(nodes.len());
    while !ready.is_empty() {
        let best = next_by_declared(&ready, &declared_index);
        let node = ready.remove(best);
        order.push(node.to_string());
        if let Some(nodes_after) = dependents.get(node) {
            for dependent in nodes_after {
                let remaining = indegree
                    .get_mut(dependent)
                    .expect("dependent has an indegree entry");
                *remaining -= 1;
                if *remaining == 0 {
                    ready.push(dependent);
                }
            }
        }
    }

    if order.len() != nodes.len() {
        return Err(ValidationError::OrderingFailed);
    }
    Ok(order)
}

/// Index of the ready node with the smallest declared index. Linear
/// scan; the ready set stays small for realistic graph sizes.
fn next_by_declared(ready: &[&str], declared_index: &HashMap<&str, usize>) -> usize {
    let mut best = 0;
    for i in 1..ready.len() {
        if declared_index[ready[i]] < declared_index[ready[best]] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn empty_graph_yields_empty_order() {
        let order = plan_workflow_order(&[], &DependencyGraph::new()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn independent_nodes_follow_declared_order() {
        let mut graph = DependencyGraph::new();
        graph.add_node("c");
        graph.add_node("a");
        graph.add_node("b");
        let order = plan_workflow_order(&declared(&["c", "a", "b"]), &graph).unwrap();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn dependencies_come_before_dependents() {
        // a invokes b: b must be instantiated first.
        let mut graph = DependencyGraph::new();
        graph.add_node("a");
        graph.add_node("b");
        graph.add_edge("a", "b");
        let order = plan_workflow_order(&declared(&["a", "b"]), &graph).unwrap();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn diamond_breaks_ties_by_declared_index() {
        // a -> {b, c}, {b, c} -> d. d is ready first; then b and c are
        // ready together and b (declared earlier) must win.
        let mut graph = DependencyGraph::new();
        for node in ["a", "b", "c", "d"] {
            graph.add_node(node);
        }
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "d");
        graph.add_edge("c", "d");
        let order = plan_workflow_order(&declared(&["a", "b", "c", "d"]), &graph).unwrap();
        assert_eq!(order, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn declared_order_controls_tie_not_lexicographic_order() {
        let mut graph = DependencyGraph::new();
        graph.add_node("alpha");
        graph.add_node("zeta");
        let order = plan_workflow_order(&declared(&["zeta", "alpha"]), &graph).unwrap();
        assert_eq!(order, vec!["zeta", "alpha"]);
    }

    #[test]
    fn undeclared_nodes_sort_after_declared_ones() {
        let mut graph = DependencyGraph::new();
        graph.add_node("late");
        graph.add_node("a");
        let order = plan_workflow_order(&declared(&["a"]), &graph).unwrap();
        assert_eq!(order, vec!["a", "late"]);
    }

    #[test]
    fn cycle_fails_ordering() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        let err = plan_workflow_order(&declared(&["a", "b"]), &graph).unwrap_err();
        assert!(matches!(err, ValidationError::OrderingFailed));
    }

    #[test]
    fn partial_cycle_still_orders_nothing() {
        // a <-> b cycle plus a free node c: Kahn emits c then stalls.
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_node("c");
        let err = plan_workflow_order(&declared(&["a", "b", "c"]), &graph).unwrap_err();
        assert!(matches!(err, ValidationError::OrderingFailed));
    }
}
