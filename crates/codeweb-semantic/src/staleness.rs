//! Derived staleness view: which nodes need a fresh embedding.
//!
//! Pure computed view over a graph snapshot, recomputed on every change.
//! Used to gate embedder calls and drive UI affordances ("N pending
//! updates"). No mutation, no side effects.

use codeweb_core::{CodeGraph, Node};

/// The set of nodes whose embedding is missing or stale.
pub fn pending_nodes(graph: &CodeGraph) -> Vec<&Node> {
    graph
        .nodes
        .iter()
        .filter(|n| n.is_embeddable() && (n.embedding.is_none() || n.is_stale))
        .collect()
}

/// How many nodes need a fresh embedding.
pub fn pending_count(graph: &CodeGraph) -> usize {
    pending_nodes(graph).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeweb_core::Node;

    #[test]
    fn test_counts_unembedded_and_stale_functions_only() {
        let mut done = Node::function("done", "def done():\n    pass", 1);
        done.embedding = Some(vec![1.0]);
        done.is_stale = false;

        let mut stale = Node::function("stale", "def stale():\n    pass", 1);
        stale.embedding = Some(vec![1.0]);
        stale.is_stale = true;

        let fresh = Node::function("fresh", "def fresh():\n    pass", 1);
        let module = Node::module("a.py", "x = 1", "python", 1);

        let graph = CodeGraph {
            nodes: vec![done, stale, fresh, module],
            edges: vec![],
        };

        let pending = pending_nodes(&graph);
        let ids: Vec<&str> = pending.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["fn-stale", "fn-fresh"]);
        assert_eq!(pending_count(&graph), 2);
    }

    #[test]
    fn test_empty_graph_has_no_pending() {
        assert_eq!(pending_count(&CodeGraph::empty()), 0);
    }
}
