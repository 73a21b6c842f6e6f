//! Identity merge: reconcile a fresh structural graph with the previous one.
//!
//! Pure reducer `(old, new) -> merged` with no global state; the orchestrator
//! invokes it on every file-map change. Identity is the node id string, so
//! embeddings and staleness flags ride along across rebuilds as long as the
//! defining name survives.

use std::collections::HashSet;

use codeweb_core::{CodeGraph, EdgeKind};
use tracing::trace;

/// Merge `fresh` against `previous`.
///
/// Node rules, per fresh node:
/// - unknown id: new node, stale, no embedding;
/// - known id, identical code: embedding, staleness, and position carried
///   over unchanged;
/// - known id, changed code: embedding carried over as-is but marked stale.
///   Keeping the outdated vector instead of clearing it avoids an abrupt
///   semantic-edge disappearance in the rendering layer.
///
/// Edge rules: fresh structural edges are taken verbatim (they are always
/// fully recomputed, never merged); previous semantic edges survive only if
/// both endpoints still exist. Dangling semantic edges are dropped silently
/// because deletion is expected, not a fault.
///
/// The merged node-id set is exactly the fresh node-id set.
pub fn merge_graphs(previous: &CodeGraph, fresh: CodeGraph) -> CodeGraph {
    let CodeGraph {
        mut nodes,
        edges: fresh_edges,
    } = fresh;

    for node in &mut nodes {
        match previous.node(&node.id) {
            None => {
                node.is_stale = true;
                node.embedding = None;
            }
            Some(old) if old.code == node.code => {
                node.embedding = old.embedding.clone();
                node.is_stale = old.is_stale;
                node.position = old.position;
            }
            Some(old) => {
                node.embedding = old.embedding.clone();
                node.position = old.position;
                node.is_stale = true;
            }
        }
    }

    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let mut edges: Vec<_> = fresh_edges
        .into_iter()
        .filter(|e| e.kind.is_structural())
        .collect();

    let mut dropped = 0usize;
    for edge in previous.edges_of_kind(EdgeKind::Semantic) {
        if ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()) {
            edges.push(edge.clone());
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        trace!(dropped, "semantic edges pruned on merge");
    }

    CodeGraph { nodes, edges }
}
