//! The orchestrator that owns the file map and the live graph value.
//!
//! Components below this layer are pure `(old, input) -> new` functions; the
//! engine supplies the sequencing the concurrency model requires:
//!
//! - structural rebuild (build + merge) runs synchronously, within one
//!   reactive cycle, on every file-map change;
//! - the semantic pass is the sole suspending operation; taking `&mut self`
//!   means the borrow checker holds it to one in-flight pass, no runtime
//!   guard needed;
//! - the graph is replaced wholesale on every change, never mutated in place
//!   across cycles, so snapshot reads need no locks.
//!
//! A structural rebuild racing an in-flight semantic pass is accepted: the
//! result applied later wins, and the next rebuild's staleness marking
//! corrects any drift.

use std::sync::Arc;

use codeweb_build::{build_graph, function_span, merge_graphs};
use codeweb_core::{CodeGraph, EdgeKind, FileMap, NodeKind};
use codeweb_semantic::{pending_count, Embedder, SimilarityEngine};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::events::{EventLog, GraphEvent};

/// Coordinates parsing, merging, and semantic passes over one file set.
pub struct CodewebEngine {
    files: FileMap,
    graph: CodeGraph,
    similarity: SimilarityEngine,
    events: EventLog,
}

impl CodewebEngine {
    /// Create an engine with an empty file map.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            files: FileMap::new(),
            graph: CodeGraph::empty(),
            similarity: SimilarityEngine::new(embedder),
            events: EventLog::default(),
        }
    }

    /// Create an engine and run the initial build over `files`.
    pub fn with_files(embedder: Arc<dyn Embedder>, files: FileMap) -> Self {
        let mut engine = Self::new(embedder);
        engine.set_files(files);
        engine
    }

    /// Current graph snapshot.
    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    /// Current file map.
    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Recorded lifecycle events, oldest first.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// How many nodes currently need a fresh embedding.
    pub fn pending_updates(&self) -> usize {
        pending_count(&self.graph)
    }

    /// Replace the whole file map (bulk upload) and rebuild.
    pub fn set_files(&mut self, files: FileMap) {
        self.files = files;
        self.rebuild();
    }

    /// Add or update one file (watcher event) and rebuild.
    pub fn upsert_file(&mut self, filename: impl Into<String>, text: impl Into<String>) {
        self.files.insert(filename.into(), text.into());
        self.rebuild();
    }

    /// Remove one file and rebuild; nodes it defined vanish and any semantic
    /// edges touching them are pruned by the merge.
    pub fn remove_file(&mut self, filename: &str) {
        if self.files.remove(filename).is_some() {
            self.rebuild();
        }
    }

    /// Apply an editor change to the node's backing source. For a module
    /// node the whole file is replaced; for a function node the block is
    /// located by its header and spliced in, preserving surrounding content.
    /// The node is marked stale synchronously before the rebuild so the UI
    /// reflects the pending update immediately.
    pub fn apply_code_change(&mut self, node_id: &str, new_code: &str) -> EngineResult<()> {
        let node = self
            .graph
            .node(node_id)
            .cloned()
            .ok_or_else(|| EngineError::NodeNotFound {
                id: node_id.to_string(),
            })?;

        match node.kind {
            NodeKind::Module => {
                self.files.insert(node.label.clone(), new_code.to_string());
            }
            NodeKind::Function => {
                let filename = self.owning_file(node_id)?;
                let text =
                    self.files
                        .get(&filename)
                        .ok_or_else(|| EngineError::FileNotFound {
                            filename: filename.clone(),
                        })?;
                let spliced = splice_function(text, &node.label, new_code).ok_or_else(|| {
                    EngineError::FunctionNotInFile {
                        name: node.label.clone(),
                        filename: filename.clone(),
                    }
                })?;
                self.files.insert(filename, spliced);
            }
            NodeKind::Note => {
                return Err(EngineError::NodeNotEditable {
                    id: node_id.to_string(),
                    kind: "note".to_string(),
                })
            }
        }

        if let Some(live) = self.graph.node_mut(node_id) {
            live.is_stale = true;
        }
        self.events.append(GraphEvent::CodeChanged {
            node_id: node_id.to_string(),
        });

        self.rebuild();
        Ok(())
    }

    /// Run one semantic pass over a snapshot of the current graph, applying
    /// the result on completion. Exclusive access through `&mut self` means
    /// at most one pass can be in flight per engine.
    pub async fn recalculate(&mut self) {
        let pending_before = self.pending_updates();
        let snapshot = self.graph.clone();
        let updated = self.similarity.recompute(&snapshot).await;

        // Completion order wins under the accepted rebuild race.
        self.graph = updated;
        let pending_after = self.pending_updates();
        self.events.append(GraphEvent::SemanticPass {
            pending_before,
            pending_after,
        });
    }

    /// Rebuild the structural graph from the file map and merge it against
    /// the previous graph. Synchronous, no I/O.
    fn rebuild(&mut self) {
        let fresh = build_graph(&self.files);
        self.graph = merge_graphs(&self.graph, fresh);

        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            pending = self.pending_updates(),
            "graph rebuilt"
        );
        self.events.append(GraphEvent::Rebuilt {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
        });
    }

    /// Resolve a function node's owning file via its Imports edge.
    fn owning_file(&self, node_id: &str) -> EngineResult<String> {
        self.graph
            .edges_of_kind(EdgeKind::Imports)
            .find(|e| e.source == node_id)
            .and_then(|e| self.graph.node(&e.target))
            .map(|module| module.label.clone())
            .ok_or_else(|| EngineError::OwningFileUnknown {
                id: node_id.to_string(),
            })
    }
}

/// Replace a function's block in `text` with `new_code`, preserving all
/// surrounding file content. Returns `None` when no matching header exists.
fn splice_function(text: &str, name: &str, new_code: &str) -> Option<String> {
    let (start, end) = function_span(text, name)?;
    let lines: Vec<&str> = text.lines().collect();

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend(&lines[..start]);
    out.extend(new_code.lines());
    out.extend(&lines[end..]);

    let mut joined = out.join("\n");
    if text.ends_with('\n') {
        joined.push('\n');
    }
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_replaces_only_the_block() {
        let text = "import os\n\ndef f():\n    return 1\n\ndef g():\n    return 2\n";
        let spliced = splice_function(text, "f", "def f():\n    return 99").unwrap();
        assert_eq!(
            spliced,
            "import os\n\ndef f():\n    return 99\ndef g():\n    return 2\n"
        );
    }

    #[test]
    fn test_splice_missing_function() {
        assert!(splice_function("x = 1\n", "f", "def f():\n    pass").is_none());
    }
}
