//! In-memory event log of graph lifecycle moments.
//!
//! The rendering layer consumes whole-graph snapshots, so the log exists for
//! inspection and testing rather than replay: it records what the engine did
//! and in what order.

use serde::{Deserialize, Serialize};

/// Moments worth recording across the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    /// A structural rebuild plus merge completed.
    Rebuilt { nodes: usize, edges: usize },
    /// Editor code was spliced into a node's owning file.
    CodeChanged { node_id: String },
    /// A semantic pass finished and its result was applied.
    SemanticPass { pending_before: usize, pending_after: usize },
}

/// Append-only log in insertion order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GraphEvent>,
}

impl EventLog {
    pub fn append(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
