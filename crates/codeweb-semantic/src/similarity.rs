//! Semantic similarity engine.
//!
//! Given the current merged graph and an [`Embedder`], refresh embeddings
//! for every eligible node (fan-out/fan-in, one request per node) and, when
//! anything new arrived, recompute the whole semantic edge set from scratch.
//! Incremental patching of semantic edges is deliberately avoided: a full
//! recompute over the embedded pairs is cheap and cannot drift.
//!
//! The engine does not serialize itself; holding it to one in-flight pass is
//! the caller's job (the orchestrator runs it through `&mut self`).

use std::sync::Arc;

use codeweb_core::{CodeGraph, Edge, EdgeKind, Embedding, Node};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::clean::embedding_input;
use crate::embedder::Embedder;

/// Minimum cosine similarity, exclusive, for a semantic edge to exist.
pub const SIMILARITY_THRESHOLD: f32 = 0.75;

/// Cosine similarity `dot(a,b) / (|a|·|b|)`, defined as 0 when either vector
/// has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

/// Recomputes embeddings and semantic edges over graph snapshots.
pub struct SimilarityEngine {
    embedder: Arc<dyn Embedder>,
    threshold: f32,
}

impl SimilarityEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            threshold: SIMILARITY_THRESHOLD,
        }
    }

    /// Override the edge threshold (tests and tuning).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run one full pass over a snapshot of the graph and return the updated
    /// graph value. The input is left untouched; callers replace their graph
    /// wholesale with the result (completion order wins under the accepted
    /// rebuild race).
    pub async fn recompute(&self, snapshot: &CodeGraph) -> CodeGraph {
        let mut graph = snapshot.clone();

        let requests: Vec<(String, String)> = graph
            .nodes
            .iter()
            .filter(|n| is_eligible(n))
            .map(|n| (n.id.clone(), embedding_input(n)))
            .collect();

        debug!(
            eligible = requests.len(),
            model = self.embedder.model_name(),
            "embedding pass starting"
        );

        let embedder = Arc::clone(&self.embedder);
        let results = join_all(requests.into_iter().map(|(id, text)| {
            let embedder = Arc::clone(&embedder);
            async move { (id, embedder.embed(&text).await) }
        }))
        .await;

        let mut embedded = 0usize;
        let mut failed = 0usize;
        for (id, result) in results {
            match result {
                Ok(vector) => {
                    if let Some(node) = graph.node_mut(&id) {
                        node.embedding = Some(vector);
                        node.is_stale = false;
                        embedded += 1;
                    }
                }
                Err(error) => {
                    // The node stays stale and is retried on the next pass.
                    warn!(node = %id, %error, "embedding failed, skipping node");
                    failed += 1;
                }
            }
        }

        if embedded > 0 {
            let semantic = semantic_edges(&graph.nodes, self.threshold);
            let kept = semantic.len();
            graph.edges.retain(|e| e.kind != EdgeKind::Semantic);
            graph.edges.extend(semantic);
            info!(embedded, failed, semantic_edges = kept, "semantic pass complete");
        } else {
            debug!(failed, "no new embeddings, semantic edges untouched");
        }

        graph
    }
}

/// Eligibility: function in the supported language, non-empty code, and
/// either never embedded or stale.
fn is_eligible(node: &Node) -> bool {
    node.is_embeddable()
        && !node.code.trim().is_empty()
        && (node.embedding.is_none() || node.is_stale)
}

/// Full pairwise recompute over every node carrying an embedding. Emits an
/// edge only when similarity strictly exceeds `threshold`, storing the raw
/// score as the weight.
pub fn semantic_edges(nodes: &[Node], threshold: f32) -> Vec<Edge> {
    let embedded: Vec<(&str, &Embedding)> = nodes
        .iter()
        .filter_map(|n| n.embedding.as_ref().map(|e| (n.id.as_str(), e)))
        .collect();

    let mut edges = Vec::new();
    for (i, (id_a, vec_a)) in embedded.iter().enumerate() {
        for (id_b, vec_b) in embedded.iter().skip(i + 1) {
            let similarity = cosine_similarity(vec_a, vec_b);
            if similarity > threshold {
                edges.push(Edge::semantic(*id_a, *id_b, similarity));
            }
        }
    }
    edges
}
