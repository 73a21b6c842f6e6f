//! Semantic layer for Codeweb.
//!
//! Bridges the structural [`CodeGraph`](codeweb_core::CodeGraph) to a
//! vector-embedding space, deriving weighted similarity edges between
//! functions that *do* similar things regardless of naming.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐      ┌──────────────────┐      ┌──────────────────┐
//! │ Embedder   │─────▶│ SimilarityEngine  │─────▶│ CodeGraph with   │
//! │ (backend)  │      │ (fan-out + cosine)│      │ semantic edges   │
//! └────────────┘      └──────────────────┘      └──────────────────┘
//!                              ▲
//!                      ┌───────┴────────┐
//!                      │ staleness view  │  (gates when a pass runs)
//!                      └────────────────┘
//! ```
//!
//! Only the similarity pass is asynchronous; everything else in the
//! workspace stays synchronous and snapshot-based.

mod clean;
mod embedder;
mod similarity;
mod staleness;

pub use clean::{clean_for_embedding, embedding_input};
pub use embedder::{EmbedError, Embedder, HttpEmbedder, NoOpEmbedder};
pub use similarity::{cosine_similarity, semantic_edges, SimilarityEngine, SIMILARITY_THRESHOLD};
pub use staleness::{pending_count, pending_nodes};

// ───────────────────────────────────────────────────────────────────────────
// Integration tests
// ───────────────────────────────────────────────────────────────────────────
