//! Structural pipeline for Codeweb.
//!
//! Three synchronous, pure stages that must complete within one reactive
//! cycle and never block on I/O:
//!
//! ```text
//! FileMap ──▶ parser (per file) ──▶ builder (whole-set graph) ──▶ merge
//!                                                                  ▲
//!                                                 previous graph ──┘
//! ```
//!
//! The builder always starts from a clean slate: no embeddings, no semantic
//! edges. Derived AI state only survives rebuilds through [`merge_graphs`].

mod builder;
mod merge;
mod parser;

pub use builder::build_graph;
pub use merge::merge_graphs;
pub use parser::{function_span, parse_file, ParsedFile};
