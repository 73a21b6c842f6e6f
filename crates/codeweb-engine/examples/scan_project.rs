//! Scan a directory, build the graph, and run one semantic pass.
//!
//! ```sh
//! cargo run --example scan_project -- path/to/project
//! ```
//!
//! Uses the no-op embedder unless `CODEWEB_EMBED_URL` points at an
//! OpenAI-compatible embeddings endpoint.

use std::sync::Arc;

use anyhow::Result;
use codeweb_engine::{load_directory, CodewebEngine};
use codeweb_semantic::{Embedder, HttpEmbedder, NoOpEmbedder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let root = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let files = load_directory(std::path::Path::new(&root))?;
    info!(files = files.len(), root = %root, "loaded file map");

    let embedder: Arc<dyn Embedder> = match HttpEmbedder::from_env() {
        Some(http) => {
            info!(model = http.model_name(), "using HTTP embedder");
            Arc::new(http)
        }
        None => Arc::new(NoOpEmbedder::new(8)),
    };

    let mut engine = CodewebEngine::with_files(embedder, files);
    info!(
        nodes = engine.graph().node_count(),
        edges = engine.graph().edge_count(),
        pending = engine.pending_updates(),
        "structural graph ready"
    );

    engine.recalculate().await;
    info!(
        edges = engine.graph().edge_count(),
        pending = engine.pending_updates(),
        "semantic pass done"
    );

    Ok(())
}
