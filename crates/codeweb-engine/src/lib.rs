//! Codeweb orchestration layer.
//!
//! Everything below this crate is a pure function over graph values; the
//! [`CodewebEngine`] owns the mutable state (the file map and the current
//! graph), sequences structural rebuilds, and runs the asynchronous semantic
//! pass through `&mut self`, so at most one is in flight per engine.
//!
//! Inbound interfaces:
//! - file-map changes: [`CodewebEngine::set_files`],
//!   [`CodewebEngine::upsert_file`], [`CodewebEngine::remove_file`];
//! - editor changes: [`CodewebEngine::apply_code_change`];
//! - UI trigger: [`CodewebEngine::recalculate`] plus the read-only
//!   [`CodewebEngine::pending_updates`] count.

mod engine;
mod error;
mod events;
mod workspace;

pub use engine::CodewebEngine;
pub use error::{EngineError, EngineResult};
pub use events::{EventLog, GraphEvent};
pub use workspace::load_directory;
