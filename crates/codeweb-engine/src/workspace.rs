//! Convenience directory loader.
//!
//! Host integration proper (workspace discovery, watchers, uploads) lives
//! outside this workspace and hands the engine a ready-made [`FileMap`].
//! This loader covers the common local case: walk a directory, skip hidden
//! and vendored entries, and key each readable text file by its relative
//! path.

use std::path::Path;

use codeweb_core::FileMap;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::EngineResult;

const BLACKLIST: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
    ".git",
    "vendor",
    "coverage",
];

/// Load every readable text file under `root` into a file map. Binary and
/// unreadable files are skipped, not reported.
pub fn load_directory(root: &Path) -> EngineResult<FileMap> {
    let mut files = FileMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_blacklisted(e))
        .filter_map(|e| e.ok())
    {
        if !entry.path().is_file() {
            continue;
        }

        let Ok(text) = std::fs::read_to_string(entry.path()) else {
            debug!(path = %entry.path().display(), "skipping unreadable or binary file");
            continue;
        };

        let filename = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        files.insert(filename, text);
    }

    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn is_blacklisted(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| BLACKLIST.contains(&s))
        .unwrap_or(false)
}
