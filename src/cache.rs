// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Cache-file freshness and atomic replacement.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Outcome of a builder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The cache was within its TTL and left untouched.
    Fresh(PathBuf),
    /// The cache was (re)generated.
    Written(PathBuf),
}

impl Refresh {
    /// The cache file path, printed on stdout by every builder.
    pub fn path(&self) -> &Path {
        match self {
            Refresh::Fresh(path) | Refresh::Written(path) => path,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, Refresh::Written(_))
    }
}

/// Whether the file at `path` was modified less than `ttl_secs` before
/// `now`. Missing or unreadable files are stale; an mtime in the future
/// counts as a negative age.
pub fn is_fresh(path: &Path, ttl_secs: i64, now: SystemTime) -> bool {
    let Ok(mtime) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };
    let age = match now.duration_since(mtime) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(ahead) => -ahead.duration().as_secs_f64(),
    };
    age < ttl_secs as f64
}

/// Replaces `path` with `contents` so readers never observe a partial
/// file. Parent directories are created as needed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::io("creating", parent, e))?;

    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|e| Error::io("creating temp file in", parent, e))?;
    if let Err(e) = tmp.write_all(contents.as_bytes()) {
        return Err(Error::io("writing", tmp.path(), e));
    }
    tmp.persist(path)
        .map_err(|e| Error::io("replacing", path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "cache written");
    Ok(())
}
