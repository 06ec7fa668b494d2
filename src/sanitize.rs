use std::fs;
use std::path::PathBuf;

use camino::Utf8Path;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::workspace::GIT_DIR;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SanitizeReport {
    pub removed: Vec<String>,
    pub failed: Vec<SanitizeFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizeFailure {
    pub path: String,
    pub message: String,
}

/// Removes every nested `.git` directory under `source_root`, so plain
/// clones left by `go get` are not mistaken for embedded repositories.
///
/// Best effort: nothing here fails the caller. Paths that are not UTF-8 are
/// still removed and reported lossily.
pub fn sanitize(source_root: &Utf8Path) -> SanitizeReport {
    let mut report = SanitizeReport::default();
    for dir in collect_git_dirs(source_root) {
        let shown = dir.to_string_lossy().into_owned();
        info!("Removing git folder at {shown}");
        match fs::remove_dir_all(&dir) {
            Ok(()) => report.removed.push(shown),
            Err(err) => {
                warn!("unable to remove git folder at {shown}: {err}");
                report.failed.push(SanitizeFailure {
                    path: shown,
                    message: err.to_string(),
                });
            }
        }
    }
    report
}

// Collect first so deletions never race the directory walk.
fn collect_git_dirs(source_root: &Utf8Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if !source_root.as_std_path().exists() {
        return found;
    }

    let mut walker = WalkDir::new(source_root.as_std_path())
        .follow_links(false)
        .into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("unable to walk {source_root}: {err}");
                continue;
            }
        };
        if entry.depth() == 0 || !entry.file_type().is_dir() || entry.file_name() != GIT_DIR {
            continue;
        }
        walker.skip_current_dir();
        found.push(entry.into_path());
    }
    found
}
