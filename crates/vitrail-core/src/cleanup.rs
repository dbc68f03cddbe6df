//! Temp-path cleanup that survives interrupt handlers
//!
//! `TempDir` guards cover normal and error exits. An interrupt handler
//! exits the process without unwinding, so destructors never run there;
//! cloned checkouts are also tracked here and removed explicitly from
//! the Ctrl+C hook.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

static TRACKED: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// Track a path for removal if the process is interrupted.
pub fn track(path: &Path) {
    if let Ok(mut paths) = TRACKED.lock() {
        paths.push(path.to_path_buf());
    }
}

/// Remove every tracked path. Safe to call more than once; paths already
/// removed by their `TempDir` guard are skipped.
pub fn remove_tracked() {
    if let Ok(mut paths) = TRACKED.lock() {
        for path in paths.drain(..) {
            let _ = std::fs::remove_dir_all(&path);
        }
    }
}
