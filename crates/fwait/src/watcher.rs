//! The public entry point: wait for one file to be created.

use crate::dispatcher::dispatcher;
use crate::error::{Result, WatchError};
use crate::worker;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Wait for `path` to be created, for at most `timeout`.
///
/// Returns `Ok(true)` if the file exists or appears within the budget,
/// `Ok(false)` if the budget elapses first. The parent directory must
/// already exist; [`WatchError::DirectoryNotFound`] is the only error
/// this function returns, raised synchronously before any background
/// work starts. Every runtime failure of the underlying event source is
/// logged and reported as `Ok(false)`.
///
/// Each call owns a private watch session and channel; calls do not
/// share state. On an early match the background session is left to
/// expire on its own budget rather than being joined or cancelled.
///
/// A window remains between the existence checks and the watch
/// registration in which an external creation could be missed; the
/// session re-checks the target right after registering, which narrows
/// that window without closing it.
pub fn wait_for_file_creation(path: impl AsRef<Path>, timeout: Duration) -> Result<bool> {
    let path = path.as_ref();

    let Some(file_name) = path.file_name() else {
        // "/" or "..": nothing that could be created.
        return Err(WatchError::DirectoryNotFound(path.to_owned()));
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_owned(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Err(WatchError::DirectoryNotFound(parent));
    }

    // Fast path: no session at all if the file is already there.
    if path.exists() {
        return Ok(true);
    }

    let target = file_name.to_string_lossy().into_owned();
    let (sink, stream) = dispatcher();
    worker::spawn_session(parent, target.clone(), timeout, sink);

    while let Some(event) = stream.next() {
        if event.name == target {
            return Ok(true);
        }
        tracing::debug!(name = %event.name, "ignoring event for other entry");
    }
    Ok(false)
}
