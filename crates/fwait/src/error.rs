//! Error types for the watch subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for watch operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while waiting for a file creation.
///
/// Only [`WatchError::DirectoryNotFound`] ever crosses the public
/// boundary; every other variant is absorbed inside the watch session,
/// logged, and surfaced to the caller as a `false` result.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The target's parent directory does not exist (precondition).
    #[error("parent directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// inotify_init failed; the event source cannot be reached.
    #[error("failed to initialize inotify: errno {0}")]
    InitFailed(i32),

    /// inotify_add_watch failed for the given directory.
    #[error("cannot watch {}: errno {}", .path.display(), .errno)]
    WatchFailed { path: PathBuf, errno: i32 },

    /// poll on the event fd failed.
    #[error("poll failed: errno {0}")]
    PollFailed(i32),

    /// read on the event fd failed.
    #[error("event read failed: errno {0}")]
    ReadFailed(i32),

    /// No kernel change-notification facility on this platform.
    #[error("inotify is not supported on this platform")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = WatchError::DirectoryNotFound(PathBuf::from("/no/such/dir"));
        assert_eq!(format!("{e}"), "parent directory /no/such/dir does not exist");

        let e = WatchError::InitFailed(24);
        assert_eq!(format!("{e}"), "failed to initialize inotify: errno 24");
    }
}
