//! # fwait
//!
//! Bounded wait for file creation, backed by the kernel's inotify event
//! source. One call waits for one file to appear in an existing directory,
//! without polling the directory by repeated existence checks.
//!
//! ```ignore
//! use std::time::Duration;
//! use fwait::wait_for_file_creation;
//!
//! let created = wait_for_file_creation("/run/provision/ready", Duration::from_millis(500))?;
//! ```
//!
//! ## Modules
//!
//! - `flags` - Named bitset over the kernel's event categories
//! - `event` - Raw record framing and the lazy event decoder
//! - `inotify` - Capability object owning the event fd and its one watch
//! - `dispatcher` - Ordered SPSC hand-off with a single terminal marker
//! - `worker` - Shrinking-timeout poll loop on a background thread
//! - `watcher` - The public `wait_for_file_creation` entry point
//! - `error` - Error types
//!
//! ## Contract
//!
//! The only error returned from the public API is the missing-parent
//! precondition. Every runtime failure (event source unavailable, read
//! errors, malformed records) is logged and degrades to `Ok(false)`;
//! a timeout is not an error, it is the defined `false` outcome.

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod flags;
pub mod inotify;
pub mod watcher;
pub mod worker;

// Re-exports for convenience
pub use error::{Result, WatchError};
pub use event::Event;
pub use flags::EventMask;
pub use watcher::wait_for_file_creation;
