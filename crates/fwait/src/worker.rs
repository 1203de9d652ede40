//! Background watch session: the shrinking-timeout poll loop.
//!
//! One session per facade call, on a dedicated named thread. The session
//! owns the [`Inotify`] capability for its whole lifetime; nothing else
//! reads from it. Errors inside the session never propagate as a crash -
//! they are logged and degrade to "not found", and the dispatcher's
//! terminal marker is emitted on every exit path.

use crate::dispatcher::EventSink;
use crate::error::Result;
use crate::event::{self, Event};
use crate::flags::EventMask;
use crate::inotify::Inotify;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Read buffer size. One raw record is at most `16 + NAME_MAX + 1` bytes
/// and the kernel only returns whole records, so 4 KiB holds a batch
/// without ever splitting one.
const READ_BUF_LEN: usize = 4096;

/// Spawn the detached session thread for one facade call.
///
/// The caller never joins it: an early match leaves the session running
/// until its own budget expires. If the thread cannot be spawned at all,
/// the sink is dropped here and its terminal marker unblocks the caller.
pub(crate) fn spawn_session(dir: PathBuf, file_name: String, timeout: Duration, sink: EventSink) {
    let spawned = thread::Builder::new()
        .name("fwait-watch".into())
        .spawn(move || {
            if let Err(e) = session(&dir, &file_name, timeout, &sink) {
                tracing::error!("watch session for {} failed: {e}", dir.display());
            }
            sink.finish();
        });

    if let Err(e) = spawned {
        tracing::error!("failed to spawn watch thread: {e}");
    }
}

/// Run one watch session to completion.
///
/// Registers the single CREATE watch, rechecks the target (narrowing the
/// check-then-watch race), then polls with the remaining budget until it
/// hits zero. Every decoded event is forwarded in arrival order; a
/// readiness signal that decodes to zero events is a spurious wakeup and
/// the loop continues.
fn session(dir: &Path, file_name: &str, timeout: Duration, sink: &EventSink) -> Result<()> {
    let start = Instant::now();

    let mut ino = Inotify::open()?;
    let wd = ino.add_watch(dir, EventMask::CREATE)?;

    // Second existence check, now that the watch is in place. A file
    // created between the caller's fast-path check and the registration
    // above would otherwise be missed forever.
    if dir.join(file_name).exists() {
        sink.push(Event {
            wd: wd.raw(),
            mask: EventMask::CREATE,
            cookie: 0,
            name: file_name.to_owned(),
        });
    }

    let mut buf = [0u8; READ_BUF_LEN];
    loop {
        // Recomputed every iteration; repeated spurious wakeups cannot
        // extend the total blocking time.
        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            break;
        }
        if !ino.wait_readable(remaining)? {
            break;
        }

        let n = ino.read_events(&mut buf)?;
        for ev in event::decode(&buf[..n]) {
            sink.push(ev);
        }
    }

    ino.remove_watch();
    Ok(())
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use crate::dispatcher::dispatcher;
    use std::fs::File;

    #[test]
    fn test_session_reports_creation() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, stream) = dispatcher();
        spawn_session(
            dir.path().to_owned(),
            "ready".into(),
            Duration::from_millis(500),
            sink,
        );

        thread::sleep(Duration::from_millis(50));
        File::create(dir.path().join("ready")).unwrap();

        let names: Vec<String> = std::iter::from_fn(|| stream.next()).map(|e| e.name).collect();
        assert!(names.contains(&"ready".to_string()));
    }

    #[test]
    fn test_session_times_out_with_single_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, stream) = dispatcher();

        let start = Instant::now();
        spawn_session(
            dir.path().to_owned(),
            "never".into(),
            Duration::from_millis(100),
            sink,
        );

        assert!(stream.next().is_none());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[test]
    fn test_registration_recheck_catches_racing_creation() {
        let dir = tempfile::tempdir().unwrap();
        // Created before the session starts: only the recheck can see it.
        File::create(dir.path().join("raced")).unwrap();

        let (sink, stream) = dispatcher();
        spawn_session(
            dir.path().to_owned(),
            "raced".into(),
            Duration::from_millis(500),
            sink,
        );

        let first = stream.next().unwrap();
        assert_eq!(first.name, "raced");
        assert!(first.mask.contains(EventMask::CREATE));
    }

    #[test]
    fn test_missing_directory_degrades_to_sentinel() {
        let (sink, stream) = dispatcher();
        let start = Instant::now();
        spawn_session(
            PathBuf::from("/no/such/dir/anywhere"),
            "x".into(),
            Duration::from_millis(5000),
            sink,
        );

        // Registration fails immediately; the budget is not consumed.
        assert!(stream.next().is_none());
        assert!(start.elapsed() < Duration::from_millis(1000));
    }
}
