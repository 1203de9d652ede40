//! Capability object owning the inotify fd and its single watch.
//!
//! Constructed fresh per watch session, never shared and never global.
//! The fd is held as an `OwnedFd`, so the kernel resources are released
//! on every exit path; `remove_watch` is idempotent and always safe to
//! call again.
//!
//! On platforms without inotify the same type exists but `open()` fails
//! cleanly with [`WatchError::Unsupported`].

use crate::error::{Result, WatchError};
use crate::flags::EventMask;

use std::time::Duration;

/// Kernel handle for the one registered watch.
///
/// Valid only for the lifetime of the [`Inotify`] that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchDescriptor(pub(crate) i32);

impl WatchDescriptor {
    /// The kernel's numeric id for this watch.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        use std::ffi::CString;
        use std::os::fd::{AsFd, AsRawFd, FromRawFd, OwnedFd};
        use std::os::unix::ffi::OsStrExt;
        use std::path::Path;
        use std::time::Instant;

        use nix::errno::Errno;
        use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

        /// One inotify instance with at most one registered watch.
        pub struct Inotify {
            fd: OwnedFd,
            wd: Option<WatchDescriptor>,
        }

        impl Inotify {
            /// Open the kernel event source.
            pub fn open() -> Result<Self> {
                let fd = unsafe { libc::inotify_init1(libc::IN_CLOEXEC) };
                if fd < 0 {
                    return Err(WatchError::InitFailed(last_errno()));
                }
                Ok(Self {
                    fd: unsafe { OwnedFd::from_raw_fd(fd) },
                    wd: None,
                })
            }

            /// Register interest in `mask` events under an existing directory.
            pub fn add_watch(&mut self, dir: &Path, mask: EventMask) -> Result<WatchDescriptor> {
                let c_dir = CString::new(dir.as_os_str().as_bytes()).map_err(|_| {
                    WatchError::WatchFailed {
                        path: dir.to_owned(),
                        errno: libc::EINVAL,
                    }
                })?;

                let wd = unsafe {
                    libc::inotify_add_watch(self.fd.as_raw_fd(), c_dir.as_ptr(), mask.bits())
                };
                if wd < 0 {
                    return Err(WatchError::WatchFailed {
                        path: dir.to_owned(),
                        errno: last_errno(),
                    });
                }

                let wd = WatchDescriptor(wd);
                self.wd = Some(wd);
                Ok(wd)
            }

            /// Block until the fd is readable or `timeout` elapses.
            ///
            /// Returns `true` on readiness, `false` on timeout. Only ever
            /// called with the session's remaining budget, never the
            /// original timeout. A signal interrupt retries against the
            /// same deadline.
            pub fn wait_readable(&self, timeout: Duration) -> Result<bool> {
                let deadline = Instant::now().checked_add(timeout);
                loop {
                    let remaining = match deadline {
                        Some(d) => d.saturating_duration_since(Instant::now()),
                        None => Duration::MAX,
                    };
                    let mut fds = [PollFd::new(self.fd.as_fd(), PollFlags::POLLIN)];
                    let timeout = PollTimeout::try_from(remaining).unwrap_or(PollTimeout::MAX);
                    match poll(&mut fds, timeout) {
                        Ok(n) => return Ok(n > 0),
                        Err(Errno::EINTR) => continue,
                        Err(e) => return Err(WatchError::PollFailed(e as i32)),
                    }
                }
            }

            /// Read pending raw bytes into `buf`.
            ///
            /// Only invoked after [`Inotify::wait_readable`] reported
            /// readiness, so this never blocks for long.
            pub fn read_events(&self, buf: &mut [u8]) -> Result<usize> {
                let n = unsafe {
                    libc::read(
                        self.fd.as_raw_fd(),
                        buf.as_mut_ptr() as *mut libc::c_void,
                        buf.len(),
                    )
                };
                if n < 0 {
                    return Err(WatchError::ReadFailed(last_errno()));
                }
                Ok(n as usize)
            }

            /// Deregister the watch, if one is registered.
            ///
            /// Idempotent. Errors are ignored: closing the fd tears the
            /// watch down anyway.
            pub fn remove_watch(&mut self) {
                if let Some(WatchDescriptor(wd)) = self.wd.take() {
                    unsafe {
                        libc::inotify_rm_watch(self.fd.as_raw_fd(), wd);
                    }
                }
            }
        }

        impl Drop for Inotify {
            fn drop(&mut self) {
                // OwnedFd closes the fd afterwards.
                self.remove_watch();
            }
        }

        fn last_errno() -> i32 {
            std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
        }
    } else {
        use std::path::Path;

        /// Stub for platforms without a kernel change-notification
        /// facility. `open()` always fails with `Unsupported`.
        pub struct Inotify {
            never: std::convert::Infallible,
        }

        impl Inotify {
            pub fn open() -> Result<Self> {
                Err(WatchError::Unsupported)
            }

            pub fn add_watch(&mut self, _dir: &Path, _mask: EventMask) -> Result<WatchDescriptor> {
                match self.never {}
            }

            pub fn wait_readable(&self, _timeout: Duration) -> Result<bool> {
                match self.never {}
            }

            pub fn read_events(&self, _buf: &mut [u8]) -> Result<usize> {
                match self.never {}
            }

            pub fn remove_watch(&mut self) {}
        }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use crate::event;

    #[test]
    fn test_open_and_watch_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let mut ino = Inotify::open().unwrap();
        let wd = ino.add_watch(dir.path(), EventMask::CREATE).unwrap();
        assert!(wd.0 >= 0);
        ino.remove_watch();
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let mut ino = Inotify::open().unwrap();
        let err = ino
            .add_watch(Path::new("/no/such/dir/anywhere"), EventMask::CREATE)
            .unwrap_err();
        assert!(matches!(err, WatchError::WatchFailed { errno, .. } if errno == libc::ENOENT));
    }

    #[test]
    fn test_creation_event_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let mut ino = Inotify::open().unwrap();
        ino.add_watch(dir.path(), EventMask::CREATE).unwrap();

        std::fs::File::create(dir.path().join("touched")).unwrap();

        assert!(ino.wait_readable(Duration::from_millis(500)).unwrap());
        let mut buf = [0u8; 4096];
        let n = ino.read_events(&mut buf).unwrap();
        let names: Vec<String> = event::decode(&buf[..n]).map(|e| e.name).collect();
        assert!(names.contains(&"touched".to_string()));
    }

    #[test]
    fn test_wait_readable_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut ino = Inotify::open().unwrap();
        ino.add_watch(dir.path(), EventMask::CREATE).unwrap();
        assert!(!ino.wait_readable(Duration::from_millis(20)).unwrap());
    }

    #[test]
    fn test_remove_watch_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ino = Inotify::open().unwrap();
        ino.add_watch(dir.path(), EventMask::CREATE).unwrap();
        ino.remove_watch();
        ino.remove_watch();
    }

    #[test]
    fn test_drop_releases_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let raw = {
            let mut ino = Inotify::open().unwrap();
            ino.add_watch(dir.path(), EventMask::CREATE).unwrap();
            let raw = ino.fd.as_raw_fd();
            assert_ne!(unsafe { libc::fcntl(raw, libc::F_GETFD) }, -1);
            raw
        };
        assert_eq!(unsafe { libc::fcntl(raw, libc::F_GETFD) }, -1);
    }
}
