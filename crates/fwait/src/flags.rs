//! Named bitset over the kernel's inotify event categories.
//!
//! Values mirror `inotify.h`. Only [`EventMask::CREATE`] is ever
//! requested by this crate, but decoding must tolerate any combination
//! the kernel reports, including bits unknown to this build.

use bitflags::bitflags;

bitflags! {
    /// Event categories reported by the kernel, one bit each.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventMask: u32 {
        /// File was accessed.
        const ACCESS        = 0x0000_0001;
        /// File was modified.
        const MODIFY        = 0x0000_0002;
        /// Metadata changed.
        const ATTRIB        = 0x0000_0004;
        /// Writable file was closed.
        const CLOSE_WRITE   = 0x0000_0008;
        /// Unwritable file was closed.
        const CLOSE_NOWRITE = 0x0000_0010;
        /// File was opened.
        const OPEN          = 0x0000_0020;
        /// File was moved out of the watched directory.
        const MOVED_FROM    = 0x0000_0040;
        /// File was moved into the watched directory.
        const MOVED_TO      = 0x0000_0080;
        /// Entry was created in the watched directory.
        const CREATE        = 0x0000_0100;
        /// Entry was deleted from the watched directory.
        const DELETE        = 0x0000_0200;
        /// The watched path itself was deleted.
        const DELETE_SELF   = 0x0000_0400;
        /// The watched path itself was moved.
        const MOVE_SELF     = 0x0000_0800;

        /// Backing filesystem was unmounted.
        const UNMOUNT       = 0x0000_2000;
        /// Kernel event queue overflowed.
        const Q_OVERFLOW    = 0x0000_4000;
        /// Watch was removed.
        const IGNORED       = 0x0000_8000;

        /// Only watch the path if it is a directory.
        const ONLYDIR       = 0x0100_0000;
        /// Do not follow a symlink.
        const DONT_FOLLOW   = 0x0200_0000;
        /// Exclude events on unlinked objects.
        const EXCL_UNLINK   = 0x0400_0000;
        /// Add to the mask of an existing watch.
        const MASK_ADD      = 0x2000_0000;
        /// Event occurred against a directory.
        const ISDIR         = 0x4000_0000;
        /// Remove the watch after the first event.
        const ONESHOT       = 0x8000_0000;
    }
}

impl EventMask {
    /// Build a mask from a raw kernel value, keeping bits this build
    /// does not know about.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_values_match_kernel_headers() {
        assert_eq!(EventMask::CREATE.bits(), libc::IN_CREATE);
        assert_eq!(EventMask::DELETE.bits(), libc::IN_DELETE);
        assert_eq!(EventMask::MODIFY.bits(), libc::IN_MODIFY);
        assert_eq!(EventMask::Q_OVERFLOW.bits(), libc::IN_Q_OVERFLOW);
        assert_eq!(EventMask::ISDIR.bits(), libc::IN_ISDIR);
    }

    #[test]
    fn test_unknown_bits_survive_decode() {
        let raw = EventMask::CREATE.bits() | 0x0010_0000;
        let mask = EventMask::from_raw(raw);
        assert!(mask.contains(EventMask::CREATE));
        assert_eq!(mask.bits(), raw);
    }
}
