//! Raw event record framing and the lazy decoder.
//!
//! Mirrors `struct inotify_event` - a fixed 16-byte header
//! `{wd: i32, mask: u32, cookie: u32, len: u32}` in native byte order,
//! followed by `len` bytes of NUL-padded UTF-8 name. `len` counts the
//! padding, so it may exceed the stripped text length; `len == 0` means
//! the event carries no name (it refers to the watched path itself).

use crate::flags::EventMask;

/// Size of the fixed record header, in bytes.
pub const HEADER_LEN: usize = 16;

/// One decoded change-notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Watch descriptor the event was generated against.
    pub wd: i32,
    /// Event categories, possibly several bits at once.
    pub mask: EventMask,
    /// Cookie associating related events (rename pairs).
    pub cookie: u32,
    /// Entry name relative to the watched directory, padding stripped.
    pub name: String,
}

/// Decode a raw kernel buffer into a sequence of events.
///
/// The returned iterator is lazy, finite, and non-restartable. A
/// truncated header or short name region ends the iteration early;
/// a record whose name is not valid UTF-8 is skipped. Neither case
/// panics or yields a partial record.
pub fn decode(buf: &[u8]) -> Events<'_> {
    Events { buf, cursor: 0 }
}

/// Iterator over the records in one raw buffer. See [`decode`].
pub struct Events<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl Iterator for Events<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            let rest = &self.buf[self.cursor..];
            if rest.is_empty() {
                return None;
            }
            if rest.len() < HEADER_LEN {
                tracing::warn!(
                    trailing = rest.len(),
                    "truncated event header, discarding buffer tail"
                );
                self.cursor = self.buf.len();
                return None;
            }

            let wd = read_i32(&rest[0..4]);
            let mask = read_u32(&rest[4..8]);
            let cookie = read_u32(&rest[8..12]);
            let len = read_u32(&rest[12..16]) as usize;

            if rest.len() < HEADER_LEN + len {
                tracing::warn!(
                    need = HEADER_LEN + len,
                    have = rest.len(),
                    "short name region, discarding buffer tail"
                );
                self.cursor = self.buf.len();
                return None;
            }

            let padded = &rest[HEADER_LEN..HEADER_LEN + len];
            self.cursor += HEADER_LEN + len;

            // Strip trailing NUL padding; everything before it is the name.
            let end = padded.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            match std::str::from_utf8(&padded[..end]) {
                Ok(name) => {
                    return Some(Event {
                        wd,
                        mask: EventMask::from_raw(mask),
                        cookie,
                        name: name.to_owned(),
                    });
                }
                Err(_) => {
                    tracing::warn!(wd, "event name is not valid UTF-8, skipping record");
                }
            }
        }
    }
}

fn read_i32(b: &[u8]) -> i32 {
    i32::from_ne_bytes([b[0], b[1], b[2], b[3]])
}

fn read_u32(b: &[u8]) -> u32 {
    u32::from_ne_bytes([b[0], b[1], b[2], b[3]])
}
