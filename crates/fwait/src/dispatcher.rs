//! Ordered single-producer/single-consumer hand-off for decoded events.
//!
//! The channel carries `Option<Event>`; `None` is the terminal marker.
//! Exactly one marker reaches the consumer per session, always last,
//! whichever way the producer exited - `finish()` sends it explicitly,
//! and dropping an unfinished sink (worker error, even a panic) sends it
//! too.

use crate::event::Event;

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Create a connected sink/stream pair for one watch session.
pub fn dispatcher() -> (EventSink, EventStream) {
    let (tx, rx) = unbounded();
    (
        EventSink {
            tx,
            finished: false,
        },
        EventStream { rx },
    )
}

/// Producer half, owned by the watch session.
pub struct EventSink {
    tx: Sender<Option<Event>>,
    finished: bool,
}

impl EventSink {
    /// Forward one decoded event, preserving arrival order.
    ///
    /// A send error means the consumer already returned and dropped the
    /// stream; the session keeps running on its own budget, so the
    /// error is ignored.
    pub fn push(&self, event: Event) {
        let _ = self.tx.send(Some(event));
    }

    /// Send the terminal marker and consume the sink.
    pub fn finish(mut self) {
        self.finished = true;
        let _ = self.tx.send(None);
    }
}

impl Drop for EventSink {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.tx.send(None);
        }
    }
}

/// Consumer half, owned by the calling side.
pub struct EventStream {
    rx: Receiver<Option<Event>>,
}

impl EventStream {
    /// Block for the next event.
    ///
    /// `None` means the terminal marker arrived (or the producer
    /// vanished without one); either way the stream is finished.
    pub fn next(&self) -> Option<Event> {
        self.rx.recv().ok().flatten()
    }
}
