//! Hand-off of editor updates from the I/O side to the render tick.
//!
//! Events are staged until a `Flush` seals them into a batch. The render side
//! only ever sees sealed batches, so a frame never observes half of an
//! update.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::redraw::RedrawEvent;

#[derive(Default)]
pub struct EventQueue {
    staging: Mutex<Vec<RedrawEvent>>,
    ready: Mutex<Vec<Vec<RedrawEvent>>>,
    has_ready: AtomicBool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `event`; `Flush` seals everything staged so far.
    pub fn push(&self, event: RedrawEvent) {
        if matches!(event, RedrawEvent::Flush) {
            let batch = std::mem::take(&mut *self.staging.lock());
            self.ready.lock().push(batch);
            self.has_ready.store(true, Ordering::Release);
        } else {
            self.staging.lock().push(event);
        }
    }

    pub fn extend<I: IntoIterator<Item = RedrawEvent>>(&self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    /// Whether sealed batches are waiting. Does not take a lock.
    pub fn has_pending(&self) -> bool {
        self.has_ready.load(Ordering::Acquire)
    }

    /// Take every sealed batch, oldest first.
    pub fn drain(&self) -> Vec<Vec<RedrawEvent>> {
        if !self.has_pending() {
            return Vec::new();
        }
        let mut ready = self.ready.lock();
        self.has_ready.store(false, Ordering::Release);
        std::mem::take(&mut *ready)
    }

    /// Number of staged events not yet sealed.
    pub fn staged_len(&self) -> usize {
        self.staging.lock().len()
    }
}
