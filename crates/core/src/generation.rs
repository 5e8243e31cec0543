//! Generation-tagged state for controllers with superseding operations.
//!
//! Every operation a controller starts is tagged with a [`Generation`]. Starting
//! a new operation (or resetting) advances the generation; a completion is only
//! applied when its tag is still current. The counter and the published state
//! are both mutated under the watch channel's lock, so the check and the write
//! are atomic with respect to concurrent supersedes.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Token identifying one controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Published state plus the generation that currently owns it.
#[derive(Debug)]
pub struct GenerationCell<S> {
    tx: watch::Sender<S>,
    current: AtomicU64,
}

impl<S> GenerationCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            current: AtomicU64::new(0),
        }
    }

    /// Supersede whatever is in flight, publish `state`, and return the
    /// generation of the new operation.
    pub fn begin(&self, state: S) -> Generation {
        let mut generation = Generation(0);
        self.tx.send_modify(|slot| {
            generation = Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1);
            *slot = state;
        });
        generation
    }

    /// Supersede whatever is in flight, leaving the published state untouched.
    pub fn supersede(&self) {
        self.tx.send_if_modified(|_| {
            self.current.fetch_add(1, Ordering::SeqCst);
            false
        });
    }

    /// Publish `state` if `generation` is still current.
    ///
    /// Returns `false` when the operation was superseded and the state was
    /// left untouched.
    pub fn resolve(&self, generation: Generation, state: S) -> bool {
        self.tx.send_if_modified(|slot| {
            if self.current.load(Ordering::SeqCst) != generation.0 {
                return false;
            }
            *slot = state;
            true
        })
    }

    /// Whether `generation` is the latest operation.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::SeqCst) == generation.0
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Borrow the current state.
    pub fn borrow(&self) -> watch::Ref<'_, S> {
        self.tx.borrow()
    }
}

impl<S: PartialEq> GenerationCell<S> {
    /// Supersede whatever is in flight and publish `state` without starting
    /// a new operation. Subscribers are only notified if the state changed.
    pub fn reset(&self, state: S) {
        self.tx.send_if_modified(|slot| {
            self.current.fetch_add(1, Ordering::SeqCst);
            if *slot == state {
                return false;
            }
            *slot = state;
            true
        });
    }
}

impl<S: Clone> GenerationCell<S> {
    /// Clone the current state.
    pub fn current(&self) -> S {
        self.tx.borrow().clone()
    }
}
