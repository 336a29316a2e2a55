//! # Slice Container
//!
//! Each domain slice is a plain state struct with a reducer over its own
//! action enum, kept behind its own lock.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Slice Lock Discipline                                │
//! │                                                                         │
//! │  store op ──► dispatch(Pending) ──► [lock, reduce, unlock]              │
//! │          │                                                              │
//! │          └──► api call .await     (no lock held)                        │
//! │          │                                                              │
//! │          └──► dispatch(Fulfilled | Rejected) ──► [lock, reduce, unlock] │
//! │                                                                         │
//! │  NOTE: Slices never share a lock. A guard is never held across          │
//! │        an .await.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A state container driven by a reducer.
pub trait Slice: Default {
    type Action;

    /// Applies one action. Must not perform I/O.
    fn reduce(&mut self, action: Self::Action);
}

/// Shared handle to one slice's state.
#[derive(Debug)]
pub struct SliceCell<S> {
    state: Arc<Mutex<S>>,
}

impl<S> Clone for SliceCell<S> {
    fn clone(&self) -> Self {
        SliceCell {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Slice> Default for SliceCell<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Slice> SliceCell<S> {
    pub fn new() -> Self {
        SliceCell {
            state: Arc::new(Mutex::new(S::default())),
        }
    }

    pub fn dispatch(&self, action: S::Action) {
        self.lock().reduce(action);
    }

    /// Executes a function with read access to the state.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the state.
    ///
    /// For check-then-act sequences that must not interleave with other
    /// dispatches (e.g. the cart update gate).
    pub fn with_state_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut S) -> R,
    {
        f(&mut self.lock())
    }

    // A panic inside a reducer leaves plain data behind; keep serving it.
    fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Slice + Clone> SliceCell<S> {
    /// A copy of the current state for rendering.
    pub fn snapshot(&self) -> S {
        self.with_state(S::clone)
    }
}
