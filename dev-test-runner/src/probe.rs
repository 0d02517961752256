//! Payload types that record their own lifecycle.
//!
//! Counters are thread-local, so concurrently running tests do not see each other's
//! probes. Compare [`Counts`] snapshots rather than absolute values.
use std::cell::Cell;

thread_local! {
    static CREATED: Cell<usize> = const { Cell::new(0) };
    static DROPPED: Cell<usize> = const { Cell::new(0) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub created: usize,
    pub dropped: usize,
}

impl Counts {
    pub fn now() -> Self {
        Self {
            created: CREATED.with(Cell::get),
            dropped: DROPPED.with(Cell::get),
        }
    }

    /// Lifecycle events since `self` was taken.
    pub fn delta(self) -> Self {
        let now = Self::now();
        Self {
            created: now.created - self.created,
            dropped: now.dropped - self.dropped,
        }
    }
}

/// Counts every construction (including clones) and every drop.
#[derive(Debug)]
pub struct Probe {
    pub id: u32,
}

impl Probe {
    pub fn new(id: u32) -> Self {
        CREATED.with(|c| c.set(c.get() + 1));
        Self { id }
    }
}

impl Clone for Probe {
    fn clone(&self) -> Self {
        Probe::new(self.id)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        DROPPED.with(|c| c.set(c.get() + 1));
    }
}

/// A payload whose duplication can fail.
#[derive(Debug)]
pub struct Fragile {
    pub label: String,
    pub fail_clone: bool,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.fail_clone {
            panic!("cloning `{}` failed", self.label);
        }
        Self { label: self.label.clone(), fail_clone: false }
    }
}

/// Not `Clone`: only moves are possible.
#[derive(Debug, PartialEq, Eq)]
pub struct Unique {
    pub id: u32,
}
