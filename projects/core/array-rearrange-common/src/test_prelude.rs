//! Common test prelude for the lifetime primitive tests.
//!
//! Provides [`Tracked`], an element type which counts its own constructions and destructions,
//! so tests can assert that every object is constructed exactly once and destroyed exactly once.

use core::cell::Cell;

pub use rstest::rstest;
pub use std::{string::String, string::ToString, vec, vec::Vec};

std::thread_local! {
    static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    static DESTROYED: Cell<usize> = const { Cell::new(0) };
}

/// Element type with observable constructor and destructor side effects.
///
/// Counters are thread local; the test harness runs each test on its own thread.
#[derive(Debug, PartialEq, Eq)]
pub struct Tracked {
    pub value: i32,
}

impl Tracked {
    pub fn new(value: i32) -> Self {
        CONSTRUCTED.with(|c| c.set(c.get() + 1));
        Self { value }
    }

    pub fn reset() {
        CONSTRUCTED.with(|c| c.set(0));
        DESTROYED.with(|c| c.set(0));
    }

    pub fn constructed() -> usize {
        CONSTRUCTED.with(Cell::get)
    }

    pub fn destroyed() -> usize {
        DESTROYED.with(Cell::get)
    }

    pub fn alive() -> isize {
        Self::constructed() as isize - Self::destroyed() as isize
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new(-1)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DESTROYED.with(|c| c.set(c.get() + 1));
    }
}
