//! Common test imports and utilities for rearrange tests

pub use rstest::rstest;
pub use std::{string::String, string::ToString, vec, vec::Vec};

pub use crate::error::{RearrangeError, RearrangeErrorKind};

use core::cell::Cell;

std::thread_local! {
    static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    static DESTROYED: Cell<usize> = const { Cell::new(0) };
}

/// Element with a destructor, counting how many instances are alive on the current thread.
#[derive(Debug, PartialEq, Eq)]
pub struct Tracked {
    pub value: i32,
}

impl Tracked {
    /// Value held by a default constructed (moved-from) element.
    pub const DEFAULT_VALUE: i32 = -1;

    pub fn new(value: i32) -> Self {
        CONSTRUCTED.with(|c| c.set(c.get() + 1));
        Self { value }
    }

    pub fn reset() {
        CONSTRUCTED.with(|c| c.set(0));
        DESTROYED.with(|c| c.set(0));
    }

    pub fn alive() -> isize {
        CONSTRUCTED.with(Cell::get) as isize - DESTROYED.with(Cell::get) as isize
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VALUE)
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
