//! Shared helpers for the integration tests.

#![allow(dead_code)]

use array_rearrange_common::allocate::{allocate_raw, deallocate_raw, RawArray};
use array_rearrange_common::object::destroy_range;
use std::cell::Cell;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

/// Element with a destructor which keeps a per-thread count of live instances.
#[derive(Debug, PartialEq, Eq)]
pub struct Tracker {
    pub value: i64,
}

impl Tracker {
    pub const MOVED_FROM: i64 = i64::MIN;

    pub fn new(value: i64) -> Self {
        LIVE.with(|x| x.set(x.get() + 1));
        Self { value }
    }

    pub fn live() -> isize {
        LIVE.with(Cell::get)
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(Self::MOVED_FROM)
    }
}

impl Clone for Tracker {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        LIVE.with(|x| x.set(x.get() - 1));
    }
}

/// Uninitialized destination storage which drops `constructed` elements when released.
pub struct Destination<T> {
    storage: Option<RawArray<T>>,
    pub constructed: usize,
}

impl<T> Destination<T> {
    pub fn new(count: usize) -> Self {
        Self {
            storage: Some(allocate_raw(count).unwrap()),
            constructed: 0,
        }
    }

    pub fn slots(&mut self) -> &mut [core::mem::MaybeUninit<T>] {
        self.storage.as_mut().unwrap().as_uninit_slice_mut()
    }

    pub fn values(&self) -> &[T] {
        unsafe { self.storage.as_ref().unwrap().assume_init_slice(self.constructed) }
    }
}

impl<T> Drop for Destination<T> {
    fn drop(&mut self) {
        if let Some(mut storage) = self.storage.take() {
            unsafe { destroy_range(storage.as_mut_ptr(), self.constructed) };
            deallocate_raw(storage);
        }
    }
}

/// `count` singleton fields.
pub fn singleton_fields(count: usize) -> Vec<usize> {
    vec![1; count]
}

/// Permutation emitting `count` fields last to first.
pub fn reversed(count: usize) -> Vec<i64> {
    (0..count as i64).rev().collect()
}
