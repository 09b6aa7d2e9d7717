//! Element transfer strategies.
//!
//! The executor moves whole fields at a time. How the elements of a field get from the source into
//! the destination depends on the element type, and is selected statically by the [`Transfer`]
//! implementation the executor is instantiated with:
//!
//! - [`Copied`]: `T: Copy`, one bulk byte copy per field.
//! - [`Cloned`]: `T: Clone`, each element is clone-constructed; the source is left untouched.
//! - [`Taken`]: `T: Default`, each element is move-constructed and its source slot is left holding
//!   `T::default()`. The source stays alive and must still be dropped by its owner.

use array_rearrange_common::object::{
    copy_bytes_range, copy_construct_range, move_construct_range,
};

/// Transfers a run of elements from the source into uninitialized destination slots.
///
/// # Safety
///
/// Implementations must construct exactly `len` objects at `dst`, and must leave every one of the
/// `len` source objects alive (still valid to drop).
pub unsafe trait Transfer<T> {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Transfers `len` elements from `src` into `dst`.
    ///
    /// # Safety
    ///
    /// - `src` must point to `len` constructed objects, valid for reads (and writes, if the strategy mutates them)
    /// - `dst` must be valid for writes of `len` objects
    /// - The two regions must not overlap
    unsafe fn transfer(dst: *mut T, src: *mut T, len: usize);
}

/// Bulk byte copy, for [`Copy`] types.
#[derive(Debug, Clone, Copy)]
pub enum Copied {}

/// Element-wise clone construction. The source is only read.
#[derive(Debug, Clone, Copy)]
pub enum Cloned {}

/// Element-wise move construction leaving `T::default()` in the source.
#[derive(Debug, Clone, Copy)]
pub enum Taken {}

unsafe impl<T: Copy> Transfer<T> for Copied {
    const NAME: &'static str = "copied";

    #[inline(always)]
    unsafe fn transfer(dst: *mut T, src: *mut T, len: usize) {
        copy_bytes_range(dst, src, len);
    }
}

unsafe impl<T: Clone> Transfer<T> for Cloned {
    const NAME: &'static str = "cloned";

    #[inline(always)]
    unsafe fn transfer(dst: *mut T, src: *mut T, len: usize) {
        copy_construct_range(dst, src, len);
    }
}

unsafe impl<T: Default> Transfer<T> for Taken {
    const NAME: &'static str = "taken";

    #[inline(always)]
    unsafe fn transfer(dst: *mut T, src: *mut T, len: usize) {
        move_construct_range(dst, src, len);
    }
}
