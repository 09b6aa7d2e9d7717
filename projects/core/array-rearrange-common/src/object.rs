//! Placement construction and explicit destruction of objects in raw memory.
//!
//! These are the building blocks for working with [`RawArray`](crate::allocate::RawArray):
//! constructing an object at an address without allocating, and running a destructor
//! without freeing memory.
//!
//! | Operation | Single | Range |
//! |---|---|---|
//! | Default construct | [`construct_default`] | [`default_construct_range`] |
//! | Copy (clone) construct | [`construct_copy`] | [`copy_construct_range`] |
//! | Move construct, source left as `T::default()` | [`construct_take`] | [`move_construct_range`] |
//! | Move construct, source consumed | [`construct_move`] | [`relocate_range`] |
//! | Byte copy (`T: Copy`) | | [`copy_bytes_range`] |
//! | Destroy | [`destroy_at`] | [`destroy_range`] |
//!
//! Each logical object must be constructed exactly once and destroyed exactly once. None of these
//! functions clear memory or value-initialize anything beyond what their name says.
//!
//! If a `Default` or `Clone` implementation panics part way through a range operation, the
//! objects already constructed are leaked (never destroyed).

use core::mem::{self, needs_drop};
use core::ptr;

/// Default-constructs one object at `dst`.
///
/// # Safety
///
/// `dst` must be valid for writes and properly aligned. Any object previously at `dst` is
/// overwritten without being dropped.
#[inline]
pub unsafe fn construct_default<T: Default>(dst: *mut T) {
    dst.write(T::default());
}

/// Copy-constructs (clones) `value` into `dst`.
///
/// # Safety
///
/// Same as [`construct_default`].
#[inline]
pub unsafe fn construct_copy<T: Clone>(dst: *mut T, value: &T) {
    dst.write(value.clone());
}

/// Move-constructs `value` into `dst`, consuming it.
///
/// # Safety
///
/// Same as [`construct_default`].
#[inline]
pub unsafe fn construct_move<T>(dst: *mut T, value: T) {
    dst.write(value);
}

/// Move-constructs the object at `src` into `dst`, leaving `T::default()` behind at `src`.
///
/// The source stays alive in its moved-from state and still has to be destroyed by its owner.
///
/// # Safety
///
/// Same as [`construct_default`]. `dst` must not alias `src`.
#[inline]
pub unsafe fn construct_take<T: Default>(dst: *mut T, src: &mut T) {
    dst.write(mem::take(src));
}

/// Runs the destructor of the object at `ptr`, without freeing its memory. Null is ignored.
///
/// # Safety
///
/// If non-null, `ptr` must point to a constructed object that is not used again afterwards.
#[inline]
pub unsafe fn destroy_at<T>(ptr: *mut T) {
    if !ptr.is_null() {
        ptr::drop_in_place(ptr);
    }
}

/// Default-constructs `count` objects starting at `dst`.
///
/// # Safety
///
/// `dst` must be valid for writes of `count` objects and properly aligned.
pub unsafe fn default_construct_range<T: Default>(dst: *mut T, count: usize) {
    for x in 0..count {
        construct_default(dst.add(x));
    }
}

/// Clones `count` objects from `src` into the uninitialized slots starting at `dst`.
///
/// # Safety
///
/// - `src` must be valid for reads of `count` constructed objects
/// - `dst` must be valid for writes of `count` objects
/// - The two regions must not overlap
pub unsafe fn copy_construct_range<T: Clone>(dst: *mut T, src: *const T, count: usize) {
    for x in 0..count {
        construct_copy(dst.add(x), &*src.add(x));
    }
}

/// Move-constructs `count` objects from `src` into `dst`, leaving each source as `T::default()`.
///
/// # Safety
///
/// - `src` must be valid for reads and writes of `count` constructed objects
/// - `dst` must be valid for writes of `count` objects
/// - The two regions must not overlap
pub unsafe fn move_construct_range<T: Default>(dst: *mut T, src: *mut T, count: usize) {
    for x in 0..count {
        construct_take(dst.add(x), &mut *src.add(x));
    }
}

/// Relocates `count` objects from `src` to `dst` with a bitwise move.
///
/// Afterwards the source slots are logically uninitialized: they must be neither read nor destroyed.
///
/// # Safety
///
/// - `src` must be valid for reads of `count` constructed objects
/// - `dst` must be valid for writes of `count` objects
/// - The two regions must not overlap
#[inline]
pub unsafe fn relocate_range<T>(dst: *mut T, src: *const T, count: usize) {
    ptr::copy_nonoverlapping(src, dst, count);
}

/// Copies `count` objects from `src` to `dst` as raw bytes.
///
/// # Safety
///
/// Same as [`relocate_range`]. As `T` is [`Copy`], the source stays valid.
#[inline]
pub unsafe fn copy_bytes_range<T: Copy>(dst: *mut T, src: *const T, count: usize) {
    ptr::copy_nonoverlapping(src, dst, count);
}

/// Destroys `count` objects starting at `data`, without freeing their memory.
///
/// Compiles to nothing when `T` has no drop glue. Null `data` or a zero `count` is ignored.
///
/// # Safety
///
/// If non-null, `data` must point to `count` constructed objects that are not used again afterwards.
#[inline]
pub unsafe fn destroy_range<T>(data: *mut T, count: usize) {
    if needs_drop::<T>() && !data.is_null() && count > 0 {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(data, count));
    }
}
