//! Typed raw memory allocation.
//!
//! Rust's `Vec<T>` always tracks how many of its slots are initialized. The rearrange engine needs
//! the lower level building block instead: a block of memory sized and aligned for `count` objects
//! of type `T` where *nothing* has been constructed yet, and which can be released again without
//! running any destructors.
//!
//! ## Useful APIs
//!
//! [`allocate_raw`]: Allocates uninitialized storage for `count` objects of type `T`.
//! [`deallocate_raw`]: Releases storage obtained from [`allocate_raw`] (no destructors are run).
//! [`reallocate_and_move`]: Grows (or shrinks) storage, relocating the live objects.
//! [`allocate_raw_zeroed`] / [`allocate_copy`]: Allocations which start out initialized.
//!
//! ## Safety
//!
//! A [`RawArray`] never drops its contents. Objects constructed into it with the
//! [`object`](crate::object) primitives must be destroyed by the caller before the array is
//! released, otherwise they are leaked.

use crate::object::{copy_bytes_range, relocate_range};
use core::alloc::{Layout, LayoutError};
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};
use core::slice;
use safe_allocator_api::allocator_api::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Uninitialized, `align_of::<T>()` aligned storage for [`capacity`](RawArray::capacity) objects of type `T`.
///
/// Dropping a [`RawArray`] frees the memory *without* trying to drop its contents.
pub struct RawArray<T> {
    /// `None` when the allocation is zero bytes long (`capacity == 0` or zero-sized `T`).
    alloc: Option<RawAlloc>,
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawArray<T> {}
unsafe impl<T: Sync> Sync for RawArray<T> {}

impl<T> RawArray<T> {
    /// Number of objects this allocation has room for.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the allocation has room for no objects.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Returns `true` if this array owns heap memory.
    ///
    /// Zero byte allocations are represented by a dangling, well aligned pointer instead.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.alloc.is_some()
    }

    /// Gets a raw pointer to the first slot.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Gets a mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Views every slot as possibly uninitialized memory.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: `MaybeUninit<T>` has the same layout as `T` and places no validity requirement on the bytes.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), self.capacity) }
    }

    /// Views every slot as possibly uninitialized memory, for placement construction.
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: See `as_uninit_slice`; we hold the only reference to the allocation.
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), self.capacity)
        }
    }

    /// Views the first `len` slots as initialized objects.
    ///
    /// # Safety
    ///
    /// - `len` must not exceed [`capacity`](RawArray::capacity)
    /// - The first `len` slots must hold constructed objects.
    #[inline]
    pub unsafe fn assume_init_slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity, "len must not exceed capacity");
        slice::from_raw_parts(self.ptr.as_ptr(), len)
    }

    /// Views the first `len` slots as initialized, mutable objects.
    ///
    /// # Safety
    ///
    /// - `len` must not exceed [`capacity`](RawArray::capacity)
    /// - The first `len` slots must hold constructed objects.
    #[inline]
    pub unsafe fn assume_init_slice_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity, "len must not exceed capacity");
        slice::from_raw_parts_mut(self.ptr.as_ptr(), len)
    }
}

impl<T> core::fmt::Debug for RawArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawArray")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Allocates uninitialized storage for `count` objects of type `T`, aligned to `align_of::<T>()`.
///
/// No objects are constructed; use the [`object`](crate::object) primitives to do so.
///
/// # Parameters
///
/// - `count`: The number of objects to make room for
///
/// # Returns
///
/// A [`RawArray`] owning the allocation
///
/// # Errors
///
/// - [`AllocateError::LayoutError`] if `count * size_of::<T>()` overflows `isize::MAX`
/// - [`AllocateError::AllocationFailed`] if the allocator could not provide the memory
pub fn allocate_raw<T>(count: usize) -> Result<RawArray<T>, AllocateError> {
    let layout = Layout::array::<T>(count)?;

    // Don't allocate here, a zero byte request has nothing to hand out.
    if layout.size() == 0 {
        return Ok(RawArray {
            alloc: None,
            ptr: NonNull::dangling(),
            capacity: count,
            _marker: PhantomData,
        });
    }

    let mut alloc = RawAlloc::new(layout)?;
    // SAFETY: A successful allocation is never null, and is aligned for `layout`, i.e. for `T`.
    let ptr = unsafe { NonNull::new_unchecked(alloc.as_mut_ptr().cast::<T>()) };
    Ok(RawArray {
        alloc: Some(alloc),
        ptr,
        capacity: count,
        _marker: PhantomData,
    })
}

/// Allocates storage for `count` objects of type `T`, with every byte set to zero.
///
/// As `T` is [`Zeroable`](bytemuck::Zeroable), all `count` slots hold valid objects once this returns,
/// so [`RawArray::assume_init_slice`] may be called with `count`.
///
/// # Errors
///
/// Same as [`allocate_raw`].
pub fn allocate_raw_zeroed<T: bytemuck::Zeroable>(
    count: usize,
) -> Result<RawArray<T>, AllocateError> {
    let mut array = allocate_raw::<T>(count)?;
    // SAFETY: The allocation has room for `count` objects.
    unsafe { ptr::write_bytes(array.as_mut_ptr(), 0, count) };
    Ok(array)
}

/// Allocates storage for `source.len()` objects and fills it with a byte copy of `source`.
///
/// # Errors
///
/// Same as [`allocate_raw`].
pub fn allocate_copy<T: Copy>(source: &[T]) -> Result<RawArray<T>, AllocateError> {
    let mut array = allocate_raw::<T>(source.len())?;
    // SAFETY: Both regions hold `source.len()` objects and a fresh allocation cannot overlap `source`.
    unsafe { copy_bytes_range(array.as_mut_ptr(), source.as_ptr(), source.len()) };
    Ok(array)
}

/// Releases storage obtained from [`allocate_raw`].
///
/// No destructors are run, destroy any objects living in the array first
/// (see [`destroy_range`](crate::object::destroy_range)). Passing `None` is a no-op.
#[inline]
pub fn deallocate_raw<T>(array: impl Into<Option<RawArray<T>>>) {
    drop(array.into());
}

/// Moves the first `count` objects of `array` into a new allocation of `new_capacity` slots,
/// then releases the old allocation.
///
/// Objects are relocated (bitwise moved), so the old slots hold no live objects afterwards and
/// nothing is destroyed twice. On error `array` is left untouched.
///
/// # Errors
///
/// - [`AllocateError::CapacityExceeded`] if `count` exceeds either the old or the new capacity
/// - Any error returned by [`allocate_raw`]
///
/// # Safety
///
/// The first `count` slots of `array` must hold constructed objects.
pub unsafe fn reallocate_and_move<T>(
    array: &mut RawArray<T>,
    count: usize,
    new_capacity: usize,
) -> Result<(), AllocateError> {
    let capacity = array.capacity().min(new_capacity);
    if count > capacity {
        return Err(AllocateError::CapacityExceeded { count, capacity });
    }

    let mut new_array = allocate_raw::<T>(new_capacity)?;
    relocate_range(new_array.as_mut_ptr(), array.as_ptr(), count);

    // Old slots are now logically uninitialized, dropping the handle only frees memory.
    *array = new_array;
    Ok(())
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `count * size_of::<T>()` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),

    /// More objects were requested to be moved than the allocation can hold.
    #[error("Cannot hold {count} objects in an allocation with room for {capacity}")]
    CapacityExceeded {
        /// The number of objects requested.
        count: usize,
        /// The capacity available.
        capacity: usize,
    },
}
