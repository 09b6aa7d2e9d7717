//! Unchecked entry points, exposed for benchmarking the transfer loop without validation.

use crate::partition::Field;
use crate::transfer::{Cloned, Copied, Taken};

/// Runs the field transfer loop with bulk copies.
///
/// # Safety
///
/// `order` must select valid fields whose lengths sum to the length of `dst`, `src` must hold every
/// element described by `fields`, and the buffers must not overlap.
pub unsafe fn rearrange_copied<T: Copy>(
    dst: *mut T,
    src: *const T,
    fields: &[Field],
    order: &[usize],
) {
    crate::executor::rearrange_fields::<T, Copied>(dst, src as *mut T, fields, order)
}

/// Runs the field transfer loop with element clones.
///
/// # Safety
///
/// See [`rearrange_copied`]. `dst` must be uninitialized.
pub unsafe fn rearrange_cloned<T: Clone>(
    dst: *mut T,
    src: *const T,
    fields: &[Field],
    order: &[usize],
) {
    crate::executor::rearrange_fields::<T, Cloned>(dst, src as *mut T, fields, order)
}

/// Runs the field transfer loop with element moves.
///
/// # Safety
///
/// See [`rearrange_copied`]. `dst` must be uninitialized.
pub unsafe fn rearrange_taken<T: Default>(
    dst: *mut T,
    src: *mut T,
    fields: &[Field],
    order: &[usize],
) {
    crate::executor::rearrange_fields::<T, Taken>(dst, src, fields, order)
}
