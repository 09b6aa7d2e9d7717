//! One-call rearrange functions.
//!
//! Each function builds a [`FieldPartition`] from `field_lengths` (one field per entry), validates
//! `permutation` against it, and runs the matching executor. Use
//! [`ArrayRearrangeHelper`](crate::ArrayRearrangeHelper) to build the partition incrementally instead.

use crate::error::RearrangeError;
use crate::executor::{execute, execute_cloned, execute_into, execute_moved};
use crate::partition::FieldPartition;
use crate::permutation::{PermutationIndex, PermutationPlan};
use core::mem::MaybeUninit;

#[inline]
fn prepare<I: PermutationIndex>(
    count: usize,
    field_lengths: &[usize],
    permutation: &[I],
) -> Result<(FieldPartition, PermutationPlan), RearrangeError> {
    let partition = FieldPartition::from_lengths(count, field_lengths)?;
    let plan = PermutationPlan::new(permutation, partition.field_count())?;
    Ok((partition, plan))
}

/// Rearranges the `Copy` elements of `src` into `dst`.
///
/// # Arguments
///
/// - `dst`: Uninitialized destination, `src.len()` elements long
/// - `src`: The elements to rearrange
/// - `field_lengths`: Lengths of the fields `src` is split into, in source order. Must sum to `src.len()`.
/// - `permutation`: Index of the field to emit at each destination position
///
/// # Errors
///
/// Returns a [`RearrangeError`] if the fields or permutation are invalid, or the buffers differ in
/// length. Nothing is written on error.
///
/// # Example
///
/// ```
/// use array_rearrange::array_rearrange;
/// use core::mem::MaybeUninit;
///
/// let mut dest = [MaybeUninit::<i32>::uninit(); 5];
/// let dest = array_rearrange(&mut dest, &[0, 1, 2, 3, 4], &[1, 2, 2], &[0, 2, 1]).unwrap();
/// assert_eq!(dest, &[0, 3, 4, 1, 2]);
/// ```
pub fn array_rearrange<'d, T: Copy, I: PermutationIndex>(
    dst: &'d mut [MaybeUninit<T>],
    src: &[T],
    field_lengths: &[usize],
    permutation: &[I],
) -> Result<&'d mut [T], RearrangeError> {
    let (partition, plan) = prepare(src.len(), field_lengths, permutation)?;
    execute(dst, src, &partition, &plan)
}

/// Like [`array_rearrange`], but overwrites an initialized destination.
pub fn array_rearrange_into<T: Copy, I: PermutationIndex>(
    dst: &mut [T],
    src: &[T],
    field_lengths: &[usize],
    permutation: &[I],
) -> Result<(), RearrangeError> {
    let (partition, plan) = prepare(src.len(), field_lengths, permutation)?;
    execute_into(dst, src, &partition, &plan)
}

/// Like [`array_rearrange`], but clone-constructs each element.
pub fn array_rearrange_cloned<'d, T: Clone, I: PermutationIndex>(
    dst: &'d mut [MaybeUninit<T>],
    src: &[T],
    field_lengths: &[usize],
    permutation: &[I],
) -> Result<&'d mut [T], RearrangeError> {
    let (partition, plan) = prepare(src.len(), field_lengths, permutation)?;
    execute_cloned(dst, src, &partition, &plan)
}

/// Like [`array_rearrange`], but moves each element out of `src`, leaving `T::default()` behind.
///
/// The source elements stay alive and are dropped by their owner as usual.
pub fn array_rearrange_moved<'d, T: Default, I: PermutationIndex>(
    dst: &'d mut [MaybeUninit<T>],
    src: &mut [T],
    field_lengths: &[usize],
    permutation: &[I],
) -> Result<&'d mut [T], RearrangeError> {
    let (partition, plan) = prepare(src.len(), field_lengths, permutation)?;
    execute_moved(dst, src, &partition, &plan)
}
