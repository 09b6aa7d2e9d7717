//! # Rearrange Executor
//!
//! Moves the fields of a source array into a destination buffer in the order given by a
//! [`PermutationPlan`].
//!
//! Every entry point first runs [`validate_rearrange`], and only writes once the whole call is
//! known to succeed. A returned `Err` therefore never leaves constructed objects in the destination
//! and never touches the source.
//!
//! | Function            | Element bound | Destination                 | Source afterwards      |
//! |---------------------|---------------|-----------------------------|------------------------|
//! | [`execute`]         | `Copy`        | `&mut [MaybeUninit<T>]`     | unchanged              |
//! | [`execute_into`]    | `Copy`        | `&mut [T]`                  | unchanged              |
//! | [`execute_cloned`]  | `Clone`       | `&mut [MaybeUninit<T>]`     | unchanged              |
//! | [`execute_moved`]   | `Default`     | `&mut [MaybeUninit<T>]`     | `T::default()` in each transferred slot |
//!
//! Destinations of element-constructing calls are uninitialized slots. On success the now
//! initialized slice is returned; its elements are not dropped automatically, so callers holding
//! types with destructors must drop them
//! (e.g. with [`destroy_range`](array_rearrange_common::object::destroy_range)).

use crate::error::RearrangeError;
use crate::partition::{Field, FieldPartition};
use crate::permutation::PermutationPlan;
use crate::transfer::{Cloned, Copied, Taken, Transfer};
use core::mem::MaybeUninit;
use likely_stable::unlikely;
use tracing::{debug, trace};

/// Checks that rearranging `source_len` elements into `destination_len` slots with the given
/// partition and plan is well defined, without touching either buffer.
///
/// # Errors
///
/// - [`RearrangeError::PartitionNotFinished`] if the partition was never finished
/// - [`RearrangeError::PermutationLengthMismatch`] if the plan has a different number of entries
///   than the partition has fields
/// - [`RearrangeError::InvalidPermutationIndex`] if the plan names a field the partition does not have
/// - [`RearrangeError::SourceLengthMismatch`] / [`RearrangeError::DestinationLengthMismatch`] if a
///   buffer does not hold exactly the partitioned element count
/// - [`RearrangeError::PermutationCoverageMismatch`] if the fields selected by the plan do not add
///   up to the destination length. This can only happen with plans which are not bijections.
pub fn validate_rearrange(
    partition: &FieldPartition,
    plan: &PermutationPlan,
    source_len: usize,
    destination_len: usize,
) -> Result<(), RearrangeError> {
    if unlikely(!partition.is_finished()) {
        return Err(RearrangeError::PartitionNotFinished);
    }

    let fields = partition.fields();
    if unlikely(plan.len() != fields.len()) {
        debug!(
            expected = fields.len(),
            actual = plan.len(),
            "permutation length does not match field count"
        );
        return Err(RearrangeError::PermutationLengthMismatch {
            expected: fields.len(),
            actual: plan.len(),
        });
    }

    let total = partition.total_count();
    if unlikely(source_len != total) {
        debug!(expected = total, actual = source_len, "source length mismatch");
        return Err(RearrangeError::SourceLengthMismatch {
            expected: total,
            actual: source_len,
        });
    }

    if unlikely(destination_len != total) {
        debug!(expected = total, actual = destination_len, "destination length mismatch");
        return Err(RearrangeError::DestinationLengthMismatch {
            expected: total,
            actual: destination_len,
        });
    }

    // A plan may have been built against a different partition, so the range is checked again.
    let mut covered: usize = 0;
    for (position, &index) in plan.as_slice().iter().enumerate() {
        let Some(field) = fields.get(index) else {
            debug!(position, index, "permutation entry out of range");
            return Err(RearrangeError::InvalidPermutationIndex {
                position,
                index: index as i128,
                field_count: fields.len(),
            });
        };

        // Repeated fields can push the sum past usize::MAX.
        covered = covered.saturating_add(field.length);
    }

    if unlikely(covered != total) {
        debug!(
            expected = total,
            actual = covered,
            "permutation does not cover the destination exactly once"
        );
        return Err(RearrangeError::PermutationCoverageMismatch {
            expected: total,
            actual: covered,
        });
    }

    Ok(())
}

/// Transfers each field named by `order` into `dst`, back to back.
///
/// # Safety
///
/// - `src` must point to the constructed elements described by `fields`, valid for the reads
///   (and writes) `S` performs
/// - `dst` must be valid for writes of the sum of the lengths of the fields named by `order`
/// - Every entry of `order` must be a valid index into `fields`
/// - `src` and `dst` must not overlap
///
/// These are exactly the conditions [`validate_rearrange`] establishes.
#[inline]
pub(crate) unsafe fn rearrange_fields<T, S: Transfer<T>>(
    dst: *mut T,
    src: *mut T,
    fields: &[Field],
    order: &[usize],
) {
    let mut dest_offset = 0;
    for &index in order {
        let field = *fields.get_unchecked(index);
        if field.length == 0 {
            continue;
        }

        S::transfer(dst.add(dest_offset), src.add(field.offset), field.length);
        dest_offset += field.length;
    }
}

/// Validates, then runs [`rearrange_fields`] with strategy `S`.
///
/// # Safety
///
/// `src` must be valid for `source_len` elements and for the accesses of `S`. `dst` must be valid
/// for writes of `destination_len` elements and must not overlap `src`.
#[inline]
unsafe fn validate_and_rearrange<T, S: Transfer<T>>(
    dst: *mut T,
    destination_len: usize,
    src: *mut T,
    source_len: usize,
    partition: &FieldPartition,
    plan: &PermutationPlan,
) -> Result<(), RearrangeError> {
    validate_rearrange(partition, plan, source_len, destination_len)?;
    trace!(
        total_count = partition.total_count(),
        fields = partition.field_count(),
        strategy = S::NAME,
        "rearranging fields"
    );

    rearrange_fields::<T, S>(dst, src, partition.fields(), plan.as_slice());
    Ok(())
}

/// Rearranges `Copy` elements into uninitialized slots with one bulk copy per field.
///
/// Returns the initialized destination.
///
/// # Errors
///
/// See [`validate_rearrange`]. Nothing is written on error.
///
/// # Example
///
/// ```
/// use array_rearrange::{execute, FieldPartition, PermutationPlan};
/// use core::mem::MaybeUninit;
///
/// let partition = FieldPartition::from_lengths(5, &[2, 3]).unwrap();
/// let plan = PermutationPlan::new(&[1, 0], partition.field_count()).unwrap();
///
/// let mut dest = [MaybeUninit::<u32>::uninit(); 5];
/// let dest = execute(&mut dest, &[1, 2, 3, 4, 5], &partition, &plan).unwrap();
/// assert_eq!(dest, &[3, 4, 5, 1, 2]);
/// ```
pub fn execute<'d, T: Copy>(
    dst: &'d mut [MaybeUninit<T>],
    src: &[T],
    partition: &FieldPartition,
    plan: &PermutationPlan,
) -> Result<&'d mut [T], RearrangeError> {
    // SAFETY: `Copied` only reads the source, and `&mut` excludes overlap with `src`.
    unsafe {
        validate_and_rearrange::<T, Copied>(
            dst.as_mut_ptr() as *mut T,
            dst.len(),
            src.as_ptr() as *mut T,
            src.len(),
            partition,
            plan,
        )?;
        Ok(assume_init_mut(dst))
    }
}

/// Rearranges `Copy` elements into an already initialized destination, overwriting it.
///
/// # Errors
///
/// See [`validate_rearrange`]. `dst` is left unmodified on error.
pub fn execute_into<T: Copy>(
    dst: &mut [T],
    src: &[T],
    partition: &FieldPartition,
    plan: &PermutationPlan,
) -> Result<(), RearrangeError> {
    // SAFETY: `T: Copy` has no drop glue, so overwriting initialized elements is sound.
    unsafe {
        validate_and_rearrange::<T, Copied>(
            dst.as_mut_ptr(),
            dst.len(),
            src.as_ptr() as *mut T,
            src.len(),
            partition,
            plan,
        )
    }
}

/// Rearranges elements into uninitialized slots by cloning each one.
///
/// The source is left intact. If a `clone` panics, the elements constructed so far are leaked.
///
/// # Errors
///
/// See [`validate_rearrange`]. Nothing is constructed on error.
pub fn execute_cloned<'d, T: Clone>(
    dst: &'d mut [MaybeUninit<T>],
    src: &[T],
    partition: &FieldPartition,
    plan: &PermutationPlan,
) -> Result<&'d mut [T], RearrangeError> {
    // SAFETY: `Cloned` only reads the source.
    unsafe {
        validate_and_rearrange::<T, Cloned>(
            dst.as_mut_ptr() as *mut T,
            dst.len(),
            src.as_ptr() as *mut T,
            src.len(),
            partition,
            plan,
        )?;
        Ok(assume_init_mut(dst))
    }
}

/// Rearranges elements into uninitialized slots by moving each one out of the source.
///
/// Every transferred source slot is left holding `T::default()`. The source elements stay alive,
/// so after a successful call both `src` and the returned slice hold `src.len()` live objects.
///
/// # Errors
///
/// See [`validate_rearrange`]. Nothing is constructed and `src` is untouched on error.
pub fn execute_moved<'d, T: Default>(
    dst: &'d mut [MaybeUninit<T>],
    src: &mut [T],
    partition: &FieldPartition,
    plan: &PermutationPlan,
) -> Result<&'d mut [T], RearrangeError> {
    unsafe {
        validate_and_rearrange::<T, Taken>(
            dst.as_mut_ptr() as *mut T,
            dst.len(),
            src.as_mut_ptr(),
            src.len(),
            partition,
            plan,
        )?;
        Ok(assume_init_mut(dst))
    }
}

/// # Safety
///
/// Every element of `slice` must be initialized.
#[inline(always)]
unsafe fn assume_init_mut<T>(slice: &mut [MaybeUninit<T>]) -> &mut [T] {
    &mut *(slice as *mut [MaybeUninit<T>] as *mut [T])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn uninit<T>(len: usize) -> Vec<MaybeUninit<T>> {
        (0..len).map(|_| MaybeUninit::uninit()).collect()
    }

    fn plan(indices: &[usize], field_count: usize) -> PermutationPlan {
        PermutationPlan::new(indices, field_count).unwrap()
    }

    #[rstest]
    #[case::swap_halves(&[1, 2, 3, 4, 5], &[2, 3], &[1, 0], &[3, 4, 5, 1, 2])]
    #[case::three_fields(&[0, 1, 2, 3, 4], &[1, 2, 2], &[0, 2, 1], &[0, 3, 4, 1, 2])]
    #[case::identity(&[9, 8, 7], &[3], &[0], &[9, 8, 7])]
    #[case::zero_length_field(&[1, 2, 3], &[1, 0, 2], &[2, 1, 0], &[2, 3, 1])]
    #[case::reverse_singletons(&[1, 2, 3, 4], &[1, 1, 1, 1], &[3, 2, 1, 0], &[4, 3, 2, 1])]
    fn rearranges_copy_elements(
        #[case] src: &[u32],
        #[case] lengths: &[usize],
        #[case] order: &[usize],
        #[case] expected: &[u32],
    ) {
        let partition = FieldPartition::from_lengths(src.len(), lengths).unwrap();
        let plan = plan(order, lengths.len());

        let mut dest = uninit::<u32>(src.len());
        assert_eq!(execute(&mut dest, src, &partition, &plan).unwrap(), expected);

        let mut dest = vec![0u32; src.len()];
        execute_into(&mut dest, src, &partition, &plan).unwrap();
        assert_eq!(dest, expected);
    }

    #[test]
    fn empty_array_is_a_no_op() {
        let partition = FieldPartition::from_lengths(0, &[]).unwrap();
        let plan = plan(&[], 0);
        let mut dest = uninit::<u8>(0);
        assert!(execute(&mut dest, &[], &partition, &plan).unwrap().is_empty());
    }

    #[test]
    fn unfinished_partition_is_rejected() {
        let partition = FieldPartition::new(2, 1);
        assert_eq!(
            validate_rearrange(&partition, &plan(&[], 0), 2, 2),
            Err(RearrangeError::PartitionNotFinished)
        );
    }

    #[rstest]
    #[case::short_source(1, 2, RearrangeError::SourceLengthMismatch { expected: 2, actual: 1 })]
    #[case::long_destination(2, 3, RearrangeError::DestinationLengthMismatch { expected: 2, actual: 3 })]
    fn buffer_lengths_are_checked(
        #[case] source_len: usize,
        #[case] destination_len: usize,
        #[case] expected: RearrangeError,
    ) {
        let partition = FieldPartition::from_lengths(2, &[1, 1]).unwrap();
        assert_eq!(
            validate_rearrange(&partition, &plan(&[1, 0], 2), source_len, destination_len),
            Err(expected)
        );
    }

    #[test]
    fn plan_for_another_partition_is_rejected() {
        let partition = FieldPartition::from_lengths(2, &[1, 1]).unwrap();
        assert_eq!(
            validate_rearrange(&partition, &plan(&[0, 1, 2], 3), 2, 2),
            Err(RearrangeError::PermutationLengthMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn duplicating_plan_with_equal_lengths_is_accepted() {
        let partition = FieldPartition::from_lengths(4, &[2, 2]).unwrap();
        let mut dest = [0u8; 4];
        execute_into(&mut dest, &[1, 2, 3, 4], &partition, &plan(&[1, 1], 2)).unwrap();
        assert_eq!(dest, [3, 4, 3, 4]);
    }

    #[rstest]
    #[case::overflows_destination(&[1, 1], 6)]
    #[case::underfills_destination(&[0, 0], 2)]
    fn uneven_duplicating_plan_is_rejected(#[case] order: &[usize], #[case] actual: usize) {
        let partition = FieldPartition::from_lengths(4, &[1, 3]).unwrap();
        let mut dest = [0u8; 4];
        assert_eq!(
            execute_into(&mut dest, &[1, 2, 3, 4], &partition, &plan(order, 2)),
            Err(RearrangeError::PermutationCoverageMismatch {
                expected: 4,
                actual
            })
        );
        assert_eq!(dest, [0; 4]);
    }

    #[test]
    fn cloned_leaves_source_intact() {
        let src: Vec<String> = ["a", "b", "c"].iter().map(|x| x.to_string()).collect();
        let partition = FieldPartition::from_lengths(3, &[1, 2]).unwrap();

        let mut dest = uninit::<String>(3);
        let out = execute_cloned(&mut dest, &src, &partition, &plan(&[1, 0], 2)).unwrap();
        assert_eq!(out, &["b", "c", "a"]);
        assert_eq!(src, ["a", "b", "c"]);

        unsafe { array_rearrange_common::object::destroy_range(out.as_mut_ptr(), out.len()) };
    }

    #[test]
    fn moved_leaves_defaults_behind() {
        Tracked::reset();
        let mut src: Vec<Tracked> = (0..4).map(Tracked::new).collect();
        let partition = FieldPartition::from_lengths(4, &[3, 1]).unwrap();

        let mut dest = uninit::<Tracked>(4);
        let out = execute_moved(&mut dest, &mut src, &partition, &plan(&[1, 0], 2)).unwrap();

        let values: Vec<i32> = out.iter().map(|x| x.value).collect();
        assert_eq!(values, [3, 0, 1, 2]);
        assert!(src.iter().all(|x| x.value == Tracked::DEFAULT_VALUE));
        assert_eq!(Tracked::alive(), 8);

        unsafe { array_rearrange_common::object::destroy_range(out.as_mut_ptr(), out.len()) };
        assert_eq!(Tracked::alive(), 4);
        drop(src);
        assert_eq!(Tracked::alive(), 0);
    }

    #[test]
    fn rejected_move_constructs_nothing() {
        Tracked::reset();
        let mut src: Vec<Tracked> = (0..3).map(Tracked::new).collect();
        let partition = FieldPartition::from_lengths(3, &[1, 2]).unwrap();

        let mut dest = uninit::<Tracked>(3);
        let result = execute_moved(&mut dest, &mut src, &partition, &plan(&[0, 0], 2));
        assert_eq!(
            result.map(|x| x.len()),
            Err(RearrangeError::PermutationCoverageMismatch {
                expected: 3,
                actual: 2
            })
        );

        assert_eq!(Tracked::alive(), 3);
        let values: Vec<i32> = src.iter().map(|x| x.value).collect();
        assert_eq!(values, [0, 1, 2]);
    }
}
