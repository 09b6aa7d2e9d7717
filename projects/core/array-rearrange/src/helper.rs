//! Incremental rearrange builder.

use crate::error::RearrangeError;
use crate::executor::{execute, execute_cloned, execute_into, execute_moved};
use crate::partition::FieldPartition;
use crate::permutation::{PermutationIndex, PermutationPlan};
use core::mem::MaybeUninit;

/// Builds a [`FieldPartition`] one field at a time, then rearranges arrays with it.
///
/// The `rearrange*` methods finish the partition if that was not already done, so the common
/// pattern of declaring every field but the last one works without an explicit [`finish`](Self::finish).
///
/// # Example
///
/// ```
/// use array_rearrange::ArrayRearrangeHelper;
/// use core::mem::MaybeUninit;
///
/// let mut helper = ArrayRearrangeHelper::new(5, 2);
/// helper.add_field(2).unwrap();
///
/// let mut dest = [MaybeUninit::<u8>::uninit(); 5];
/// let dest = helper.rearrange(&mut dest, &[1, 2, 3, 4, 5], &[1, 0]).unwrap();
/// assert_eq!(dest, &[3, 4, 5, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayRearrangeHelper {
    partition: FieldPartition,
}

impl ArrayRearrangeHelper {
    /// Starts a partition of `total_count` elements into up to `expected_field_count` fields.
    pub fn new(total_count: usize, expected_field_count: usize) -> Self {
        Self {
            partition: FieldPartition::new(total_count, expected_field_count),
        }
    }

    /// Declares the next field. See [`FieldPartition::add_field`].
    pub fn add_field(&mut self, length: usize) -> Result<(), RearrangeError> {
        self.partition.add_field(length)
    }

    /// Finishes the partition. See [`FieldPartition::finish`].
    pub fn finish(&mut self) -> Result<(), RearrangeError> {
        self.partition.finish()
    }

    /// The partition built so far.
    #[inline]
    pub fn partition(&self) -> &FieldPartition {
        &self.partition
    }

    fn plan<I: PermutationIndex>(
        &mut self,
        permutation: &[I],
    ) -> Result<PermutationPlan, RearrangeError> {
        self.partition.finish()?;
        PermutationPlan::new(permutation, self.partition.field_count())
    }

    /// Rearranges `Copy` elements into `dst`. See [`execute`].
    pub fn rearrange<'d, T: Copy, I: PermutationIndex>(
        &mut self,
        dst: &'d mut [MaybeUninit<T>],
        src: &[T],
        permutation: &[I],
    ) -> Result<&'d mut [T], RearrangeError> {
        let plan = self.plan(permutation)?;
        execute(dst, src, &self.partition, &plan)
    }

    /// Rearranges `Copy` elements into an initialized `dst`. See [`execute_into`].
    pub fn rearrange_into<T: Copy, I: PermutationIndex>(
        &mut self,
        dst: &mut [T],
        src: &[T],
        permutation: &[I],
    ) -> Result<(), RearrangeError> {
        let plan = self.plan(permutation)?;
        execute_into(dst, src, &self.partition, &plan)
    }

    /// Rearranges clones of the source elements into `dst`. See [`execute_cloned`].
    pub fn rearrange_cloned<'d, T: Clone, I: PermutationIndex>(
        &mut self,
        dst: &'d mut [MaybeUninit<T>],
        src: &[T],
        permutation: &[I],
    ) -> Result<&'d mut [T], RearrangeError> {
        let plan = self.plan(permutation)?;
        execute_cloned(dst, src, &self.partition, &plan)
    }

    /// Moves the source elements into `dst`, leaving defaults behind. See [`execute_moved`].
    pub fn rearrange_moved<'d, T: Default, I: PermutationIndex>(
        &mut self,
        dst: &'d mut [MaybeUninit<T>],
        src: &mut [T],
        permutation: &[I],
    ) -> Result<&'d mut [T], RearrangeError> {
        let plan = self.plan(permutation)?;
        execute_moved(dst, src, &self.partition, &plan)
    }
}
