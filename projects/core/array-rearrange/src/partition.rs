//! # Field Partitions
//!
//! A partition splits an array of `total_count` elements into an ordered sequence of contiguous,
//! non-overlapping runs called *fields*. Fields are declared in source order, so the offset of each
//! field is the sum of the lengths declared before it:
//!
//! ```text
//! lengths: {2, 3}
//! +---+---+---+---+---+
//! | 1 | 2 | 3 | 4 | 5 |
//! +---+---+---+---+---+
//! |field 0|  field 1  |
//!  offset 0  offset 2
//! ```
//!
//! The field lengths must sum to `total_count`. When a partition is finished with exactly one
//! field left undeclared, that field absorbs whatever was not yet assigned.

use crate::error::RearrangeError;
use alloc::vec::Vec;
use likely_stable::unlikely;
use tracing::debug;

/// A contiguous run of elements within the source array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    /// Number of elements in the field.
    pub length: usize,
    /// Index of the field's first element in the source array.
    pub offset: usize,
}

/// An ordered list of [`Field`]s summing to a known element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPartition {
    total_count: usize,
    expected_field_count: usize,
    assigned: usize,
    fields: Vec<Field>,
    finished: bool,
}

impl FieldPartition {
    /// Begins a partition of `total_count` elements into up to `expected_field_count` fields.
    pub fn new(total_count: usize, expected_field_count: usize) -> Self {
        Self {
            total_count,
            expected_field_count,
            assigned: 0,
            fields: Vec::with_capacity(expected_field_count),
            finished: false,
        }
    }

    /// Builds and finishes a partition with one field per entry of `lengths`.
    ///
    /// # Errors
    ///
    /// Any error from [`add_field`](Self::add_field) or [`finish`](Self::finish).
    pub fn from_lengths(total_count: usize, lengths: &[usize]) -> Result<Self, RearrangeError> {
        let mut partition = Self::new(total_count, lengths.len());
        for &length in lengths {
            partition.add_field(length)?;
        }
        partition.finish()?;
        Ok(partition)
    }

    /// Appends a field of `length` elements directly after the previously declared one.
    ///
    /// # Errors
    ///
    /// - [`RearrangeError::PartitionFinished`] if [`finish`](Self::finish) already succeeded
    /// - [`RearrangeError::TooManyFields`] if `expected_field_count` fields were already declared
    /// - [`RearrangeError::FieldSumMismatch`] if the running sum would exceed `total_count`
    ///
    /// On error the partition is left unchanged.
    pub fn add_field(&mut self, length: usize) -> Result<(), RearrangeError> {
        if unlikely(self.finished) {
            return Err(RearrangeError::PartitionFinished);
        }

        if unlikely(self.fields.len() >= self.expected_field_count) {
            debug!(expected = self.expected_field_count, "too many fields declared");
            return Err(RearrangeError::TooManyFields {
                expected: self.expected_field_count,
            });
        }

        let assigned = match self.assigned.checked_add(length) {
            Some(sum) if sum <= self.total_count => sum,
            sum => {
                debug!(
                    total = self.total_count,
                    assigned = self.assigned,
                    length,
                    "field does not fit in the array"
                );
                return Err(RearrangeError::FieldSumMismatch {
                    total: self.total_count,
                    assigned: sum.unwrap_or(usize::MAX),
                })
            }
        };

        self.fields.push(Field {
            length,
            offset: self.assigned,
        });
        self.assigned = assigned;
        Ok(())
    }

    /// Finalizes the partition.
    ///
    /// If exactly one field is left undeclared, it is assigned all elements not yet covered
    /// (possibly zero). Finishing an already finished partition succeeds without changes.
    ///
    /// # Errors
    ///
    /// - [`RearrangeError::UnderspecifiedFields`] if two or more fields are left undeclared
    /// - [`RearrangeError::FieldSumMismatch`] if every field is declared but the lengths
    ///   do not sum to `total_count`
    ///
    /// On error the partition is left unchanged.
    pub fn finish(&mut self) -> Result<(), RearrangeError> {
        if self.finished {
            return Ok(());
        }

        let declared = self.fields.len();
        match self.expected_field_count - declared {
            0 => {
                if self.assigned != self.total_count {
                    debug!(
                        total = self.total_count,
                        assigned = self.assigned,
                        "field lengths do not cover the array"
                    );
                    return Err(RearrangeError::FieldSumMismatch {
                        total: self.total_count,
                        assigned: self.assigned,
                    });
                }
            }
            1 => {
                let remainder = self.total_count - self.assigned;
                debug!(
                    field = declared,
                    length = remainder,
                    "assigning remaining elements to last field"
                );
                self.fields.push(Field {
                    length: remainder,
                    offset: self.assigned,
                });
                self.assigned = self.total_count;
            }
            _ => {
                debug!(
                    expected = self.expected_field_count,
                    declared, "too many undeclared fields to complete the partition"
                );
                return Err(RearrangeError::UnderspecifiedFields {
                    expected: self.expected_field_count,
                    declared,
                });
            }
        }

        self.finished = true;
        Ok(())
    }

    /// Returns `true` once [`finish`](Self::finish) has succeeded.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of elements in the partitioned array.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of fields the partition was created for.
    #[inline]
    pub fn expected_field_count(&self) -> usize {
        self.expected_field_count
    }

    /// Number of elements covered by the fields declared so far.
    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.assigned
    }

    /// The fields declared so far, in source order.
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields declared so far.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn offsets_are_prefix_sums() {
        let partition = FieldPartition::from_lengths(5, &[1, 2, 2]).unwrap();
        assert_eq!(
            partition.fields(),
            &[
                Field { length: 1, offset: 0 },
                Field { length: 2, offset: 1 },
                Field { length: 2, offset: 3 },
            ]
        );
    }

    #[test]
    fn last_field_is_auto_completed() {
        let mut partition = FieldPartition::new(5, 2);
        partition.add_field(2).unwrap();
        partition.finish().unwrap();

        assert!(partition.is_finished());
        assert_eq!(partition.fields()[1], Field { length: 3, offset: 2 });
        assert_eq!(partition.assigned_count(), 5);
    }

    #[test]
    fn auto_completed_field_may_be_empty() {
        let mut partition = FieldPartition::new(4, 3);
        partition.add_field(1).unwrap();
        partition.add_field(3).unwrap();
        partition.finish().unwrap();
        assert_eq!(partition.fields()[2], Field { length: 0, offset: 4 });
    }

    #[test]
    fn empty_partition_finishes() {
        let mut partition = FieldPartition::new(0, 0);
        partition.finish().unwrap();
        assert!(partition.fields().is_empty());
    }

    #[rstest]
    #[case::short(5, &[1, 1], RearrangeError::FieldSumMismatch { total: 5, assigned: 2 })]
    #[case::empty_with_elements(3, &[], RearrangeError::FieldSumMismatch { total: 3, assigned: 0 })]
    #[case::over(3, &[2, 2], RearrangeError::FieldSumMismatch { total: 3, assigned: 4 })]
    fn invalid_lengths_are_rejected(
        #[case] total: usize,
        #[case] lengths: &[usize],
        #[case] expected: RearrangeError,
    ) {
        assert_eq!(FieldPartition::from_lengths(total, lengths), Err(expected));
    }

    #[test]
    fn overflowing_field_leaves_partition_unchanged() {
        let mut partition = FieldPartition::new(4, 3);
        partition.add_field(3).unwrap();
        let before = partition.clone();

        assert_eq!(
            partition.add_field(2),
            Err(RearrangeError::FieldSumMismatch {
                total: 4,
                assigned: 5
            })
        );
        assert_eq!(partition, before);
    }

    #[test]
    fn huge_field_does_not_overflow() {
        let mut partition = FieldPartition::new(usize::MAX, 2);
        partition.add_field(usize::MAX).unwrap();
        assert_eq!(
            partition.add_field(1),
            Err(RearrangeError::FieldSumMismatch {
                total: usize::MAX,
                assigned: usize::MAX
            })
        );
    }

    #[test]
    fn too_many_fields_are_rejected() {
        let mut partition = FieldPartition::new(4, 1);
        partition.add_field(4).unwrap();
        assert_eq!(
            partition.add_field(0),
            Err(RearrangeError::TooManyFields { expected: 1 })
        );
    }

    #[test]
    fn two_missing_fields_are_ambiguous() {
        let mut partition = FieldPartition::new(5, 3);
        partition.add_field(2).unwrap();
        assert_eq!(
            partition.finish(),
            Err(RearrangeError::UnderspecifiedFields {
                expected: 3,
                declared: 1
            })
        );
        assert!(!partition.is_finished());

        // Declaring one more field makes it recoverable.
        partition.add_field(1).unwrap();
        partition.finish().unwrap();
        assert_eq!(partition.fields()[2], Field { length: 2, offset: 3 });
    }

    #[test]
    fn finished_partition_rejects_new_fields() {
        let mut partition = FieldPartition::from_lengths(2, &[1, 1]).unwrap();
        assert_eq!(partition.add_field(0), Err(RearrangeError::PartitionFinished));

        // finishing again is a no-op
        partition.finish().unwrap();
        assert_eq!(partition.field_count(), 2);
    }
}
