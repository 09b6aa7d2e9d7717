//! Error types for array rearrange operations.

use thiserror::Error;

/// Validation errors for field partitions, permutations and rearrange calls.
///
/// Every error is raised before any element is written, so an `Err` never leaves
/// constructed objects behind in the destination or modifies the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RearrangeError {
    /// The declared field lengths do not sum to the total element count.
    #[error("Field lengths sum to {assigned}, but the array holds {total} elements")]
    FieldSumMismatch {
        /// Total number of elements in the array.
        total: usize,
        /// Sum of the field lengths, including the rejected field if any.
        assigned: usize,
    },

    /// More fields were declared than the partition was created for.
    #[error("Too many fields: the partition expects at most {expected}")]
    TooManyFields {
        /// Number of fields the partition was created for.
        expected: usize,
    },

    /// More than one field was left undeclared, so the remainder cannot be assigned unambiguously.
    #[error("Partition expects {expected} fields but only {declared} were declared; only the last field can be completed automatically")]
    UnderspecifiedFields {
        /// Number of fields the partition was created for.
        expected: usize,
        /// Number of fields declared.
        declared: usize,
    },

    /// A field was added after the partition was finished.
    #[error("Field partition is already finished")]
    PartitionFinished,

    /// The partition was used before being finished.
    #[error("Field partition must be finished before it is used")]
    PartitionNotFinished,

    /// A permutation entry does not name an existing field.
    #[error("Invalid permutation entry {index} at position {position}: valid field indices are 0..{field_count}")]
    InvalidPermutationIndex {
        /// Position of the entry in the permutation.
        position: usize,
        /// The offending entry.
        index: i128,
        /// Number of fields in the partition.
        field_count: usize,
    },

    /// The permutation does not have one entry per field.
    #[error("Permutation has {actual} entries, but the partition has {expected} fields")]
    PermutationLengthMismatch {
        /// Number of fields in the partition.
        expected: usize,
        /// Number of entries in the permutation.
        actual: usize,
    },

    /// The fields named by the permutation do not cover exactly the destination.
    #[error("Permutation selects {actual} elements, but the destination holds {expected}")]
    PermutationCoverageMismatch {
        /// Number of elements in the destination.
        expected: usize,
        /// Number of elements the permutation would write.
        actual: usize,
    },

    /// The source buffer does not hold the partitioned number of elements.
    #[error("Source holds {actual} elements, but the partition covers {expected}")]
    SourceLengthMismatch {
        /// Elements covered by the partition.
        expected: usize,
        /// Elements in the source.
        actual: usize,
    },

    /// The destination buffer does not hold the partitioned number of elements.
    #[error("Destination holds {actual} elements, but the partition covers {expected}")]
    DestinationLengthMismatch {
        /// Elements covered by the partition.
        expected: usize,
        /// Elements in the destination.
        actual: usize,
    },
}

/// Broad category of a [`RearrangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RearrangeErrorKind {
    /// The partition invariant (field lengths sum to the element count) is violated.
    FieldSumMismatch,
    /// The permutation references a non-existent field, or does not fit the partition.
    InvalidPermutationIndex,
    /// A source or destination buffer has the wrong length.
    BufferLengthMismatch,
}

impl RearrangeError {
    /// Details about which invariant the rejected operation violated.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> RearrangeErrorKind {
        match self {
            Self::FieldSumMismatch { .. }
            | Self::TooManyFields { .. }
            | Self::UnderspecifiedFields { .. }
            | Self::PartitionFinished
            | Self::PartitionNotFinished => RearrangeErrorKind::FieldSumMismatch,
            Self::InvalidPermutationIndex { .. }
            | Self::PermutationLengthMismatch { .. }
            | Self::PermutationCoverageMismatch { .. } => {
                RearrangeErrorKind::InvalidPermutationIndex
            }
            Self::SourceLengthMismatch { .. } | Self::DestinationLengthMismatch { .. } => {
                RearrangeErrorKind::BufferLengthMismatch
            }
        }
    }
}
