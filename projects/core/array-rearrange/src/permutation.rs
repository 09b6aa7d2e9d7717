//! # Permutation Plans
//!
//! A permutation lists, in destination order, which source field goes next:
//!
//! ```text
//! fields: {1, 2, 2}    permutation: {0, 2, 1}
//!
//! source:      | 0 | 1   2 | 3   4 |
//!               f0   f1      f2
//! destination: | 0 | 3   4 | 1   2 |
//!               f0   f2      f1
//! ```
//!
//! Validation is purely structural: one entry per field, each entry naming an existing field.
//! Entries are not required to be distinct.

use crate::error::RearrangeError;
use alloc::vec;
use alloc::vec::Vec;
use tracing::debug;

/// An integer type which can be used as a permutation entry.
///
/// Signed types are accepted so that negative (and therefore invalid) entries can be expressed
/// and rejected during validation rather than at the call site.
pub trait PermutationIndex: Copy {
    /// Widens the entry to an `i128`, which can represent every supported index type losslessly.
    fn to_i128(self) -> i128;
}

macro_rules! impl_permutation_index {
    ($($ty:ty),*) => {
        $(
            impl PermutationIndex for $ty {
                #[inline(always)]
                fn to_i128(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_permutation_index!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// A validated destination order of field indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationPlan {
    order: Vec<usize>,
}

impl PermutationPlan {
    /// Validates `indices` against a partition with `field_count` fields.
    ///
    /// # Errors
    ///
    /// - [`RearrangeError::PermutationLengthMismatch`] if `indices.len() != field_count`
    /// - [`RearrangeError::InvalidPermutationIndex`] if any entry is negative or `>= field_count`
    pub fn new<I: PermutationIndex>(
        indices: &[I],
        field_count: usize,
    ) -> Result<Self, RearrangeError> {
        validate_permutation(indices, field_count)?;

        // Validated above, every entry is within `0..field_count`.
        let order = indices.iter().map(|x| x.to_i128() as usize).collect();
        Ok(Self { order })
    }

    /// Keeps every field in its source position.
    pub fn identity(field_count: usize) -> Self {
        Self {
            order: (0..field_count).collect(),
        }
    }

    /// Emits the fields last to first.
    pub fn reversed(field_count: usize) -> Self {
        Self {
            order: (0..field_count).rev().collect(),
        }
    }

    /// The field indices in destination order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Number of entries in the plan.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the plan has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if every field appears exactly once.
    ///
    /// Plans which are not bijections duplicate some fields and omit others.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.order.len()];
        for &index in &self.order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

/// Checks that `indices` holds exactly one in-range entry per field.
///
/// # Errors
///
/// See [`PermutationPlan::new`].
pub fn validate_permutation<I: PermutationIndex>(
    indices: &[I],
    field_count: usize,
) -> Result<(), RearrangeError> {
    if indices.len() != field_count {
        debug!(
            expected = field_count,
            actual = indices.len(),
            "permutation length does not match field count"
        );
        return Err(RearrangeError::PermutationLengthMismatch {
            expected: field_count,
            actual: indices.len(),
        });
    }

    for (position, index) in indices.iter().enumerate() {
        let index = index.to_i128();
        if index < 0 || index >= field_count as i128 {
            debug!(position, index = %index, field_count, "permutation entry out of range");
            return Err(RearrangeError::InvalidPermutationIndex {
                position,
                index,
                field_count,
            });
        }
    }

    Ok(())
}
