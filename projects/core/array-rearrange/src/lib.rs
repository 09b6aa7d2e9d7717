#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

pub mod error;
pub mod executor;
pub mod partition;
pub mod permutation;
pub mod transfer;

mod facade;
mod helper;

#[cfg(feature = "bench")]
pub mod bench;

pub use error::{RearrangeError, RearrangeErrorKind};
pub use executor::{execute, execute_cloned, execute_into, execute_moved, validate_rearrange};
pub use facade::{
    array_rearrange, array_rearrange_cloned, array_rearrange_into, array_rearrange_moved,
};
pub use helper::ArrayRearrangeHelper;
pub use partition::{Field, FieldPartition};
pub use permutation::{PermutationIndex, PermutationPlan};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
