#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![cfg_attr(feature = "nightly", feature(allocator_api))]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod allocate;
pub mod object;

#[cfg(test)]
pub(crate) mod test_prelude;
