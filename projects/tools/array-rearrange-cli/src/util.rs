#![cfg(not(tarpaulin_include))]

use crate::error::CliError;
use core::str::FromStr;

/// Parses a comma separated list such as `1,2, 3`.
///
/// Empty input yields an empty list. `name` identifies the list in error messages.
pub fn parse_list<T>(name: &'static str, input: &str) -> Result<Vec<T>, CliError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            entry.parse().map_err(|e: T::Err| CliError::InvalidList {
                name,
                entry: entry.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Element offset of each field, given the field lengths in source order.
pub fn field_starts(lengths: &[usize]) -> Vec<usize> {
    let mut offset = 0;
    lengths
        .iter()
        .map(|&length| {
            let start = offset;
            offset += length;
            start
        })
        .collect()
}

/// Builds the expected output of rearranging `src` by `lengths` and `order`.
pub fn expected_arrangement<T: Clone>(src: &[T], lengths: &[usize], order: &[usize]) -> Vec<T> {
    let starts = field_starts(lengths);
    order
        .iter()
        .flat_map(|&field| src[starts[field]..starts[field] + lengths[field]].iter().cloned())
        .collect()
}
