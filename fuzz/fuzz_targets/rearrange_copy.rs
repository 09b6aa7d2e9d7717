#![no_main]

// Checks that any accepted rearrangement writes each selected field contiguously,
// and that any rejected one leaves the destination untouched.

use array_rearrange::array_rearrange_into;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub values: Vec<u16>,
    pub lengths: Vec<u8>,
    pub permutation: Vec<i8>,
}

fuzz_target!(|input: Input| {
    let lengths: Vec<usize> = input.lengths.iter().map(|&x| x as usize).collect();
    let mut dest = vec![u16::MAX; input.values.len()];

    let result = array_rearrange_into(&mut dest, &input.values, &lengths, &input.permutation);
    if result.is_err() {
        assert!(dest.iter().all(|&x| x == u16::MAX));
        return;
    }

    let mut starts = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &length in &lengths {
        starts.push(offset);
        offset += length;
    }

    let mut dest_offset = 0;
    for &field in &input.permutation {
        let field = field as usize;
        let (start, length) = (starts[field], lengths[field]);
        assert_eq!(
            &dest[dest_offset..dest_offset + length],
            &input.values[start..start + length]
        );
        dest_offset += length;
    }
    assert_eq!(dest_offset, dest.len());
});
