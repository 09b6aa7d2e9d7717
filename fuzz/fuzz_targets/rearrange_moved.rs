#![no_main]

// Checks object lifetimes when moving elements with destructors: a successful call leaves
// both arrays fully alive, a failed one constructs nothing.

use array_rearrange::{ArrayRearrangeHelper, PermutationPlan};
use array_rearrange_common::allocate::{allocate_raw, deallocate_raw};
use array_rearrange_common::object::destroy_range;
use core::sync::atomic::{AtomicIsize, Ordering};
use libfuzzer_sys::{arbitrary, fuzz_target};

static LIVE: AtomicIsize = AtomicIsize::new(0);

struct Counted(u32);

impl Counted {
    fn new(value: u32) -> Self {
        LIVE.fetch_add(1, Ordering::Relaxed);
        Self(value)
    }
}

impl Default for Counted {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        LIVE.fetch_sub(1, Ordering::Relaxed);
    }
}

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub count: u8,
    pub expected_field_count: u8,
    pub lengths: Vec<u8>,
    pub permutation: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let count = input.count as usize;
    let mut src: Vec<Counted> = (0..count as u32).map(Counted::new).collect();
    let live = LIVE.load(Ordering::Relaxed);

    let mut helper = ArrayRearrangeHelper::new(count, input.expected_field_count as usize);
    for &length in &input.lengths {
        if helper.add_field(length as usize).is_err() {
            break;
        }
    }

    let mut storage = allocate_raw::<Counted>(count).unwrap();
    match helper.rearrange_moved(storage.as_uninit_slice_mut(), &mut src, &input.permutation) {
        Ok(dest) => {
            assert_eq!(LIVE.load(Ordering::Relaxed), live + count as isize);
            // Repeated fields move defaults the second time, and leave omitted fields in place.
            let bijection = PermutationPlan::new(&input.permutation, input.permutation.len())
                .is_ok_and(|plan| plan.is_bijection());
            if bijection {
                assert!(src.iter().all(|x| x.0 == u32::MAX));
            }
            unsafe { destroy_range(dest.as_mut_ptr(), dest.len()) };
        }
        Err(_) => {
            assert!(src.iter().enumerate().all(|(i, x)| x.0 == i as u32));
        }
    }
    assert_eq!(LIVE.load(Ordering::Relaxed), live);

    deallocate_raw(storage);
});
