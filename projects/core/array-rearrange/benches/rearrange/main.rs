use array_rearrange::*;
use array_rearrange_common::allocate::{allocate_raw, deallocate_raw};
use array_rearrange_common::object::destroy_range;
use core::time::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

#[cfg(not(target_os = "windows"))]
use pprof::criterion::{Output, PProfProfiler};

// Element count for every benchmark. 1 MiB of u32.
const COUNT: usize = 262144;

fn random_partition(field_count: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cuts: Vec<usize> = (0..field_count - 1)
        .map(|_| rng.gen_range(0..=COUNT))
        .collect();
    cuts.push(0);
    cuts.push(COUNT);
    cuts.sort_unstable();

    let lengths = cuts.windows(2).map(|x| x[1] - x[0]).collect();
    let mut order: Vec<usize> = (0..field_count).collect();
    order.shuffle(&mut rng);
    (lengths, order)
}

fn bench_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rearrange Copy");
    group.throughput(Throughput::Bytes((COUNT * core::mem::size_of::<u32>()) as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    let src: Vec<u32> = (0..COUNT as u32).collect();
    let mut dest = vec![0u32; COUNT];

    for field_count in [2, 16, 256, 4096] {
        let (lengths, order) = random_partition(field_count, field_count as u64);
        let partition = FieldPartition::from_lengths(COUNT, &lengths).unwrap();
        let plan = PermutationPlan::new(&order, field_count).unwrap();

        group.bench_with_input(
            BenchmarkId::new("validated", field_count),
            &field_count,
            |b, _| {
                b.iter(|| {
                    execute_into(
                        black_box(&mut dest),
                        black_box(&src),
                        &partition,
                        &plan,
                    )
                    .unwrap()
                });
            },
        );

        #[cfg(feature = "bench")]
        group.bench_with_input(
            BenchmarkId::new("unchecked", field_count),
            &field_count,
            |b, _| {
                b.iter(|| unsafe {
                    bench::rearrange_copied(
                        black_box(dest.as_mut_ptr()),
                        black_box(src.as_ptr()),
                        partition.fields(),
                        plan.as_slice(),
                    )
                });
            },
        );
    }

    // Worst case for per-field overhead: every element is its own field.
    let lengths = vec![1; COUNT];
    group.bench_function("reverse singletons", |b| {
        let reversed: Vec<usize> = (0..COUNT).rev().collect();
        b.iter(|| {
            array_rearrange_into(black_box(&mut dest), black_box(&src), &lengths, &reversed)
                .unwrap()
        });
    });

    group.finish();
}

fn bench_moved(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rearrange Moved");
    group.throughput(Throughput::Elements(COUNT as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    let (lengths, order) = random_partition(16, 16);
    let partition = FieldPartition::from_lengths(COUNT, &lengths).unwrap();
    let plan = PermutationPlan::new(&order, 16).unwrap();

    let mut src: Vec<String> = (0..COUNT).map(|x| x.to_string()).collect();
    let mut storage = allocate_raw::<String>(COUNT).unwrap();

    // Alternate direction so each iteration moves live strings rather than defaults.
    group.bench_function("strings", |b| {
        b.iter(|| {
            let dest = execute_moved(storage.as_uninit_slice_mut(), &mut src, &partition, &plan)
                .unwrap();
            for (slot, value) in src.iter_mut().zip(dest.iter_mut()) {
                core::mem::swap(slot, value);
            }
            unsafe { destroy_range(dest.as_mut_ptr(), dest.len()) };
        });
    });

    group.bench_function("strings cloned", |b| {
        b.iter(|| {
            let dest = execute_cloned(storage.as_uninit_slice_mut(), &src, &partition, &plan)
                .unwrap();
            unsafe { destroy_range(dest.as_mut_ptr(), dest.len()) };
        });
    });

    group.finish();
    deallocate_raw(storage);
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = bench_copy, bench_moved
}

#[cfg(target_os = "windows")]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_copy, bench_moved
}

criterion_main!(benches);
