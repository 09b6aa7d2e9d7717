use crate::{
    error::CliError,
    util::{expected_arrangement, parse_list},
};
use argh::FromArgs;
use array_rearrange::{array_rearrange, array_rearrange_moved, ArrayRearrangeHelper};
use array_rearrange_common::{
    allocate::{allocate_raw, deallocate_raw, RawArray},
    object::destroy_range,
};
use bytesize::ByteSize;
use core::sync::atomic::{AtomicUsize, Ordering};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(FromArgs, Debug)]
/// Run the rearrange scenarios at several scales, verifying and timing each one
#[argh(subcommand, name = "benchmark")]
pub struct BenchmarkCmd {
    /// comma separated element counts [default: 100,1000,10000]
    #[argh(option, default = "String::from(\"100,1000,10000\")")]
    pub scales: String,

    /// seed for the random field splits [default: random]
    #[argh(option)]
    pub seed: Option<u64>,

    /// times each scenario is repeated; the fastest run is reported [default: 1]
    #[argh(option, default = "1")]
    pub iterations: u32,
}

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static DESTROYED: AtomicUsize = AtomicUsize::new(0);

/// Element with a destructor, counting live instances process wide.
#[derive(Debug)]
struct Counted {
    value: i64,
}

impl Counted {
    const MOVED_FROM: i64 = -1;

    fn new(value: i64) -> Self {
        CONSTRUCTED.fetch_add(1, Ordering::Relaxed);
        Self { value }
    }

    fn alive() -> usize {
        CONSTRUCTED.load(Ordering::Relaxed) - DESTROYED.load(Ordering::Relaxed)
    }
}

impl Default for Counted {
    fn default() -> Self {
        Self::new(Self::MOVED_FROM)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        DESTROYED.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn handle_benchmark_command(cmd: BenchmarkCmd) -> Result<(), CliError> {
    let scales = parse_list::<usize>("scales", &cmd.scales)?;
    let seed = cmd.seed.unwrap_or_else(rand::random);
    let iterations = cmd.iterations.max(1);
    println!("Benchmarking rearrange at scales: {scales:?}");
    println!("Seed: {seed}, iterations: {iterations}");

    let mut rng = StdRng::seed_from_u64(seed);
    for &scale in &scales {
        println!();
        println!("[Scale {scale}]");
        swap_halves(scale, iterations)?;
        reverse_singletons(scale, iterations)?;
        quartered_moves(scale, iterations)?;
        random_split(scale, iterations, &mut rng)?;
    }

    Ok(())
}

/// Runs `run` `iterations` times and returns the fastest duration.
fn fastest<E>(iterations: u32, mut run: impl FnMut() -> Result<(), E>) -> Result<Duration, E> {
    let mut best = Duration::MAX;
    for _ in 0..iterations {
        let start = Instant::now();
        run()?;
        best = best.min(start.elapsed());
    }
    Ok(best)
}

fn report(scenario: &str, scale: usize, elapsed: Duration, detail: &str) {
    let bytes = ByteSize::b((scale * core::mem::size_of::<i64>()) as u64);
    println!("  {scenario}: {elapsed:.2?} ({bytes}){detail}");
}

fn verify<T: PartialEq + core::fmt::Debug>(
    scenario: &str,
    actual: &[T],
    expected: &[T],
) -> Result<(), CliError> {
    match actual.iter().zip(expected).position(|(a, e)| a != e) {
        None if actual.len() == expected.len() => Ok(()),
        None => Err(CliError::Verification {
            scenario: scenario.to_string(),
            details: format!("expected {} elements, got {}", expected.len(), actual.len()),
        }),
        Some(index) => Err(CliError::Verification {
            scenario: scenario.to_string(),
            details: format!(
                "element {index} is {:?}, expected {:?}",
                actual[index], expected[index]
            ),
        }),
    }
}

fn swap_halves(scale: usize, iterations: u32) -> Result<(), CliError> {
    let src: Vec<i64> = (0..scale as i64).collect();
    let half = scale / 2;
    let lengths = [half, scale - half];
    let mut storage: RawArray<i64> = allocate_raw(scale)?;

    let elapsed = fastest(iterations, || -> Result<(), CliError> {
        let dest = array_rearrange(storage.as_uninit_slice_mut(), &src, &lengths, &[1, 0])?;
        verify("swap halves", dest, &expected_arrangement(&src, &lengths, &[1, 0]))
    })?;

    deallocate_raw(storage);
    report("Swap halves", scale, elapsed, "");
    Ok(())
}

fn reverse_singletons(scale: usize, iterations: u32) -> Result<(), CliError> {
    let src: Vec<i64> = (0..scale as i64).collect();
    let order: Vec<usize> = (0..scale).rev().collect();
    let mut dest = vec![0; scale];

    let elapsed = fastest(iterations, || -> Result<(), CliError> {
        let mut helper = ArrayRearrangeHelper::new(scale, scale);
        for _ in 0..scale {
            helper.add_field(1)?;
        }
        helper.rearrange_into(&mut dest, &src, &order)?;

        let expected: Vec<i64> = src.iter().rev().copied().collect();
        verify("reverse order", &dest, &expected)
    })?;

    report("Reverse order", scale, elapsed, "");
    Ok(())
}

fn quartered_moves(scale: usize, iterations: u32) -> Result<(), CliError> {
    const ORDER: [usize; 4] = [2, 0, 3, 1];
    let quarter = scale / 4;
    let lengths = [quarter, quarter, quarter, scale - quarter * 3];
    let mut storage: RawArray<Counted> = allocate_raw(scale)?;
    let mut alive = 0;

    let elapsed = fastest(iterations, || -> Result<(), CliError> {
        let alive_before = Counted::alive();
        let mut src: Vec<Counted> = (0..scale as i64).map(Counted::new).collect();

        let dest =
            array_rearrange_moved(storage.as_uninit_slice_mut(), &mut src, &lengths, &ORDER)?;
        alive = Counted::alive() - alive_before;

        let values: Vec<i64> = dest.iter().map(|x| x.value).collect();
        let source: Vec<i64> = (0..scale as i64).collect();
        let result = verify(
            "non-trivial rearrange",
            &values,
            &expected_arrangement(&source, &lengths, &ORDER),
        );

        unsafe { destroy_range(dest.as_mut_ptr(), scale) };
        debug!(alive = Counted::alive() - alive_before, "destroyed destination");
        result?;

        if alive != 2 * scale {
            return Err(CliError::Verification {
                scenario: String::from("non-trivial rearrange"),
                details: format!("{alive} objects alive, expected {}", 2 * scale),
            });
        }
        if src.iter().any(|x| x.value != Counted::MOVED_FROM) {
            return Err(CliError::Verification {
                scenario: String::from("non-trivial rearrange"),
                details: String::from("source element was not moved from"),
            });
        }
        Ok(())
    })?;

    deallocate_raw(storage);
    report(
        "Non-trivial rearrange",
        scale,
        elapsed,
        &format!(", {scale} moves, {alive} objects alive"),
    );
    Ok(())
}

fn random_split(scale: usize, iterations: u32, rng: &mut StdRng) -> Result<(), CliError> {
    let field_count = rng.gen_range(5..=14usize).min(scale.max(1));
    let mut cuts: Vec<usize> = (0..field_count - 1)
        .map(|_| rng.gen_range(0..=scale))
        .collect();
    cuts.push(0);
    cuts.push(scale);
    cuts.sort_unstable();
    let lengths: Vec<usize> = cuts.windows(2).map(|x| x[1] - x[0]).collect();

    let mut order: Vec<usize> = (0..field_count).collect();
    order.shuffle(rng);
    debug!(?lengths, ?order, "random split");

    let src: Vec<i64> = (0..scale as i64).collect();
    let mut dest = vec![0; scale];
    let elapsed = fastest(iterations, || -> Result<(), CliError> {
        let mut helper = ArrayRearrangeHelper::new(scale, field_count);
        for &length in &lengths[..field_count - 1] {
            helper.add_field(length)?;
        }
        helper.rearrange_into(&mut dest, &src, &order)?;

        // Every value must appear exactly once.
        let mut seen = vec![0u32; scale];
        for &value in &dest {
            seen[value as usize] += 1;
        }
        match seen.iter().position(|&x| x != 1) {
            None => Ok(()),
            Some(value) => Err(CliError::Verification {
                scenario: format!("random {field_count}-way rearrange"),
                details: format!("value {value} appears {} times", seen[value]),
            }),
        }
    })?;

    report(
        &format!("Random {field_count}-way rearrange"),
        scale,
        elapsed,
        "",
    );
    Ok(())
}
