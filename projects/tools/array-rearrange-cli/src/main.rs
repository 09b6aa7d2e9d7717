#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs, Debug)]
/// Rearranges contiguous fields of an array, and benchmarks the rearrange engine
struct TopLevel {
    /// log validation details and timings (overridden by RUST_LOG)
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Rearrange(commands::rearrange::RearrangeCmd),
    Benchmark(commands::benchmark::BenchmarkCmd),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Rearrange(cmd) => {
            commands::rearrange::handle_rearrange_command(cmd)?;
        }
        Commands::Benchmark(cmd) => {
            commands::benchmark::handle_benchmark_command(cmd)?;
        }
    }

    Ok(())
}
