use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::time::Duration;

use flatmset::workload::{ResourceLimitConfig, WorkloadConfig, WorkloadResult, run_workload};

/// Exercise a sorted multiset with a randomized self checking workload
#[derive(Parser)]
struct Cli {
    /// Number of operations to apply
    #[arg(long, default_value_t = 100_000)]
    ops: usize,
    /// Seed for the workload RNG
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keys are drawn uniformly from 0..key-range
    #[arg(long, default_value_t = 1024)]
    key_range: u64,
    /// Number of elements per bulk insertion
    #[arg(long, default_value_t = 64)]
    batch_size: usize,
    /// Stop the workload after this many seconds
    #[arg(long)]
    time_limit: Option<u64>,
    /// Stop the workload beyond this physical memory usage in bytes
    #[arg(long)]
    memory_limit: Option<usize>,
}

fn main() {
    let args = Cli::parse();
    env_logger::builder()
        .format(|buf, record| {
            let level_style = buf.default_level_style(record.level()).bold();
            writeln!(
                buf,
                "{}|{level_style}{:7}{level_style:#}|{:10}| {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
    let config = WorkloadConfig {
        ops: args.ops,
        seed: args.seed,
        key_range: args.key_range.max(1),
        batch_size: args.batch_size,
        limits: ResourceLimitConfig {
            duration: args.time_limit.map(Duration::from_secs),
            memory_limit: args.memory_limit,
        },
    };
    log::info!("Running {} operations with seed {}", config.ops, config.seed);
    match run_workload(&config) {
        WorkloadResult::Completed(stats) => log::info!(
            "Workload done: {} inserted, {} removed, {} left across {} distinct keys",
            stats.inserted,
            stats.removed,
            stats.final_len,
            stats.distinct_keys
        ),
        WorkloadResult::Exhausted(reason) => log::warn!("Workload stopped early: {:?}", reason),
    }
}
