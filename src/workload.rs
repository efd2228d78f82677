//! ## Workloads
//! This module contains randomized self checking workloads for [SortedMultiset]. A workload
//! applies a seeded mix of insertions, bulk insertions, run removals and lookups while
//! cross checking every answer against a plain hash map histogram, optionally stopping early
//! when a time or memory budget runs out. The `msetbench` binary is a thin wrapper around
//! [run_workload].

use std::time::{Duration, Instant};

use log::info;
use memory_stats::memory_stats;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashMap;

use crate::{search::sorted_per, sorted_multiset::SortedMultiset};

// How many operations happen between two resource limit checks and progress reports.
const RESOURCE_CHECK_INTERVAL: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceLimitConfig {
    pub duration: Option<Duration>,
    pub memory_limit: Option<usize>,
}

impl Default for ResourceLimitConfig {
    fn default() -> Self {
        ResourceLimitConfig {
            duration: None,
            memory_limit: None,
        }
    }
}

/// Configuration of a single workload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkloadConfig {
    /// How many operations to apply.
    pub ops: usize,
    /// Seed for the workload RNG, equal seeds replay the same operation sequence.
    pub seed: u64,
    /// Keys are drawn uniformly from `0..key_range`, small ranges force many duplicates.
    pub key_range: u64,
    /// How many elements a single bulk insertion appends.
    pub batch_size: usize,
    pub limits: ResourceLimitConfig,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            ops: 100_000,
            seed: 0,
            key_range: 1024,
            batch_size: 64,
            limits: ResourceLimitConfig::default(),
        }
    }
}

struct ResourceLimits {
    time_limit: Option<Instant>,
    memory_limit: Option<usize>,
}

impl ResourceLimits {
    fn of_config(config: &ResourceLimitConfig) -> Self {
        let time_limit = config.duration.map(|dur| Instant::now() + dur);
        let memory_limit = config.memory_limit;
        ResourceLimits {
            time_limit,
            memory_limit,
        }
    }

    fn exhausted(&self) -> Option<ExhaustionReason> {
        if let Some(time_limit) = self.time_limit {
            if Instant::now() > time_limit {
                return Some(ExhaustionReason::Timeout);
            }
        }

        if let Some(memory_limit) = self.memory_limit {
            if let Some(stats) = memory_stats() {
                if memory_limit < stats.physical_mem {
                    return Some(ExhaustionReason::OutOfMemory);
                }
            }
        }

        None
    }
}

/// Why a workload stopped before applying all of its operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExhaustionReason {
    Timeout,
    OutOfMemory,
}

/// Counters collected over a completed workload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkloadStats {
    pub inserted: usize,
    pub removed: usize,
    pub final_len: usize,
    pub distinct_keys: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadResult {
    Completed(WorkloadStats),
    Exhausted(ExhaustionReason),
}

/// Apply `config.ops` randomized operations to a fresh multiset, checking every intermediate
/// answer against a reference histogram. Panics on the first disagreement, so a completed run
/// doubles as a correctness check of the multiset under a long mixed operation sequence.
pub fn run_workload(config: &WorkloadConfig) -> WorkloadResult {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let mut set: SortedMultiset<u64> = SortedMultiset::new();
    let mut histogram: FxHashMap<u64, usize> = FxHashMap::default();
    let limits = ResourceLimits::of_config(&config.limits);
    let mut inserted = 0;
    let mut removed = 0;
    // Feeding the previous insertion position back as the next hint mimics the locality a well
    // behaved hint user would have while still hitting the correction paths on key changes.
    let mut last_position = 0;

    for op in 0..config.ops {
        if op % RESOURCE_CHECK_INTERVAL == 0 {
            if let Some(reason) = limits.exhausted() {
                info!("Stopping after {} operations: {:?}", op, reason);
                return WorkloadResult::Exhausted(reason);
            }
            if op != 0 {
                info!("Applied {} operations, current size {}", op, set.len());
            }
        }

        let key = rng.gen_range(0..config.key_range);
        match rng.gen_range(0..100u32) {
            0..=44 => {
                last_position = set.insert(key);
                *histogram.entry(key).or_insert(0) += 1;
                inserted += 1;
            }
            45..=59 => {
                last_position = set.insert_with_hint(last_position, key);
                *histogram.entry(key).or_insert(0) += 1;
                inserted += 1;
            }
            60..=74 => {
                let count = set.remove_all(&key);
                assert_eq!(histogram.remove(&key).unwrap_or(0), count);
                removed += count;
            }
            75..=84 => {
                let batch: Vec<u64> = (0..config.batch_size)
                    .map(|_| rng.gen_range(0..config.key_range))
                    .collect();
                for &batch_key in batch.iter() {
                    *histogram.entry(batch_key).or_insert(0) += 1;
                }
                inserted += batch.len();
                set.extend(batch);
            }
            _ => {
                let run = set.equal_range(&key);
                assert_eq!(run.len(), histogram.get(&key).copied().unwrap_or(0));
                assert_eq!(set.contains(&key), !run.is_empty());
                if let Some(at) = set.find(&key) {
                    assert_eq!(at, run.start);
                }
            }
        }
    }

    verify(&set, &histogram);
    WorkloadResult::Completed(WorkloadStats {
        inserted,
        removed,
        final_len: set.len(),
        distinct_keys: histogram.len(),
    })
}

// Full consistency sweep at the end of a run.
fn verify(set: &SortedMultiset<u64>, histogram: &FxHashMap<u64, usize>) {
    assert!(sorted_per(set.order(), set.as_slice()));
    let total: usize = histogram.values().sum();
    assert_eq!(set.len(), total);
    for (key, count) in histogram.iter() {
        assert_eq!(set.count(key), *count);
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{ExhaustionReason, ResourceLimitConfig, WorkloadConfig, WorkloadResult, run_workload};

    #[test]
    fn small_workload_test() {
        let config = WorkloadConfig {
            ops: 4000,
            seed: 42,
            key_range: 64,
            batch_size: 16,
            ..WorkloadConfig::default()
        };
        match run_workload(&config) {
            WorkloadResult::Completed(stats) => {
                assert!(stats.inserted > 0);
                // Every inserted element is either still present or was removed.
                assert_eq!(stats.final_len + stats.removed, stats.inserted);
            }
            WorkloadResult::Exhausted(reason) => panic!("unexpected early stop: {:?}", reason),
        }
    }

    #[test]
    fn deterministic_replay_test() {
        let config = WorkloadConfig {
            ops: 2000,
            seed: 7,
            key_range: 32,
            batch_size: 8,
            ..WorkloadConfig::default()
        };
        assert_eq!(run_workload(&config), run_workload(&config));
    }

    #[test]
    fn timeout_test() {
        let config = WorkloadConfig {
            limits: ResourceLimitConfig {
                duration: Some(Duration::ZERO),
                memory_limit: None,
            },
            ..WorkloadConfig::default()
        };
        assert_eq!(
            run_workload(&config),
            WorkloadResult::Exhausted(ExhaustionReason::Timeout)
        );
    }
}
