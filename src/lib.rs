//! # Flatmset
//! This library contains a multiset over contiguous sorted storage together with the comparator
//! and binary search plumbing it is built from. The key exported data structure is
//! [sorted_multiset::SortedMultiset]. The [workload] module drives randomized self checking runs
//! of the container and backs the `msetbench` binary.

pub mod order;
pub mod search;
pub mod sorted_multiset;
pub mod workload;
