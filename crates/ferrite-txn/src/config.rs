// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::time::Duration;

/// Tunables for a [`crate::TransactionIndex`], constructed explicitly by
/// the caller (no global/static config, matching the library-not-a-binary
/// nature of this crate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of hash buckets transactions are sharded across by `ts % N`.
    /// Defaults to a prime near twice the expected concurrency.
    pub bucket_count: usize,
    /// Soft cap on the number of retired entries kept in the free list
    /// before they are dropped outright (`droppedCount` increments).
    pub max_free_list_size: usize,
    /// An entry whose `mvvCount` or age exceeds this threshold is moved
    /// onto the long-running list, where it still participates in
    /// visibility checks but is skipped by ordinary bucket scans.
    pub long_running_threshold: u64,
    /// Hard cap on the number of simultaneously retained entries
    /// (active + aborted + free + long-running) before `register` fails
    /// with `Error::ResourceExhausted`.
    pub capacity: usize,
    /// Default timeout for [`crate::TransactionIndex::ww_dependency`]
    /// when the caller does not specify one.
    pub default_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bucket_count: 257,
            max_free_list_size: 4096,
            long_running_threshold: 64,
            capacity: 1_000_000,
            default_timeout: Duration::from_secs(60),
        }
    }
}
