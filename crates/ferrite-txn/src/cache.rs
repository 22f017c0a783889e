// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::timestamp::{Timestamp, UNCOMMITTED};

/// A read-mostly snapshot of every non-`Free` transaction's `(ts, tc)`
/// pair, sorted by `ts`, plus the floor (the minimum `ts` of any
/// still-active transaction at the time the snapshot was built).
///
/// Installed by a single `Arc` swap under
/// [`crate::TransactionIndex::update_active_transaction_cache`] and then
/// read lock-free; intentionally allowed to lag behind the live buckets,
/// which is sound because every consumer (`has_concurrent_transaction`)
/// only needs to err on the side of reporting *more* conflicts than are
/// truly live, never fewer.
#[derive(Debug, Clone, Default)]
pub struct ActiveTransactionCache {
    entries: Vec<(Timestamp, Timestamp)>,
    floor: Timestamp,
}

impl ActiveTransactionCache {
    pub(crate) fn build(mut entries: Vec<(Timestamp, Timestamp)>) -> Self {
        entries.sort_unstable_by_key(|&(ts, _)| ts);
        let floor = entries
            .iter()
            .filter(|&&(_, tc)| tc == UNCOMMITTED)
            .map(|&(ts, _)| ts)
            .min()
            .unwrap_or(Timestamp::MAX);
        ActiveTransactionCache { entries, floor }
    }

    /// The minimum start timestamp of any transaction this snapshot
    /// observed as still active. `Timestamp::MAX` if none were active —
    /// every version is then universally visible.
    pub fn floor(&self) -> Timestamp {
        self.floor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff some entry has `ts` strictly between `low` and `high`
    /// and is either not yet committed or committed after `high`.
    pub fn has_concurrent(&self, low: Timestamp, high: Timestamp) -> bool {
        let start = self.entries.partition_point(|&(ts, _)| ts <= low);
        self.entries[start..]
            .iter()
            .take_while(|&&(ts, _)| ts < high)
            .any(|&(_, tc)| tc == UNCOMMITTED || tc > high)
    }
}
