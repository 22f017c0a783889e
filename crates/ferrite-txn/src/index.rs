// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};

use crate::cache::ActiveTransactionCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::status::{TransactionState, TransactionStatus};
use crate::timestamp::{ABORTED, Timestamp, TimestampOracle, UNCOMMITTED, VersionHandle, vh_step, vh_ts};

/// The interval a `ww_dependency` wait polls the target's finalization at.
/// Bounded so a missed condvar notification is never outstanding longer
/// than this, mirroring [`ferrite_latch::SharedResource`]'s claim wait.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

struct Bucket {
    entries: Mutex<Vec<Arc<TransactionStatus>>>,
}

impl Bucket {
    fn new() -> Self {
        Bucket { entries: Mutex::new(Vec::new()) }
    }
}

/// MVCC status registry: register/commit/abort, visibility, write-write
/// dependency detection, and reduction to canonical form.
///
/// Active transactions live in one of `bucket_count` shards keyed by
/// `ts % bucket_count`, each behind its own short-held
/// [`parking_lot::Mutex`]. Finalized entries move to one of two
/// secondary lists — `aborted` (every aborted transaction, pending both
/// its MVV versions draining and the floor passing its `ts`) or `free`
/// (every committed transaction, pending the floor passing its `tc`) —
/// both scanned by [`Self::commit_status`] alongside the owning bucket,
/// so an entry remains answerable from wherever [`Self::notify_completed`]
/// last put it until [`Self::cleanup`] proves no live reader could still
/// need it.
pub struct TransactionIndex {
    config: Config,
    oracle: TimestampOracle,
    buckets: Vec<Bucket>,
    aborted: Mutex<Vec<Arc<TransactionStatus>>>,
    free: Mutex<VecDeque<Arc<TransactionStatus>>>,
    long_running: Mutex<Vec<Arc<TransactionStatus>>>,
    cache: RwLock<Arc<ActiveTransactionCache>>,
    retained: AtomicUsize,
    current_count: AtomicU64,
    free_count: AtomicU64,
    aborted_count: AtomicU64,
    long_running_count: AtomicU64,
    dropped_count: AtomicU64,
    /// A lower bound valid for any `commit_status` query whose entry has
    /// already been physically dropped: the floor observed at the most
    /// recent `cleanup` that reaped something. Sound because `cleanup`
    /// only reaps a committed entry once its `tc` is `<=` that floor, and
    /// the floor only ever increases, so any later caller's own floor is
    /// `>=` this value too.
    ///
    /// Never advanced to `ABORTED` (`Timestamp::MAX`): a quiescent index
    /// (no active transactions) has `floor == ABORTED` by
    /// `ActiveTransactionCache`'s own convention ("nothing active" reads as
    /// "no upper bound"), and every committed entry trivially satisfies
    /// `tc <= ABORTED`. Raising `reaped_floor` to `ABORTED` in that case
    /// would make a later `commit_status`/`ww_dependency` call for a
    /// reaped *committed* transaction return the `ABORTED` sentinel
    /// itself, misreporting a committed write as aborted.
    reaped_floor: AtomicU64,
    wait_mutex: Mutex<()>,
    wait_cvar: Condvar,
}

impl TransactionIndex {
    pub fn new(config: Config) -> Self {
        let bucket_count = config.bucket_count.max(1);
        let buckets = (0..bucket_count).map(|_| Bucket::new()).collect();
        TransactionIndex {
            config,
            oracle: TimestampOracle::new(),
            buckets,
            aborted: Mutex::new(Vec::new()),
            free: Mutex::new(VecDeque::new()),
            long_running: Mutex::new(Vec::new()),
            cache: RwLock::new(Arc::new(ActiveTransactionCache::default())),
            retained: AtomicUsize::new(0),
            current_count: AtomicU64::new(0),
            free_count: AtomicU64::new(0),
            aborted_count: AtomicU64::new(0),
            long_running_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            reaped_floor: AtomicU64::new(0),
            wait_mutex: Mutex::new(()),
            wait_cvar: Condvar::new(),
        }
    }

    fn bucket_for(&self, ts: Timestamp) -> &Bucket {
        &self.buckets[(ts as usize) % self.buckets.len()]
    }

    // -- counters -----------------------------------------------------

    pub fn current_count(&self) -> u64 {
        self.current_count.load(Ordering::Acquire)
    }

    pub fn free_count(&self) -> u64 {
        self.free_count.load(Ordering::Acquire)
    }

    pub fn aborted_count(&self) -> u64 {
        self.aborted_count.load(Ordering::Acquire)
    }

    pub fn long_running_count(&self) -> u64 {
        self.long_running_count.load(Ordering::Acquire)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Acquire)
    }

    // -- registration ---------------------------------------------------

    /// Allocates a fresh `ts` and registers a new `Active` transaction.
    /// O(1) amortized: one bucket push, no scan. Fails with
    /// `Error::ResourceExhausted` if the index is already at
    /// `config.capacity` retained entries.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn register_transaction(&self) -> Result<Arc<TransactionStatus>> {
        if self.retained.load(Ordering::Acquire) >= self.config.capacity {
            tracing::warn!(capacity = self.config.capacity, "transaction index at capacity");
            return Err(Error::ResourceExhausted);
        }
        let ts = self.oracle.next();
        let status = Arc::new(TransactionStatus::new(ts));
        self.bucket_for(ts).entries.lock().push(Arc::clone(&status));
        self.retained.fetch_add(1, Ordering::AcqRel);
        self.current_count.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(ts, "registered transaction");
        Ok(status)
    }

    // -- commit / abort ---------------------------------------------------

    /// Allocates a fresh commit timestamp from the same currency as
    /// start timestamps.
    pub fn allocate_commit_timestamp(&self) -> Timestamp {
        self.oracle.next()
    }

    /// Sets `status`'s proposing commit timestamp. Must be called before
    /// [`Self::notify_completed`]; fails with `Error::IllegalState` if
    /// `status` is not `Active`.
    #[tracing::instrument(level = "trace", skip(self, status))]
    pub fn commit(&self, status: &TransactionStatus, tc: Timestamp) -> Result<()> {
        status.commit(tc)?;
        tracing::trace!(ts = status.ts(), tc, "transaction committed");
        Ok(())
    }

    /// Marks `status` aborted. Fails with `Error::IllegalState` if
    /// `status` is not `Active`.
    #[tracing::instrument(level = "trace", skip(self, status))]
    pub fn abort(&self, status: &TransactionStatus) -> Result<()> {
        status.abort()?;
        tracing::trace!(ts = status.ts(), "transaction aborted");
        Ok(())
    }

    /// Finalizes a committed or aborted transaction: removes it from its
    /// active bucket (or the long-running list) and places it on the
    /// list [`Self::commit_status`] will next look for it on. Fails with
    /// `Error::IllegalState` if `status` is still `Active` or has already
    /// been notified (`Free`).
    #[tracing::instrument(level = "trace", skip(self, status))]
    pub fn notify_completed(&self, status: Arc<TransactionStatus>) -> Result<()> {
        let state = status.state();
        if state != TransactionState::Committed && state != TransactionState::Aborted {
            return Err(Error::IllegalState(format!(
                "notify_completed called on a transaction in state {state:?}"
            )));
        }

        let ts = status.ts();
        let removed_from_bucket = {
            let mut bucket = self.bucket_for(ts).entries.lock();
            if let Some(i) = bucket.iter().position(|s| s.ts() == ts) {
                bucket.swap_remove(i);
                true
            } else {
                false
            }
        };
        if !removed_from_bucket {
            let mut long_running = self.long_running.lock();
            if let Some(i) = long_running.iter().position(|s| s.ts() == ts) {
                long_running.swap_remove(i);
                self.long_running_count.fetch_sub(1, Ordering::AcqRel);
            }
        }
        self.current_count.fetch_sub(1, Ordering::AcqRel);

        if state == TransactionState::Aborted {
            self.aborted.lock().push(status);
            self.aborted_count.fetch_add(1, Ordering::AcqRel);
        } else {
            self.push_free(status);
        }

        self.notify_waiters();
        Ok(())
    }

    fn push_free(&self, status: Arc<TransactionStatus>) {
        let mut free = self.free.lock();
        free.push_back(status);
        self.free_count.fetch_add(1, Ordering::AcqRel);
        while free.len() > self.config.max_free_list_size {
            if let Some(evicted) = free.pop_front() {
                self.retire(evicted);
                self.free_count.fetch_sub(1, Ordering::AcqRel);
                self.dropped_count.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    fn retire(&self, status: Arc<TransactionStatus>) {
        // Ignore the error: an entry can only reach here via a path that
        // already checked it was Committed or Aborted.
        let _ = status.retire();
        self.retained.fetch_sub(1, Ordering::AcqRel);
    }

    // -- visibility -------------------------------------------------------

    fn find(&self, ts: Timestamp) -> Option<Arc<TransactionStatus>> {
        if let Some(s) = self.bucket_for(ts).entries.lock().iter().find(|s| s.ts() == ts) {
            return Some(Arc::clone(s));
        }
        if let Some(s) = self.aborted.lock().iter().find(|s| s.ts() == ts) {
            return Some(Arc::clone(s));
        }
        if let Some(s) = self.free.lock().iter().find(|s| s.ts() == ts) {
            return Some(Arc::clone(s));
        }
        if let Some(s) = self.long_running.lock().iter().find(|s| s.ts() == ts) {
            return Some(Arc::clone(s));
        }
        None
    }

    /// The commit timestamp of `vh`'s writer, from the perspective of a
    /// reader at `(floor_ts, step)` belonging to transaction `reader_ts`.
    ///
    /// - Same transaction as the reader (`vh_ts(vh) == reader_ts`): the
    ///   reader sees its own writes up to and including its own current
    ///   step; a strictly later step of the same transaction is not yet
    ///   visible to it, reported as [`crate::UNCOMMITTED`].
    /// - Writer committed: returns `tc` (real timestamp), whether or not
    ///   it is `<= floor_ts` — the caller compares.
    /// - Writer aborted: returns [`crate::ABORTED`].
    /// - Writer still active, or already reaped (implying its `tc` was
    ///   proven `<=` some floor `<= floor_ts`): returns a value `<=
    ///   floor_ts`, i.e. visible.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn commit_status(&self, vh: VersionHandle, reader_ts: Timestamp, reader_step: u8) -> Timestamp {
        let writer_ts = vh_ts(vh);
        if writer_ts == reader_ts {
            // A transaction always sees its own prior writes: report its
            // own `ts` (always `<=` itself, so trivially visible) for a
            // step it has already reached, `UNCOMMITTED` for one it has
            // not — property 10 only requires that the latter never
            // reads as committed, not that it is otherwise distinguished
            // from a foreign active transaction's `UNCOMMITTED`.
            return if vh_step(vh) <= reader_step { reader_ts } else { UNCOMMITTED };
        }
        match self.find(writer_ts) {
            Some(status) => match status.state() {
                TransactionState::Active => UNCOMMITTED,
                TransactionState::Committed => status.tc(),
                TransactionState::Aborted => ABORTED,
                TransactionState::Free => self.reaped_floor.load(Ordering::Acquire),
            },
            None => self.reaped_floor.load(Ordering::Acquire),
        }
    }

    /// True iff some registered transaction with `ts` in `(low, high)` is
    /// not yet committed, or committed after `high`. Derived from the
    /// installed [`ActiveTransactionCache`] snapshot, which may lag the
    /// live buckets but never under-reports a conflict.
    pub fn has_concurrent_transaction(&self, low: Timestamp, high: Timestamp) -> bool {
        self.cache.read().has_concurrent(low, high)
    }

    /// Resolves a write-write conflict: blocks up to `timeout` for
    /// `vh`'s writer to finalize, returning its outcome (`tc`, `ABORTED`,
    /// or `UNCOMMITTED` on timeout). `source` is the caller's own `ts`,
    /// used only to reject a transaction waiting on itself.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn ww_dependency(&self, vh: VersionHandle, source: Timestamp, timeout: Duration) -> Result<Timestamp> {
        let writer_ts = vh_ts(vh);
        if writer_ts == source {
            return Err(Error::IllegalArgument("a transaction cannot wait on its own write".into()));
        }
        let status = self.find(writer_ts).ok_or_else(|| {
            Error::IllegalArgument(format!("no registered transaction with ts {writer_ts}"))
        })?;

        let deadline = Instant::now() + timeout;
        loop {
            match status.state() {
                TransactionState::Committed => return Ok(status.tc()),
                TransactionState::Aborted => return Ok(ABORTED),
                TransactionState::Free => return Ok(self.reaped_floor.load(Ordering::Acquire)),
                TransactionState::Active => {}
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(writer_ts, source, "ww_dependency timed out");
                return Ok(UNCOMMITTED);
            }
            let wait_for = (deadline - now).min(POLL_INTERVAL);
            let mut guard = self.wait_mutex.lock();
            self.wait_cvar.wait_for(&mut guard, wait_for);
        }
    }

    fn notify_waiters(&self) {
        let _guard = self.wait_mutex.lock();
        self.wait_cvar.notify_all();
    }

    // -- active-set cache -------------------------------------------------

    /// Rebuilds the [`ActiveTransactionCache`] snapshot and installs it
    /// with a single `Arc` swap. Readers already holding the previous
    /// `Arc` keep observing a consistent (if stale) snapshot.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn update_active_transaction_cache(&self) -> Arc<ActiveTransactionCache> {
        let mut entries = Vec::new();
        for bucket in &self.buckets {
            for status in bucket.entries.lock().iter() {
                entries.push((status.ts(), status.tc()));
            }
        }
        for status in self.long_running.lock().iter() {
            entries.push((status.ts(), status.tc()));
        }
        for status in self.aborted.lock().iter() {
            entries.push((status.ts(), ABORTED));
        }
        for status in self.free.lock().iter() {
            entries.push((status.ts(), status.tc()));
        }

        let snapshot = Arc::new(ActiveTransactionCache::build(entries));
        *self.cache.write() = Arc::clone(&snapshot);
        snapshot
    }

    /// A clone of the currently installed snapshot, without rebuilding.
    pub fn active_transaction_cache(&self) -> Arc<ActiveTransactionCache> {
        Arc::clone(&self.cache.read())
    }

    // -- reduction / cleanup ----------------------------------------------

    /// Computes canonical form: promotes long-lived active entries,
    /// drops aborted entries whose versions have all drained and whose
    /// `ts` is below the floor, and drops committed entries whose `tc`
    /// is at or below the floor.
    ///
    /// Deliberately reaps against the *currently installed* cache
    /// snapshot rather than rebuilding one first: the floor this pass
    /// uses is therefore whatever the last [`Self::update_active_transaction_cache`]
    /// call (or the previous `cleanup`) last saw, and a fresh snapshot is
    /// installed only once reaping against the old one is done. Two
    /// consecutive sweeps separated by enough activity to move the floor
    /// can then retire a run of entries the first sweep correctly left
    /// alone — matching the "readers tolerate staleness conservatively"
    /// rule in §4.4.3: a stale floor only under-reaps, never over-reaps.
    /// Before the very first snapshot is ever built the installed cache
    /// is `ActiveTransactionCache::default()`, whose floor is `0`, so an
    /// empty index's first `cleanup` call is a no-op rather than an
    /// unguarded reap against an unknown floor.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn cleanup(&self) -> Arc<ActiveTransactionCache> {
        let floor = self.active_transaction_cache().floor();

        self.promote_long_running();

        {
            let mut aborted = self.aborted.lock();
            let mut i = 0;
            while i < aborted.len() {
                let status = &aborted[i];
                if status.mvv_count() == 0 && status.ts() < floor {
                    let status = aborted.swap_remove(i);
                    self.retire(status);
                    self.aborted_count.fetch_sub(1, Ordering::AcqRel);
                    if floor != ABORTED {
                        self.reaped_floor.fetch_max(floor, Ordering::AcqRel);
                    }
                } else {
                    i += 1;
                }
            }
        }

        {
            let mut free = self.free.lock();
            let mut i = 0;
            while i < free.len() {
                let eligible = free[i].tc() <= floor;
                if eligible {
                    let status = free.remove(i).expect("index in bounds");
                    self.retire(status);
                    self.free_count.fetch_sub(1, Ordering::AcqRel);
                    if floor != ABORTED {
                        self.reaped_floor.fetch_max(floor, Ordering::AcqRel);
                    }
                } else {
                    i += 1;
                }
            }
        }

        tracing::trace!(
            floor,
            current = self.current_count(),
            aborted = self.aborted_count(),
            free = self.free_count(),
            long_running = self.long_running_count(),
            dropped = self.dropped_count(),
            "cleanup swept transaction index"
        );

        self.update_active_transaction_cache()
    }

    /// Moves every bucket-resident `Active` entry whose `mvv_count`
    /// exceeds the configured threshold onto the long-running list,
    /// where it is skipped by ordinary bucket scans (there are none in
    /// this implementation — buckets are already short — but the list
    /// keeps the long-running categorization available for the
    /// long-running counter and for callers that want to enumerate them).
    fn promote_long_running(&self) {
        for bucket in &self.buckets {
            let mut entries = bucket.entries.lock();
            let mut i = 0;
            while i < entries.len() {
                if entries[i].mvv_count() >= self.config.long_running_threshold {
                    let status = entries.swap_remove(i);
                    self.long_running.lock().push(status);
                    self.long_running_count.fetch_add(1, Ordering::AcqRel);
                    self.current_count.fetch_sub(1, Ordering::AcqRel);
                } else {
                    i += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::ts2vh;

    fn index() -> TransactionIndex {
        TransactionIndex::new(Config::default())
    }

    #[test]
    fn register_assigns_increasing_ts() {
        let idx = index();
        let a = idx.register_transaction().unwrap();
        let b = idx.register_transaction().unwrap();
        assert!(b.ts() > a.ts());
        assert_eq!(idx.current_count(), 2);
    }

    #[test]
    fn own_write_visibility_by_step() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let vh0 = t.next_version_handle().unwrap();
        let vh1 = t.next_version_handle().unwrap();
        // Reader is the same transaction, currently at step 1 (has
        // written vh0 and vh1, vh1 being its own latest write).
        assert_eq!(idx.commit_status(vh0, t.ts(), 1), t.ts());
        assert_eq!(idx.commit_status(vh1, t.ts(), 1), t.ts());
        // A reader at step 0 has not yet made its own step-1 write.
        assert_eq!(idx.commit_status(vh1, t.ts(), 0), UNCOMMITTED);
    }

    #[test]
    fn commit_then_notify_reports_tc() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let vh = t.next_version_handle().unwrap();
        let tc = idx.allocate_commit_timestamp();
        idx.commit(&t, tc).unwrap();
        assert_eq!(idx.commit_status(vh, tc + 100, 0), tc);
        idx.notify_completed(t).unwrap();
        assert_eq!(idx.commit_status(vh, tc + 100, 0), tc);
    }

    #[test]
    fn reaping_at_a_quiescent_floor_never_reports_committed_as_aborted() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let vh = t.next_version_handle().unwrap();
        idx.commit(&t, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(t).unwrap();

        // No transaction is active: the freshly rebuilt snapshot's floor is
        // `Timestamp::MAX` (same numeric value as `ABORTED`). `cleanup`
        // must still reap the now-free entry without letting
        // `reaped_floor` collapse onto the `ABORTED` sentinel.
        idx.update_active_transaction_cache();
        idx.cleanup();
        assert_eq!(idx.free_count(), 0, "the committed entry should have been fully reaped");

        assert_ne!(
            idx.commit_status(vh, u64::MAX, 0),
            ABORTED,
            "a reaped committed write must never be reported as aborted"
        );
    }

    #[test]
    fn abort_is_sticky_until_drained_and_cleaned() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let vh = t.next_version_handle().unwrap();
        t.inc_mvv_count();
        idx.abort(&t).unwrap();
        idx.notify_completed(Arc::clone(&t)).unwrap();
        assert_eq!(idx.commit_status(vh, t.ts() + 1, 0), ABORTED);

        // Still sticky: mvv count has not drained yet.
        idx.cleanup();
        assert_eq!(idx.commit_status(vh, t.ts() + 1000, 0), ABORTED);

        // Drain the version and advance the floor past it, then clean up.
        t.dec_mvv_count();
        let _after = idx.register_transaction().unwrap();
        idx.cleanup();
        assert_eq!(idx.aborted_count(), 0);
    }

    #[test]
    fn commit_after_notify_completed_is_illegal_state() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        idx.commit(&t, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(Arc::clone(&t)).unwrap();
        assert!(matches!(idx.commit(&t, 999), Err(Error::IllegalState(_))));
    }

    #[test]
    fn ww_dependency_rejects_self_wait() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let vh = t.next_version_handle().unwrap();
        let outcome = idx.ww_dependency(vh, t.ts(), Duration::from_millis(10));
        assert!(matches!(outcome, Err(Error::IllegalArgument(_))));
    }

    #[test]
    fn ww_dependency_times_out_on_still_active_writer() {
        let idx = index();
        let writer = idx.register_transaction().unwrap();
        let vh = writer.next_version_handle().unwrap();
        let reader = idx.register_transaction().unwrap();
        let outcome = idx.ww_dependency(vh, reader.ts(), Duration::from_millis(20)).unwrap();
        assert_eq!(outcome, UNCOMMITTED);
    }

    #[test]
    fn ww_dependency_returns_outcome_once_finalized() {
        let idx = index();
        let writer = idx.register_transaction().unwrap();
        let vh = writer.next_version_handle().unwrap();
        let reader = idx.register_transaction().unwrap();
        idx.abort(&writer).unwrap();
        idx.notify_completed(writer).unwrap();
        let outcome = idx.ww_dependency(vh, reader.ts(), Duration::from_millis(50)).unwrap();
        assert_eq!(outcome, ABORTED);
    }

    #[test]
    fn has_concurrent_transaction_tracks_active_set() {
        let idx = index();
        let t1 = idx.register_transaction().unwrap();
        idx.update_active_transaction_cache();
        assert!(idx.has_concurrent_transaction(0, t1.ts() + 1));
        idx.commit(&t1, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(t1).unwrap();
        idx.update_active_transaction_cache();
        assert!(!idx.has_concurrent_transaction(0, 1));
    }

    #[test]
    fn canonical_form_after_all_finalized() {
        let idx = index();
        let mut handles = Vec::new();
        for _ in 0..10 {
            handles.push(idx.register_transaction().unwrap());
        }
        for h in handles {
            idx.commit(&h, idx.allocate_commit_timestamp()).unwrap();
            idx.notify_completed(h).unwrap();
        }
        let sentinel = idx.register_transaction().unwrap();
        idx.commit(&sentinel, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(sentinel).unwrap();
        let trailing = idx.register_transaction().unwrap();

        // The first cleanup only ever sees the default (floor == 0)
        // cache, since nothing has installed a fresher one yet, so it
        // reaps nothing — it just seeds the floor for the next call.
        idx.cleanup();
        assert_eq!(idx.current_count(), 1);

        // Now reaping runs against the floor that sweep just installed.
        idx.cleanup();
        assert_eq!(idx.free_count(), 0, "every commit below the floor should have been reaped");

        idx.commit(&trailing, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(trailing).unwrap();
        idx.cleanup();
        assert_eq!(idx.current_count(), 0);
    }

    #[test]
    fn capacity_exhaustion_is_resource_exhausted() {
        let idx = TransactionIndex::new(Config { capacity: 2, ..Config::default() });
        idx.register_transaction().unwrap();
        idx.register_transaction().unwrap();
        assert!(matches!(idx.register_transaction(), Err(Error::ResourceExhausted)));
    }

    #[test]
    fn unrelated_vh_does_not_clash_with_same_ts_different_step() {
        let idx = index();
        let t = idx.register_transaction().unwrap();
        let a = ts2vh(t.ts(), 0);
        let b = ts2vh(t.ts(), 1);
        assert_ne!(a, b);
    }
}
