// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::error::{Error, Result};
use crate::timestamp::{ABORTED, StepAllocator, Timestamp, UNCOMMITTED, VersionHandle, ts2vh};

/// Lifecycle state of a [`TransactionStatus`].
///
/// `Free` is reached only after [`TransactionIndex::cleanup`] has dropped
/// an entry from the aborted or committed-retired lists; a status never
/// transitions out of `Free`, and [`TransactionIndex`] never hands one
/// back out (see the crate's design notes on why object pooling is not
/// attempted here).
///
/// [`TransactionIndex`]: crate::TransactionIndex
/// [`TransactionIndex::cleanup`]: crate::TransactionIndex::cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransactionState {
    Active = 0,
    Committed = 1,
    Aborted = 2,
    Free = 3,
}

impl TransactionState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => TransactionState::Active,
            1 => TransactionState::Committed,
            2 => TransactionState::Aborted,
            3 => TransactionState::Free,
            _ => unreachable!("invalid TransactionState encoding"),
        }
    }
}

/// Per-transaction MVCC bookkeeping: start timestamp, commit outcome, the
/// number of multi-version records still pending reclamation, and
/// lifecycle state.
///
/// `tc`, `mvv_count`, and `state` are independent atomics rather than one
/// packed word: they are read and written at different rates (`tc` once,
/// `mvv_count` on every version write/reap, `state` twice) and by
/// different callers, so packing them would only add masking overhead
/// without removing any contention that matters here — unlike
/// [`ferrite_latch::SharedResource`]'s lock word, where the claim count
/// and writer bit genuinely must move together in a single CAS.
#[derive(Debug)]
pub struct TransactionStatus {
    ts: Timestamp,
    tc: AtomicU64,
    mvv_count: AtomicU64,
    state: AtomicU8,
    step: StepAllocator,
}

impl TransactionStatus {
    pub(crate) fn new(ts: Timestamp) -> Self {
        TransactionStatus {
            ts,
            tc: AtomicU64::new(UNCOMMITTED),
            mvv_count: AtomicU64::new(0),
            state: AtomicU8::new(TransactionState::Active as u8),
            step: StepAllocator::new(),
        }
    }

    pub fn ts(&self) -> Timestamp {
        self.ts
    }

    pub fn tc(&self) -> Timestamp {
        self.tc.load(Ordering::Acquire)
    }

    pub fn state(&self) -> TransactionState {
        TransactionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn mvv_count(&self) -> u64 {
        self.mvv_count.load(Ordering::Acquire)
    }

    /// Allocates the next version handle this transaction writes with.
    /// Fails with `Error::StepOverflow` past 256 versions in one
    /// transaction.
    pub fn next_version_handle(&self) -> Result<VersionHandle> {
        let step = self.step.next()?;
        Ok(ts2vh(self.ts, step))
    }

    /// The step the transaction has reached so far, for own-write
    /// visibility checks (`commit_status` against a concurrently-read
    /// `step`).
    pub fn current_step(&self) -> u8 {
        self.step.current()
    }

    /// Records one more multi-version record written by this
    /// transaction, not yet reaped.
    pub fn inc_mvv_count(&self) {
        self.mvv_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Records that one of this transaction's versions has been drained
    /// (its aborted write garbage-collected, or a reader has moved past
    /// it). Saturates at zero: never panics on a spurious extra call.
    pub fn dec_mvv_count(&self) {
        let _ = self.mvv_count.fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
            Some(v.saturating_sub(1))
        });
    }

    /// Sets the proposing commit timestamp. Must be called exactly once,
    /// while `Active`; fails with `Error::IllegalState` otherwise and
    /// mutates nothing.
    pub(crate) fn commit(&self, tc: Timestamp) -> Result<()> {
        self.state
            .compare_exchange(
                TransactionState::Active as u8,
                TransactionState::Committed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| Error::IllegalState("commit of a transaction that is not active".into()))?;
        self.tc.store(tc, Ordering::Release);
        Ok(())
    }

    /// Marks the transaction aborted. Must be called exactly once, while
    /// `Active`; fails with `Error::IllegalState` otherwise.
    pub(crate) fn abort(&self) -> Result<()> {
        self.state
            .compare_exchange(
                TransactionState::Active as u8,
                TransactionState::Aborted as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| Error::IllegalState("abort of a transaction that is not active".into()))?;
        self.tc.store(ABORTED, Ordering::Release);
        Ok(())
    }

    /// Moves a finalized (committed or aborted) entry to `Free`. Fails
    /// with `Error::IllegalState` if the entry is still `Active` or
    /// already `Free`.
    pub(crate) fn retire(&self) -> Result<()> {
        let state = self.state();
        if state != TransactionState::Committed && state != TransactionState::Aborted {
            return Err(Error::IllegalState(format!(
                "cannot retire a transaction in state {state:?}"
            )));
        }
        self.state.store(TransactionState::Free as u8, Ordering::Release);
        Ok(())
    }
}
