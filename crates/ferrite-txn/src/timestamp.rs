// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// A transaction's start or commit timestamp, drawn from one global
/// monotonic counter shared by both uses.
pub type Timestamp = u64;

/// A process-lifetime-unique transaction identifier. Equal to the
/// transaction's start `Timestamp`.
pub type TransactionId = Timestamp;

/// A packed `(ts, step)` pair identifying one version written by one
/// transaction. See [`ts2vh`]/[`vh_ts`]/[`vh_step`].
pub type VersionHandle = u64;

/// Bits of a [`VersionHandle`] given to the intra-transaction step
/// counter. 256 steps per transaction before `Error::StepOverflow` is
/// raised at the call site rather than silently wrapping into the next
/// transaction's `ts` range.
pub const STEP_BITS: u32 = 8;
const STEP_MASK: u64 = (1 << STEP_BITS) - 1;
const MAX_STEP: u64 = STEP_MASK;

/// `tc` value meaning "this transaction has not committed" — either still
/// active, or a `ww_dependency` wait that timed out before the writer
/// finalized. Chosen as `0` so that a freshly registered status (which
/// starts with `tc == 0`) reads as uncommitted without a separate flag.
pub const UNCOMMITTED: Timestamp = 0;

/// `tc` value meaning "this transaction aborted". The maximal `u64` so it
/// never collides with a real commit timestamp issued by the oracle below
/// (which would need to wrap `u64` to reach it).
pub const ABORTED: Timestamp = u64::MAX;

/// Packs a start timestamp and step into a [`VersionHandle`].
///
/// `ts2vh(t) + k` for `k in 1..=MAX_STEP` is strictly greater than
/// `ts2vh(t)` and compares within the same transaction by step, exactly as
/// required: two version handles from the same `ts` order by `step`, and a
/// version handle from a later `ts` always sorts after every version
/// handle of an earlier one because `ts` occupies the high bits.
pub fn ts2vh(ts: Timestamp, step: u8) -> VersionHandle {
    (ts << STEP_BITS) | (step as u64)
}

/// The start timestamp encoded in a version handle.
pub fn vh_ts(vh: VersionHandle) -> Timestamp {
    vh >> STEP_BITS
}

/// The step encoded in a version handle.
pub fn vh_step(vh: VersionHandle) -> u8 {
    (vh & STEP_MASK) as u8
}

/// Allocates the single, strictly increasing timestamp currency used for
/// both transaction start and commit timestamps.
#[derive(Debug, Default)]
pub struct TimestampOracle {
    next: AtomicU64,
}

impl TimestampOracle {
    pub fn new() -> Self {
        // Start at 1: 0 is reserved for `UNCOMMITTED`.
        TimestampOracle { next: AtomicU64::new(1) }
    }

    /// Allocates the next timestamp. Used both for a transaction's `ts`
    /// at registration and for its `tc` at commit.
    pub fn next(&self) -> Timestamp {
        self.next.fetch_add(1, Ordering::AcqRel)
    }

    /// The next value that would be allocated, without allocating it.
    pub fn peek(&self) -> Timestamp {
        self.next.load(Ordering::Acquire)
    }
}

/// Allocates the next step for a transaction's version handle, failing
/// once the `STEP_BITS`-wide counter is exhausted rather than silently
/// overflowing into the next transaction's `ts` range.
#[derive(Debug, Default)]
pub struct StepAllocator {
    next: AtomicU64,
}

impl StepAllocator {
    pub fn new() -> Self {
        StepAllocator { next: AtomicU64::new(0) }
    }

    pub fn next(&self) -> Result<u8> {
        let step = self.next.fetch_add(1, Ordering::AcqRel);
        if step > MAX_STEP {
            return Err(Error::StepOverflow);
        }
        Ok(step as u8)
    }

    pub fn current(&self) -> u8 {
        self.next.load(Ordering::Acquire).min(MAX_STEP) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vh_round_trips_ts_and_step() {
        let vh = ts2vh(42, 7);
        assert_eq!(vh_ts(vh), 42);
        assert_eq!(vh_step(vh), 7);
    }

    #[test]
    fn later_step_sorts_after_earlier_step_same_ts() {
        let a = ts2vh(10, 1);
        let b = ts2vh(10, 2);
        assert!(a < b);
    }

    #[test]
    fn any_step_of_later_ts_sorts_after_any_step_of_earlier_ts() {
        let a = ts2vh(10, 255);
        let b = ts2vh(11, 0);
        assert!(a < b);
    }

    #[test]
    fn oracle_is_monotonic() {
        let oracle = TimestampOracle::new();
        let a = oracle.next();
        let b = oracle.next();
        assert!(b > a);
    }

    #[test]
    fn step_allocator_overflows_past_max_step() {
        let steps = StepAllocator::new();
        for _ in 0..=MAX_STEP {
            steps.next().unwrap();
        }
        assert!(matches!(steps.next(), Err(Error::StepOverflow)));
    }
}
