// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};
use crate::status::StatusFlags;

/// Low 15 bits of the lock word: the number of outstanding claims.
const CLAIM_MASK: u32 = 0x7FFF;
/// Bit 15: a write claim is outstanding.
const WRITER_BIT: u32 = 1 << 15;
/// Bits 16..32: the generation counter.
const GENERATION_SHIFT: u32 = 16;
const GENERATION_STEP: u32 = 1 << GENERATION_SHIFT;
/// The largest number of simultaneous claims the 15-bit field can hold.
pub const MAX_CLAIMS: u32 = CLAIM_MASK;

/// Default claim timeout, matching the source's 60 second default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The interval a blocked claimant polls its deadline and the cancellation
/// flag at. Bounded so that a `release()` missed by a condvar spurious
/// wakeup is never outstanding for longer than this.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

fn claim_count(word: u32) -> u32 {
    word & CLAIM_MASK
}

fn has_writer(word: u32) -> bool {
    word & WRITER_BIT != 0
}

/// A multi-reader/single-writer latch with claim counting, non-strict FIFO
/// fairness, and a set of non-lock status flags.
///
/// Two atomic cells back the fast path: `lock_word` packs the claim count,
/// the writer flag, and a generation counter that one load gives a reader
/// both the claim state and a version stamp for optimistic reads;
/// `status_word` holds [`StatusFlags`], updated independently so a status
/// change never contends with the claim CAS loop. Waiting threads park on
/// a [`Condvar`]; a small FIFO queue biases (but does not strictly
/// serialize) acquisition so a steady stream of readers cannot starve a
/// waiting writer.
pub struct SharedResource {
    lock_word: AtomicU32,
    status_word: AtomicU32,
    owner: Mutex<Option<ThreadId>>,
    wait_mutex: Mutex<()>,
    wait_cvar: Condvar,
    waiters: Mutex<VecDeque<ThreadId>>,
}

impl SharedResource {
    pub fn new() -> Self {
        SharedResource {
            lock_word: AtomicU32::new(0),
            status_word: AtomicU32::new(0),
            owner: Mutex::new(None),
            wait_mutex: Mutex::new(()),
            wait_cvar: Condvar::new(),
            waiters: Mutex::new(VecDeque::new()),
        }
    }

    /// The number of outstanding claims (read or write).
    pub fn claim_count(&self) -> u32 {
        claim_count(self.lock_word.load(Ordering::Acquire))
    }

    /// True iff a write claim is currently outstanding.
    pub fn is_writer(&self) -> bool {
        has_writer(self.lock_word.load(Ordering::Acquire))
    }

    /// The thread currently holding the write claim, if any.
    pub fn owner(&self) -> Option<ThreadId> {
        *self.owner.lock()
    }

    /// The monotonic generation counter. Bumped by [`Self::touch`]
    /// whenever the guarded content changes; readers can compare two
    /// samples to detect concurrent modification without claiming.
    pub fn generation(&self) -> u32 {
        self.lock_word.load(Ordering::Acquire) >> GENERATION_SHIFT
    }

    /// Bumps the generation counter. Callers mutate the guarded content
    /// under a write claim and call this before releasing it.
    pub fn touch(&self) {
        self.lock_word.fetch_add(GENERATION_STEP, Ordering::AcqRel);
    }

    /// Whether the resource could be claimed for read right now without
    /// blocking. Resolves the `isAvailable` open question explicitly: true
    /// iff there are no outstanding claims, or there is no writer and the
    /// claim count has headroom, or the calling thread is itself the
    /// current exclusive owner (recursive write is always available to
    /// its own owner).
    pub fn is_available(&self) -> bool {
        let word = self.lock_word.load(Ordering::Acquire);
        let count = claim_count(word);
        if count == 0 {
            return true;
        }
        if !has_writer(word) {
            return count < MAX_CLAIMS;
        }
        self.owner() == Some(thread::current().id())
    }

    /// Acquires a read (shared) or write (exclusive) claim, blocking up to
    /// `timeout`. Returns `Err(Error::InUse)` on timeout without mutating
    /// any state.
    pub fn claim(&self, write: bool, timeout: Duration) -> Result<()> {
        self.claim_inner(write, timeout, None)
    }

    /// Like [`Self::claim`], but also returns `Err(Error::Interrupted)`
    /// promptly once `cancel` is observed set. Rust has no `Thread::
    /// interrupt`; `cancel` is the cooperative stand-in the source's
    /// `InterruptedException` path is modeled with here.
    pub fn claim_cancellable(
        &self,
        write: bool,
        timeout: Duration,
        cancel: &AtomicBool,
    ) -> Result<()> {
        self.claim_inner(write, timeout, Some(cancel))
    }

    fn claim_inner(&self, write: bool, timeout: Duration, cancel: Option<&AtomicBool>) -> Result<()> {
        let me = thread::current().id();
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    self.deregister_waiter(me);
                    tracing::debug!(write, "claim cancelled");
                    return Err(Error::Interrupted);
                }
            }

            if !self.has_other_waiter(me) {
                let acquired = if write { self.try_claim_write(me) } else { self.try_claim_read(me) };
                if acquired {
                    self.deregister_waiter(me);
                    return Ok(());
                }
            }

            self.register_waiter(me);

            let now = Instant::now();
            if now >= deadline {
                self.deregister_waiter(me);
                tracing::debug!(write, "claim timed out");
                return Err(Error::InUse);
            }

            let wait_for = (deadline - now).min(POLL_INTERVAL);
            let mut guard = self.wait_mutex.lock();
            self.wait_cvar.wait_for(&mut guard, wait_for);
        }
    }

    fn try_claim_read(&self, me: ThreadId) -> bool {
        loop {
            let word = self.lock_word.load(Ordering::Acquire);
            if has_writer(word) && self.owner() != Some(me) {
                return false;
            }
            let count = claim_count(word);
            if count >= MAX_CLAIMS {
                return false;
            }
            let new_word = (word & !CLAIM_MASK) | (count + 1);
            if self
                .lock_word
                .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn try_claim_write(&self, me: ThreadId) -> bool {
        loop {
            let word = self.lock_word.load(Ordering::Acquire);
            let count = claim_count(word);
            if has_writer(word) {
                if self.owner() != Some(me) {
                    return false;
                }
                if count >= MAX_CLAIMS {
                    return false;
                }
                let new_word = (word & !CLAIM_MASK) | (count + 1);
                if self
                    .lock_word
                    .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    return true;
                }
            } else {
                if count != 0 {
                    return false;
                }
                let new_word = (word & !CLAIM_MASK) | WRITER_BIT | 1;
                if self
                    .lock_word
                    .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    *self.owner.lock() = Some(me);
                    return true;
                }
            }
        }
    }

    /// Releases one claim (matching a single `claim` call). When the
    /// count reaches zero and a write claim was outstanding, clears the
    /// writer flag and owner, and wakes at least one waiter.
    pub fn release(&self) -> Result<()> {
        loop {
            let word = self.lock_word.load(Ordering::Acquire);
            let count = claim_count(word);
            if count == 0 {
                return Err(Error::IllegalState("release of a latch with no outstanding claim".into()));
            }
            let new_count = count - 1;
            let clears_writer = new_count == 0 && has_writer(word);
            let mut new_word = (word & !CLAIM_MASK) | new_count;
            if clears_writer {
                new_word &= !WRITER_BIT;
            }
            if self
                .lock_word
                .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if clears_writer {
                    *self.owner.lock() = None;
                }
                self.notify_waiters();
                return Ok(());
            }
        }
    }

    /// Upgrades a held read claim to a write claim. Succeeds iff exactly
    /// one claim is outstanding and there is no writer; on failure no
    /// state is mutated.
    pub fn upgrade(&self) -> bool {
        let me = thread::current().id();
        loop {
            let word = self.lock_word.load(Ordering::Acquire);
            if claim_count(word) != 1 || has_writer(word) {
                return false;
            }
            let new_word = word | WRITER_BIT;
            if self
                .lock_word
                .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                *self.owner.lock() = Some(me);
                return true;
            }
        }
    }

    /// Downgrades a held write claim to a read claim, retaining the
    /// single outstanding claim. Implemented as clearing the writer flag
    /// and waking waiters, so a queued reader can proceed immediately.
    pub fn downgrade(&self) {
        loop {
            let word = self.lock_word.load(Ordering::Acquire);
            if !has_writer(word) {
                return;
            }
            let new_word = word & !WRITER_BIT;
            if self
                .lock_word
                .compare_exchange_weak(word, new_word, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                *self.owner.lock() = None;
                self.notify_waiters();
                return;
            }
        }
    }

    /// The current status flags.
    pub fn status(&self) -> StatusFlags {
        StatusFlags::from_bits_truncate(self.status_word.load(Ordering::Acquire))
    }

    /// Atomically ORs `flags` into the status word.
    pub fn set_status(&self, flags: StatusFlags) {
        self.status_word.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    /// Atomically clears `flags` from the status word.
    pub fn clear_status(&self, flags: StatusFlags) {
        self.status_word.fetch_and(!flags.bits(), Ordering::AcqRel);
    }

    /// Atomically replaces the status word with exactly `flags`. Only the
    /// status bits are touched: the lock/claim word is a separate cell and
    /// is never reachable through this API, by construction.
    pub fn replace_status(&self, flags: StatusFlags) {
        self.status_word.store(flags.bits(), Ordering::Release);
    }

    fn has_other_waiter(&self, me: ThreadId) -> bool {
        let owner = self.owner();
        self.waiters.lock().iter().any(|&w| w != me && Some(w) != owner)
    }

    fn register_waiter(&self, me: ThreadId) {
        let mut waiters = self.waiters.lock();
        if !waiters.contains(&me) {
            waiters.push_back(me);
        }
    }

    fn deregister_waiter(&self, me: ThreadId) {
        self.waiters.lock().retain(|&w| w != me);
    }

    fn notify_waiters(&self) {
        let _guard = self.wait_mutex.lock();
        self.wait_cvar.notify_all();
    }
}

impl Default for SharedResource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn read_claims_stack() {
        let r = SharedResource::new();
        r.claim(false, Duration::from_millis(10)).unwrap();
        r.claim(false, Duration::from_millis(10)).unwrap();
        assert_eq!(r.claim_count(), 2);
        assert!(!r.is_writer());
        r.release().unwrap();
        r.release().unwrap();
        assert_eq!(r.claim_count(), 0);
    }

    #[test]
    fn write_excludes_read() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        assert!(r.claim(false, Duration::from_millis(20)).is_err());
        r.release().unwrap();
        assert!(r.claim(false, Duration::from_millis(10)).is_ok());
    }

    #[test]
    fn recursive_write_from_owner_succeeds() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        r.claim(true, Duration::from_millis(10)).unwrap();
        assert_eq!(r.claim_count(), 2);
        r.release().unwrap();
        assert!(r.is_writer());
        r.release().unwrap();
        assert!(!r.is_writer());
    }

    #[test]
    fn upgrade_requires_sole_claim() {
        let r = SharedResource::new();
        r.claim(false, Duration::from_millis(10)).unwrap();
        r.claim(false, Duration::from_millis(10)).unwrap();
        assert!(!r.upgrade());
        r.release().unwrap();
        assert!(r.upgrade());
        assert!(r.is_writer());
    }

    #[test]
    fn downgrade_clears_writer_bit() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        r.downgrade();
        assert!(!r.is_writer());
        assert_eq!(r.claim_count(), 1);
        r.release().unwrap();
    }

    #[test]
    fn timeout_leaves_state_unchanged() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        let before = r.claim_count();
        let outcome = r.claim(false, Duration::from_millis(30));
        assert!(matches!(outcome, Err(Error::InUse)));
        assert_eq!(r.claim_count(), before);
        r.release().unwrap();
    }

    #[test]
    fn cancellation_is_observable() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        let cancel = AtomicBool::new(true);
        let outcome = r.claim_cancellable(false, Duration::from_secs(5), &cancel);
        assert!(matches!(outcome, Err(Error::Interrupted)));
        r.release().unwrap();
    }

    #[test]
    fn is_available_matches_resolution() {
        let r = SharedResource::new();
        assert!(r.is_available());
        r.claim(false, Duration::from_millis(10)).unwrap();
        assert!(r.is_available());
        r.release().unwrap();

        r.claim(true, Duration::from_millis(10)).unwrap();
        assert!(r.is_available(), "owner's own write claim is available to itself");
        r.release().unwrap();
    }

    #[test]
    fn is_available_false_for_other_threads_writer() {
        let r = Arc::new(SharedResource::new());
        r.claim(true, Duration::from_millis(10)).unwrap();
        let other = Arc::clone(&r);
        let handle = thread::spawn(move || other.is_available());
        assert!(!handle.join().unwrap());
        r.release().unwrap();
    }

    #[test]
    fn status_bits_independent_of_lock_bits() {
        let r = SharedResource::new();
        r.claim(true, Duration::from_millis(10)).unwrap();
        r.set_status(StatusFlags::DIRTY | StatusFlags::VALID);
        assert_eq!(r.status(), StatusFlags::DIRTY | StatusFlags::VALID);
        assert_eq!(r.claim_count(), 1);
        r.clear_status(StatusFlags::DIRTY);
        assert_eq!(r.status(), StatusFlags::VALID);
        r.release().unwrap();
    }

    #[test]
    fn generation_bumps_independent_of_claims() {
        let r = SharedResource::new();
        assert_eq!(r.generation(), 0);
        r.touch();
        r.touch();
        assert_eq!(r.generation(), 2);
        r.claim(false, Duration::from_millis(10)).unwrap();
        assert_eq!(r.generation(), 2);
        r.release().unwrap();
    }

    #[test]
    fn fairness_writer_not_starved_by_readers() {
        let r = Arc::new(SharedResource::new());
        r.claim(false, Duration::from_millis(10)).unwrap();

        let writer_res = Arc::clone(&r);
        let writer = thread::spawn(move || writer_res.claim(true, Duration::from_secs(2)));

        // Give the writer time to register as a waiter.
        thread::sleep(Duration::from_millis(30));

        // A flood of new readers must back off behind the queued writer.
        for _ in 0..20 {
            let reader_res = Arc::clone(&r);
            let outcome = reader_res.claim(false, Duration::from_millis(5));
            assert!(outcome.is_err(), "readers should yield to the queued writer");
        }

        r.release().unwrap();
        assert!(writer.join().unwrap().is_ok());
        r.release().unwrap();
    }
}
