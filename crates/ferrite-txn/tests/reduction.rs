// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::sync::Arc;

use ferrite_txn::{Config, TransactionIndex};

/// The reduction scenario from the crate's design notes: register 100
/// transactions each with one open MVV record, abort a middle slice,
/// drain half of those aborts' versions, commit and complete the rest,
/// and check the canonical counters across two cleanup passes.
///
/// `cleanup` reaps against whatever floor the *previous* sweep installed,
/// not a freshly rebuilt one (see [`TransactionIndex::cleanup`]'s design
/// notes), so the first cleanup below — run while 70..100 are still
/// active — only seeds the floor for the second; the drained-and-aborted
/// slice is not actually reclaimed until that second call.
#[test]
fn reduction_scenario_matches_canonical_counters() {
    let threshold: u64 = 30;
    let idx = TransactionIndex::new(Config { long_running_threshold: threshold, ..Config::default() });

    let mut statuses = Vec::new();
    for _ in 0..100 {
        let t = idx.register_transaction().unwrap();
        t.inc_mvv_count();
        statuses.push(t);
    }

    // Abort 20..70.
    for t in &statuses[20..70] {
        idx.abort(t).unwrap();
    }
    // Drain the MVV count for 50..60 (they keep mvvCount == 0 from here).
    for t in &statuses[50..60] {
        t.dec_mvv_count();
    }
    // Commit and complete 0..20.
    for t in &statuses[0..20] {
        idx.commit(t, idx.allocate_commit_timestamp()).unwrap();
    }
    // Finalize everything that has reached a terminal commit/abort state;
    // 70..100 stay active.
    for t in statuses.drain(0..70) {
        idx.notify_completed(t).unwrap();
    }

    idx.cleanup();

    // All 50 aborts (20..70) are still counted: this first sweep only
    // saw the stale default floor and reaped nothing.
    assert_eq!(idx.aborted_count(), 50);
    assert_eq!(idx.current_count(), threshold, "only 70..100 remain active");

    // Commit and complete 70..100, then clean up again.
    for t in statuses.drain(..) {
        idx.commit(&t, idx.allocate_commit_timestamp()).unwrap();
        idx.notify_completed(t).unwrap();
    }
    idx.cleanup();

    // The floor the first cleanup installed (above everything finalized
    // so far) now reaps the 10 drained-and-aborted entries (50..60):
    // 50 - 10 = 40 remain retained as aborted.
    assert_eq!(idx.aborted_count(), 40, "still-undrained aborts remain sticky across cleanup");
    assert_eq!(idx.current_count(), 0);
}

#[test]
fn long_running_transactions_are_promoted() {
    let idx = Arc::new(TransactionIndex::new(Config { long_running_threshold: 3, ..Config::default() }));
    let t = idx.register_transaction().unwrap();
    for _ in 0..3 {
        t.inc_mvv_count();
    }
    idx.cleanup();
    assert_eq!(idx.long_running_count(), 1);
    assert_eq!(idx.current_count(), 0, "promotion moves the entry out of the active partition");
}
