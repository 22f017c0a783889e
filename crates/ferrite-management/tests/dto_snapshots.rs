// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_latch::SharedResource;
use ferrite_management::{BufferPoolInfo, TaskStatus, TreeInfo};
use ferrite_txn::{Config, TransactionIndex};

/// A `TaskStatus` captured from a real `TransactionIndex::cleanup` sweep
/// reports the sweep as completed and carries the post-sweep snapshot
/// length as its generation.
#[test]
fn task_status_reports_a_real_cleanup_sweep() {
    let idx = TransactionIndex::new(Config::default());
    let t = idx.register_transaction().unwrap();
    idx.commit(&t, idx.allocate_commit_timestamp()).unwrap();
    idx.notify_completed(t).unwrap();

    let snapshot = idx.cleanup();
    let status = TaskStatus::from_cleanup_sweep(1, &snapshot, 42);
    assert_eq!(status.id, 1);
    assert_eq!(status.progress, 1.0);
    assert_eq!(status.header.captured_at, 42);
}

/// `BufferPoolInfo::capture` and `TreeInfo::capture` both read live state
/// off real `SharedResource` latches rather than a mock.
#[test]
fn buffer_pool_and_tree_snapshots_reflect_latch_state() {
    let root = SharedResource::new();
    root.claim(true, std::time::Duration::from_millis(10)).unwrap();
    root.touch();
    root.release().unwrap();

    let buffers = vec![SharedResource::new(), SharedResource::new()];
    buffers[0].set_status(ferrite_latch::StatusFlags::VALID);

    let pool = BufferPoolInfo::capture(8192, buffers.len(), &buffers, 10, 1, 0, 1);
    assert_eq!(pool.valid_count, 1);
    assert_eq!(pool.buffer_count, 2);

    let tree = TreeInfo::capture("index", &root, 2, 64, 0, 0, None, None, 1);
    assert_eq!(tree.header.generation, 1);
}
