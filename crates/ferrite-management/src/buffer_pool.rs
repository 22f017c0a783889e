// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_latch::{SharedResource, StatusFlags};
use ferrite_txn::Timestamp;
use serde::{Deserialize, Serialize};

use crate::header::Header;

/// A point-in-time snapshot of one buffer pool's occupancy.
///
/// Populated by counting the [`StatusFlags`] of every buffer currently
/// claimed through the pool's [`SharedResource`] latches; the pool itself
/// (eviction policy, page table) is out of scope here, matching the
/// core/Management boundary this crate sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferPoolInfo {
    pub header: Header,
    pub buffer_size: usize,
    pub buffer_count: usize,
    pub valid_count: usize,
    pub dirty_count: usize,
    pub claimed_count: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}

impl BufferPoolInfo {
    /// Tallies `buffers`' current status against the pool's declared
    /// `buffer_size`/`buffer_count`. `hit_count`/`miss_count` are opaque
    /// counters the pool itself maintains and simply passes through.
    #[tracing::instrument(level = "trace", skip(buffers))]
    pub fn capture(
        buffer_size: usize,
        buffer_count: usize,
        buffers: &[SharedResource],
        hit_count: u64,
        miss_count: u64,
        generation: u64,
        captured_at: Timestamp,
    ) -> Self {
        let valid_count = buffers.iter().filter(|b| b.status().contains(StatusFlags::VALID)).count();
        let dirty_count = buffers.iter().filter(|b| b.status().contains(StatusFlags::DIRTY)).count();
        let claimed_count = buffers.iter().filter(|b| b.claim_count() > 0).count();
        tracing::trace!(valid_count, dirty_count, claimed_count, "captured buffer pool snapshot");
        BufferPoolInfo {
            header: Header::new(generation, captured_at),
            buffer_size,
            buffer_count,
            valid_count,
            dirty_count,
            claimed_count,
            hit_count,
            miss_count,
        }
    }
}
