// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use bitflags::bitflags;

bitflags! {
    /// Non-lock status bits carried by a [`crate::SharedResource`].
    ///
    /// These live in a cell separate from the claim count / writer flag so
    /// that a status change never contends with the CAS loop that arbitrates
    /// claims (see the crate-level docs).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u32 {
        /// The guarded content has been initialized and is safe to read.
        const VALID = 1 << 0;
        /// The guarded content has unflushed modifications.
        const DIRTY = 1 << 1;
        /// The guarded content has been logically removed.
        const DELETED = 1 << 2;
        /// A structural (not content) modification is in flight.
        const STRUCTURE = 1 << 3;
        /// The guarded content is not worth retaining once unclaimed.
        const TRANSIENT = 1 << 4;
        /// The guarded content was touched since the last eviction sweep.
        const TOUCHED = 1 << 5;
        /// Claims are being rejected while the container is quiescing.
        const SUSPENDED = 1 << 6;
        /// The container that owns this resource is being retired.
        const CLOSING = 1 << 7;
        /// Pinned: must not be evicted regardless of claim state.
        const FIXED = 1 << 8;
    }
}
