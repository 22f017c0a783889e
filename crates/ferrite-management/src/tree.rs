// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_key::Key;
use ferrite_latch::SharedResource;
use ferrite_txn::Timestamp;

use crate::header::Header;

/// Structural facts about one B-link tree within a volume.
///
/// `generation` is read directly off the tree's root-page
/// [`SharedResource`]: the same counter that latch bumps on every
/// structural modification, so a `TreeInfo` snapshot's generation is
/// comparable across captures to detect whether the tree changed shape.
/// Carries the tree's own `first_key`/`last_key` boundaries rather than a
/// serialized form: unlike the other DTOs here, `Key` has no `serde` impl
/// (it is a live, order-preserving buffer, not a wire type), so this one
/// record is process-local only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeInfo {
    pub header: Header,
    pub name: String,
    pub depth: u32,
    pub page_count: u64,
    pub fetch_count: u64,
    pub traverse_count: u64,
    pub first_key: Option<Key>,
    pub last_key: Option<Key>,
}

impl TreeInfo {
    /// `root` is the tree's root-page latch; its generation counter
    /// becomes this snapshot's [`Header::generation`].
    #[allow(clippy::too_many_arguments)]
    pub fn capture(
        name: impl Into<String>,
        root: &SharedResource,
        depth: u32,
        page_count: u64,
        fetch_count: u64,
        traverse_count: u64,
        first_key: Option<Key>,
        last_key: Option<Key>,
        captured_at: Timestamp,
    ) -> Self {
        TreeInfo {
            header: Header::new(root.generation() as u64, captured_at),
            name: name.into(),
            depth,
            page_count,
            fetch_count,
            traverse_count,
            first_key,
            last_key,
        }
    }
}
