// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_txn::Timestamp;
use serde::{Deserialize, Serialize};

use crate::header::Header;

/// Structural facts about the write-ahead journal. The journal's own file
/// format is out of scope for this crate; this DTO only reports the
/// externally observable addresses and sizing a caller needs to decide
/// whether to roll or checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalInfo {
    pub header: Header,
    pub base_address: u64,
    pub current_address: u64,
    pub block_size: u64,
    pub page_map_size: u64,
}

impl JournalInfo {
    pub fn new(
        base_address: u64,
        current_address: u64,
        block_size: u64,
        page_map_size: u64,
        generation: u64,
        captured_at: Timestamp,
    ) -> Self {
        JournalInfo {
            header: Header::new(generation, captured_at),
            base_address,
            current_address,
            block_size,
            page_map_size,
        }
    }

    /// Bytes written since `base_address`. Useful to decide when to roll
    /// to a new journal file independent of the file format itself.
    pub fn bytes_since_base(&self) -> u64 {
        self.current_address.saturating_sub(self.base_address)
    }
}
