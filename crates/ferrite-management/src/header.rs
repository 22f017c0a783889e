// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_txn::Timestamp;
use serde::{Deserialize, Serialize};

/// Fields common to every Management DTO, in place of the source's
/// acquisition-time base class (see the crate's design notes): the
/// generation of the guarded content this snapshot was read from, and the
/// timestamp the snapshot was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub generation: u64,
    pub captured_at: Timestamp,
}

impl Header {
    pub fn new(generation: u64, captured_at: Timestamp) -> Self {
        Header { generation, captured_at }
    }
}
