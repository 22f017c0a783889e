// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_txn::Timestamp;
use serde::{Deserialize, Serialize};

use crate::header::Header;

/// Structural facts about one on-disk volume, as seen from outside the
/// (out-of-scope) page layout it addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub header: Header,
    pub path: String,
    pub page_size: u32,
    pub page_count: u64,
    pub extended_page_count: u64,
    pub max_page_count: u64,
}

impl VolumeInfo {
    pub fn new(
        path: impl Into<String>,
        page_size: u32,
        page_count: u64,
        extended_page_count: u64,
        max_page_count: u64,
        generation: u64,
        captured_at: Timestamp,
    ) -> Self {
        VolumeInfo {
            header: Header::new(generation, captured_at),
            path: path.into(),
            page_size,
            page_count,
            extended_page_count,
            max_page_count,
        }
    }
}
