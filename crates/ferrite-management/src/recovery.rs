// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_txn::Timestamp;
use serde::{Deserialize, Serialize};

use crate::header::Header;

/// Phase of a crash-recovery pass over the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryState {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

/// A point-in-time report of a crash-recovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryInfo {
    pub header: Header,
    pub state: RecoveryState,
    pub applied_transaction_count: u64,
    pub rolled_back_transaction_count: u64,
    pub last_valid_checkpoint: Timestamp,
}

impl RecoveryInfo {
    pub fn new(
        state: RecoveryState,
        applied_transaction_count: u64,
        rolled_back_transaction_count: u64,
        last_valid_checkpoint: Timestamp,
        generation: u64,
        captured_at: Timestamp,
    ) -> Self {
        RecoveryInfo {
            header: Header::new(generation, captured_at),
            state,
            applied_transaction_count,
            rolled_back_transaction_count,
            last_valid_checkpoint,
        }
    }
}
