// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_txn::{ActiveTransactionCache, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::header::Header;

/// Lifecycle state of one background task (a cleanup sweep, a checkpoint,
/// a recovery pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Running,
    Completed,
    Failed,
}

/// A point-in-time report of one background task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub header: Header,
    pub id: u64,
    pub description: String,
    pub state: TaskState,
    /// In `[0.0, 1.0]`.
    pub progress: f64,
}

impl TaskStatus {
    /// Fails with [`Error::IllegalArgument`] if `progress` is outside
    /// `[0.0, 1.0]`.
    pub fn new(
        id: u64,
        description: impl Into<String>,
        state: TaskState,
        progress: f64,
        generation: u64,
        captured_at: Timestamp,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&progress) {
            return Err(Error::IllegalArgument(format!(
                "progress must be within [0.0, 1.0], got {progress}"
            )));
        }
        Ok(TaskStatus {
            header: Header::new(generation, captured_at),
            id,
            description: description.into(),
            state,
            progress,
        })
    }

    /// Reports the state of a [`ferrite_txn::TransactionIndex::cleanup`]
    /// sweep: the retained entry count against the snapshot it produced
    /// doubles as the task's generation (the cache is rebuilt once per
    /// sweep, so its length changing is observable progress).
    pub fn from_cleanup_sweep(id: u64, snapshot: &ActiveTransactionCache, captured_at: Timestamp) -> Self {
        TaskStatus {
            header: Header::new(snapshot.len() as u64, captured_at),
            id,
            description: "transaction index reduction sweep".into(),
            state: TaskState::Completed,
            progress: 1.0,
        }
    }
}
