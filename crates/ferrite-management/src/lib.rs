// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

//! Read-only structural and operational introspection: buffer pools,
//! volumes, trees, background tasks, the journal, and crash recovery.
//!
//! Every DTO here is a plain record sharing one [`Header`] field rather
//! than dispatching through a subtype hierarchy. This crate depends on
//! [`ferrite_key`], [`ferrite_latch`], and [`ferrite_txn`] only for the
//! types it reports on (a latch's generation, a transaction index's
//! cleanup snapshot) — it never mutates the core and has no knowledge of
//! page layout or the journal's on-disk format.

pub mod error;

mod buffer_pool;
mod header;
mod journal;
mod recovery;
mod task;
mod tree;
mod volume;

pub use buffer_pool::BufferPoolInfo;
pub use error::{Error, Result};
pub use header::Header;
pub use journal::JournalInfo;
pub use recovery::{RecoveryInfo, RecoveryState};
pub use task::{TaskState, TaskStatus};
pub use tree::TreeInfo;
pub use volume::VolumeInfo;
