// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

//! MVCC bookkeeping: transaction registration, commit/abort, visibility
//! queries, write-write dependency detection, and reduction of finalized
//! entries to canonical form.
//!
//! [`TransactionIndex`] is the sharded registry; [`TransactionStatus`] is
//! one transaction's entry in it. A [`crate::timestamp::VersionHandle`]
//! packs the `(ts, step)` pair that identifies one version written by one
//! transaction, and [`TransactionIndex::commit_status`] resolves one to a
//! visibility outcome for a given reader. This crate has no knowledge of
//! keys, pages, or the [`ferrite_latch::SharedResource`] latch that guards
//! them — its own buckets use short-held `parking_lot` mutexes instead
//! (see §5 of the design notes this crate is grounded on).

pub mod error;

mod cache;
mod config;
mod index;
mod status;
mod timestamp;

pub use cache::ActiveTransactionCache;
pub use config::Config;
pub use error::{Error, Result};
pub use index::TransactionIndex;
pub use status::{TransactionState, TransactionStatus};
pub use timestamp::{
    ABORTED, STEP_BITS, TimestampOracle, Timestamp, TransactionId, UNCOMMITTED, VersionHandle, ts2vh,
    vh_step, vh_ts,
};
