// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

//! A multi-reader/single-writer latch ([`SharedResource`]) with claim
//! counting, recursive write re-entrance, upgrade/downgrade, non-strict
//! FIFO fairness, and a set of non-lock [`StatusFlags`].
//!
//! This is the one blocking primitive in the store: every other structure
//! (buffer pool pages, tree nodes, the transaction index's own buckets)
//! guards its mutable state with one of these. See the crate's test suite
//! for the concurrency properties it is held to.

mod error;
mod resource;
mod status;

pub use error::{Error, Result};
pub use resource::{SharedResource, DEFAULT_TIMEOUT, MAX_CLAIMS};
pub use status::StatusFlags;
