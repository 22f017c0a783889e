// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use thiserror::Error;

/// Errors raised while claiming or releasing a [`crate::SharedResource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("claim timed out before the latch became available")]
    InUse,

    #[error("claim wait was cancelled")]
    Interrupted,

    #[error("illegal latch state transition: {0}")]
    IllegalState(String),
}

pub type Result<T> = std::result::Result<T, Error>;
