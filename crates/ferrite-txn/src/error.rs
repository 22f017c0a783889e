// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use thiserror::Error;

/// Errors raised by [`crate::TransactionIndex`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("transaction index capacity exceeded")]
    ResourceExhausted,

    #[error("illegal transaction state transition: {0}")]
    IllegalState(String),

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    #[error("version handle step counter exhausted for this transaction")]
    StepOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
