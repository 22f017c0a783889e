// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use thiserror::Error;

/// Errors raised constructing a Management DTO.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
