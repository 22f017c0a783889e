// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use thiserror::Error;

/// Errors raised while encoding, decoding, or navigating keys.
///
/// These are local, non-fatal to the store: a caller that receives one of
/// these should abandon the operation in progress without leaving any
/// shared state mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("segment {index} has type {expected}, but the encoded byte tag is {found}")]
    TypeMismatch { index: usize, expected: &'static str, found: String },

    #[error("unexpected end of input while decoding segment {index}")]
    Underflow { index: usize },

    #[error("invalid escape sequence in encoded string/bytes segment at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("segment {index} is not valid UTF-8: {source}")]
    InvalidUtf8 { index: usize, #[source] source: std::string::FromUtf8Error },

    #[error("depth {depth} is out of bounds for a key with {len} segments")]
    DepthOutOfBounds { depth: usize, len: usize },

    #[error("invalid key filter syntax at character {0}")]
    FilterSyntax(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
