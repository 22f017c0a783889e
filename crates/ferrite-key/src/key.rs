// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::fmt;

use crate::error::{Error, Result};
use crate::segment::{self, Segment};

/// A mutable, order-preserving byte buffer built from a sequence of typed
/// segments.
///
/// `Key` is owned by exactly one thread at a time (see the crate-level
/// concurrency notes): mutating methods take `&mut self`. The encoded form
/// returned by [`Key::as_bytes`] is a stable snapshot once copied and is
/// safe to use as a map key or store on disk; comparing two such byte
/// slices lexicographically reproduces the logical tuple ordering of the
/// segments that produced them.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    buf: Vec<u8>,
    // bounds[i] is the end offset (exclusive) of segment i within `buf`.
    bounds: Vec<usize>,
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("depth", &self.depth()).field("bytes", &self.buf).finish()
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.buf.cmp(&other.buf)
    }
}

impl Key {
    /// An empty key. Depth zero, the starting point for `append`.
    pub fn new() -> Self {
        Key { buf: Vec::new(), bounds: Vec::new() }
    }

    /// The sentinel strictly less than every real key.
    pub fn before() -> Self {
        Key { buf: Vec::new(), bounds: Vec::new() }
    }

    /// The sentinel strictly greater than every real key.
    pub fn after() -> Self {
        Key { buf: vec![0xff], bounds: Vec::new() }
    }

    /// True iff this key has no decodable segments: either the BEFORE
    /// sentinel or the AFTER sentinel, which share the same `depth() == 0`
    /// representation as a freshly-constructed empty key (BEFORE sorts
    /// identically to the empty prefix of every key by construction).
    pub fn is_sentinel(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.bounds.len()
    }

    pub fn encoded_len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends a segment, extending the key by one depth.
    pub fn append(&mut self, segment: Segment) -> &mut Self {
        segment::encode_into(&segment, &mut self.buf);
        self.bounds.push(self.buf.len());
        self
    }

    /// Replaces the last segment with a new one (`cut(1)` then `append`).
    pub fn to(&mut self, segment: Segment) -> Result<&mut Self> {
        if self.bounds.is_empty() {
            return Err(Error::DepthOutOfBounds { depth: 0, len: 0 });
        }
        self.cut(1)?;
        Ok(self.append(segment))
    }

    /// Drops the last `n` segments.
    pub fn cut(&mut self, n: usize) -> Result<&mut Self> {
        let len = self.bounds.len();
        if n > len {
            return Err(Error::DepthOutOfBounds { depth: len.saturating_sub(n), len });
        }
        let new_len = len - n;
        let new_byte_len = if new_len == 0 { 0 } else { self.bounds[new_len - 1] };
        self.buf.truncate(new_byte_len);
        self.bounds.truncate(new_len);
        Ok(self)
    }

    /// Truncates the key to depth zero.
    pub fn reset(&mut self) -> &mut Self {
        self.buf.clear();
        self.bounds.clear();
        self
    }

    /// Returns a decode cursor positioned to read segment `i` onwards.
    pub fn index_to(&self, i: usize) -> Result<DecodeCursor<'_>> {
        if i > self.bounds.len() {
            return Err(Error::DepthOutOfBounds { depth: i, len: self.bounds.len() });
        }
        let start = if i == 0 { 0 } else { self.bounds[i - 1] };
        Ok(DecodeCursor { input: &self.buf[start..], index: i })
    }

    /// Decodes and returns the segment at depth `i` without mutating any
    /// cursor state.
    pub fn segment_at(&self, i: usize) -> Result<Segment> {
        if i >= self.bounds.len() {
            return Err(Error::DepthOutOfBounds { depth: i, len: self.bounds.len() });
        }
        let start = if i == 0 { 0 } else { self.bounds[i - 1] };
        let (segment, _) = segment::decode_at(&self.buf[start..], i)?;
        Ok(segment)
    }

    /// Builds a `Key` directly from a previously encoded byte buffer,
    /// re-deriving the segment boundary table by decoding once.
    pub fn from_encoded(buf: Vec<u8>) -> Result<Self> {
        let mut bounds = Vec::new();
        let mut offset = 0;
        let mut index = 0;
        while offset < buf.len() {
            let (_, consumed) = segment::decode_at(&buf[offset..], index)?;
            offset += consumed;
            bounds.push(offset);
            index += 1;
        }
        Ok(Key { buf, bounds })
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::new()
    }
}

/// A one-shot cursor over the remaining segments of a `Key`, starting at
/// the depth it was created at via [`Key::index_to`].
pub struct DecodeCursor<'a> {
    input: &'a [u8],
    index: usize,
}

impl<'a> DecodeCursor<'a> {
    fn next_segment(&mut self, expected: &'static str) -> Result<Segment> {
        let (segment, consumed) = segment::decode_at(self.input, self.index)?;
        if segment.type_name() != expected {
            return Err(Error::TypeMismatch {
                index: self.index,
                expected,
                found: segment.type_name().to_string(),
            });
        }
        self.input = &self.input[consumed..];
        self.index += 1;
        Ok(segment)
    }

    pub fn next_bool(&mut self) -> Result<bool> {
        match self.next_segment("bool")? {
            Segment::Boolean(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn next_int(&mut self) -> Result<i64> {
        match self.next_segment("int")? {
            Segment::Int(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn next_uint(&mut self) -> Result<u64> {
        match self.next_segment("uint")? {
            Segment::UInt(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn next_float(&mut self) -> Result<f64> {
        match self.next_segment("float")? {
            Segment::Float(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn next_str(&mut self) -> Result<String> {
        match self.next_segment("string")? {
            Segment::Str(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn next_bytes(&mut self) -> Result<Vec<u8>> {
        match self.next_segment("bytes")? {
            Segment::Bytes(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}
