// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

mod display;
mod parse;
mod term;
mod traverse;

pub use term::{RangeTerm, Term};

use crate::error::Result;
use crate::key::Key;

/// A compiled, immutable multi-level selection predicate and navigation
/// oracle over encoded keys.
///
/// Every mutator (`append`, `limit`) returns a new `KeyFilter` that shares
/// its term list's underlying values by clone; filters are small and cheap
/// to clone wholesale, so no `Arc` sharing is attempted here.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFilter {
    terms: Vec<Term>,
    min_depth: usize,
    max_depth: usize,
    wildcard_tail: bool,
}

impl KeyFilter {
    /// Builds a filter from an explicit term list. `min_depth`/`max_depth`
    /// default to the term count unless `wildcard_tail` is set, in which
    /// case `max_depth` is unbounded until [`KeyFilter::limit`] narrows it.
    pub fn new(terms: Vec<Term>, wildcard_tail: bool) -> Self {
        let len = terms.len();
        KeyFilter {
            terms,
            min_depth: len,
            max_depth: if wildcard_tail { usize::MAX } else { len },
            wildcard_tail,
        }
    }

    /// The filter that matches every key (no terms, full wildcard tail).
    pub fn all() -> Self {
        KeyFilter { terms: Vec::new(), min_depth: 0, max_depth: usize::MAX, wildcard_tail: true }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn has_wildcard_tail(&self) -> bool {
        self.wildcard_tail
    }

    /// Returns a new filter with `term` appended at the next depth.
    pub fn append(&self, term: Term) -> Self {
        let mut terms = self.terms.clone();
        terms.push(term);
        let len = terms.len();
        KeyFilter {
            min_depth: self.min_depth.max(len.min(self.min_depth)),
            max_depth: if self.wildcard_tail { self.max_depth } else { len.max(self.max_depth) },
            terms,
            wildcard_tail: self.wildcard_tail,
        }
    }

    /// Returns a new filter with depth bounds `[min, max]`.
    pub fn limit(&self, min: usize, max: usize) -> Self {
        KeyFilter { terms: self.terms.clone(), min_depth: min, max_depth: max, wildcard_tail: self.wildcard_tail }
    }

    /// True iff `key` satisfies every term and depth bound.
    pub fn selected(&self, key: &Key) -> Result<bool> {
        let depth = key.depth();
        if depth < self.min_depth || depth > self.max_depth {
            return Ok(false);
        }
        for i in 0..depth {
            if i < self.terms.len() {
                let term = &self.terms[i];
                if matches!(term, Term::All) {
                    continue;
                }
                let segment = key.segment_at(i)?;
                if !term.matches(&segment) {
                    return Ok(false);
                }
            } else if !self.wildcard_tail {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Finds the shallowest depth within `key` at which this filter
    /// rejects, or `None` if `key` is already [`KeyFilter::selected`].
    fn reject_depth(&self, key: &Key) -> Result<Option<usize>> {
        let depth = key.depth();
        for i in 0..depth.min(self.terms.len()) {
            let term = &self.terms[i];
            if matches!(term, Term::All) {
                continue;
            }
            let segment = key.segment_at(i)?;
            if !term.matches(&segment) {
                return Ok(Some(i));
            }
        }
        if depth > self.terms.len() && !self.wildcard_tail {
            return Ok(Some(self.terms.len()));
        }
        if depth < self.min_depth || depth > self.max_depth {
            // Prefix matches every term but the depth bound itself is
            // violated; traversal still needs a reject site to carry
            // from, so report one past the last checked term.
            return Ok(Some(depth.min(self.terms.len())));
        }
        Ok(None)
    }

    /// Mutates `key` in place to the next (or previous, if
    /// `forward == false`) encoded key that could be selected, in strict
    /// key order. Returns `Ok(false)` if no such key exists within the
    /// filter's domain; `key`'s contents are then unspecified and should
    /// not be reused without resetting.
    pub fn traverse(&self, key: &mut Key, forward: bool) -> Result<bool> {
        traverse::traverse(self, key, forward)
    }
}

pub(crate) fn reject_depth(filter: &KeyFilter, key: &Key) -> Result<Option<usize>> {
    filter.reject_depth(key)
}

pub use display::to_string;
pub use parse::{parse, parse_key_filter_string};
