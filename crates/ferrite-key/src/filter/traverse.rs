// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use super::term::{RangeTerm, Term};
use super::KeyFilter;
use super::reject_depth;
use crate::error::Result;
use crate::key::Key;
use crate::segment::Segment;

enum Outcome {
    Accept(Segment),
    Carry,
}

pub(crate) fn traverse(filter: &KeyFilter, key: &mut Key, forward: bool) -> Result<bool> {
    loop {
        if filter.selected(key)? {
            return Ok(true);
        }

        let Some(d) = reject_depth(filter, key)? else {
            return Ok(false);
        };

        if d >= filter.terms().len() {
            if key.depth() > d {
                key.cut(key.depth() - d)?;
                if d == 0 {
                    return Ok(false);
                }
                if !bump_at(filter, key, d - 1, forward)? {
                    return Ok(false);
                }
                continue;
            }
            // The key is too shallow to satisfy `min_depth` and every
            // enumerated term already matches; a pure wildcard tail
            // carries no type information to synthesize a filler
            // segment, so traversal cannot manufacture one.
            return Ok(false);
        }

        let term = &filter.terms()[d];
        let current = if key.depth() > d { Some(key.segment_at(d)?) } else { None };

        match fill(term, current.as_ref(), forward) {
            Outcome::Accept(value) => {
                if key.depth() > d {
                    key.cut(key.depth() - d)?;
                }
                key.append(value);
            }
            Outcome::Carry => {
                if key.depth() > d {
                    key.cut(key.depth() - d)?;
                }
                if d == 0 {
                    return Ok(false);
                }
                if !bump_at(filter, key, d - 1, forward)? {
                    return Ok(false);
                }
            }
        }
    }
}

/// Advances the segment at depth `i` to the next value admitted by
/// `terms[i]` (strictly greater if `forward`, strictly less otherwise),
/// truncating everything deeper. If no such value exists, bubbles the
/// carry up to depth `i - 1`, recursively.
fn bump_at(filter: &KeyFilter, key: &mut Key, i: usize, forward: bool) -> Result<bool> {
    if key.depth() <= i {
        return if i == 0 { Ok(false) } else { bump_at(filter, key, i - 1, forward) };
    }
    let current = key.segment_at(i)?;
    key.cut(key.depth() - i)?;

    let bumped = match filter.terms().get(i) {
        None | Some(Term::All) => {
            if forward {
                current.successor()
            } else {
                current.predecessor()
            }
        }
        Some(Term::Simple(_)) => None,
        Some(Term::Range(range)) => bump_range(range, &current, forward),
        Some(Term::Or(children)) => bump_or(children, &current, forward),
    };

    match bumped {
        Some(value) => {
            key.append(value);
            Ok(true)
        }
        None => {
            if i == 0 {
                Ok(false)
            } else {
                bump_at(filter, key, i - 1, forward)
            }
        }
    }
}

fn bump_range(range: &RangeTerm, current: &Segment, forward: bool) -> Option<Segment> {
    if forward {
        let next = current.successor()?;
        if !range.is_above(&next) {
            Some(next)
        } else {
            None
        }
    } else {
        let prev = current.predecessor()?;
        if !range.is_below(&prev) {
            Some(prev)
        } else {
            None
        }
    }
}

fn bump_or(children: &[RangeTerm], current: &Segment, forward: bool) -> Option<Segment> {
    let idx = children.iter().position(|c| c.contains(current))?;
    if forward {
        if let Some(next) = current.successor() {
            if !children[idx].is_above(&next) {
                return Some(next);
            }
        }
        children.get(idx + 1).and_then(|c| c.min_value())
    } else {
        if let Some(prev) = current.predecessor() {
            if !children[idx].is_below(&prev) {
                return Some(prev);
            }
        }
        if idx == 0 { None } else { children[idx - 1].max_value() }
    }
}

/// Computes the value to place at a rejecting depth: either the minimal
/// (forward) or maximal (backward) value the term there admits that is
/// still `>= current` (forward) / `<= current` (backward), or a carry if
/// the term admits nothing further in that direction from `current`.
fn fill(term: &Term, current: Option<&Segment>, forward: bool) -> Outcome {
    match term {
        Term::All => unreachable!("ALL never rejects, so fill() is never called for it"),
        Term::Simple(value) => match current {
            None => Outcome::Accept(value.clone()),
            Some(cur) => {
                let admits = if forward { cur < value } else { cur > value };
                if admits { Outcome::Accept(value.clone()) } else { Outcome::Carry }
            }
        },
        Term::Range(range) => match current {
            None => {
                let seed = if forward { range.min_value() } else { range.max_value() };
                seed.map(Outcome::Accept).unwrap_or(Outcome::Carry)
            }
            Some(cur) => {
                if forward {
                    if range.is_below(cur) {
                        range.min_value().map(Outcome::Accept).unwrap_or(Outcome::Carry)
                    } else {
                        Outcome::Carry
                    }
                } else if range.is_above(cur) {
                    range.max_value().map(Outcome::Accept).unwrap_or(Outcome::Carry)
                } else {
                    Outcome::Carry
                }
            }
        },
        Term::Or(children) => match current {
            None => {
                let chosen = if forward { children.first() } else { children.last() };
                chosen
                    .and_then(|c| if forward { c.min_value() } else { c.max_value() })
                    .map(Outcome::Accept)
                    .unwrap_or(Outcome::Carry)
            }
            Some(cur) => {
                if forward {
                    children
                        .iter()
                        .find(|c| !c.is_above(cur))
                        .and_then(|c| c.min_value())
                        .map(Outcome::Accept)
                        .unwrap_or(Outcome::Carry)
                } else {
                    children
                        .iter()
                        .rev()
                        .find(|c| !c.is_below(cur))
                        .and_then(|c| c.max_value())
                        .map(Outcome::Accept)
                        .unwrap_or(Outcome::Carry)
                }
            }
        },
    }
}
