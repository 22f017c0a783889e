// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use std::fmt::Write as _;

use super::term::{RangeTerm, Term};
use super::KeyFilter;
use crate::segment::Segment;

/// Renders a [`KeyFilter`] back to the text grammar parsed by
/// [`super::parse::parse`]. Always produces the canonical form: brackets
/// are emitted only when a range is not fully inclusive on both sides, so
/// that `parse(to_string(f)) == f` for every filter this crate builds.
pub fn to_string(filter: &KeyFilter) -> String {
    let mut out = String::from("{");
    for (i, term) in filter.terms().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_term(&mut out, term);
    }
    if filter.has_wildcard_tail() {
        if !filter.terms().is_empty() {
            out.push(',');
        }
        out.push_str("*<");
    }
    out.push('}');

    let default_min = filter.terms().len();
    let default_max = if filter.has_wildcard_tail() { usize::MAX } else { filter.terms().len() };
    if filter.min_depth() != default_min || filter.max_depth() != default_max {
        let _ = write!(out, ".limit({},{})", filter.min_depth(), filter.max_depth());
    }

    out
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::All => out.push('*'),
        Term::Simple(value) => write_literal(out, value),
        Term::Range(range) => write_range(out, range),
        Term::Or(children) => {
            out.push('{');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_range(out, child);
            }
            out.push('}');
        }
    }
}

fn write_range(out: &mut String, range: &RangeTerm) {
    let bare = range.lo_inclusive && range.hi_inclusive;
    if !bare {
        out.push(if range.lo_inclusive { '[' } else { '(' });
    }
    if let Some(lo) = &range.lo {
        write_literal(out, lo);
    }
    out.push(':');
    if let Some(hi) = &range.hi {
        write_literal(out, hi);
    }
    if !bare {
        out.push(if range.hi_inclusive { ']' } else { ')' });
    }
}

fn write_literal(out: &mut String, value: &Segment) {
    match value {
        Segment::Str(s) => write_quoted(out, s),
        Segment::Int(v) => {
            let _ = write!(out, "{v}");
        }
        Segment::UInt(v) => {
            let _ = write!(out, "(uint){v}");
        }
        Segment::Float(v) => {
            let _ = write!(out, "(float){v}");
        }
        Segment::Boolean(v) => {
            let _ = write!(out, "(bool){v}");
        }
        Segment::Bytes(bytes) => {
            out.push_str("(bytes)");
            for byte in bytes {
                let _ = write!(out, "{byte:02x}");
            }
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0}' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse::parse;
    use crate::filter::term::RangeTerm;

    fn roundtrip(filter: KeyFilter) {
        let text = to_string(&filter);
        let parsed = parse(&text).unwrap_or_else(|e| panic!("failed to reparse {text:?}: {e}"));
        assert_eq!(parsed, filter, "round trip mismatch for {text:?}");
    }

    #[test]
    fn simple_and_range_round_trip() {
        let filter = KeyFilter::new(
            vec![
                Term::Simple(Segment::Str("atlantic".into())),
                Term::Simple(Segment::Float(1.3)),
                Term::Range(RangeTerm::new(
                    Some(Segment::Str("x".into())),
                    Some(Segment::Str("z".into())),
                    true,
                    true,
                )),
                Term::Or(vec![
                    RangeTerm::new(Some(Segment::Int(100)), Some(Segment::Int(150)), true, true),
                    RangeTerm::new(Some(Segment::Int(200)), Some(Segment::Int(250)), true, true),
                    RangeTerm::new(Some(Segment::Int(300)), Some(Segment::Int(350)), true, false),
                ]),
            ],
            true,
        )
        .limit(2, 5);
        roundtrip(filter);
    }

    #[test]
    fn all_wildcard_round_trips() {
        roundtrip(KeyFilter::all());
    }

    #[test]
    fn quoted_string_with_escapes_round_trips() {
        let filter = KeyFilter::new(vec![Term::Simple(Segment::Str("a\"b\\c".into()))], false);
        roundtrip(filter);
    }
}
