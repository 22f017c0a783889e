// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use super::term::{RangeTerm, Term};
use super::KeyFilter;
use crate::error::Error;
use crate::segment::Segment;

type PResult<T> = std::result::Result<T, usize>;

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser { chars: input.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, want: char) -> PResult<()> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.pos)
        }
    }

    fn parse_filter(&mut self) -> PResult<KeyFilter> {
        self.expect('{')?;
        let mut terms = Vec::new();
        let mut wildcard_tail = false;

        if self.peek() != Some('}') {
            loop {
                if self.peek() == Some('*') && self.peek_at(1) == Some('<') {
                    self.pos += 2;
                    wildcard_tail = true;
                    break;
                }
                terms.push(self.parse_term()?);
                match self.peek() {
                    Some(',') => {
                        self.bump();
                    }
                    _ => break,
                }
            }
        }
        self.expect('}')?;

        let mut filter = KeyFilter::new(terms, wildcard_tail);

        if self.peek() == Some('.') {
            filter = self.parse_limit_suffix(filter)?;
        }

        if self.pos != self.chars.len() {
            return Err(self.pos);
        }

        Ok(filter)
    }

    fn parse_limit_suffix(&mut self, filter: KeyFilter) -> PResult<KeyFilter> {
        self.expect('.')?;
        for want in "limit(".chars() {
            self.expect(want)?;
        }
        let min = self.parse_digits()?;
        self.expect(',')?;
        let max = self.parse_digits()?;
        self.expect(')')?;
        Ok(filter.limit(min, max))
    }

    fn parse_digits(&mut self) -> PResult<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == start {
            return Err(start);
        }
        self.chars[start..self.pos].iter().collect::<String>().parse().map_err(|_| start)
    }

    fn parse_term(&mut self) -> PResult<Term> {
        match self.peek() {
            Some('*') => {
                self.bump();
                Ok(Term::All)
            }
            Some('{') => self.parse_or_term(),
            _ => {
                let (range, is_point) = self.parse_range_term()?;
                if is_point {
                    Ok(Term::Simple(range.lo.expect("point range always has lo")))
                } else {
                    Ok(Term::Range(range))
                }
            }
        }
    }

    fn parse_or_term(&mut self) -> PResult<Term> {
        self.expect('{')?;
        let mut children = Vec::new();
        loop {
            let (range, _is_point) = self.parse_range_term()?;
            children.push(range);
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.pos),
            }
        }
        children.sort_by(|a, b| a.lo.cmp(&b.lo));
        Ok(Term::Or(children))
    }

    /// Parses `bound [':' bound]`, returning the range plus whether no
    /// `:` was seen at all (a bare literal acting as a single point).
    fn parse_range_term(&mut self) -> PResult<(RangeTerm, bool)> {
        let lo_bracket = match self.peek() {
            Some('[') => {
                self.bump();
                Some(true)
            }
            Some('(') => {
                self.bump();
                Some(false)
            }
            _ => None,
        };

        let lo = if self.peek() == Some(':') { None } else { Some(self.parse_literal()?) };

        if self.peek() != Some(':') {
            if lo_bracket.is_some() {
                return Err(self.pos);
            }
            let value = lo.ok_or(self.pos)?;
            return Ok((RangeTerm::point(value), true));
        }
        self.bump();

        let hi = match self.peek() {
            Some(',') | Some('}') | None => None,
            _ => Some(self.parse_literal()?),
        };

        let hi_bracket = match self.peek() {
            Some(']') => {
                self.bump();
                Some(true)
            }
            Some(')') => {
                self.bump();
                Some(false)
            }
            _ => None,
        };

        Ok((
            RangeTerm::new(lo, hi, lo_bracket.unwrap_or(true), hi_bracket.unwrap_or(true)),
            false,
        ))
    }

    fn parse_literal(&mut self) -> PResult<Segment> {
        match self.peek() {
            Some('(') => self.parse_typed_literal(),
            Some('"') => Ok(Segment::Str(self.parse_quoted_string()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => {
                Ok(Segment::Int(self.parse_signed_integer()?))
            }
            _ => Err(self.pos),
        }
    }

    fn parse_typed_literal(&mut self) -> PResult<Segment> {
        self.expect('(')?;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != ')') {
            self.bump();
        }
        let ty: String = self.chars[start..self.pos].iter().collect();
        self.expect(')')?;

        match ty.as_str() {
            "bool" => self.parse_keyword_bool(),
            "int" => Ok(Segment::Int(self.parse_signed_integer()?)),
            "uint" => Ok(Segment::UInt(self.parse_unsigned_integer()?)),
            "float" => Ok(Segment::Float(self.parse_float()?)),
            "string" => Ok(Segment::Str(self.parse_quoted_string()?)),
            "bytes" => Ok(Segment::Bytes(self.parse_hex_bytes()?)),
            _ => Err(start),
        }
    }

    fn parse_keyword_bool(&mut self) -> PResult<Segment> {
        if self.chars[self.pos..].starts_with(&['t', 'r', 'u', 'e']) {
            self.pos += 4;
            Ok(Segment::Boolean(true))
        } else if self.chars[self.pos..].starts_with(&['f', 'a', 'l', 's', 'e']) {
            self.pos += 5;
            Ok(Segment::Boolean(false))
        } else {
            Err(self.pos)
        }
    }

    fn parse_signed_integer(&mut self) -> PResult<i64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == digits_start {
            return Err(start);
        }
        self.chars[start..self.pos].iter().collect::<String>().parse().map_err(|_| start)
    }

    fn parse_unsigned_integer(&mut self) -> PResult<u64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == start {
            return Err(start);
        }
        self.chars[start..self.pos].iter().collect::<String>().parse().map_err(|_| start)
    }

    fn parse_float(&mut self) -> PResult<f64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut saw_digit = false;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            saw_digit = true;
        }
        if self.peek() == Some('.') {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
                saw_digit = true;
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if !saw_digit {
            return Err(start);
        }
        self.chars[start..self.pos].iter().collect::<String>().parse().map_err(|_| start)
    }

    fn parse_quoted_string(&mut self) -> PResult<String> {
        let start = self.pos;
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\u{0}'),
                    Some('x') => {
                        let escape_pos = self.pos - 2;
                        let hi = self.bump().filter(char::is_ascii_hexdigit).ok_or(escape_pos)?;
                        let lo = self.bump().filter(char::is_ascii_hexdigit).ok_or(escape_pos)?;
                        let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).map_err(|_| escape_pos)?;
                        out.push(byte as char);
                    }
                    _ => return Err(self.pos - 1),
                },
                Some(c) => out.push(c),
                None => return Err(start),
            }
        }
    }

    fn parse_hex_bytes(&mut self) -> PResult<Vec<u8>> {
        let start = self.pos;
        let mut bytes = Vec::new();
        loop {
            let hi = match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => c,
                _ => break,
            };
            self.bump();
            let lo = match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => c,
                _ => return Err(self.pos),
            };
            self.bump();
            let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).map_err(|_| start)?;
            bytes.push(byte);
        }
        Ok(bytes)
    }
}

/// Parses the text grammar into a [`KeyFilter`], per §4.2/§6: typed
/// literals, quoted strings, independently-bracketed ranges, `{...}` OR
/// lists, `*` wildcards, a trailing `*<` wildcard-tail marker, and an
/// optional `.limit(min,max)` suffix.
pub fn parse(input: &str) -> crate::error::Result<KeyFilter> {
    let mut parser = Parser::new(input);
    parser.parse_filter().map_err(Error::FilterSyntax)
}

/// The external, validate-only contract: returns `-1` on success, or the
/// zero-based index of the first offending character.
pub fn parse_key_filter_string(input: &str) -> isize {
    match parse(input) {
        Ok(_) => -1,
        Err(Error::FilterSyntax(i)) => i as isize,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::term::RangeTerm;

    #[test]
    fn parses_simple_and_range_terms() {
        let filter = parse(r#"{"atlantic",(float)1.3,"x":"z",{100:150,200:250,[300:350)},*<}"#)
            .unwrap();
        assert_eq!(filter.terms().len(), 4);
        assert!(matches!(filter.terms()[0], Term::Simple(Segment::Str(ref s)) if s == "atlantic"));
        assert!(matches!(filter.terms()[1], Term::Simple(Segment::Float(v)) if v == 1.3));
        assert!(matches!(filter.terms()[2], Term::Range(_)));
        assert!(matches!(filter.terms()[3], Term::Or(ref children) if children.len() == 3));
        assert!(filter.has_wildcard_tail());
    }

    #[test]
    fn parses_limit_suffix() {
        let filter = parse(r#"{"a"}.limit(2,5)"#).unwrap();
        assert_eq!(filter.min_depth(), 2);
        assert_eq!(filter.max_depth(), 5);
    }

    #[test]
    fn reports_first_bad_character() {
        let idx = parse_key_filter_string(r#"{"a",}"#);
        assert!(idx >= 0);
    }

    #[test]
    fn valid_filter_reports_negative_one() {
        assert_eq!(parse_key_filter_string(r#"{"a"}"#), -1);
    }

    #[test]
    fn range_bound_brackets_are_independent() {
        let (range, is_point) = Parser::new("[300:350)").parse_range_term().unwrap();
        assert!(!is_point);
        let expected = RangeTerm::new(Some(Segment::Int(300)), Some(Segment::Int(350)), true, false);
        assert_eq!(range, expected);
    }

    #[test]
    fn quoted_string_supports_hex_escape() {
        let filter = parse(r#"{"a\x41b"}"#).unwrap();
        assert!(matches!(filter.terms()[0], Term::Simple(Segment::Str(ref s)) if s == "aAb"));
    }
}
