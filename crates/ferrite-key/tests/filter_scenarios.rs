// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use ferrite_key::{parse, Key, Segment};

fn key_of(segments: Vec<Segment>) -> Key {
    let mut key = Key::new();
    for segment in segments {
        key.append(segment);
    }
    key
}

#[test]
fn atlantic_filter_selects_expected_keys() {
    let filter = parse(r#"{"atlantic",(float)1.3,"x":"z",{100:150,200:250,[300:350)},*<}"#)
        .unwrap()
        .limit(2, 5);

    let selected = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("y".into()),
    ]);
    assert!(filter.selected(&selected).unwrap());

    let wrong_first = key_of(vec![Segment::Str("w".into())]);
    assert!(!filter.selected(&wrong_first).unwrap());

    let deeper_mismatch = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("z0".into()),
    ]);
    assert!(!filter.selected(&deeper_mismatch).unwrap());

    let in_or_range = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(125),
    ]);
    assert!(filter.selected(&in_or_range).unwrap());

    let outside_or_range = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(175),
    ]);
    assert!(!filter.selected(&outside_or_range).unwrap());

    let within_tail = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(200),
        Segment::Str("tom".into()),
    ]);
    assert!(filter.selected(&within_tail).unwrap());

    let past_max_depth = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(200),
        Segment::Str("tom".into()),
        Segment::Str("dick".into()),
    ]);
    assert!(!filter.selected(&past_max_depth).unwrap());
}

#[test]
fn half_open_range_boundaries() {
    let filter = parse(r#"{"atlantic",(float)1.3,"x":"z",{100:150,200:250,[300:350)},*<}"#)
        .unwrap()
        .limit(2, 5);

    let below = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(299),
    ]);
    assert!(!filter.selected(&below).unwrap());

    let at_lo = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(300),
    ]);
    assert!(filter.selected(&at_lo).unwrap());

    let at_hi = key_of(vec![
        Segment::Str("atlantic".into()),
        Segment::Float(1.3),
        Segment::Str("x".into()),
        Segment::Int(350),
    ]);
    assert!(!filter.selected(&at_hi).unwrap());
}

#[test]
fn or_filter_traversal_matches_linear_scan() {
    let filter = parse("{[10:20),[50:60),(80:90]}").unwrap();

    let expected: Vec<i64> = (10..20).chain(50..60).chain(81..=90).collect();

    let mut forward = Vec::new();
    let mut cursor = 0i64;
    while cursor < 100 {
        let mut key = key_of(vec![Segment::Int(cursor)]);
        let hit = if filter.selected(&key).unwrap() { true } else { filter.traverse(&mut key, true).unwrap() };
        if !hit {
            break;
        }
        let Segment::Int(v) = key.segment_at(0).unwrap() else { unreachable!() };
        forward.push(v);
        cursor = v + 1;
    }
    assert_eq!(forward, expected);

    let mut backward = Vec::new();
    let mut cursor = 99i64;
    loop {
        let mut key = key_of(vec![Segment::Int(cursor)]);
        let hit = if filter.selected(&key).unwrap() { true } else { filter.traverse(&mut key, false).unwrap() };
        if hit {
            let Segment::Int(v) = key.segment_at(0).unwrap() else { unreachable!() };
            backward.push(v);
            if v == 0 {
                break;
            }
            cursor = v - 1;
        } else if cursor == 0 {
            break;
        } else {
            cursor -= 1;
        }
        if cursor < 0 {
            break;
        }
    }
    let mut expected_rev = expected.clone();
    expected_rev.reverse();
    assert_eq!(backward, expected_rev);
}
