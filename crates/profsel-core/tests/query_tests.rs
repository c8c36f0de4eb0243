//! End-to-end tests for Query parsing and editing

use pretty_assertions::assert_eq;
use profsel_core::{Matcher, MatcherOperator, Query};

const DELTA_SELECTOR: &str = r#"memory:alloc_objects:count:space:bytes:delta{instance="abc",a"#;
const DELTA_PROFILE: &str = "memory:alloc_objects:count:space:bytes:delta";

/// Every char-boundary prefix of `input`, longest first
fn prefixes(input: &str) -> impl Iterator<Item = &str> {
    let mut ends: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
    ends.push(input.len());
    ends.into_iter().rev().map(move |end| &input[..end])
}

#[test]
fn test_round_trip() {
    let input = r#"memory:inuse_objects:count:space:bytes{instance="abc"}"#;
    assert_eq!(Query::parse(input).to_string(), input);
}

#[test]
fn test_round_trip_normalizes_whitespace() {
    let query = Query::parse(r#"  cpu { job = "api" ,  pod =~ "web .*" } "#);
    assert_eq!(query.to_string(), r#"cpu{job="api",pod=~"web .*"}"#);
}

#[test]
fn test_empty_input() {
    let query = Query::parse("");
    assert!(query.matchers().is_empty());
    assert_eq!(query.raw_trailing_matcher_text(), "");
    assert_eq!(query.profile_name(), "");
}

#[test]
fn test_progressive_truncation_keeps_profile_name() {
    for prefix in prefixes(DELTA_SELECTOR).take_while(|p| p.len() >= DELTA_PROFILE.len()) {
        let query = Query::parse(prefix);
        let remainder = &prefix[DELTA_PROFILE.len()..];
        let expected = remainder.strip_prefix('{').unwrap_or(remainder);

        assert_eq!(query.profile_name(), DELTA_PROFILE, "input: {prefix}");
        assert_eq!(query.matchers_string(), expected, "input: {prefix}");
    }
}

#[test]
fn test_truncated_inside_value() {
    let query = Query::parse(r#"memory:alloc_objects:count:space:bytes:delta{instance="ab"#);
    assert_eq!(query.matchers_string(), r#"instance="ab"#);
    assert!(query.is_partial());
}

#[test]
fn test_idempotent_reparse() {
    let inputs = [
        r#"cpu{a="1",b!="2",c=~"3",d!~"4"}"#,
        r#"{a=""}"#,
        "cpu",
        "{}",
        r#"memory:alloc_space:bytes:space:bytes{service_name="my-app", pod=~"web-.*"}"#,
    ];
    for input in inputs {
        let query = Query::parse(input);
        assert!(!query.is_partial(), "input: {input}");
        assert_eq!(Query::parse(&query.to_string()), query, "input: {input}");
    }
}

#[test]
fn test_round_trip_keeps_name_label() {
    let input = r#"cpu{__name__="mem"}"#;
    let query = Query::parse(input);
    assert_eq!(
        query.matchers(),
        &[Matcher::profile_name("cpu"), Matcher::profile_name("mem")]
    );
    assert_eq!(query.to_string(), input);
    assert_eq!(Query::parse(&query.to_string()), query);
}

#[test]
fn test_round_trip_keeps_trailing_name_label_in_place() {
    let input = r#"{a="1",__name__="cpu"}"#;
    let query = Query::parse(input);
    assert_eq!(query.profile_name(), "");
    assert_eq!(query.to_string(), input);
    assert_eq!(Query::parse(&query.to_string()), query);
}

#[test]
fn test_profile_name_is_leading_matcher() {
    let query = Query::parse(r#"cpu{a="1"}"#);
    assert_eq!(
        query.matchers(),
        &[
            Matcher::profile_name("cpu"),
            Matcher::new("a", MatcherOperator::Equal, "1"),
        ]
    );
}

#[test]
fn test_garbage_without_profile_name() {
    let query = Query::parse("!!!");
    assert!(query.matchers().is_empty());
    assert_eq!(query.raw_trailing_matcher_text(), "!!!");
}

#[test]
fn test_edit_chain() {
    let query = Query::parse(r#"cpu{a="1"}"#);
    let (query, _) = query.set_matcher("b", "2");
    let (query, _) = query.set_profile_name("memory");
    let (query, _) = query.remove_matcher("a");
    assert_eq!(query.to_string(), r#"memory{b="2"}"#);
    assert_eq!(Query::parse(&query.to_string()), query);
}

#[test]
fn test_profile_type_of_parsed_query() {
    let query = Query::parse(DELTA_SELECTOR);
    let profile_type = query.profile_type().unwrap();
    assert_eq!(profile_type.to_string(), DELTA_PROFILE);
    assert!(profile_type.delta);
}
