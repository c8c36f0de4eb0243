//! Malformed input must never panic

use profsel_core::{tokenize, Query};

const INPUTS: &[&str] = &[
    "",
    " ",
    "\"",
    "\"\"\"",
    "{",
    "}",
    "{{",
    "}}{{",
    ",,,",
    "{,}",
    "{=}",
    "{a}",
    "{a=}",
    "{=\"x\"}",
    "{a=\"}",
    "{a=\"x\"",
    "{a==\"x\"}",
    "{a=!\"x\"}",
    "{a=\"x\",}",
    "{a=\"x\"}}",
    "cpu{a=\"x\"}cpu",
    "cpu cpu",
    "!",
    "~",
    "=~!~!=",
    "{a=\"\\\"\"}",
    "{a=\"x\\",
    "héllo",
    "{é=\"x\"}",
    "{a=\"日本語\"}",
    "{a=\"日本",
    "\u{0}\u{1}\u{7f}",
    "\t\n{\ra\n=\t\"x\"\n}",
    "::::{::=\"::\"}",
    "0cpu",
    "{0a=\"x\"}",
];

fn prefixes(input: &str) -> impl Iterator<Item = &str> {
    input
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(input.len()))
        .map(move |end| &input[..end])
}

#[test]
fn test_parse_never_panics() {
    for input in INPUTS {
        for prefix in prefixes(input) {
            let query = Query::parse(prefix);
            let _ = query.to_string();
            let _ = query.matchers_string();
        }
    }
}

#[test]
fn test_suggest_never_panics() {
    for input in INPUTS {
        for prefix in prefixes(input) {
            let _ = Query::suggest(prefix);
        }
    }
}

#[test]
fn test_tokens_cover_a_prefix() {
    for input in INPUTS {
        let tokens = tokenize(input);
        let mut expected_offset = 0;
        for token in &tokens {
            assert_eq!(token.offset, expected_offset, "gap in tokens of {input:?}");
            assert_eq!(&input[token.offset..token.end()], token.text);
            expected_offset = token.end();
        }
        assert!(expected_offset <= input.len());
    }
}

#[test]
fn test_parse_of_unparsed_text_is_kept_verbatim() {
    for input in INPUTS {
        let query = Query::parse(input);
        if query.is_partial() {
            assert!(input.ends_with(query.raw_trailing_matcher_text()), "{input:?}");
        }
    }
}
