//! Query: the parsed form of a selector, tolerant of half-typed input

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::parser::{
    parse_table, Matcher, MatcherOperator, Node, NonTerminal, ParseTable, ProfileType,
};
use crate::suggest::{self, Suggestion};

/// A profile name plus label matchers.
///
/// The profile name is stored as a leading `__name__="..."` matcher. Only the
/// first matcher plays that role; a `__name__` matcher anywhere else is an
/// ordinary label. When the input did not fully parse, the matcher text after
/// the recognised profile name is kept verbatim in `raw_trailing_matcher_text`
/// so it can be shown back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    matchers: Vec<Matcher>,
    raw_trailing_matcher_text: String,
}

impl Query {
    pub fn new(matchers: Vec<Matcher>) -> Self {
        Self {
            matchers,
            raw_trailing_matcher_text: String::new(),
        }
    }

    /// Parse a selector. Never fails; unparseable input yields a best-effort
    /// query carrying the unparsed text.
    pub fn parse(input: &str) -> Self {
        let table = parse_table(input);
        match table.result() {
            Some(Node::Selector(matchers)) => Self::new(matchers.clone()),
            _ => Self::recover(&table),
        }
    }

    /// Suggestions for what may follow `input`
    pub fn suggest(input: &str) -> Vec<Suggestion> {
        suggest::suggest(input)
    }

    fn recover(table: &ParseTable<'_>) -> Self {
        let input = table.input();
        let recognised = (0..table.columns().len()).rev().find_map(|column| {
            table
                .completed(column, NonTerminal::ProfileName)
                .find_map(|state| match state.data() {
                    Some(Node::ProfileName(name)) => Some((column, *name)),
                    _ => None,
                })
        });

        match recognised {
            Some((column, name)) => {
                let cursor = table.column(column).lexer.cursor;
                debug!(profile_name = name, cursor, "recovered partial query");
                Self {
                    matchers: vec![Matcher::profile_name(name)],
                    raw_trailing_matcher_text: input[cursor..].to_string(),
                }
            }
            None => Self {
                matchers: Vec::new(),
                raw_trailing_matcher_text: input.to_string(),
            },
        }
    }

    /// All matchers, profile name first when present
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Index of the first label matcher: 1 when a profile name leads
    fn labels_start(&self) -> usize {
        match self.matchers.first() {
            Some(m) if m.is_profile_name() => 1,
            _ => 0,
        }
    }

    /// Matchers other than the leading profile name
    pub fn label_matchers(&self) -> impl Iterator<Item = &Matcher> {
        self.matchers[self.labels_start()..].iter()
    }

    /// The profile name, or `""` when the query has none
    pub fn profile_name(&self) -> &str {
        match self.labels_start() {
            1 => self.matchers[0].value.as_str(),
            _ => "",
        }
    }

    pub fn profile_type(&self) -> Option<ProfileType> {
        self.profile_name().parse().ok()
    }

    pub fn raw_trailing_matcher_text(&self) -> &str {
        &self.raw_trailing_matcher_text
    }

    /// The input did not fully parse and unparsed text is being carried
    pub fn is_partial(&self) -> bool {
        !self.raw_trailing_matcher_text.is_empty()
    }

    /// Body of the matcher block, without braces
    pub fn matchers_string(&self) -> String {
        if self.is_partial() {
            let raw = self.raw_trailing_matcher_text.trim_start();
            return raw.strip_prefix('{').unwrap_or(raw).to_string();
        }
        self.label_matchers()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Set `key="value"`, replacing a matcher on the same key in place.
    /// Returns `false` when that exact matcher is already present.
    pub fn set_matcher(&self, key: &str, value: &str) -> (Query, bool) {
        let matcher = Matcher::new(key, MatcherOperator::Equal, value);
        if self.label_matchers().any(|m| *m == matcher) {
            return (self.clone(), false);
        }

        let start = self.labels_start();
        let mut matchers = self.matchers.clone();
        match matchers[start..].iter_mut().find(|m| m.key == key) {
            Some(existing) => *existing = matcher,
            None => matchers.push(matcher),
        }
        (Query::new(matchers), true)
    }

    /// Replace the profile name; an empty name removes it.
    pub fn set_profile_name(&self, name: &str) -> (Query, bool) {
        if self.profile_name() == name {
            return (self.clone(), false);
        }

        let mut matchers = self.matchers[self.labels_start()..].to_vec();
        if !name.is_empty() {
            matchers.insert(0, Matcher::profile_name(name));
        }
        let query = Query {
            matchers,
            raw_trailing_matcher_text: self.raw_trailing_matcher_text.clone(),
        };
        (query, true)
    }

    /// Drop every label matcher on `key`
    pub fn remove_matcher(&self, key: &str) -> (Query, bool) {
        let start = self.labels_start();
        let matchers: Vec<Matcher> = self.matchers[..start]
            .iter()
            .chain(self.matchers[start..].iter().filter(|m| m.key != key))
            .cloned()
            .collect();
        if matchers.len() == self.matchers.len() {
            return (self.clone(), false);
        }
        let query = Query {
            matchers,
            raw_trailing_matcher_text: self.raw_trailing_matcher_text.clone(),
        };
        (query, true)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.profile_name(), self.matchers_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_complete() {
        let query = Query::parse(r#"cpu{job="api", pod!~"web.*"}"#);
        assert_eq!(query.profile_name(), "cpu");
        assert_eq!(
            query.label_matchers().cloned().collect::<Vec<_>>(),
            vec![
                Matcher::new("job", MatcherOperator::Equal, "api"),
                Matcher::new("pod", MatcherOperator::RegexNotMatch, "web.*"),
            ]
        );
        assert!(!query.is_partial());
        assert_eq!(query.to_string(), r#"cpu{job="api",pod!~"web.*"}"#);
    }

    #[test]
    fn test_parse_without_profile_name() {
        let query = Query::parse(r#"{a="b"}"#);
        assert_eq!(query.profile_name(), "");
        assert_eq!(query.matchers().len(), 1);
        assert_eq!(query.to_string(), r#"{a="b"}"#);
    }

    #[test]
    fn test_parse_empty_value() {
        let query = Query::parse(r#"cpu{a=""}"#);
        assert_eq!(query.matchers()[1].value, "");
    }

    #[test]
    fn test_partial_keeps_raw_text() {
        let query = Query::parse(r#"foo{bar="a"#);
        assert_eq!(query.profile_name(), "foo");
        assert_eq!(query.raw_trailing_matcher_text(), r#"{bar="a"#);
        assert_eq!(query.matchers_string(), r#"bar="a"#);
        assert!(query.is_partial());
    }

    #[test]
    fn test_partial_without_profile_name() {
        let query = Query::parse(r#"{bar="a"#);
        assert!(query.matchers().is_empty());
        assert_eq!(query.raw_trailing_matcher_text(), r#"{bar="a"#);
    }

    #[test]
    fn test_partial_after_whitespace() {
        let query = Query::parse("foo  {ba");
        assert_eq!(query.profile_name(), "foo");
        assert_eq!(query.raw_trailing_matcher_text(), "{ba");
    }

    #[test]
    fn test_set_matcher() {
        let query = Query::parse(r#"cpu{a="1"}"#);

        let (same, changed) = query.set_matcher("a", "1");
        assert!(!changed);
        assert_eq!(same, query);

        let (replaced, changed) = query.set_matcher("a", "2");
        assert!(changed);
        assert_eq!(replaced.to_string(), r#"cpu{a="2"}"#);

        let (added, changed) = query.set_matcher("b", "3");
        assert!(changed);
        assert_eq!(added.to_string(), r#"cpu{a="1",b="3"}"#);
        // the original is untouched
        assert_eq!(query.to_string(), r#"cpu{a="1"}"#);
    }

    #[test]
    fn test_set_matcher_replaces_operator() {
        let query = Query::parse(r#"cpu{a=~"1"}"#);
        let (updated, changed) = query.set_matcher("a", "1");
        assert!(changed);
        assert_eq!(updated.to_string(), r#"cpu{a="1"}"#);
    }

    #[test]
    fn test_set_matcher_drops_partial_text() {
        let query = Query::parse(r#"cpu{a="1"#);
        let (updated, changed) = query.set_matcher("b", "2");
        assert!(changed);
        assert!(!updated.is_partial());
        assert_eq!(updated.to_string(), r#"cpu{b="2"}"#);
    }

    #[test]
    fn test_set_profile_name() {
        let query = Query::parse(r#"{a="1"}"#);
        let (named, changed) = query.set_profile_name("cpu");
        assert!(changed);
        assert_eq!(named.to_string(), r#"cpu{a="1"}"#);
        assert_eq!(named.matchers()[0], Matcher::profile_name("cpu"));

        let (same, changed) = named.set_profile_name("cpu");
        assert!(!changed);
        assert_eq!(same, named);

        let (renamed, _) = named.set_profile_name("memory");
        assert_eq!(renamed.to_string(), r#"memory{a="1"}"#);
    }

    #[test]
    fn test_set_profile_name_keeps_partial_text() {
        let query = Query::parse(r#"cpu{a="1"#);
        let (renamed, changed) = query.set_profile_name("memory");
        assert!(changed);
        assert_eq!(renamed.matchers_string(), r#"a="1"#);
        assert_eq!(renamed.profile_name(), "memory");
    }

    #[test]
    fn test_only_leading_name_matcher_is_profile_name() {
        let query = Query::parse(r#"{a="1",__name__="cpu"}"#);
        assert_eq!(query.profile_name(), "");
        assert_eq!(query.label_matchers().count(), 2);

        let query = Query::parse(r#"cpu{__name__="mem"}"#);
        assert_eq!(query.profile_name(), "cpu");
        assert_eq!(
            query.label_matchers().cloned().collect::<Vec<_>>(),
            vec![Matcher::profile_name("mem")]
        );
    }

    #[test]
    fn test_edits_keep_name_labels() {
        let query = Query::parse(r#"cpu{__name__="mem"}"#);

        let (renamed, _) = query.set_profile_name("alloc");
        assert_eq!(renamed.to_string(), r#"alloc{__name__="mem"}"#);

        let (same, changed) = query.set_matcher("__name__", "mem");
        assert!(!changed);
        assert_eq!(same, query);

        let (removed, changed) = query.remove_matcher("__name__");
        assert!(changed);
        assert_eq!(removed.to_string(), "cpu{}");
    }

    #[test]
    fn test_remove_matcher() {
        let query = Query::parse(r#"cpu{a="1",b="2"}"#);
        let (removed, changed) = query.remove_matcher("a");
        assert!(changed);
        assert_eq!(removed.to_string(), r#"cpu{b="2"}"#);

        let (same, changed) = removed.remove_matcher("zzz");
        assert!(!changed);
        assert_eq!(same, removed);
    }

    #[test]
    fn test_profile_type() {
        let query = Query::parse(r#"memory:inuse_space:bytes:space:bytes{a="b"}"#);
        let pt = query.profile_type().unwrap();
        assert_eq!(pt.sample_type, "inuse_space");
        assert!(!pt.delta);
        assert_eq!(Query::parse("cpu").profile_type(), None);
    }

    #[test]
    fn test_serialize() {
        let query = Query::parse(r#"cpu{a!="b"}"#);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["matchers"][1]["operator"], "!=");
        assert_eq!(json["rawTrailingMatcherText"], "");
    }
}
