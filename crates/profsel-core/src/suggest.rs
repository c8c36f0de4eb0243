//! Suggestion engine
//!
//! Reads the chart left behind by a parse and reports every token that could
//! legally come next. Each state in the last column that is waiting on a
//! token is one candidate; the rules enclosing it (found through
//! [`ParseTable::wanted_by`]) decide how the candidate is presented.

use serde::Serialize;
use std::fmt;
use tracing::trace;

use crate::parser::{
    parse_table, Node, NonTerminal, ParseTable, StateId, Symbol, Terminal, TokenKind,
};

/// One possible continuation of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Suggestion {
    /// Exact text to insert, such as `{` or `!=`
    Literal { value: String },
    ProfileName { typeahead: String },
    LabelName { typeahead: String },
    LabelValue { typeahead: String },
    MatcherType { typeahead: String },
}

impl Suggestion {
    pub fn literal(value: impl Into<String>) -> Self {
        Suggestion::Literal {
            value: value.into(),
        }
    }

    pub fn profile_name(typeahead: impl Into<String>) -> Self {
        Suggestion::ProfileName {
            typeahead: typeahead.into(),
        }
    }

    pub fn label_name(typeahead: impl Into<String>) -> Self {
        Suggestion::LabelName {
            typeahead: typeahead.into(),
        }
    }

    pub fn label_value(typeahead: impl Into<String>) -> Self {
        Suggestion::LabelValue {
            typeahead: typeahead.into(),
        }
    }

    pub fn matcher_type(typeahead: impl Into<String>) -> Self {
        Suggestion::MatcherType {
            typeahead: typeahead.into(),
        }
    }

    /// The `type` tag this suggestion serialises with
    pub fn kind(&self) -> &'static str {
        match self {
            Suggestion::Literal { .. } => "literal",
            Suggestion::ProfileName { .. } => NonTerminal::ProfileName.name(),
            Suggestion::LabelName { .. } => NonTerminal::LabelName.name(),
            Suggestion::LabelValue { .. } => NonTerminal::LabelValue.name(),
            Suggestion::MatcherType { .. } => NonTerminal::MatcherType.name(),
        }
    }

    /// Literal value or typeahead
    pub fn text(&self) -> &str {
        match self {
            Suggestion::Literal { value } => value,
            Suggestion::ProfileName { typeahead }
            | Suggestion::LabelName { typeahead }
            | Suggestion::LabelValue { typeahead }
            | Suggestion::MatcherType { typeahead } => typeahead,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind(), self.text())
    }
}

/// Insertion-ordered list that drops exact repeats
#[derive(Debug, Default)]
struct Suggestions(Vec<Suggestion>);

impl Suggestions {
    fn push(&mut self, suggestion: Suggestion) {
        if !self.0.contains(&suggestion) {
            self.0.push(suggestion);
        }
    }

    fn into_vec(self) -> Vec<Suggestion> {
        self.0
    }
}

/// `id` followed by the states it was predicted for, innermost first.
/// Follows the first parent at each level and stops on a repeat.
fn state_stack(table: &ParseTable<'_>, id: StateId) -> Vec<StateId> {
    let mut stack = vec![id];
    let mut current = id;
    while let Some(&parent) = table.wanted_by(current).first() {
        if stack.contains(&parent) {
            break;
        }
        stack.push(parent);
        current = parent;
    }
    stack
}

/// Everything that may follow `input`, in discovery order
pub fn suggest(input: &str) -> Vec<Suggestion> {
    let table = parse_table(input);
    let last = table.last_column_index();
    let cursor = table.column(last).lexer.cursor;
    let rest = &input[cursor..];
    let mut out = Suggestions::default();

    // A label name still under the cursor; trailing whitespace ends it.
    if table.is_exhausted() && !input.ends_with(char::is_whitespace) {
        let finished = table
            .completed(last, NonTerminal::LabelName)
            .find_map(|state| match state.data() {
                Some(Node::LabelName(name)) => Some(*name),
                _ => None,
            });
        if let Some(name) = finished {
            out.push(Suggestion::label_name(name));
        }
    }

    for id in table.expectant_states(last) {
        let state = table.state(id);
        let Some(Symbol::Token(terminal)) = state.next_symbol() else {
            continue;
        };

        match terminal {
            Terminal::Literal(value) => {
                if value.starts_with(rest) {
                    out.push(Suggestion::literal(value));
                }
            }
            Terminal::Kind(TokenKind::Identifier) => {
                let stack = state_stack(&table, id);
                let category = stack.iter().map(|&s| table.state(s).lhs()).find(|nt| {
                    matches!(nt, NonTerminal::ProfileName | NonTerminal::LabelName)
                });
                match category {
                    Some(NonTerminal::ProfileName) => out.push(Suggestion::profile_name("")),
                    Some(NonTerminal::LabelName) => out.push(Suggestion::label_name("")),
                    _ => {}
                }
            }
            Terminal::Kind(TokenKind::StringStart) => {
                let stack = state_stack(&table, id);
                let operator = stack
                    .iter()
                    .map(|&s| table.state(s))
                    .find(|s| s.lhs() == NonTerminal::Matcher)
                    .and_then(|s| match s.children() {
                        [Node::LabelName(_), Node::Operator(op)] => Some(*op),
                        _ => None,
                    });
                if let Some(op) = operator {
                    out.push(Suggestion::matcher_type(op.as_str()));
                }
                out.push(Suggestion::label_value(""));
            }
            Terminal::Kind(TokenKind::StringContent) => {
                out.push(Suggestion::label_value("\""));
            }
            Terminal::Kind(TokenKind::StringEnd) => {
                if let [_, Node::Token(content)] = state.children() {
                    out.push(Suggestion::label_value(format!("\"{content}")));
                }
            }
            Terminal::Kind(_) => {}
        }
    }

    let suggestions = out.into_vec();
    trace!(input, rest, count = suggestions.len(), "suggestions computed");
    suggestions
}
