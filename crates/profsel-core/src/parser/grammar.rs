//! The selector grammar as a static production table
//!
//! ```text
//! profileSelector -> matchers
//!                  | profileName matchers
//!                  | profileName
//! matchers        -> "{" "}"
//!                  | "{" matcherList "}"
//! matcherList     -> matcher
//!                  | matcherList "," matcher
//! matcher         -> labelName matcherType labelValue
//! matcherType     -> "=" | "!=" | "=~" | "!~"
//! labelValue      -> %strstart %constant %strend
//!                  | %strstart %strend
//! profileName     -> %ident
//! labelName       -> %ident
//! ```
//!
//! Alternative order matters to callers: the suggestion engine reports
//! expected symbols in the order the chart parser predicts them.

use std::fmt;

use super::ast::{Matcher, MatcherOperator};
use super::token::{Token, TokenKind};

/// Index of a production in [`GRAMMAR`]
pub type RuleId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    ProfileSelector,
    Matchers,
    MatcherList,
    Matcher,
    MatcherType,
    LabelValue,
    ProfileName,
    LabelName,
}

impl NonTerminal {
    pub const COUNT: usize = 8;

    /// Rule name as it appears in the grammar
    pub fn name(&self) -> &'static str {
        match self {
            NonTerminal::ProfileSelector => "profileSelector",
            NonTerminal::Matchers => "matchers",
            NonTerminal::MatcherList => "matcherList",
            NonTerminal::Matcher => "matcher",
            NonTerminal::MatcherType => "matcherType",
            NonTerminal::LabelValue => "labelValue",
            NonTerminal::ProfileName => "profileName",
            NonTerminal::LabelName => "labelName",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Something a single token can satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Exact punctuation or operator text
    Literal(&'static str),
    /// Any token of a lexical category
    Kind(TokenKind),
}

impl Terminal {
    pub fn matches(&self, token: &Token<'_>) -> bool {
        match self {
            Terminal::Literal(text) => token.kind.is_literal() && token.text == *text,
            Terminal::Kind(kind) => token.kind == *kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Rule(NonTerminal),
    Token(Terminal),
}

/// Data carried by a recognised symbol. Each rule kind has its own variant so
/// postprocessors match on shape instead of probing fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Token(&'a str),
    ProfileName(&'a str),
    LabelName(&'a str),
    Operator(MatcherOperator),
    LabelValue(&'a str),
    Matcher(Matcher),
    MatcherList(Vec<Matcher>),
    Selector(Vec<Matcher>),
}

/// Postprocessor building a completed rule's data from its children
pub type Reduce = for<'a> fn(Vec<Node<'a>>) -> Option<Node<'a>>;

pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: &'static [Symbol],
    pub reduce: Reduce,
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .finish_non_exhaustive()
    }
}

const OPEN_BRACE: Symbol = Symbol::Token(Terminal::Literal("{"));
const CLOSE_BRACE: Symbol = Symbol::Token(Terminal::Literal("}"));
const COMMA: Symbol = Symbol::Token(Terminal::Literal(","));
const IDENT: Symbol = Symbol::Token(Terminal::Kind(TokenKind::Identifier));
const STR_START: Symbol = Symbol::Token(Terminal::Kind(TokenKind::StringStart));
const CONSTANT: Symbol = Symbol::Token(Terminal::Kind(TokenKind::StringContent));
const STR_END: Symbol = Symbol::Token(Terminal::Kind(TokenKind::StringEnd));

const MATCHERS: Symbol = Symbol::Rule(NonTerminal::Matchers);
const MATCHER_LIST: Symbol = Symbol::Rule(NonTerminal::MatcherList);
const MATCHER: Symbol = Symbol::Rule(NonTerminal::Matcher);
const MATCHER_TYPE: Symbol = Symbol::Rule(NonTerminal::MatcherType);
const LABEL_VALUE: Symbol = Symbol::Rule(NonTerminal::LabelValue);
const PROFILE_NAME: Symbol = Symbol::Rule(NonTerminal::ProfileName);
const LABEL_NAME: Symbol = Symbol::Rule(NonTerminal::LabelName);

/// Start symbol
pub const START: NonTerminal = NonTerminal::ProfileSelector;

pub static GRAMMAR: &[Production] = &[
    Production {
        lhs: NonTerminal::ProfileSelector,
        rhs: &[MATCHERS],
        reduce: selector_anonymous,
    },
    Production {
        lhs: NonTerminal::ProfileSelector,
        rhs: &[PROFILE_NAME, MATCHERS],
        reduce: selector_named_with_matchers,
    },
    Production {
        lhs: NonTerminal::ProfileSelector,
        rhs: &[PROFILE_NAME],
        reduce: selector_named,
    },
    Production {
        lhs: NonTerminal::Matchers,
        rhs: &[OPEN_BRACE, CLOSE_BRACE],
        reduce: matchers_empty,
    },
    Production {
        lhs: NonTerminal::Matchers,
        rhs: &[OPEN_BRACE, MATCHER_LIST, CLOSE_BRACE],
        reduce: matchers_braced,
    },
    Production {
        lhs: NonTerminal::MatcherList,
        rhs: &[MATCHER],
        reduce: matcher_list_first,
    },
    Production {
        lhs: NonTerminal::MatcherList,
        rhs: &[MATCHER_LIST, COMMA, MATCHER],
        reduce: matcher_list_append,
    },
    Production {
        lhs: NonTerminal::Matcher,
        rhs: &[LABEL_NAME, MATCHER_TYPE, LABEL_VALUE],
        reduce: matcher,
    },
    Production {
        lhs: NonTerminal::MatcherType,
        rhs: &[Symbol::Token(Terminal::Literal("="))],
        reduce: matcher_type,
    },
    Production {
        lhs: NonTerminal::MatcherType,
        rhs: &[Symbol::Token(Terminal::Literal("!="))],
        reduce: matcher_type,
    },
    Production {
        lhs: NonTerminal::MatcherType,
        rhs: &[Symbol::Token(Terminal::Literal("=~"))],
        reduce: matcher_type,
    },
    Production {
        lhs: NonTerminal::MatcherType,
        rhs: &[Symbol::Token(Terminal::Literal("!~"))],
        reduce: matcher_type,
    },
    Production {
        lhs: NonTerminal::LabelValue,
        rhs: &[STR_START, CONSTANT, STR_END],
        reduce: label_value,
    },
    Production {
        lhs: NonTerminal::LabelValue,
        rhs: &[STR_START, STR_END],
        reduce: label_value_empty,
    },
    Production {
        lhs: NonTerminal::ProfileName,
        rhs: &[IDENT],
        reduce: profile_name,
    },
    Production {
        lhs: NonTerminal::LabelName,
        rhs: &[IDENT],
        reduce: label_name,
    },
];

/// Productions whose left-hand side is `nt`, in table order
pub fn productions_for(nt: NonTerminal) -> impl Iterator<Item = (RuleId, &'static Production)> {
    GRAMMAR
        .iter()
        .enumerate()
        .filter(move |(_, p)| p.lhs == nt)
}

fn selector_anonymous(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::MatcherList(matchers)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::Selector(matchers))
}

fn selector_named_with_matchers(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::ProfileName(name), Node::MatcherList(matchers)] =
        <[Node; 2]>::try_from(children).ok()?
    else {
        return None;
    };
    let mut all = Vec::with_capacity(matchers.len() + 1);
    all.push(Matcher::profile_name(name));
    all.extend(matchers);
    Some(Node::Selector(all))
}

fn selector_named(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::ProfileName(name)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::Selector(vec![Matcher::profile_name(name)]))
}

fn matchers_empty(_children: Vec<Node<'_>>) -> Option<Node<'_>> {
    Some(Node::MatcherList(Vec::new()))
}

fn matchers_braced(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [_, Node::MatcherList(matchers), _] = <[Node; 3]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::MatcherList(matchers))
}

fn matcher_list_first(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::Matcher(matcher)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::MatcherList(vec![matcher]))
}

fn matcher_list_append(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::MatcherList(mut matchers), _, Node::Matcher(matcher)] =
        <[Node; 3]>::try_from(children).ok()?
    else {
        return None;
    };
    matchers.push(matcher);
    Some(Node::MatcherList(matchers))
}

fn matcher(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::LabelName(key), Node::Operator(operator), Node::LabelValue(value)] =
        <[Node; 3]>::try_from(children).ok()?
    else {
        return None;
    };
    Some(Node::Matcher(Matcher::new(key, operator, value)))
}

fn matcher_type(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::Token(text)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    text.parse().ok().map(Node::Operator)
}

fn label_value(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [_, Node::Token(content), _] = <[Node; 3]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::LabelValue(content))
}

fn label_value_empty(_children: Vec<Node<'_>>) -> Option<Node<'_>> {
    Some(Node::LabelValue(""))
}

fn profile_name(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::Token(text)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::ProfileName(text))
}

fn label_name(children: Vec<Node<'_>>) -> Option<Node<'_>> {
    let [Node::Token(text)] = <[Node; 1]>::try_from(children).ok()? else {
        return None;
    };
    Some(Node::LabelName(text))
}
