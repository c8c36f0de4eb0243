//! Profile selector parser
//!
//! Table-driven chart parser for the selector language. Parsing never fails:
//! input the grammar rejects simply ends the table early, and callers read
//! whatever was recognised up to that point.
//!
//! # Grammar
//!
//! ```text
//! profileSelector ::= profileName matchers? | matchers
//! matchers        ::= '{' '}' | '{' matcher (',' matcher)* '}'
//! matcher         ::= labelName matcherType labelValue
//! matcherType     ::= '=' | '!=' | '=~' | '!~'
//! labelValue      ::= '"' constant? '"'
//! profileName     ::= ident
//! labelName       ::= ident
//! ident           ::= [A-Za-z_:][A-Za-z0-9_:]*
//! constant        ::= [^"]+
//! ```
//!
//! Whitespace may appear between any two tokens.
//!
//! # Example
//!
//! ```rust
//! use profsel_core::parser::{parse_table, Node};
//!
//! let table = parse_table(r#"cpu{job="api"}"#);
//! assert!(table.is_complete());
//! assert!(matches!(table.result(), Some(Node::Selector(m)) if m.len() == 2));
//! ```

mod ast;
mod chart;
mod grammar;
mod lexer;
mod token;

pub use ast::{Matcher, MatcherOperator, ProfileType, PROFILE_NAME_LABEL};
pub use chart::{parse_table, Column, ParseTable, State, StateId};
pub use grammar::{
    productions_for, Node, NonTerminal, Production, RuleId, Symbol, Terminal, GRAMMAR, START,
};
pub use lexer::{tokenize, Lexer};
pub use token::{LexMode, LexerState, Token, TokenKind};

use thiserror::Error;

/// Errors from the fallible conversions around the selector language.
/// Parsing a selector itself never errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown matcher operator '{0}', expected one of =, !=, =~, !~")]
    UnknownOperator(String),

    #[error("invalid profile type '{input}': {reason}")]
    InvalidProfileType { input: String, reason: String },
}
