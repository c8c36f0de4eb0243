//! Profile Selector Engine
//!
//! Parsing and autocomplete for profile selectors of the form
//! `profileName{label="value", ...}`. The same code runs natively and as
//! WebAssembly; nothing here does I/O or keeps state between calls.
//!
//! - [`Query::parse`] turns text into a [`Query`], keeping whatever it could
//!   not parse as raw trailing text instead of failing.
//! - [`Query::suggest`] lists what may be typed next.
//!
//! # Example
//!
//! ```rust
//! use profsel_core::{Query, Suggestion};
//!
//! let query = Query::parse(r#"cpu{job="api"}"#);
//! assert_eq!(query.profile_name(), "cpu");
//! assert_eq!(query.to_string(), r#"cpu{job="api"}"#);
//!
//! let next = Query::suggest("{");
//! assert_eq!(next, vec![Suggestion::literal("}"), Suggestion::label_name("")]);
//! ```

pub mod parser;
pub mod query;
pub mod suggest;

// Re-export main types at crate root
pub use parser::{
    parse_table, tokenize, Matcher, MatcherOperator, ParseError, ParseTable, ProfileType, Token,
    TokenKind, PROFILE_NAME_LABEL,
};
pub use query::Query;
pub use suggest::{suggest, Suggestion};
