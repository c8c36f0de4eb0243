//! Token types for the selector lexer

use std::fmt;

/// Token kinds in the selector language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Bare tokens
    Identifier,
    Operator,

    // String literal pieces
    StringStart,
    StringContent,
    StringEnd,

    // Punctuation
    OpenBrace,
    CloseBrace,
    Comma,

    Whitespace,
}

impl TokenKind {
    /// Punctuation and operators are matched by the grammar on their text,
    /// everything else on its kind.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Operator | TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::Comma
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::StringStart => write!(f, "string start"),
            TokenKind::StringContent => write!(f, "string content"),
            TokenKind::StringEnd => write!(f, "string end"),
            TokenKind::OpenBrace => write!(f, "'{{'"),
            TokenKind::CloseBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// A token with position information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    /// Byte offset just past this token
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Lexical mode: bare tokens or the inside of a quoted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    #[default]
    Main,
    InString,
}

/// Where the lexer stands: its mode and the byte offset it has consumed up to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerState {
    pub mode: LexMode,
    pub cursor: usize,
}

impl LexerState {
    /// State of the lexer right after emitting `token`
    pub fn after(token: &Token<'_>) -> Self {
        let mode = match token.kind {
            TokenKind::StringStart | TokenKind::StringContent => LexMode::InString,
            _ => LexMode::Main,
        };
        Self {
            mode,
            cursor: token.end(),
        }
    }
}
