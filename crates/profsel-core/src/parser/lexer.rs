//! Zero-copy, two-mode lexer for profile selectors
//!
//! `main` mode produces identifiers, operators, punctuation and whitespace
//! runs. A `"` switches to `in-string` mode, where everything up to the next
//! `"` is a single content token. Escapes are not interpreted.
//!
//! Lexing never fails: the iterator simply ends at the first character no
//! rule accepts, leaving the rest of the input for the parser to reject.

use super::token::{LexMode, LexerState, Token, TokenKind};

/// Matcher operators, longest first so `!=` wins over a bare `!`
const OPERATORS: [&str; 4] = ["=~", "!=", "!~", "="];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

/// Zero-copy lexer for selector queries
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    mode: LexMode,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            mode: LexMode::Main,
            done: false,
        }
    }

    /// Current mode and cursor
    pub fn state(&self) -> LexerState {
        LexerState {
            mode: self.mode,
            cursor: self.position,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn take(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let start = self.position;
        self.position += len;
        Token::new(kind, &self.input[start..self.position], start)
    }

    fn take_while(&mut self, kind: TokenKind, pred: impl Fn(char) -> bool) -> Token<'a> {
        let len = self
            .remaining()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.remaining().len());
        self.take(kind, len)
    }

    fn next_main(&mut self, c: char) -> Option<Token<'a>> {
        match c {
            '"' => {
                self.mode = LexMode::InString;
                Some(self.take(TokenKind::StringStart, 1))
            }
            '{' => Some(self.take(TokenKind::OpenBrace, 1)),
            '}' => Some(self.take(TokenKind::CloseBrace, 1)),
            ',' => Some(self.take(TokenKind::Comma, 1)),
            '=' | '!' => {
                let rest = self.remaining();
                let op = OPERATORS.iter().find(|op| rest.starts_with(*op))?;
                Some(self.take(TokenKind::Operator, op.len()))
            }
            _ if c.is_whitespace() => Some(self.take_while(TokenKind::Whitespace, char::is_whitespace)),
            _ if is_ident_start(c) => Some(self.take_while(TokenKind::Identifier, is_ident_continue)),
            _ => None,
        }
    }

    fn next_in_string(&mut self, c: char) -> Token<'a> {
        if c == '"' {
            self.mode = LexMode::Main;
            self.take(TokenKind::StringEnd, 1)
        } else {
            self.take_while(TokenKind::StringContent, |c| c != '"')
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token = match (self.peek_char(), self.mode) {
            (None, _) => None,
            (Some(c), LexMode::Main) => self.next_main(c),
            (Some(c), LexMode::InString) => Some(self.next_in_string(c)),
        };

        if token.is_none() {
            self.done = true;
        }
        token
    }
}

/// Lex the whole input. Total: never fails, possibly stops early.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
