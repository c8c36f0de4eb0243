//! Incremental chart (Earley) parser
//!
//! The table keeps every state in one arena and gives each input position a
//! [`Column`] of state ids. Columns are only ever appended; a column is never
//! touched again once a later one exists, apart from the last column's
//! cursor moving over whitespace.
//!
//! Parent links are recorded per column: when a state asks for a nonterminal
//! it is appended to that column's wants list, and every state predicted for
//! that nonterminal in that column is wanted by exactly that list. Walking
//! from a state to the rules that enclose it is therefore an index lookup.

use tracing::trace;

use super::grammar::{self, Node, NonTerminal, Production, RuleId, Symbol, GRAMMAR, START};
use super::lexer::Lexer;
use super::token::{LexerState, Token, TokenKind};

/// Index of a state in the table's arena
pub type StateId = usize;

/// One Earley item: a production, how much of it has been recognised, and
/// the column it started in
#[derive(Debug, Clone)]
pub struct State<'a> {
    pub rule: RuleId,
    pub dot: usize,
    pub origin: usize,
    children: Vec<Node<'a>>,
    data: Option<Node<'a>>,
}

impl<'a> State<'a> {
    fn predicted(rule: RuleId, origin: usize) -> Self {
        Self {
            rule,
            dot: 0,
            origin,
            children: Vec::new(),
            data: None,
        }
    }

    pub fn production(&self) -> &'static Production {
        &GRAMMAR[self.rule]
    }

    pub fn lhs(&self) -> NonTerminal {
        self.production().lhs
    }

    /// Symbol right after the dot, `None` once complete
    pub fn next_symbol(&self) -> Option<Symbol> {
        self.production().rhs.get(self.dot).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.dot == self.production().rhs.len()
    }

    /// Data of the symbols recognised so far
    pub fn children(&self) -> &[Node<'a>] {
        &self.children
    }

    /// Data built by the rule's postprocessor; only set on complete states
    pub fn data(&self) -> Option<&Node<'a>> {
        self.data.as_ref()
    }

    fn advance(&self, child: Node<'a>) -> Self {
        let mut children = self.children.clone();
        children.push(child);
        let mut next = Self {
            rule: self.rule,
            dot: self.dot + 1,
            origin: self.origin,
            children,
            data: None,
        };
        if next.is_complete() {
            next.data = (next.production().reduce)(next.children.clone());
        }
        next
    }
}

/// States active at one input position, plus where the lexer stood there
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub lexer: LexerState,
    states: Vec<StateId>,
    wants: [Vec<StateId>; NonTerminal::COUNT],
}

impl Column {
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// States in this column waiting on `nt`
    pub fn wants(&self, nt: NonTerminal) -> &[StateId] {
        &self.wants[nt.index()]
    }
}

/// Chart of one parse. Built fresh for every input and never shared.
#[derive(Debug, Clone)]
pub struct ParseTable<'a> {
    input: &'a str,
    states: Vec<State<'a>>,
    columns: Vec<Column>,
    rejected_at: Option<usize>,
}

impl<'a> ParseTable<'a> {
    /// Table with column 0 seeded from the start rule
    pub fn new(input: &'a str) -> Self {
        let mut table = Self {
            input,
            states: Vec::new(),
            columns: vec![Column::default()],
            rejected_at: None,
        };
        for (rule, _) in grammar::productions_for(START) {
            table.push_state(0, State::predicted(rule, 0));
        }
        table.close(0);
        table
    }

    /// Consume tokens, one column each. Stops quietly at the first token no
    /// state can accept; the table then ends at the last good column.
    pub fn feed<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        for token in tokens {
            if token.kind == TokenKind::Whitespace {
                self.last_column_mut().lexer = LexerState::after(&token);
                continue;
            }
            if !self.scan(token) {
                trace!(
                    offset = token.offset,
                    kind = %token.kind,
                    text = token.text,
                    "token rejected"
                );
                self.rejected_at = Some(token.offset);
                break;
            }
        }
        self
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn last_column_index(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn last_column(&self) -> &Column {
        &self.columns[self.last_column_index()]
    }

    fn last_column_mut(&mut self) -> &mut Column {
        let last = self.last_column_index();
        &mut self.columns[last]
    }

    pub fn state(&self, id: StateId) -> &State<'a> {
        &self.states[id]
    }

    /// States in `column` whose next symbol is a token
    pub fn expectant_states(&self, column: usize) -> impl Iterator<Item = StateId> + '_ {
        self.columns[column]
            .states
            .iter()
            .copied()
            .filter(move |&id| matches!(self.states[id].next_symbol(), Some(Symbol::Token(_))))
    }

    /// Complete states for `nt` that end in `column`
    pub fn completed(&self, column: usize, nt: NonTerminal) -> impl Iterator<Item = &State<'a>> + '_ {
        self.columns[column]
            .states
            .iter()
            .map(move |&id| &self.states[id])
            .filter(move |s| s.is_complete() && s.lhs() == nt)
    }

    /// States that predicted `id`'s rule. Empty for the start rule.
    pub fn wanted_by(&self, id: StateId) -> &[StateId] {
        let state = &self.states[id];
        self.columns[state.origin].wants(state.lhs())
    }

    /// Byte offset of the token that stopped the parse, if any
    pub fn rejected_at(&self) -> Option<usize> {
        self.rejected_at
    }

    /// Every byte of input was lexed and accepted
    pub fn is_exhausted(&self) -> bool {
        self.rejected_at.is_none() && self.last_column().lexer.cursor == self.input.len()
    }

    /// The whole input derives the start rule
    pub fn is_complete(&self) -> bool {
        self.result().is_some()
    }

    /// Data of the completed start rule when the parse is total
    pub fn result(&self) -> Option<&Node<'a>> {
        if !self.is_exhausted() {
            return None;
        }
        self.completed(self.last_column_index(), START)
            .find(|s| s.origin == 0)
            .and_then(State::data)
    }

    fn push_state(&mut self, column: usize, state: State<'a>) -> StateId {
        let id = self.states.len();
        self.states.push(state);
        self.columns[column].states.push(id);
        id
    }

    fn scan(&mut self, token: Token<'a>) -> bool {
        let last = self.last_column_index();
        let scanned: Vec<State<'a>> = self.columns[last]
            .states
            .iter()
            .map(|&id| &self.states[id])
            .filter(|s| matches!(s.next_symbol(), Some(Symbol::Token(t)) if t.matches(&token)))
            .map(|s| s.advance(Node::Token(token.text)))
            .collect();
        if scanned.is_empty() {
            return false;
        }

        let index = self.columns.len();
        self.columns.push(Column {
            lexer: LexerState::after(&token),
            ..Column::default()
        });
        for state in scanned {
            self.push_state(index, state);
        }
        self.close(index);
        true
    }

    /// Predict and complete until the column stops growing
    fn close(&mut self, column: usize) {
        let mut i = 0;
        while i < self.columns[column].states.len() {
            let id = self.columns[column].states[i];
            i += 1;

            let state = &self.states[id];
            if state.is_complete() {
                self.complete(column, id);
            } else if let Some(Symbol::Rule(nt)) = state.next_symbol() {
                self.predict(column, id, nt);
            }
        }
    }

    fn predict(&mut self, column: usize, id: StateId, nt: NonTerminal) {
        let wants = &mut self.columns[column].wants[nt.index()];
        let first = wants.is_empty();
        wants.push(id);
        if first {
            for (rule, _) in grammar::productions_for(nt) {
                self.push_state(column, State::predicted(rule, column));
            }
        }
    }

    fn complete(&mut self, column: usize, id: StateId) {
        let state = &self.states[id];
        let Some(data) = state.data.clone() else {
            return;
        };
        let parents = self.columns[state.origin].wants(state.lhs()).to_vec();
        for parent in parents {
            let advanced = self.states[parent].advance(data.clone());
            self.push_state(column, advanced);
        }
    }
}

/// Lex and parse `input` in one go
pub fn parse_table(input: &str) -> ParseTable<'_> {
    ParseTable::new(input).feed(Lexer::new(input))
}
