//! Parser core
//!
//!     The [Parser] owns the token stream produced by the lexer and
//!     exposes the machinery every grammar production is built from:
//!     arbitrary-distance lookahead, expectation-checked consumption, and
//!     the `parse_until` engine driving the inline parselet dispatch
//!     table.
//!
//! Stop Conditions
//!
//!     A stop condition is a set of token-spec sequences matched against
//!     consecutive lookahead. `parse_until` pushes its caller's condition
//!     onto a stack and stops as soon as current lookahead matches ANY
//!     condition anywhere on the stack, not just the top: an inner
//!     production must defer to an unmet outer boundary. That deferral is
//!     what turns `_Hello **world_ foo**` into an "unclosed STRONG"
//!     diagnostic: the emphasis stop is found while the strong closer is
//!     still being looked for. Conditions are popped on every exit path,
//!     errors included.
//!
//! Loop Guard
//!
//!     Every parsing loop is capped at 150 iterations. A trip means a
//!     production failed to consume anything and is a grammar bug, so it
//!     surfaces as the distinct invariant-violation error category, never
//!     as a user-facing parse error.

pub mod elements;
pub mod parselets;
pub mod text;

use std::collections::BTreeMap;

use crate::adoc::ast::{AstNode, Document, NodeKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::lexer::Lexer;
use crate::adoc::token::{Token, TokenKind, TokenSpec};

/// Iteration cap converting infinite-loop grammar bugs into
/// deterministic faults
pub const LOOP_GUARD_LIMIT: usize = 150;

/// One stop condition: sequences of specs against consecutive lookahead
pub type StopSet = Vec<Vec<TokenSpec>>;

/// Recursive-descent parser over a lexed token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    last: Option<Token>,
    stop_stack: Vec<StopSet>,
    class_stack: Vec<Vec<String>>,
    pub(crate) current_chapter: usize,
    pub(crate) id_chapter_locations: BTreeMap<String, usize>,
    pub(crate) epigraphs: Vec<AstNode>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            tokens: lexer.tokens(),
            pos: 0,
            last: None,
            stop_stack: Vec::new(),
            class_stack: Vec::new(),
            current_chapter: 0,
            id_chapter_locations: BTreeMap::new(),
            epigraphs: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    /// Token at lookahead distance `n`; past the end of the stream this
    /// keeps returning the final EOD
    pub fn look_ahead(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub fn current(&self) -> &Token {
        self.look_ahead(0)
    }

    pub fn peek(&self) -> &Token {
        self.look_ahead(1)
    }

    /// The most recently consumed token (used to fix node end spans)
    pub fn previous(&self) -> Token {
        self.last.clone().unwrap_or_else(|| self.current().clone())
    }

    /// Bounded positive lookahead: do the next tokens match the given
    /// spec sequence?
    pub fn peek_tokens(&self, specs: &[TokenSpec]) -> bool {
        specs
            .iter()
            .enumerate()
            .all(|(n, spec)| spec.matches(self.look_ahead(n)))
    }

    /// Like `peek_tokens`, starting at lookahead distance `offset`
    pub fn peek_tokens_at(&self, offset: usize, specs: &[TokenSpec]) -> bool {
        specs
            .iter()
            .enumerate()
            .all(|(n, spec)| spec.matches(self.look_ahead(offset + n)))
    }

    /// True if any of the given spec sequences matches current lookahead
    pub fn peek_tokens_any_of(&self, groups: &[&[TokenSpec]]) -> bool {
        groups.iter().any(|specs| self.peek_tokens(specs))
    }

    // ------------------------------------------------------------------
    // Consumption
    // ------------------------------------------------------------------

    /// Consume the current token unconditionally
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        self.last = Some(token.clone());
        token
    }

    /// Consume the current token, failing unless it matches the spec
    pub fn consume_spec(&mut self, spec: TokenSpec) -> Result<Token> {
        if spec.matches(self.current()) {
            Ok(self.advance())
        } else {
            let current = self.current();
            Err(Error::parse(
                format!(
                    "expected {} but found {}({:?})",
                    spec.describe(),
                    current.kind,
                    current.literal
                ),
                current,
            ))
        }
    }

    pub fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        self.consume_spec(TokenSpec::Kind(kind))
    }

    pub fn consume_lit(&mut self, kind: TokenKind, literal: &'static str) -> Result<Token> {
        self.consume_spec(TokenSpec::Lit(kind, literal))
    }

    /// Consume a sequence of tokens, each checked against its spec
    pub fn consume_many(&mut self, specs: &[TokenSpec]) -> Result<Vec<Token>> {
        specs.iter().map(|spec| self.consume_spec(*spec)).collect()
    }

    /// Consume the current token if it matches; no-op otherwise
    pub fn consume_if(&mut self, spec: TokenSpec) -> Option<Token> {
        if spec.matches(self.current()) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume an expected closing token. On failure the error names the
    /// unclosed node and cites the opening token's position; every
    /// "unclosed X" diagnostic in the parser goes through here.
    pub fn consume_close(
        &mut self,
        spec: TokenSpec,
        kind: NodeKind,
        open: &Token,
    ) -> Result<Token> {
        if spec.matches(self.current()) {
            Ok(self.advance())
        } else {
            let current = self.current().clone();
            Err(Error::parse(
                format!("unclosed {} (opened at {})", kind, open.position()),
                &current,
            ))
        }
    }

    // ------------------------------------------------------------------
    // Stop conditions
    // ------------------------------------------------------------------

    /// True if current lookahead matches any active stop condition,
    /// anywhere on the stack. EOF and EOD are implicit stops everywhere:
    /// no parselet may consume past the end of an input unit, so an
    /// unterminated span fails at its `consume_close` instead.
    pub fn stop_tokens_found(&self) -> bool {
        if matches!(self.current().kind, TokenKind::Eof | TokenKind::Eod) {
            return true;
        }
        self.stop_stack.iter().any(|set| {
            set.iter().any(|specs| self.peek_tokens(specs))
        })
    }

    /// The central inline-content engine: dispatch parselets and append
    /// the produced nodes to `parent` until a stop condition is met.
    ///
    /// The stop set is popped on every exit path, including errors.
    pub fn parse_until(&mut self, parent: &mut AstNode, stops: StopSet) -> Result<()> {
        self.stop_stack.push(stops);
        let result = self.parse_until_inner(parent);
        self.stop_stack.pop();
        result
    }

    fn parse_until_inner(&mut self, parent: &mut AstNode) -> Result<()> {
        let mut guard = 0;
        while !self.stop_tokens_found() {
            guard += 1;
            if guard > LOOP_GUARD_LIMIT {
                return Err(Error::invariant(format!(
                    "runaway loop parsing {} children at {}",
                    parent.kind,
                    self.current().position()
                )));
            }
            let token = self.current().clone();
            let parselet = parselets::dispatch(&token, self).ok_or_else(|| {
                Error::invariant(format!(
                    "no parselet found for {} at {}",
                    token.kind,
                    token.position()
                ))
            })?;
            let node = parselet(self)?;
            // A swallowed trailing newline can leave an empty text node
            let empty_text = node.kind == NodeKind::Text
                && node.value.is_empty()
                && node.children.is_empty();
            if !empty_text {
                parent.children.push(node);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Parse-session state
    // ------------------------------------------------------------------

    pub(crate) fn begin_chapter(&mut self) {
        self.current_chapter += 1;
    }

    /// Register a cross-reference target id for the current chapter
    pub(crate) fn register_id(&mut self, id: &str, token: &Token) -> Result<()> {
        if self.id_chapter_locations.contains_key(id) {
            return Err(Error::parse(format!("duplicate id `{}`", id), token));
        }
        self.id_chapter_locations
            .insert(id.to_string(), self.current_chapter);
        Ok(())
    }

    /// Record that a LINKABLE-BACK xref points at `target`
    pub(crate) fn register_xref_source(&mut self, target: &str) {
        self.id_chapter_locations
            .insert(format!("{}__xref_src", target), self.current_chapter);
    }

    pub(crate) fn push_classes(&mut self, classes: Vec<String>) {
        self.class_stack.push(classes);
    }

    pub(crate) fn pop_classes(&mut self) {
        self.class_stack.pop();
    }

    /// True if any enclosing structural node carries the given class
    pub(crate) fn context_has_class(&self, name: &str) -> bool {
        self.class_stack
            .iter()
            .any(|classes| classes.iter().any(|class| class == name))
    }

    // ------------------------------------------------------------------
    // Entry point
    // ------------------------------------------------------------------

    /// Parse the whole token stream into a document
    pub fn parse(mut self) -> Result<Document> {
        let mut root = AstNode::open(NodeKind::Document, self.current());
        let mut guard = 0;
        loop {
            guard += 1;
            if guard > LOOP_GUARD_LIMIT {
                return Err(Error::invariant(format!(
                    "runaway loop parsing DOCUMENT children at {}",
                    self.current().position()
                )));
            }
            while matches!(
                self.current().kind,
                TokenKind::Eol | TokenKind::DoubleEol
            ) {
                self.advance();
            }
            match self.current().kind {
                TokenKind::Eod => break,
                TokenKind::Eof => {
                    self.advance();
                }
                _ => {
                    let chapter = elements::chapter::parse(&mut self)?;
                    root.children.push(chapter);
                }
            }
        }
        let end = self.previous();
        root.close(&end);
        Ok(Document {
            root,
            epigraphs: std::mem::take(&mut self.epigraphs),
            id_chapter_locations: std::mem::take(&mut self.id_chapter_locations),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::lexer::Lexer;

    fn parser_for(input: &str) -> Parser {
        Parser::new(Lexer::from_text(input))
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let parser = parser_for("a b");
        assert_eq!(parser.look_ahead(0).literal, "a");
        assert_eq!(parser.look_ahead(2).literal, "b");
        assert_eq!(parser.current().literal, "a");
    }

    #[test]
    fn test_lookahead_past_end_is_eod() {
        let parser = parser_for("a");
        assert_eq!(parser.look_ahead(50).kind, TokenKind::Eod);
    }

    #[test]
    fn test_consume_checks_kind() {
        let mut parser = parser_for("a");
        let err = parser.consume(TokenKind::Underscore).unwrap_err();
        assert!(err.message().contains("expected UNDERSCORE"));
        assert!(err.message().contains("TEXT"));
    }

    #[test]
    fn test_consume_checks_literal() {
        let mut parser = parser_for("__x");
        let err = parser
            .consume_lit(TokenKind::Underscore, "_")
            .unwrap_err();
        assert!(err.message().contains("expected UNDERSCORE(\"_\")"));
    }

    #[test]
    fn test_consume_if_is_a_noop_on_mismatch() {
        let mut parser = parser_for("a");
        assert!(parser.consume_if(TokenSpec::Kind(TokenKind::Dot)).is_none());
        assert_eq!(parser.current().literal, "a");
    }

    #[test]
    fn test_consume_many_consumes_in_order() {
        let mut parser = parser_for("[.offset]");
        let tokens = parser
            .consume_many(&[
                TokenSpec::Kind(TokenKind::LeftBracket),
                TokenSpec::Kind(TokenKind::Dot),
                TokenSpec::Kind(TokenKind::Text),
            ])
            .unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].literal, "offset");
        assert_eq!(parser.current().kind, TokenKind::RightBracket);
    }

    #[test]
    fn test_consume_many_fails_at_the_first_mismatch() {
        let mut parser = parser_for("[x]");
        let err = parser
            .consume_many(&[
                TokenSpec::Kind(TokenKind::LeftBracket),
                TokenSpec::Kind(TokenKind::Dot),
            ])
            .unwrap_err();
        assert!(err.message().contains("expected DOT"));
        // The matching prefix is consumed; the offender is left current
        assert_eq!(parser.current().literal, "x");
    }

    #[test]
    fn test_peek_tokens_any_of_matches_alternatives() {
        let parser = parser_for("** bold");
        assert!(parser.peek_tokens_any_of(&[
            &[TokenSpec::Lit(TokenKind::Underscore, "_")],
            &[TokenSpec::Kind(TokenKind::DoubleAsterisk)],
        ]));
        assert!(!parser.peek_tokens_any_of(&[&[TokenSpec::Kind(TokenKind::Dot)]]));
    }

    #[test]
    fn test_peek_tokens_supports_eox() {
        let parser = parser_for("a\n");
        assert!(parser.peek_tokens(&[
            TokenSpec::Kind(TokenKind::Text),
            TokenSpec::Eox,
        ]));
    }

    #[test]
    fn test_stop_conditions_match_anywhere_on_stack() {
        let mut parser = parser_for("x");
        parser.stop_stack.push(vec![vec![TokenSpec::Kind(TokenKind::Text)]]);
        parser.stop_stack.push(vec![vec![TokenSpec::Kind(TokenKind::Dot)]]);
        // Current token matches the OUTER condition, not the top one
        assert!(parser.stop_tokens_found());
    }

    #[test]
    fn test_parse_until_pops_stop_set_on_error() {
        let mut parser = parser_for(".oops\n");
        let mut node = AstNode::new(NodeKind::Paragraph);
        // A line-initial dot is a reserved-grammar fatal
        let result = parser.parse_until(&mut node, vec![vec![TokenSpec::Eox]]);
        assert!(result.is_err());
        assert!(parser.stop_stack.is_empty());
    }

    #[test]
    fn test_duplicate_id_registration_fails() {
        let mut parser = parser_for("x");
        let token = parser.current().clone();
        parser.register_id("note-1", &token).unwrap();
        let err = parser.register_id("note-1", &token).unwrap_err();
        assert!(err.message().contains("duplicate id"));
    }
}
