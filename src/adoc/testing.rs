//! Test support
//!
//!     Shared helpers for the inline test modules and the integration
//!     tests: one-call lexing/parsing of source snippets, tree lookup by
//!     node kind, and the span-integrity walker backing the "every node
//!     carries both span tokens" property.

use crate::adoc::ast::{AstNode, Document, NodeKind};
use crate::adoc::error::Error;
use crate::adoc::lexer::Lexer;
use crate::adoc::parser::Parser;
use crate::adoc::token::Token;

/// Lex a snippet into its full token stream, EOF/EOD included
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::from_text(input).tokens()
}

/// Parse a snippet that is expected to be a well-formed document
pub fn parse(input: &str) -> Document {
    match Parser::new(Lexer::from_text(input)).parse() {
        Ok(document) => document,
        Err(error) => panic!("expected {:?} to parse, got: {}", input, error),
    }
}

/// Parse a snippet that is expected to fail
pub fn parse_err(input: &str) -> Error {
    match Parser::new(Lexer::from_text(input)).parse() {
        Ok(_) => panic!("expected {:?} to fail to parse", input),
        Err(error) => error,
    }
}

/// First node of the given kind in document order
pub fn find<'a>(root: &'a AstNode, kind: NodeKind) -> Option<&'a AstNode> {
    let mut found = None;
    root.walk(&mut |node, _| {
        if found.is_none() && node.kind == kind {
            found = Some(node);
        }
    });
    found
}

/// All nodes of the given kind in document order
pub fn find_all<'a>(root: &'a AstNode, kind: NodeKind) -> Vec<&'a AstNode> {
    let mut found = Vec::new();
    root.walk(&mut |node, _| {
        if node.kind == kind {
            found.push(node);
        }
    });
    found
}

/// Assert that every node in the tree carries both span tokens and
/// that each span ends at or after it starts
pub fn assert_span_integrity(root: &AstNode) {
    root.walk(&mut |node, ancestors| {
        let path = || {
            let mut names: Vec<&str> = ancestors.iter().map(|a| a.kind.as_str()).collect();
            names.push(node.kind.as_str());
            names.join(" > ")
        };
        let start = node
            .start_token
            .as_ref()
            .unwrap_or_else(|| panic!("missing start token on {}", path()));
        let end = node
            .end_token
            .as_ref()
            .unwrap_or_else(|| panic!("missing end token on {}", path()));
        let ordered = end.line > start.line
            || (end.line == start.line && end.column.start >= start.column.start);
        assert!(
            ordered,
            "span on {} runs backwards: {} .. {}",
            path(),
            start.position(),
            end.position()
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_returns_first_in_document_order() {
        let document = parse("== One\n\nFirst para\n\nSecond para\n");
        let text = find(&document.root, NodeKind::Text).unwrap();
        assert_eq!(text.value, "One");
    }

    #[test]
    fn test_find_all_collects_every_match() {
        let document = parse("== One\n\nA\n\nB\n");
        let paragraphs = find_all(&document.root, NodeKind::Paragraph);
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_span_integrity_on_a_real_parse() {
        let document = parse("== Chapter 1\n\nHello **world** out there\n");
        assert_span_integrity(&document.root);
    }
}
