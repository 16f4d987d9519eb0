//! The text parselet
//!
//!     Greedily folds consecutive prose tokens into one TEXT node.
//!     Whitespace runs collapse to a single space, and a mid-paragraph
//!     newline becomes a space unless the next line is a block closer or
//!     a footnote paragraph split, in which case it is swallowed so the
//!     text carries no trailing space.
//!
//!     Two labeled-paragraph forms get first refusal before plain text:
//!     discourse-part identifiers ("Question 3:") inside a
//!     `discourse-part` classed scope, and postscript identifiers
//!     ("P.S.", "N.B.") inside a `postscript` classed scope.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::adoc::ast::{AstNode, NodeKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{TokenKind, TokenSpec};

/// Token kinds the text parselet may fold into a TEXT node
pub fn is_text_kind(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Text
            | TokenKind::Whitespace
            | TokenKind::Eol
            | TokenKind::Dot
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::DoubleColon
            | TokenKind::Semicolon
            | TokenKind::QuestionMark
            | TokenKind::ExclamationMark
            | TokenKind::ForwardSlash
            | TokenKind::LeftParens
            | TokenKind::RightParens
            | TokenKind::StraightSingleQuote
            | TokenKind::StraightDoubleQuote
            | TokenKind::Equals
            | TokenKind::Asterisk
            | TokenKind::TripleAsterisk
            | TokenKind::Hash
            | TokenKind::Backtick
            | TokenKind::Pipe
            | TokenKind::RightBracket
    )
}

/// Characters the `+++c+++` escape idiom may carry
const ESCAPABLE: [&str; 6] = [".", "[", "]", ";", "-", "*"];

static DISCOURSE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(question|answer|objection|pregunta|respuesta|objeci[oó]n)$").unwrap()
});

static POSTSCRIPT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(p\.?s\.?|n\.?b\.?|postscript|postscriptum|postdata)$").unwrap()
});

pub fn text(parser: &mut Parser) -> Result<AstNode> {
    if let Some(node) = discourse_part(parser) {
        return Ok(node);
    }
    if let Some(node) = postscript(parser) {
        return Ok(node);
    }

    let start = parser.current().clone();
    let mut node = AstNode::open(NodeKind::Text, &start);
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in text at {}",
                start.position()
            )));
        }
        if parser.stop_tokens_found() {
            break;
        }
        let token = parser.current().clone();
        match token.kind {
            TokenKind::Dot if token.column.start == 1 => {
                return Err(Error::parse(
                    "not implemented: line beginning with a dot",
                    &token,
                ));
            }
            TokenKind::Whitespace => {
                parser.advance();
                node.value.push(' ');
            }
            TokenKind::Eol => {
                parser.advance();
                if line_continues(parser) {
                    node.value.push(' ');
                }
            }
            TokenKind::TriplePlus => {
                if let Some(escaped) = escaped_char(parser) {
                    node.value.push_str(&escaped);
                } else {
                    break;
                }
            }
            kind if is_text_kind(kind) => {
                parser.advance();
                node.value.push_str(&token.literal);
            }
            _ => break,
        }
    }
    node.close(&parser.previous());
    Ok(node)
}

/// After consuming a newline, does prose continue? A block closer, a
/// footnote paragraph split, or any stream boundary means the newline
/// must not leave a trailing space behind.
fn line_continues(parser: &Parser) -> bool {
    let next = parser.current();
    if next.kind.is_eox() {
        return false;
    }
    if next.kind == TokenKind::FootnoteParagraphSplit {
        return false;
    }
    if next.kind == TokenKind::Underscore
        && next.literal == "____"
        && next.column.start == 1
    {
        return false;
    }
    true
}

/// Absorb a `+++c+++` escape into the surrounding text run
fn escaped_char(parser: &mut Parser) -> Option<String> {
    if !parser.peek_tokens(&[
        TokenSpec::Kind(TokenKind::TriplePlus),
        TokenSpec::Kind(TokenKind::RawPassthrough),
        TokenSpec::Kind(TokenKind::TriplePlus),
    ]) {
        return None;
    }
    let literal = parser.look_ahead(1).literal.clone();
    if !ESCAPABLE.contains(&literal.as_str()) {
        return None;
    }
    parser.advance();
    parser.advance();
    parser.advance();
    Some(literal)
}

/// `Question 3:` / `Answer:` labels inside a discourse-part scope
fn discourse_part(parser: &mut Parser) -> Option<AstNode> {
    if !parser.context_has_class("discourse-part") {
        return None;
    }
    let label = parser.current();
    if label.kind != TokenKind::Text || !DISCOURSE_LABEL.is_match(&label.literal) {
        return None;
    }

    let with_number = parser.peek_tokens(&[
        TokenSpec::Kind(TokenKind::Text),
        TokenSpec::Kind(TokenKind::Whitespace),
        TokenSpec::Kind(TokenKind::Text),
        TokenSpec::Kind(TokenKind::Colon),
    ]) && parser
        .look_ahead(2)
        .literal
        .chars()
        .all(|c| c.is_ascii_digit());
    let bare = parser.peek_tokens(&[
        TokenSpec::Kind(TokenKind::Text),
        TokenSpec::Kind(TokenKind::Colon),
    ]);
    if !with_number && !bare {
        return None;
    }

    let start = parser.advance();
    let mut node = AstNode::open(NodeKind::DiscoursePartIdentifier, &start);
    node.value = start.literal.clone();
    if with_number {
        parser.advance();
        let number = parser.advance();
        node.value.push(' ');
        node.value.push_str(&number.literal);
    }
    let colon = parser.advance();
    node.value.push(':');
    node.close(&colon);
    parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
    Some(node)
}

/// `P.S.` / `N.B.` labels opening a postscript-classed paragraph.
///
/// The label is matched over joined lookahead literals so the dotted
/// abbreviation forms work whether or not their dots are escaped.
fn postscript(parser: &mut Parser) -> Option<AstNode> {
    if !parser.context_has_class("postscript") {
        return None;
    }
    if parser.current().column.start != 1 {
        return None;
    }

    let mut joined = String::new();
    let mut consumed = 0;
    let mut n = 0;
    while n < 8 {
        let token = parser.look_ahead(n);
        match token.kind {
            TokenKind::Text | TokenKind::Dot => {
                joined.push_str(&token.literal);
                n += 1;
            }
            TokenKind::TriplePlus
                if parser.look_ahead(n + 1).kind == TokenKind::RawPassthrough
                    && parser.look_ahead(n + 2).kind == TokenKind::TriplePlus
                    && ESCAPABLE.contains(&parser.look_ahead(n + 1).literal.as_str()) =>
            {
                joined.push_str(&parser.look_ahead(n + 1).literal);
                n += 3;
            }
            _ => break,
        }
        consumed = n;
    }
    if consumed == 0 || !POSTSCRIPT_LABEL.is_match(&joined) {
        return None;
    }

    let start = parser.current().clone();
    let mut node = AstNode::open(NodeKind::PostscriptIdentifier, &start);
    for _ in 0..consumed {
        parser.advance();
    }
    node.value = joined;
    if parser.current().kind == TokenKind::Colon {
        parser.advance();
        node.value.push(':');
    }
    node.close(&parser.previous());
    parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::lexer::Lexer;

    fn parser_for(input: &str) -> Parser {
        Parser::new(Lexer::from_text(input))
    }

    #[test]
    fn test_whitespace_collapses_to_single_space() {
        let mut parser = parser_for("Hello   world");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "Hello world");
    }

    #[test]
    fn test_newline_becomes_space_between_lines() {
        let mut parser = parser_for("Hello\nworld\n");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "Hello world");
    }

    #[test]
    fn test_no_trailing_space_at_stream_end() {
        let mut parser = parser_for("Hello world\n");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "Hello world");
    }

    #[test]
    fn test_newline_before_quote_closer_is_swallowed() {
        let mut parser = parser_for("last line\n____\n");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "last line");
        assert_eq!(parser.current().literal, "____");
    }

    #[test]
    fn test_line_initial_dot_is_fatal() {
        let mut parser = parser_for(".Title line\n");
        let err = text(&mut parser).unwrap_err();
        assert!(err.message().contains("not implemented"));
    }

    #[test]
    fn test_escape_absorbed_into_text_run() {
        let mut parser = parser_for("1832+++.+++ And then");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "1832. And then");
    }

    #[test]
    fn test_punctuation_folds_into_text() {
        let mut parser = parser_for("Wait; really? (yes!)");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.value, "Wait; really? (yes!)");
    }

    #[test]
    fn test_discourse_part_label_with_number() {
        let mut parser = parser_for("Question 3: What then?");
        parser.push_classes(vec!["discourse-part".to_string()]);
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::DiscoursePartIdentifier);
        assert_eq!(node.value, "Question 3:");
        assert_eq!(parser.current().literal, "What");
    }

    #[test]
    fn test_discourse_part_label_spanish() {
        let mut parser = parser_for("Respuesta: Si.");
        parser.push_classes(vec!["discourse-part".to_string()]);
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::DiscoursePartIdentifier);
        assert_eq!(node.value, "Respuesta:");
    }

    #[test]
    fn test_discourse_label_outside_scope_is_plain_text() {
        let mut parser = parser_for("Question 3: What then?");
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::Text);
        assert_eq!(node.value, "Question 3: What then?");
    }

    #[test]
    fn test_postscript_label() {
        let mut parser = parser_for("P.S. I forgot to add");
        parser.push_classes(vec!["postscript".to_string()]);
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::PostscriptIdentifier);
        assert_eq!(node.value, "P.S.");
        assert_eq!(parser.current().literal, "I");
    }

    #[test]
    fn test_postscript_label_with_escaped_dots() {
        let mut parser = parser_for("P+++.+++S+++.+++ More");
        parser.push_classes(vec!["postscript".to_string()]);
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::PostscriptIdentifier);
        assert_eq!(node.value, "P.S.");
    }

    #[test]
    fn test_ordinary_word_in_postscript_scope_is_text() {
        let mut parser = parser_for("Plain words here");
        parser.push_classes(vec!["postscript".to_string()]);
        let node = text(&mut parser).unwrap();
        assert_eq!(node.kind, NodeKind::Text);
    }
}
