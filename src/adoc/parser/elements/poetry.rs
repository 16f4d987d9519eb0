//! Verse parsing
//!
//!     Verse content is raw: every line becomes a VERSE_LINE holding the
//!     line's literal text with no inline markup interpretation, and
//!     blank lines group the lines into VERSE_STANZA nodes. Two homes:
//!     `[verse]` blocks fenced by `____`, and backtick-fenced verse
//!     embedded in footnotes, where the spaced dash run `- - -` stands
//!     in for the blank stanza separator.

use crate::adoc::ast::{AstNode, NodeKind, SubType};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{TokenKind, TokenSpec};

/// Parse stanzas into `block` until the closing `____` fence line
pub fn parse_stanzas(parser: &mut Parser, block: &mut AstNode) -> Result<()> {
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing verse stanzas at {}",
                parser.current().position()
            )));
        }
        if at_fence(parser) || matches!(parser.current().kind, TokenKind::Eof | TokenKind::Eod) {
            break;
        }
        let stanza = parse_stanza(parser, at_fence)?;
        if !stanza.children.is_empty() {
            block.children.push(stanza);
        }
    }
    Ok(())
}

fn at_fence(parser: &Parser) -> bool {
    let token = parser.current();
    token.kind == TokenKind::Underscore
        && token.literal == "____"
        && token.column.start == 1
}

/// Lines until a blank line (stanza boundary) or the enclosing
/// terminator, which `done` recognizes without consuming
fn parse_stanza(parser: &mut Parser, done: fn(&Parser) -> bool) -> Result<AstNode> {
    let start = parser.current().clone();
    let mut stanza = AstNode::open(NodeKind::VerseStanza, &start);
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing VERSE_STANZA at {}",
                start.position()
            )));
        }
        if done(parser) || matches!(parser.current().kind, TokenKind::Eof | TokenKind::Eod) {
            break;
        }
        let line_start = parser.current().clone();
        let mut line = AstNode::open(NodeKind::VerseLine, &line_start);
        while !parser.current().kind.is_eox() {
            line.value.push_str(&parser.advance().literal);
        }
        line.close(&parser.previous());
        stanza.children.push(line);
        match parser.current().kind {
            TokenKind::Eol => {
                parser.advance();
            }
            TokenKind::DoubleEol => {
                parser.advance();
                break;
            }
            _ => break,
        }
    }
    stanza.close(&parser.previous());
    Ok(stanza)
}

/// Backtick-fenced verse inside a footnote. Stanza separators are
/// `- - -` lines; the closing backtick is consumed, leaving the
/// footnote's closing bracket for the caller.
pub fn parse_footnote_verse(parser: &mut Parser) -> Result<AstNode> {
    let open = parser.consume(TokenKind::Backtick)?;
    parser.consume(TokenKind::Eol)?;
    let mut block = AstNode::open(NodeKind::Block, &open);
    block.meta.sub_type = Some(SubType::Verse);

    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing footnote verse at {}",
                open.position()
            )));
        }
        if parser.current().kind == TokenKind::FootnoteStanza {
            parser.advance();
            parser.consume_if(TokenSpec::Kind(TokenKind::Eol));
            continue;
        }
        if parser.current().kind == TokenKind::Backtick
            || matches!(parser.current().kind, TokenKind::Eof | TokenKind::Eod)
        {
            break;
        }
        let stanza = parse_stanza(parser, footnote_verse_done)?;
        if !stanza.children.is_empty() {
            block.children.push(stanza);
        }
    }

    let close = parser.consume_close(
        TokenSpec::Kind(TokenKind::Backtick),
        NodeKind::Block,
        &open,
    )?;
    block.close(&close);
    Ok(block)
}

fn footnote_verse_done(parser: &Parser) -> bool {
    matches!(
        parser.current().kind,
        TokenKind::Backtick | TokenKind::FootnoteStanza
    )
}
