//! Block parsing
//!
//!     A block is an optional context line plus content, shaped by a
//!     sub-type decided entirely from lookahead: `--` fences an open
//!     block, `====` an example block, `____` a quote (or, with a
//!     `[verse]` context, verse), and anything else is a plain run of
//!     paragraphs. Delimited shapes require their closing fence; a
//!     missing fence is an "unclosed BLOCK" error citing the opener.

use crate::adoc::ast::{AstNode, Context, NodeKind, SubType};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::elements::{context, description_list, poetry};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{Token, TokenKind, TokenSpec};

pub fn parse(parser: &mut Parser) -> Result<AstNode> {
    let start = parser.current().clone();
    let block_context = context::parse_optional(parser)?;
    parse_with_context(parser, start, block_context)
}

/// Parse a block whose context line (if any) the caller already consumed
pub fn parse_with_context(
    parser: &mut Parser,
    start: Token,
    block_context: Option<Context>,
) -> Result<AstNode> {
    let sub_type = classify(parser, block_context.as_ref());

    let mut node = AstNode::open(NodeKind::Block, &start);
    node.meta.sub_type = Some(sub_type);
    let classes = block_context
        .as_ref()
        .map(|context| context.class_list.clone())
        .unwrap_or_default();
    node.context = block_context;

    parser.push_classes(classes);
    let body = parse_body(parser, &mut node, sub_type);
    parser.pop_classes();
    body?;

    node.close(&parser.previous());
    Ok(node)
}

fn classify(parser: &Parser, block_context: Option<&Context>) -> SubType {
    if block_context.map(Context::is_verse).unwrap_or(false) {
        return SubType::Verse;
    }
    if block_context.map(Context::is_quote).unwrap_or(false) {
        return SubType::Quote;
    }
    let token = parser.current();
    if token.column.start == 1 && parser.peek().kind.is_eox() {
        match token.kind {
            TokenKind::Underscore if token.literal == "____" => return SubType::Quote,
            TokenKind::DoubleDash => return SubType::Open,
            TokenKind::Equals if token.literal == "====" => return SubType::Example,
            _ => {}
        }
    }
    SubType::Plain
}

fn parse_body(parser: &mut Parser, node: &mut AstNode, sub_type: SubType) -> Result<()> {
    match sub_type {
        SubType::Plain => parse_paragraphs(parser, node, None),
        SubType::Open => delimited(parser, node, TokenSpec::Lit(TokenKind::DoubleDash, "--")),
        SubType::Example => delimited(parser, node, TokenSpec::Lit(TokenKind::Equals, "====")),
        SubType::Quote => delimited(parser, node, TokenSpec::Lit(TokenKind::Underscore, "____")),
        SubType::Verse => verse_body(parser, node),
        other => Err(Error::invariant(format!(
            "block parser dispatched on sub-type {}",
            other.as_str()
        ))),
    }
}

fn delimited(parser: &mut Parser, node: &mut AstNode, fence: TokenSpec) -> Result<()> {
    let open = parser.consume_spec(fence)?;
    parser.consume_spec(TokenSpec::Eox)?;
    parse_paragraphs(parser, node, Some(fence))?;
    parser.consume_close(fence, NodeKind::Block, &open)?;
    Ok(())
}

fn verse_body(parser: &mut Parser, node: &mut AstNode) -> Result<()> {
    let open = parser.consume_lit(TokenKind::Underscore, "____")?;
    parser.consume(TokenKind::Eol)?;
    poetry::parse_stanzas(parser, node)?;
    parser.consume_close(
        TokenSpec::Lit(TokenKind::Underscore, "____"),
        NodeKind::Block,
        &open,
    )?;
    Ok(())
}

fn parse_paragraphs(
    parser: &mut Parser,
    block: &mut AstNode,
    fence: Option<TokenSpec>,
) -> Result<()> {
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing BLOCK paragraphs at {}",
                parser.current().position()
            )));
        }
        while matches!(parser.current().kind, TokenKind::Eol | TokenKind::DoubleEol) {
            parser.advance();
        }
        if matches!(parser.current().kind, TokenKind::Eof | TokenKind::Eod) {
            break;
        }
        if let Some(fence) = fence {
            if fence.matches(parser.current()) && parser.current().column.start == 1 {
                break;
            }
            if parser.current().kind == TokenKind::ThematicBreak
                && parser.current().column.start == 1
            {
                let token = parser.advance();
                let mut node = AstNode::open(NodeKind::ThematicBreak, &token);
                node.close(&token);
                block.children.push(node);
                continue;
            }
        } else if at_boundary(parser) {
            break;
        }
        if description_list::peek_start(parser) {
            block.children.push(description_list::parse(parser)?);
            continue;
        }
        block.children.push(parse_paragraph(parser, fence)?);
    }
    Ok(())
}

/// A plain block runs until the next construct that cannot be one of
/// its paragraphs: a context line, a heading, a fence, a thematic break
fn at_boundary(parser: &Parser) -> bool {
    let token = parser.current();
    if token.column.start != 1 {
        return false;
    }
    match token.kind {
        TokenKind::LeftBracket => context::peek_start(parser),
        TokenKind::Equals | TokenKind::ThematicBreak => true,
        TokenKind::DoubleDash => parser.peek().kind.is_eox(),
        TokenKind::Underscore => token.literal == "____" && parser.peek().kind.is_eox(),
        _ => false,
    }
}

fn parse_paragraph(parser: &mut Parser, fence: Option<TokenSpec>) -> Result<AstNode> {
    let start = parser.current().clone();
    let mut paragraph = AstNode::open(NodeKind::Paragraph, &start);
    let paragraph_context = context::parse_optional(parser)?;
    let classes = paragraph_context
        .as_ref()
        .map(|context| context.class_list.clone())
        .unwrap_or_default();
    paragraph.context = paragraph_context;

    let mut stops = vec![
        vec![TokenSpec::Kind(TokenKind::DoubleEol)],
        vec![
            TokenSpec::Kind(TokenKind::Eol),
            TokenSpec::Kind(TokenKind::ThematicBreak),
        ],
    ];
    if let Some(fence) = fence {
        // A closing fence stands on its own line; the same token
        // mid-line is inline content, an em-dash or a redaction run
        stops.push(vec![TokenSpec::Kind(TokenKind::Eol), fence]);
    }
    parser.push_classes(classes);
    let result = parser.parse_until(&mut paragraph, stops);
    parser.pop_classes();
    result?;

    paragraph.close(&parser.previous());
    Ok(paragraph)
}
