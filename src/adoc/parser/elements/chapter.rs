//! Chapter parsing
//!
//!     A chapter is the top-level unit under the document: an optional
//!     context line, a mandatory level-2 heading, then a body of blocks
//!     and level-3 sections. Each input unit contributes its chapters in
//!     order; the chapter counter feeds the cross-reference id table.

use crate::adoc::ast::{AstNode, NodeKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::elements::{block, context, heading, section};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::TokenKind;

pub fn parse(parser: &mut Parser) -> Result<AstNode> {
    parser.begin_chapter();

    // Epigraphs ahead of the chapter heading belong to the document
    let mut chapter_context = context::parse_optional(parser)?;
    let mut guard = 0;
    while chapter_context
        .as_ref()
        .map(|context| context.is_epigraph())
        .unwrap_or(false)
    {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing epigraphs at {}",
                parser.current().position()
            )));
        }
        let start = parser.current().clone();
        let epigraph = block::parse_with_context(parser, start, chapter_context.take())?;
        parser.epigraphs.push(epigraph);
        while matches!(parser.current().kind, TokenKind::Eol | TokenKind::DoubleEol) {
            parser.advance();
        }
        chapter_context = context::parse_optional(parser)?;
    }

    let start = parser.current().clone();
    let mut node = AstNode::open(NodeKind::Chapter, &start);
    node.context = chapter_context;

    if parser.current().kind != TokenKind::Equals {
        return Err(Error::parse(
            "chapter must begin with a level-2 heading",
            parser.current(),
        ));
    }
    let heading = heading::parse(parser, 2)?;
    node.children.push(heading);

    let classes = node
        .context
        .as_ref()
        .map(|context| context.class_list.clone())
        .unwrap_or_default();
    parser.push_classes(classes);
    let body = section::parse_body(parser, &mut node, 3);
    parser.pop_classes();
    body?;

    node.close(&parser.previous());
    Ok(node)
}
