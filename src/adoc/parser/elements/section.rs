//! Section parsing and the shared chapter/section body loop
//!
//!     Sections nest by heading depth: a chapter body accepts level-3
//!     sections, whose bodies accept level-4 sections, and so on. A
//!     shallower heading closes every scope down to its own level; a
//!     heading deeper than the level its position allows is a structural
//!     error, not a nested section.

use crate::adoc::ast::{AstNode, NodeKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::elements::{block, context, heading};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::TokenKind;

pub fn parse(parser: &mut Parser, level: u8) -> Result<AstNode> {
    let start = parser.current().clone();
    let mut node = AstNode::open(NodeKind::Section, &start);
    node.context = context::parse_optional(parser)?;
    node.meta.level = Some(level);

    let heading = heading::parse(parser, level)?;
    node.children.push(heading);

    let classes = node
        .context
        .as_ref()
        .map(|context| context.class_list.clone())
        .unwrap_or_default();
    parser.push_classes(classes);
    let body = parse_body(parser, &mut node, level + 1);
    parser.pop_classes();
    body?;

    node.close(&parser.previous());
    Ok(node)
}

/// Parse blocks and child sections into `parent` until the scope closes.
///
/// `section_level` is the heading depth a child section of this scope
/// must have. Epigraph blocks are routed to the document-wide collection
/// instead of the parent's children.
pub fn parse_body(parser: &mut Parser, parent: &mut AstNode, section_level: u8) -> Result<()> {
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing {} body at {}",
                parent.kind,
                parser.current().position()
            )));
        }
        while matches!(parser.current().kind, TokenKind::Eol | TokenKind::DoubleEol) {
            parser.advance();
        }
        match parser.current().kind {
            TokenKind::Eof | TokenKind::Eod => break,
            TokenKind::ThematicBreak if parser.current().column.start == 1 => {
                let token = parser.advance();
                let mut node = AstNode::open(NodeKind::ThematicBreak, &token);
                node.close(&token);
                parent.children.push(node);
            }
            _ => {
                if let Some(level) = heading_level_ahead(parser) {
                    if level < section_level {
                        break;
                    }
                    if level > section_level {
                        return Err(Error::parse(
                            format!(
                                "heading level mismatch: expected level {} but found level {}",
                                section_level, level
                            ),
                            parser.current(),
                        ));
                    }
                    let section = parse(parser, level)?;
                    parent.children.push(section);
                    continue;
                }
                let block = block::parse(parser)?;
                if block
                    .context
                    .as_ref()
                    .map(|context| context.is_epigraph())
                    .unwrap_or(false)
                {
                    parser.epigraphs.push(block);
                } else {
                    parent.children.push(block);
                }
            }
        }
    }
    Ok(())
}

/// Bounded lookahead: the level of the heading opening the next
/// construct, skipping over a leading context line. A heading is an
/// equals run at column 1 followed by whitespace and a title; the
/// `====` example-block delimiter is followed by a newline and never
/// matches.
fn heading_level_ahead(parser: &Parser) -> Option<u8> {
    let mut n = 0;
    if context::peek_start(parser) {
        while n < 64 && parser.look_ahead(n).kind != TokenKind::RightBracket {
            if parser.look_ahead(n).kind.is_eox() {
                return None;
            }
            n += 1;
        }
        n += 1;
        if parser.look_ahead(n).kind != TokenKind::Eol {
            return None;
        }
        n += 1;
    }
    let token = parser.look_ahead(n);
    if token.kind == TokenKind::Equals
        && token.column.start == 1
        && parser.look_ahead(n + 1).kind == TokenKind::Whitespace
    {
        Some(token.literal.len() as u8)
    } else {
        None
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
    fn test_section_with_body() {
        let mut parser = parser_for("=== Meeting Records\n\nFirst entry\n");
        let section = parse(&mut parser, 3).unwrap();
        assert_eq!(section.kind, NodeKind::Section);
        assert_eq!(section.meta.level, Some(3));
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[1].kind, NodeKind::Block);
    }

    #[test]
    fn test_nested_subsection() {
        let mut parser = parser_for("=== Outer\n\n==== Inner\n\nDeep text\n");
        let section = parse(&mut parser, 3).unwrap();
        assert_eq!(section.children.len(), 2);
        let inner = &section.children[1];
        assert_eq!(inner.kind, NodeKind::Section);
        assert_eq!(inner.meta.level, Some(4));
    }

    #[test]
    fn test_skipped_heading_level_is_fatal() {
        let mut parser = parser_for("=== Outer\n\n===== TooDeep\n\nText\n");
        let err = parse(&mut parser, 3).unwrap_err();
        assert!(err.message().contains("heading level mismatch"));
        assert!(err.message().contains("expected level 4"));
    }

    #[test]
    fn test_shallower_heading_closes_the_scope() {
        let mut parser = parser_for("==== Inner\n\nText\n\n=== Sibling\n");
        let section = parse(&mut parser, 4).unwrap();
        assert_eq!(section.children.len(), 2);
        assert_eq!(parser.current().literal, "===");
    }

    #[test]
    fn test_heading_lookahead_skips_context_line() {
        let parser = parser_for("[.style]\n=== Title\n");
        assert_eq!(heading_level_ahead(&parser), Some(3));
    }

    #[test]
    fn test_example_delimiter_is_not_a_heading() {
        let parser = parser_for("====\ncontent\n====\n");
        assert_eq!(heading_level_ahead(&parser), None);
    }

    #[test]
    fn test_thematic_break_in_body() {
        let mut parser = parser_for("=== Title\n\nBefore\n\n'''\n\nAfter\n");
        let section = parse(&mut parser, 3).unwrap();
        let kinds: Vec<_> = section.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Heading,
                NodeKind::Block,
                NodeKind::ThematicBreak,
                NodeKind::Block,
            ]
        );
    }
}
