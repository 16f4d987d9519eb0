//! Description list parsing
//!
//!     `Term:: definition` lines. A list is recognized by a bounded
//!     same-line lookahead for the `::` separator; each item is a TERM
//!     (everything before the separator) and a CONTENT (everything
//!     after, to the next blank line). Items are separated by blank
//!     lines; a blank line not followed by another `::` line ends the
//!     list.

use crate::adoc::ast::{AstNode, NodeKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{TokenKind, TokenSpec};

/// Same-line lookahead bound for finding the `::` separator
const SEPARATOR_SCAN_LIMIT: usize = 32;

pub fn peek_start(parser: &Parser) -> bool {
    peek_start_from(parser, 0)
}

fn peek_start_from(parser: &Parser, offset: usize) -> bool {
    if parser.look_ahead(offset).kind == TokenKind::DoubleColon {
        // A line cannot open with the separator
        return false;
    }
    for n in offset..offset + SEPARATOR_SCAN_LIMIT {
        let token = parser.look_ahead(n);
        if token.kind == TokenKind::DoubleColon {
            return true;
        }
        if token.kind.is_eox() {
            return false;
        }
    }
    false
}

pub fn parse(parser: &mut Parser) -> Result<AstNode> {
    let start = parser.current().clone();
    let mut list = AstNode::open(NodeKind::DescriptionList, &start);
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing DESCRIPTION_LIST at {}",
                start.position()
            )));
        }
        list.children.push(parse_item(parser)?);
        if parser.current().kind == TokenKind::DoubleEol && peek_start_from(parser, 1) {
            parser.advance();
        } else {
            break;
        }
    }
    list.close(&parser.previous());
    Ok(list)
}

fn parse_item(parser: &mut Parser) -> Result<AstNode> {
    let item_start = parser.current().clone();
    let mut item = AstNode::open(NodeKind::DescriptionListItem, &item_start);

    let mut term = AstNode::open(NodeKind::DescriptionListItemTerm, &item_start);
    parser.parse_until(
        &mut term,
        vec![vec![TokenSpec::Kind(TokenKind::DoubleColon)]],
    )?;
    term.close(&parser.previous());
    parser.consume(TokenKind::DoubleColon)?;
    parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
    parser.consume_if(TokenSpec::Kind(TokenKind::Eol));
    parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));

    let content_start = parser.current().clone();
    let mut content = AstNode::open(NodeKind::DescriptionListItemContent, &content_start);
    parser.parse_until(
        &mut content,
        vec![
            vec![TokenSpec::Kind(TokenKind::DoubleEol)],
            vec![TokenSpec::Kind(TokenKind::Eol), TokenSpec::Kind(TokenKind::Eof)],
        ],
    )?;
    content.close(&parser.previous());

    item.children.push(term);
    item.children.push(content);
    item.close(&parser.previous());
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::lexer::Lexer;

    fn parser_for(input: &str) -> Parser {
        Parser::new(Lexer::from_text(input))
    }

    #[test]
    fn test_single_item() {
        let mut parser = parser_for("Hello:: world\n");
        let list = parse(&mut parser).unwrap();
        assert_eq!(list.kind, NodeKind::DescriptionList);
        assert_eq!(list.children.len(), 1);
        let item = &list.children[0];
        assert_eq!(item.kind, NodeKind::DescriptionListItem);
        let term = &item.children[0];
        let content = &item.children[1];
        assert_eq!(term.kind, NodeKind::DescriptionListItemTerm);
        assert_eq!(term.children[0].value, "Hello");
        assert_eq!(content.kind, NodeKind::DescriptionListItemContent);
        assert_eq!(content.children[0].value, "world");
    }

    #[test]
    fn test_items_separated_by_blank_lines() {
        let mut parser = parser_for("First:: one\n\nSecond:: two\n");
        let list = parse(&mut parser).unwrap();
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[1].children[0].children[0].value, "Second");
    }

    #[test]
    fn test_content_on_following_line() {
        let mut parser = parser_for("Term::\nSpilled onto the next line\n");
        let list = parse(&mut parser).unwrap();
        let content = &list.children[0].children[1];
        assert_eq!(content.children[0].value, "Spilled onto the next line");
    }

    #[test]
    fn test_term_may_carry_markup() {
        let mut parser = parser_for("_Inward_ stillness:: a quiet mind\n");
        let list = parse(&mut parser).unwrap();
        let term = &list.children[0].children[0];
        assert_eq!(term.children[0].kind, NodeKind::Emphasis);
        assert_eq!(term.children[1].value, " stillness");
    }

    #[test]
    fn test_peek_start_requires_same_line_separator() {
        assert!(peek_start(&parser_for("Hello:: world\n")));
        assert!(!peek_start(&parser_for("Hello world\nTerm:: def\n")));
        assert!(!peek_start(&parser_for(":: nothing\n")));
    }

    #[test]
    fn test_list_ends_before_plain_paragraph() {
        let mut parser = parser_for("One:: first\n\nNot a list item\n");
        let list = parse(&mut parser).unwrap();
        assert_eq!(list.children.len(), 1);
        assert_eq!(parser.current().kind, TokenKind::DoubleEol);
    }
}
