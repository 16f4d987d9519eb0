//! Heading parsing
//!
//!     A heading line is an equals run (its length is the level), a
//!     space, then one of three title shapes: a sequence identifier
//!     ("Chapter 3", optionally followed by ": Title"), an old-style
//!     slash-segmented title ("Part One / Continued"), or a plain title.
//!     Sequence numerals may be arabic or roman; both forms are kept in
//!     the node's sequence metadata.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::adoc::ast::{AstNode, NodeKind, SequenceMeta};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{TokenKind, TokenSpec};

static SEQUENCE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(chapter|section|cap[ií]tulo|secci[oó]n)$").unwrap());

static ROMAN_NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[ivxlcdm]+$").unwrap());

pub fn parse(parser: &mut Parser, expected_level: u8) -> Result<AstNode> {
    let equals = parser.consume(TokenKind::Equals)?;
    let level = equals.literal.len() as u8;
    if level != expected_level {
        return Err(Error::parse(
            format!(
                "heading level mismatch: expected level {} but found level {}",
                expected_level, level
            ),
            &equals,
        ));
    }
    parser.consume(TokenKind::Whitespace)?;

    let mut node = AstNode::open(NodeKind::Heading, &equals);
    node.meta.level = Some(level);

    if let Some(sequence) = sequence_identifier(parser) {
        node.children.push(sequence);
        if parser.current().kind == TokenKind::Colon {
            parser.advance();
            parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
            node.children.push(parse_title(parser)?);
        }
    } else if has_segments(parser) {
        parse_segments(parser, &mut node)?;
    } else {
        node.children.push(parse_title(parser)?);
    }

    node.close(&parser.previous());
    Ok(node)
}

fn parse_title(parser: &mut Parser) -> Result<AstNode> {
    let start = parser.current().clone();
    let mut title = AstNode::open(NodeKind::HeadingTitle, &start);
    parser.parse_until(&mut title, vec![vec![TokenSpec::Eox]])?;
    title.close(&parser.previous());
    Ok(title)
}

/// "Chapter 3" / "Sección IV": a sequence label, a space, a numeral,
/// then either the end of the line or a colon introducing a title
fn sequence_identifier(parser: &mut Parser) -> Option<AstNode> {
    let label = parser.look_ahead(0);
    if label.kind != TokenKind::Text || !SEQUENCE_LABEL.is_match(&label.literal) {
        return None;
    }
    if !parser.peek_tokens(&[
        TokenSpec::Kind(TokenKind::Text),
        TokenSpec::Kind(TokenKind::Whitespace),
        TokenSpec::Kind(TokenKind::Text),
    ]) {
        return None;
    }
    let numeral = &parser.look_ahead(2).literal;
    let number = parse_numeral(numeral)?;
    let after = parser.look_ahead(3);
    if !after.kind.is_eox() && after.kind != TokenKind::Colon {
        return None;
    }

    let start = parser.advance();
    parser.advance();
    let numeral = parser.advance();
    let mut node = AstNode::open(NodeKind::HeadingSequenceIdentifier, &start);
    node.value = format!("{} {}", start.literal, numeral.literal);
    node.meta.sequence = Some(SequenceMeta {
        number,
        roman: to_roman(number),
    });
    node.close(&numeral);
    Some(node)
}

fn parse_numeral(literal: &str) -> Option<u32> {
    if literal.chars().all(|c| c.is_ascii_digit()) {
        return literal.parse().ok();
    }
    if ROMAN_NUMERAL.is_match(literal) {
        return from_roman(literal);
    }
    None
}

/// Old-style titles split on ` / ` into level-numbered segments
fn has_segments(parser: &Parser) -> bool {
    for n in 0..64 {
        if parser.look_ahead(n).kind.is_eox() {
            return false;
        }
        if parser.peek_tokens_at(n, &SEGMENT_SEPARATOR) {
            return true;
        }
    }
    false
}

const SEGMENT_SEPARATOR: [TokenSpec; 3] = [
    TokenSpec::Kind(TokenKind::Whitespace),
    TokenSpec::Kind(TokenKind::ForwardSlash),
    TokenSpec::Kind(TokenKind::Whitespace),
];

fn parse_segments(parser: &mut Parser, heading: &mut AstNode) -> Result<()> {
    let mut level = 1;
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop parsing heading segments at {}",
                parser.current().position()
            )));
        }
        let start = parser.current().clone();
        let mut segment = AstNode::open(NodeKind::HeadingSegment, &start);
        segment.meta.level = Some(level);
        parser.parse_until(
            &mut segment,
            vec![SEGMENT_SEPARATOR.to_vec(), vec![TokenSpec::Eox]],
        )?;
        segment.close(&parser.previous());
        heading.children.push(segment);
        if parser.peek_tokens(&SEGMENT_SEPARATOR) {
            parser.advance();
            parser.advance();
            parser.advance();
            level += 1;
        } else {
            break;
        }
    }
    Ok(())
}

fn from_roman(literal: &str) -> Option<u32> {
    let mut total = 0;
    let mut prev = 0;
    for c in literal.to_uppercase().chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total -= value;
        } else {
            total += value;
            prev = value;
        }
    }
    if total > 0 {
        Some(total as u32)
    } else {
        None
    }
}

fn to_roman(mut number: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while number >= value {
            out.push_str(digits);
            number -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::lexer::Lexer;

    fn parser_for(input: &str) -> Parser {
        Parser::new(Lexer::from_text(input))
    }

    #[test]
    fn test_plain_title() {
        let mut parser = parser_for("== On Silence\n");
        let heading = parse(&mut parser, 2).unwrap();
        assert_eq!(heading.meta.level, Some(2));
        assert_eq!(heading.children.len(), 1);
        let title = &heading.children[0];
        assert_eq!(title.kind, NodeKind::HeadingTitle);
        assert_eq!(title.children[0].value, "On Silence");
    }

    #[test]
    fn test_sequence_identifier_arabic() {
        let mut parser = parser_for("== Chapter 3\n");
        let heading = parse(&mut parser, 2).unwrap();
        let sequence = &heading.children[0];
        assert_eq!(sequence.kind, NodeKind::HeadingSequenceIdentifier);
        assert_eq!(sequence.value, "Chapter 3");
        let meta = sequence.meta.sequence.as_ref().unwrap();
        assert_eq!(meta.number, 3);
        assert_eq!(meta.roman, "III");
    }

    #[test]
    fn test_sequence_identifier_roman() {
        let mut parser = parser_for("== Section XIV\n");
        let heading = parse(&mut parser, 2).unwrap();
        let meta = heading.children[0].meta.sequence.as_ref().unwrap();
        assert_eq!(meta.number, 14);
        assert_eq!(meta.roman, "XIV");
    }

    #[test]
    fn test_sequence_with_title() {
        let mut parser = parser_for("== Chapter 2: The Voyage\n");
        let heading = parse(&mut parser, 2).unwrap();
        assert_eq!(heading.children.len(), 2);
        assert_eq!(heading.children[0].value, "Chapter 2");
        assert_eq!(heading.children[1].kind, NodeKind::HeadingTitle);
        assert_eq!(heading.children[1].children[0].value, "The Voyage");
    }

    #[test]
    fn test_non_sequence_label_is_plain_title() {
        let mut parser = parser_for("== Letter 3\n");
        let heading = parse(&mut parser, 2).unwrap();
        assert_eq!(heading.children[0].kind, NodeKind::HeadingTitle);
    }

    #[test]
    fn test_segmented_title() {
        let mut parser = parser_for("== Life of Thomas / His Early Years\n");
        let heading = parse(&mut parser, 2).unwrap();
        assert_eq!(heading.children.len(), 2);
        assert_eq!(heading.children[0].kind, NodeKind::HeadingSegment);
        assert_eq!(heading.children[0].meta.level, Some(1));
        assert_eq!(heading.children[1].meta.level, Some(2));
        assert_eq!(
            heading.children[1].children[0].value,
            "His Early Years"
        );
    }

    #[test]
    fn test_wrong_level_is_fatal() {
        let mut parser = parser_for("=== Deep\n");
        let err = parse(&mut parser, 2).unwrap_err();
        assert!(err.message().contains("heading level mismatch"));
    }

    #[test]
    fn test_roman_round_trips() {
        for (number, roman) in [(1, "I"), (4, "IV"), (9, "IX"), (14, "XIV"), (40, "XL"), (1900, "MCM")] {
            assert_eq!(to_roman(number), roman);
            assert_eq!(from_roman(roman), Some(number));
        }
    }
}
