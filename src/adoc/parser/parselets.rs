//! Inline parselets
//!
//!     Each parselet is a plain function from parser state to one AST
//!     node. `dispatch` maps the current token to the parselet that owns
//!     it; `parse_until` calls through this table for all inline content.
//!     A token no parselet claims is an invariant violation, not a parse
//!     error: the table is meant to be total over everything the lexer
//!     can emit in inline position.

use crate::adoc::ast::{AstNode, Context, NodeKind, SubType, XrefMeta};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{text, Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{Token, TokenKind, TokenSpec};

pub type Parselet = fn(&mut Parser) -> Result<AstNode>;

/// Select the parselet for the current token, or None when the token
/// has no inline meaning
pub fn dispatch(token: &Token, _parser: &Parser) -> Option<Parselet> {
    match token.kind {
        TokenKind::DoubleAsterisk => Some(strong),
        TokenKind::Underscore => Some(underscore),
        TokenKind::Caret | TokenKind::FootnotePrefix => Some(footnote),
        TokenKind::DoubleDash
        | TokenKind::LeftSingleCurly
        | TokenKind::RightSingleCurly
        | TokenKind::LeftDoubleCurly
        | TokenKind::RightDoubleCurly
        | TokenKind::Degree
        | TokenKind::Pound
        | TokenKind::Dollar => Some(symbol),
        TokenKind::LeftBracket => Some(bracket),
        TokenKind::TriplePlus | TokenKind::QuadruplePlus => Some(passthrough),
        TokenKind::Entity => Some(entity),
        TokenKind::XrefOpen => Some(xref),
        kind if text::is_text_kind(kind) => Some(text::text),
        _ => None,
    }
}

/// `**bold**`
pub fn strong(parser: &mut Parser) -> Result<AstNode> {
    let open = parser.consume(TokenKind::DoubleAsterisk)?;
    let mut node = AstNode::open(NodeKind::Strong, &open);
    parser.parse_until(
        &mut node,
        vec![vec![TokenSpec::Kind(TokenKind::DoubleAsterisk)]],
    )?;
    let close = parser.consume_close(
        TokenSpec::Kind(TokenKind::DoubleAsterisk),
        NodeKind::Strong,
        &open,
    )?;
    node.close(&close);
    Ok(node)
}

/// Underscore runs are arity-sensitive: a single underscore opens an
/// emphasis span, a longer run mid-line marks a redacted word, and a
/// bare run alone at the start of a line belongs to no inline form.
pub fn underscore(parser: &mut Parser) -> Result<AstNode> {
    let token = parser.current().clone();
    if token.literal == "_" {
        return emphasis(parser);
    }
    if token.column.start == 1 && parser.peek().kind.is_eox() {
        return Err(Error::parse(
            format!("unexpected bare underscore run `{}`", token.literal),
            &token,
        ));
    }
    let consumed = parser.advance();
    let mut node = AstNode::open(NodeKind::Redacted, &consumed);
    node.value = consumed.literal.clone();
    node.close(&consumed);
    Ok(node)
}

fn emphasis(parser: &mut Parser) -> Result<AstNode> {
    let open = parser.consume_lit(TokenKind::Underscore, "_")?;
    let mut node = AstNode::open(NodeKind::Emphasis, &open);
    parser.parse_until(
        &mut node,
        vec![vec![TokenSpec::Lit(TokenKind::Underscore, "_")]],
    )?;
    let close = parser.consume_close(
        TokenSpec::Lit(TokenKind::Underscore, "_"),
        NodeKind::Emphasis,
        &open,
    )?;
    node.close(&close);
    Ok(node)
}

/// Single-token typographic symbols (em dash, curly quotes, currency)
pub fn symbol(parser: &mut Parser) -> Result<AstNode> {
    let token = parser.advance();
    let sub_type = match token.kind {
        TokenKind::DoubleDash => SubType::Emdash,
        TokenKind::LeftSingleCurly => SubType::LeftSingleCurly,
        TokenKind::RightSingleCurly => SubType::RightSingleCurly,
        TokenKind::LeftDoubleCurly => SubType::LeftDoubleCurly,
        TokenKind::RightDoubleCurly => SubType::RightDoubleCurly,
        TokenKind::Degree => SubType::Degree,
        TokenKind::Pound => SubType::Pound,
        TokenKind::Dollar => SubType::Dollar,
        kind => {
            return Err(Error::invariant(format!(
                "symbol parselet dispatched on {}",
                kind
            )))
        }
    };
    let mut node = AstNode::open(NodeKind::Symbol, &token);
    node.value = token.literal.clone();
    node.meta.sub_type = Some(sub_type);
    node.close(&token);
    Ok(node)
}

/// Named or numeric character entities
pub fn entity(parser: &mut Parser) -> Result<AstNode> {
    let token = parser.consume(TokenKind::Entity)?;
    let sub_type = match token.literal.as_str() {
        "&amp;" => SubType::Ampersand,
        "&mdash;" | "&#8212;" => SubType::Emdash,
        "&hellip;" | "&#8230;" => SubType::Ellipses,
        other => {
            return Err(Error::parse(
                format!("unknown entity type `{}`", other),
                &token,
            ))
        }
    };
    let mut node = AstNode::open(NodeKind::Entity, &token);
    node.value = token.literal.clone();
    node.meta.sub_type = Some(sub_type);
    node.close(&token);
    Ok(node)
}

/// `+++verbatim+++` and `++++` block passthroughs.
///
/// A line-initial `+++[+++` is not a passthrough: it is the idiom for a
/// literal bracket opening a line, and yields plain text.
pub fn passthrough(parser: &mut Parser) -> Result<AstNode> {
    let open = parser.current().clone();
    if open.kind == TokenKind::TriplePlus
        && open.column.start == 1
        && parser.look_ahead(1).kind == TokenKind::RawPassthrough
        && parser.look_ahead(1).literal == "["
        && parser.look_ahead(2).kind == TokenKind::TriplePlus
    {
        parser.advance();
        let raw = parser.advance();
        let close = parser.advance();
        let mut node = AstNode::open(NodeKind::Text, &open);
        node.value = raw.literal.clone();
        node.close(&close);
        return Ok(node);
    }

    let open_kind = open.kind;
    let open = parser.advance();
    let mut node = AstNode::open(NodeKind::InlinePassthrough, &open);
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in passthrough at {}",
                open.position()
            )));
        }
        match parser.current().kind {
            TokenKind::RawPassthrough => {
                let raw = parser.advance();
                node.value.push_str(&raw.literal);
            }
            TokenKind::Eol if open_kind == TokenKind::QuadruplePlus => {
                parser.advance();
                node.value.push('\n');
            }
            _ => break,
        }
    }
    node.value = node.value.trim_matches('\n').to_string();
    let close = parser.consume_close(
        TokenSpec::Kind(open_kind),
        NodeKind::InlinePassthrough,
        &open,
    )?;
    node.close(&close);
    Ok(node)
}

const INLINE_SPAN_CLASSES: [&str; 2] = ["book-title", "underline"];

pub(crate) fn inline_span_class(parser: &Parser) -> Option<String> {
    if !parser.peek_tokens(&[
        TokenSpec::Kind(TokenKind::LeftBracket),
        TokenSpec::Kind(TokenKind::Dot),
        TokenSpec::Kind(TokenKind::Text),
        TokenSpec::Kind(TokenKind::RightBracket),
        TokenSpec::Kind(TokenKind::Hash),
    ]) {
        return None;
    }
    let class = &parser.look_ahead(2).literal;
    INLINE_SPAN_CLASSES
        .iter()
        .find(|known| *known == class)
        .map(|_| class.clone())
}

/// A left bracket either opens the `[.class]#span#` inline idiom or is
/// plain text; the decision is pure lookahead.
pub fn bracket(parser: &mut Parser) -> Result<AstNode> {
    let Some(class) = inline_span_class(parser) else {
        let token = parser.consume(TokenKind::LeftBracket)?;
        let mut node = AstNode::open(NodeKind::Text, &token);
        node.value = token.literal.clone();
        node.close(&token);
        return Ok(node);
    };

    let open = parser.advance();
    parser.consume(TokenKind::Dot)?;
    parser.consume(TokenKind::Text)?;
    let bracket_close = parser.consume(TokenKind::RightBracket)?;
    parser.consume(TokenKind::Hash)?;

    let mut context = Context::new();
    context.class_list.push(class);
    context.start_token = Some(open.clone());
    context.end_token = Some(bracket_close);

    let mut node = AstNode::open(NodeKind::Inline, &open);
    node.context = Some(context);
    parser.parse_until(&mut node, vec![vec![TokenSpec::Kind(TokenKind::Hash)]])?;
    let close =
        parser.consume_close(TokenSpec::Kind(TokenKind::Hash), NodeKind::Inline, &open)?;
    node.close(&close);
    Ok(node)
}

/// `footnote:[...]`, optionally preceded by a caret reference marker.
///
/// Footnote bodies hold one or more paragraphs separated by the
/// paragraph-split marker, plus embedded backtick-fenced verse.
pub fn footnote(parser: &mut Parser) -> Result<AstNode> {
    let start = parser.current().clone();
    if parser.current().kind == TokenKind::Caret {
        parser.advance();
        parser.consume_if(TokenSpec::Kind(TokenKind::Eol));
    }
    parser.consume(TokenKind::FootnotePrefix)?;
    let open = parser.consume(TokenKind::LeftBracket)?;
    if parser.current().kind == TokenKind::RightBracket {
        return Err(Error::parse("empty footnote", &open));
    }

    let mut node = AstNode::open(NodeKind::Footnote, &start);
    let mut guard = 0;
    loop {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in footnote at {}",
                open.position()
            )));
        }
        if parser.current().kind == TokenKind::Backtick
            && parser.peek().kind == TokenKind::Eol
        {
            let verse = super::elements::poetry::parse_footnote_verse(parser)?;
            node.children.push(verse);
        } else {
            let paragraph_start = parser.current().clone();
            let mut paragraph = AstNode::open(NodeKind::Paragraph, &paragraph_start);
            parser.parse_until(
                &mut paragraph,
                vec![
                    vec![TokenSpec::Kind(TokenKind::FootnoteParagraphSplit)],
                    vec![TokenSpec::Kind(TokenKind::RightBracket)],
                    vec![TokenSpec::Kind(TokenKind::Backtick), TokenSpec::Kind(TokenKind::Eol)],
                ],
            )?;
            paragraph.close(&parser.previous());
            node.children.push(paragraph);
        }
        if parser.current().kind == TokenKind::FootnoteParagraphSplit {
            parser.advance();
            parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
            parser.consume_if(TokenSpec::Kind(TokenKind::Eol));
            parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
        } else if parser.current().kind != TokenKind::Backtick {
            break;
        }
    }
    let close = parser.consume_close(
        TokenSpec::Kind(TokenKind::RightBracket),
        NodeKind::Footnote,
        &open,
    )?;
    node.close(&close);
    Ok(node)
}

/// `<<target>>` and `<<target, text>>` cross-references.
///
/// The reserved display text LINKABLE-BACK does not render; it records a
/// back-link source for the target instead.
pub fn xref(parser: &mut Parser) -> Result<AstNode> {
    let open = parser.consume(TokenKind::XrefOpen)?;
    let mut node = AstNode::open(NodeKind::Xref, &open);

    let mut target = String::new();
    let mut guard = 0;
    while !matches!(
        parser.current().kind,
        TokenKind::Comma | TokenKind::XrefClose
    ) && !parser.current().kind.is_eox()
    {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in xref at {}",
                open.position()
            )));
        }
        target.push_str(&parser.advance().literal);
    }

    let mut linkable_back = false;
    if parser.current().kind == TokenKind::Comma {
        parser.advance();
        parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
        let mut display = String::new();
        while parser.current().kind != TokenKind::XrefClose
            && !parser.current().kind.is_eox()
        {
            guard += 1;
            if guard > LOOP_GUARD_LIMIT {
                return Err(Error::invariant(format!(
                    "runaway loop in xref at {}",
                    open.position()
                )));
            }
            display.push_str(&parser.advance().literal);
        }
        if display.trim_end() == "LINKABLE-BACK" {
            linkable_back = true;
        } else {
            node.value = display.trim_end().to_string();
        }
    }

    let close = parser.consume_close(
        TokenSpec::Kind(TokenKind::XrefClose),
        NodeKind::Xref,
        &open,
    )?;
    if linkable_back {
        parser.register_xref_source(&target);
    }
    node.meta.xref = Some(XrefMeta {
        target,
        linkable_back,
    });
    node.close(&close);
    Ok(node)
}
