//! Context line parsing
//!
//!     A context line is a bracketed attribute list alone on its own
//!     line: `[quote.epigraph, Penn, Fruits of Solitude]`,
//!     `[#note-12.alt]`, `[verse]`. Its pieces appear in a fixed order:
//!     an optional `short="..."` title, an optional type keyword, an
//!     optional `#id`, any number of `.class` entries, and (for quote
//!     family contexts only) an attribution trailer of up to two
//!     comma-separated values. Every piece is optional;
//!     `[quote, , Source]` with an empty attribution slot is legal.
//!
//!     The produced [Context] attaches to the node being parsed; it is
//!     never a node of its own.

use crate::adoc::ast::{Context, ContextKind};
use crate::adoc::error::{Error, Result};
use crate::adoc::parser::{parselets, Parser, LOOP_GUARD_LIMIT};
use crate::adoc::token::{Token, TokenKind, TokenSpec};

/// True if the current token opens a context line: a line-initial left
/// bracket that is not the `[.class]#span#` inline idiom
pub fn peek_start(parser: &Parser) -> bool {
    parser.current().kind == TokenKind::LeftBracket
        && parser.current().column.start == 1
        && parselets::inline_span_class(parser).is_none()
}

pub fn parse_optional(parser: &mut Parser) -> Result<Option<Context>> {
    if peek_start(parser) {
        Ok(Some(parse(parser)?))
    } else {
        Ok(None)
    }
}

pub fn parse(parser: &mut Parser) -> Result<Context> {
    let open = parser.consume(TokenKind::LeftBracket)?;
    let mut context = Context::new();
    context.start_token = Some(open.clone());

    if parser.peek_tokens(&[
        TokenSpec::Lit(TokenKind::Text, "short"),
        TokenSpec::Lit(TokenKind::Equals, "="),
        TokenSpec::Kind(TokenKind::StraightDoubleQuote),
    ]) {
        parser.advance();
        parser.advance();
        parser.advance();
        context.short_title = quoted_value(parser, &open)?;
        parser.consume_if(TokenSpec::Kind(TokenKind::Comma));
        parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
    }

    if parser.current().kind == TokenKind::Text {
        let keyword = parser.advance();
        context.kind = Some(match keyword.literal.as_str() {
            "quote" => {
                if parser.peek_tokens(&[
                    TokenSpec::Kind(TokenKind::Dot),
                    TokenSpec::Lit(TokenKind::Text, "epigraph"),
                ]) {
                    parser.advance();
                    parser.advance();
                    ContextKind::Epigraph
                } else {
                    ContextKind::Quote
                }
            }
            "verse" => ContextKind::Verse,
            "discrete" => ContextKind::Discrete,
            other => {
                return Err(Error::parse(
                    format!("unexpected context type `{}`", other),
                    &keyword,
                ))
            }
        });
    }

    if parser.current().kind == TokenKind::Hash {
        parser.advance();
        let id = parser.consume(TokenKind::Text)?;
        parser.register_id(&id.literal, &id)?;
        context.id = Some(id.literal);
    }

    let mut guard = 0;
    while parser.current().kind == TokenKind::Dot {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in context classes at {}",
                open.position()
            )));
        }
        parser.advance();
        let class = parser.consume(TokenKind::Text)?;
        context.class_list.push(class.literal);
    }

    if context.is_quote() && parser.current().kind == TokenKind::Comma {
        parser.advance();
        context.quote_attribution = attribution_value(parser, &open)?;
        if parser.current().kind == TokenKind::Comma {
            parser.advance();
            context.quote_source = attribution_value(parser, &open)?;
        }
    }

    let close = parser.consume(TokenKind::RightBracket)?;
    context.end_token = Some(close);
    parser.consume_if(TokenSpec::Kind(TokenKind::Eol));
    Ok(context)
}

/// One attribution slot: raw tokens up to the next comma or the closing
/// bracket, leading and trailing whitespace dropped. Quoted values keep
/// commas.
fn attribution_value(parser: &mut Parser, open: &Token) -> Result<Vec<Token>> {
    parser.consume_if(TokenSpec::Kind(TokenKind::Whitespace));
    if parser.current().kind == TokenKind::StraightDoubleQuote {
        parser.advance();
        return quoted_value(parser, open);
    }
    let mut tokens = Vec::new();
    let mut guard = 0;
    while !matches!(
        parser.current().kind,
        TokenKind::Comma | TokenKind::RightBracket
    ) && !parser.current().kind.is_eox()
    {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in context attribution at {}",
                open.position()
            )));
        }
        tokens.push(parser.advance());
    }
    while tokens
        .last()
        .map(|token| token.kind == TokenKind::Whitespace)
        .unwrap_or(false)
    {
        tokens.pop();
    }
    Ok(tokens)
}

/// Tokens up to a closing straight double quote, which is consumed
fn quoted_value(parser: &mut Parser, open: &Token) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut guard = 0;
    while parser.current().kind != TokenKind::StraightDoubleQuote {
        guard += 1;
        if guard > LOOP_GUARD_LIMIT {
            return Err(Error::invariant(format!(
                "runaway loop in quoted context value at {}",
                open.position()
            )));
        }
        if parser.current().kind.is_eox() {
            return Err(Error::parse(
                "unclosed quoted value in context line",
                parser.current(),
            ));
        }
        tokens.push(parser.advance());
    }
    parser.advance();
    Ok(tokens)
}
