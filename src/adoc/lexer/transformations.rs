//! Transformation passes over raw token streams
//!
//!     Each pass is a pure function from a raw token stream to a raw
//!     token stream. Byte ranges are merged or dropped but never shifted,
//!     so position assignment downstream stays exact.

use std::ops::Range;

use crate::adoc::lexer::RawToken;
use crate::adoc::token::TokenKind;

/// Capture +++/++++ passthrough interiors as RAW_PASSTHROUGH tokens.
///
/// Inline (`+++`) interiors become a single token; block (`++++`)
/// interiors become one token per physical line, with EOL tokens kept
/// between them. An opening delimiter with no closing partner is left
/// untouched and surfaces later as a parse error.
pub fn capture_passthroughs(tokens: Vec<RawToken>, source: &str) -> Vec<RawToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let kind = tokens[i].0;
        let closing = match kind {
            TokenKind::TriplePlus => find_closing(&tokens, i, TokenKind::TriplePlus),
            TokenKind::QuadruplePlus => find_closing(&tokens, i, TokenKind::QuadruplePlus),
            _ => None,
        };
        match closing {
            Some(j) => {
                let interior = tokens[i].1.end..tokens[j].1.start;
                out.push(tokens[i].clone());
                if kind == TokenKind::QuadruplePlus {
                    push_block_lines(&mut out, source, interior);
                } else if !interior.is_empty() {
                    out.push((TokenKind::RawPassthrough, interior));
                }
                out.push(tokens[j].clone());
                i = j + 1;
            }
            None => {
                out.push(tokens[i].clone());
                i += 1;
            }
        }
    }
    out
}

fn find_closing(tokens: &[RawToken], open: usize, kind: TokenKind) -> Option<usize> {
    tokens[open + 1..]
        .iter()
        .position(|(k, _)| *k == kind)
        .map(|offset| open + 1 + offset)
}

/// Split a block-passthrough interior into per-line RAW_PASSTHROUGH
/// tokens, preserving the EOL tokens between them
fn push_block_lines(out: &mut Vec<RawToken>, source: &str, interior: Range<usize>) {
    let mut cursor = interior.start;
    for (offset, byte) in source[interior.clone()].bytes().enumerate() {
        if byte == b'\n' {
            let at = interior.start + offset;
            if cursor < at {
                out.push((TokenKind::RawPassthrough, cursor..at));
            }
            out.push((TokenKind::Eol, at..at + 1));
            cursor = at + 1;
        }
    }
    if cursor < interior.end {
        out.push((TokenKind::RawPassthrough, cursor..interior.end));
    }
}

/// Discard line-initial // comments, including their terminating newline
pub fn strip_comments(tokens: Vec<RawToken>) -> Vec<RawToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    let mut line_start = true;
    while i < tokens.len() {
        if line_start
            && tokens[i].0 == TokenKind::ForwardSlash
            && tokens.get(i + 1).map(|t| t.0) == Some(TokenKind::ForwardSlash)
        {
            while i < tokens.len() && tokens[i].0 != TokenKind::Eol {
                i += 1;
            }
            if i < tokens.len() {
                i += 1; // the comment owns its newline
            }
            continue;
        }
        line_start = tokens[i].0 == TokenKind::Eol;
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// Downgrade a FOOTNOTE_PREFIX not immediately followed by [ to plain
/// text; the literal is unchanged
pub fn downgrade_footnote_prefix(mut tokens: Vec<RawToken>) -> Vec<RawToken> {
    for i in 0..tokens.len() {
        if tokens[i].0 == TokenKind::FootnotePrefix
            && tokens.get(i + 1).map(|t| t.0) != Some(TokenKind::LeftBracket)
        {
            tokens[i].0 = TokenKind::Text;
        }
    }
    tokens
}

/// Fuse two consecutive EOLs into one DOUBLE_EOL, pairing left to right
pub fn pair_double_newlines(tokens: Vec<RawToken>) -> Vec<RawToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].0 == TokenKind::Eol && tokens.get(i + 1).map(|t| t.0) == Some(TokenKind::Eol)
        {
            out.push((TokenKind::DoubleEol, tokens[i].1.start..tokens[i + 1].1.end));
            i += 2;
        } else {
            out.push(tokens[i].clone());
            i += 1;
        }
    }
    out
}
