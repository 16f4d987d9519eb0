//! Lexer
//!
//!     This module orchestrates the tokenization pipeline for the adoc
//!     dialect. Raw tokenization is handled entirely by logos; everything
//!     context-sensitive happens in ordered transformation passes, each
//!     receiving a raw token stream and returning a raw token stream.
//!
//! The Lexing Pipeline
//!
//!     The pipeline, per input unit, consists of:
//!         1. Core tokenization using the logos lexer. Characters the
//!            token table does not recognize become one-character TEXT
//!            tokens instead of lex errors.
//!         2. Passthrough capture. Everything between +++/++++ delimiter
//!            pairs is re-emitted verbatim as RAW_PASSTHROUGH token(s),
//!            one per physical line inside a ++++ block. This runs first
//!            so later passes never look inside raw content.
//!         3. Comment stripping. A line-initial // consumes the line and
//!            its newline, producing no tokens.
//!         4. footnote: downgrade. A FOOTNOTE_PREFIX not immediately
//!            followed by [ is plain text.
//!         5. Newline pairing. Two consecutive EOLs fuse into one
//!            DOUBLE_EOL (left to right, so three newlines produce
//!            DOUBLE_EOL then EOL).
//!
//!     After the passes, byte spans are converted to 1-based line/column
//!     positions and each token is stamped with the unit's filename. One
//!     EOF token terminates each unit; a single synthetic EOD terminates
//!     the whole stream.
//!
//! Source Position Preservation
//!
//!     Logos tokens carry the byte range of their source text. The passes
//!     merge and drop ranges but never shift them, so the final
//!     line/column assignment is exact for every surviving token.

pub mod transformations;

use std::collections::VecDeque;
use std::ops::Range;

use logos::Logos;

use crate::adoc::token::{Column, Token, TokenKind};

/// A raw token: kind plus byte range into the unit's source
pub type RawToken = (TokenKind, Range<usize>);

/// One source input (typically one file) to be lexed
#[derive(Debug, Clone)]
pub struct InputUnit {
    pub text: String,
    pub filename: Option<String>,
}

impl InputUnit {
    pub fn new(text: impl Into<String>) -> Self {
        InputUnit {
            text: text.into(),
            filename: None,
        }
    }

    pub fn named(text: impl Into<String>, filename: impl Into<String>) -> Self {
        InputUnit {
            text: text.into(),
            filename: Some(filename.into()),
        }
    }
}

/// Tokenizes one or more input units into a single token stream
pub struct Lexer {
    units: Vec<InputUnit>,
    queue: VecDeque<Token>,
}

impl Lexer {
    pub fn new(units: Vec<InputUnit>) -> Self {
        let queue = tokenize_units(&units).into();
        Lexer { units, queue }
    }

    pub fn from_text(text: &str) -> Self {
        Lexer::new(vec![InputUnit::new(text)])
    }

    /// Full eager tokenization. Restartable: a deterministic pure
    /// function of the inputs, independent of `next_token` consumption.
    pub fn tokens(&self) -> Vec<Token> {
        tokenize_units(&self.units)
    }

    /// Pull one token, destructively. Once the stream is exhausted this
    /// keeps returning EOD.
    pub fn next_token(&mut self) -> Token {
        self.queue.pop_front().unwrap_or_else(eod_token)
    }
}

fn eod_token() -> Token {
    Token::new(
        TokenKind::Eod,
        "",
        None,
        0,
        Column { start: 0, end: 0 },
    )
}

/// Tokenize all units, appending one EOF per unit and a final EOD
pub fn tokenize_units(units: &[InputUnit]) -> Vec<Token> {
    let mut out = Vec::new();
    for unit in units {
        tokenize_unit(unit, &mut out);
    }
    out.push(eod_token());
    out
}

fn tokenize_unit(unit: &InputUnit, out: &mut Vec<Token>) {
    let source = unit.text.as_str();
    let raw = raw_tokens(source);
    let raw = transformations::capture_passthroughs(raw, source);
    let raw = transformations::strip_comments(raw);
    let raw = transformations::downgrade_footnote_prefix(raw);
    let raw = transformations::pair_double_newlines(raw);

    let index = LineIndex::new(source);
    for (kind, span) in raw {
        let literal = &source[span.clone()];
        let (line, start) = index.position(span.start);
        let column = Column {
            start,
            end: start + literal.chars().count(),
        };
        out.push(Token::new(
            kind,
            literal,
            unit.filename.clone(),
            line,
            column,
        ));
    }

    // The terminal EOF bears the unit's filename and final position
    let (line, col) = index.position(source.len());
    out.push(Token::new(
        TokenKind::Eof,
        "",
        unit.filename.clone(),
        line,
        Column { start: col, end: col },
    ));
}

/// The raw logos pass: every character of the source becomes part of
/// exactly one token
fn raw_tokens(source: &str) -> Vec<RawToken> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push((result.unwrap_or(TokenKind::Text), lexer.span()));
    }
    tokens
}

/// Byte offset to 1-based line/column conversion
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i + 1);
            }
        }
        LineIndex { starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|start| *start <= offset);
        let column = offset - self.starts[line - 1] + 1;
        (line, column)
    }
}
