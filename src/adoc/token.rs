//! Token definitions for the adoc dialect
//!
//! This module defines all the tokens that can be produced by the adoc
//! lexer. The raw token shapes are defined using the logos derive macro;
//! a handful of kinds (DOUBLE_EOL, EOF, EOD, RAW_PASSTHROUGH) carry no
//! pattern because they are synthesized by the lexer's transformation
//! passes rather than matched against source text.
//!
//! Arity-sensitive lexemes (underscore runs, equals runs) fuse into a
//! single token whose literal preserves the full run; the parser, not the
//! lexer, decides what a given run length means.

use logos::Logos;
use serde::Serialize;

/// All possible token kinds in the adoc dialect
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Structural markers
    #[token("\n")]
    Eol,
    /// Synthesized from two consecutive EOLs (paragraph break)
    DoubleEol,
    /// Synthetic: terminates each input unit
    Eof,
    /// Synthetic: terminates the whole token stream, never consumed by
    /// grammar productions except as a stop sentinel
    Eod,

    // Whitespace runs of any length are a single token
    #[regex(r"[ \t]+")]
    Whitespace,

    // Markup operators
    #[token("*")]
    Asterisk,
    #[token("**")]
    DoubleAsterisk,
    #[token("***")]
    TripleAsterisk,
    // 1/2/3/4+ underscores all lex as one UNDERSCORE token; literal
    // length disambiguates emphasis vs redaction vs block delimiter at
    // the parser level
    #[regex(r"_+")]
    Underscore,
    #[token("--")]
    DoubleDash,
    // Run length = heading level (or the ==== example-block delimiter)
    #[regex(r"=+")]
    Equals,
    #[token("+++")]
    TriplePlus,
    #[token("++++")]
    QuadruplePlus,
    #[token("#")]
    Hash,
    #[token("^")]
    Caret,
    #[token("`")]
    Backtick,
    #[token("|")]
    Pipe,

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    QuestionMark,
    #[token("!")]
    ExclamationMark,
    #[token("/")]
    ForwardSlash,

    // Brackets and quotes
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("(")]
    LeftParens,
    #[token(")")]
    RightParens,
    #[token("'")]
    StraightSingleQuote,
    #[token("\"")]
    StraightDoubleQuote,
    #[token("'`")]
    LeftSingleCurly,
    #[token("`'")]
    RightSingleCurly,
    #[token("\"`")]
    LeftDoubleCurly,
    #[token("`\"")]
    RightDoubleCurly,

    // Composite lexemes
    #[token("footnote:")]
    FootnotePrefix,
    // Spaced dash-run poetry-stanza separator inside footnotes
    #[regex(r"-( -){2,}")]
    FootnoteStanza,
    #[token("{footnote-paragraph-split}")]
    FootnoteParagraphSplit,
    #[regex(r"&[a-zA-Z]+;|&#[0-9]+;")]
    Entity,
    /// Synthetic: verbatim content captured between +++/++++ delimiters
    RawPassthrough,
    #[token("'''")]
    ThematicBreak,
    #[token("<<")]
    XrefOpen,
    #[token(">>")]
    XrefClose,

    // Currency/degree symbols
    #[token("\u{00B0}")]
    Degree,
    #[token("\u{00A3}")]
    Pound,
    #[token("$")]
    Dollar,

    // Free text. Embedded `:` and `-` between word characters stay in
    // the run (`1:4-5` is one token) while `--` still fuses separately.
    // Any character the table does not recognize lexes as a
    // one-character TEXT token via the lexer's error fallback.
    #[regex(r"[\p{Alphabetic}\p{Nd}]+([:\-][\p{Alphabetic}\p{Nd}]+)*")]
    Text,
}

impl TokenKind {
    /// True for any end-of-line/file/document boundary (the EOX class)
    pub fn is_eox(&self) -> bool {
        matches!(
            self,
            TokenKind::Eol | TokenKind::DoubleEol | TokenKind::Eof | TokenKind::Eod
        )
    }

    /// Token name as it appears in diagnostics and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Eol => "EOL",
            TokenKind::DoubleEol => "DOUBLE_EOL",
            TokenKind::Eof => "EOF",
            TokenKind::Eod => "EOD",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::DoubleAsterisk => "DOUBLE_ASTERISK",
            TokenKind::TripleAsterisk => "TRIPLE_ASTERISK",
            TokenKind::Underscore => "UNDERSCORE",
            TokenKind::DoubleDash => "DOUBLE_DASH",
            TokenKind::Equals => "EQUALS",
            TokenKind::TriplePlus => "TRIPLE_PLUS",
            TokenKind::QuadruplePlus => "QUADRUPLE_PLUS",
            TokenKind::Hash => "HASH",
            TokenKind::Caret => "CARET",
            TokenKind::Backtick => "BACKTICK",
            TokenKind::Pipe => "PIPE",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::DoubleColon => "DOUBLE_COLON",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::QuestionMark => "QUESTION_MARK",
            TokenKind::ExclamationMark => "EXCLAMATION_MARK",
            TokenKind::ForwardSlash => "FORWARD_SLASH",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::LeftParens => "LEFT_PARENS",
            TokenKind::RightParens => "RIGHT_PARENS",
            TokenKind::StraightSingleQuote => "STRAIGHT_SINGLE_QUOTE",
            TokenKind::StraightDoubleQuote => "STRAIGHT_DOUBLE_QUOTE",
            TokenKind::LeftSingleCurly => "LEFT_SINGLE_CURLY",
            TokenKind::RightSingleCurly => "RIGHT_SINGLE_CURLY",
            TokenKind::LeftDoubleCurly => "LEFT_DOUBLE_CURLY",
            TokenKind::RightDoubleCurly => "RIGHT_DOUBLE_CURLY",
            TokenKind::FootnotePrefix => "FOOTNOTE_PREFIX",
            TokenKind::FootnoteStanza => "FOOTNOTE_STANZA",
            TokenKind::FootnoteParagraphSplit => "FOOTNOTE_PARAGRAPH_SPLIT",
            TokenKind::Entity => "ENTITY",
            TokenKind::RawPassthrough => "RAW_PASSTHROUGH",
            TokenKind::ThematicBreak => "THEMATIC_BREAK",
            TokenKind::XrefOpen => "XREF_OPEN",
            TokenKind::XrefClose => "XREF_CLOSE",
            TokenKind::Degree => "DEGREE",
            TokenKind::Pound => "POUND",
            TokenKind::Dollar => "DOLLAR",
            TokenKind::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based start/end columns. End column = start + literal length
/// (half-open by convention for multi-character literals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub start: usize,
    pub end: usize,
}

/// One lexed token, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub line: usize,
    pub column: Column,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        filename: Option<String>,
        line: usize,
        column: Column,
    ) -> Self {
        Token {
            kind,
            literal: literal.into(),
            filename,
            line,
            column,
        }
    }

    /// Formatted source position for diagnostics, e.g. `intro.adoc:3:7`
    pub fn position(&self) -> String {
        match &self.filename {
            Some(name) => format!("{}:{}:{}", name, self.line, self.column.start),
            None => format!("{}:{}", self.line, self.column.start),
        }
    }
}

/// A lookahead matcher against one token.
///
/// `Eox` is virtual: it matches any of EOL/DOUBLE_EOL/EOF/EOD and never
/// corresponds to a stored token kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenSpec {
    Kind(TokenKind),
    Lit(TokenKind, &'static str),
    Eox,
}

impl TokenSpec {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            TokenSpec::Kind(kind) => token.kind == *kind,
            TokenSpec::Lit(kind, literal) => token.kind == *kind && token.literal == *literal,
            TokenSpec::Eox => token.kind.is_eox(),
        }
    }

    /// Human-readable form used in "expected X" diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenSpec::Kind(kind) => kind.as_str().to_string(),
            TokenSpec::Lit(kind, literal) => format!("{}({:?})", kind.as_str(), literal),
            TokenSpec::Eox => "EOX".to_string(),
        }
    }
}

impl From<TokenKind> for TokenSpec {
    fn from(kind: TokenKind) -> Self {
        TokenSpec::Kind(kind)
    }
}
