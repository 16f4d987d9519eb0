//! Error types for lexing and parsing
//!
//! Two categories exist and never mix: [ParseError] is caused by bad
//! input and carries the offending source span; [Error::Invariant] is an
//! implementation fault (dispatch miss, runaway loop, missing node span)
//! and indicates a grammar gap rather than a user mistake. Both abort
//! the current parse; neither is caught internally.

use std::fmt;

use crate::adoc::token::Token;

/// A grammar violation in the input, fatal to the current parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub filename: Option<String>,
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl ParseError {
    /// Build a parse error pointing at a token's source span
    pub fn at(message: impl Into<String>, token: &Token) -> Self {
        ParseError {
            message: message.into(),
            filename: token.filename.clone(),
            line: token.line,
            column_start: token.column.start,
            column_end: token.column.end,
        }
    }

    /// Render a numbered source excerpt around the error, with a >>
    /// marker on the offending line and a caret run under the span.
    ///
    /// Shows up to 2 lines of context on either side.
    pub fn code_frame(&self, source: &str) -> String {
        let lines: Vec<&str> = source.lines().collect();
        if self.line == 0 || self.line > lines.len() {
            return String::new();
        }
        let error_line = self.line - 1;
        let first = error_line.saturating_sub(2);
        let last = (error_line + 3).min(lines.len());

        let mut frame = String::new();
        for number in first..last {
            let marker = if number == error_line { ">>" } else { "  " };
            frame.push_str(&format!("{} {:3} | {}\n", marker, number + 1, lines[number]));
        }
        if self.column_end > self.column_start {
            let pad = " ".repeat(9 + self.column_start.saturating_sub(1));
            let carets = "^".repeat(self.column_end - self.column_start);
            frame.push_str(&format!("{}{}\n", pad, carets));
        }
        frame
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(
                f,
                "parse error at {}:{}:{}: {}",
                name, self.line, self.column_start, self.message
            ),
            None => write!(
                f,
                "parse error at {}:{}: {}",
                self.line, self.column_start, self.message
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Any failure produced by the adoc pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// User-input grammar violation
    Parse(ParseError),
    /// Implementation fault: grammar gap, guard trip, or span violation
    Invariant(String),
}

impl Error {
    pub fn parse(message: impl Into<String>, token: &Token) -> Self {
        Error::Parse(ParseError::at(message, token))
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Error::Invariant(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Parse(err) => &err.message,
            Error::Invariant(message) => message,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Invariant(message) => write!(f, "invariant violation: {}", message),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the parser
pub type Result<T> = std::result::Result<T, Error>;
