//! The adoc parsing pipeline
//!
//!     Raw text goes through three stages: the lexer produces a flat token
//!     stream with line/column/filename metadata, the parser core buffers
//!     that stream behind an arbitrary-distance lookahead cursor, and the
//!     structural parsers recursively assemble the AST by driving the
//!     inline parselet dispatch table through `parse_until`.
//!
//!     raw text -> Lexer -> tokens -> Parser (stop-stack + parselets) -> AST
//!
//! Source Position Preservation
//!
//!     Every token carries a 1-based line number and 1-based start/end
//!     columns, plus the filename of the input unit it came from. Every AST
//!     node records the inclusive (start token, end token) span of the
//!     source it covers. Nothing downstream of the lexer recomputes
//!     positions; they are threaded through construction and must be set on
//!     every node before it escapes its constructing function.
//!
//! Error Model
//!
//!     Grammar violations (bad input) abort the parse with a single
//!     [ParseError](error::ParseError) carrying the offending span. Guard
//!     trips and dispatch misses (implementation faults) surface as the
//!     distinct [Error::Invariant](error::Error) category. There is no
//!     recovery and no partial tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod testing;
pub mod token;

use ast::Document;
use error::Error;
use lexer::{InputUnit, Lexer};
use parser::Parser;

/// Parse a single source text into a document.
pub fn parse_document(text: &str) -> Result<Document, Error> {
    Parser::new(Lexer::from_text(text)).parse()
}

/// Parse a sequence of input units (one per source file) into a document.
///
/// Units are concatenated in order; each contributes one chapter boundary
/// via its terminal EOF token.
pub fn parse_units(units: Vec<InputUnit>) -> Result<Document, Error> {
    Parser::new(Lexer::new(units)).parse()
}
