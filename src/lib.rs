//! # adoc
//!
//! A parser for a constrained AsciiDoc dialect.
//!
//! The crate turns source text into a typed, position-tracked abstract
//! syntax tree. See the [adoc] module for the full pipeline documentation.
//!
//! ## Testing
//!
//! Parser tests assert exact AST shape and span integrity. See the
//! [testing module](adoc::testing) for the shared helpers.

pub mod adoc;

pub use adoc::ast::{AstNode, Context, ContextKind, Document, NodeKind, SubType};
pub use adoc::error::{Error, ParseError};
pub use adoc::lexer::{InputUnit, Lexer};
pub use adoc::parser::Parser;
pub use adoc::token::{Column, Token, TokenKind, TokenSpec};
pub use adoc::{parse_document, parse_units};
