//! Structural parsers
//!
//!     Everything above the inline level: chapters, sections, headings,
//!     blocks and their delimited shapes, context lines, description
//!     lists, and verse. Each parser owns one grammar production and
//!     composes the others; the only shared machinery is the parser core
//!     and the inline dispatch table.

pub mod block;
pub mod chapter;
pub mod context;
pub mod description_list;
pub mod heading;
pub mod poetry;
pub mod section;
