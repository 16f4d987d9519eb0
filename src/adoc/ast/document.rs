//! The document node: root of a parsed tree plus document-wide tables

use std::collections::BTreeMap;

use serde_json::Value;

use crate::adoc::ast::json;
use crate::adoc::ast::node::AstNode;

/// A fully parsed document.
///
/// The id table maps context ids to the chapter number they were
/// declared in. It is populated during parsing and only read after the
/// whole document has been parsed, which is what makes forward
/// references resolvable.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root node, kind DOCUMENT; chapters are its children
    pub root: AstNode,
    /// Epigraph blocks, collected here instead of chapter children
    pub epigraphs: Vec<AstNode>,
    /// Cross-reference target table: id -> chapter number
    pub id_chapter_locations: BTreeMap<String, usize>,
}

impl Document {
    pub fn chapters(&self) -> &[AstNode] {
        &self.root.children
    }

    /// Stable serialization for snapshot-style assertions.
    ///
    /// The epigraphs array is serialized ahead of the base node fields;
    /// span tokens appear only when `with_tokens` is set.
    pub fn to_json(&self, with_tokens: bool) -> Value {
        json::document_to_json(self, with_tokens)
    }
}
