//! AST definitions for parsed adoc documents
//!
//!     The tree is built from one concrete node type, [AstNode], tagged
//!     with a closed [NodeKind] enumeration. Children are owned
//!     exclusively by their parent; there are no back-edges. Upward
//!     lookups are served by [AstNode::walk], which hands visitors each
//!     node together with its ancestor stack.
//!
//! Spans
//!
//!     Every node records the inclusive (start token, end token) span of
//!     the source it covers. A node must have both set before it escapes
//!     its constructing function; the testing module walks finished trees
//!     and asserts this.
//!
//! Metadata
//!
//!     Node annotations are a small closed set of typed optional fields
//!     ([NodeMeta]) rather than a stringly-typed bag: block subtype,
//!     heading level, heading sequence number with its roman-numeral
//!     form, and cross-reference target/flag.
//!
//! Serialization
//!
//!     [Document::to_json] and [node_to_json] implement the stable
//!     serialization contract: `type` always; `context`, `value`,
//!     `children`, `meta` only when present/non-empty; span tokens only
//!     on request.

pub mod context;
pub mod document;
pub mod json;
pub mod node;

pub use context::{Context, ContextKind};
pub use document::Document;
pub use json::node_to_json;
pub use node::{AstNode, NodeKind, NodeMeta, SequenceMeta, SubType, XrefMeta};
