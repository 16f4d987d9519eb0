//! JSON serialization of the AST
//!
//! The contract, relied on by snapshot-style tests: `type` is always
//! present; `context` only if the node has one; `value` only if
//! non-empty; `children` only if non-empty; `meta` only if it has at
//! least one annotation; `startToken`/`endToken` only when requested.
//! The document serializes its `epigraphs` ahead of the base fields.

use serde_json::{json, Map, Value};

use crate::adoc::ast::context::Context;
use crate::adoc::ast::document::Document;
use crate::adoc::ast::node::{AstNode, NodeMeta};
use crate::adoc::token::Token;

pub fn node_to_json(node: &AstNode, with_tokens: bool) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(node.kind.as_str()));
    if let Some(context) = &node.context {
        map.insert("context".to_string(), context_to_json(context, with_tokens));
    }
    if !node.value.is_empty() {
        map.insert("value".to_string(), json!(node.value));
    }
    if !node.children.is_empty() {
        let children: Vec<Value> = node
            .children
            .iter()
            .map(|child| node_to_json(child, with_tokens))
            .collect();
        map.insert("children".to_string(), Value::Array(children));
    }
    if let Some(meta) = meta_to_json(&node.meta) {
        map.insert("meta".to_string(), meta);
    }
    if with_tokens {
        insert_span(&mut map, &node.start_token, &node.end_token);
    }
    Value::Object(map)
}

pub fn document_to_json(document: &Document, with_tokens: bool) -> Value {
    let mut map = Map::new();
    let epigraphs: Vec<Value> = document
        .epigraphs
        .iter()
        .map(|node| node_to_json(node, with_tokens))
        .collect();
    map.insert("epigraphs".to_string(), Value::Array(epigraphs));
    if let Value::Object(base) = node_to_json(&document.root, with_tokens) {
        for (key, value) in base {
            map.insert(key, value);
        }
    }
    if !document.id_chapter_locations.is_empty() {
        map.insert(
            "idChapterLocations".to_string(),
            json!(document.id_chapter_locations),
        );
    }
    Value::Object(map)
}

fn context_to_json(context: &Context, with_tokens: bool) -> Value {
    let mut map = Map::new();
    map.insert("classList".to_string(), json!(context.class_list));
    if let Some(kind) = context.kind {
        map.insert("type".to_string(), json!(kind.as_str()));
    }
    if let Some(id) = &context.id {
        map.insert("id".to_string(), json!(id));
    }
    if !context.quote_attribution.is_empty() {
        map.insert(
            "quoteAttribution".to_string(),
            tokens_to_json(&context.quote_attribution),
        );
    }
    if !context.quote_source.is_empty() {
        map.insert(
            "quoteSource".to_string(),
            tokens_to_json(&context.quote_source),
        );
    }
    if !context.short_title.is_empty() {
        map.insert(
            "shortTitle".to_string(),
            tokens_to_json(&context.short_title),
        );
    }
    if with_tokens {
        insert_span(&mut map, &context.start_token, &context.end_token);
    }
    Value::Object(map)
}

fn meta_to_json(meta: &NodeMeta) -> Option<Value> {
    if meta.is_empty() {
        return None;
    }
    let mut map = Map::new();
    if let Some(sub_type) = meta.sub_type {
        map.insert("subType".to_string(), json!(sub_type.as_str()));
    }
    if let Some(level) = meta.level {
        map.insert("level".to_string(), json!(level));
    }
    if let Some(sequence) = &meta.sequence {
        map.insert(
            "sequence".to_string(),
            json!({ "number": sequence.number, "roman": sequence.roman }),
        );
    }
    if let Some(xref) = &meta.xref {
        map.insert(
            "xref".to_string(),
            json!({ "target": xref.target, "linkableBack": xref.linkable_back }),
        );
    }
    Some(Value::Object(map))
}

fn tokens_to_json(tokens: &[Token]) -> Value {
    json!(tokens)
}

fn insert_span(map: &mut Map<String, Value>, start: &Option<Token>, end: &Option<Token>) {
    if let Some(start) = start {
        map.insert("startToken".to_string(), json!(start));
    }
    if let Some(end) = end {
        map.insert("endToken".to_string(), json!(end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::node::NodeKind;

    #[test]
    fn test_empty_fields_are_omitted() {
        let node = AstNode::new(NodeKind::Paragraph);
        let value = node_to_json(&node, false);
        assert_eq!(value, json!({ "type": "PARAGRAPH" }));
    }

    #[test]
    fn test_value_and_children_appear_when_set() {
        let mut text = AstNode::new(NodeKind::Text);
        text.value = "Hello".to_string();
        let mut paragraph = AstNode::new(NodeKind::Paragraph);
        paragraph.children.push(text);
        assert_eq!(
            node_to_json(&paragraph, false),
            json!({
                "type": "PARAGRAPH",
                "children": [{ "type": "TEXT", "value": "Hello" }],
            })
        );
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let mut node = AstNode::new(NodeKind::Block);
        node.meta.sub_type = Some(crate::adoc::ast::node::SubType::Open);
        let first = node_to_json(&node, false);
        let second = node_to_json(&node, false);
        assert_eq!(first, second);
    }
}
