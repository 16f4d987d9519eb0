//! The universal tree element and its closed kind/metadata enumerations

use serde::Serialize;

use crate::adoc::ast::context::Context;
use crate::adoc::token::Token;

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Chapter,
    Section,
    Heading,
    HeadingTitle,
    HeadingSequenceIdentifier,
    HeadingSegment,
    Paragraph,
    Emphasis,
    Strong,
    Text,
    Block,
    VerseStanza,
    VerseLine,
    Symbol,
    InlinePassthrough,
    Redacted,
    Inline,
    Footnote,
    Xref,
    Entity,
    DescriptionList,
    DescriptionListItem,
    DescriptionListItemTerm,
    DescriptionListItemContent,
    DiscoursePartIdentifier,
    PostscriptIdentifier,
    ThematicBreak,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Chapter => "CHAPTER",
            NodeKind::Section => "SECTION",
            NodeKind::Heading => "HEADING",
            NodeKind::HeadingTitle => "HEADING_TITLE",
            NodeKind::HeadingSequenceIdentifier => "HEADING_SEQUENCE_IDENTIFIER",
            NodeKind::HeadingSegment => "HEADING_SEGMENT",
            NodeKind::Paragraph => "PARAGRAPH",
            NodeKind::Emphasis => "EMPHASIS",
            NodeKind::Strong => "STRONG",
            NodeKind::Text => "TEXT",
            NodeKind::Block => "BLOCK",
            NodeKind::VerseStanza => "VERSE_STANZA",
            NodeKind::VerseLine => "VERSE_LINE",
            NodeKind::Symbol => "SYMBOL",
            NodeKind::InlinePassthrough => "INLINE_PASSTHROUGH",
            NodeKind::Redacted => "REDACTED",
            NodeKind::Inline => "INLINE",
            NodeKind::Footnote => "FOOTNOTE",
            NodeKind::Xref => "XREF",
            NodeKind::Entity => "ENTITY",
            NodeKind::DescriptionList => "DESCRIPTION_LIST",
            NodeKind::DescriptionListItem => "DESCRIPTION_LIST_ITEM",
            NodeKind::DescriptionListItemTerm => "DESCRIPTION_LIST_ITEM_TERM",
            NodeKind::DescriptionListItemContent => "DESCRIPTION_LIST_ITEM_CONTENT",
            NodeKind::DiscoursePartIdentifier => "DISCOURSE_PART_IDENTIFIER",
            NodeKind::PostscriptIdentifier => "POSTSCRIPT_IDENTIFIER",
            NodeKind::ThematicBreak => "THEMATIC_BREAK",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtype annotations: block shapes, symbol identities, entity identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubType {
    // Block shapes
    Plain,
    Open,
    Example,
    Quote,
    Verse,
    // Symbols
    Emdash,
    LeftDoubleCurly,
    RightDoubleCurly,
    LeftSingleCurly,
    RightSingleCurly,
    Degree,
    Pound,
    Dollar,
    // Entities (Emdash shared with symbols)
    Ellipses,
    Ampersand,
}

impl SubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubType::Plain => "plain",
            SubType::Open => "open",
            SubType::Example => "example",
            SubType::Quote => "quote",
            SubType::Verse => "verse",
            SubType::Emdash => "EMDASH",
            SubType::LeftDoubleCurly => "LEFT_DOUBLE_CURLY",
            SubType::RightDoubleCurly => "RIGHT_DOUBLE_CURLY",
            SubType::LeftSingleCurly => "LEFT_SINGLE_CURLY",
            SubType::RightSingleCurly => "RIGHT_SINGLE_CURLY",
            SubType::Degree => "DEGREE",
            SubType::Pound => "POUND",
            SubType::Dollar => "DOLLAR",
            SubType::Ellipses => "ELLIPSES",
            SubType::Ampersand => "AMPERSAND",
        }
    }
}

/// Heading sequence identifier metadata ("Chapter 3" -> 3 / "III")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceMeta {
    pub number: u32,
    pub roman: String,
}

/// Cross-reference metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XrefMeta {
    pub target: String,
    pub linkable_back: bool,
}

/// Typed node annotations; all fields optional, absent by default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMeta {
    pub sub_type: Option<SubType>,
    pub level: Option<u8>,
    pub sequence: Option<SequenceMeta>,
    pub xref: Option<XrefMeta>,
}

impl NodeMeta {
    pub fn is_empty(&self) -> bool {
        self.sub_type.is_none()
            && self.level.is_none()
            && self.sequence.is_none()
            && self.xref.is_none()
    }
}

/// The universal tree element
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<AstNode>,
    pub context: Option<Context>,
    pub meta: NodeMeta,
    pub start_token: Option<Token>,
    pub end_token: Option<Token>,
}

impl AstNode {
    pub fn new(kind: NodeKind) -> Self {
        AstNode {
            kind,
            value: String::new(),
            children: Vec::new(),
            context: None,
            meta: NodeMeta::default(),
            start_token: None,
            end_token: None,
        }
    }

    /// Construct a node whose span opens at the given token
    pub fn open(kind: NodeKind, start: &Token) -> Self {
        let mut node = AstNode::new(kind);
        node.start_token = Some(start.clone());
        node
    }

    /// Fix the end of the node's span; called immediately before the
    /// node is returned to its caller
    pub fn close(&mut self, end: &Token) {
        self.end_token = Some(end.clone());
    }

    pub fn is_document(&self) -> bool {
        self.kind == NodeKind::Document
    }

    /// True if this node's context carries the given class
    pub fn has_class(&self, name: &str) -> bool {
        self.context
            .as_ref()
            .map(|context| context.has_class(name))
            .unwrap_or(false)
    }

    /// Concatenated value of this node's TEXT descendants (and own value)
    pub fn text_content(&self) -> String {
        let mut out = self.value.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Depth-first traversal. The visitor receives each node together
    /// with its ancestor stack, outermost first; this is the upward
    /// lookup mechanism in lieu of parent pointers.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a AstNode, &[&'a AstNode])) {
        fn go<'a, F: FnMut(&'a AstNode, &[&'a AstNode])>(
            node: &'a AstNode,
            ancestors: &mut Vec<&'a AstNode>,
            visitor: &mut F,
        ) {
            visitor(node, ancestors);
            ancestors.push(node);
            for child in &node.children {
                go(child, ancestors, visitor);
            }
            ancestors.pop();
        }
        go(self, &mut Vec::new(), visitor);
    }
}
