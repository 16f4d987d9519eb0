//! Attribute metadata parsed from `[...]` context lines

use crate::adoc::token::Token;

/// The recognized context type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Quote,
    Verse,
    Epigraph,
    Discrete,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Quote => "quote",
            ContextKind::Verse => "verse",
            ContextKind::Epigraph => "epigraph",
            ContextKind::Discrete => "discrete",
        }
    }
}

/// Attribute metadata attached to a chapter/section/block/heading node.
///
/// Owned exclusively by the node it decorates. The attribution, source
/// and short-title fields keep their raw token spans; they are rendered
/// later, never re-parsed into subtrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub class_list: Vec<String>,
    pub kind: Option<ContextKind>,
    pub id: Option<String>,
    pub quote_attribution: Vec<Token>,
    pub quote_source: Vec<Token>,
    pub short_title: Vec<Token>,
    pub start_token: Option<Token>,
    pub end_token: Option<Token>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_list.iter().any(|class| class == name)
    }

    /// Quote and epigraph contexts share the ____ delimiter grammar
    pub fn is_quote(&self) -> bool {
        matches!(self.kind, Some(ContextKind::Quote) | Some(ContextKind::Epigraph))
    }

    pub fn is_epigraph(&self) -> bool {
        self.kind == Some(ContextKind::Epigraph)
    }

    pub fn is_verse(&self) -> bool {
        self.kind == Some(ContextKind::Verse)
    }
}
