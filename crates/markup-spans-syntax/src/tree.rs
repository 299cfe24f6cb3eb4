//! The syntax tree consumed by the classifier.
//!
//! A tree is made of three node shapes:
//!
//! ```text
//! SyntaxTreeNode
//! ├── Span            leaf: kind, start, content, accepted characters
//! ├── Block           ordered children
//! └── TagHelper       attributes addressed by name, then ordered body children
//! ```
//!
//! Nodes own their children; there are no parent pointers. Code that needs a
//! span's parent tracks it while walking down.

use serde::{Deserialize, Serialize};

use crate::kind::{AcceptedCharacters, BlockKind, SpanKind};
use crate::location::{SourceLocation, SourceSpan};

/// A leaf lexical range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub start: SourceLocation,
    pub content: String,
    #[serde(default = "any_characters")]
    pub accepted_characters: AcceptedCharacters,
}

fn any_characters() -> AcceptedCharacters {
    AcceptedCharacters::ANY
}

impl Span {
    pub fn new(
        kind: SpanKind,
        start: SourceLocation,
        content: impl Into<String>,
        accepted_characters: AcceptedCharacters,
    ) -> Self {
        Self {
            kind,
            start,
            content: content.into(),
            accepted_characters,
        }
    }

    /// Length of the content in characters.
    pub fn length(&self) -> usize {
        self.content.chars().count()
    }

    pub fn source_span(&self) -> SourceSpan {
        SourceSpan::from_location(&self.start, self.length())
    }
}

/// A composite node with ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default)]
    pub children: Vec<SyntaxTreeNode>,
}

impl Block {
    pub fn new(kind: BlockKind, children: Vec<SyntaxTreeNode>) -> Self {
        Self { kind, children }
    }

    /// Start of the first child, or the zero location for an empty block.
    pub fn start(&self) -> SourceLocation {
        self.children
            .first()
            .map(SyntaxTreeNode::start)
            .unwrap_or_default()
    }

    /// Sum of the children's lengths.
    pub fn length(&self) -> usize {
        self.children.iter().map(SyntaxTreeNode::length).sum()
    }

    pub fn source_span(&self) -> SourceSpan {
        SourceSpan::from_location(&self.start(), self.length())
    }
}

/// One named attribute of a tag helper. The value is absent for minimized
/// attributes such as `<input disabled>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHelperAttribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<SyntaxTreeNode>,
}

/// Attributes of a tag helper, addressed by name.
///
/// Iteration follows insertion order, which is not document order. Callers
/// that care about layout order must sort values by position themselves.
///
/// Serialized as a list of entries. A list that names an attribute twice
/// deserializes as if each entry were inserted in turn, so the later value
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<TagHelperAttribute>",
    into = "Vec<TagHelperAttribute>"
)]
pub struct TagHelperAttributes {
    entries: Vec<TagHelperAttribute>,
}

impl TagHelperAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for `name`, returning the previous value if the name was
    /// already present. A replaced attribute keeps its original slot.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Option<SyntaxTreeNode>,
    ) -> Option<Option<SyntaxTreeNode>> {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(TagHelperAttribute { name, value });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TagHelperAttribute> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagHelperAttribute> {
        self.entries.iter()
    }

    /// Present values, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &SyntaxTreeNode> {
        self.entries.iter().filter_map(|entry| entry.value.as_ref())
    }
}

impl<N: Into<String>> FromIterator<(N, Option<SyntaxTreeNode>)> for TagHelperAttributes {
    fn from_iter<I: IntoIterator<Item = (N, Option<SyntaxTreeNode>)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl From<Vec<TagHelperAttribute>> for TagHelperAttributes {
    fn from(entries: Vec<TagHelperAttribute>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.name, entry.value))
            .collect()
    }
}

impl From<TagHelperAttributes> for Vec<TagHelperAttribute> {
    fn from(attributes: TagHelperAttributes) -> Self {
        attributes.entries
    }
}

/// An element whose attributes are stored by name.
///
/// Unlike [`Block`], its position is recorded explicitly because the
/// attribute values do not form an ordered child list it could be derived
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHelperBlock {
    pub tag_name: String,
    pub kind: BlockKind,
    pub start: SourceLocation,
    pub length: usize,
    #[serde(default)]
    pub attributes: TagHelperAttributes,
    #[serde(default)]
    pub children: Vec<SyntaxTreeNode>,
}

impl TagHelperBlock {
    pub fn new(tag_name: impl Into<String>, start: SourceLocation, length: usize) -> Self {
        Self {
            tag_name: tag_name.into(),
            kind: BlockKind::Tag,
            start,
            length,
            attributes: TagHelperAttributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Option<SyntaxTreeNode>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<SyntaxTreeNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn source_span(&self) -> SourceSpan {
        SourceSpan::from_location(&self.start, self.length)
    }
}

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyntaxTreeNode {
    Span(Span),
    Block(Block),
    TagHelper(TagHelperBlock),
}

impl SyntaxTreeNode {
    pub fn start(&self) -> SourceLocation {
        match self {
            Self::Span(span) => span.start.clone(),
            Self::Block(block) => block.start(),
            Self::TagHelper(tag_helper) => tag_helper.start.clone(),
        }
    }

    /// Start offset without cloning the location.
    pub fn absolute_index(&self) -> usize {
        match self {
            Self::Span(span) => span.start.absolute_index,
            Self::Block(block) => block
                .children
                .first()
                .map_or(0, SyntaxTreeNode::absolute_index),
            Self::TagHelper(tag_helper) => tag_helper.start.absolute_index,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Self::Span(span) => span.length(),
            Self::Block(block) => block.length(),
            Self::TagHelper(tag_helper) => tag_helper.length,
        }
    }

    pub fn source_span(&self) -> SourceSpan {
        match self {
            Self::Span(span) => span.source_span(),
            Self::Block(block) => block.source_span(),
            Self::TagHelper(tag_helper) => tag_helper.source_span(),
        }
    }

    pub fn as_span(&self) -> Option<&Span> {
        match self {
            Self::Span(span) => Some(span),
            _ => None,
        }
    }

    /// Number of spans reachable from this node, attribute values included.
    pub fn span_count(&self) -> usize {
        match self {
            Self::Span(_) => 1,
            Self::Block(block) => block.children.iter().map(Self::span_count).sum(),
            Self::TagHelper(tag_helper) => {
                tag_helper
                    .attributes
                    .values()
                    .map(Self::span_count)
                    .sum::<usize>()
                    + tag_helper.children.iter().map(Self::span_count).sum::<usize>()
            }
        }
    }
}

impl From<Span> for SyntaxTreeNode {
    fn from(span: Span) -> Self {
        Self::Span(span)
    }
}

impl From<Block> for SyntaxTreeNode {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<TagHelperBlock> for SyntaxTreeNode {
    fn from(tag_helper: TagHelperBlock) -> Self {
        Self::TagHelper(tag_helper)
    }
}
