//! # Builder - Event-Based Tree Construction
//!
//! Callers describe a tree as a flat list of [`Event`]s in document order and
//! the [`Sink`] builds the nodes. Because span text flows through the sink in
//! order, the sink is the one place that computes source locations: callers
//! never write offsets, line numbers or lengths by hand.
//!
//! [`TreeBuilder`] wraps event emission with closures so nesting mirrors the
//! tree shape:
//!
//! ```
//! use markup_spans_syntax::{BlockKind, SpanKind, TreeBuilder};
//!
//! let mut builder = TreeBuilder::with_file_path("Index.cshtml");
//! builder.block(BlockKind::Statement, |b| {
//!     b.span(SpanKind::Transition, "@");
//!     b.span(SpanKind::Code, "x");
//! });
//! let tree = builder.finish().unwrap();
//! assert_eq!(tree.span_count(), 2);
//! ```

pub mod event;
pub mod sink;

use thiserror::Error;

use crate::kind::{AcceptedCharacters, BlockKind, SpanKind};
use crate::tree::SyntaxTreeNode;
use event::Event;
use sink::Sink;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("span '{content}' at offset {absolute_index} is not inside a block")]
    SpanOutsideBlock {
        content: String,
        absolute_index: usize,
    },

    #[error("attribute '{name}' is not inside a tag helper")]
    AttributeOutsideTagHelper { name: String },

    #[error("unclassified text at offset {absolute_index} is not directly inside a tag helper or attribute")]
    UnclassifiedOutsideTagHelper { absolute_index: usize },

    #[error("finish at offset {absolute_index} has no open node to close")]
    UnbalancedFinish { absolute_index: usize },

    #[error("{depth} node(s) were never finished")]
    UnclosedNode { depth: usize },

    #[error("events describe more than one root node")]
    MultipleRoots,

    #[error("events describe no nodes")]
    EmptyDocument,
}

/// Accumulates events and hands them to a [`Sink`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    file_path: Option<String>,
    events: Vec<Event>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every location with `file_path`.
    pub fn with_file_path(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: Event) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn block(&mut self, kind: BlockKind, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.push(Event::block(kind));
        body(self);
        self.push(Event::Finish)
    }

    pub fn tag_helper(&mut self, tag_name: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.push(Event::tag_helper(tag_name));
        body(self);
        self.push(Event::Finish)
    }

    pub fn attribute(&mut self, name: &str, value: impl FnOnce(&mut Self)) -> &mut Self {
        self.push(Event::attribute(name));
        value(self);
        self.push(Event::Finish)
    }

    pub fn empty_attribute(&mut self, name: &str) -> &mut Self {
        self.push(Event::EmptyAttribute {
            name: name.to_string(),
        })
    }

    /// Advance over tag markup that produces no span.
    pub fn unclassified(&mut self, text: &str) -> &mut Self {
        self.push(Event::Unclassified {
            text: text.to_string(),
        })
    }

    /// Add a span that accepts any character.
    pub fn span(&mut self, kind: SpanKind, text: &str) -> &mut Self {
        self.push(Event::span(kind, text))
    }

    pub fn span_with(
        &mut self,
        kind: SpanKind,
        text: &str,
        accepts: AcceptedCharacters,
    ) -> &mut Self {
        self.push(Event::Span {
            kind,
            text: text.to_string(),
            accepts,
        })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn finish(self) -> Result<SyntaxTreeNode, BuildError> {
        Sink::new(self.file_path, self.events).finish()
    }
}

/// Build a tree from a prepared event list.
pub fn build(file_path: Option<String>, events: Vec<Event>) -> Result<SyntaxTreeNode, BuildError> {
    Sink::new(file_path, events).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceLocation;
    use pretty_assertions::assert_eq;

    #[test]
    fn closures_emit_balanced_events() {
        let mut builder = TreeBuilder::new();
        builder.block(BlockKind::Markup, |b| {
            b.tag_helper("input", |b| {
                b.attribute("value", |b| {
                    b.span(SpanKind::Code, "x");
                });
                b.empty_attribute("checked");
            });
        });

        assert_eq!(
            builder.events(),
            [
                Event::block(BlockKind::Markup),
                Event::tag_helper("input"),
                Event::attribute("value"),
                Event::span(SpanKind::Code, "x"),
                Event::Finish,
                Event::EmptyAttribute {
                    name: "checked".into()
                },
                Event::Finish,
                Event::Finish,
            ]
        );
    }

    #[test]
    fn span_with_keeps_accepted_characters() {
        let mut builder = TreeBuilder::new();
        builder.block(BlockKind::Statement, |b| {
            b.span_with(SpanKind::MetaCode, "{", AcceptedCharacters::NONE);
        });

        let tree = builder.finish().unwrap();
        let SyntaxTreeNode::Block(block) = tree else {
            panic!("expected a block root");
        };
        let span = block.children[0].as_span().unwrap();
        assert_eq!(span.accepted_characters, AcceptedCharacters::NONE);
    }

    #[test]
    fn file_path_is_stamped_on_locations() {
        let mut builder = TreeBuilder::with_file_path("Index.cshtml");
        builder.block(BlockKind::Markup, |b| {
            b.span(SpanKind::Markup, "<p>");
        });

        let tree = builder.finish().unwrap();
        assert_eq!(
            tree.start(),
            SourceLocation::new(Some("Index.cshtml".into()), 0, 0, 0)
        );
    }

    #[test]
    fn build_reports_errors_from_sink() {
        let error = build(None, vec![Event::Finish]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "finish at offset 0 has no open node to close"
        );
    }
}
