//! # Builder Events
//!
//! Trees are described as a **flat sequence** of events in document order,
//! and the [`Sink`](super::sink::Sink) turns that sequence into nodes. Spans
//! carry their text, so the sink can compute every location itself:
//!
//! ```text
//! StartBlock(Statement)          ← open a Statement block
//!   Span(Transition, "@")        ← (0:0,0 [1])
//!   Span(Code, "x")              ← (1:0,1 [1])
//! Finish                         ← close the block
//! ```
//!
//! Tag helpers add one level: `StartAttribute` opens an attribute whose value
//! is whatever is produced before the matching `Finish`. The tag markup
//! around the values is fed as `Unclassified` text so later locations stay
//! correct:
//!
//! ```text
//! StartTagHelper(a)
//!   Unclassified("<a href=\"")
//!   StartAttribute(href)
//!     Span(Markup, "~/")
//!   Finish
//!   Unclassified("\">")
//! Finish
//! ```

use crate::kind::{AcceptedCharacters, BlockKind, SpanKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open an ordered block.
    StartBlock { kind: BlockKind },

    /// Open a tag helper element. Its start is the location of the next
    /// character consumed.
    StartTagHelper { tag_name: String, kind: BlockKind },

    /// Open an attribute of the innermost tag helper.
    ///
    /// A single node produced before the matching `Finish` becomes the value
    /// as is; several nodes are wrapped in a `Markup` block; none leaves the
    /// value absent.
    StartAttribute { name: String },

    /// Add an attribute with no value to the innermost tag helper.
    EmptyAttribute { name: String },

    /// Add a leaf span to the innermost open node.
    Span {
        kind: SpanKind,
        text: String,
        accepts: AcceptedCharacters,
    },

    /// Source text inside a tag helper that belongs to no span, such as the
    /// start and end tags around attribute values. Only advances locations.
    /// The innermost open node must be a tag helper or one of its attributes.
    Unclassified { text: String },

    /// Close the innermost open node.
    Finish,
}

impl Event {
    pub fn block(kind: BlockKind) -> Self {
        Event::StartBlock { kind }
    }

    pub fn tag_helper(tag_name: impl Into<String>) -> Self {
        Event::StartTagHelper {
            tag_name: tag_name.into(),
            kind: BlockKind::Tag,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Event::StartAttribute { name: name.into() }
    }

    /// A span that accepts any character.
    pub fn span(kind: SpanKind, text: impl Into<String>) -> Self {
        Event::Span {
            kind,
            text: text.into(),
            accepts: AcceptedCharacters::ANY,
        }
    }
}
