//! # markup-spans-syntax
//!
//! The syntax tree model shared by the markup-spans crates: leaf spans,
//! ordered blocks, and tag helper elements whose attributes are addressed by
//! name.
//!
//! ## Module Structure
//!
//! ```text
//! markup-spans-syntax/
//! ├── lib.rs           # This file - public API
//! ├── kind.rs          # SpanKind, BlockKind, AcceptedCharacters
//! ├── location.rs      # SourceLocation, SourceSpan, location tracking
//! ├── tree.rs          # Span, Block, TagHelperBlock, SyntaxTreeNode
//! └── builder/
//!     ├── mod.rs       # TreeBuilder and BuildError
//!     ├── event.rs     # Event enum (StartBlock, Span, Finish, ...)
//!     └── sink.rs      # Converts events to a tree, computing locations
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markup_spans_syntax::{BlockKind, SpanKind, SyntaxTreeNode, TreeBuilder};
//!
//! let mut builder = TreeBuilder::with_file_path("Index.cshtml");
//! builder.block(BlockKind::Markup, |b| {
//!     b.span(SpanKind::Markup, "<p>");
//!     b.block(BlockKind::Expression, |b| {
//!         b.span(SpanKind::Transition, "@");
//!         b.span(SpanKind::Code, "Model.Name");
//!     });
//!     b.span(SpanKind::Markup, "</p>");
//! });
//!
//! let tree = builder.finish().unwrap();
//! assert!(matches!(tree, SyntaxTreeNode::Block(_)));
//! assert_eq!(tree.length(), 18);
//! ```

pub mod builder;
pub mod kind;
pub mod location;
pub mod tree;

pub use builder::{BuildError, TreeBuilder, build, event::Event};
pub use kind::{AcceptedCharacters, BlockKind, ParseAcceptedCharactersError, SpanKind};
pub use location::{SourceLocation, SourceLocationTracker, SourceSpan};
pub use tree::{
    Block, Span, SyntaxTreeNode, TagHelperAttribute, TagHelperAttributes, TagHelperBlock,
};
