//! # Span Classification
//!
//! Flattens a syntax tree into one [`ClassifiedSpan`] per leaf, in document
//! order. Each record pairs the leaf's own position and kind with the
//! position and kind of the composite it sits in.
//!
//! ## Ordering
//!
//! Blocks are walked depth-first in child order. Tag helper attributes are
//! stored by name, so their values are first sorted by their own start offset
//! (stable, so equal offsets keep insertion order) and walked before the tag
//! helper's body children. Output never depends on how the attributes were
//! inserted.
//!
//! ## Parents
//!
//! A span's parent is the nearest enclosing [`Block`] or [`TagHelperBlock`].
//! A span used directly as an attribute value has the tag helper as parent;
//! spans inside a block used as an attribute value have that block.

use markup_spans_syntax::{
    AcceptedCharacters, Block, BlockKind, SourceSpan, Span, SpanKind, SyntaxTreeNode,
    TagHelperBlock,
};
use thiserror::Error;

/// A leaf span paired with its enclosing block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpan {
    pub span: SourceSpan,
    pub block_span: SourceSpan,
    pub span_kind: SpanKind,
    pub block_kind: BlockKind,
    pub accepted_characters: AcceptedCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("{kind} span at {span} has no enclosing block")]
    OrphanSpan { kind: SpanKind, span: SourceSpan },
}

/// The composite a span was reached through.
struct Parent {
    kind: BlockKind,
    span: SourceSpan,
}

impl Parent {
    fn of_block(block: &Block) -> Self {
        Self {
            kind: block.kind,
            span: block.source_span(),
        }
    }

    fn of_tag_helper(tag_helper: &TagHelperBlock) -> Self {
        Self {
            kind: tag_helper.kind,
            span: tag_helper.source_span(),
        }
    }
}

/// Classify every span reachable from `root`.
///
/// Fails without producing any records if a span has no enclosing block,
/// which can only happen when `root` itself is a span.
pub fn classified_spans(root: &SyntaxTreeNode) -> Result<Vec<ClassifiedSpan>, ClassifyError> {
    let mut found = Vec::new();
    append_classified_spans(root, None, &mut found)?;
    log::debug!("classified {} spans", found.len());
    Ok(found)
}

fn append_classified_spans(
    node: &SyntaxTreeNode,
    parent: Option<&Parent>,
    found: &mut Vec<ClassifiedSpan>,
) -> Result<(), ClassifyError> {
    match node {
        SyntaxTreeNode::Span(span) => {
            let Some(parent) = parent else {
                return Err(ClassifyError::OrphanSpan {
                    kind: span.kind,
                    span: span.source_span(),
                });
            };
            found.push(classify(span, parent));
        }
        SyntaxTreeNode::Block(block) => {
            let parent = Parent::of_block(block);
            for child in &block.children {
                append_classified_spans(child, Some(&parent), found)?;
            }
        }
        SyntaxTreeNode::TagHelper(tag_helper) => {
            let parent = Parent::of_tag_helper(tag_helper);
            for value in attributes_in_document_order(tag_helper) {
                append_classified_spans(value, Some(&parent), found)?;
            }
            for child in &tag_helper.children {
                append_classified_spans(child, Some(&parent), found)?;
            }
        }
    }
    Ok(())
}

fn classify(span: &Span, parent: &Parent) -> ClassifiedSpan {
    ClassifiedSpan {
        span: span.source_span(),
        block_span: parent.span.clone(),
        span_kind: span.kind,
        block_kind: parent.kind,
        accepted_characters: span.accepted_characters,
    }
}

/// Present attribute values sorted by start offset.
///
/// The sort is stable: values with equal offsets keep their insertion order.
pub fn attributes_in_document_order(tag_helper: &TagHelperBlock) -> Vec<&SyntaxTreeNode> {
    let mut values: Vec<_> = tag_helper.attributes.values().collect();
    values.sort_by_key(|value| value.absolute_index());
    log::trace!(
        "<{}> attributes in document order: {:?}",
        tag_helper.tag_name,
        values
            .iter()
            .map(|value| value.absolute_index())
            .collect::<Vec<_>>()
    );
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_spans_syntax::SourceLocation;
    use pretty_assertions::assert_eq;

    fn span(kind: SpanKind, absolute: usize, content: &str) -> SyntaxTreeNode {
        Span::new(
            kind,
            SourceLocation::new(Some("file.cshtml".into()), absolute, 0, absolute),
            content,
            AcceptedCharacters::ANY,
        )
        .into()
    }

    fn kinds(spans: &[ClassifiedSpan]) -> Vec<(SpanKind, BlockKind)> {
        spans.iter().map(|s| (s.span_kind, s.block_kind)).collect()
    }

    #[test]
    fn block_children_keep_sequence_order() {
        let root = Block::new(
            BlockKind::Statement,
            vec![span(SpanKind::Markup, 0, "<p>xy"), span(SpanKind::Code, 5, "abc")],
        )
        .into();

        let spans = classified_spans(&root).unwrap();

        assert_eq!(
            kinds(&spans),
            [
                (SpanKind::Markup, BlockKind::Statement),
                (SpanKind::Code, BlockKind::Statement)
            ]
        );
        assert_eq!(
            spans[1].span,
            SourceSpan::new(Some("file.cshtml".into()), 5, 0, 5, 3)
        );
        assert_eq!(
            spans[1].block_span,
            SourceSpan::new(Some("file.cshtml".into()), 0, 0, 0, 8)
        );
    }

    #[test]
    fn attributes_are_walked_by_offset_not_name() {
        let tag_helper = TagHelperBlock::new("p", SourceLocation::default(), 20)
            .with_attribute("id", Some(span(SpanKind::Markup, 10, "main")))
            .with_attribute("class", Some(span(SpanKind::Code, 3, "bold")));

        let ordered = attributes_in_document_order(&tag_helper);

        let offsets: Vec<_> = ordered.iter().map(|v| v.absolute_index()).collect();
        assert_eq!(offsets, [3, 10]);
    }

    #[test]
    fn equal_offsets_keep_insertion_order() {
        let tag_helper = TagHelperBlock::new("p", SourceLocation::default(), 20)
            .with_attribute("b", Some(span(SpanKind::Markup, 4, "first")))
            .with_attribute("a", Some(span(SpanKind::Code, 4, "second")));

        let ordered = attributes_in_document_order(&tag_helper);

        let contents: Vec<_> = ordered
            .iter()
            .filter_map(|v| v.as_span())
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[test]
    fn attributes_come_before_body_children() {
        let root: SyntaxTreeNode = TagHelperBlock::new("p", SourceLocation::default(), 30)
            .with_child(span(SpanKind::Markup, 20, "body"))
            .with_attribute("title", Some(span(SpanKind::Code, 8, "x")))
            .into();

        let spans = classified_spans(&root).unwrap();

        let offsets: Vec<_> = spans.iter().map(|s| s.span.absolute_index).collect();
        assert_eq!(offsets, [8, 20]);
        assert!(spans.iter().all(|s| s.block_kind == BlockKind::Tag));
    }

    #[test]
    fn span_inside_attribute_block_has_that_block_as_parent() {
        let value = Block::new(BlockKind::Expression, vec![span(SpanKind::Code, 6, "Name")]);
        let root: SyntaxTreeNode = TagHelperBlock::new("input", SourceLocation::default(), 12)
            .with_attribute("value", Some(value.into()))
            .into();

        let spans = classified_spans(&root).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].block_kind, BlockKind::Expression);
        assert_eq!(spans[0].block_span.absolute_index, 6);
        assert_eq!(spans[0].block_span.length, 4);
    }

    #[test]
    fn absent_attribute_values_contribute_nothing() {
        let root: SyntaxTreeNode = TagHelperBlock::new("input", SourceLocation::default(), 16)
            .with_attribute("disabled", None)
            .into();

        assert!(classified_spans(&root).unwrap().is_empty());
    }

    #[test]
    fn empty_block_yields_no_records() {
        let root = Block::new(BlockKind::Markup, Vec::new()).into();
        assert!(classified_spans(&root).unwrap().is_empty());
    }

    #[test]
    fn bare_span_root_is_rejected() {
        let root = span(SpanKind::Markup, 0, "hello");

        assert_eq!(
            classified_spans(&root),
            Err(ClassifyError::OrphanSpan {
                kind: SpanKind::Markup,
                span: SourceSpan::new(Some("file.cshtml".into()), 0, 0, 0, 5),
            })
        );
    }

    #[test]
    fn accepted_characters_are_copied_through() {
        let leaf = Span::new(
            SpanKind::MetaCode,
            SourceLocation::default(),
            "{",
            AcceptedCharacters::NONE,
        );
        let root = Block::new(BlockKind::Statement, vec![leaf.into()]).into();

        let spans = classified_spans(&root).unwrap();

        assert_eq!(spans[0].accepted_characters, AcceptedCharacters::NONE);
    }
}
