//! Sink for converting builder events into a syntax tree.

use crate::builder::BuildError;
use crate::builder::event::Event;
use crate::kind::BlockKind;
use crate::location::{SourceLocation, SourceLocationTracker};
use crate::tree::{Block, Span, SyntaxTreeNode, TagHelperAttributes, TagHelperBlock};

/// A node that has been opened but not finished yet.
#[derive(Debug)]
enum Frame {
    Block {
        kind: BlockKind,
        children: Vec<SyntaxTreeNode>,
    },
    TagHelper {
        tag_name: String,
        kind: BlockKind,
        start: SourceLocation,
        attributes: TagHelperAttributes,
        children: Vec<SyntaxTreeNode>,
    },
    Attribute {
        name: String,
        nodes: Vec<SyntaxTreeNode>,
    },
}

/// Converts events into a tree, assigning locations as span text is consumed.
pub struct Sink {
    tracker: SourceLocationTracker,
    events: Vec<Event>,
    stack: Vec<Frame>,
    root: Option<SyntaxTreeNode>,
}

impl Sink {
    pub fn new(file_path: Option<String>, events: Vec<Event>) -> Self {
        Self {
            tracker: SourceLocationTracker::new(file_path),
            events,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Consume the sink and build the syntax tree.
    pub fn finish(mut self) -> Result<SyntaxTreeNode, BuildError> {
        for event in std::mem::take(&mut self.events) {
            match event {
                Event::StartBlock { kind } => {
                    self.stack.push(Frame::Block {
                        kind,
                        children: Vec::new(),
                    });
                }
                Event::StartTagHelper { tag_name, kind } => {
                    self.stack.push(Frame::TagHelper {
                        tag_name,
                        kind,
                        start: self.tracker.current().clone(),
                        attributes: TagHelperAttributes::new(),
                        children: Vec::new(),
                    });
                }
                Event::StartAttribute { name } => {
                    self.expect_tag_helper(&name)?;
                    self.stack.push(Frame::Attribute {
                        name,
                        nodes: Vec::new(),
                    });
                }
                Event::EmptyAttribute { name } => {
                    self.insert_attribute(name, None)?;
                }
                Event::Span {
                    kind,
                    text,
                    accepts,
                } => {
                    if self.stack.is_empty() {
                        return Err(BuildError::SpanOutsideBlock {
                            content: text,
                            absolute_index: self.tracker.current().absolute_index,
                        });
                    }
                    let span = Span::new(kind, self.tracker.current().clone(), text, accepts);
                    self.tracker.advance(&span.content);
                    self.attach(span.into())?;
                }
                Event::Unclassified { text } => {
                    // Blocks derive their extent from their children, so text
                    // they don't own would fall outside it.
                    let in_tag_markup = matches!(
                        self.stack.last(),
                        Some(Frame::TagHelper { .. } | Frame::Attribute { .. })
                    );
                    if !in_tag_markup {
                        return Err(BuildError::UnclassifiedOutsideTagHelper {
                            absolute_index: self.tracker.current().absolute_index,
                        });
                    }
                    self.tracker.advance(&text);
                }
                Event::Finish => self.finish_frame()?,
            }
        }

        if !self.stack.is_empty() {
            return Err(BuildError::UnclosedNode {
                depth: self.stack.len(),
            });
        }
        self.root.ok_or(BuildError::EmptyDocument)
    }

    fn finish_frame(&mut self) -> Result<(), BuildError> {
        match self.stack.pop() {
            None => Err(BuildError::UnbalancedFinish {
                absolute_index: self.tracker.current().absolute_index,
            }),
            Some(Frame::Block { kind, children }) => {
                self.attach(Block::new(kind, children).into())
            }
            Some(Frame::TagHelper {
                tag_name,
                kind,
                start,
                attributes,
                children,
            }) => {
                let length = self.tracker.current().absolute_index - start.absolute_index;
                let tag_helper = TagHelperBlock {
                    tag_name,
                    kind,
                    start,
                    length,
                    attributes,
                    children,
                };
                self.attach(tag_helper.into())
            }
            Some(Frame::Attribute { name, mut nodes }) => {
                let value = match nodes.len() {
                    0 => None,
                    1 => nodes.pop(),
                    _ => Some(Block::new(BlockKind::Markup, nodes).into()),
                };
                self.insert_attribute(name, value)
            }
        }
    }

    /// Add a completed node to the innermost open frame, or make it the root.
    fn attach(&mut self, node: SyntaxTreeNode) -> Result<(), BuildError> {
        match self.stack.last_mut() {
            Some(Frame::Block { children, .. } | Frame::TagHelper { children, .. }) => {
                children.push(node);
                Ok(())
            }
            Some(Frame::Attribute { nodes, .. }) => {
                nodes.push(node);
                Ok(())
            }
            None if self.root.is_some() => Err(BuildError::MultipleRoots),
            None => {
                self.root = Some(node);
                Ok(())
            }
        }
    }

    fn expect_tag_helper(&self, name: &str) -> Result<(), BuildError> {
        match self.stack.last() {
            Some(Frame::TagHelper { .. }) => Ok(()),
            _ => Err(BuildError::AttributeOutsideTagHelper {
                name: name.to_string(),
            }),
        }
    }

    fn insert_attribute(
        &mut self,
        name: String,
        value: Option<SyntaxTreeNode>,
    ) -> Result<(), BuildError> {
        match self.stack.last_mut() {
            Some(Frame::TagHelper { attributes, .. }) => {
                attributes.insert(name, value);
                Ok(())
            }
            _ => Err(BuildError::AttributeOutsideTagHelper { name }),
        }
    }
}
