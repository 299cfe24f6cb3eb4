use markup_spans_syntax::SyntaxTreeNode;

use crate::writer::{ClassifiedSpanWriter, WriteError};

/// Render every classified span of `root` as text, one line per span.
///
/// The same tree always yields the same text: attribute values are ordered by
/// position, never by how they were inserted.
pub fn serialize(root: &SyntaxTreeNode) -> Result<String, WriteError> {
    let mut writer = ClassifiedSpanWriter::new(Vec::new());
    writer.visit(root)?;
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
