//! Source positions attached to spans and blocks.
//!
//! Positions are counted in characters, not bytes. A [`SourceLocation`] marks
//! where a node starts; a [`SourceSpan`] adds the number of characters the
//! node covers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The start of a node in its source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the node came from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Character offset from the start of the document.
    pub absolute_index: usize,
    /// Zero-based line number.
    pub line_index: usize,
    /// Zero-based character offset within the line.
    pub character_index: usize,
}

impl SourceLocation {
    pub fn new(
        file_path: Option<String>,
        absolute_index: usize,
        line_index: usize,
        character_index: usize,
    ) -> Self {
        Self {
            file_path,
            absolute_index,
            line_index,
            character_index,
        }
    }
}

/// A location plus a length, as reported for classified spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub absolute_index: usize,
    pub line_index: usize,
    pub character_index: usize,
    pub length: usize,
}

impl SourceSpan {
    pub fn new(
        file_path: Option<String>,
        absolute_index: usize,
        line_index: usize,
        character_index: usize,
        length: usize,
    ) -> Self {
        Self {
            file_path,
            absolute_index,
            line_index,
            character_index,
            length,
        }
    }

    /// Copies the fields of `location` and pairs them with `length`.
    pub fn from_location(location: &SourceLocation, length: usize) -> Self {
        Self {
            file_path: location.file_path.clone(),
            absolute_index: location.absolute_index,
            line_index: location.line_index,
            character_index: location.character_index,
            length,
        }
    }
}

/// Renders as `(absolute:line,character [length] file)`.
///
/// The file segment is left empty when no path is known, which keeps the
/// trailing space: `(0:0,0 [5] )`.
impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{},{} [{}] {})",
            self.absolute_index,
            self.line_index,
            self.character_index,
            self.length,
            self.file_path.as_deref().unwrap_or("")
        )
    }
}

/// Tracks the running location while text is consumed in document order.
///
/// `\n`, `\r\n` and a lone `\r` each count as one line break. The `\r` of a
/// `\r\n` pair advances the character index like any other character. A pair
/// split across two [`advance`](Self::advance) calls is seen as two breaks.
#[derive(Debug, Clone, Default)]
pub struct SourceLocationTracker {
    location: SourceLocation,
}

impl SourceLocationTracker {
    pub fn new(file_path: Option<String>) -> Self {
        Self {
            location: SourceLocation {
                file_path,
                ..SourceLocation::default()
            },
        }
    }

    /// The location of the next character to be consumed.
    pub fn current(&self) -> &SourceLocation {
        &self.location
    }

    pub fn advance(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            self.location.absolute_index += 1;
            let is_line_break = c == '\n' || (c == '\r' && chars.peek() != Some(&'\n'));
            if is_line_break {
                self.location.line_index += 1;
                self.location.character_index = 0;
            } else {
                self.location.character_index += 1;
            }
        }
    }
}
