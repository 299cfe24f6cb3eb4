//! Syntactic kinds for spans and blocks, and the accepted-characters edit policy.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a leaf span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    /// The `@` that switches between markup and code.
    Transition,
    /// Keywords and delimiters that belong to the template language itself.
    MetaCode,
    Comment,
    Code,
    Markup,
}

impl SpanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transition => "Transition",
            Self::MetaCode => "MetaCode",
            Self::Comment => "Comment",
            Self::Code => "Code",
            Self::Markup => "Markup",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a composite block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Statement,
    Directive,
    Expression,
    Markup,
    Template,
    Comment,
    /// Element blocks, including tag helpers.
    Tag,
    HtmlComment,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Statement => "Statement",
            Self::Directive => "Directive",
            Self::Expression => "Expression",
            Self::Markup => "Markup",
            Self::Template => "Template",
            Self::Comment => "Comment",
            Self::Tag => "Tag",
            Self::HtmlComment => "HtmlComment",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAcceptedCharactersError {
    #[error("unknown accepted characters flag '{0}'")]
    UnknownFlag(String),
}

/// Which characters an editor may type at the end of a span without
/// invalidating its classification.
///
/// A flag set over [`NEW_LINE`](Self::NEW_LINE),
/// [`WHITE_SPACE`](Self::WHITE_SPACE) and
/// [`NON_WHITE_SPACE`](Self::NON_WHITE_SPACE).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcceptedCharacters(u8);

impl AcceptedCharacters {
    pub const NONE: Self = Self(0);
    pub const NEW_LINE: Self = Self(1);
    pub const WHITE_SPACE: Self = Self(2);
    pub const NON_WHITE_SPACE: Self = Self(4);
    pub const ALL_WHITE_SPACE: Self = Self(Self::NEW_LINE.0 | Self::WHITE_SPACE.0);
    pub const ANY_EXCEPT_NEWLINE: Self = Self(Self::NON_WHITE_SPACE.0 | Self::WHITE_SPACE.0);
    pub const ANY: Self = Self(Self::ALL_WHITE_SPACE.0 | Self::NON_WHITE_SPACE.0);

    /// Named values in ascending order.
    const NAMED: [(Self, &'static str); 7] = [
        (Self::NONE, "None"),
        (Self::NEW_LINE, "NewLine"),
        (Self::WHITE_SPACE, "WhiteSpace"),
        (Self::ALL_WHITE_SPACE, "AllWhiteSpace"),
        (Self::NON_WHITE_SPACE, "NonWhiteSpace"),
        (Self::ANY_EXCEPT_NEWLINE, "AnyExceptNewline"),
        (Self::ANY, "Any"),
    ];

    /// Returns `None` if `bits` sets anything outside the known flags.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ANY.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AcceptedCharacters {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AcceptedCharacters {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Prints the exact name when one exists, otherwise the largest named values
/// that cover the set, listed in ascending order (`NewLine, NonWhiteSpace`).
impl fmt::Display for AcceptedCharacters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((_, name)) = Self::NAMED.iter().find(|(value, _)| value == self) {
            return f.write_str(name);
        }

        let mut remaining = self.0;
        let mut names = Vec::new();
        for (value, name) in Self::NAMED.iter().rev() {
            if !value.is_empty() && remaining & value.0 == value.0 {
                names.push(*name);
                remaining &= !value.0;
            }
        }
        names.reverse();
        f.write_str(&names.join(", "))
    }
}

impl FromStr for AcceptedCharacters {
    type Err = ParseAcceptedCharactersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut accepted = Self::NONE;
        for part in s.split(',').map(str::trim) {
            let (value, _) = Self::NAMED
                .iter()
                .find(|(_, name)| *name == part)
                .ok_or_else(|| ParseAcceptedCharactersError::UnknownFlag(part.to_string()))?;
            accepted |= *value;
        }
        Ok(accepted)
    }
}

impl TryFrom<String> for AcceptedCharacters {
    type Error = ParseAcceptedCharactersError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcceptedCharacters> for String {
    fn from(value: AcceptedCharacters) -> Self {
        value.to_string()
    }
}
