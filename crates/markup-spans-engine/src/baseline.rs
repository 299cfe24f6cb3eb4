//! # Baseline Verification
//!
//! Classified span output is checked into the repository as `.cspans.txt`
//! baseline files and compared against fresh output in tests. When a parser
//! change is intended, baselines are regenerated instead of compared:
//!
//! ```text
//! generate = false    read baseline → compare → Matched | Mismatch(diff) | Missing
//! generate = true     serialize → write baseline → Written
//! ```
//!
//! Baselines are compared after normalising `\r\n` to `\n`, so checkouts with
//! converted line endings still match.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use markup_spans_syntax::SyntaxTreeNode;
use similar::TextDiff;
use thiserror::Error;

use crate::serializer::serialize;
use crate::writer::WriteError;

pub const BASELINE_EXTENSION: &str = "cspans.txt";

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("baseline not found at {path}; regenerate baselines to create it")]
    Missing { path: PathBuf },

    #[error("classified spans differ from baseline {path}:\n{diff}")]
    Mismatch { path: PathBuf, diff: String },

    #[error(
        "classified span {index} differs from baseline\nexpected: {expected}\nactual:   {actual}"
    )]
    SpanMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("expected {expected} classified spans but found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("failed to access baseline {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineOutcome {
    Matched,
    Written,
}

/// Compares serialized trees against baseline files in one directory.
#[derive(Debug, Clone)]
pub struct BaselineVerifier {
    baselines_path: PathBuf,
    generate: bool,
}

impl BaselineVerifier {
    pub fn new(baselines_path: impl Into<PathBuf>) -> Self {
        Self {
            baselines_path: baselines_path.into(),
            generate: false,
        }
    }

    /// Write baselines instead of comparing against them.
    pub fn generate(mut self, generate: bool) -> Self {
        self.generate = generate;
        self
    }

    pub fn is_generating(&self) -> bool {
        self.generate
    }

    /// `name` may contain `/` to group baselines into subdirectories.
    pub fn baseline_path(&self, name: &str) -> PathBuf {
        self.baselines_path.join(format!("{name}.{BASELINE_EXTENSION}"))
    }

    pub fn verify(
        &self,
        name: &str,
        root: &SyntaxTreeNode,
    ) -> Result<BaselineOutcome, BaselineError> {
        let actual = serialize(root)?;
        let path = self.baseline_path(name);

        if self.generate {
            write_baseline(&path, &actual)?;
            log::info!("wrote baseline {}", path.display());
            return Ok(BaselineOutcome::Written);
        }

        let expected = match fs::read_to_string(&path) {
            Ok(expected) => normalize_line_endings(&expected),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(BaselineError::Missing { path });
            }
            Err(source) => return Err(BaselineError::Io { path, source }),
        };

        if expected == actual {
            log::debug!("baseline {} matched", path.display());
            return Ok(BaselineOutcome::Matched);
        }

        log::warn!("baseline {} does not match", path.display());
        let diff = TextDiff::from_lines(&expected, &actual)
            .unified_diff()
            .header("baseline", "actual")
            .to_string();
        Err(BaselineError::Mismatch { path, diff })
    }
}

/// Compare the classified spans of `root` line by line with `expected`.
///
/// Reports the first differing record, then any difference in count.
pub fn verify_spans<S: AsRef<str>>(
    expected: &[S],
    root: &SyntaxTreeNode,
) -> Result<(), BaselineError> {
    let output = serialize(root)?;
    let actual: Vec<&str> = output.lines().collect();

    for (index, (expected, actual)) in expected.iter().zip(&actual).enumerate() {
        if expected.as_ref() != *actual {
            return Err(BaselineError::SpanMismatch {
                index,
                expected: expected.as_ref().to_string(),
                actual: actual.to_string(),
            });
        }
    }

    if expected.len() != actual.len() {
        return Err(BaselineError::CountMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(())
}

fn write_baseline(path: &Path, contents: &str) -> Result<(), BaselineError> {
    let io_error = |source| BaselineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}
