//! # markup-spans-engine
//!
//! Turns a syntax tree into a flat, deterministic listing of classified
//! spans for snapshot comparison.
//!
//! ```text
//! SyntaxTreeNode → classify → Vec<ClassifiedSpan> → writer → text
//! ```
//!
//! - **`classify`**: depth-first walk producing one record per leaf span,
//!   with tag helper attributes visited in document order
//! - **`writer`**: one formatted line per record into any `io::Write`
//! - **`serializer`**: the two stages composed into a `String`
//! - **`baseline`**: comparison against (and regeneration of) recorded
//!   `.cspans.txt` files

pub mod baseline;
pub mod classify;
pub mod serializer;
pub mod writer;

pub use baseline::{BaselineError, BaselineOutcome, BaselineVerifier, verify_spans};
pub use classify::{ClassifiedSpan, ClassifyError, attributes_in_document_order, classified_spans};
pub use serializer::serialize;
pub use writer::{ClassifiedSpanWriter, WriteError};
