//! Renders classified spans one per line.
//!
//! ```text
//! Markup span at (0:0,0 [5] file.cshtml) (Accepts:Any) - Parent: Statement block at (0:0,0 [8] file.cshtml)
//! ```
//!
//! Field order and separators are compared verbatim against recorded
//! baselines. Lines always end in `\n`, whatever the platform.

use std::io::{self, BufWriter, Write};
use std::string::FromUtf8Error;

use markup_spans_syntax::SyntaxTreeNode;
use thiserror::Error;

use crate::classify::{ClassifiedSpan, ClassifyError, classified_spans};

pub const SEPARATOR: &str = " - ";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error("failed to write classified spans: {0}")]
    Io(#[from] io::Error),
    #[error("classified span output is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Writes classified spans to a buffered sink.
///
/// Every `visit` flushes the sink before returning, including when a write
/// failed part way through.
pub struct ClassifiedSpanWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> ClassifiedSpanWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Classify `root` and write one line per span.
    ///
    /// Nothing is written if classification fails.
    pub fn visit(&mut self, root: &SyntaxTreeNode) -> Result<(), WriteError> {
        let spans = classified_spans(root)?;
        self.visit_spans(&spans)
    }

    pub fn visit_spans(&mut self, spans: &[ClassifiedSpan]) -> Result<(), WriteError> {
        let written = self.write_spans(spans);
        let flushed = self.writer.flush();
        written?;
        flushed?;
        log::debug!("wrote {} classified spans", spans.len());
        Ok(())
    }

    fn write_spans(&mut self, spans: &[ClassifiedSpan]) -> io::Result<()> {
        for span in spans {
            self.visit_classified_span(span)?;
            self.write_new_line()?;
        }
        Ok(())
    }

    /// Write a single record without the trailing line break.
    pub fn visit_classified_span(&mut self, span: &ClassifiedSpan) -> io::Result<()> {
        write!(
            self.writer,
            "{} span at {} (Accepts:{})",
            span.span_kind, span.span, span.accepted_characters
        )?;
        self.write_separator()?;
        write!(
            self.writer,
            "Parent: {} block at {}",
            span.block_kind, span.block_span
        )
    }

    fn write_separator(&mut self) -> io::Result<()> {
        self.writer.write_all(SEPARATOR.as_bytes())
    }

    fn write_new_line(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(self) -> Result<W, WriteError> {
        self.writer
            .into_inner()
            .map_err(|error| WriteError::Io(error.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_spans_syntax::{
        AcceptedCharacters, Block, BlockKind, SourceLocation, SourceSpan, Span, SpanKind,
    };
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn record() -> ClassifiedSpan {
        ClassifiedSpan {
            span: SourceSpan::new(None, 2, 0, 2, 1),
            block_span: SourceSpan::new(None, 2, 0, 2, 10),
            span_kind: SpanKind::Transition,
            block_kind: BlockKind::Statement,
            accepted_characters: AcceptedCharacters::NONE,
        }
    }

    /// A sink that accepts a fixed number of bytes, then fails.
    struct FailingSink {
        capacity: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.capacity {
                return Err(io::Error::other("sink is full"));
            }
            self.capacity -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Refuses its first write, then accepts everything and counts flushes.
    struct RefusesFirstWrite {
        refused: bool,
        flushes: Rc<Cell<usize>>,
    }

    impl Write for RefusesFirstWrite {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.refused {
                self.refused = true;
                return Err(io::Error::other("sink refused"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes.set(self.flushes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn failed_record_write_still_flushes() {
        let flushes = Rc::new(Cell::new(0));
        let sink = RefusesFirstWrite {
            refused: false,
            flushes: Rc::clone(&flushes),
        };
        // Longer than the write buffer, so the record reaches the sink mid-line.
        let file_path = "a".repeat(16 * 1024);
        let mut long = record();
        long.span.file_path = Some(file_path);
        let mut writer = ClassifiedSpanWriter::new(sink);

        let error = writer.visit_spans(&[long]).unwrap_err();

        assert!(matches!(error, WriteError::Io(_)));
        assert!(error.to_string().contains("sink refused"));
        assert_eq!(flushes.get(), 1);
    }

    #[test]
    fn formats_one_line_per_record() {
        let mut writer = ClassifiedSpanWriter::new(Vec::new());
        writer.visit_spans(&[record(), record()]).unwrap();

        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let line = "Transition span at (2:0,2 [1] ) (Accepts:None) - Parent: Statement block at (2:0,2 [10] )\n";
        assert_eq!(output, line.repeat(2));
    }

    #[test]
    fn single_record_has_no_line_break() {
        let mut writer = ClassifiedSpanWriter::new(Vec::new());
        writer.visit_classified_span(&record()).unwrap();

        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(!output.ends_with('\n'));
        assert!(output.contains(SEPARATOR));
    }

    #[test]
    fn classification_failure_writes_nothing() {
        let root = Span::new(
            SpanKind::Markup,
            SourceLocation::default(),
            "x",
            AcceptedCharacters::ANY,
        )
        .into();
        let mut writer = ClassifiedSpanWriter::new(Vec::new());

        let error = writer.visit(&root).unwrap_err();

        assert!(matches!(error, WriteError::Classify(_)));
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn sink_failure_is_reported() {
        let sink = FailingSink { capacity: 4 };
        let root = Block::new(
            BlockKind::Markup,
            vec![
                Span::new(
                    SpanKind::Markup,
                    SourceLocation::default(),
                    "hello",
                    AcceptedCharacters::ANY,
                )
                .into(),
            ],
        )
        .into();
        let mut writer = ClassifiedSpanWriter::new(sink);

        let error = writer.visit(&root).unwrap_err();

        assert!(matches!(error, WriteError::Io(_)));
        assert!(error.to_string().contains("sink is full"));
    }
}
