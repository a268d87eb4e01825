use csv::{QuoteStyle, Terminator, WriterBuilder};
use dasmine_engine::{Error, Result, RowSink};
use std::io::Write;

/// CSV row sink: every field quoted, CRLF line endings
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_writer(inner);
        Self { writer }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Sink(Box::new(e.into_error())))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_values(&mut self, values: &[&str]) -> Result<()> {
        self.writer
            .write_record(values)
            .map_err(|e| Error::Sink(Box::new(e)))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::Sink(Box::new(e)))
    }
}
