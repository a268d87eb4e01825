use dasmine_types::AuditRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::das::normalize_line;
use crate::filter::EventFilter;
use crate::{Error, Result};

/// Lines between two progress reports
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// One pass over a source, yielding records in input order
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<AuditRecord>> + 'a>;

/// Restartable sequence of normalized audit records.
///
/// Every call to [`AuditSource::records`] begins a new, independent pass from
/// the first record. `pass` names the pass in progress reports.
pub trait AuditSource {
    fn records(&self, pass: &str) -> Result<RecordIter<'_>>;
}

/// How raw lines are turned into records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    pub filter: EventFilter,
    /// Report progress every this many lines; 0 disables reports
    pub progress_interval: u64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            filter: EventFilter::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Normalizing iterator over raw lines of one pass
struct LineRecords<'a, I> {
    lines: I,
    options: &'a SourceOptions,
    pass: String,
    line_no: usize,
    finished: bool,
}

impl<'a, I> LineRecords<'a, I> {
    fn new(lines: I, options: &'a SourceOptions, pass: &str) -> Self {
        info!(pass, "Starting pass");
        Self {
            lines,
            options,
            pass: pass.to_string(),
            line_no: 0,
            finished: false,
        }
    }
}

impl<I, S> Iterator for LineRecords<'_, I>
where
    I: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    type Item = Result<AuditRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line,
                None => {
                    if !self.finished {
                        self.finished = true;
                        info!(pass = %self.pass, processed = self.line_no, "Pass complete");
                    }
                    return None;
                }
            };

            self.line_no += 1;
            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(Error::Read {
                        line: self.line_no,
                        source,
                    }));
                }
            };
            let interval = self.options.progress_interval;
            if interval > 0 && self.line_no as u64 % interval == 0 {
                info!(pass = %self.pass, processed = self.line_no, "Progress");
            }

            let raw = line.as_ref();
            if raw.trim().is_empty() {
                debug!(line = self.line_no, "Skipping blank line");
                continue;
            }
            return Some(normalize_line(raw, self.line_no, &self.options.filter));
        }
    }
}

/// Activity log on disk, re-opened for every pass.
///
/// Memory use is bounded by one line regardless of file size.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    options: SourceOptions,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, options: SourceOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSource for FileSource {
    fn records(&self, pass: &str) -> Result<RecordIter<'_>> {
        let file = File::open(&self.path)?;
        let lines = BufReader::new(file).lines();
        Ok(Box::new(LineRecords::new(lines, &self.options, pass)))
    }
}

/// Raw lines held in memory, normalized again on every pass.
///
/// Used for input that cannot be re-read, such as stdin.
#[derive(Debug, Clone)]
pub struct LineSource {
    lines: Vec<String>,
    options: SourceOptions,
}

impl LineSource {
    pub fn new(lines: Vec<String>, options: SourceOptions) -> Self {
        Self { lines, options }
    }

    /// Read every line up front; a line that cannot be read is reported by number
    pub fn from_reader(reader: impl BufRead, options: SourceOptions) -> Result<Self> {
        let lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map_err(|source| Error::Read { line: i + 1, source }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(lines, options))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl AuditSource for LineSource {
    fn records(&self, pass: &str) -> Result<RecordIter<'_>> {
        let lines = self.lines.iter().map(|line| Ok::<_, io::Error>(line.as_str()));
        Ok(Box::new(LineRecords::new(lines, &self.options, pass)))
    }
}

/// Records normalized once and replayed from memory on every pass.
///
/// Trades memory proportional to the log for parsing it only once.
/// Records left empty by filtering are not kept.
#[derive(Debug, Clone, Default)]
pub struct BufferedSource {
    records: Vec<AuditRecord>,
}

impl BufferedSource {
    /// Drain one full pass of `source` into memory
    pub fn load(source: &dyn AuditSource) -> Result<Self> {
        let mut records = Vec::new();
        for record in source.records("buffer")? {
            let record = record?;
            if !record.is_empty() {
                records.push(record);
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<AuditRecord>> for BufferedSource {
    fn from(records: Vec<AuditRecord>) -> Self {
        Self { records }
    }
}

impl AuditSource for BufferedSource {
    fn records(&self, pass: &str) -> Result<RecordIter<'_>> {
        debug!(pass, records = self.records.len(), "Replaying buffered records");
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}
