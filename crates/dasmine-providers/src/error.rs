use std::fmt;

/// Result type for dasmine-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading and normalizing activity records.
///
/// Every variant except `Io` (opening the input) is tied to a 1-based input line so the operator
/// can locate the corrupt record.
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// A line could not be read, e.g. it is not valid UTF-8
    Read {
        line: usize,
        source: std::io::Error,
    },

    /// Line is not a valid activity record
    Json {
        line: usize,
        source: serde_json::Error,
    },

    /// A field required for this kind of event is absent or null
    MissingField {
        line: usize,
        index: usize,
        field: &'static str,
    },

    /// `logTime` does not follow the fixed timestamp layout
    Timestamp {
        line: usize,
        index: usize,
        source: dasmine_types::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Read { line, source } => write!(f, "Read error at line {}: {}", line, source),
            Error::Json { line, source } => write!(f, "JSON error at line {}: {}", line, source),
            Error::MissingField { line, index, field } => write!(
                f,
                "Parse error at line {}: databaseActivityEventList[{}] has no '{}'",
                line, index, field
            ),
            Error::Timestamp {
                line,
                index,
                source,
            } => write!(
                f,
                "Parse error at line {}: databaseActivityEventList[{}]: {}",
                line, index, source
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Read { source, .. } => Some(source),
            Error::Json { source, .. } => Some(source),
            Error::Timestamp { source, .. } => Some(source),
            Error::MissingField { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Input line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Io(_) => None,
            Error::Read { line, .. }
            | Error::Json { line, .. }
            | Error::MissingField { line, .. }
            | Error::Timestamp { line, .. } => Some(*line),
        }
    }
}
