use std::fmt;

/// Result type for dasmine-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Raw timestamp is shorter than the fixed layout requires
    TimestampTooShort { raw: String, required: usize },

    /// Compact timestamp does not have exactly the expected number of digits
    CompactLength { raw: String, expected: usize },

    /// A fixed-offset field of the raw timestamp is not made of ASCII digits
    TimestampNotNumeric { raw: String, field: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TimestampTooShort { raw, required } => write!(
                f,
                "Timestamp error: '{}' is shorter than {} characters",
                raw, required
            ),
            Error::CompactLength { raw, expected } => write!(
                f,
                "Timestamp error: '{}' is {} characters long, expected {}",
                raw,
                raw.len(),
                expected
            ),
            Error::TimestampNotNumeric { raw, field } => {
                write!(f, "Timestamp error: {} of '{}' is not numeric", field, raw)
            }
        }
    }
}

impl std::error::Error for Error {}
