use std::fmt;

/// Result type for dasmine-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// Reading or normalizing the source failed
    Provider(dasmine_providers::Error),

    /// The row sink rejected a write
    Sink(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Provider(err) => write!(f, "{}", err),
            Error::Sink(err) => write!(f, "Output error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Provider(err) => Some(err),
            Error::Sink(err) => Some(err.as_ref()),
        }
    }
}

impl From<dasmine_providers::Error> for Error {
    fn from(err: dasmine_providers::Error) -> Self {
        Error::Provider(err)
    }
}
