use thiserror::Error;

/// Convenience result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    /// The resource could not be opened or read.
    Io,
    /// The content could not be parsed.
    Parse,
    /// A lookup went past the width of a record.
    IndexOutOfRange,
}

/// Error type returned by extractors.
///
/// This is a single error enum shared by the CSV and JSON extractors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The content retrieval capability failed for `resource`.
    #[error("{resource} could not be fetched: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// Delimited-text reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The resource is not valid JSON (or is a bare `null` document).
    #[error("{resource} could not be parsed as json: {message}")]
    Parse { resource: String, message: String },

    /// The configured identifier column is wider than the record.
    #[error("identifier column {index} is out of range for a record of {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// No extractor format could be chosen for a path.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}

impl ExtractError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ExtractErrorKind {
        match self {
            ExtractError::Io(_) | ExtractError::Fetch { .. } => ExtractErrorKind::Io,
            ExtractError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ExtractErrorKind::Io,
                _ => ExtractErrorKind::Parse,
            },
            ExtractError::Parse { .. } => ExtractErrorKind::Parse,
            ExtractError::IndexOutOfRange { .. } => ExtractErrorKind::IndexOutOfRange,
            ExtractError::UnsupportedFormat { .. } => ExtractErrorKind::Io,
        }
    }
}
