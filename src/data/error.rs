use thiserror::Error;

/// Coarse classification of a [`LoadError`] for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset could not be fetched or decoded. Terminal for the session.
    DataUnavailable,
}

/// Failure to produce a dataset. The loader never retries.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch dataset from {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("failed to decode dataset: {0}")]
    Decode(String),

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Fetch { .. } | LoadError::Decode(_) | LoadError::UnsupportedFormat(_) => {
                ErrorKind::DataUnavailable
            }
        }
    }

    pub(crate) fn decode(err: anyhow::Error) -> Self {
        LoadError::Decode(format!("{err:#}"))
    }
}
