use thiserror::Error;

/// Failure taxonomy for a pipeline run.
///
/// Degenerate statistics (constant volume, too few correlation pairs) are not
/// errors; they resolve to sentinel values in the analysis layer.
#[derive(Debug, Error)]
pub enum AlignerError {
    /// Malformed term, ticker, or date range. Raised before any network call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A provider returned no usable data for the requested parameters.
    #[error("{provider} returned no usable data: {reason}")]
    DataUnavailable { provider: &'static str, reason: String },

    /// Both fetches succeeded but the two series share no common date.
    #[error("interest and price series share no common date")]
    AlignmentEmpty,

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignerError {
    pub fn unavailable(provider: &'static str, reason: impl Into<String>) -> Self {
        AlignerError::DataUnavailable {
            provider,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlignerError>;
