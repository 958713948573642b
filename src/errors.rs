/*!
 * Error types for the dualsrt application.
 *
 * The timing core owns two failure kinds (`TimingError`). Segmentation and
 * provider errors come from the collaborators around it, and `AppError`
 * wraps everything for callers that want a single type.
 */

use thiserror::Error;

/// Errors raised by the timing core (estimation, layout, synchronization)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    /// Pacing parameters are out of range; the caller must fix the configuration
    #[error("Invalid pacing configuration: {0}")]
    Configuration(String),

    /// A secondary track does not have one segment per primary window
    #[error("Length mismatch: expected {expected} segments to match the timeline, got {actual}")]
    LengthMismatch {
        /// Number of windows in the primary timeline
        expected: usize,
        /// Number of secondary segments supplied
        actual: usize,
    },
}

/// Errors produced while interpreting segmenter output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// The upstream model returned nothing usable
    #[error("Segmenter returned an empty response")]
    EmptyResponse,

    /// The response is not a list we know how to read
    #[error("Malformed segment list: {0}")]
    Malformed(String),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }

    /// Map an HTTP status and body to the matching provider error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the timing core
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Error from segmentation
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
