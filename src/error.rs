//! Error types shared by the HTTP client and the page controllers.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// truncated body). The detail is only logged.
    #[error("Something went wrong")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The file selected for upload could not be read.
    #[error("Failed to read {path}: {reason}")]
    File { path: String, reason: String },
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        log::warn!("transport failure: {}", e);
        ApiError::Transport(e.to_string())
    }
}

/// Type alias for backend call results
pub type ApiResult<T> = Result<T, ApiError>;

/// An action rejected on the client before any request is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Precondition {
    #[error("{0}")]
    LoginRequired(&'static str),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Please select a file")]
    NoFileSelected,

    #[error("No video is open")]
    NothingOpen,
}
