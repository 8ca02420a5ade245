use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered with an error status or an unexpected payload shape.
    #[error("Upstream data error ({provider}): {message}")]
    UpstreamData {
        provider: &'static str,
        message: String,
    },

    /// Not enough aligned rows (or no variance) to compute a correlation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        AppError::UpstreamData {
            provider,
            message: message.into(),
        }
    }
}
