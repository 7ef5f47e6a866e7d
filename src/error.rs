//! Error types for the smoke test

use thiserror::Error;

/// Result type alias for smoke-test operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a smoke-test run
///
/// Every variant funnels to the same outcome: the run is aborted, the
/// message lands on the error stream, and the process exits with code 1.
/// Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The static content server failed to start
    #[error("Static server failed: {0}")]
    Server(String),

    /// The headless browser failed to launch or open a tab
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Navigation to the page under test failed or timed out
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// In-page JavaScript evaluation failed
    #[error("Page evaluation failed: {0}")]
    Evaluation(String),

    /// Screenshot capture or write failed
    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
