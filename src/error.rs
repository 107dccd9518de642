//! Error types for mail canonicalization

use thiserror::Error;

/// Errors that can occur before the canonical pipeline runs.
///
/// Normalization, conversion and serialization never fail; every error
/// here comes from turning message bytes into a raw mail record.
#[derive(Error, Debug)]
pub enum Error {
    /// No message bytes were received
    #[error("No message data received")]
    EmptyInput,

    /// Failed to parse the email structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Failed to decode a body or attachment part
    #[error("Failed to decode content: {0}")]
    Decode(String),
}

impl From<mailparse::MailParseError> for Error {
    fn from(err: mailparse::MailParseError) -> Self {
        Self::Structure(err.to_string())
    }
}

/// Result type for mail canonicalization operations
pub type Result<T> = std::result::Result<T, Error>;
