//! Error type shared by every text file operation.

use thiserror::Error;

/// Errors that can occur while handling a text file
#[derive(Error, Debug)]
pub enum TextFileError {
    /// A required input was missing or unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation requires a file that does not exist
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Open, read, write, delete, directory creation or encoding failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A handler config could not be parsed
    #[error("Invalid config: {0}")]
    Config(String),
}

impl TextFileError {
    /// True for failures the caller can correct by changing its inputs.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            TextFileError::InvalidArgument(_) | TextFileError::InvalidState(_)
        )
    }
}

impl From<toml::de::Error> for TextFileError {
    fn from(err: toml::de::Error) -> Self {
        TextFileError::Config(err.to_string())
    }
}

/// Result type for text file operations
pub type Result<T> = std::result::Result<T, TextFileError>;
