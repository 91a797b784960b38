//! Error types for RekhaNav

use thiserror::Error;

/// RekhaNav error type
#[derive(Error, Debug)]
pub enum RekhaError {
    #[error("Runtime I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),
}

impl From<toml::de::Error> for RekhaError {
    fn from(e: toml::de::Error) -> Self {
        RekhaError::Config(e.to_string())
    }
}

impl From<image::ImageError> for RekhaError {
    fn from(e: image::ImageError) -> Self {
        RekhaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RekhaError>;
