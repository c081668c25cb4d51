//! Error types for GrahaNav

use thiserror::Error;

/// GrahaNav error type
#[derive(Error, Debug)]
pub enum GrahaError {
    #[error("Invalid heading: {0}° (expected 0, 90, 180 or 270)")]
    InvalidHeading(i32),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unrecognized message type: {0}")]
    UnrecognizedMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Robot error: {0}")]
    Robot(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),
}

impl From<toml::de::Error> for GrahaError {
    fn from(e: toml::de::Error) -> Self {
        GrahaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrahaError>;
