//! Boundary errors
//!
//! The state machines never fail. Errors only come from loading configuration
//! and from the stdin/stdout transport used by the binary.

/// Errors raised at the crate boundary
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error from a config file or the line transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`crate::Config`]
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Config parsed but describes an impossible device
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
