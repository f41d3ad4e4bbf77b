//! Error type shared by the engine, the input layer and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Backing storage for a coordinate history could not be allocated.
    #[error("Out of memory allocating coordinate history ({capacity} samples)")]
    OutOfMemory { capacity: usize },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
