use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Read of {len} bytes at offset {offset:#x} is out of bounds (buffer size {size:#x})")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("Invalid prefab: {0}")]
    InvalidPrefab(String),

    #[error("Invalid byte pattern: {0}")]
    InvalidPattern(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
