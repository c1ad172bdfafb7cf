use thiserror::Error;

/// Errors that can occur while deriving or persisting image artifacts.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// The payload could not be decoded into a still image.
    #[error("image decode failed: {0}")]
    Decode(String),
    /// Re-encoding the original or thumbnail failed.
    #[error("image encode failed: {0}")]
    Encode(String),
    /// An I/O error occurred while writing artifacts.
    #[error("image store IO error: {0}")]
    Io(#[from] std::io::Error),
}
