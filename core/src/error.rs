use thiserror::Error;

#[derive(Debug, Error)]
pub enum EspFatError {
    #[error("Invalid size format: '{0}' (expected decimal or 0x-prefixed hex)")]
    InvalidSizeFormat(String),

    #[error("Size {size} bytes is out of range ({min}..={max} bytes)")]
    OutOfRange { size: u64, min: u64, max: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
