use std::path::PathBuf;

use crate::Address;

pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("file load error: \"{}\" file not found", path.display())]
    NotFound { path: PathBuf },

    #[error("file load error: \"{}\" is {file_size} bytes, smaller than memory size {memory_size} bytes", path.display())]
    SizeMismatch {
        path: PathBuf,
        file_size: u64,
        memory_size: usize,
    },

    /// A span is longer than the whole block, whatever its end points
    #[error("memory overflow: requested {operation} size {requested} bytes larger than memory size {size} bytes")]
    Overflow {
        operation: &'static str,
        requested: usize,
        size: usize,
    },

    #[error("address ${address:04X} outside memory window ${begin:04X}-${end:04X}")]
    OutOfRange {
        address: usize,
        begin: Address,
        end: Address,
    },

    #[error("file save error: \"{}\" file already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("empty random range {min}..={max}")]
    EmptyRange { min: u8, max: u8 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
