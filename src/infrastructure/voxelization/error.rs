//! Errors raised while decoding mesh files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("file too small to be a valid STL ({len} bytes)")]
    TooShort { len: usize },

    #[error("binary STL declares {expected} triangles but only {available} are present")]
    TruncatedBinary { expected: u32, available: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: facet has {vertices} vertices, expected 3")]
    MalformedFacet { line: usize, vertices: usize },

    #[error("line {line}: vertex index {index} is out of range")]
    IndexOutOfRange { line: usize, index: i64 },

    #[error("face refers to missing vertex {index}")]
    DanglingIndex { index: u32 },

    #[error("mesh has non-finite vertex coordinates")]
    NonFinite,

    #[error("mesh contains no triangles")]
    Empty,

    #[error("file is not valid UTF-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl MeshLoadError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
