use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Input modality of a voxelization job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    #[serde(rename = "3d")]
    Mesh,
    #[serde(rename = "2d")]
    Image,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Mesh => "3d",
            SourceKind::Image => "2d",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Concrete file format of an upload, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Stl,
    Obj,
    Png,
    Jpeg,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Result<Self, UnsupportedFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "stl" => Ok(Self::Stl),
            "obj" => Ok(Self::Obj),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    pub fn from_filename(filename: &str) -> Result<Self, UnsupportedFormat> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Stl | Self::Obj => SourceKind::Mesh,
            Self::Png | Self::Jpeg => SourceKind::Image,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported file extension {extension:?}; expected one of .obj .stl .png .jpg .jpeg")]
pub struct UnsupportedFormat {
    pub extension: String,
}
