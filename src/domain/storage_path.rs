use std::fmt;

use super::{JobId, SourceFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(job_id: &JobId, format: SourceFormat) -> Self {
        Self(format!("{}.{}", job_id.as_uuid(), format.extension()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
