use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One document carried through the bundle: where it came from, its
/// frontmatter block and its body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Project-relative path, always `/`-separated.
    pub source_path: String,
    /// Text between the two `---` lines, without the dash lines (may be empty).
    pub header: String,
    /// Main text after the metadata block (may be empty).
    pub body: String,
}

impl DocRecord {
    pub fn new(
        source_path: impl Into<String>,
        header: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            header: header.into(),
            body: body.into(),
        }
    }

    pub fn has_header(&self) -> bool {
        !self.header.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum MdlocError {
    #[error("bundle not found or unreadable: {0}")]
    MissingBundle(PathBuf),
    #[error("no valid records found in {0}; check the bundle format")]
    EmptyBundle(PathBuf),
    #[error("refusing to write outside the project root: {0}")]
    UnsafePath(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MdlocError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
