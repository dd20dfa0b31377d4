//! Viewer configuration.
//!
//! Options are plain serde data so a host can keep them in a JSON file:
//!
//! ```json
//! { "source": { "path": "forms/intake.pdf" }, "initial_page": 0, "read_only": false }
//! ```

use crate::error::DocumentResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where document bytes come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl DocumentSource {
    pub fn read(self) -> DocumentResult<Vec<u8>> {
        match self {
            DocumentSource::Bytes(bytes) => Ok(bytes),
            DocumentSource::Path(path) => Ok(std::fs::read(path)?),
        }
    }

    /// Short description for log lines
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Bytes(bytes) => format!("{} bytes", bytes.len()),
            DocumentSource::Path(path) => path.display().to_string(),
        }
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::Path(path)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Document opened by `Viewer::open`
    pub source: Option<DocumentSource>,
    /// Page rendered right after a successful load
    pub initial_page: usize,
    /// Disables field authoring
    pub read_only: bool,
}

impl ViewerOptions {
    pub fn with_source(mut self, source: impl Into<DocumentSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.initial_page = page;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Parse options from a JSON file. A relative `source` path is resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read viewer options from {}", path.display()))?;
        let mut options: ViewerOptions = serde_json::from_str(&content)
            .with_context(|| format!("invalid viewer options in {}", path.display()))?;

        if let Some(DocumentSource::Path(source)) = &mut options.source
            && source.is_relative()
            && let Some(dir) = path.parent()
        {
            *source = dir.join(&*source);
        }
        Ok(options)
    }
}
