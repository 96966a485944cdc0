use crate::error::{HarExtractError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

const ENTRIES_POINTER: &str = "/log/entries";

/// A HAR document held in memory for the length of one run.
#[derive(Debug, Clone)]
pub struct HarArchive {
    path: PathBuf,
    document: Value,
}

impl HarArchive {
    /// Reads and decodes the archive at `path`.
    ///
    /// The existence check happens before any read so a typo in the path
    /// reports `InputNotFound` rather than a decode failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(HarExtractError::InputNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read(path)?;
        Self::from_slice(path, &content)
    }

    pub fn from_slice<P: Into<PathBuf>>(path: P, content: &[u8]) -> Result<Self> {
        let path = path.into();

        let document: Value =
            serde_json::from_slice(content).map_err(|e| HarExtractError::MalformedArchive {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        match document.pointer(ENTRIES_POINTER) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(HarExtractError::MalformedArchive {
                    path: path.display().to_string(),
                    reason: "log.entries is not an array".to_string(),
                })
            }
            None => {
                return Err(HarExtractError::MalformedArchive {
                    path: path.display().to_string(),
                    reason: "missing log.entries".to_string(),
                })
            }
        }

        log::debug!("Loaded archive {}", path.display());
        Ok(Self { path, document })
    }

    pub fn entries(&self) -> &[Value] {
        self.document
            .pointer(ENTRIES_POINTER)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tool that produced the capture, as `name version`.
    pub fn creator(&self) -> Option<String> {
        let creator = self.document.pointer("/log/creator")?;
        let name = creator.get("name").and_then(Value::as_str)?;

        match creator.get("version").and_then(Value::as_str) {
            Some(version) if !version.is_empty() => Some(format!("{} {}", name, version)),
            _ => Some(name.to_string()),
        }
    }
}
