use crate::archive::HarArchive;
use crate::error::{HarExtractError, Result};
use crate::extractor::file_extractor::ExtractionProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub archive: String,
    pub creator: Option<String>,
    pub mode: String,
    pub policy: String,
    pub output_directory: Option<String>,
    pub summary: ExtractionSummary,
    pub extraction_time: DateTime<Utc>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_entries: usize,
    pub entries_selected: usize,
    pub bytes_written: u64,
    /// `None` when the run handed out `u64::MAX`.
    pub next_ordinal: Option<u64>,
    pub duration: Duration,
    pub files_by_extension: BTreeMap<String, usize>,
}

impl ExtractionReport {
    pub fn new(
        archive: &HarArchive,
        mode: &str,
        policy: &str,
        output_directory: Option<&Path>,
        progress: &ExtractionProgress,
        next_ordinal: Option<u64>,
    ) -> Self {
        Self {
            archive: archive.path().display().to_string(),
            creator: archive.creator(),
            mode: mode.to_string(),
            policy: policy.to_string(),
            output_directory: output_directory.map(|p| p.display().to_string()),
            summary: ExtractionSummary {
                total_entries: progress.total_entries,
                entries_selected: progress.entries_selected,
                bytes_written: progress.bytes_written,
                next_ordinal,
                duration: progress.elapsed(),
                files_by_extension: progress.files_by_extension.clone(),
            },
            extraction_time: Utc::now(),
            skipped: progress.skipped.clone(),
        }
    }
}

/// Owns the output directory of an extract run.
pub struct OutputManager {
    output_directory: PathBuf,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    /// Creates the directory and any missing parents. Existing directories
    /// and their contents are left alone.
    pub fn initialize(&self) -> Result<()> {
        if self.output_directory.is_file() {
            return Err(HarExtractError::InvalidPath {
                path: format!(
                    "Output path is an existing file: {}",
                    self.output_directory.display()
                ),
            });
        }

        fs::create_dir_all(&self.output_directory)?;
        Ok(())
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn save_path(&self, save_name: &str) -> Result<PathBuf> {
        let name = Path::new(save_name);
        let mut components = name.components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.output_directory.join(name)),
            _ => Err(HarExtractError::InvalidPath {
                path: format!("Save name must be a single file name: {}", save_name),
            }),
        }
    }
}
