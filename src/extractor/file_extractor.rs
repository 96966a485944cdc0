use crate::archive::{ResolvedEntry, TransferEncoding};
use crate::error::{HarExtractError, Result};
use crate::extractor::output_manager::OutputManager;
use crate::extractor::EntrySink;
use crate::selection::Selection;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Standard alphabet with padding, accepting non-zero bits in the last
/// symbol the way browser exports sometimes produce them.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub entries_processed: usize,
    pub total_entries: usize,
    pub entries_selected: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub files_by_extension: BTreeMap<String, usize>,
    pub start_time: Instant,
    pub skipped: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_entries: usize) -> Self {
        Self {
            entries_processed: 0,
            total_entries,
            entries_selected: 0,
            bytes_written: 0,
            current_file: None,
            files_by_extension: BTreeMap::new(),
            start_time: Instant::now(),
            skipped: Vec::new(),
        }
    }

    pub fn advance(&mut self) {
        self.entries_processed += 1;
    }

    pub fn update_file(&mut self, selection: &Selection, bytes: u64) {
        self.entries_selected += 1;
        self.bytes_written += bytes;
        *self
            .files_by_extension
            .entry(selection.extension.clone())
            .or_insert(0) += 1;
        self.current_file = Some(selection.save_name.clone());
    }

    pub fn add_skipped<S: Into<String>>(&mut self, reason: S) {
        self.skipped.push(reason.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Extract-mode sink: decodes each selected body and writes it under the
/// output directory.
pub struct PayloadWriter<'a> {
    output: &'a OutputManager,
    preserve_timestamps: bool,
}

impl<'a> PayloadWriter<'a> {
    pub fn new(output: &'a OutputManager) -> Self {
        Self {
            output,
            preserve_timestamps: false,
        }
    }

    pub fn with_preserve_timestamps(mut self, preserve: bool) -> Self {
        self.preserve_timestamps = preserve;
        self
    }

    fn write_file(&self, dest: &Path, body: &[u8]) -> Result<()> {
        let file = fs::File::create(dest)?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        writer.write_all(body)?;
        writer.flush()?;
        Ok(())
    }

    fn apply_timestamp(&self, dest: &Path, started: Option<&str>) {
        let Some(started) = started else {
            return;
        };

        match parse_started(started) {
            Some(time) => {
                if let Err(e) = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(time)) {
                    log::debug!("Could not set mtime on {}: {}", dest.display(), e);
                }
            }
            None => log::debug!("Ignoring unparseable startedDateTime {:?}", started),
        }
    }
}

impl EntrySink for PayloadWriter<'_> {
    fn consume(&mut self, entry: &ResolvedEntry, selection: &Selection) -> Result<u64> {
        let body = decode_body(entry, selection)?;
        let dest = self.output.save_path(&selection.save_name)?;

        self.write_file(&dest, &body)?;
        log::debug!("Wrote {} ({} bytes) from {}", dest.display(), body.len(), entry.url);

        if self.preserve_timestamps {
            self.apply_timestamp(&dest, entry.started.as_deref());
        }

        Ok(body.len() as u64)
    }
}

/// Bytes to write for an entry: the base64-decoded body, or the text as is.
pub fn decode_body<'e>(entry: &'e ResolvedEntry, selection: &Selection) -> Result<Cow<'e, [u8]>> {
    match entry.encoding {
        TransferEncoding::Base64 => {
            // Captures often wrap base64 bodies at 76 columns.
            let compact: String = entry
                .text
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();

            BODY_ENGINE
                .decode(compact)
                .map(Cow::Owned)
                .map_err(|e| HarExtractError::BinaryDecode {
                    save_name: selection.save_name.clone(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(Cow::Borrowed(entry.text.as_bytes())),
    }
}

fn parse_started(value: &str) -> Option<SystemTime> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|time| SystemTime::from(time.with_timezone(&chrono::Utc)))
}
