pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod selection;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, OutputConfig};
pub use error::{HarExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use archive::{EntryResolver, HarArchive, ResolvedEntry, TransferEncoding};
pub use extractor::{
    EntrySink, ExtractionProgress, ExtractionReport, ListingSink, OutputManager, PayloadWriter,
};
pub use selection::{InclusionReason, Selection, SelectionEngine, SelectionPolicy};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// What the sink does with selected entries. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    List,
    Extract,
}

impl SinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkMode::List => "list",
            SinkMode::Extract => "extract",
        }
    }
}

/// Per-invocation inputs that do not live in the configuration file.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub archive: PathBuf,
    pub policy: SelectionPolicy,
    pub select: Option<String>,
    pub mode: SinkMode,
}

/// Main library interface
pub struct HarExtractor {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl HarExtractor {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let show_progress = !quiet && output_mode == OutputMode::Human;
        let progress_manager = ProgressManager::new(show_progress);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Runs the load, resolve, select and sink stages over one archive.
    pub fn run(&self, request: &ExtractionRequest) -> Result<ExtractionReport> {
        self.output_formatter
            .start_operation(&format!("Reading {}", request.archive.display()));

        let archive = HarArchive::load(&request.archive)?;
        self.output_formatter
            .info(&format!("Found {} entries", archive.len()));
        if let Some(creator) = archive.creator() {
            self.output_formatter.debug(&format!("Captured by {}", creator));
        }

        let mut engine = SelectionEngine::new(
            request.policy.clone(),
            self.config.extraction.start_ordinal,
        )
        .with_name_filter(request.select.clone())
        .with_keep_original_name(self.config.extraction.keep_original_name);

        let policy = request.policy.to_string();

        match request.mode {
            SinkMode::List => {
                let mut sink = ListingSink::new(&self.output_formatter);
                let progress =
                    self.process_entries(&archive, &mut engine, &mut sink, &ProgressBar::hidden())?;

                Ok(ExtractionReport::new(
                    &archive,
                    request.mode.as_str(),
                    &policy,
                    None,
                    &progress,
                    engine.next_ordinal(),
                ))
            }
            SinkMode::Extract => {
                let output_manager = self.setup_output_directory()?;
                let mut writer = PayloadWriter::new(&output_manager)
                    .with_preserve_timestamps(self.config.output.preserve_timestamps);

                let progress = self.extract_entries(&archive, &mut engine, &mut writer)?;

                self.output_formatter.print_extraction_summary(&progress);
                self.output_formatter.success(&format!(
                    "Extracted {} files to {}",
                    progress.entries_selected,
                    output_manager.get_output_directory().display()
                ));

                Ok(ExtractionReport::new(
                    &archive,
                    request.mode.as_str(),
                    &policy,
                    Some(output_manager.get_output_directory()),
                    &progress,
                    engine.next_ordinal(),
                ))
            }
        }
    }

    fn setup_output_directory(&self) -> Result<OutputManager> {
        let output_manager = OutputManager::new(self.config.output.directory.clone());
        output_manager.initialize()?;

        self.output_formatter.debug(&format!(
            "Output directory: {}",
            output_manager.get_output_directory().display()
        ));

        Ok(output_manager)
    }

    /// Extract-mode pass with a progress bar.
    fn extract_entries(
        &self,
        archive: &HarArchive,
        engine: &mut SelectionEngine,
        writer: &mut PayloadWriter<'_>,
    ) -> Result<ExtractionProgress> {
        let entry_progress = self.progress_manager.create_entry_progress(archive.len() as u64);

        match self.process_entries(archive, engine, writer, &entry_progress) {
            Ok(progress) => {
                ui::progress::finish_progress_with_summary(
                    &entry_progress,
                    &format!("Extracted {} files", progress.entries_selected),
                    progress.elapsed(),
                );
                Ok(progress)
            }
            Err(e) => {
                entry_progress.abandon();
                Err(e)
            }
        }
    }

    fn process_entries<S: EntrySink>(
        &self,
        archive: &HarArchive,
        engine: &mut SelectionEngine,
        sink: &mut S,
        entry_progress: &ProgressBar,
    ) -> Result<ExtractionProgress> {
        let mut progress = ExtractionProgress::new(archive.len());
        let mut resolver = EntryResolver::new();
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        for raw in archive.entries() {
            progress.advance();

            if let Some(entry) = resolver.resolve(raw) {
                match engine.select(&entry) {
                    Ok(Some(selection)) => match sink.consume(&entry, &selection) {
                        Ok(bytes) => {
                            output.debug(&format!("{} <- {}", selection.save_name, entry.url));
                            progress.update_file(&selection, bytes);
                        }
                        Err(e) => self.recover(e, &entry, &mut progress, &output)?,
                    },
                    Ok(None) => {}
                    Err(e) => self.recover(e, &entry, &mut progress, &output)?,
                }
            }

            ui::progress::update_entry_progress(entry_progress, &progress);
        }

        Ok(progress)
    }

    /// Skips an entry-level failure with a warning, or hands it back when the
    /// run is strict or the failure is not tied to a single entry.
    fn recover(
        &self,
        error: HarExtractError,
        entry: &ResolvedEntry,
        progress: &mut ExtractionProgress,
        output: &ProgressAwareOutput<'_>,
    ) -> Result<()> {
        if self.config.extraction.strict || !error.is_entry_level() {
            return Err(error);
        }

        let message = format!(
            "Skipped entry {} ({}): {}",
            entry.index,
            entry.url,
            error.user_message()
        );
        log::debug!("{}", message);
        output.warning(&message);
        progress.add_skipped(message);

        Ok(())
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &HarExtractError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}
