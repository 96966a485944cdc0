use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::selection::SelectionPolicy;
use crate::{ExtractionRequest, SinkMode};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "harextractor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract embedded resources from HAR network captures")]
#[command(
    long_about = "HARExtractor reads a browser network capture (.har) and writes the response \
                  bodies it contains (images, scripts, stylesheets, documents) to standalone files, \
                  or lists them without writing anything."
)]
#[command(after_help = "EXAMPLES:\n  \
    harextractor -f capture.har --all\n  \
    harextractor -f capture.har --b64 --list\n  \
    harextractor -f capture.har --type png jpg -o images --keep\n  \
    harextractor -f capture.har --all --select logo.svg --prefix 100")]
#[command(arg_required_else_help = true)]
#[command(group(
    ArgGroup::new("selection")
        .args(["all", "b64", "nb64", "types"])
        .multiple(false)
))]
pub struct Cli {
    /// HAR file to read
    #[arg(short, long, value_name = "FILE", required_unless_present = "generate_config")]
    pub file: Option<PathBuf>,

    /// Output directory (default: out)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Only extract the entry whose original file name matches exactly
    #[arg(short, long, value_name = "NAME")]
    pub select: Option<String>,

    /// First ordinal used in save names (default: 1)
    #[arg(short = 'c', long, value_name = "N")]
    pub prefix: Option<u64>,

    /// Keep the original file name after the ordinal
    #[arg(short, long)]
    pub keep: bool,

    /// List matching entries instead of writing them
    #[arg(short, long)]
    pub list: bool,

    /// Select every entry
    #[arg(short, long)]
    pub all: bool,

    /// Select base64-encoded entries only
    #[arg(short, long)]
    pub b64: bool,

    /// Select entries that are not base64-encoded
    #[arg(short, long)]
    pub nb64: bool,

    /// Select entries by media subtype (e.g. png jpeg javascript)
    #[arg(short = 't', long = "type", value_name = "EXT", num_args = 1..)]
    pub types: Option<Vec<String>>,

    /// Configuration file path
    #[arg(long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for messages and listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Abort on the first broken entry instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Set each written file's modification time from the capture
    #[arg(long)]
    pub preserve_time: bool,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON lines
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.out.clone())
            .with_start_ordinal(self.prefix)
            .with_keep_original_name(self.keep)
            .with_strict(self.strict)
            .with_preserve_timestamps(self.preserve_time)
    }

    /// The selection flag group as a policy. `None` when no flag was given.
    pub fn selection_policy(&self) -> Option<SelectionPolicy> {
        if let Some(ref types) = self.types {
            Some(SelectionPolicy::by_type(types.iter().cloned()))
        } else if self.b64 {
            Some(SelectionPolicy::Base64Only)
        } else if self.nb64 {
            Some(SelectionPolicy::NonBase64Only)
        } else if self.all {
            Some(SelectionPolicy::All)
        } else {
            None
        }
    }

    pub fn extraction_request(&self) -> Option<ExtractionRequest> {
        Some(ExtractionRequest {
            archive: self.file.clone()?,
            policy: self.selection_policy()?,
            select: self.select.clone(),
            mode: if self.list {
                SinkMode::List
            } else {
                SinkMode::Extract
            },
        })
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
