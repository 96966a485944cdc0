use crate::error::{HarExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub preserve_timestamps: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub start_ordinal: u64,
    pub keep_original_name: bool,
    pub strict: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            preserve_timestamps: false,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            start_ordinal: 1,
            keep_original_name: false,
            strict: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HarExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| HarExtractError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| HarExtractError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["harextractor.toml", ".harextractor.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("Loading configuration from {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.output_dir {
            self.output.directory = directory.clone();
        }

        if let Some(start) = cli_args.start_ordinal {
            self.extraction.start_ordinal = start;
        }

        // Boolean switches can only turn a setting on.
        if cli_args.keep_original_name {
            self.extraction.keep_original_name = true;
        }

        if cli_args.strict {
            self.extraction.strict = true;
        }

        if cli_args.preserve_timestamps {
            self.output.preserve_timestamps = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.directory.as_os_str().is_empty() {
            return Err(HarExtractError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        if self.output.directory.is_file() {
            return Err(HarExtractError::Config {
                message: format!(
                    "Output directory is an existing file: {}",
                    self.output.directory.display()
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub start_ordinal: Option<u64>,
    pub keep_original_name: bool,
    pub strict: bool,
    pub preserve_timestamps: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_start_ordinal(mut self, start: Option<u64>) -> Self {
        self.start_ordinal = start;
        self
    }

    pub fn with_keep_original_name(mut self, keep: bool) -> Self {
        self.keep_original_name = keep;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_preserve_timestamps(mut self, preserve: bool) -> Self {
        self.preserve_timestamps = preserve;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.extraction.start_ordinal, 1);
        assert!(!config.extraction.keep_original_name);
        assert!(!config.extraction.strict);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.output.directory = PathBuf::new();
        assert!(config.validate().is_err());

        let file = NamedTempFile::new().unwrap();
        config.output.directory = file.path().to_path_buf();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.extraction.start_ordinal = 42;
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.extraction.start_ordinal, 42);
        assert_eq!(loaded_config.output.directory, config.output.directory);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[output]\ndirectory = \"assets\"\n").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("assets"));
        assert!(!config.output.preserve_timestamps);
        assert_eq!(config.extraction.start_ordinal, 1);
        assert!(!config.extraction.strict);

        std::fs::write(temp_file.path(), "[extraction]\nstrict = true\n").unwrap();
        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(config.extraction.strict);
        assert_eq!(config.extraction.start_ordinal, 1);
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_file(temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(HarExtractError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_output_dir(Some(PathBuf::from("assets")))
            .with_start_ordinal(Some(100))
            .with_keep_original_name(true);

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.output.directory, PathBuf::from("assets"));
        assert_eq!(config.extraction.start_ordinal, 100);
        assert!(config.extraction.keep_original_name);
        assert!(!config.extraction.strict);
    }

    #[test]
    fn test_unset_overrides_keep_file_values() {
        let mut config = Config::default();
        config.extraction.strict = true;
        config.extraction.start_ordinal = 7;

        config.merge_with_cli_args(&CliOverrides::new());

        assert!(config.extraction.strict);
        assert_eq!(config.extraction.start_ordinal, 7);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[output]"));
        assert!(sample.contains("[extraction]"));
    }
}
