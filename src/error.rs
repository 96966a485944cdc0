use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarExtractError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not find the archive: {path}")]
    InputNotFound { path: String },

    #[error("Malformed archive {path}: {reason}")]
    MalformedArchive { path: String, reason: String },

    #[error("Malformed media type: {mime_type:?}")]
    MalformedMediaType { mime_type: String },

    #[error("Failed to decode base64 body for {save_name}: {reason}")]
    BinaryDecode { save_name: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Ordinal counter exhausted after {last}")]
    OrdinalOverflow { last: u64 },
}

impl HarExtractError {
    /// Entry-level failures that the run may skip instead of aborting on.
    pub fn is_entry_level(&self) -> bool {
        matches!(
            self,
            HarExtractError::MalformedMediaType { .. } | HarExtractError::BinaryDecode { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            HarExtractError::InputNotFound { .. } => 1,
            HarExtractError::MalformedArchive { .. } => 2,
            HarExtractError::MalformedMediaType { .. } => 3,
            HarExtractError::BinaryDecode { .. } => 4,
            HarExtractError::Config { .. } => 5,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for HarExtractError {
    fn user_message(&self) -> String {
        match self {
            HarExtractError::InputNotFound { path } => {
                format!("Could not find the archive {}", path)
            }
            HarExtractError::MalformedArchive { path, reason } => {
                format!("Archive {} could not be read: {}", path, reason)
            }
            HarExtractError::MalformedMediaType { mime_type } => {
                format!("Media type {:?} has no subtype", mime_type)
            }
            HarExtractError::BinaryDecode { save_name, reason } => {
                format!("Body of {} is not valid base64: {}", save_name, reason)
            }
            HarExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            HarExtractError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            HarExtractError::OrdinalOverflow { last } => {
                format!("No save names left after ordinal {}", last)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            HarExtractError::InputNotFound { .. } => Some(
                "Check the path passed with --file. It must point to an existing .har file.".to_string()
            ),
            HarExtractError::MalformedArchive { .. } => Some(
                "Make sure the file is a HAR export (JSON with a log.entries array), e.g. from the browser's network panel.".to_string()
            ),
            HarExtractError::MalformedMediaType { .. } | HarExtractError::BinaryDecode { .. } => Some(
                "Run without --strict to skip broken entries and extract the rest.".to_string()
            ),
            HarExtractError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            HarExtractError::OrdinalOverflow { .. } => Some(
                "Start from a smaller --prefix so every selected entry gets its own number.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for HarExtractError {
    fn from(error: toml::de::Error) -> Self {
        HarExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = HarExtractError::InputNotFound {
            path: "missing.har".to_string(),
        };
        assert!(error.user_message().contains("missing.har"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_exit_codes() {
        let not_found = HarExtractError::InputNotFound { path: "x".to_string() };
        assert_eq!(not_found.exit_code(), 1);

        let malformed = HarExtractError::MalformedArchive {
            path: "x".to_string(),
            reason: "bad".to_string(),
        };
        assert_eq!(malformed.exit_code(), 2);

        let io = HarExtractError::Io(std::io::Error::other("disk full"));
        assert_eq!(io.exit_code(), 1);
    }

    #[test]
    fn test_entry_level_errors() {
        let media = HarExtractError::MalformedMediaType {
            mime_type: "png".to_string(),
        };
        assert!(media.is_entry_level());

        let decode = HarExtractError::BinaryDecode {
            save_name: "000001.png".to_string(),
            reason: "Invalid byte".to_string(),
        };
        assert!(decode.is_entry_level());

        let config = HarExtractError::Config {
            message: "bad".to_string(),
        };
        assert!(!config.is_entry_level());

        let overflow = HarExtractError::OrdinalOverflow { last: u64::MAX };
        assert!(!overflow.is_entry_level());
        assert_eq!(overflow.exit_code(), 1);
        assert!(overflow.suggestion().unwrap().contains("--prefix"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = HarExtractError::from(toml_error);
        assert!(matches!(error, HarExtractError::Config { .. }));
    }
}
