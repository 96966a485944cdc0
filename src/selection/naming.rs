use crate::error::{HarExtractError, Result};

pub const ORDINAL_WIDTH: usize = 6;

/// Subtype of a `type/subtype` media type, used verbatim as the extension.
pub fn media_extension(mime_type: &str) -> Result<&str> {
    mime_type
        .split('/')
        .nth(1)
        .ok_or_else(|| HarExtractError::MalformedMediaType {
            mime_type: mime_type.to_string(),
        })
}

/// Last path segment of a URL, or the whole URL when it has no `/`.
pub fn original_base_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

pub fn compose_save_name(ordinal: u64, base_name: &str, keep: bool, extension: &str) -> String {
    let stem = if keep {
        format!("{:0width$}{}", ordinal, base_name, width = ORDINAL_WIDTH)
    } else {
        format!("{:0width$}", ordinal, width = ORDINAL_WIDTH)
    };

    format!("{}.{}", stem, extension)
}
