use crate::archive::TransferEncoding;
use std::collections::BTreeSet;
use std::fmt;

/// Which extractable entries a run includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    All,
    Base64Only,
    NonBase64Only,
    ByType(BTreeSet<String>),
}

/// Why an entry was included. Listing output only shows the encoding for
/// entries that came in through an encoding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclusionReason {
    TypeMatch,
    Encoding,
}

impl SelectionPolicy {
    pub fn by_type<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectionPolicy::ByType(extensions.into_iter().map(Into::into).collect())
    }

    pub fn evaluate(&self, extension: &str, encoding: &TransferEncoding) -> Option<InclusionReason> {
        // A type match wins over any encoding rule.
        if let SelectionPolicy::ByType(types) = self {
            if types.contains(extension) {
                return Some(InclusionReason::TypeMatch);
            }
        }

        let wants_base64 = matches!(self, SelectionPolicy::Base64Only | SelectionPolicy::All);
        let wants_raw = matches!(self, SelectionPolicy::NonBase64Only | SelectionPolicy::All);

        match encoding {
            TransferEncoding::Base64 if wants_base64 => Some(InclusionReason::Encoding),
            TransferEncoding::Raw if wants_raw => Some(InclusionReason::Encoding),
            _ => None,
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::All => write!(f, "all"),
            SelectionPolicy::Base64Only => write!(f, "base64 only"),
            SelectionPolicy::NonBase64Only => write!(f, "non-base64 only"),
            SelectionPolicy::ByType(types) => {
                let types: Vec<&str> = types.iter().map(String::as_str).collect();
                write!(f, "types: {}", types.join(", "))
            }
        }
    }
}
