use crate::archive::{ResolvedEntry, TransferEncoding};
use crate::error::{HarExtractError, Result};
use crate::selection::naming::{compose_save_name, media_extension, original_base_name};
use crate::selection::policy::{InclusionReason, SelectionPolicy};

/// An included entry with its assigned ordinal and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub ordinal: u64,
    pub save_name: String,
    pub original_name: String,
    pub extension: String,
    pub encoding: TransferEncoding,
    pub reason: InclusionReason,
}

impl Selection {
    /// Encoding label shown next to the save name in listings.
    pub fn listing_label(&self) -> Option<&str> {
        match self.reason {
            InclusionReason::Encoding if !self.encoding.label().is_empty() => {
                Some(self.encoding.label())
            }
            _ => None,
        }
    }
}

/// Naming and selection stage. Owns the ordinal accumulator for one run.
pub struct SelectionEngine {
    policy: SelectionPolicy,
    name_filter: Option<String>,
    keep_original_name: bool,
    ordinal: u64,
    exhausted: bool,
}

impl SelectionEngine {
    pub fn new(policy: SelectionPolicy, start_ordinal: u64) -> Self {
        Self {
            policy,
            name_filter: None,
            keep_original_name: false,
            ordinal: start_ordinal,
            exhausted: false,
        }
    }

    pub fn with_name_filter(mut self, name: Option<String>) -> Self {
        self.name_filter = name;
        self
    }

    pub fn with_keep_original_name(mut self, keep: bool) -> Self {
        self.keep_original_name = keep;
        self
    }

    /// The ordinal the next included entry gets. `None` once `u64::MAX` has
    /// been handed out.
    pub fn next_ordinal(&self) -> Option<u64> {
        (!self.exhausted).then_some(self.ordinal)
    }

    /// Decides whether `entry` is included.
    ///
    /// Returns `Ok(None)` for excluded entries. The ordinal only advances on
    /// inclusion. A media type without a subtype is reported before the name
    /// filter runs. Including an entry after the counter is exhausted fails
    /// with `OrdinalOverflow`.
    pub fn select(&mut self, entry: &ResolvedEntry) -> Result<Option<Selection>> {
        let extension = media_extension(&entry.mime_type)?;
        let original_name = original_base_name(&entry.url);
        let save_name =
            compose_save_name(self.ordinal, original_name, self.keep_original_name, extension);

        if let Some(ref wanted) = self.name_filter {
            if wanted != original_name {
                return Ok(None);
            }
        }

        let Some(reason) = self.policy.evaluate(extension, &entry.encoding) else {
            log::trace!("Entry {} ({}) excluded by policy", entry.index, save_name);
            return Ok(None);
        };

        if self.exhausted {
            return Err(HarExtractError::OrdinalOverflow { last: self.ordinal });
        }

        let selection = Selection {
            ordinal: self.ordinal,
            save_name,
            original_name: original_name.to_string(),
            extension: extension.to_string(),
            encoding: entry.encoding.clone(),
            reason,
        };

        match self.ordinal.checked_add(1) {
            Some(next) => self.ordinal = next,
            None => self.exhausted = true,
        }
        Ok(Some(selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, mime_type: &str, encoding: TransferEncoding) -> ResolvedEntry {
        ResolvedEntry {
            index: 0,
            url: url.to_string(),
            mime_type: mime_type.to_string(),
            text: String::new(),
            encoding,
            started: None,
        }
    }

    #[test]
    fn test_ordinal_advances_on_include_only() {
        let mut engine = SelectionEngine::new(SelectionPolicy::Base64Only, 1);

        let png = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);
        let css = entry("https://a.test/site.css", "text/css", TransferEncoding::Raw);
        let gif = entry("https://a.test/b.gif", "image/gif", TransferEncoding::Base64);

        let first = engine.select(&png).unwrap().unwrap();
        assert_eq!(first.ordinal, 1);
        assert_eq!(first.save_name, "000001.png");

        assert!(engine.select(&css).unwrap().is_none());
        assert_eq!(engine.next_ordinal(), Some(2));

        let second = engine.select(&gif).unwrap().unwrap();
        assert_eq!(second.save_name, "000002.gif");
        assert_eq!(engine.next_ordinal(), Some(3));
    }

    #[test]
    fn test_start_ordinal_and_keep() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, 17).with_keep_original_name(true);

        let js = entry("https://a.test/js/app.js", "application/javascript", TransferEncoding::Raw);
        let selection = engine.select(&js).unwrap().unwrap();

        assert_eq!(selection.save_name, "000017app.js.javascript");
        assert_eq!(selection.original_name, "app.js");
        assert_eq!(selection.extension, "javascript");
    }

    #[test]
    fn test_name_filter_runs_before_policy() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, 1)
            .with_name_filter(Some("logo.svg".to_string()));

        let other = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);
        assert!(engine.select(&other).unwrap().is_none());
        assert_eq!(engine.next_ordinal(), Some(1));

        let logo = entry("https://a.test/img/logo.svg", "image/svg+xml", TransferEncoding::Raw);
        let selection = engine.select(&logo).unwrap().unwrap();
        assert_eq!(selection.save_name, "000001.svg+xml");
    }

    #[test]
    fn test_type_match_reason() {
        let mut engine = SelectionEngine::new(SelectionPolicy::by_type(["png"]), 1);

        let png = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);
        let selection = engine.select(&png).unwrap().unwrap();
        assert_eq!(selection.reason, InclusionReason::TypeMatch);
        assert_eq!(selection.listing_label(), None);
    }

    #[test]
    fn test_listing_label() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, 1);

        let png = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);
        let css = entry("https://a.test/a.css", "text/css", TransferEncoding::Raw);

        assert_eq!(engine.select(&png).unwrap().unwrap().listing_label(), Some("base64"));
        assert_eq!(engine.select(&css).unwrap().unwrap().listing_label(), None);
    }

    #[test]
    fn test_malformed_media_type() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, 1)
            .with_name_filter(Some("other.bin".to_string()));

        let broken = entry("https://a.test/blob", "binary", TransferEncoding::Raw);
        let result = engine.select(&broken);

        assert!(matches!(result, Err(HarExtractError::MalformedMediaType { .. })));
        assert_eq!(engine.next_ordinal(), Some(1));
    }

    #[test]
    fn test_save_names_are_distinct() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, 1);
        let png = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);

        let names: std::collections::HashSet<String> = (0..50)
            .map(|_| engine.select(&png).unwrap().unwrap().save_name)
            .collect();

        assert_eq!(names.len(), 50);
    }

    #[test]
    fn test_ordinal_counter_exhaustion() {
        let mut engine = SelectionEngine::new(SelectionPolicy::All, u64::MAX);
        let png = entry("https://a.test/a.png", "image/png", TransferEncoding::Base64);
        let css = entry("https://a.test/a.css", "text/css", TransferEncoding::Raw);

        let last = engine.select(&png).unwrap().unwrap();
        assert_eq!(last.save_name, "18446744073709551615.png");
        assert_eq!(engine.next_ordinal(), None);

        let result = engine.select(&css);
        assert!(matches!(
            result,
            Err(HarExtractError::OrdinalOverflow { last }) if last == u64::MAX
        ));

        // Excluded entries never need an ordinal.
        let mut engine = SelectionEngine::new(SelectionPolicy::Base64Only, u64::MAX);
        engine.select(&png).unwrap().unwrap();
        assert!(engine.select(&css).unwrap().is_none());
    }
}
