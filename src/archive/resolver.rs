use serde_json::Value;

/// Declared body size, kept tri-state so an absent field differs from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSize {
    Absent,
    Zero,
    NonZero,
}

impl ContentSize {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => ContentSize::Absent,
            Some(Value::String(s)) if s.is_empty() => ContentSize::Absent,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => ContentSize::Zero,
            Some(Value::Bool(false)) => ContentSize::Zero,
            Some(_) => ContentSize::NonZero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEncoding {
    Raw,
    Base64,
    Other(String),
}

impl TransferEncoding {
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            None | Some("") => TransferEncoding::Raw,
            Some("base64") => TransferEncoding::Base64,
            Some(other) => TransferEncoding::Other(other.to_string()),
        }
    }

    /// The label as written in the archive; empty for raw bodies.
    pub fn label(&self) -> &str {
        match self {
            TransferEncoding::Raw => "",
            TransferEncoding::Base64 => "base64",
            TransferEncoding::Other(label) => label,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub size: ContentSize,
    pub mime_type: Option<String>,
    pub text: String,
    pub encoding: TransferEncoding,
}

impl ContentBlock {
    fn from_value(content: &Value) -> Self {
        Self {
            size: ContentSize::from_value(content.get("size")),
            mime_type: content
                .get("mimeType")
                .and_then(Value::as_str)
                .map(str::to_string),
            text: content
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            encoding: TransferEncoding::from_value(content.get("encoding")),
        }
    }

    pub fn is_extractable(&self) -> bool {
        self.size == ContentSize::NonZero && self.mime_type.is_some()
    }
}

/// An entry that carries an extractable payload.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub index: usize,
    pub url: String,
    pub mime_type: String,
    pub text: String,
    pub encoding: TransferEncoding,
    pub started: Option<String>,
}

/// Sequential resolver over archive entries.
///
/// Holds the last request URL seen. Entries that omit `request.url` are
/// attributed to it, which keeps response-only records from captures that
/// split a request and its response extractable.
#[derive(Debug, Default)]
pub struct EntryResolver {
    last_url: Option<String>,
    seen: usize,
}

impl EntryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, entry: &Value) -> Option<ResolvedEntry> {
        let index = self.seen;
        self.seen += 1;

        match entry.pointer("/request/url").and_then(Value::as_str) {
            Some(url) => self.last_url = Some(url.to_string()),
            None if self.last_url.is_some() => {
                log::debug!("Entry {} has no request URL, reusing the previous one", index);
            }
            None => {}
        }

        let content = ContentBlock::from_value(entry.pointer("/response/content")?);

        if !content.is_extractable() {
            log::trace!("Entry {} has no extractable content", index);
            return None;
        }

        let Some(url) = self.last_url.clone() else {
            log::debug!("Entry {} skipped: no request URL seen yet", index);
            return None;
        };

        Some(ResolvedEntry {
            index,
            url,
            mime_type: content.mime_type.unwrap_or_default(),
            text: content.text,
            encoding: content.encoding,
            started: entry
                .get("startedDateTime")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content_entry(url: Option<&str>, content: Value) -> Value {
        let mut entry = json!({ "response": { "content": content } });
        if let Some(url) = url {
            entry["request"] = json!({ "url": url });
        }
        entry
    }

    #[test]
    fn test_resolve_base64_entry() {
        let mut resolver = EntryResolver::new();
        let entry = content_entry(
            Some("https://cdn.test/img/a.png"),
            json!({"size": 100, "mimeType": "image/png", "encoding": "base64", "text": "AAECAw=="}),
        );

        let resolved = resolver.resolve(&entry).unwrap();
        assert_eq!(resolved.index, 0);
        assert_eq!(resolved.url, "https://cdn.test/img/a.png");
        assert_eq!(resolved.mime_type, "image/png");
        assert_eq!(resolved.encoding, TransferEncoding::Base64);
        assert_eq!(resolved.text, "AAECAw==");
    }

    #[test]
    fn test_size_gating() {
        let mut resolver = EntryResolver::new();

        let zero = content_entry(
            Some("https://a.test/b.txt"),
            json!({"size": 0, "mimeType": "text/plain", "text": "hello"}),
        );
        assert!(resolver.resolve(&zero).is_none());

        let absent = content_entry(
            Some("https://a.test/c.txt"),
            json!({"mimeType": "text/plain", "text": "hello"}),
        );
        assert!(resolver.resolve(&absent).is_none());

        let empty = content_entry(
            Some("https://a.test/d.txt"),
            json!({"size": "", "mimeType": "text/plain", "text": "hello"}),
        );
        assert!(resolver.resolve(&empty).is_none());

        let negative = content_entry(
            Some("https://a.test/e.txt"),
            json!({"size": -1, "mimeType": "text/plain", "text": "hello"}),
        );
        assert!(resolver.resolve(&negative).is_some());
    }

    #[test]
    fn test_missing_mime_type_is_not_extractable() {
        let mut resolver = EntryResolver::new();
        let entry = content_entry(Some("https://a.test/x"), json!({"size": 5, "text": "hello"}));
        assert!(resolver.resolve(&entry).is_none());
    }

    #[test]
    fn test_missing_content_block() {
        let mut resolver = EntryResolver::new();
        let entry = json!({"request": {"url": "https://a.test/x"}, "response": {"status": 204}});
        assert!(resolver.resolve(&entry).is_none());
        assert_eq!(resolver.last_url.as_deref(), Some("https://a.test/x"));
    }

    #[test]
    fn test_url_carry_over() {
        let mut resolver = EntryResolver::new();

        let first = content_entry(Some("https://a.test/first.js"), json!({"size": 0, "mimeType": "text/javascript"}));
        assert!(resolver.resolve(&first).is_none());

        let orphan = content_entry(None, json!({"size": 12, "mimeType": "text/css", "text": "body{}"}));
        let resolved = resolver.resolve(&orphan).unwrap();
        assert_eq!(resolved.url, "https://a.test/first.js");
        assert_eq!(resolved.index, 1);
    }

    #[test]
    fn test_no_url_before_first_request() {
        let mut resolver = EntryResolver::new();
        let orphan = content_entry(None, json!({"size": 12, "mimeType": "text/css", "text": "body{}"}));
        assert!(resolver.resolve(&orphan).is_none());
    }

    #[test]
    fn test_field_defaults() {
        let mut resolver = EntryResolver::new();
        let entry = content_entry(
            Some("https://a.test/blob"),
            json!({"size": 3, "mimeType": "application/octet-stream", "text": 42, "encoding": ""}),
        );

        let resolved = resolver.resolve(&entry).unwrap();
        assert_eq!(resolved.text, "");
        assert_eq!(resolved.encoding, TransferEncoding::Raw);
        assert_eq!(resolved.started, None);
    }

    #[test]
    fn test_other_encoding_label() {
        let encoding = TransferEncoding::from_value(Some(&json!("gzip")));
        assert_eq!(encoding, TransferEncoding::Other("gzip".to_string()));
        assert_eq!(encoding.label(), "gzip");
        assert_eq!(TransferEncoding::Raw.label(), "");
        assert_eq!(TransferEncoding::Base64.label(), "base64");
    }

    #[test]
    fn test_started_date_time_is_captured() {
        let mut resolver = EntryResolver::new();
        let mut entry = content_entry(
            Some("https://a.test/app.css"),
            json!({"size": 6, "mimeType": "text/css", "text": "body{}"}),
        );
        entry["startedDateTime"] = json!("2024-03-01T10:15:30.123Z");

        let resolved = resolver.resolve(&entry).unwrap();
        assert_eq!(resolved.started.as_deref(), Some("2024-03-01T10:15:30.123Z"));
    }
}
