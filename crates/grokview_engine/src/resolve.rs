use std::path::Path;

use grokview_core::{UNKNOWN_EXTENSION, UNKNOWN_MIME_TYPE};

/// Outcome of content-type sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub mime_type: String,
    pub extension: String,
}

impl ResolvedType {
    fn new(mime_type: &str, extension: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            extension: extension.to_string(),
        }
    }

    fn unknown() -> Self {
        Self::new(UNKNOWN_MIME_TYPE, UNKNOWN_EXTENSION)
    }

    /// Inconclusive sniffing: the entry becomes `Content::Unknown`.
    pub fn is_unknown(&self) -> bool {
        self.mime_type.is_empty() || self.mime_type == UNKNOWN_MIME_TYPE
    }
}

const TEXT_REFINEMENTS: &[(&str, &str, &str)] = &[
    ("json", "application/json", "json"),
    ("csv", "text/csv", "csv"),
    ("md", "text/markdown", "md"),
    ("markdown", "text/markdown", "md"),
    ("html", "text/html", "html"),
    ("htm", "text/html", "html"),
    ("xml", "application/xml", "xml"),
];

/// Determines MIME type and canonical extension from the leading bytes of an entry.
///
/// Binary formats are recognised by their signatures alone. When none matches,
/// text-looking samples become `text/plain`, and only then does
/// `fallback_name`'s extension refine the text flavour. Anything else
/// resolves to `application/octet-stream` / `bin`.
pub fn resolve(sample: &[u8], fallback_name: &str) -> ResolvedType {
    if let Some(kind) = infer::get(sample) {
        if kind.mime_type() != UNKNOWN_MIME_TYPE {
            return ResolvedType::new(kind.mime_type(), kind.extension());
        }
    }

    if !looks_like_text(sample) {
        return ResolvedType::unknown();
    }

    let name_extension = Path::new(fallback_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    name_extension
        .and_then(|ext| {
            TEXT_REFINEMENTS
                .iter()
                .find(|(candidate, _, _)| *candidate == ext)
                .map(|(_, mime, canonical)| ResolvedType::new(mime, canonical))
        })
        .unwrap_or_else(|| ResolvedType::new("text/plain", "txt"))
}

/// Valid UTF-8 (a code point cut off by the sample end is fine) without
/// NULs or control characters other than common whitespace and ESC.
fn looks_like_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    let valid = match std::str::from_utf8(sample) {
        Ok(text) => text,
        Err(err) if err.error_len().is_none() && err.valid_up_to() > 0 => {
            std::str::from_utf8(&sample[..err.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };
    valid
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r' | '\u{0C}' | '\u{1B}'))
}
