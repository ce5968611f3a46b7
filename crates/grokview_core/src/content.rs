/// Extension carried by every [`Content::Unknown`].
pub const UNKNOWN_EXTENSION: &str = "bin";

/// MIME type assigned when sniffing is inconclusive.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Fields shared by every content variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentEntry {
    /// Stable identifier, unique within the owning archive.
    pub id: String,
    /// Logical path inside the archive.
    pub path: String,
    pub mime_type: String,
    /// Raw entry name used to look the entry up in its archive.
    pub entry_name: String,
    /// Filesystem path of the owning archive.
    pub zip_file_path: String,
    /// Epoch millis.
    pub last_modified: Option<i64>,
    /// Uncompressed size in bytes, -1 if unknown.
    pub size: i64,
}

/// Resolved, typed representation of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Content {
    Unknown(ContentEntry),
    Resolved {
        entry: ContentEntry,
        extension: String,
    },
}

/// Cross-archive identity of a content: `id` is only unique per archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    pub zip_file_path: String,
    pub id: String,
}

impl Content {
    pub fn entry(&self) -> &ContentEntry {
        match self {
            Content::Unknown(entry) | Content::Resolved { entry, .. } => entry,
        }
    }

    pub fn id(&self) -> &str {
        &self.entry().id
    }

    pub fn path(&self) -> &str {
        &self.entry().path
    }

    pub fn mime_type(&self) -> &str {
        &self.entry().mime_type
    }

    pub fn extension(&self) -> &str {
        match self {
            Content::Unknown(_) => UNKNOWN_EXTENSION,
            Content::Resolved { extension, .. } => extension,
        }
    }

    pub fn entry_name(&self) -> &str {
        &self.entry().entry_name
    }

    pub fn zip_file_path(&self) -> &str {
        &self.entry().zip_file_path
    }

    pub fn last_modified(&self) -> Option<i64> {
        self.entry().last_modified
    }

    pub fn size(&self) -> i64 {
        self.entry().size
    }

    pub fn key(&self) -> ContentKey {
        ContentKey {
            zip_file_path: self.zip_file_path().to_string(),
            id: self.id().to_string(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/")
    }

    /// Display and export name, `{id}.{extension}`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id(), self.extension())
    }
}

/// Type filters the user can toggle; applied at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentFilter {
    Images,
    Videos,
    Audio,
    Documents,
    Other,
}

const DOCUMENT_APPLICATION_TYPES: &[&str] = &[
    "application/pdf",
    "application/json",
    "application/xml",
    "application/rtf",
    "application/msword",
    "application/epub+zip",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.oasis.opendocument.text",
];

impl ContentFilter {
    pub const ALL: [ContentFilter; 5] = [
        ContentFilter::Images,
        ContentFilter::Videos,
        ContentFilter::Audio,
        ContentFilter::Documents,
        ContentFilter::Other,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ContentFilter::Images => "Images",
            ContentFilter::Videos => "Videos",
            ContentFilter::Audio => "Audio",
            ContentFilter::Documents => "Documents",
            ContentFilter::Other => "Other",
        }
    }

    /// The single filter category a MIME type belongs to.
    pub fn classify(mime_type: &str) -> ContentFilter {
        if mime_type.starts_with("image/") {
            ContentFilter::Images
        } else if mime_type.starts_with("video/") {
            ContentFilter::Videos
        } else if mime_type.starts_with("audio/") {
            ContentFilter::Audio
        } else if mime_type.starts_with("text/") || DOCUMENT_APPLICATION_TYPES.contains(&mime_type)
        {
            ContentFilter::Documents
        } else {
            ContentFilter::Other
        }
    }

    pub fn matches(self, content: &Content) -> bool {
        Self::classify(content.mime_type()) == self
    }

    pub fn parse(name: &str) -> Option<ContentFilter> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.display_name().eq_ignore_ascii_case(name.trim()))
    }
}
