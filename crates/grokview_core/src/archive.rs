use crate::Content;

/// Lifecycle of one uploaded archive.
///
/// `Processing` moves to exactly one of the terminal variants; terminal
/// archives never change again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Archive {
    Processing {
        path: String,
        name: String,
    },
    Processed {
        path: String,
        name: String,
        /// In archive-entry order.
        contents: Vec<Content>,
    },
    Failure {
        path: String,
        name: String,
        cause: String,
    },
}

impl Archive {
    /// Placeholder for a freshly accepted upload. The name is the last path
    /// component, or the whole path when it has none.
    pub fn processing(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = archive_name(&path);
        Archive::Processing { path, name }
    }

    pub fn path(&self) -> &str {
        match self {
            Archive::Processing { path, .. }
            | Archive::Processed { path, .. }
            | Archive::Failure { path, .. } => path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Archive::Processing { name, .. }
            | Archive::Processed { name, .. }
            | Archive::Failure { name, .. } => name,
        }
    }

    /// Contents of a processed archive; empty otherwise.
    pub fn contents(&self) -> &[Content] {
        match self {
            Archive::Processed { contents, .. } => contents,
            Archive::Processing { .. } | Archive::Failure { .. } => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Archive::Processing { .. })
    }
}

/// File name component of an archive path, accepting both separators.
pub fn archive_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }
}

/// An archive as shown in the overview. Identity is the archive path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverviewArchive {
    pub archive: Archive,
    pub expansion: Expansion,
}

impl OverviewArchive {
    pub fn collapsed(archive: Archive) -> Self {
        Self {
            archive,
            expansion: Expansion::Collapsed,
        }
    }

    pub fn path(&self) -> &str {
        self.archive.path()
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_takes_name_from_path() {
        let archive = Archive::processing("/home/user/exports/grok.zip");
        assert_eq!(archive.name(), "grok.zip");
        assert_eq!(archive.path(), "/home/user/exports/grok.zip");
        assert!(!archive.is_terminal());
    }

    #[test]
    fn archive_name_handles_windows_separators_and_trailing_slash() {
        assert_eq!(archive_name(r"C:\exports\a.zip"), "a.zip");
        assert_eq!(archive_name("dir/b.zip/"), "b.zip");
        assert_eq!(archive_name("plain.zip"), "plain.zip");
    }

    #[test]
    fn expansion_toggles() {
        assert_eq!(Expansion::Collapsed.toggled(), Expansion::Expanded);
        assert_eq!(Expansion::Expanded.toggled(), Expansion::Collapsed);
    }
}
