use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use grokview_engine::EngineConfig;
use log::LevelFilter;
use serde::Deserialize;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "grokview.ron";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Contents of the RON settings file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn level_filter(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| SettingsError::LogLevel(self.log_level.clone()))
    }
}

/// Loads settings from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] if it
/// exists. Only an explicitly named file is required to exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(Settings::default());
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    };
    parse_settings(&content).map_err(|source| SettingsError::Parse { path, source })
}

pub fn parse_settings(content: &str) -> Result<Settings, ron::error::SpannedError> {
    ron::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_struct_yields_defaults() {
        let settings = parse_settings("()").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn nested_engine_fields_override_defaults() {
        let settings = parse_settings(
            r#"(
                engine: (
                    sniff_prefix_bytes: 4096,
                    thumbnails: (max_entries: 16),
                    export: (compression_level: Some(9)),
                ),
                log_level: "debug",
            )"#,
        )
        .unwrap();

        assert_eq!(settings.engine.sniff_prefix_bytes, 4096);
        assert_eq!(settings.engine.thumbnails.max_entries, 16);
        assert_eq!(settings.engine.thumbnails.size_step, 8);
        assert_eq!(settings.engine.export.compression_level, Some(9));
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.level_filter(),
            Err(SettingsError::LogLevel(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_settings(Some(dir.path().join("absent.ron").as_path()));
        assert!(matches!(result, Err(SettingsError::Read { .. })));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"(engine: [").unwrap();

        let result = load_settings(Some(path.as_path()));
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
