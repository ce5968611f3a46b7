use serde::Deserialize;

/// Bytes read from each entry for content-type sniffing.
pub const DEFAULT_SNIFF_PREFIX_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sniff_prefix_bytes: usize,
    pub thumbnails: CacheConfig,
    pub export: ExportOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sniff_prefix_bytes: DEFAULT_SNIFF_PREFIX_BYTES,
            thumbnails: CacheConfig::default(),
            export: ExportOptions::default(),
        }
    }
}

/// Budgets for the thumbnail cache. Whichever limit is hit first triggers eviction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_bytes: usize,
    pub max_entries: usize,
    /// Requested sizes are rounded to a multiple of this many pixels.
    pub size_step: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: 256 * 1024 * 1024,
            max_entries: 512,
            size_step: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Deflate level for exported ZIPs; `None` uses the library default.
    pub compression_level: Option<i64>,
}
