//! GrokView engine: archive IO, content sniffing, thumbnails and export.
mod config;
mod engine;
mod export;
mod filename;
mod ingest;
mod persist;
mod resolve;
mod thumbnail;

pub use config::{CacheConfig, EngineConfig, ExportOptions, DEFAULT_SNIFF_PREFIX_BYTES};
pub use engine::Engine;
pub use export::{export, ExportError};
pub use filename::{dedupe_entry_names, entry_id, sanitize_file_name, with_extension};
pub use ingest::{ingest_archive, read_entry, IngestError};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{resolve, ResolvedType};
pub use thumbnail::{
    decode_fitted, size_bucket, ArchiveImageDecoder, CacheStats, CachedImage, ImageDecoder,
    ThumbnailCache, ThumbnailError,
};
