use std::path::PathBuf;
use std::sync::Arc;

use grokview_core::{Archive, SaveCandidate};

use crate::export::{export, ExportError};
use crate::ingest::ingest_archive;
use crate::thumbnail::{ImageDecoder, ThumbnailCache};
use crate::EngineConfig;

/// Cheap-to-clone handle running archive IO on tokio's blocking pool.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    thumbnails: Arc<ThumbnailCache>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let thumbnails = Arc::new(ThumbnailCache::new(config.thumbnails.clone()));
        Self {
            config: Arc::new(config),
            thumbnails,
        }
    }

    pub fn with_decoder(config: EngineConfig, decoder: Arc<dyn ImageDecoder>) -> Self {
        let thumbnails = Arc::new(ThumbnailCache::with_decoder(
            config.thumbnails.clone(),
            decoder,
        ));
        Self {
            config: Arc::new(config),
            thumbnails,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }

    /// Ingests one archive; always resolves to a terminal archive.
    pub async fn ingest(&self, path: String) -> Archive {
        let prefix = self.config.sniff_prefix_bytes;
        let task_path = path.clone();
        match tokio::task::spawn_blocking(move || ingest_archive(&task_path, prefix)).await {
            Ok(archive) => archive,
            Err(err) => Archive::Failure {
                name: grokview_core::archive_name(&path),
                path,
                cause: format!("ingestion task did not finish: {err}"),
            },
        }
    }

    pub async fn export(
        &self,
        candidate: SaveCandidate,
        directory: String,
        name: String,
    ) -> Result<PathBuf, ExportError> {
        let options = self.config.export.clone();
        tokio::task::spawn_blocking(move || {
            export(&candidate, &PathBuf::from(directory), &name, &options)
        })
        .await
        .map_err(|err| ExportError::Interrupted(err.to_string()))?
    }
}
