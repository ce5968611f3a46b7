use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_debug, engine_trace};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use grokview_core::{Content, ContentKey};
use image::imageops::FilterType;
use image::RgbaImage;

use crate::config::CacheConfig;
use crate::ingest::read_entry;

/// A decoded bitmap and the (bucketed) box it was fitted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub bitmap: RgbaImage,
    pub width: u32,
    pub height: u32,
}

impl CachedImage {
    pub fn byte_size(&self) -> usize {
        self.bitmap.as_raw().len()
    }
}

/// Shared by every caller that joined the same decode, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThumbnailError {
    #[error("cannot read image bytes: {0}")]
    Read(String),
    #[error("cannot decode image: {0}")]
    Decode(String),
    #[error("decode task did not finish: {0}")]
    Interrupted(String),
}

/// Produces a bitmap for an image content, fitted into `max_width × max_height`.
pub trait ImageDecoder: Send + Sync {
    fn decode(
        &self,
        content: &Content,
        max_width: u32,
        max_height: u32,
    ) -> Result<RgbaImage, ThumbnailError>;
}

/// Reads the entry from its archive and decodes it with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveImageDecoder;

impl ImageDecoder for ArchiveImageDecoder {
    fn decode(
        &self,
        content: &Content,
        max_width: u32,
        max_height: u32,
    ) -> Result<RgbaImage, ThumbnailError> {
        let bytes = read_entry(content).map_err(|e| ThumbnailError::Read(e.to_string()))?;
        decode_fitted(&bytes, max_width, max_height)
    }
}

/// Decodes `bytes` and shrinks the result to fit the box, keeping the aspect
/// ratio. Images already inside the box are not upscaled.
pub fn decode_fitted(bytes: &[u8], max_width: u32, max_height: u32) -> Result<RgbaImage, ThumbnailError> {
    let image = image::load_from_memory(bytes).map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    if image.width() <= max_width && image.height() <= max_height {
        return Ok(image.to_rgba8());
    }
    Ok(image
        .resize(max_width, max_height, FilterType::Triangle)
        .to_rgba8())
}

/// Rounds `value` to the nearest multiple of `step` (at least one step).
pub fn size_bucket(value: u32, step: u32) -> u32 {
    let step = step.max(1);
    (value.saturating_add(step / 2) / step).max(1).saturating_mul(step)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    content: ContentKey,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Requests that attached to a decode already in flight.
    pub joined: u64,
    pub evictions: u64,
}

type DecodeResult = Result<Arc<CachedImage>, ThumbnailError>;
type InFlight = Shared<BoxFuture<'static, DecodeResult>>;

struct Slot {
    image: Arc<CachedImage>,
    last_used: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, Slot>,
    in_flight: HashMap<CacheKey, InFlight>,
    total_bytes: usize,
    clock: u64,
    stats: CacheStats,
}

impl CacheInner {
    fn touch(&mut self, key: &CacheKey) -> Option<Arc<CachedImage>> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(key).map(|slot| {
            slot.last_used = clock;
            slot.image.clone()
        })
    }

    fn insert(&mut self, key: CacheKey, image: Arc<CachedImage>, config: &CacheConfig) {
        self.clock += 1;
        self.total_bytes += image.byte_size();
        let slot = Slot {
            image,
            last_used: self.clock,
        };
        if let Some(previous) = self.entries.insert(key.clone(), slot) {
            self.total_bytes -= previous.image.byte_size();
        }
        self.evict(&key, config);
    }

    /// Drops least-recently-used entries other than `keep` until both budgets
    /// hold. Readers keep their `Arc`, so evicted bitmaps stay valid for them.
    fn evict(&mut self, keep: &CacheKey, config: &CacheConfig) {
        while self.total_bytes > config.max_bytes || self.entries.len() > config.max_entries {
            let victim = self
                .entries
                .iter()
                .filter(|(key, _)| *key != keep)
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone());
            let Some(victim) = victim else {
                break;
            };
            if let Some(slot) = self.entries.remove(&victim) {
                self.total_bytes -= slot.image.byte_size();
                self.stats.evictions += 1;
                engine_debug!(
                    "Evicted thumbnail {}:{} {}x{}",
                    victim.content.zip_file_path,
                    victim.content.id,
                    victim.width,
                    victim.height
                );
            }
        }
    }
}

/// Memoizing, single-flight thumbnail cache.
///
/// Lookups take a short map lock only; decodes run on the blocking pool and
/// requests for a key already in flight await the same shared future.
pub struct ThumbnailCache {
    inner: Arc<Mutex<CacheInner>>,
    decoder: Arc<dyn ImageDecoder>,
    config: CacheConfig,
}

impl ThumbnailCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_decoder(config, Arc::new(ArchiveImageDecoder))
    }

    pub fn with_decoder(config: CacheConfig, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            decoder,
            config,
        }
    }

    /// Returns the cached or freshly decoded thumbnail of `content`.
    ///
    /// `Ok(None)` when the content is not an image. Failures are returned to
    /// every waiting caller and are not cached, so a later call retries.
    /// Dropping the returned future abandons only the wait; a decode that
    /// already started still completes and fills the cache.
    pub async fn get_or_create(
        &self,
        content: &Content,
        width: u32,
        height: u32,
    ) -> Result<Option<Arc<CachedImage>>, ThumbnailError> {
        if !content.is_image() {
            return Ok(None);
        }
        let key = CacheKey {
            content: content.key(),
            width: size_bucket(width, self.config.size_step),
            height: size_bucket(height, self.config.size_step),
        };

        let pending = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if let Some(image) = inner.touch(&key) {
                inner.stats.hits += 1;
                return Ok(Some(image));
            }
            match inner.in_flight.get(&key) {
                Some(pending) => {
                    inner.stats.joined += 1;
                    pending.clone()
                }
                None => {
                    inner.stats.misses += 1;
                    let pending = self.start_decode(key.clone(), content.clone());
                    inner.in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await.map(Some)
    }

    /// Must be called with the lock held so the in-flight entry is
    /// registered before the task can try to remove it.
    fn start_decode(&self, key: CacheKey, content: Content) -> InFlight {
        let decoder = self.decoder.clone();
        let inner = self.inner.clone();
        let config = self.config.clone();
        let (width, height) = (key.width, key.height);

        let task = tokio::spawn(async move {
            engine_trace!("Decoding {} at {}x{}", content.file_name(), width, height);
            let result = tokio::task::spawn_blocking(move || decoder.decode(&content, width, height))
                .await
                .map_err(|e| ThumbnailError::Interrupted(e.to_string()))
                .and_then(|decoded| decoded)
                .map(|bitmap| {
                    Arc::new(CachedImage {
                        bitmap,
                        width,
                        height,
                    })
                });

            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.in_flight.remove(&key);
            match &result {
                Ok(image) => inner.insert(key, image.clone(), &config),
                Err(err) => engine_debug!("Thumbnail decode failed: {}", err),
            }
            result
        });

        async move {
            task.await
                .map_err(|e| ThumbnailError::Interrupted(e.to_string()))
                .and_then(|result| result)
        }
        .boxed()
        .shared()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> usize {
        self.lock().total_bytes
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drops every cached entry. In-flight decodes are unaffected.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.total_bytes = 0;
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
