//! Bounded thumbnail cache.
//!
//! Entries are keyed on `(path, size)` and remember the source file's
//! fingerprint (modification time and length) at decode time. A hit is only
//! served when the fingerprint still matches, so edited files are re-decoded.
//! Eviction is least-recently-used, bounded both by entry count and by the
//! total number of stored pixel bytes.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use lru::LruCache;

use crate::config::Config;
use crate::error::{AppError, IoResultExt};
use crate::models::thumbnail::{Bitmap, Thumbnail};

/// Placeholders are drawn no larger than this, whatever size is requested.
pub const MAX_PLACEHOLDER_EDGE: u32 = 512;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage, AppError> {
        let reader = ImageReader::open(path)
            .at(path)?
            .with_guessed_format()
            .at(path)?;
        reader
            .decode()
            .map_err(|e| AppError::General(format!("decode {}: {e}", path.display())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    size: u32,
}

struct CachedThumbnail {
    thumbnail: Thumbnail,
    fingerprint: Fingerprint,
}

impl CachedThumbnail {
    fn cost(&self) -> usize {
        self.thumbnail.bitmap().byte_len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

pub struct ThumbnailCache<D = ImageCrateDecoder> {
    decoder: D,
    entries: LruCache<CacheKey, CachedThumbnail>,
    byte_budget: usize,
    bytes_used: usize,
    stats: CacheStats,
}

impl ThumbnailCache<ImageCrateDecoder> {
    pub fn new(max_entries: NonZeroUsize, byte_budget: usize) -> Self {
        Self::with_decoder(ImageCrateDecoder, max_entries, byte_budget)
    }

    pub fn from_config(config: &Config) -> Self {
        let max_entries =
            NonZeroUsize::new(config.thumbnail_cache_entries).unwrap_or(NonZeroUsize::MIN);
        Self::new(max_entries, config.thumbnail_cache_bytes)
    }
}

impl<D: ImageDecoder> ThumbnailCache<D> {
    pub fn with_decoder(decoder: D, max_entries: NonZeroUsize, byte_budget: usize) -> Self {
        Self {
            decoder,
            entries: LruCache::new(max_entries),
            byte_budget,
            bytes_used: 0,
            stats: CacheStats::default(),
        }
    }

    /// Returns the thumbnail for `path` at `size`. Never fails: anything that
    /// cannot be decoded yields the placeholder.
    pub fn get(&mut self, path: &Path, size: u32) -> Thumbnail {
        let size = size.max(1);
        let key = CacheKey {
            path: path.to_path_buf(),
            size,
        };

        let Some(fingerprint) = Fingerprint::of(path) else {
            self.remove(&key);
            log::debug!("thumbnail source unavailable: {}", path.display());
            return Thumbnail::Placeholder(placeholder(size));
        };

        if let Some(cached) = self.entries.get(&key) {
            if cached.fingerprint == fingerprint {
                self.stats.hits += 1;
                return cached.thumbnail.clone();
            }
            log::debug!("thumbnail stale: {}", path.display());
        }
        self.remove(&key);
        self.stats.misses += 1;

        let thumbnail = self.render(path, size);
        self.insert(
            key,
            CachedThumbnail {
                thumbnail: thumbnail.clone(),
                fingerprint,
            },
        );
        thumbnail
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bytes_used(&self) -> usize {
        self.bytes_used
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.bytes_used = 0;
    }

    fn render(&mut self, path: &Path, size: u32) -> Thumbnail {
        if !is_image_file(path) {
            return Thumbnail::Placeholder(placeholder(size));
        }
        match self.decoder.decode(path) {
            Ok(image) => Thumbnail::Image(Arc::new(scale_to_fit(&image, size))),
            Err(err) => {
                log::warn!("thumbnail decode failed, using placeholder: {err}");
                Thumbnail::Placeholder(placeholder(size))
            }
        }
    }

    fn insert(&mut self, key: CacheKey, value: CachedThumbnail) {
        self.bytes_used += value.cost();
        if let Some((_, evicted)) = self.entries.push(key, value) {
            self.bytes_used -= evicted.cost();
            self.stats.evictions += 1;
        }
        while self.bytes_used > self.byte_budget && self.entries.len() > 1 {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.bytes_used -= evicted.cost();
                    self.stats.evictions += 1;
                }
                None => break,
            }
        }
    }

    fn remove(&mut self, key: &CacheKey) {
        if let Some(old) = self.entries.pop(key) {
            self.bytes_used -= old.cost();
        }
    }
}

/// Fits the longest side within `size`, keeping the aspect ratio. Images that
/// already fit are kept at their native resolution.
pub fn scale_to_fit(image: &DynamicImage, size: u32) -> Bitmap {
    let fitted = if image.width() <= size && image.height() <= size {
        image.clone()
    } else {
        image.resize(size, size, FilterType::Triangle)
    };
    let rgba = fitted.to_rgba8();
    Bitmap {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    }
}

/// Square placeholder of edge `size`, capped at `MAX_PLACEHOLDER_EDGE`.
pub fn placeholder(size: u32) -> Arc<Bitmap> {
    Arc::new(placeholder_bitmap(size.clamp(1, MAX_PLACEHOLDER_EDGE)))
}

/// Grey page with a darker border and folded corner.
fn placeholder_bitmap(size: u32) -> Bitmap {
    const FILL: [u8; 4] = [0xdd, 0xdd, 0xdd, 0xff];
    const EDGE: [u8; 4] = [0x88, 0x88, 0x88, 0xff];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    let margin = size / 8;
    let fold = size / 4;
    let (left, right) = (margin, size.saturating_sub(margin + 1));
    let (top, bottom) = (0, size.saturating_sub(1));

    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let inside = x >= left && x <= right && y >= top && y <= bottom;
            let px = if !inside {
                CLEAR
            } else if y - top < fold && right - x < fold - (y - top) {
                // folded corner
                CLEAR
            } else if x == left || x == right || y == top || y == bottom {
                EDGE
            } else {
                FILL
            };
            pixels.extend_from_slice(&px);
        }
    }
    Bitmap {
        width: size,
        height: size,
        pixels,
    }
}
