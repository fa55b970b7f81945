use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    assets::{
        decode::{Raster, decode_image},
        source::ImageSource,
    },
    foundation::error::{LampError, LampResult},
};

/// Turns an [`ImageSource`] into a decoded [`Raster`].
///
/// This is the only place image IO happens; renderers receive rasters, never bytes. Loads may run
/// on worker threads, hence `Send + Sync`.
pub trait ImageLoader: Send + Sync {
    /// Read and decode `source`.
    fn load(&self, source: &ImageSource) -> LampResult<Raster>;
}

/// Loader backed by the filesystem (files and presets) and in-memory uploads.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    /// Loader resolving relative paths and presets against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The assets root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read_bytes(&self, path: &Path) -> LampResult<Vec<u8>> {
        let full = self.resolve(path);
        std::fs::read(&full)
            .map_err(|e| LampError::decode(format!("read image '{}': {e}", full.display())))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, source: &ImageSource) -> LampResult<Raster> {
        match source {
            ImageSource::File(p) => decode_image(&self.read_bytes(p)?),
            ImageSource::Preset(p) => decode_image(&self.read_bytes(Path::new(&p.rel_path()))?),
            ImageSource::Memory { bytes, .. } => decode_image(bytes),
        }
    }
}

/// Default number of decoded rasters a [`CachingLoader`] keeps.
pub const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 8;

/// Memoizes successful loads of an inner loader, keyed by [`ImageSource::cache_key`].
///
/// At most `capacity` rasters are kept; inserting past that evicts the least recently used one.
/// Failures are not cached, so a missing file can appear later and load on retry.
pub struct CachingLoader<L> {
    inner: L,
    capacity: usize,
    cache: Mutex<RasterCache>,
}

#[derive(Default)]
struct RasterCache {
    rasters: HashMap<u64, Raster>,
    lru: VecDeque<u64>,
}

impl RasterCache {
    fn get(&mut self, key: u64) -> Option<Raster> {
        let raster = self.rasters.get(&key).cloned()?;
        self.touch(key);
        Some(raster)
    }

    fn insert(&mut self, key: u64, raster: Raster, capacity: usize) {
        self.rasters.insert(key, raster);
        self.touch(key);
        while self.rasters.len() > capacity {
            let Some(old) = self.lru.pop_front() else {
                break;
            };
            self.rasters.remove(&old);
            tracing::debug!(key = old, "evicted cached image");
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|&k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

impl<L: ImageLoader> CachingLoader<L> {
    /// Wrap `inner` with [`DEFAULT_IMAGE_CACHE_CAPACITY`].
    pub fn new(inner: L) -> Self {
        Self::with_capacity(inner, DEFAULT_IMAGE_CACHE_CAPACITY)
    }

    /// Wrap `inner`, keeping at most `capacity` rasters (clamped to at least 1).
    pub fn with_capacity(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            cache: Mutex::new(RasterCache::default()),
        }
    }

    /// Maximum number of cached rasters.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached rasters.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.rasters.len()).unwrap_or(0)
    }
}

impl<L: ImageLoader> ImageLoader for CachingLoader<L> {
    fn load(&self, source: &ImageSource) -> LampResult<Raster> {
        let key = source.cache_key();
        if let Ok(mut cache) = self.cache.lock()
            && let Some(raster) = cache.get(key)
        {
            return Ok(raster);
        }

        let raster = self.inner.load(source)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, raster.clone(), self.capacity);
        }
        Ok(raster)
    }
}

impl<L: ImageLoader + ?Sized> ImageLoader for Arc<L> {
    fn load(&self, source: &ImageSource) -> LampResult<Raster> {
        (**self).load(source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
