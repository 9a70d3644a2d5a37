// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layer image loading.
//!
//! Decoded layer images are held in a byte-budgeted cache keyed by their
//! source path. Entries are evicted least recently used first whenever a new
//! image would push the total over budget.

use crate::models::project::Scene;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;

/// Default cache budget (50 MiB).
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
struct CachedImage {
    image: Arc<RgbaImage>,
    size: usize,
}

/// Decoded image size in bytes (4 bytes per RGBA pixel).
pub fn image_bytes(image: &RgbaImage) -> usize {
    image.width() as usize * image.height() as usize * 4
}

/// LRU cache of decoded images.
#[derive(Debug)]
pub struct ImageCache {
    max_bytes: usize,
    total_bytes: usize,
    /// Least recently used first
    entries: Vec<(String, CachedImage)>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES)
    }
}

impl ImageCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            total_bytes: 0,
            entries: Vec::new(),
        }
    }

    fn position(&self, src: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == src)
    }

    /// Cached image for `src`, marking it as most recently used.
    pub fn get(&mut self, src: &str) -> Option<Arc<RgbaImage>> {
        let i = self.position(src)?;
        let entry = self.entries.remove(i);
        let image = Arc::clone(&entry.1.image);
        self.entries.push(entry);
        Some(image)
    }

    /// Return the cached image for `src`, decoding it from disk on a miss.
    pub fn load(&mut self, src: &str) -> Result<Arc<RgbaImage>> {
        if let Some(image) = self.get(src) {
            return Ok(image);
        }
        let image = image::open(src)
            .with_context(|| format!("Failed to load image {}", src))?
            .to_rgba8();
        log::debug!("Decoded {} ({}x{})", src, image.width(), image.height());
        Ok(self.insert(src, image))
    }

    /// Store `image` under `src`, evicting old entries until it fits.
    ///
    /// An image larger than the whole budget is still kept, alone.
    pub fn insert(&mut self, src: &str, image: RgbaImage) -> Arc<RgbaImage> {
        self.remove(src);
        let size = image_bytes(&image);
        while self.total_bytes + size > self.max_bytes && !self.entries.is_empty() {
            let (key, evicted) = self.entries.remove(0);
            self.total_bytes -= evicted.size;
            log::debug!("Evicted {} from image cache", key);
        }
        let image = Arc::new(image);
        self.entries.push((
            src.to_string(),
            CachedImage {
                image: Arc::clone(&image),
                size,
            },
        ));
        self.total_bytes += size;
        image
    }

    /// Drop `src` from the cache. Returns whether it was present.
    pub fn remove(&mut self, src: &str) -> bool {
        match self.position(src) {
            Some(i) => {
                let (_, entry) = self.entries.remove(i);
                self.total_bytes -= entry.size;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }

    pub fn contains(&self, src: &str) -> bool {
        self.position(src).is_some()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every image layer of `scene`, resolving sources against `base_dir`.
    ///
    /// Returns the number of images that loaded. Failures are logged and
    /// skipped.
    pub fn preload_scene(&mut self, scene: &Scene, base_dir: &Path) -> usize {
        let mut loaded = 0;
        for src in scene.layers.iter().filter_map(|layer| layer.image_src()) {
            let path = base_dir.join(src);
            match self.load(&path.to_string_lossy()) {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("Skipping layer image for scene {}: {:#}", scene.id, e),
            }
        }
        loaded
    }
}
