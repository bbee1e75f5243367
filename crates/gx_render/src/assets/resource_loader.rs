//! Resource loading interface
//!
//! The painter never touches the filesystem or decodes images itself. It asks
//! a [`ResourceLoader`] for font bytes and decoded pixmaps by logical name and
//! caches whatever comes back for its own lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Pixmap;

/// Errors raised while loading assets
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding failed
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Source of named fonts and pixmaps
pub trait ResourceLoader {
    /// Raw TrueType/OpenType bytes for the font called `name`
    fn load_font(&self, name: &str) -> Option<Vec<u8>>;

    /// Decoded pixmap for the image called `name`
    fn load_pixmap(&self, name: &str) -> Option<Pixmap>;
}

/// In-memory asset store
#[derive(Debug, Default)]
pub struct MemoryAssets {
    fonts: HashMap<String, Vec<u8>>,
    pixmaps: HashMap<String, Pixmap>,
}

impl MemoryAssets {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `name`
    pub fn insert_font(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.fonts.insert(name.into(), bytes);
    }

    /// Register a pixmap under `name`
    pub fn insert_pixmap(&mut self, name: impl Into<String>, pixmap: Pixmap) {
        self.pixmaps.insert(name.into(), pixmap);
    }

    /// Builder-style [`MemoryAssets::insert_font`]
    pub fn with_font(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert_font(name, bytes);
        self
    }

    /// Builder-style [`MemoryAssets::insert_pixmap`]
    pub fn with_pixmap(mut self, name: impl Into<String>, pixmap: Pixmap) -> Self {
        self.insert_pixmap(name, pixmap);
        self
    }
}

impl ResourceLoader for MemoryAssets {
    fn load_font(&self, name: &str) -> Option<Vec<u8>> {
        self.fonts.get(name).cloned()
    }

    fn load_pixmap(&self, name: &str) -> Option<Pixmap> {
        self.pixmaps.get(name).cloned()
    }
}

/// Loads assets from `<root>/fonts/<name>` and `<root>/images/<name>`
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Create a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_font(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join("fonts").join(name);
        log::debug!("Loading font from: {:?}", path);
        Ok(std::fs::read(path)?)
    }

    fn read_image(&self, name: &str) -> Result<Pixmap, AssetError> {
        let path = self.root.join("images").join(name);
        log::debug!("Loading image from: {:?}", path);
        let img = image::open(&path)?;
        log::info!("Loaded image {}x{} from {:?}", img.width(), img.height(), path);
        Ok(img.into())
    }
}

impl ResourceLoader for DirectoryAssets {
    fn load_font(&self, name: &str) -> Option<Vec<u8>> {
        self.read_font(name)
            .map_err(|e| log::error!("Failed to load font {}: {}", name, e))
            .ok()
    }

    fn load_pixmap(&self, name: &str) -> Option<Pixmap> {
        self.read_image(name)
            .map_err(|e| log::error!("Failed to load image {}: {}", name, e))
            .ok()
    }
}
