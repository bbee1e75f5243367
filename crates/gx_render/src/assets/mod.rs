//! Asset management system
//!
//! Pixmaps and the loader interface through which the painter obtains font
//! files and decoded images by name.

pub mod pixmap;
pub mod resource_loader;

pub use pixmap::{PixelFormat, Pixmap, PixmapError};
pub use resource_loader::{AssetError, DirectoryAssets, MemoryAssets, ResourceLoader};
