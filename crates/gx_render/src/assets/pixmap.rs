//! Pixmap model
//!
//! A rectangular pixel buffer tagged with its pixel format. Pixmaps are
//! produced by image decoding or glyph rasterization and copied into texture
//! atlases; atlases never retain the caller's pixmap.

use std::fmt;

/// Pixel formats understood by atlases and textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit coverage/luminance channel
    Grayscale,
    /// Four 8-bit channels
    Rgba,
}

impl PixelFormat {
    /// Number of bytes used by one pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgba => 4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale => write!(f, "grayscale"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

/// Errors raised when constructing pixmaps
#[derive(Debug, thiserror::Error)]
pub enum PixmapError {
    /// Byte buffer does not match `width * height * bytes_per_pixel`
    #[error("Pixmap data size mismatch: expected {expected} bytes for {width}x{height} {format}, got {actual}")]
    SizeMismatch {
        /// Pixmap width
        width: u32,
        /// Pixmap height
        height: u32,
        /// Pixel format
        format: PixelFormat,
        /// Expected byte count
        expected: usize,
        /// Provided byte count
        actual: usize,
    },
}

/// Rectangular pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl Pixmap {
    /// Create a zero-filled pixmap
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0; Self::byte_len(width, height, format)],
        }
    }

    /// Wrap raw pixel bytes, validating their length
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, PixmapError> {
        let expected = Self::byte_len(width, height, format);
        if pixels.len() != expected {
            return Err(PixmapError::SizeMismatch {
                width,
                height,
                format,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Create a pixmap where every pixel has the same value
    ///
    /// `pixel` must hold exactly `format.bytes_per_pixel()` bytes.
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Self {
        debug_assert_eq!(pixel.len(), format.bytes_per_pixel(), "pixel size must match format");
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            format,
            pixels: pixel.repeat(count),
        }
    }

    fn byte_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major, top row first
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes in one row
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Bytes of the pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let offset = y as usize * self.stride() + x as usize * bpp;
        &self.pixels[offset..offset + bpp]
    }

    /// Copy `source` into this pixmap with its top-left corner at `(x, y)`
    ///
    /// Both pixmaps must share a format and `source` must fit.
    pub fn blit(&mut self, source: &Self, x: u32, y: u32) {
        assert_eq!(source.format, self.format, "blit between different pixel formats");
        assert!(
            x + source.width <= self.width && y + source.height <= self.height,
            "blit target rectangle out of bounds"
        );
        let bpp = self.format.bytes_per_pixel();
        let row_len = source.stride();
        let stride = self.stride();
        for row in 0..source.height as usize {
            let src = row * row_len;
            let dst = (y as usize + row) * stride + x as usize * bpp;
            self.pixels[dst..dst + row_len].copy_from_slice(&source.pixels[src..src + row_len]);
        }
    }

    /// Expand a grayscale pixmap to white RGBA using the gray value as alpha
    pub fn to_rgba(&self) -> Self {
        match self.format {
            PixelFormat::Rgba => self.clone(),
            PixelFormat::Grayscale => Self {
                width: self.width,
                height: self.height,
                format: PixelFormat::Rgba,
                pixels: self
                    .pixels
                    .iter()
                    .flat_map(|&alpha| [255, 255, 255, alpha])
                    .collect(),
            },
        }
    }
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl From<image::GrayImage> for Pixmap {
    fn from(img: image::GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            format: PixelFormat::Grayscale,
            pixels: img.into_raw(),
        }
    }
}

impl From<image::RgbaImage> for Pixmap {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            format: PixelFormat::Rgba,
            pixels: img.into_raw(),
        }
    }
}

impl From<image::DynamicImage> for Pixmap {
    fn from(img: image::DynamicImage) -> Self {
        match img {
            image::DynamicImage::ImageLuma8(gray) => gray.into(),
            other => other.to_rgba8().into(),
        }
    }
}
