//! In-memory image buffer for the currently displayed image.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Where the pixels of an [`ImageBuffer`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Decoded from a file on disk.
    File(PathBuf),
    /// Produced by an edit and not yet persisted.
    Derived,
}

impl ImageSource {
    /// Returns the backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Derived => None,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Derived => write!(f, "derived/edited"),
        }
    }
}

/// An 8-bit, row-major pixel buffer.
///
/// Rows may be padded: `stride >= width * channels`. The last row does not
/// need to carry padding. Buffers are immutable once built; edits produce a
/// new buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
    source: ImageSource,
}

impl ImageBuffer {
    /// Highest channel count a buffer may carry.
    pub const MAX_CHANNELS: u8 = 4;

    /// Builds a buffer from raw parts, validating the layout.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        stride: usize,
        pixels: Vec<u8>,
        source: ImageSource,
    ) -> AppResult<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::validation(format!(
                "Image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if channels == 0 || channels > Self::MAX_CHANNELS {
            return Err(AppError::validation(format!(
                "Unsupported channel count: {channels}"
            )));
        }

        let row_bytes = width as usize * channels as usize;
        if stride < row_bytes {
            return Err(AppError::validation(format!(
                "Stride {stride} is smaller than row size {row_bytes}"
            )));
        }

        let required = required_len(height, stride, row_bytes)?;
        if pixels.len() < required {
            return Err(AppError::validation(format!(
                "Pixel data holds {} bytes, layout needs {required}",
                pixels.len()
            )));
        }

        Ok(Self {
            pixels,
            width,
            height,
            channels,
            stride,
            source,
        })
    }

    /// Builds a buffer with tightly packed rows.
    pub fn packed(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
        source: ImageSource,
    ) -> AppResult<Self> {
        let stride = width as usize * channels as usize;
        Self::from_raw(width, height, channels, stride, pixels, source)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Bytes per row, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes of pixel data per row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Raw backing storage, padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Where this buffer came from.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Whether the buffer is the product of an edit.
    pub fn is_derived(&self) -> bool {
        matches!(self.source, ImageSource::Derived)
    }

    /// Returns the pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        self.pixels.get(start..start + self.row_bytes())
    }

    /// Returns the samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let channels = self.channels as usize;
        let offset = x as usize * channels;
        self.row(y).map(|row| &row[offset..offset + channels])
    }

    /// Returns the pixel data with row padding removed.
    pub fn packed_pixels(&self) -> Cow<'_, [u8]> {
        let row_bytes = self.row_bytes();
        if self.stride == row_bytes {
            return Cow::Borrowed(&self.pixels[..row_bytes * self.height as usize]);
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks(self.stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        Cow::Owned(packed)
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("stride", &self.stride)
            .field("bytes", &self.pixels.len())
            .field("source", &self.source)
            .finish()
    }
}

fn required_len(height: u32, stride: usize, row_bytes: usize) -> AppResult<usize> {
    (height as usize - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(|| AppError::validation("Image layout overflows addressable memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded_rgb() -> ImageBuffer {
        // 2x2 RGB, stride 8 (2 bytes padding per row)
        let pixels = vec![
            1, 2, 3, 4, 5, 6, 0xAA, 0xAA, //
            7, 8, 9, 10, 11, 12, 0xAA, 0xAA,
        ];
        ImageBuffer::from_raw(2, 2, 3, 8, pixels, ImageSource::Derived).expect("valid layout")
    }

    #[test]
    fn test_rejects_stride_smaller_than_row() {
        let result = ImageBuffer::from_raw(4, 1, 3, 11, vec![0; 12], ImageSource::Derived);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_short_pixel_data() {
        let result = ImageBuffer::packed(2, 2, 3, vec![0; 11], ImageSource::Derived);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_and_excess_channels() {
        assert!(ImageBuffer::packed(1, 1, 0, vec![], ImageSource::Derived).is_err());
        assert!(ImageBuffer::packed(1, 1, 5, vec![0; 5], ImageSource::Derived).is_err());
    }

    #[test]
    fn test_last_row_needs_no_padding() {
        let image = ImageBuffer::from_raw(2, 2, 1, 4, vec![1, 2, 0, 0, 3, 4], ImageSource::Derived)
            .expect("valid layout");
        assert_eq!(image.row(1), Some(&[3u8, 4][..]));
    }

    #[test]
    fn test_row_and_pixel_skip_padding() {
        let image = padded_rgb();
        assert_eq!(image.row(1), Some(&[7u8, 8, 9, 10, 11, 12][..]));
        assert_eq!(image.pixel(1, 0), Some(&[4u8, 5, 6][..]));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.row(2), None);
    }

    #[test]
    fn test_packed_pixels_strips_padding() {
        let image = padded_rgb();
        assert_eq!(
            image.packed_pixels().as_ref(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn test_source_marker() {
        let pixels = vec![1, 2, 3];
        let image = ImageBuffer::packed(1, 1, 3, pixels, ImageSource::File(PathBuf::from("/tmp/a.png")))
            .expect("valid");
        assert!(!image.is_derived());
        assert_eq!(image.source().path(), Some(Path::new("/tmp/a.png")));
        assert_eq!(ImageSource::Derived.to_string(), "derived/edited");
    }
}
