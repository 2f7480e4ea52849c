//! Root module for pixel data adapters.
//!
//! Additional support for certain transfer syntaxes
//! can be added via Cargo features.
//!
//! - [`jpeg`](jpeg) provides native JPEG decoding
//!   (baseline, extended and lossless)
//!   and encoding (baseline).
//!   Requires the `jpeg` feature,
//!   enabled by default.
//! - [`rle_lossless`](rle_lossless) provides native RLE lossless
//!   decoding and encoding.
//!   Requires the `rle` feature,
//!   enabled by default.
//! - [`uncompressed`](uncompressed) handles
//!   encapsulated uncompressed frames
//!   and is always available.
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "rle")]
pub mod rle_lossless;

pub mod uncompressed;

use dcmio_encoding::adapters::PixelDataObject;

/// The image properties which all adapters need,
/// gathered from a pixel data object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct FrameShape {
    pub rows: u16,
    pub cols: u16,
    pub samples_per_pixel: u16,
    pub bits_allocated: u16,
}

impl FrameShape {
    /// Read the shape of a frame, naming the first missing attribute.
    pub fn of(src: &dyn PixelDataObject) -> Result<Self, &'static str> {
        Ok(FrameShape {
            rows: src.rows().ok_or("Rows")?,
            cols: src.cols().ok_or("Columns")?,
            samples_per_pixel: src.samples_per_pixel().ok_or("SamplesPerPixel")?,
            bits_allocated: src.bits_allocated().ok_or("BitsAllocated")?,
        })
    }

    /// The number of bytes per sample.
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_allocated as usize + 7) / 8
    }

    /// The number of pixels in a frame.
    pub fn pixels(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The size in bytes of a native frame.
    pub fn frame_len(&self) -> usize {
        self.pixels() * self.samples_per_pixel as usize * self.bytes_per_sample()
    }
}
