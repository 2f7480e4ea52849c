//! Utility module for testing pixel data adapters.
#![allow(dead_code)]
use dcmio_encoding::adapters::PixelDataObject;

/// A test data object.
///
/// Can be used to test pixel data adapters
/// without reading a whole data set.
#[derive(Debug, Clone)]
pub(crate) struct TestDataObject {
    pub rows: u16,
    pub columns: u16,
    pub bits_allocated: u16,
    pub bits_stored: u16,
    pub samples_per_pixel: u16,
    pub pixel_representation: u16,
    pub photometric_interpretation: &'static str,
    pub number_of_frames: u32,
}

impl TestDataObject {
    /// A single frame grayscale image.
    pub fn monochrome(rows: u16, columns: u16, bits_allocated: u16) -> Self {
        TestDataObject {
            rows,
            columns,
            bits_allocated,
            bits_stored: bits_allocated,
            samples_per_pixel: 1,
            pixel_representation: 0,
            photometric_interpretation: "MONOCHROME2",
            number_of_frames: 1,
        }
    }

    /// A single frame RGB image.
    pub fn rgb(rows: u16, columns: u16) -> Self {
        TestDataObject {
            samples_per_pixel: 3,
            photometric_interpretation: "RGB",
            ..Self::monochrome(rows, columns, 8)
        }
    }

    /// The size of a native frame in bytes.
    pub fn frame_len(&self) -> usize {
        self.rows as usize
            * self.columns as usize
            * self.samples_per_pixel as usize
            * (self.bits_allocated as usize / 8)
    }
}

impl PixelDataObject for TestDataObject {
    fn rows(&self) -> Option<u16> {
        Some(self.rows)
    }

    fn cols(&self) -> Option<u16> {
        Some(self.columns)
    }

    fn samples_per_pixel(&self) -> Option<u16> {
        Some(self.samples_per_pixel)
    }

    fn bits_allocated(&self) -> Option<u16> {
        Some(self.bits_allocated)
    }

    fn bits_stored(&self) -> Option<u16> {
        Some(self.bits_stored)
    }

    fn pixel_representation(&self) -> Option<u16> {
        Some(self.pixel_representation)
    }

    fn photometric_interpretation(&self) -> Option<&str> {
        Some(self.photometric_interpretation)
    }

    fn planar_configuration(&self) -> Option<u16> {
        Some(0)
    }

    fn number_of_frames(&self) -> Option<u32> {
        Some(self.number_of_frames)
    }
}
