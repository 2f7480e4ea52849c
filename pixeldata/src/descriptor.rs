//! A snapshot of the attributes which describe the layout of pixel data.

use crate::attribute::{self, GetAttributeError, PixelRepresentation};
use crate::photometric::PhotometricInterpretation;
use crate::ts_type::is_ybr_compression;
use dcmio_core::{AttributeTree, Tag};
use dcmio_encoding::adapters::PixelDataObject;
use snafu::ResultExt;
use tracing::debug;

/// The number of overlay planes which may be embedded in pixel data.
const MAX_OVERLAY_GROUPS: u16 = 16;

/// The image pixel description of a data set.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub rows: u16,
    pub cols: u16,
    pub samples_per_pixel: u16,
    pub photometric_interpretation: PhotometricInterpretation,
    pub bits_allocated: u16,
    pub bits_stored: u16,
    /// the number of bits per sample handed over to a codec
    pub bits_compressed: u16,
    pub pixel_representation: PixelRepresentation,
    pub planar_configuration: u16,
    pub number_of_frames: u32,
    /// overlay groups whose bit planes live in the pixel data
    pub embedded_overlays: Vec<u16>,
}

impl ImageDescriptor {
    /// Collect the image pixel description from an attribute tree.
    ///
    /// `bits_compressed` overrides the bits stored per sample
    /// for encoding, bounded by _Bits Allocated_.
    pub fn from_tree(
        tree: &AttributeTree,
        bits_compressed: Option<u16>,
    ) -> Result<Self, GetAttributeError> {
        let rows = attribute::rows(tree)?;
        let cols = attribute::cols(tree)?;
        let samples_per_pixel = attribute::samples_per_pixel(tree)?;
        let photometric = attribute::photometric_interpretation(tree)?;
        let photometric_interpretation = photometric.parse().map_err(|_| {
            attribute::InvalidValueSnafu {
                name: "PhotometricInterpretation",
                value: photometric.clone(),
            }
            .build()
        })?;
        let bits_allocated = attribute::bits_allocated(tree)?;
        let bits_stored = attribute::bits_stored(tree, bits_allocated)?;
        let bits_compressed = match bits_compressed {
            Some(bits) if bits > 0 => bits.min(bits_allocated),
            _ => bits_stored,
        };

        Ok(ImageDescriptor {
            rows,
            cols,
            samples_per_pixel,
            photometric_interpretation,
            bits_allocated,
            bits_stored,
            bits_compressed,
            pixel_representation: attribute::pixel_representation(tree)?,
            planar_configuration: attribute::planar_configuration(tree),
            number_of_frames: attribute::number_of_frames(tree)?,
            embedded_overlays: embedded_overlays(tree, bits_stored),
        })
    }

    /// The description of frames as they come out of decoding
    /// pixel data in the given transfer syntax.
    pub fn decoded(&self, ts_uid: &str) -> Self {
        let mut decoded = self.clone();
        if self.photometric_interpretation.is_ybr() && is_ybr_compression(ts_uid) {
            decoded.photometric_interpretation = PhotometricInterpretation::Rgb;
        }
        decoded.planar_configuration = 0;
        decoded
    }

    /// The length of a single native frame in bytes.
    pub fn frame_length(&self) -> usize {
        self.photometric_interpretation.frame_length(
            self.cols,
            self.rows,
            self.samples_per_pixel,
            self.bits_allocated,
        )
    }

    /// The length of all native frames in bytes.
    pub fn length(&self) -> usize {
        self.frame_length() * self.number_of_frames as usize
    }

    pub fn is_signed(&self) -> bool {
        self.pixel_representation == PixelRepresentation::Signed
    }

    /// Whether color samples are stored plane by plane.
    pub fn is_banded(&self) -> bool {
        self.samples_per_pixel > 1 && self.planar_configuration != 0
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_allocated + 7) / 8
    }
}

impl PixelDataObject for ImageDescriptor {
    fn rows(&self) -> Option<u16> {
        Some(self.rows)
    }

    fn cols(&self) -> Option<u16> {
        Some(self.cols)
    }

    fn samples_per_pixel(&self) -> Option<u16> {
        Some(self.samples_per_pixel)
    }

    fn bits_allocated(&self) -> Option<u16> {
        Some(self.bits_allocated)
    }

    fn bits_stored(&self) -> Option<u16> {
        Some(self.bits_compressed)
    }

    fn pixel_representation(&self) -> Option<u16> {
        Some(match self.pixel_representation {
            PixelRepresentation::Unsigned => 0,
            PixelRepresentation::Signed => 1,
        })
    }

    fn photometric_interpretation(&self) -> Option<&str> {
        Some(self.photometric_interpretation.as_str())
    }

    fn planar_configuration(&self) -> Option<u16> {
        Some(self.planar_configuration)
    }

    fn number_of_frames(&self) -> Option<u32> {
        Some(self.number_of_frames)
    }
}

/// Overlay groups using high bits of the pixel data samples.
fn embedded_overlays(tree: &AttributeTree, bits_stored: u16) -> Vec<u16> {
    (0..MAX_OVERLAY_GROUPS)
        .map(|i| 0x6000 + 2 * i)
        .filter(|&group| {
            let bits_allocated = match tree.int(Tag(group, 0x0100)) {
                Some(bits) if bits != 1 => bits,
                _ => return false,
            };
            let bit_position = tree.int_or(Tag(group, 0x0102), 0);
            if bit_position < i64::from(bits_stored) {
                debug!(
                    "Ignoring overlay {:04X} with bit position {} within {} bits stored (bits allocated {})",
                    group, bit_position, bits_stored, bits_allocated
                );
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::VR;
    use dcmio_dictionary_std::{tags, uids};

    fn color_tree() -> AttributeTree {
        let mut tree = AttributeTree::new();
        tree.put_u16(tags::ROWS, 2);
        tree.put_u16(tags::COLUMNS, 4);
        tree.put_u16(tags::SAMPLES_PER_PIXEL, 3);
        tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "YBR_FULL_422");
        tree.put_u16(tags::BITS_ALLOCATED, 8);
        tree.put_u16(tags::BITS_STORED, 8);
        tree.put_u16(tags::PLANAR_CONFIGURATION, 0);
        tree.put_str(tags::NUMBER_OF_FRAMES, VR::IS, "2");
        tree
    }

    #[test]
    fn lengths_and_decoding() {
        let descriptor = ImageDescriptor::from_tree(&color_tree(), None).unwrap();
        assert_eq!(descriptor.frame_length(), 16);
        assert_eq!(descriptor.length(), 32);
        assert_eq!(descriptor.bits_compressed, 8);

        let decoded = descriptor.decoded(uids::JPEG_BASELINE8_BIT);
        assert_eq!(decoded.photometric_interpretation, PhotometricInterpretation::Rgb);
        assert_eq!(decoded.frame_length(), 24);

        let kept = descriptor.decoded(uids::RLE_LOSSLESS);
        assert_eq!(kept.photometric_interpretation, PhotometricInterpretation::YbrFull422);
    }

    #[test]
    fn bits_compressed_is_bounded() {
        let descriptor = ImageDescriptor::from_tree(&color_tree(), Some(12)).unwrap();
        assert_eq!(descriptor.bits_compressed, 8);
        assert_eq!(PixelDataObject::bits_stored(&descriptor), Some(8));
    }

    #[test]
    fn only_high_bit_overlays_are_embedded() {
        let mut tree = color_tree();
        tree.put_u16(tags::BITS_STORED, 6);
        tree.put_u16(Tag(0x6000, 0x0100), 8);
        tree.put_u16(Tag(0x6000, 0x0102), 7);
        tree.put_u16(Tag(0x6002, 0x0100), 8);
        tree.put_u16(Tag(0x6002, 0x0102), 3);
        tree.put_u16(Tag(0x6004, 0x0100), 1);
        let descriptor = ImageDescriptor::from_tree(&tree, None).unwrap();
        assert_eq!(descriptor.embedded_overlays, vec![0x6000]);
    }

    #[test]
    fn unknown_photometric_interpretation() {
        let mut tree = color_tree();
        tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "HSV");
        assert!(matches!(
            ImageDescriptor::from_tree(&tree, None),
            Err(GetAttributeError::InvalidValue { name: "PhotometricInterpretation", .. })
        ));
    }
}
