//! Classification of transfer syntaxes
//! by the way they store pixel data.

use dcmio_core::AttributeTree;
use dcmio_dictionary_std::{tags, uids};

/// The family of a transfer syntax with respect to pixel data.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum TransferSyntaxType {
    /// native (uncompressed) pixel data
    Native,
    /// JPEG baseline, process 1
    JpegBaseline,
    /// JPEG extended, processes 2 and 4
    JpegExtended,
    /// JPEG spectral selection, non-hierarchical
    JpegSpectral,
    /// JPEG full progression, non-hierarchical
    JpegProgressive,
    /// JPEG lossless, non-hierarchical
    JpegLossless,
    /// JPEG-LS lossless or near-lossless
    JpegLs,
    /// JPEG 2000 and High-Throughput JPEG 2000
    Jpeg2000,
    /// RLE lossless
    Rle,
    /// JPIP referenced pixel data
    Jpip,
    /// MPEG-2, MPEG-4 and HEVC video
    Mpeg,
    /// uncompressed frames in encapsulated form
    EncapsulatedUncompressed,
}

impl TransferSyntaxType {
    /// Classify the transfer syntax with the given UID.
    /// Unrecognized UIDs are considered native.
    pub fn for_uid(uid: &str) -> Self {
        use TransferSyntaxType::*;
        match uid.trim_end_matches('\0') {
            uids::JPEG_BASELINE8_BIT => JpegBaseline,
            uids::JPEG_EXTENDED12_BIT => JpegExtended,
            uids::JPEG_SPECTRAL_SELECTION_NON_HIERARCHICAL68 => JpegSpectral,
            uids::JPEG_FULL_PROGRESSION_NON_HIERARCHICAL1012 => JpegProgressive,
            uids::JPEG_LOSSLESS | uids::JPEG_LOSSLESS_SV1 => JpegLossless,
            uids::JPEGLS_LOSSLESS | uids::JPEGLS_NEAR_LOSSLESS => JpegLs,
            uids::JPEG2000_LOSSLESS
            | uids::JPEG2000
            | uids::JPEG2000MC_LOSSLESS
            | uids::JPEG2000MC
            | uids::HTJ2K_LOSSLESS
            | uids::HTJ2K_LOSSLESS_RPCL
            | uids::HTJ2K => Jpeg2000,
            uids::JPIP_REFERENCED | uids::JPIP_REFERENCED_DEFLATE => Jpip,
            uids::RLE_LOSSLESS => Rle,
            uids::ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN => EncapsulatedUncompressed,
            uid if is_video(uid) => Mpeg,
            _ => Native,
        }
    }

    /// Whether pixel data is stored in fragments.
    pub fn is_pixel_data_encapsulated(self) -> bool {
        !matches!(self, TransferSyntaxType::Native | TransferSyntaxType::Jpip)
    }

    /// Whether signed samples can be encoded as such.
    pub fn can_encode_signed(self) -> bool {
        use TransferSyntaxType::*;
        !matches!(
            self,
            JpegBaseline | JpegExtended | JpegSpectral | JpegProgressive | Mpeg
        )
    }

    /// The maximum number of bits stored per sample.
    pub fn max_bits_stored(self) -> u16 {
        use TransferSyntaxType::*;
        match self {
            JpegBaseline | Mpeg => 8,
            JpegExtended | JpegSpectral | JpegProgressive => 12,
            _ => 16,
        }
    }

    /// The planar configuration of color frames once encoded.
    pub fn planar_configuration(self) -> u16 {
        match self {
            TransferSyntaxType::Rle => 1,
            _ => 0,
        }
    }

    /// Raise _Bits Stored_ between 9 and 11 to 12
    /// for types which only encode 8 or 12 bits.
    ///
    /// Returns whether the tree was changed.
    pub fn adjust_bits_stored_to_12(self, tree: &mut AttributeTree) -> bool {
        if self.max_bits_stored() != 12 {
            return false;
        }
        let bits_stored = tree.u16(tags::BITS_STORED).unwrap_or(8);
        if bits_stored > 8 && bits_stored < 12 {
            tree.put_u16(tags::BITS_STORED, 12);
            tree.put_u16(tags::HIGH_BIT, 11);
            return true;
        }
        false
    }
}

fn is_video(uid: &str) -> bool {
    uid.strip_prefix("1.2.840.10008.1.2.4.10")
        .map_or(false, |rest| rest.len() == 1 && rest.as_bytes()[0].is_ascii_digit())
}

/// Whether encoding with the given transfer syntax loses information.
pub fn is_lossy_compression(uid: &str) -> bool {
    match uid.trim_end_matches('\0') {
        uids::JPEG_BASELINE8_BIT
        | uids::JPEG_EXTENDED12_BIT
        | uids::JPEG_SPECTRAL_SELECTION_NON_HIERARCHICAL68
        | uids::JPEG_FULL_PROGRESSION_NON_HIERARCHICAL1012
        | uids::JPEGLS_NEAR_LOSSLESS
        | uids::JPEG2000
        | uids::JPEG2000MC
        | uids::HTJ2K => true,
        uid => is_video(uid),
    }
}

/// Whether the given transfer syntax encodes color frames
/// after a conversion to a luminance/chrominance model.
pub fn is_ybr_compression(uid: &str) -> bool {
    matches!(
        uid.trim_end_matches('\0'),
        uids::JPEG_BASELINE8_BIT
            | uids::JPEG_EXTENDED12_BIT
            | uids::JPEG_SPECTRAL_SELECTION_NON_HIERARCHICAL68
            | uids::JPEG_FULL_PROGRESSION_NON_HIERARCHICAL1012
            | uids::JPEG2000_LOSSLESS
            | uids::JPEG2000
            | uids::HTJ2K_LOSSLESS
            | uids::HTJ2K_LOSSLESS_RPCL
            | uids::HTJ2K
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(uids::EXPLICIT_VR_LITTLE_ENDIAN, TransferSyntaxType::Native)]
    #[case(uids::JPEG_BASELINE8_BIT, TransferSyntaxType::JpegBaseline)]
    #[case(uids::JPEG_LOSSLESS_SV1, TransferSyntaxType::JpegLossless)]
    #[case(uids::HTJ2K, TransferSyntaxType::Jpeg2000)]
    #[case(uids::RLE_LOSSLESS, TransferSyntaxType::Rle)]
    #[case("1.2.840.10008.1.2.4.105", TransferSyntaxType::Mpeg)]
    #[case("1.2.840.10008.1.2.4.1000", TransferSyntaxType::Native)]
    fn classify(#[case] uid: &str, #[case] expected: TransferSyntaxType) {
        assert_eq!(TransferSyntaxType::for_uid(uid), expected);
    }

    #[test]
    fn flags() {
        let rle = TransferSyntaxType::Rle;
        assert!(rle.is_pixel_data_encapsulated());
        assert!(rle.can_encode_signed());
        assert_eq!(rle.planar_configuration(), 1);
        assert!(!TransferSyntaxType::Jpip.is_pixel_data_encapsulated());
        assert!(!TransferSyntaxType::JpegBaseline.can_encode_signed());
        assert!(is_lossy_compression(uids::JPEG2000));
        assert!(!is_lossy_compression(uids::JPEG2000_LOSSLESS));
        assert!(is_ybr_compression(uids::JPEG2000_LOSSLESS));
        assert!(!is_ybr_compression(uids::RLE_LOSSLESS));
    }

    #[test]
    fn bits_stored_raised_to_12() {
        let mut tree = AttributeTree::new();
        tree.put_u16(tags::BITS_STORED, 10);
        tree.put_u16(tags::HIGH_BIT, 9);
        assert!(!TransferSyntaxType::JpegLossless.adjust_bits_stored_to_12(&mut tree));
        assert!(TransferSyntaxType::JpegExtended.adjust_bits_stored_to_12(&mut tree));
        assert_eq!(tree.u16(tags::BITS_STORED), Some(12));
        assert_eq!(tree.u16(tags::HIGH_BIT), Some(11));
        assert!(!TransferSyntaxType::JpegExtended.adjust_bits_stored_to_12(&mut tree));
    }
}
