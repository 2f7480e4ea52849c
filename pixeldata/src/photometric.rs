//! The _Photometric Interpretation_ of pixel data.

use dcmio_dictionary_std::uids;
use snafu::Snafu;
use std::fmt;
use std::str::FromStr;

/// A known photometric interpretation.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum PhotometricInterpretation {
    /// MONOCHROME1
    Monochrome1,
    /// MONOCHROME2
    Monochrome2,
    /// PALETTE COLOR
    PaletteColor,
    /// RGB
    Rgb,
    /// YBR_FULL
    YbrFull,
    /// YBR_FULL_422
    YbrFull422,
    /// YBR_PARTIAL_422
    YbrPartial422,
    /// YBR_PARTIAL_420
    YbrPartial420,
    /// YBR_ICT
    YbrIct,
    /// YBR_RCT
    YbrRct,
}

/// Unrecognized photometric interpretation
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(display("Unrecognized photometric interpretation `{}`", value))]
pub struct ParsePhotometricError {
    value: String,
}

impl FromStr for PhotometricInterpretation {
    type Err = ParsePhotometricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use PhotometricInterpretation::*;
        match s.trim_end_matches([' ', '\0']) {
            "MONOCHROME1" => Ok(Monochrome1),
            "MONOCHROME2" => Ok(Monochrome2),
            "PALETTE COLOR" => Ok(PaletteColor),
            "RGB" => Ok(Rgb),
            "YBR_FULL" => Ok(YbrFull),
            "YBR_FULL_422" => Ok(YbrFull422),
            "YBR_PARTIAL_422" => Ok(YbrPartial422),
            "YBR_PARTIAL_420" => Ok(YbrPartial420),
            "YBR_ICT" => Ok(YbrIct),
            "YBR_RCT" => Ok(YbrRct),
            other => Err(ParsePhotometricError {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PhotometricInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PhotometricInterpretation {
    /// The code string of this interpretation.
    pub fn as_str(self) -> &'static str {
        use PhotometricInterpretation::*;
        match self {
            Monochrome1 => "MONOCHROME1",
            Monochrome2 => "MONOCHROME2",
            PaletteColor => "PALETTE COLOR",
            Rgb => "RGB",
            YbrFull => "YBR_FULL",
            YbrFull422 => "YBR_FULL_422",
            YbrPartial422 => "YBR_PARTIAL_422",
            YbrPartial420 => "YBR_PARTIAL_420",
            YbrIct => "YBR_ICT",
            YbrRct => "YBR_RCT",
        }
    }

    pub fn is_monochrome(self) -> bool {
        matches!(
            self,
            PhotometricInterpretation::Monochrome1 | PhotometricInterpretation::Monochrome2
        )
    }

    /// Whether samples are in a luminance and chrominance color space.
    pub fn is_ybr(self) -> bool {
        use PhotometricInterpretation::*;
        matches!(
            self,
            YbrFull | YbrFull422 | YbrPartial422 | YbrPartial420 | YbrIct | YbrRct
        )
    }

    /// Whether chrominance is stored at a lower resolution than luminance.
    pub fn is_subsampled(self) -> bool {
        use PhotometricInterpretation::*;
        matches!(self, YbrFull422 | YbrPartial422 | YbrPartial420)
    }

    /// The length in bytes of a native frame with this interpretation.
    pub fn frame_length(self, cols: u16, rows: u16, samples: u16, bits_allocated: u16) -> usize {
        let pixels = usize::from(cols) * usize::from(rows);
        let bits = usize::from(bits_allocated);
        match self {
            // two luminance samples share one pair of chrominance samples
            PhotometricInterpretation::YbrFull422 | PhotometricInterpretation::YbrPartial422 => {
                (pixels * 2 * bits + 7) / 8
            }
            PhotometricInterpretation::YbrPartial420 => (pixels * 3 / 2 * bits + 7) / 8,
            _ => (pixels * usize::from(samples) * bits + 7) / 8,
        }
    }

    /// The interpretation of color frames
    /// once compressed with the given transfer syntax.
    pub fn compress(self, ts_uid: &str) -> Self {
        use PhotometricInterpretation::*;
        let ts_uid = ts_uid.trim_end_matches('\0');
        match self {
            Rgb => match ts_uid {
                uids::JPEG_BASELINE8_BIT | uids::JPEG_EXTENDED12_BIT => YbrFull422,
                uids::JPEG_SPECTRAL_SELECTION_NON_HIERARCHICAL68
                | uids::JPEG_FULL_PROGRESSION_NON_HIERARCHICAL1012 => YbrFull,
                uids::JPEG2000_LOSSLESS | uids::HTJ2K_LOSSLESS | uids::HTJ2K_LOSSLESS_RPCL => {
                    YbrRct
                }
                uids::JPEG2000 | uids::HTJ2K => YbrIct,
                _ => Rgb,
            },
            YbrFull => match ts_uid {
                uids::JPEG_BASELINE8_BIT | uids::JPEG_EXTENDED12_BIT => YbrFull422,
                _ => YbrFull,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PhotometricInterpretation::{self, *};
    use dcmio_dictionary_std::uids;
    use rstest::rstest;

    #[rstest]
    #[case("MONOCHROME2", Monochrome2)]
    #[case("PALETTE COLOR ", PaletteColor)]
    #[case("YBR_FULL_422", YbrFull422)]
    fn parse_and_display(#[case] text: &str, #[case] expected: PhotometricInterpretation) {
        let pi: PhotometricInterpretation = text.parse().unwrap();
        assert_eq!(pi, expected);
        assert_eq!(pi.to_string(), text.trim());
    }

    #[test]
    fn unknown_is_an_error() {
        assert!("HSV".parse::<PhotometricInterpretation>().is_err());
    }

    #[test]
    fn compressed_color_models() {
        assert_eq!(Rgb.compress(uids::JPEG_BASELINE8_BIT), YbrFull422);
        assert_eq!(Rgb.compress(uids::JPEG2000), YbrIct);
        assert_eq!(Rgb.compress(uids::JPEG2000_LOSSLESS), YbrRct);
        assert_eq!(Rgb.compress(uids::RLE_LOSSLESS), Rgb);
        assert_eq!(YbrFull.compress(uids::JPEG_BASELINE8_BIT), YbrFull422);
        assert_eq!(Monochrome2.compress(uids::JPEG_BASELINE8_BIT), Monochrome2);
    }

    #[test]
    fn subsampled_frame_length() {
        assert_eq!(Rgb.frame_length(4, 2, 3, 8), 24);
        assert_eq!(YbrFull422.frame_length(4, 2, 3, 8), 16);
        assert_eq!(Monochrome2.frame_length(3, 3, 1, 1), 2);
        assert!(YbrPartial420.is_subsampled() && !YbrFull.is_subsampled());
    }
}
