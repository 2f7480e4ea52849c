//! Support for JPEG image decoding and baseline encoding.

use super::FrameShape;
use dcmio_encoding::adapters::{
    decode_error, encode_error, DecodeResult, EncodeOptions, EncodeResult, PixelDataObject,
    PixelDataReader, PixelDataWriter,
};
use dcmio_encoding::snafu::prelude::*;
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::ColorType;
use std::borrow::Cow;
use std::io::Cursor;

/// Pixel data adapter for JPEG-based transfer syntaxes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JpegAdapter;

impl PixelDataReader for JpegAdapter {
    /// Decode a single JPEG frame.
    ///
    /// Color images come out as interleaved samples.
    /// 16-bit samples are written in little endian.
    fn decode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        let shape = FrameShape::of(src)
            .map_err(|name| decode_error::MissingAttributeSnafu { name }.build())?;
        if shape.bits_allocated != 8 && shape.bits_allocated != 16 {
            whatever!("BitsAllocated other than 8 or 16 is not supported");
        }

        let mut decoder = Decoder::new(Cursor::new(frame_data));
        let mut decoded = decoder
            .decode()
            .map_err(|e| Box::new(e) as Box<_>)
            .whatever_context("JPEG decoder failure")?;
        let info = decoder
            .info()
            .whatever_context("JPEG decoder did not report image info")?;

        let is_16bit = matches!(info.pixel_format, PixelFormat::L16);
        if is_16bit {
            // the decoder outputs 16-bit samples in big endian
            for pair in decoded.chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
        }

        // widen 8-bit output when 16 bits are allocated
        let expected = shape.frame_len();
        if shape.bits_allocated == 16 && !is_16bit {
            dst.reserve(decoded.len() * 2);
            for b in decoded {
                dst.push(b);
                dst.push(0);
            }
        } else {
            ensure_whatever!(
                decoded.len() >= expected,
                "JPEG frame decoded into {} bytes, expected {}",
                decoded.len(),
                expected
            );
            dst.extend_from_slice(&decoded[..expected]);
        }
        Ok(())
    }

    /// Drop the padding byte after the EOI marker, if present.
    fn patch_input<'a>(&self, frame_data: &'a [u8]) -> Cow<'a, [u8]> {
        match frame_data {
            [.., 0xFF, 0xD9, 0x00] => Cow::Borrowed(&frame_data[..frame_data.len() - 1]),
            _ => Cow::Borrowed(frame_data),
        }
    }
}

impl PixelDataWriter for JpegAdapter {
    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: &[u8],
        options: &EncodeOptions,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        let shape = FrameShape::of(src)
            .map_err(|name| encode_error::MissingAttributeSnafu { name }.build())?;
        let bits_stored = src
            .bits_stored()
            .context(encode_error::MissingAttributeSnafu { name: "BitsStored" })?;

        ensure_whatever!(
            shape.bits_allocated == 8 || shape.bits_allocated == 16,
            "BitsAllocated other than 8 or 16 is not supported"
        );
        let expected = shape.frame_len();
        ensure!(
            frame.len() == expected,
            encode_error::FrameLengthSnafu {
                actual: frame.len(),
                expected,
            }
        );

        let color_type = match shape.samples_per_pixel {
            1 => ColorType::Luma,
            3 => match src.photometric_interpretation() {
                Some(pi) if pi.starts_with("YBR") => ColorType::Ycbcr,
                _ => ColorType::Rgb,
            },
            spp => whatever!("Unsupported samples per pixel: {}", spp),
        };

        let quality = options.quality.unwrap_or(85);
        let frame = narrow_8bit(frame, shape.bits_allocated, bits_stored)?;

        let mut encoder = jpeg_encoder::Encoder::new(&mut *dst, quality);
        encoder.set_progressive(false);
        encoder
            .encode(&frame, shape.cols, shape.rows, color_type)
            .whatever_context("JPEG encoding failed")?;
        Ok(())
    }

    /// Pad the encoded frame to an even length.
    fn patch_output(&self, dst: &mut Vec<u8>) {
        if dst.len() % 2 != 0 {
            dst.push(0);
        }
    }
}

/// reduce data precision to 8 bits if necessary
/// data loss is possible
fn narrow_8bit(frame_data: &[u8], bits_allocated: u16, bits_stored: u16) -> EncodeResult<Cow<[u8]>> {
    match (bits_allocated, bits_stored) {
        (8, _) => Ok(Cow::Borrowed(frame_data)),
        (16, 8..=16) => {
            let mut v = Vec::with_capacity(frame_data.len() / 2);
            for chunk in frame_data.chunks(2) {
                let b = u16::from(chunk[0]) | u16::from(chunk[1]) << 8;
                v.push((b >> (bits_stored - 8)) as u8);
            }
            Ok(Cow::Owned(v))
        }
        (_, b) => whatever!("Unsupported Bits Stored {}", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gray {
        bits_allocated: u16,
        bits_stored: u16,
    }

    impl PixelDataObject for Gray {
        fn rows(&self) -> Option<u16> {
            Some(8)
        }
        fn cols(&self) -> Option<u16> {
            Some(8)
        }
        fn samples_per_pixel(&self) -> Option<u16> {
            Some(1)
        }
        fn bits_allocated(&self) -> Option<u16> {
            Some(self.bits_allocated)
        }
        fn bits_stored(&self) -> Option<u16> {
            Some(self.bits_stored)
        }
        fn pixel_representation(&self) -> Option<u16> {
            Some(0)
        }
        fn photometric_interpretation(&self) -> Option<&str> {
            Some("MONOCHROME2")
        }
        fn planar_configuration(&self) -> Option<u16> {
            None
        }
        fn number_of_frames(&self) -> Option<u32> {
            None
        }
    }

    #[test]
    fn narrow_12bit_samples() {
        let frame = [0xFF, 0x0F, 0x10, 0x00];
        let narrowed = narrow_8bit(&frame, 16, 12).unwrap();
        assert_eq!(&*narrowed, &[0xFF, 0x01]);
        assert!(narrow_8bit(&frame, 16, 4).is_err());
    }

    #[test]
    fn baseline_round_trip_is_close() {
        let image = Gray {
            bits_allocated: 8,
            bits_stored: 8,
        };
        let frame: Vec<u8> = (0..64).map(|i| 100 + (i % 8) as u8).collect();
        let mut encoded = Vec::new();
        let options = EncodeOptions::new().quality(100);
        JpegAdapter
            .encode_frame(&image, &frame, &options, &mut encoded)
            .unwrap();
        JpegAdapter.patch_output(&mut encoded);
        assert_eq!(&encoded[..2], &[0xFF, 0xD8]);
        assert_eq!(encoded.len() % 2, 0);

        let mut decoded = Vec::new();
        let input = JpegAdapter.patch_input(&encoded);
        JpegAdapter
            .decode_frame(&image, &input, &mut decoded)
            .unwrap();
        assert_eq!(decoded.len(), frame.len());
        for (a, b) in frame.iter().zip(&decoded) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 4);
        }
    }
}
