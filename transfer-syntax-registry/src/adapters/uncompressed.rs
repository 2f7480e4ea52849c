//! Support for encapsulated uncompressed via pixel data adapter.

use super::FrameShape;
use dcmio_encoding::adapters::{
    decode_error, encode_error, DecodeResult, EncodeOptions, EncodeResult, PixelDataObject,
    PixelDataReader, PixelDataWriter,
};
use dcmio_encoding::snafu::prelude::*;

/// Adapter for [Encapsulated Uncompressed Explicit VR Little Endian][1]
/// [1]: https://dicom.nema.org/medical/dicom/2023c/output/chtml/part05/sect_A.4.11.html
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UncompressedAdapter;

impl PixelDataReader for UncompressedAdapter {
    fn decode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        let shape = FrameShape::of(src)
            .map_err(|name| decode_error::MissingAttributeSnafu { name }.build())?;
        // fragments are padded to an even length
        let len = shape.frame_len();
        ensure!(
            frame_data.len() >= len,
            decode_error::TruncatedFrameSnafu {
                position: frame_data.len()
            }
        );
        dst.extend_from_slice(&frame_data[..len]);
        Ok(())
    }
}

impl PixelDataWriter for UncompressedAdapter {
    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: &[u8],
        _options: &EncodeOptions,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        let shape = FrameShape::of(src)
            .map_err(|name| encode_error::MissingAttributeSnafu { name }.build())?;
        let expected = shape.frame_len();
        ensure!(
            frame.len() == expected,
            encode_error::FrameLengthSnafu {
                actual: frame.len(),
                expected,
            }
        );
        dst.extend_from_slice(frame);
        if frame.len() % 2 != 0 {
            dst.push(0);
        }
        Ok(())
    }
}
