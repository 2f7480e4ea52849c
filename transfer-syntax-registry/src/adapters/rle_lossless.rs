//! Support for RLE Lossless image decoding and encoding.
//!
//! An RLE frame starts with a 64-byte header:
//! the number of segments followed by up to 15 segment offsets,
//! all as 32-bit little endian integers.
//! Each segment holds one byte of one sample for every pixel
//! (most significant byte first),
//! compressed row by row with the PackBits scheme.
//!
//! See <https://dicom.nema.org/medical/dicom/current/output/chtml/part05/chapter_G.html>
use byteordered::byteorder::{ByteOrder, LittleEndian};

use super::FrameShape;
use dcmio_encoding::adapters::{
    decode_error, encode_error, DecodeResult, EncodeOptions, EncodeResult, PixelDataObject,
    PixelDataReader, PixelDataWriter,
};
use dcmio_encoding::snafu::prelude::*;

/// Size of the RLE header in bytes.
const HEADER_LEN: usize = 64;
/// Maximum number of segments an RLE header can describe.
const MAX_SEGMENTS: usize = 15;
/// Maximum number of bytes in a single run or literal.
const MAX_RUN: usize = 128;

/// Pixel data adapter for the RLE Lossless transfer syntax.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RleLosslessAdapter;

/// Pixel data decoder for RLE Lossless (UID `1.2.840.10008.1.2.5`)
impl PixelDataReader for RleLosslessAdapter {
    fn decode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        let shape = FrameShape::of(src)
            .map_err(|name| decode_error::MissingAttributeSnafu { name }.build())?;
        let bytes_per_sample = shape.bytes_per_sample();
        let samples_per_pixel = shape.samples_per_pixel as usize;
        let pixels = shape.pixels();

        let offsets = read_rle_header(frame_data)?;
        ensure_whatever!(
            offsets.len() == samples_per_pixel * bytes_per_sample,
            "RLE frame has {} segments, expected {}",
            offsets.len(),
            samples_per_pixel * bytes_per_sample
        );

        // RLE encoded data is ordered like this (for 16-bit, 3 sample):
        //  Segment: 0     | 1     | 2     | 3     | 4     | 5
        //           R MSB | R LSB | G MSB | G LSB | B MSB | B LSB
        // and decodes into interleaved little endian samples:
        //    LSB R MSB R LSB G MSB G LSB B MSB B | ...
        let base_offset = dst.len();
        dst.resize(base_offset + shape.frame_len(), 0);
        let pixel_stride = samples_per_pixel * bytes_per_sample;

        for (segment_index, &start) in offsets.iter().enumerate() {
            let end = offsets
                .get(segment_index + 1)
                .copied()
                .unwrap_or(frame_data.len());
            ensure!(
                start <= end && end <= frame_data.len(),
                decode_error::TruncatedFrameSnafu { position: start }
            );
            let segment = unpack_bits(&frame_data[start..end], pixels)
                .map_err(|at| decode_error::TruncatedFrameSnafu { position: start + at }.build())?;

            let sample = segment_index / bytes_per_sample;
            let byte = segment_index % bytes_per_sample;
            let first = base_offset + sample * bytes_per_sample + (bytes_per_sample - 1 - byte);
            for (value, dst_index) in segment
                .into_iter()
                .zip((first..dst.len()).step_by(pixel_stride))
            {
                dst[dst_index] = value;
            }
        }
        Ok(())
    }
}

/// Pixel data encoder for RLE Lossless (UID `1.2.840.10008.1.2.5`)
impl PixelDataWriter for RleLosslessAdapter {
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

        let bytes_per_sample = shape.bytes_per_sample();
        let samples_per_pixel = shape.samples_per_pixel as usize;
        let nr_segments = samples_per_pixel * bytes_per_sample;
        if nr_segments > MAX_SEGMENTS {
            return encode_error::UnsupportedAttributeSnafu {
                name: "BitsAllocated",
                value: shape.bits_allocated.to_string(),
            }
            .fail();
        }

        let cols = shape.cols as usize;
        let pixel_stride = nr_segments;
        let header_start = dst.len();
        dst.resize(header_start + HEADER_LEN, 0);
        LittleEndian::write_u32(&mut dst[header_start..], nr_segments as u32);

        let mut row = Vec::with_capacity(cols);
        for segment_index in 0..nr_segments {
            let offset = (dst.len() - header_start) as u32;
            let at = header_start + 4 + 4 * segment_index;
            LittleEndian::write_u32(&mut dst[at..at + 4], offset);

            let sample = segment_index / bytes_per_sample;
            let byte = segment_index % bytes_per_sample;
            let first = sample * bytes_per_sample + (bytes_per_sample - 1 - byte);
            let segment_start = dst.len();
            for row_start in (0..shape.pixels()).step_by(cols.max(1)) {
                row.clear();
                row.extend(
                    (row_start..row_start + cols).map(|pixel| frame[pixel * pixel_stride + first]),
                );
                pack_bits(&row, dst);
            }
            if (dst.len() - segment_start) % 2 != 0 {
                dst.push(0);
            }
        }
        Ok(())
    }
}

/// Read the RLE header and return the segment offsets.
fn read_rle_header(frame_data: &[u8]) -> DecodeResult<Vec<usize>> {
    ensure!(
        frame_data.len() >= HEADER_LEN,
        decode_error::TruncatedFrameSnafu {
            position: frame_data.len()
        }
    );
    let nr_segments = LittleEndian::read_u32(&frame_data[0..4]) as usize;
    ensure_whatever!(
        (1..=MAX_SEGMENTS).contains(&nr_segments),
        "Invalid number of RLE segments: {}",
        nr_segments
    );
    let mut offsets = vec![0u32; nr_segments];
    LittleEndian::read_u32_into(&frame_data[4..4 * (nr_segments + 1)], &mut offsets);
    Ok(offsets.into_iter().map(|o| o as usize).collect())
}

/// Decompress a PackBits segment until `len` bytes are produced.
///
/// On failure, returns the position in the segment
/// where more data was expected.
fn unpack_bits(segment: &[u8], len: usize) -> Result<Vec<u8>, usize> {
    let mut out = Vec::with_capacity(len);
    let mut pos = 0;
    while out.len() < len {
        let header = *segment.get(pos).ok_or(pos)? as i8;
        pos += 1;
        match header {
            // -128 is a no-op
            -128 => {}
            h if h < 0 => {
                let value = *segment.get(pos).ok_or(pos)?;
                pos += 1;
                let count = (1 - h as isize) as usize;
                out.resize(out.len() + count, value);
            }
            h => {
                let count = h as usize + 1;
                let literal = segment.get(pos..pos + count).ok_or(segment.len())?;
                out.extend_from_slice(literal);
                pos += count;
            }
        }
    }
    out.truncate(len);
    Ok(out)
}

/// Compress one row with PackBits, appending to `out`.
///
/// Runs of two or more equal bytes become replicate runs,
/// everything else goes into literals of at most 128 bytes.
fn pack_bits(row: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < row.len() {
        let mut run = 1;
        while i + run < row.len() && run < MAX_RUN && row[i + run] == row[i] {
            run += 1;
        }
        if run >= 2 {
            out.push((1 - run as isize) as i8 as u8);
            out.push(row[i]);
            i += run;
            continue;
        }

        let mut j = i + 1;
        while j < row.len() && j - i < MAX_RUN && !(j + 1 < row.len() && row[j] == row[j + 1]) {
            j += 1;
        }
        out.push((j - i - 1) as u8);
        out.extend_from_slice(&row[i..j]);
        i = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Image {
        rows: u16,
        cols: u16,
        samples_per_pixel: u16,
        bits_allocated: u16,
    }

    impl PixelDataObject for Image {
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
            Some(self.bits_allocated)
        }
        fn pixel_representation(&self) -> Option<u16> {
            Some(0)
        }
        fn photometric_interpretation(&self) -> Option<&str> {
            Some(if self.samples_per_pixel == 3 {
                "RGB"
            } else {
                "MONOCHROME2"
            })
        }
        fn planar_configuration(&self) -> Option<u16> {
            Some(0)
        }
        fn number_of_frames(&self) -> Option<u32> {
            Some(1)
        }
    }

    #[test]
    fn test_packbits() {
        let encoded = vec![
            0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7,
            0xAA,
        ];
        let decoded = unpack_bits(&encoded, 24).unwrap();
        let expected = vec![
            0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
        ];
        assert_eq!(decoded, expected);

        // asking for more than the segment holds
        assert_eq!(unpack_bits(&encoded, 25), Err(15));
    }

    #[test]
    fn pack_bits_runs_and_literals() {
        let mut out = Vec::new();
        pack_bits(&[7, 7, 7, 1, 2, 3, 9, 9], &mut out);
        assert_eq!(out, vec![0xFE, 7, 0x02, 1, 2, 3, 0xFF, 9]);

        let long_run = vec![5u8; 300];
        let mut out = Vec::new();
        pack_bits(&long_run, &mut out);
        // 128 + 128 + 44
        assert_eq!(out, vec![0x81, 5, 0x81, 5, 0xD5, 5]);
        assert_eq!(unpack_bits(&out, 300).unwrap(), long_run);

        let literal: Vec<u8> = (0..=255).collect();
        let mut out = Vec::new();
        pack_bits(&literal, &mut out);
        assert_eq!(out.len(), 258);
        assert_eq!(out[0], 127);
        assert_eq!(out[129], 127);
        assert_eq!(unpack_bits(&out, 256).unwrap(), literal);
    }

    #[test]
    fn rgb_8bit_frame() {
        let image = Image {
            rows: 2,
            cols: 3,
            samples_per_pixel: 3,
            bits_allocated: 8,
        };
        let frame: Vec<u8> = (0..18).map(|x| (x * 7 % 5) as u8).collect();
        let mut encoded = Vec::new();
        RleLosslessAdapter
            .encode_frame(&image, &frame, &EncodeOptions::default(), &mut encoded)
            .unwrap();

        assert_eq!(LittleEndian::read_u32(&encoded[0..4]), 3);
        assert_eq!(LittleEndian::read_u32(&encoded[4..8]), 64);
        assert_eq!(encoded.len() % 2, 0);

        let mut decoded = vec![0xEE];
        RleLosslessAdapter
            .decode_frame(&image, &encoded, &mut decoded)
            .unwrap();
        assert_eq!(decoded[0], 0xEE);
        assert_eq!(&decoded[1..], &frame[..]);
    }

    #[test]
    fn mono_16bit_segments_are_msb_first() {
        let image = Image {
            rows: 2,
            cols: 2,
            samples_per_pixel: 1,
            bits_allocated: 16,
        };
        #[rustfmt::skip]
        let frame: [u8; 8] = [
            0x01, 0xA0, 0x02, 0xA0,
            0x03, 0xA0, 0x04, 0xB0,
        ];
        let mut encoded = Vec::new();
        RleLosslessAdapter
            .encode_frame(&image, &frame, &EncodeOptions::default(), &mut encoded)
            .unwrap();
        assert_eq!(LittleEndian::read_u32(&encoded[0..4]), 2);
        // first segment: high bytes, two rows of two
        assert_eq!(&encoded[64..68], &[0xFF, 0xA0, 0x01, 0xA0]);

        let mut decoded = Vec::new();
        RleLosslessAdapter
            .decode_frame(&image, &encoded, &mut decoded)
            .unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn rejects_bad_frames() {
        let image = Image {
            rows: 2,
            cols: 2,
            samples_per_pixel: 1,
            bits_allocated: 8,
        };
        let mut dst = Vec::new();
        assert!(RleLosslessAdapter
            .decode_frame(&image, &[1, 0, 0, 0], &mut dst)
            .is_err());

        let mut header = vec![0; 64];
        header[0] = 1;
        header[4] = 64;
        // no segment bytes at all
        assert!(RleLosslessAdapter
            .decode_frame(&image, &header, &mut dst)
            .is_err());

        let mut out = Vec::new();
        let err = RleLosslessAdapter
            .encode_frame(&image, &[0; 3], &EncodeOptions::default(), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            dcmio_encoding::adapters::EncodeError::FrameLength {
                actual: 3,
                expected: 4
            }
        ));
    }
}
