//! Sample level operations on native frames.
//!
//! Unless stated otherwise,
//! frames are in little endian with the samples of a pixel interleaved.

use crate::descriptor::ImageDescriptor;
use crate::photometric::PhotometricInterpretation;
use byteorder::{ByteOrder, LittleEndian};

/// Clear the bits above _Bits Stored_ of each sample,
/// or replicate the sign bit into them for signed samples.
pub fn nullify_unused_bits(frame: &mut [u8], bits_allocated: u16, bits_stored: u16, signed: bool) {
    if bits_stored == 0 || bits_stored >= bits_allocated {
        return;
    }
    match bits_allocated {
        8 => {
            for sample in frame.iter_mut() {
                *sample = fit_to_bits(u32::from(*sample), bits_stored, signed) as u8;
            }
        }
        16 => {
            for sample in frame.chunks_exact_mut(2) {
                let value = LittleEndian::read_u16(sample);
                let value = fit_to_bits(u32::from(value), bits_stored, signed) as u16;
                LittleEndian::write_u16(sample, value);
            }
        }
        32 => {
            for sample in frame.chunks_exact_mut(4) {
                let value = LittleEndian::read_u32(sample);
                LittleEndian::write_u32(sample, fit_to_bits(value, bits_stored, signed));
            }
        }
        _ => {}
    }
}

fn fit_to_bits(value: u32, bits: u16, signed: bool) -> u32 {
    let shift = 32 - u32::from(bits);
    if signed {
        (((value << shift) as i32) >> shift) as u32
    } else {
        (value << shift) >> shift
    }
}

/// Reorder a frame stored plane by plane so that
/// the samples of each pixel are contiguous.
pub fn to_interleaved(frame: &[u8], samples: usize, bytes_per_sample: usize) -> Vec<u8> {
    if samples < 2 {
        return frame.to_vec();
    }
    let plane = frame.len() / samples;
    let pixels = plane / bytes_per_sample;
    let mut out = Vec::with_capacity(frame.len());
    for p in 0..pixels {
        for s in 0..samples {
            let at = s * plane + p * bytes_per_sample;
            out.extend_from_slice(&frame[at..at + bytes_per_sample]);
        }
    }
    out
}

/// Convert an 8-bit frame in a YBR color model to interleaved RGB,
/// expanding horizontally subsampled chrominance.
///
/// Returns `None` for color models which cannot be converted here.
pub fn ybr_to_rgb(frame: &[u8], photometric: PhotometricInterpretation, cols: u16) -> Option<Vec<u8>> {
    use PhotometricInterpretation::*;
    let partial = matches!(photometric, YbrPartial422);
    match photometric {
        YbrFull | YbrIct => Some(
            frame
                .chunks_exact(3)
                .flat_map(|p| ybr_pixel(p[0], p[1], p[2], false))
                .collect(),
        ),
        YbrFull422 | YbrPartial422 => {
            let cols = usize::from(cols);
            let mut out = Vec::with_capacity(frame.len() / 2 * 3);
            // each group of 4 bytes holds Y1 Y2 Cb Cr
            for row in frame.chunks(cols * 2) {
                let mut x = 0;
                for group in row.chunks(4) {
                    match *group {
                        [y1, y2, cb, cr] => {
                            out.extend(ybr_pixel(y1, cb, cr, partial));
                            if x + 1 < cols {
                                out.extend(ybr_pixel(y2, cb, cr, partial));
                            }
                        }
                        [y1, ..] => out.extend(ybr_pixel(y1, 128, 128, partial)),
                        [] => {}
                    }
                    x += 2;
                }
            }
            Some(out)
        }
        _ => None,
    }
}

fn ybr_pixel(y: u8, cb: u8, cr: u8, partial: bool) -> [u8; 3] {
    let (y, cb, cr) = (f32::from(y), f32::from(cb) - 128., f32::from(cr) - 128.);
    let y = if partial { (y - 16.) * 255. / 219. } else { y };
    let k = if partial { 255. / 224. } else { 1. };
    let r = y + 1.402 * k * cr;
    let g = y - 0.344_136 * k * cb - 0.714_136 * k * cr;
    let b = y + 1.772 * k * cb;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0., 255.) as u8
}

/// Extract the bit plane of an overlay embedded at `bit_position`
/// of the samples of a frame, one bit per pixel, least significant first.
///
/// The output length is rounded up to an even number of bytes.
pub fn extract_overlay(
    frame: &[u8],
    bits_allocated: u16,
    bit_position: u16,
    overlay_len: usize,
) -> Vec<u8> {
    let mut overlay = vec![0u8; ((overlay_len + 7) / 8 + 1) & !1];
    let mask = 1u32 << bit_position;
    let bytes = usize::from(bits_allocated + 7) / 8;
    for (i, sample) in frame.chunks_exact(bytes).take(overlay_len).enumerate() {
        let value = match bytes {
            1 => u32::from(sample[0]),
            2 => u32::from(LittleEndian::read_u16(sample)),
            _ => LittleEndian::read_u32(sample),
        };
        if value & mask != 0 {
            overlay[i / 8] |= 1 << (i % 8);
        }
    }
    overlay
}

fn sample(frame: &[u8], index: usize, bytes: usize, signed: bool) -> i64 {
    let at = index * bytes;
    let raw = &frame[at..at + bytes];
    match (bytes, signed) {
        (1, false) => i64::from(raw[0]),
        (1, true) => i64::from(raw[0] as i8),
        (2, false) => i64::from(LittleEndian::read_u16(raw)),
        (2, true) => i64::from(LittleEndian::read_i16(raw)),
        (_, false) => i64::from(LittleEndian::read_u32(raw)),
        (_, true) => i64::from(LittleEndian::read_i32(raw)),
    }
}

/// The maximum absolute difference between two interleaved frames.
///
/// With a block size above 1,
/// the sums of samples over each complete square block are compared per band
/// and the difference is divided by the block area.
pub fn max_diff(a: &[u8], b: &[u8], descriptor: &ImageDescriptor, block_size: u32) -> u32 {
    let bytes = descriptor.bytes_per_sample();
    let signed = descriptor.is_signed();
    let samples = usize::from(descriptor.samples_per_pixel);
    let len = a.len().min(b.len()) / bytes;

    if block_size <= 1 {
        return (0..len)
            .map(|i| (sample(a, i, bytes, signed) - sample(b, i, bytes, signed)).unsigned_abs())
            .max()
            .unwrap_or(0) as u32;
    }

    let (rows, cols) = (usize::from(descriptor.rows), usize::from(descriptor.cols));
    let bs = block_size as usize;
    let mut max = 0;
    for band in 0..samples {
        for y in (0..rows).step_by(bs).take_while(|y| y + bs <= rows) {
            for x in (0..cols).step_by(bs).take_while(|x| x + bs <= cols) {
                let (mut sum_a, mut sum_b) = (0i64, 0i64);
                for yy in y..y + bs {
                    for xx in x..x + bs {
                        let i = (yy * cols + xx) * samples + band;
                        if i < len {
                            sum_a += sample(a, i, bytes, signed);
                            sum_b += sample(b, i, bytes, signed);
                        }
                    }
                }
                max = max.max((sum_a - sum_b).unsigned_abs());
            }
        }
    }
    (max / (bs * bs) as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::PixelRepresentation;

    fn mono(rows: u16, cols: u16, bits: u16) -> ImageDescriptor {
        ImageDescriptor {
            rows,
            cols,
            samples_per_pixel: 1,
            photometric_interpretation: PhotometricInterpretation::Monochrome2,
            bits_allocated: bits,
            bits_stored: bits,
            bits_compressed: bits,
            pixel_representation: PixelRepresentation::Unsigned,
            planar_configuration: 0,
            number_of_frames: 1,
            embedded_overlays: vec![],
        }
    }

    #[test]
    fn unused_bits() {
        let mut frame = [0xFF, 0xFF, 0x34, 0x12];
        nullify_unused_bits(&mut frame, 16, 12, false);
        assert_eq!(frame, [0xFF, 0x0F, 0x34, 0x02]);

        let mut frame = [0xFF, 0x08, 0xFF, 0x07];
        nullify_unused_bits(&mut frame, 16, 12, true);
        assert_eq!(frame, [0xFF, 0xF8, 0xFF, 0x07]);

        let mut frame = [0xF0];
        nullify_unused_bits(&mut frame, 8, 8, false);
        assert_eq!(frame, [0xF0]);
    }

    #[test]
    fn planes_to_pixels() {
        let planar = [1, 2, 10, 20, 100, 200];
        assert_eq!(to_interleaved(&planar, 3, 1), vec![1, 10, 100, 2, 20, 200]);
    }

    #[test]
    fn ybr_conversion() {
        let gray = ybr_to_rgb(&[128, 128, 128], PhotometricInterpretation::YbrFull, 1).unwrap();
        assert_eq!(gray, vec![128, 128, 128]);

        // 2x1 pixels sharing chrominance
        let rgb = ybr_to_rgb(&[50, 200, 128, 128], PhotometricInterpretation::YbrFull422, 2).unwrap();
        assert_eq!(rgb, vec![50, 50, 50, 200, 200, 200]);

        let red = ybr_to_rgb(&[76, 85, 255], PhotometricInterpretation::YbrFull, 1).unwrap();
        assert!(red[0] > 250 && red[1] < 5 && red[2] < 5);

        assert!(ybr_to_rgb(&[0; 3], PhotometricInterpretation::Rgb, 1).is_none());
    }

    #[test]
    fn overlay_plane() {
        // bit 7 set on pixels 1 and 8
        let mut frame = vec![0u8; 10];
        frame[1] = 0x80;
        frame[8] = 0x81;
        let overlay = extract_overlay(&frame, 8, 7, 10);
        assert_eq!(overlay, vec![0b0000_0010, 0b0000_0001]);
    }

    #[test]
    fn sample_differences() {
        let d = mono(2, 2, 8);
        assert_eq!(max_diff(&[1, 2, 3, 4], &[1, 5, 3, 0], &d, 1), 4);
        // block sums 10 and 9
        assert_eq!(max_diff(&[1, 2, 3, 4], &[1, 5, 3, 0], &d, 2), 0);

        let d = mono(1, 2, 16);
        assert_eq!(max_diff(&[0, 1, 0, 0], &[0, 0, 0, 0], &d, 1), 256);
    }
}
