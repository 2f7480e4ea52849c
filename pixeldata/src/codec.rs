//! Frame by frame decompression and compression of pixel data
//! through the adapters of a transfer syntax.
//!
//! [`Decompressor`] and [`Compressor`] handle one frame at a time,
//! and are shared by the streaming [`Transcoder`](crate::Transcoder)
//! and the in-memory functions [`decompress_tree`] and [`compress_tree`].

use crate::attribute::GetAttributeError;
use crate::descriptor::ImageDescriptor;
use crate::frame;
use crate::photometric::PhotometricInterpretation;
use crate::ts_type::{is_lossy_compression, TransferSyntaxType};
use dcmio_core::util::toggle_endian;
use dcmio_core::{AttributeTree, BulkData, Fragment, Tag, Value, VR};
use dcmio_dictionary_std::{tags, uids};
use dcmio_encoding::adapters::{
    DecodeError, EncodeError, EncodeOptions, PixelDataReader, PixelDataWriter,
};
use dcmio_encoding::TransferSyntax;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::borrow::Cow;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Transfer syntax {uid} has no encapsulated pixel data
    NotEncapsulated { uid: String, backtrace: Backtrace },

    /// No pixel data decoder for transfer syntax {uid}
    MissingDecoder { uid: String, backtrace: Backtrace },

    /// No pixel data encoder for transfer syntax {uid}
    MissingEncoder { uid: String, backtrace: Backtrace },

    /// Invalid image pixel description
    InvalidDescriptor {
        #[snafu(backtrace)]
        source: GetAttributeError,
    },

    /// Could not decode frame #{frame}
    DecodeFrame {
        frame: u32,
        source: DecodeError,
        backtrace: Backtrace,
    },

    /// Could not encode frame #{frame}
    EncodeFrame {
        frame: u32,
        source: EncodeError,
        backtrace: Backtrace,
    },

    /// Could not decode frame #{frame} again for verification
    VerifyFrame {
        frame: u32,
        source: DecodeError,
        backtrace: Backtrace,
    },

    /// Frame #{frame} has {actual} bytes instead of {expected}
    FrameLength {
        frame: u32,
        actual: usize,
        expected: usize,
        backtrace: Backtrace,
    },

    /// Decompressed pixel data differs up to {max_diff} from original pixel data
    FidelityExceeded {
        max_diff: u32,
        bound: u32,
        backtrace: Backtrace,
    },

    /// Number of Pixel Data Fragments: {fragments} does not match {frames}
    FragmentCount {
        fragments: usize,
        frames: u32,
        backtrace: Backtrace,
    },

    /// Pixel data of {actual} bytes is shorter than {expected} bytes
    PixelDataLength {
        actual: usize,
        expected: usize,
        backtrace: Backtrace,
    },

    /// Pixel data is already encapsulated
    AlreadyEncapsulated { backtrace: Backtrace },

    /// Cannot compress pixel data with photometric interpretation {photometric}
    UnsupportedPhotometric {
        photometric: PhotometricInterpretation,
        backtrace: Backtrace,
    },

    /// Bulk data is not in a local file: {uri}
    UnsupportedBulkData { uri: String, backtrace: Backtrace },

    #[snafu(display("Could not read bulk data from '{}'", path.display()))]
    ReadBulkData {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decodes the frames of encapsulated pixel data.
pub struct Decompressor<'a> {
    reader: &'a dyn PixelDataReader,
    descriptor: ImageDescriptor,
    decoded: ImageDescriptor,
}

impl std::fmt::Debug for Decompressor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Decompressor")
            .field("descriptor", &self.descriptor)
            .field("decoded", &self.decoded)
            .finish()
    }
}

impl<'a> Decompressor<'a> {
    /// Prepare to decode frames described by `descriptor`
    /// in the given transfer syntax.
    pub fn new(ts: &'a TransferSyntax, descriptor: ImageDescriptor) -> Result<Self> {
        ensure!(
            ts.is_encapsulated_pixel_data(),
            NotEncapsulatedSnafu { uid: ts.uid() }
        );
        let reader = ts
            .pixel_data_reader()
            .context(MissingDecoderSnafu { uid: ts.uid() })?;
        let decoded = descriptor.decoded(ts.uid());
        Ok(Decompressor {
            reader,
            descriptor,
            decoded,
        })
    }

    /// The description of the encoded frames.
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// The description of the frames once decoded.
    pub fn decoded_descriptor(&self) -> &ImageDescriptor {
        &self.decoded
    }

    /// Decode one frame (the concatenation of its fragments),
    /// appending the native little endian samples to `dst`.
    pub fn decompress_frame(&self, index: u32, data: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        let start = dst.len();
        let data = self.reader.patch_input(data);
        self.reader
            .decode_frame(&self.descriptor, &data, dst)
            .context(DecodeFrameSnafu { frame: index })?;
        let actual = dst.len() - start;
        let expected = self.decoded.frame_length();
        ensure!(
            actual >= expected,
            FrameLengthSnafu {
                frame: index,
                actual,
                expected,
            }
        );
        if actual > expected {
            debug!(
                "Dropping {} trailing bytes of decoded frame #{}",
                actual - expected,
                index
            );
            dst.truncate(start + expected);
        }
        Ok(())
    }
}

/// Encodes native frames, optionally verifying the loss of each one.
pub struct Compressor<'a> {
    writer: &'a dyn PixelDataWriter,
    verifier: Option<&'a dyn PixelDataReader>,
    descriptor: ImageDescriptor,
    options: EncodeOptions,
}

impl std::fmt::Debug for Compressor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Compressor")
            .field("descriptor", &self.descriptor)
            .field("options", &self.options)
            .field("verify", &self.verifier.is_some())
            .finish()
    }
}

impl<'a> Compressor<'a> {
    /// Prepare to encode frames described by `descriptor`
    /// into the given transfer syntax.
    ///
    /// When the options bound the pixel value error,
    /// the transfer syntax must be able to decode frames as well.
    pub fn new(
        ts: &'a TransferSyntax,
        descriptor: ImageDescriptor,
        options: EncodeOptions,
    ) -> Result<Self> {
        ensure!(
            ts.is_encapsulated_pixel_data(),
            NotEncapsulatedSnafu { uid: ts.uid() }
        );
        let writer = ts
            .pixel_data_writer()
            .context(MissingEncoderSnafu { uid: ts.uid() })?;
        let verifier = match options.max_pixel_value_error {
            Some(_) => Some(
                ts.pixel_data_reader()
                    .context(MissingDecoderSnafu { uid: ts.uid() })?,
            ),
            None => None,
        };
        let max_bits = TransferSyntaxType::for_uid(ts.uid()).max_bits_stored();
        if descriptor.bits_compressed > max_bits {
            warn!(
                "{} bits per sample exceed the {} bits of {}",
                descriptor.bits_compressed,
                max_bits,
                ts.name()
            );
        }
        Ok(Compressor {
            writer,
            verifier,
            descriptor,
            options,
        })
    }

    /// The description of the frames to encode.
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// Encode one interleaved little endian frame into `dst`,
    /// replacing its contents.
    ///
    /// The output is padded to an even length.
    pub fn compress_frame(&self, index: u32, frame: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        let expected = self.descriptor.frame_length();
        ensure!(
            frame.len() == expected,
            FrameLengthSnafu {
                frame: index,
                actual: frame.len(),
                expected,
            }
        );
        dst.clear();
        self.writer
            .encode_frame(&self.descriptor, frame, &self.options, dst)
            .context(EncodeFrameSnafu { frame: index })?;
        self.writer.patch_output(dst);

        if let (Some(verifier), Some(bound)) = (self.verifier, self.options.max_pixel_value_error)
        {
            let mut decoded = Vec::with_capacity(expected);
            let encoded = verifier.patch_input(dst);
            verifier
                .decode_frame(&self.descriptor, &encoded, &mut decoded)
                .context(VerifyFrameSnafu { frame: index })?;
            ensure!(
                decoded.len() >= expected,
                FrameLengthSnafu {
                    frame: index,
                    actual: decoded.len(),
                    expected,
                }
            );
            decoded.truncate(expected);
            let max_diff = frame::max_diff(
                frame,
                &decoded,
                &self.descriptor,
                self.options.avg_pixel_value_block_size,
            );
            debug!("Frame #{} differs up to {} after compression", index, max_diff);
            ensure!(max_diff <= bound, FidelityExceededSnafu { max_diff, bound });
        }

        if dst.len() % 2 != 0 {
            dst.push(0);
        }
        Ok(())
    }
}

/// Turn a native frame as stored in a data set
/// into interleaved little endian samples.
pub(crate) fn native_frame(
    mut data: Vec<u8>,
    descriptor: &ImageDescriptor,
    big_endian: bool,
) -> Vec<u8> {
    if big_endian {
        toggle_endian(&mut data, descriptor.bytes_per_sample());
    }
    if descriptor.is_banded() {
        frame::to_interleaved(
            &data,
            usize::from(descriptor.samples_per_pixel),
            descriptor.bytes_per_sample(),
        )
    } else {
        data
    }
}

/// Move overlays embedded in the high bits of the first frame
/// into their own _Overlay Data_.
pub(crate) fn extract_embedded_overlays(
    tree: &mut AttributeTree,
    descriptor: &ImageDescriptor,
    first_frame: &[u8],
) {
    for &group in &descriptor.embedded_overlays {
        let rows = tree.int_or(Tag(group, 0x0010), 0).max(0) as usize;
        let cols = tree.int_or(Tag(group, 0x0011), 0).max(0) as usize;
        let bit_position = tree.u16(Tag(group, 0x0102)).unwrap_or(0);
        let data = frame::extract_overlay(
            first_frame,
            descriptor.bits_allocated,
            bit_position,
            rows * cols,
        );
        debug!("Extracted overlay {:04X} from bit {}", group, bit_position);
        tree.put_u16(Tag(group, 0x0100), 1);
        tree.put_u16(Tag(group, 0x0102), 0);
        tree.put_bytes(Tag(group, 0x3000), VR::OB, data);
    }
}

/// Record the consequences of compressing frames described by `descriptor`
/// with the transfer syntax `ts_uid` in the data set.
pub(crate) fn mark_compressed(
    tree: &mut AttributeTree,
    descriptor: &ImageDescriptor,
    ts_uid: &str,
    options: &EncodeOptions,
) {
    let photometric = descriptor.photometric_interpretation.compress(ts_uid);
    tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, photometric.as_str());
    if descriptor.samples_per_pixel > 1 {
        let planar = TransferSyntaxType::for_uid(ts_uid).planar_configuration();
        tree.put_u16(tags::PLANAR_CONFIGURATION, planar);
    }
    if is_lossy_compression(ts_uid) {
        tree.put_str(tags::LOSSY_IMAGE_COMPRESSION, VR::CS, "01");
        if let Some(ratio) = options.compression_ratio {
            tree.put_str(tags::LOSSY_IMAGE_COMPRESSION_RATIO, VR::DS, format_ds(ratio));
        }
        if let Some(method) = lossy_method(ts_uid) {
            tree.put_str(tags::LOSSY_IMAGE_COMPRESSION_METHOD, VR::CS, method);
        }
    }
}

fn lossy_method(ts_uid: &str) -> Option<&'static str> {
    match TransferSyntaxType::for_uid(ts_uid) {
        TransferSyntaxType::JpegBaseline
        | TransferSyntaxType::JpegExtended
        | TransferSyntaxType::JpegSpectral
        | TransferSyntaxType::JpegProgressive => Some("ISO_10918_1"),
        TransferSyntaxType::JpegLs => Some("ISO_14495_1"),
        TransferSyntaxType::Jpeg2000 if ts_uid == uids::HTJ2K => Some("ISO_15444_15"),
        TransferSyntaxType::Jpeg2000 => Some("ISO_15444_1"),
        _ => None,
    }
}

/// Format a decimal string of at most 16 characters.
fn format_ds(value: f64) -> String {
    let mut text = format!("{:.4}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    text.truncate(16);
    text
}

fn read_bulk_data(bulk: &BulkData) -> Result<Vec<u8>> {
    let path = bulk
        .file_path()
        .context(UnsupportedBulkDataSnafu { uri: &bulk.uri })?;
    File::open(&path)
        .and_then(|file| bulk.read_from(file))
        .context(ReadBulkDataSnafu { path })
}

fn fragment_bytes(fragment: &Fragment) -> Result<Cow<'_, [u8]>> {
    match fragment {
        Fragment::Inline(data) => Ok(Cow::Borrowed(data)),
        Fragment::BulkData(bulk) => read_bulk_data(bulk).map(Cow::Owned),
    }
}

/// Decode the encapsulated pixel data of a data set in memory,
/// replacing it with native pixel data in the byte order of the tree.
///
/// Returns `false` if the tree holds no encapsulated pixel data.
pub fn decompress_tree(tree: &mut AttributeTree, ts: &TransferSyntax) -> Result<bool> {
    let fragments = match tree.remove(tags::PIXEL_DATA) {
        Some(attr) => match attr.value {
            Value::Fragments(fragments) => fragments,
            value => {
                tree.put(tags::PIXEL_DATA, attr.vr, value);
                return Ok(false);
            }
        },
        None => return Ok(false),
    };
    let descriptor = ImageDescriptor::from_tree(tree, None).context(InvalidDescriptorSnafu)?;
    let decompressor = Decompressor::new(ts, descriptor)?;
    let frames = decompressor.descriptor().number_of_frames;

    let count = fragments.len();
    let matching = if frames == 1 {
        count >= 2
    } else {
        count == frames as usize + 1
    };
    ensure!(
        matching,
        FragmentCountSnafu {
            fragments: count,
            frames,
        }
    );

    let decoded = decompressor.decoded_descriptor().clone();
    let mut pixels = Vec::with_capacity(decoded.length() + 1);
    if frames == 1 {
        let mut data = Vec::new();
        for fragment in &fragments[1..] {
            data.extend_from_slice(&fragment_bytes(fragment)?);
        }
        decompressor.decompress_frame(0, &data, &mut pixels)?;
    } else {
        for (i, fragment) in fragments[1..].iter().enumerate() {
            let data = fragment_bytes(fragment)?;
            decompressor.decompress_frame(i as u32, &data, &mut pixels)?;
        }
    }
    if tree.is_big_endian() {
        toggle_endian(&mut pixels, decoded.bytes_per_sample());
    }
    if pixels.len() % 2 != 0 {
        pixels.push(0);
    }

    let vr = if decoded.bits_allocated > 8 {
        VR::OW
    } else {
        VR::OB
    };
    tree.put_bytes(tags::PIXEL_DATA, vr, pixels);
    tree.put_str(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        decoded.photometric_interpretation.as_str(),
    );
    if decoded.samples_per_pixel > 1 {
        tree.put_u16(tags::PLANAR_CONFIGURATION, 0);
    }
    Ok(true)
}

/// Encode the native pixel data of a data set in memory,
/// one fragment per frame after an empty basic offset table.
///
/// Returns `false` if the tree holds no pixel data.
pub fn compress_tree(
    tree: &mut AttributeTree,
    ts: &TransferSyntax,
    options: &EncodeOptions,
) -> Result<bool> {
    let (raw, big_endian) = match tree.value(tags::PIXEL_DATA) {
        Some(Value::Bytes(bytes)) if !bytes.is_empty() => (bytes.clone(), tree.is_big_endian()),
        Some(Value::BulkData(bulk)) => (read_bulk_data(bulk)?, bulk.big_endian),
        Some(Value::Fragments(_)) => return AlreadyEncapsulatedSnafu.fail(),
        _ => return Ok(false),
    };
    let descriptor = ImageDescriptor::from_tree(tree, options.bits_compressed)
        .context(InvalidDescriptorSnafu)?;
    let photometric = descriptor.photometric_interpretation;
    ensure!(
        !photometric.is_subsampled(),
        UnsupportedPhotometricSnafu { photometric }
    );
    let frame_len = descriptor.frame_length();
    let expected = descriptor.length();
    ensure!(
        frame_len > 0 && raw.len() >= expected,
        PixelDataLengthSnafu {
            actual: raw.len(),
            expected,
        }
    );

    let ts_type = TransferSyntaxType::for_uid(ts.uid());
    let mut target = descriptor.clone();
    target.planar_configuration = 0;
    let compressor = Compressor::new(ts, target, options.clone())?;
    let sign_extend = descriptor.is_signed() && ts_type.can_encode_signed();

    let mut fragments = vec![Fragment::Inline(Vec::new())];
    for (i, chunk) in raw[..expected].chunks_exact(frame_len).enumerate() {
        let mut frame = native_frame(chunk.to_vec(), &descriptor, big_endian);
        if i == 0 {
            extract_embedded_overlays(tree, &descriptor, &frame);
        }
        frame::nullify_unused_bits(
            &mut frame,
            descriptor.bits_allocated,
            descriptor.bits_stored,
            sign_extend,
        );
        let mut encoded = Vec::new();
        compressor.compress_frame(i as u32, &frame, &mut encoded)?;
        fragments.push(Fragment::Inline(encoded));
    }

    tree.put(tags::PIXEL_DATA, VR::OB, Value::Fragments(fragments));
    mark_compressed(tree, &descriptor, ts.uid(), options);
    Ok(true)
}
