//! Streaming conversion of a data set to another transfer syntax.
//!
//! A [`Transcoder`] reads the source attributes up to the pixel data,
//! adjusts them to the destination encoding,
//! and pushes the pixel data through frame by frame:
//! copied as is, decompressed, or (re)compressed.
//! The attributes after the pixel data are copied at the end.
//! The output is written forward only,
//! so it may go straight to a pipe or a socket.

use crate::attribute::GetAttributeError;
use crate::codec::{self, extract_embedded_overlays, mark_compressed, native_frame};
use crate::codec::{Compressor, Decompressor};
use crate::descriptor::ImageDescriptor;
use crate::frame;
use crate::lut::{remove_palette_attributes, CreateLutError, PaletteLut};
use crate::photometric::PhotometricInterpretation;
use crate::ts_type::{is_lossy_compression, is_ybr_compression, TransferSyntaxType};
use dcmio_core::util::toggle_endian;
use dcmio_core::{AttributeTree, DataDictionary, DataElementHeader, Length, VR};
use dcmio_dictionary_std::{tags, uids, StandardDataDictionary};
use dcmio_encoding::adapters::{EncodeOptions, EncodeResult};
use dcmio_encoding::{TransferSyntax, TransferSyntaxIndex};
use dcmio_parser::dataset::{read, write, EncodingOptions, StreamReader, StreamWriter};
use dcmio_parser::meta::{self, FileMetaBuilder};
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// An error occurred during the transcoding process.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Unsupported transfer syntax {uid}
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },

    /// The data set was already transcoded
    AlreadyTranscoded { backtrace: Backtrace },

    /// Could not read the source data set
    ReadDataset {
        #[snafu(backtrace)]
        source: read::Error,
    },

    /// Could not write the destination data set
    WriteDataset {
        #[snafu(backtrace)]
        source: write::Error,
    },

    /// Could not create the file meta group
    CreateFileMeta {
        #[snafu(backtrace)]
        source: meta::Error,
    },

    /// Invalid image pixel description
    InvalidDescriptor {
        #[snafu(backtrace)]
        source: GetAttributeError,
    },

    /// Could not convert palette color to RGB
    ConvertPalette {
        source: CreateLutError,
        backtrace: Backtrace,
    },

    /// Cannot convert {photometric} with {bits_allocated} bits allocated to RGB
    ConvertColor {
        photometric: PhotometricInterpretation,
        bits_allocated: u16,
        backtrace: Backtrace,
    },

    /// Could not process pixel data
    Codec {
        #[snafu(backtrace)]
        source: codec::Error,
    },

    /// Pixel data of {len} bytes does not fit in a value
    PixelDataTooLong { len: u64, backtrace: Backtrace },
}

/// Alias for the result of transcoding.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Options of a [`Transcoder`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct TranscodeOptions {
    /// Write a preamble and a file meta group. Default `true`.
    pub include_file_meta: bool,
    /// Keep the file meta group of the source,
    /// only changing its transfer syntax,
    /// instead of creating a new one. Default `false`.
    pub retain_file_meta: bool,
    /// Delete the bulk data files of the source reader
    /// on [`close`](Transcoder::close). Default `true`.
    pub delete_bulk_data_files: bool,
    /// Replace the pixel data with an empty value. Default `false`.
    pub nullify_pixel_data: bool,
    /// Options for the pixel data encoder.
    pub encode: EncodeOptions,
    /// Options for the data set encoder.
    pub encoding: EncodingOptions,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        TranscodeOptions {
            include_file_meta: true,
            retain_file_meta: false,
            delete_bulk_data_files: true,
            nullify_pixel_data: false,
            encode: EncodeOptions::default(),
            encoding: EncodingOptions::default(),
        }
    }
}

impl TranscodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_file_meta(mut self, include: bool) -> Self {
        self.include_file_meta = include;
        self
    }

    pub fn retain_file_meta(mut self, retain: bool) -> Self {
        self.retain_file_meta = retain;
        self
    }

    pub fn delete_bulk_data_files(mut self, delete: bool) -> Self {
        self.delete_bulk_data_files = delete;
        self
    }

    pub fn nullify_pixel_data(mut self, nullify: bool) -> Self {
        self.nullify_pixel_data = nullify;
        self
    }

    pub fn encode_options(mut self, options: EncodeOptions) -> Self {
        self.encode = options;
        self
    }

    pub fn encoding_options(mut self, options: EncodingOptions) -> Self {
        self.encoding = options;
        self
    }

    /// Set an encoder parameter by name,
    /// such as `maxPixelValueError` or `compressionRatio`.
    pub fn set_param(&mut self, name: &str, value: f64) -> EncodeResult<()> {
        self.encode.set_param(name, value)
    }
}

/// The progress of a [`Transcoder`].
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum TranscodeState {
    /// reading the attributes before the pixel data
    ReadingAttributes,
    /// decoding encapsulated frames into native pixel data
    DecompressingFrames,
    /// encoding frames into encapsulated pixel data
    RecompressingFrames,
    /// copying the pixel data value without decoding it
    CopyingPixelData,
    /// copying the attributes after the pixel data
    ReadingTrailingAttributes,
    /// all of the data set was written
    Done,
}

/// How the pixel data value is carried over.
#[derive(Debug, Copy, Clone, PartialEq)]
enum PixelMode {
    Nullify,
    Copy,
    CopyFragments,
    Decompress,
    Compress,
}

/// Converts a data set read from a [`StreamReader`]
/// into another transfer syntax.
///
/// # Example
///
/// ```no_run
/// # use dcmio_parser::ReadOptions;
/// # use dcmio_pixeldata::{Transcoder, TranscodeOptions};
/// # use dcmio_dictionary_std::uids;
/// let reader = ReadOptions::new().open_file("image.dcm")?;
/// let mut transcoder = Transcoder::new(reader, uids::RLE_LOSSLESS, TranscodeOptions::new())?;
/// transcoder.transcode(std::fs::File::create("image-rle.dcm")?)?;
/// transcoder.close();
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct Transcoder<'r, D = StandardDataDictionary, T = TransferSyntaxRegistry> {
    reader: StreamReader<'r, D, T>,
    index: T,
    dest_uid: String,
    options: TranscodeOptions,
    state: TranscodeState,
    file_meta: Option<AttributeTree>,
}

impl<D, T> std::fmt::Debug for Transcoder<'_, D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Transcoder")
            .field("dest_uid", &self.dest_uid)
            .field("options", &self.options)
            .field("state", &self.state)
            .finish()
    }
}

impl<'r, D, T> Transcoder<'r, D, T>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex + Clone,
{
    /// Prepare to transcode the data set of `reader`
    /// into the transfer syntax `dest_uid`.
    pub fn new(
        reader: StreamReader<'r, D, T>,
        dest_uid: &str,
        options: TranscodeOptions,
    ) -> Result<Self> {
        let index = reader.transfer_syntax_index().clone();
        let dest_uid = dest_uid.trim_end_matches('\0').to_string();
        match index.get(&dest_uid) {
            Some(ts) if !ts.is_unsupported() => {}
            _ => return UnsupportedTransferSyntaxSnafu { uid: dest_uid }.fail(),
        }
        Ok(Transcoder {
            reader,
            index,
            dest_uid,
            options,
            state: TranscodeState::ReadingAttributes,
            file_meta: None,
        })
    }

    /// Read the whole source data set and write it to `to`.
    pub fn transcode<W>(&mut self, to: W) -> Result<()>
    where
        W: Write,
    {
        ensure!(
            self.state == TranscodeState::ReadingAttributes,
            AlreadyTranscodedSnafu
        );
        let Transcoder {
            reader,
            index,
            dest_uid,
            options,
            state,
            file_meta,
        } = self;
        let index = &*index;
        let options = &*options;

        reader.read_file_meta().context(ReadDatasetSnafu)?;
        let src_uid = reader.transfer_syntax_uid().to_string();
        let src_ts = index
            .get(&src_uid)
            .context(UnsupportedTransferSyntaxSnafu { uid: &src_uid })?;
        let mut dataset = AttributeTree::with_big_endian(reader.is_big_endian());
        let pixel_header = reader
            .read_dataset_until(&mut dataset, tags::PIXEL_DATA)
            .context(ReadDatasetSnafu)?;

        let mut dest_ts = index
            .get(dest_uid)
            .context(UnsupportedTransferSyntaxSnafu { uid: dest_uid.as_str() })?;
        if (pixel_header.is_none() || options.nullify_pixel_data)
            && dest_ts.is_encapsulated_pixel_data()
        {
            debug!(
                "No pixel data to compress, writing {} instead",
                uids::EXPLICIT_VR_LITTLE_ENDIAN
            );
            dest_ts = index.get(uids::EXPLICIT_VR_LITTLE_ENDIAN).context(
                UnsupportedTransferSyntaxSnafu {
                    uid: uids::EXPLICIT_VR_LITTLE_ENDIAN,
                },
            )?;
        }

        let mut out = Output {
            writer: StreamWriter::with_options(to, dest_ts, options.encoding)
                .context(WriteDatasetSnafu)?,
            dest_ts,
            options,
            file_meta,
        };

        if let Some(header) = pixel_header {
            let src_encapsulated = header.len.is_undefined();
            let dest_encapsulated = dest_ts.is_encapsulated_pixel_data();
            let mode = if options.nullify_pixel_data {
                PixelMode::Nullify
            } else if !src_encapsulated && !dest_encapsulated {
                PixelMode::Copy
            } else if src_encapsulated && dest_ts.uid() == src_uid {
                PixelMode::CopyFragments
            } else if !dest_encapsulated {
                PixelMode::Decompress
            } else {
                PixelMode::Compress
            };
            debug!("Pixel data of {} to {}: {:?}", src_uid, dest_ts.uid(), mode);

            match mode {
                PixelMode::Nullify => {
                    *state = TranscodeState::CopyingPixelData;
                    out.start(reader, &dataset)?;
                    nullify(reader, &mut out.writer, &dataset, header)?;
                }
                PixelMode::Copy => {
                    *state = TranscodeState::CopyingPixelData;
                    out.start(reader, &dataset)?;
                    copy_native(reader, &mut out.writer, &dataset, header)?;
                }
                PixelMode::CopyFragments => {
                    *state = TranscodeState::CopyingPixelData;
                    out.start(reader, &dataset)?;
                    copy_fragments(reader, &mut out.writer, header)?;
                }
                PixelMode::Decompress => {
                    *state = TranscodeState::DecompressingFrames;
                    decompress(reader, &mut out, &mut dataset, src_ts, header)?;
                }
                PixelMode::Compress => {
                    *state = TranscodeState::RecompressingFrames;
                    compress(reader, &mut out, &mut dataset, src_ts, header)?;
                }
            }
        } else {
            out.start(reader, &dataset)?;
        }

        *state = TranscodeState::ReadingTrailingAttributes;
        let mut trailing = dataset.new_item();
        reader
            .read_dataset_into(&mut trailing)
            .context(ReadDatasetSnafu)?;
        out.writer
            .write_attributes(&trailing)
            .context(WriteDatasetSnafu)?;
        out.writer.finish().context(WriteDatasetSnafu)?;
        *state = TranscodeState::Done;
        Ok(())
    }
}

impl<'r, D, T> Transcoder<'r, D, T> {
    /// The progress of the transcoder.
    pub fn state(&self) -> TranscodeState {
        self.state
    }

    /// The UID of the requested destination transfer syntax.
    pub fn destination_transfer_syntax(&self) -> &str {
        &self.dest_uid
    }

    /// The file meta group written to the output, if any.
    pub fn file_meta(&self) -> Option<&AttributeTree> {
        self.file_meta.as_ref()
    }

    /// The bulk data files created by the source reader.
    pub fn bulk_data_files(&self) -> &[PathBuf] {
        self.reader.bulk_data_files()
    }

    /// Release the source,
    /// deleting its bulk data files if so configured.
    ///
    /// Files which cannot be deleted are only reported.
    pub fn close(self) {
        if !self.options.delete_bulk_data_files {
            return;
        }
        for path in self.reader.bulk_data_files() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Deleted bulk data file {}", path.display()),
                Err(e) => warn!("Could not delete bulk data file {}: {}", path.display(), e),
            }
        }
    }
}

/// The writing side of a transcoding pass.
struct Output<'w, 'o> {
    writer: StreamWriter<'w>,
    dest_ts: &'w TransferSyntax,
    options: &'o TranscodeOptions,
    file_meta: &'o mut Option<AttributeTree>,
}

impl Output<'_, '_> {
    /// Write the preamble and file meta group if requested,
    /// then the attributes preceding the pixel data.
    fn start<D, T>(&mut self, reader: &StreamReader<'_, D, T>, dataset: &AttributeTree) -> Result<()> {
        if self.options.include_file_meta {
            let uid = self.dest_ts.uid();
            let meta = match reader.file_meta() {
                Some(source) if self.options.retain_file_meta => {
                    let mut meta = source.clone();
                    meta.put_str(tags::TRANSFER_SYNTAX_UID, VR::UI, uid);
                    meta
                }
                _ => FileMetaBuilder::from_dataset(dataset)
                    .transfer_syntax(uid)
                    .build()
                    .context(CreateFileMetaSnafu)?,
            };
            self.writer
                .write_preamble(reader.preamble())
                .context(WriteDatasetSnafu)?;
            self.writer
                .write_file_meta(&meta)
                .context(WriteDatasetSnafu)?;
            *self.file_meta = Some(meta);
        }
        self.writer
            .write_attributes(dataset)
            .context(WriteDatasetSnafu)
    }
}

/// The value representation of the pixel data in the output.
///
/// Without explicit VR in the source it follows _Bits Allocated_.
fn pixel_data_vr(header: &DataElementHeader, dataset: &AttributeTree, explicit: bool) -> VR {
    match header.vr {
        VR::OB | VR::OW if explicit => header.vr,
        _ if dataset.int_or(tags::BITS_ALLOCATED, 8) > 8 => VR::OW,
        _ => VR::OB,
    }
}

fn nullify<D, T>(
    reader: &mut StreamReader<'_, D, T>,
    writer: &mut StreamWriter<'_>,
    dataset: &AttributeTree,
    header: DataElementHeader,
) -> Result<()>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    writer
        .write_header(
            tags::PIXEL_DATA,
            pixel_data_vr(&header, dataset, reader.is_explicit_vr()),
            Length(0),
        )
        .context(WriteDatasetSnafu)?;
    match header.len.get() {
        Some(len) => reader.skip_value(u64::from(len)).context(ReadDatasetSnafu),
        None => {
            while let Some(len) = reader.next_item().context(ReadDatasetSnafu)? {
                reader.skip_value(u64::from(len)).context(ReadDatasetSnafu)?;
            }
            Ok(())
        }
    }
}

fn copy_native<D, T>(
    reader: &mut StreamReader<'_, D, T>,
    writer: &mut StreamWriter<'_>,
    dataset: &AttributeTree,
    header: DataElementHeader,
) -> Result<()>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    let len = header.len.0;
    let vr = pixel_data_vr(&header, dataset, reader.is_explicit_vr());
    let swap_width = if reader.is_big_endian() != writer.is_big_endian() {
        vr.endian_width()
    } else {
        0
    };
    writer
        .write_header(tags::PIXEL_DATA, vr, Length(len))
        .context(WriteDatasetSnafu)?;
    reader
        .copy_value(u64::from(len), &mut *writer, swap_width)
        .context(ReadDatasetSnafu)?;
    Ok(())
}

fn copy_fragments<D, T>(
    reader: &mut StreamReader<'_, D, T>,
    writer: &mut StreamWriter<'_>,
    header: DataElementHeader,
) -> Result<()>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    writer
        .write_header(tags::PIXEL_DATA, header.vr, Length::UNDEFINED)
        .context(WriteDatasetSnafu)?;
    while let Some(len) = reader.next_item().context(ReadDatasetSnafu)? {
        writer.write_item_header(len).context(WriteDatasetSnafu)?;
        reader
            .copy_value(u64::from(len), &mut *writer, 0)
            .context(ReadDatasetSnafu)?;
    }
    writer.write_sequence_delimiter().context(WriteDatasetSnafu)
}

/// Pulls the frames of the pixel data value being read,
/// as interleaved little endian samples.
struct FrameSource<'t> {
    decompressor: Option<Decompressor<'t>>,
    /// the description of the stored frames
    stored: ImageDescriptor,
    /// the description of the frames handed out
    frame: ImageDescriptor,
    big_endian: bool,
    /// bytes of a native value not consumed yet
    remaining: u64,
    /// buffer of an encoded frame
    encoded: Vec<u8>,
}

impl<'t> FrameSource<'t> {
    fn new<D, T>(
        reader: &mut StreamReader<'_, D, T>,
        dataset: &AttributeTree,
        src_ts: &'t TransferSyntax,
        header: &DataElementHeader,
    ) -> Result<Self>
    where
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        let stored = ImageDescriptor::from_tree(dataset, None).context(InvalidDescriptorSnafu)?;
        match header.len.get() {
            Some(len) => {
                let expected = stored.length();
                if (len as usize) < expected {
                    return codec::PixelDataLengthSnafu {
                        actual: len as usize,
                        expected,
                    }
                    .fail()
                    .context(CodecSnafu);
                }
                let mut frame = stored.clone();
                frame.planar_configuration = 0;
                Ok(FrameSource {
                    decompressor: None,
                    stored,
                    frame,
                    big_endian: reader.is_big_endian(),
                    remaining: u64::from(len),
                    encoded: Vec::new(),
                })
            }
            None => {
                let decompressor =
                    Decompressor::new(src_ts, stored.clone()).context(CodecSnafu)?;
                // basic offset table
                match reader.next_item().context(ReadDatasetSnafu)? {
                    Some(len) => reader.skip_value(u64::from(len)).context(ReadDatasetSnafu)?,
                    None => {
                        return codec::FragmentCountSnafu {
                            fragments: 0usize,
                            frames: stored.number_of_frames,
                        }
                        .fail()
                        .context(CodecSnafu)
                    }
                }
                Ok(FrameSource {
                    frame: decompressor.decoded_descriptor().clone(),
                    decompressor: Some(decompressor),
                    stored,
                    big_endian: false,
                    remaining: 0,
                    encoded: Vec::new(),
                })
            }
        }
    }

    fn frames(&self) -> u32 {
        self.stored.number_of_frames
    }

    /// Read frame `index` into `dst`, replacing its contents.
    fn read_frame<D, T>(
        &mut self,
        reader: &mut StreamReader<'_, D, T>,
        index: u32,
        dst: &mut Vec<u8>,
    ) -> Result<()>
    where
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        dst.clear();
        match &self.decompressor {
            None => {
                let len = self.stored.frame_length();
                let mut data = std::mem::take(dst);
                data.resize(len, 0);
                reader.read_raw(&mut data).context(ReadDatasetSnafu)?;
                self.remaining -= len as u64;
                *dst = native_frame(data, &self.stored, self.big_endian);
            }
            Some(decompressor) => {
                self.encoded.clear();
                if self.stored.number_of_frames == 1 {
                    // all fragments make up the only frame
                    let mut fragments = 0;
                    while let Some(len) = reader.next_item().context(ReadDatasetSnafu)? {
                        let fragment = reader.read_fragment(len).context(ReadDatasetSnafu)?;
                        self.encoded.extend_from_slice(&fragment);
                        fragments += 1;
                    }
                    if fragments == 0 {
                        return codec::FragmentCountSnafu {
                            fragments: 1usize,
                            frames: 1u32,
                        }
                        .fail()
                        .context(CodecSnafu);
                    }
                } else {
                    match reader.next_item().context(ReadDatasetSnafu)? {
                        Some(len) => {
                            self.encoded = reader.read_fragment(len).context(ReadDatasetSnafu)?;
                        }
                        None => {
                            return codec::FragmentCountSnafu {
                                fragments: index as usize + 1,
                                frames: self.stored.number_of_frames,
                            }
                            .fail()
                            .context(CodecSnafu)
                        }
                    }
                }
                decompressor
                    .decompress_frame(index, &self.encoded, dst)
                    .context(CodecSnafu)?;
            }
        }
        Ok(())
    }

    /// Consume what is left of the pixel data value.
    fn finish<D, T>(self, reader: &mut StreamReader<'_, D, T>) -> Result<()>
    where
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        if self.decompressor.is_none() {
            return reader.skip_value(self.remaining).context(ReadDatasetSnafu);
        }
        if self.stored.number_of_frames == 1 {
            // the delimiter was consumed along with the frame
            return Ok(());
        }
        let mut extra = 0;
        while let Some(len) = reader.next_item().context(ReadDatasetSnafu)? {
            reader.skip_value(u64::from(len)).context(ReadDatasetSnafu)?;
            extra += 1;
        }
        if extra > 0 {
            warn!(
                "Ignoring {} pixel data fragments after {} frames",
                extra,
                self.stored.number_of_frames
            );
        }
        Ok(())
    }
}

fn decompress<D, T>(
    reader: &mut StreamReader<'_, D, T>,
    out: &mut Output<'_, '_>,
    dataset: &mut AttributeTree,
    src_ts: &TransferSyntax,
    header: DataElementHeader,
) -> Result<()>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    let mut source = FrameSource::new(reader, dataset, src_ts, &header)?;
    let descriptor = source.frame.clone();
    let frames = source.frames();

    // the first frame goes first, as overlays may come out of it
    let mut buffer = Vec::with_capacity(descriptor.frame_length());
    if frames > 0 {
        source.read_frame(reader, 0, &mut buffer)?;
        extract_embedded_overlays(dataset, &descriptor, &buffer);
    }

    if descriptor.photometric_interpretation != source.stored.photometric_interpretation {
        dataset.put_str(
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            descriptor.photometric_interpretation.as_str(),
        );
    }
    if descriptor.samples_per_pixel > 1 {
        dataset.put_u16(tags::PLANAR_CONFIGURATION, 0);
    }
    TransferSyntaxType::for_uid(src_ts.uid()).adjust_bits_stored_to_12(dataset);
    out.start(reader, dataset)?;

    let total = descriptor.frame_length() as u64 * u64::from(frames);
    let padded = total + (total & 1);
    let len = u32::try_from(padded)
        .ok()
        .filter(|&len| !Length(len).is_undefined())
        .context(PixelDataTooLongSnafu { len: padded })?;
    let vr = if descriptor.bits_allocated > 8 {
        VR::OW
    } else {
        VR::OB
    };
    out.writer
        .write_header(tags::PIXEL_DATA, vr, Length(len))
        .context(WriteDatasetSnafu)?;

    let nullify = !descriptor.embedded_overlays.is_empty();
    for index in 0..frames {
        if index > 0 {
            source.read_frame(reader, index, &mut buffer)?;
        }
        if nullify {
            frame::nullify_unused_bits(
                &mut buffer,
                descriptor.bits_allocated,
                descriptor.bits_stored,
                descriptor.is_signed(),
            );
        }
        if out.writer.is_big_endian() {
            toggle_endian(&mut buffer, descriptor.bytes_per_sample());
        }
        out.writer.write_raw(&buffer).context(WriteDatasetSnafu)?;
        debug!("Decompressed frame #{}", index);
    }
    if total & 1 != 0 {
        out.writer.write_raw(&[0]).context(WriteDatasetSnafu)?;
    }
    source.finish(reader)
}

/// A per-frame color conversion ahead of compression.
enum ColorConversion {
    Palette(PaletteLut),
    YbrToRgb,
}

fn compress<D, T>(
    reader: &mut StreamReader<'_, D, T>,
    out: &mut Output<'_, '_>,
    dataset: &mut AttributeTree,
    src_ts: &TransferSyntax,
    header: DataElementHeader,
) -> Result<()>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    let dest_uid = out.dest_ts.uid();
    let dest_type = TransferSyntaxType::for_uid(dest_uid);
    let mut source = FrameSource::new(reader, dataset, src_ts, &header)?;
    let obtained = source.frame.clone();
    let frames = source.frames();
    let mut buffer = Vec::with_capacity(obtained.frame_length());
    if frames > 0 {
        source.read_frame(reader, 0, &mut buffer)?;
        extract_embedded_overlays(dataset, &obtained, &buffer);
    }

    // bring the data set in line with the frames handed to the encoder
    dataset.put_str(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        obtained.photometric_interpretation.as_str(),
    );
    let photometric = obtained.photometric_interpretation;
    let conversion = if photometric == PhotometricInterpretation::PaletteColor
        && is_lossy_compression(dest_uid)
    {
        let lut = PaletteLut::from_tree(dataset).context(ConvertPaletteSnafu)?;
        warn!("Converting PALETTE COLOR to RGB for lossy compression");
        remove_palette_attributes(dataset);
        dataset.put_u16(tags::SAMPLES_PER_PIXEL, 3);
        dataset.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "RGB");
        dataset.put_u16(tags::BITS_ALLOCATED, 8);
        dataset.put_u16(tags::BITS_STORED, 8);
        dataset.put_u16(tags::HIGH_BIT, 7);
        dataset.put_u16(tags::PIXEL_REPRESENTATION, 0);
        Some(ColorConversion::Palette(lut))
    } else if (photometric.is_subsampled() && source.decompressor.is_none())
        || (photometric == PhotometricInterpretation::YbrFull && is_ybr_compression(dest_uid))
    {
        ensure!(
            obtained.bits_allocated == 8,
            ConvertColorSnafu {
                photometric,
                bits_allocated: obtained.bits_allocated,
            }
        );
        debug!("Converting {} to RGB for compression", photometric);
        dataset.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "RGB");
        Some(ColorConversion::YbrToRgb)
    } else {
        dest_type.adjust_bits_stored_to_12(dataset);
        None
    };

    let mut descriptor = ImageDescriptor::from_tree(dataset, out.options.encode.bits_compressed)
        .context(InvalidDescriptorSnafu)?;
    descriptor.planar_configuration = 0;
    let mut compressed_as = descriptor.clone();
    if dest_type == TransferSyntaxType::JpegLossless
        && compressed_as.photometric_interpretation.is_ybr()
        && !compressed_as.photometric_interpretation.is_subsampled()
    {
        compressed_as.photometric_interpretation = PhotometricInterpretation::Rgb;
    }
    let compressor = Compressor::new(out.dest_ts, compressed_as, out.options.encode.clone())
        .context(CodecSnafu)?;
    let sign_extend = descriptor.is_signed() && dest_type.can_encode_signed();

    mark_compressed(dataset, &descriptor, dest_uid, &out.options.encode);
    out.start(reader, dataset)?;
    out.writer
        .write_header(tags::PIXEL_DATA, VR::OB, Length::UNDEFINED)
        .context(WriteDatasetSnafu)?;
    out.writer.write_item_header(0).context(WriteDatasetSnafu)?;

    let mut encoded = Vec::new();
    for index in 0..frames {
        if index > 0 {
            source.read_frame(reader, index, &mut buffer)?;
        }
        match &conversion {
            Some(ColorConversion::Palette(lut)) => {
                buffer = lut.apply(&buffer, obtained.bits_allocated);
            }
            Some(ColorConversion::YbrToRgb) => {
                buffer = frame::ybr_to_rgb(&buffer, photometric, obtained.cols).context(
                    ConvertColorSnafu {
                        photometric,
                        bits_allocated: obtained.bits_allocated,
                    },
                )?;
            }
            None => {}
        }
        frame::nullify_unused_bits(
            &mut buffer,
            descriptor.bits_allocated,
            descriptor.bits_stored,
            sign_extend,
        );
        compressor
            .compress_frame(index, &buffer, &mut encoded)
            .context(CodecSnafu)?;
        out.writer
            .write_item_header(encoded.len() as u32)
            .context(WriteDatasetSnafu)?;
        out.writer.write_raw(&encoded).context(WriteDatasetSnafu)?;
        debug!("Compressed frame #{} into {} bytes", index, encoded.len());
    }
    out.writer
        .write_sequence_delimiter()
        .context(WriteDatasetSnafu)?;
    source.finish(reader)
}
