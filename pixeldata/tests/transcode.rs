//! Transcoding whole data streams between transfer syntaxes.
use dcmio_core::{AttributeTree, Value, VR};
use dcmio_dictionary_std::{tags, uids};
use dcmio_encoding::adapters::{
    DecodeResult, EncodeOptions, EncodeResult, PixelDataObject, PixelDataReader, PixelDataWriter,
};
use dcmio_encoding::transfer_syntax::{Codec, NeverAdapter};
use dcmio_encoding::{TransferSyntax, TransferSyntaxIndex};
use dcmio_parser::dataset::{
    BulkDataDescriptor, EncodingOptions, IncludeBulkData, ReadOptions, StreamWriter,
};
use dcmio_parser::meta::create_file_meta;
use dcmio_pixeldata::transcode::Error;
use dcmio_pixeldata::{codec, TranscodeOptions, TranscodeState, Transcoder};
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use rstest::rstest;

fn image_tree(rows: u16, cols: u16, bits: u16, frames: u32, pixels: Vec<u8>) -> AttributeTree {
    let mut tree = AttributeTree::new();
    tree.put_str(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
    tree.put_str(tags::SOP_INSTANCE_UID, VR::UI, "2.25.12345");
    tree.put_str(tags::PATIENT_NAME, VR::PN, "Doe^Jane");
    tree.put_u16(tags::SAMPLES_PER_PIXEL, 1);
    tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
    tree.put_str(tags::NUMBER_OF_FRAMES, VR::IS, frames.to_string());
    tree.put_u16(tags::ROWS, rows);
    tree.put_u16(tags::COLUMNS, cols);
    tree.put_u16(tags::BITS_ALLOCATED, bits);
    tree.put_u16(tags::BITS_STORED, if bits == 16 { 12 } else { 8 });
    tree.put_u16(tags::HIGH_BIT, if bits == 16 { 11 } else { 7 });
    tree.put_u16(tags::PIXEL_REPRESENTATION, 0);
    let vr = if bits > 8 { VR::OW } else { VR::OB };
    tree.put_bytes(tags::PIXEL_DATA, vr, pixels);
    tree.put_bytes(tags::DATA_SET_TRAILING_PADDING, VR::OB, vec![0; 4]);
    tree
}

/// Two frames of 2x3 samples, 12 of 16 bits used.
fn mono16() -> AttributeTree {
    let pixels = (0..12u16)
        .flat_map(|i| (i * 300 + 7).to_le_bytes())
        .collect();
    image_tree(2, 3, 16, 2, pixels)
}

fn mono8() -> AttributeTree {
    image_tree(2, 3, 8, 1, vec![10, 20, 30, 40, 50, 60])
}

fn write_file(uid: &str, tree: &AttributeTree) -> Vec<u8> {
    let meta = create_file_meta(uids::SECONDARY_CAPTURE_IMAGE_STORAGE, "2.25.12345", uid);
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(&mut out, uid, EncodingOptions::default()).unwrap();
        writer.write_preamble(None).unwrap();
        writer.write_dataset(Some(&meta), tree).unwrap();
        writer.finish().unwrap();
    }
    out
}

fn transcode(input: &[u8], uid: &str, options: TranscodeOptions) -> Vec<u8> {
    let reader = ReadOptions::new().from_reader(input).unwrap();
    let mut transcoder = Transcoder::new(reader, uid, options).unwrap();
    let mut out = Vec::new();
    transcoder.transcode(&mut out).unwrap();
    assert_eq!(transcoder.state(), TranscodeState::Done);
    transcoder.close();
    out
}

fn read(bytes: &[u8]) -> (String, AttributeTree) {
    let mut reader = ReadOptions::new().from_reader(bytes).unwrap();
    let tree = reader.read_dataset().unwrap();
    (reader.transfer_syntax_uid().to_string(), tree)
}

#[test]
fn rle_round_trip_restores_native_pixel_data() {
    let tree = mono16();
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree);

    let compressed = transcode(&input, uids::RLE_LOSSLESS, TranscodeOptions::new());
    let (uid, rle) = read(&compressed);
    assert_eq!(uid, uids::RLE_LOSSLESS);
    let fragments = rle.value(tags::PIXEL_DATA).and_then(Value::fragments).unwrap();
    // empty offset table and one fragment per frame
    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].is_empty());
    assert_eq!(rle.string(tags::LOSSY_IMAGE_COMPRESSION), None);
    assert_eq!(rle.value(tags::DATA_SET_TRAILING_PADDING).and_then(Value::bytes), Some(&[0; 4][..]));

    let restored = transcode(&compressed, uids::EXPLICIT_VR_LITTLE_ENDIAN, TranscodeOptions::new());
    let (uid, native) = read(&restored);
    assert_eq!(uid, uids::EXPLICIT_VR_LITTLE_ENDIAN);
    assert_eq!(native, tree);
}

#[rstest]
#[case(uids::EXPLICIT_VR_BIG_ENDIAN, uids::EXPLICIT_VR_LITTLE_ENDIAN)]
#[case(uids::EXPLICIT_VR_LITTLE_ENDIAN, uids::EXPLICIT_VR_BIG_ENDIAN)]
#[case(uids::IMPLICIT_VR_LITTLE_ENDIAN, uids::EXPLICIT_VR_LITTLE_ENDIAN)]
fn native_pixel_data_is_copied(#[case] from: &str, #[case] to: &str) {
    let tree = mono16();
    let input = write_file(from, &tree);
    let output = transcode(&input, to, TranscodeOptions::new());
    let (uid, copied) = read(&output);
    assert_eq!(uid, to);
    assert_eq!(copied.into_endianness(false), tree);
}

#[test]
fn nullified_pixel_data_is_not_compressed() {
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono16());
    let output = transcode(
        &input,
        uids::RLE_LOSSLESS,
        TranscodeOptions::new().nullify_pixel_data(true),
    );
    let (uid, tree) = read(&output);
    assert_eq!(uid, uids::EXPLICIT_VR_LITTLE_ENDIAN);
    assert!(tree.value(tags::PIXEL_DATA).map_or(false, |v| v.is_empty()));
    assert_eq!(tree.string(tags::PATIENT_NAME), Some("Doe^Jane"));
    assert!(tree.contains(tags::DATA_SET_TRAILING_PADDING));
}

#[test]
fn data_set_without_pixel_data_is_written_uncompressed() {
    let mut source = mono16();
    source.remove(tags::PIXEL_DATA);
    source.remove(tags::DATA_SET_TRAILING_PADDING);
    let input = write_file(uids::IMPLICIT_VR_LITTLE_ENDIAN, &source);

    let reader = ReadOptions::new().from_reader(&input[..]).unwrap();
    let mut transcoder = Transcoder::new(reader, uids::RLE_LOSSLESS, TranscodeOptions::new()).unwrap();
    let mut output = Vec::new();
    transcoder.transcode(&mut output).unwrap();
    assert_eq!(transcoder.destination_transfer_syntax(), uids::RLE_LOSSLESS);
    assert_eq!(
        transcoder.file_meta().and_then(|m| m.string(tags::TRANSFER_SYNTAX_UID)),
        Some(uids::EXPLICIT_VR_LITTLE_ENDIAN)
    );

    let (uid, tree) = read(&output);
    assert_eq!(uid, uids::EXPLICIT_VR_LITTLE_ENDIAN);
    assert_eq!(tree, source);
}

#[test]
fn file_meta_can_be_left_out() {
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono8());
    let output = transcode(
        &input,
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        TranscodeOptions::new().include_file_meta(false),
    );
    let mut reader = ReadOptions::new().from_reader(&output[..]).unwrap();
    let tree = reader.read_dataset().unwrap();
    assert!(!reader.has_file_meta());
    assert_eq!(tree, mono8());
}

#[test]
fn unknown_destination_is_rejected() {
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono8());
    let reader = ReadOptions::new().from_reader(&input[..]).unwrap();
    let err = Transcoder::new(reader, "1.2.3.4.5", TranscodeOptions::new()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedTransferSyntax { .. }));
}

#[test]
fn transcoding_twice_fails() {
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono8());
    let reader = ReadOptions::new().from_reader(&input[..]).unwrap();
    let mut transcoder =
        Transcoder::new(reader, uids::EXPLICIT_VR_LITTLE_ENDIAN, TranscodeOptions::new()).unwrap();
    transcoder.transcode(Vec::new()).unwrap();
    assert!(matches!(
        transcoder.transcode(Vec::new()),
        Err(Error::AlreadyTranscoded { .. })
    ));
}

#[test]
fn bulk_data_files_are_deleted_on_close() {
    let mut tree = mono8();
    tree.put_bytes(tags::ENCAPSULATED_DOCUMENT, VR::OB, vec![7; 100]);
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree);

    let dir = tempfile::tempdir().unwrap();
    let reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::Uri)
        .bulk_data_descriptor(BulkDataDescriptor::never().with_threshold(VR::OB, 64))
        .bulk_data_directory(dir.path())
        .from_reader(&input[..])
        .unwrap();
    let mut transcoder =
        Transcoder::new(reader, uids::EXPLICIT_VR_LITTLE_ENDIAN, TranscodeOptions::new()).unwrap();
    let mut output = Vec::new();
    transcoder.transcode(&mut output).unwrap();

    let files = transcoder.bulk_data_files().to_vec();
    assert_eq!(files.len(), 1);
    assert!(files[0].exists());
    transcoder.close();
    assert!(!files[0].exists());

    let (_, copied) = read(&output);
    assert_eq!(copied, tree);
}

/// Adds a fixed distortion to every sample on encoding.
struct Distort(u8);

impl PixelDataReader for Distort {
    fn decode_frame(
        &self,
        _src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        dst.extend_from_slice(frame_data);
        Ok(())
    }
}

impl PixelDataWriter for Distort {
    fn encode_frame(
        &self,
        _src: &dyn PixelDataObject,
        frame: &[u8],
        _options: &EncodeOptions,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        dst.extend(frame.iter().map(|b| b.saturating_add(self.0)));
        Ok(())
    }
}

/// The built-in registry, with JPEG Baseline served by [`Distort`].
struct StubIndex {
    jpeg: TransferSyntax,
    registry: TransferSyntaxRegistry,
}

impl StubIndex {
    fn new(distortion: u8) -> Self {
        StubIndex {
            jpeg: TransferSyntax::<NeverAdapter, Distort, Distort>::new_ele(
                uids::JPEG_BASELINE8_BIT,
                "Distorting codec",
                Codec::EncapsulatedPixelData(Some(Distort(distortion)), Some(Distort(distortion))),
            )
            .erased(),
            registry: TransferSyntaxRegistry,
        }
    }
}

impl TransferSyntaxIndex for StubIndex {
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        if uid.trim_end_matches('\0') == uids::JPEG_BASELINE8_BIT {
            Some(&self.jpeg)
        } else {
            self.registry.get(uid)
        }
    }
}

fn transcode_lossy(index: &StubIndex, input: &[u8], options: TranscodeOptions) -> Result<Vec<u8>, Error> {
    let reader = ReadOptions::new()
        .transfer_syntax_index(index)
        .from_reader(input)
        .unwrap();
    let mut transcoder = Transcoder::new(reader, uids::JPEG_BASELINE8_BIT, options)?;
    let mut out = Vec::new();
    transcoder.transcode(&mut out)?;
    Ok(out)
}

#[test]
fn lossy_compression_within_bound() {
    let index = StubIndex::new(2);
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono8());
    let options = TranscodeOptions::new()
        .encode_options(EncodeOptions::new().max_pixel_value_error(3).compression_ratio(10.));
    let output = transcode_lossy(&index, &input, options).unwrap();

    let mut reader = ReadOptions::new()
        .transfer_syntax_index(&index)
        .from_reader(&output[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();
    assert_eq!(reader.transfer_syntax_uid(), uids::JPEG_BASELINE8_BIT);
    assert_eq!(tree.string(tags::LOSSY_IMAGE_COMPRESSION), Some("01"));
    assert_eq!(tree.string(tags::LOSSY_IMAGE_COMPRESSION_RATIO), Some("10"));
    assert_eq!(tree.string(tags::LOSSY_IMAGE_COMPRESSION_METHOD), Some("ISO_10918_1"));
    let fragments = tree.value(tags::PIXEL_DATA).and_then(Value::fragments).unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(
        fragments[1],
        dcmio_core::Fragment::Inline(vec![12, 22, 32, 42, 52, 62])
    );
}

#[test]
fn lossy_compression_beyond_bound_fails() {
    let index = StubIndex::new(5);
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &mono8());
    let options =
        TranscodeOptions::new().encode_options(EncodeOptions::new().max_pixel_value_error(3));
    let err = transcode_lossy(&index, &input, options).unwrap_err();
    assert!(matches!(
        err,
        Error::Codec {
            source: codec::Error::FidelityExceeded {
                max_diff: 5,
                bound: 3,
                ..
            },
            ..
        }
    ));
}

#[test]
fn palette_color_becomes_rgb_for_lossy_compression() {
    let mut tree = image_tree(2, 2, 8, 1, vec![10, 11, 12, 13]);
    tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "PALETTE COLOR");
    let channels = [
        (
            tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
            tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        ),
        (
            tags::GREEN_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
            tags::GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        ),
        (
            tags::BLUE_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
            tags::BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        ),
    ];
    for (i, (descriptor, data)) in channels.into_iter().enumerate() {
        tree.put(descriptor, VR::US, Value::from_u16s([4, 10, 16]));
        tree.put(
            data,
            VR::OW,
            Value::from_u16s((0..4u16).map(|v| (v * 60 + i as u16) << 8)),
        );
    }
    let input = write_file(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree);

    let index = StubIndex::new(0);
    let output = transcode_lossy(&index, &input, TranscodeOptions::new()).unwrap();
    let mut reader = ReadOptions::new()
        .transfer_syntax_index(&index)
        .from_reader(&output[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();

    assert_eq!(tree.u16(tags::SAMPLES_PER_PIXEL), Some(3));
    assert_eq!(tree.u16(tags::PLANAR_CONFIGURATION), Some(0));
    assert_eq!(tree.string(tags::PHOTOMETRIC_INTERPRETATION), Some("YBR_FULL_422"));
    assert!(!tree.contains(tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA));
    let fragments = tree.value(tags::PIXEL_DATA).and_then(Value::fragments).unwrap();
    #[rustfmt::skip]
    let rgb = vec![
        0, 1, 2,
        60, 61, 62,
        120, 121, 122,
        180, 181, 182,
    ];
    assert_eq!(fragments[1], dcmio_core::Fragment::Inline(rgb));
}
