//! RLE Lossless frame codec, accessed through the registry.
#![cfg(feature = "rle")]

mod adapters;

use adapters::TestDataObject;
use dcmio_encoding::adapters::EncodeOptions;
use dcmio_encoding::TransferSyntaxIndex;
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use rstest::rstest;

const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// Deterministic sample bytes with both runs and noise.
fn sample_frame(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| if (i / 7) % 2 == 0 { 0x40 } else { (i * 31 % 251) as u8 })
        .collect()
}

#[rstest]
#[case(TestDataObject::monochrome(16, 16, 8))]
#[case(TestDataObject::monochrome(5, 7, 16))]
#[case(TestDataObject::monochrome(3, 3, 32))]
#[case(TestDataObject::rgb(10, 9))]
fn rle_frame_survives_a_round_trip(#[case] image: TestDataObject) {
    let ts = TransferSyntaxRegistry.get(RLE_LOSSLESS).unwrap();
    let writer = ts.pixel_data_writer().expect("RLE writer");
    let reader = ts.pixel_data_reader().expect("RLE reader");

    let frame = sample_frame(image.frame_len());
    let mut encoded = Vec::new();
    writer
        .encode_frame(&image, &frame, &EncodeOptions::default(), &mut encoded)
        .unwrap();
    writer.patch_output(&mut encoded);
    assert_eq!(encoded.len() % 2, 0);

    let mut decoded = Vec::new();
    reader
        .decode_frame(&image, &reader.patch_input(&encoded), &mut decoded)
        .unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn rle_header_lists_one_segment_per_sample_byte() {
    let ts = TransferSyntaxRegistry.get(RLE_LOSSLESS).unwrap();
    let writer = ts.pixel_data_writer().unwrap();

    let mut image = TestDataObject::rgb(4, 4);
    image.bits_allocated = 16;
    image.bits_stored = 16;
    let frame = sample_frame(image.frame_len());
    let mut encoded = Vec::new();
    writer
        .encode_frame(&image, &frame, &EncodeOptions::default(), &mut encoded)
        .unwrap();

    let nr_segments = u32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
    assert_eq!(nr_segments, 6);
    let offsets: Vec<u32> = encoded[4..64]
        .chunks(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(offsets[0], 64);
    assert!(offsets[..6].windows(2).all(|w| w[0] < w[1]));
    assert!(offsets[..6].iter().all(|o| o % 2 == 0));
    assert!(offsets[6..].iter().all(|&o| o == 0));
}

#[test]
fn too_many_segments_are_refused() {
    let ts = TransferSyntaxRegistry.get(RLE_LOSSLESS).unwrap();
    let writer = ts.pixel_data_writer().unwrap();

    let mut image = TestDataObject::rgb(2, 2);
    image.bits_allocated = 64;
    let frame = vec![0; image.frame_len()];
    let mut encoded = Vec::new();
    assert!(writer
        .encode_frame(&image, &frame, &EncodeOptions::default(), &mut encoded)
        .is_err());
}
