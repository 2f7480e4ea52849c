//! Writing attribute trees and reading them back.
use dcmio_core::smallvec::smallvec;
use dcmio_core::{AttributeTree, Numbers, Tag, Value, VR};
use dcmio_dictionary_std::{tags, uids};
use dcmio_parser::dataset::{EncodingOptions, ReadOptions, StreamWriter};
use dcmio_parser::meta::create_file_meta;
use rstest::rstest;

fn sample_tree() -> AttributeTree {
    let mut tree = AttributeTree::new();
    tree.put_str(tags::SPECIFIC_CHARACTER_SET, VR::CS, "ISO_IR 100");
    tree.put(
        tags::IMAGE_TYPE,
        VR::CS,
        Value::Strs(smallvec!["ORIGINAL".to_string(), "PRIMARY".to_string()]),
    );
    tree.put_str(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
    tree.put_str(tags::SOP_INSTANCE_UID, VR::UI, "2.25.12345");
    tree.put_str(tags::PATIENT_NAME, VR::PN, "Müller^Jörg");

    let mut item = tree.new_item();
    item.put_str(tags::REFERENCED_SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
    item.put_str(tags::REFERENCED_SOP_INSTANCE_UID, VR::UI, "2.25.1");
    let empty_item = tree.new_item();
    tree.put(
        tags::REFERENCED_IMAGE_SEQUENCE,
        VR::SQ,
        Value::Sequence(vec![item, empty_item]),
    );
    tree.put(tags::CONTENT_SEQUENCE, VR::SQ, Value::Empty);

    tree.put_u16(tags::ROWS, 2);
    tree.put_u16(tags::COLUMNS, 3);
    tree.put(
        tags::OVERLAY_ORIGIN,
        VR::SS,
        Value::Numbers(Numbers::I16(smallvec![-1, 4])),
    );
    tree.put_bytes(tags::PIXEL_DATA, VR::OB, vec![1, 2, 3, 4, 5, 6]);
    tree
}

fn write_file(uid: &str, tree: &AttributeTree, options: EncodingOptions) -> Vec<u8> {
    let meta = create_file_meta(uids::SECONDARY_CAPTURE_IMAGE_STORAGE, "2.25.12345", uid);
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(&mut out, uid, options).unwrap();
        writer.write_preamble(None).unwrap();
        writer.write_dataset(Some(&meta), tree).unwrap();
        writer.finish().unwrap();
    }
    out
}

#[rstest]
#[case(uids::EXPLICIT_VR_LITTLE_ENDIAN)]
#[case(uids::IMPLICIT_VR_LITTLE_ENDIAN)]
#[case(uids::EXPLICIT_VR_BIG_ENDIAN)]
#[case(uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN)]
fn tree_survives_a_round_trip(#[case] uid: &str) {
    let tree = sample_tree();
    let bytes = write_file(uid, &tree, EncodingOptions::default());
    assert_eq!(&bytes[128..132], b"DICM");

    let mut reader = ReadOptions::new().from_reader(&bytes[..]).unwrap();
    assert!(reader.has_file_meta());
    let read = reader.read_dataset().unwrap();
    assert_eq!(reader.transfer_syntax_uid(), uid);

    let meta = reader.file_meta().unwrap();
    assert_eq!(meta.string(tags::TRANSFER_SYNTAX_UID), Some(uid));
    assert_eq!(
        meta,
        &create_file_meta(uids::SECONDARY_CAPTURE_IMAGE_STORAGE, "2.25.12345", uid)
    );

    assert_eq!(read.is_big_endian(), uid == uids::EXPLICIT_VR_BIG_ENDIAN);
    assert_eq!(read.u16(tags::ROWS), Some(2));
    assert_eq!(read.u16(tags::COLUMNS), Some(3));
    assert_eq!(read.string(tags::PATIENT_NAME), Some("Müller^Jörg"));
    assert_eq!(read.into_endianness(false), tree);
}

#[rstest]
#[case(uids::EXPLICIT_VR_LITTLE_ENDIAN)]
#[case(uids::EXPLICIT_VR_BIG_ENDIAN)]
fn binary_numbers_read_back_as_numbers(#[case] uid: &str) {
    let mut tree = AttributeTree::new();
    tree.put(Tag(0x0018, 0x9087), VR::FD, Value::Numbers(Numbers::F64(smallvec![1000.5])));
    tree.put(Tag(0x0018, 0x9219), VR::FL, Value::Numbers(Numbers::F32(smallvec![0.25, -2.0])));
    tree.put(Tag(0x0020, 0x9057), VR::UL, Value::Numbers(Numbers::U32(smallvec![70_000])));
    tree.put(Tag(0x0020, 0x9128), VR::SL, Value::Numbers(Numbers::I32(smallvec![-70_000])));
    tree.put(Tag(0x0028, 0x0010), VR::US, Value::from_u16s([512, 1]));
    tree.put(Tag(0x0028, 0x1221), VR::SV, Value::Numbers(Numbers::I64(smallvec![-1 << 40])));
    tree.put(Tag(0x0028, 0x1222), VR::UV, Value::Numbers(Numbers::U64(smallvec![1 << 40])));
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(&mut out, uid, EncodingOptions::default()).unwrap();
        writer.write_attributes(&tree).unwrap();
        writer.finish().unwrap();
    }

    let read = ReadOptions::new()
        .from_reader_with_ts(&out[..], uid)
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(read.into_endianness(false), tree);
}

#[test]
fn definite_and_undefined_lengths_read_the_same() {
    let tree = sample_tree();
    let undefined = write_file(
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        &tree,
        EncodingOptions::default().undefined_empty_item_length(true),
    );
    let defined = write_file(
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        &tree,
        EncodingOptions::defined_lengths(),
    );
    let with_groups = write_file(
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        &tree,
        EncodingOptions::new().group_length(true),
    );
    // one sequence delimiter and two item delimiters
    assert_eq!(undefined.len(), defined.len() + 24);
    assert!(with_groups.len() > defined.len());

    for bytes in [&undefined, &defined, &with_groups] {
        let mut reader = ReadOptions::new().from_reader(&bytes[..]).unwrap();
        let read = reader.read_dataset().unwrap();
        // group lengths are dropped on read
        assert!(read.tags().all(|t| !t.is_group_length()));
        assert_eq!(read, tree);
    }
}

#[test]
fn detects_bare_implicit_little_endian() {
    let mut tree = AttributeTree::new();
    tree.put_str(tags::SOP_INSTANCE_UID, VR::UI, "2.25.99");
    tree.put_str(tags::PATIENT_ID, VR::LO, "ID-1");
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(
            &mut out,
            uids::IMPLICIT_VR_LITTLE_ENDIAN,
            EncodingOptions::default(),
        )
        .unwrap();
        writer.write_attributes(&tree).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = ReadOptions::new().from_reader(&out[..]).unwrap();
    assert_eq!(reader.preamble(), None);
    assert!(!reader.has_file_meta());
    assert!(!reader.is_explicit_vr());
    assert_eq!(reader.read_dataset().unwrap(), tree);
    assert_eq!(reader.read_file_meta().unwrap(), None);
}

#[test]
fn keeps_the_preamble() {
    let preamble: Vec<u8> = (0..128).map(|i| i as u8).collect();
    let meta = create_file_meta(
        uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
        "2.25.4",
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
    );
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(
            &mut out,
            uids::EXPLICIT_VR_LITTLE_ENDIAN,
            EncodingOptions::default(),
        )
        .unwrap();
        writer.write_preamble(Some(&preamble)).unwrap();
        writer.write_file_meta(&meta).unwrap();
        writer.finish().unwrap();
    }
    let mut reader = ReadOptions::new().from_reader(&out[..]).unwrap();
    assert_eq!(reader.preamble(), Some(&preamble[..]));
    assert_eq!(reader.read_file_meta().unwrap(), Some(&meta));
    assert!(reader.read_dataset().unwrap().is_empty());
}

#[test]
fn reads_a_data_set_with_a_given_transfer_syntax() {
    let tree = sample_tree();
    let mut out = Vec::new();
    {
        let mut writer =
            StreamWriter::from_uid(&mut out, uids::EXPLICIT_VR_BIG_ENDIAN, EncodingOptions::default())
                .unwrap();
        writer.write_attributes(&tree).unwrap();
        writer.finish().unwrap();
    }
    let mut reader = ReadOptions::new()
        .from_reader_with_ts(&out[..], uids::EXPLICIT_VR_BIG_ENDIAN)
        .unwrap();
    assert!(reader.is_big_endian());
    let read = reader.read_dataset().unwrap();
    assert_eq!(read.into_endianness(false), tree);
}

#[test]
fn odd_values_are_padded() {
    let mut tree = AttributeTree::new();
    tree.put_str(tags::PATIENT_ID, VR::LO, "ABC");
    tree.put_bytes(Tag(0x0042, 0x0011), VR::OB, vec![1, 2, 3]);
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(
            &mut out,
            uids::EXPLICIT_VR_LITTLE_ENDIAN,
            EncodingOptions::default(),
        )
        .unwrap();
        writer.write_attributes(&tree).unwrap();
        writer.finish().unwrap();
    }
    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00,
        b'A', b'B', b'C', b' ',
        0x42, 0x00, 0x11, 0x00, b'O', b'B', 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        0x01, 0x02, 0x03, 0x00,
    ];
    assert_eq!(out, expected);

    let read = ReadOptions::new()
        .from_reader(&out[..])
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(read.string(tags::PATIENT_ID), Some("ABC"));
    assert_eq!(
        read.value(Tag(0x0042, 0x0011)).and_then(Value::bytes),
        Some(&[1u8, 2, 3, 0][..])
    );
}
