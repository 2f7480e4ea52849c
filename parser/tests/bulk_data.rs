use dcmio_core::{AttributeTree, BulkData, Value, VR};
use dcmio_dictionary_std::{tags, uids};
use dcmio_parser::dataset::{
    BulkDataDescriptor, EncodingOptions, IncludeBulkData, ReadOptions, StreamWriter,
};
use dcmio_parser::meta::create_file_meta;
use std::fs::File;

fn payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed)).collect()
}

fn tree_with_payloads() -> AttributeTree {
    let mut tree = AttributeTree::new();
    tree.put_str(tags::SOP_INSTANCE_UID, VR::UI, "2.25.77");
    tree.put_bytes(tags::ENCAPSULATED_DOCUMENT, VR::OB, payload(64, 1));
    tree.put_bytes(tags::PIXEL_DATA, VR::OB, payload(66, 2));
    tree
}

fn encode(uid: &str, tree: &AttributeTree) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::from_uid(&mut out, uid, EncodingOptions::default()).unwrap();
        writer.write_attributes(tree).unwrap();
        writer.finish().unwrap();
    }
    out
}

fn bulk_data(tree: &AttributeTree, tag: dcmio_core::Tag) -> &BulkData {
    match tree.value(tag) {
        Some(Value::BulkData(bulk)) => bulk,
        other => panic!("expected bulk data, got {:?}", other),
    }
}

#[test]
fn threshold_is_exclusive() {
    let bytes = encode(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree_with_payloads());
    let dir = tempfile::tempdir().unwrap();
    let mut reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::Uri)
        .bulk_data_descriptor(BulkDataDescriptor::never().with_threshold(VR::OB, 64))
        .bulk_data_directory(dir.path())
        .from_reader(&bytes[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();

    // exactly at the threshold: inline
    assert_eq!(
        tree.value(tags::ENCAPSULATED_DOCUMENT).and_then(Value::bytes),
        Some(&payload(64, 1)[..])
    );
    // above: by reference
    let bulk = bulk_data(&tree, tags::PIXEL_DATA);
    assert_eq!(bulk.length, 66);
    assert_eq!(reader.bulk_data_files().len(), 1);
}

#[test]
fn excluded_bulk_data_is_left_out() {
    let bytes = encode(uids::IMPLICIT_VR_LITTLE_ENDIAN, &tree_with_payloads());
    let mut reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::No)
        .from_reader(&bytes[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.string(tags::SOP_INSTANCE_UID), Some("2.25.77"));
    assert!(reader.bulk_data_files().is_empty());
}

#[test]
fn spooled_bulk_data_is_concatenated() {
    let bytes = encode(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree_with_payloads());
    let dir = tempfile::tempdir().unwrap();
    let mut reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::Uri)
        .bulk_data_directory(dir.path())
        .bulk_data_suffix(".blk")
        .from_reader(&bytes[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();
    assert_eq!(reader.bulk_data_files().len(), 1);
    let path = &reader.bulk_data_files()[0];
    assert!(path.starts_with(dir.path()));
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("blk"));

    let document = bulk_data(&tree, tags::ENCAPSULATED_DOCUMENT);
    let pixels = bulk_data(&tree, tags::PIXEL_DATA);
    assert_eq!(document.offset, 0);
    assert_eq!(pixels.offset, 64);
    assert_eq!(pixels.file_path().as_ref(), Some(path));
    assert_eq!(pixels.read_from(File::open(path).unwrap()).unwrap(), payload(66, 2));
}

#[test]
fn spooled_bulk_data_in_separate_files() {
    let bytes = encode(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree_with_payloads());
    let dir = tempfile::tempdir().unwrap();
    let mut reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::Uri)
        .concatenate_bulk_data_files(false)
        .bulk_data_directory(dir.path())
        .from_reader(&bytes[..])
        .unwrap();
    let tree = reader.read_dataset().unwrap();
    assert_eq!(reader.bulk_data_files().len(), 2);
    assert_eq!(bulk_data(&tree, tags::PIXEL_DATA).offset, 0);
}

#[test]
fn bulk_data_refers_to_the_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.dcm");
    let original = tree_with_payloads();
    let meta = create_file_meta(
        uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
        "2.25.77",
        uids::EXPLICIT_VR_BIG_ENDIAN,
    );
    {
        let mut writer = StreamWriter::create_file(
            &path,
            uids::EXPLICIT_VR_BIG_ENDIAN,
            EncodingOptions::default(),
        )
        .unwrap();
        writer.write_dataset(Some(&meta), &original).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = ReadOptions::new()
        .include_bulk_data(IncludeBulkData::Uri)
        .open_file(&path)
        .unwrap();
    let tree = reader.read_dataset().unwrap();
    assert!(reader.bulk_data_files().is_empty());
    let pixels = bulk_data(&tree, tags::PIXEL_DATA);
    assert_eq!(pixels.file_path(), Some(path.canonicalize().unwrap()));
    assert!(pixels.big_endian);
    assert_eq!(
        pixels.read_from(File::open(&path).unwrap()).unwrap(),
        payload(66, 2)
    );

    // writing the tree materializes the referenced values
    let copy = encode(uids::EXPLICIT_VR_LITTLE_ENDIAN, &tree);
    let read = ReadOptions::new()
        .from_reader(&copy[..])
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(read, original);
}
