use dcmio_core::{Fragment, Tag, Value, VR};
use dcmio_dictionary_std::tags;
use dcmio_parser::dataset::{ReadOptions, UnknownUndefinedLength};

/// An explicit VR little endian data set with a private UN attribute
/// of undefined length holding one item in implicit VR little endian.
#[rustfmt::skip]
const UN_SEQUENCE: &[u8] = &[
    // (0008,0060) CS "OT"
    0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
    // (0009,1010) UN, undefined length
    0x09, 0x00, 0x10, 0x10, b'U', b'N', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    // item, undefined length
    0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
    // (0010,0010) "Doe^John" in implicit VR
    0x10, 0x00, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00,
    b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
    // item delimiter
    0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
    // sequence delimiter
    0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    // (0010,0020) LO "ID1", back in explicit VR
    0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'I', b'D', b'1', b' ',
];

/// The same layout, but holding fragments.
#[rustfmt::skip]
const UN_FRAGMENTS: &[u8] = &[
    0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
    0x09, 0x00, 0x10, 0x10, b'U', b'N', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    // item of 4 bytes
    0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00,
    0x01, 0x02, 0x03, 0x04,
    0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'I', b'D', b'1', b' ',
];

const PRIVATE_TAG: Tag = Tag(0x0009, 0x1010);

#[test]
fn unknown_undefined_length_as_sequence() {
    let tree = ReadOptions::new()
        .from_reader(UN_SEQUENCE)
        .unwrap()
        .read_dataset()
        .unwrap();
    let attr = tree.get(PRIVATE_TAG).unwrap();
    assert_eq!(attr.vr, VR::SQ);
    let items = tree.items(PRIVATE_TAG).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].string(tags::PATIENT_NAME), Some("Doe^John"));
    assert_eq!(items[0].get(tags::PATIENT_NAME).map(|a| a.vr), Some(VR::PN));
    assert_eq!(tree.string(tags::PATIENT_ID), Some("ID1"));
}

#[test]
fn unknown_undefined_length_as_fragments() {
    let tree = ReadOptions::new()
        .unknown_undefined_length(UnknownUndefinedLength::Fragments)
        .from_reader(UN_FRAGMENTS)
        .unwrap()
        .read_dataset()
        .unwrap();
    let attr = tree.get(PRIVATE_TAG).unwrap();
    assert_eq!(attr.vr, VR::UN);
    assert_eq!(
        attr.value,
        Value::Fragments(vec![Fragment::Inline(vec![1, 2, 3, 4])])
    );
    assert_eq!(tree.string(tags::PATIENT_ID), Some("ID1"));
}

#[test]
fn growth_limited_reads_match() {
    let tree = ReadOptions::new()
        .allocate_limit(2)
        .from_reader(UN_SEQUENCE)
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(tree.string(tags::PATIENT_ID), Some("ID1"));
    assert_eq!(tree.items(PRIVATE_TAG).unwrap()[0].string(tags::PATIENT_NAME), Some("Doe^John"));
}
