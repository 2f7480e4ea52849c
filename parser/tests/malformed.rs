//! Recovery from misplaced attributes and delimiters.
use dcmio_dictionary_std::tags;
use dcmio_parser::dataset::ReadOptions;

/// An explicit VR little endian data set
/// with an item delimiter between two attributes.
#[rustfmt::skip]
const STRAY_ITEM_DELIMITER: &[u8] = &[
    // (0008,0060) CS "OT"
    0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
    // item delimiter
    0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
    // (0010,0020) LO "ID1"
    0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'I', b'D', b'1', b' ',
];

/// An explicit VR little endian data set with a sequence
/// holding a plain attribute between its two items.
#[rustfmt::skip]
const ATTRIBUTE_BETWEEN_ITEMS: &[u8] = &[
    // (0008,0060) CS "OT"
    0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
    // (0008,1140) SQ, undefined length
    0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    // item, undefined length
    0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
    // (0008,1150) UI "1.2"
    0x08, 0x00, 0x50, 0x11, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', 0x00,
    // item delimiter
    0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
    // (0008,0060) CS "MR", where an item should be
    0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R',
    // item of 12 bytes
    0xFE, 0xFF, 0x00, 0xE0, 0x0C, 0x00, 0x00, 0x00,
    // (0008,1155) UI "2.25"
    0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x04, 0x00, b'2', b'.', b'2', b'5',
    // sequence delimiter
    0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    // (0010,0020) LO "ID1"
    0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'I', b'D', b'1', b' ',
];

#[test]
fn item_delimiter_in_data_set_is_skipped() {
    let tree = ReadOptions::new()
        .from_reader(STRAY_ITEM_DELIMITER)
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.string(tags::MODALITY), Some("OT"));
    assert_eq!(tree.string(tags::PATIENT_ID), Some("ID1"));
}

#[test]
fn attribute_between_items_is_skipped() {
    let tree = ReadOptions::new()
        .from_reader(ATTRIBUTE_BETWEEN_ITEMS)
        .unwrap()
        .read_dataset()
        .unwrap();
    let items = tree.items(tags::REFERENCED_IMAGE_SEQUENCE).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].string(tags::REFERENCED_SOP_CLASS_UID), Some("1.2"));
    assert_eq!(items[1].string(tags::REFERENCED_SOP_INSTANCE_UID), Some("2.25"));
    assert_eq!(tree.string(tags::MODALITY), Some("OT"));
    assert_eq!(tree.string(tags::PATIENT_ID), Some("ID1"));
    assert_eq!(tree.len(), 3);
}
