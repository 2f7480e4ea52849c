//! The attribute tree: an ordered mapping of tags to values,
//! with nested items for sequences.

use crate::header::{Tag, VR};
use crate::util::toggle_endian;
use crate::value::{Numbers, Value, C};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// An attribute held in an [`AttributeTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// value representation
    pub vr: VR,
    /// attribute value
    pub value: Value,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(vr: VR, value: Value) -> Self {
        Attribute { vr, value }
    }
}

/// An ordered collection of attributes, kept in ascending tag order.
///
/// Values of binary VRs held as raw bytes
/// are in the byte order indicated by [`is_big_endian`](Self::is_big_endian).
#[derive(Debug, Clone, Default)]
pub struct AttributeTree {
    entries: BTreeMap<Tag, Attribute>,
    big_endian: bool,
    /// specific character set terms inherited from the enclosing tree
    inherited_charset: Option<C<String>>,
}

impl PartialEq for AttributeTree {
    fn eq(&self, other: &Self) -> bool {
        self.big_endian == other.big_endian && self.entries == other.entries
    }
}

const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);

impl AttributeTree {
    /// Create an empty tree in little endian.
    pub fn new() -> Self {
        AttributeTree::default()
    }

    /// Create an empty tree with the given byte order for raw values.
    pub fn with_big_endian(big_endian: bool) -> Self {
        AttributeTree {
            big_endian,
            ..Default::default()
        }
    }

    /// Create an empty item tree inheriting the byte order
    /// and the specific character set of this tree.
    pub fn new_item(&self) -> Self {
        AttributeTree {
            entries: BTreeMap::new(),
            big_endian: self.big_endian,
            inherited_charset: self.specific_character_set().map(|s| s.iter().cloned().collect()),
        }
    }

    /// Whether raw binary values in this tree are in big endian.
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// The number of attributes at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an attribute, replacing and returning any previous one.
    pub fn put(&mut self, tag: Tag, vr: VR, value: Value) -> Option<Attribute> {
        self.entries.insert(tag, Attribute { vr, value })
    }

    /// Insert a single string value.
    pub fn put_str(&mut self, tag: Tag, vr: VR, value: impl Into<String>) -> Option<Attribute> {
        self.put(tag, vr, Value::text(value))
    }

    /// Insert a single US value.
    pub fn put_u16(&mut self, tag: Tag, value: u16) -> Option<Attribute> {
        self.put(tag, VR::US, Value::from_u16s([value]))
    }

    /// Insert a raw byte value, in the byte order of this tree.
    pub fn put_bytes(&mut self, tag: Tag, vr: VR, value: Vec<u8>) -> Option<Attribute> {
        self.put(tag, vr, Value::Bytes(value))
    }

    /// Fetch an attribute by tag.
    pub fn get(&self, tag: Tag) -> Option<&Attribute> {
        self.entries.get(&tag)
    }

    /// Fetch an attribute by tag for modification.
    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut Attribute> {
        self.entries.get_mut(&tag)
    }

    /// Fetch the value of an attribute.
    pub fn value(&self, tag: Tag) -> Option<&Value> {
        self.entries.get(&tag).map(|a| &a.value)
    }

    /// Whether an attribute is present.
    pub fn contains(&self, tag: Tag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Remove an attribute.
    pub fn remove(&mut self, tag: Tag) -> Option<Attribute> {
        self.entries.remove(&tag)
    }

    /// Iterate over the attributes in ascending tag order.
    pub fn iter(&self) -> btree_map::Iter<'_, Tag, Attribute> {
        self.entries.iter()
    }

    /// Iterate over the tags in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.keys().copied()
    }

    /// Move all attributes of `other` into this tree,
    /// replacing any attributes with the same tag.
    pub fn extend(&mut self, other: AttributeTree) {
        self.entries.extend(other.entries);
    }

    /// Remove all attributes of the given group.
    pub fn remove_group(&mut self, group: u16) {
        self.entries.retain(|tag, _| tag.group() != group);
    }

    /// Take all attributes of the given group out of this tree.
    pub fn extract_group(&mut self, group: u16) -> AttributeTree {
        let mut out = AttributeTree::with_big_endian(self.big_endian);
        let tags: Vec<Tag> = self
            .entries
            .range(Tag(group, 0)..=Tag(group, 0xFFFF))
            .map(|(tag, _)| *tag)
            .collect();
        for tag in tags {
            if let Some(attr) = self.entries.remove(&tag) {
                out.entries.insert(tag, attr);
            }
        }
        out
    }

    /// The private creator reserving the block of the given private tag.
    pub fn private_creator_of(&self, tag: Tag) -> Option<&str> {
        let creator = tag.private_creator_tag()?;
        self.string(creator)
    }

    /// The first string of a textual attribute.
    pub fn string(&self, tag: Tag) -> Option<&str> {
        self.value(tag)
            .and_then(Value::strings)
            .and_then(|s| s.first())
            .map(String::as_str)
    }

    /// All strings of a textual attribute.
    pub fn strings(&self, tag: Tag) -> Option<&[String]> {
        self.value(tag).and_then(Value::strings)
    }

    /// The items of a sequence attribute.
    pub fn items(&self, tag: Tag) -> Option<&[AttributeTree]> {
        self.value(tag).and_then(Value::items)
    }

    /// The first value of an attribute as an integer.
    ///
    /// Binary numbers, integer strings,
    /// and raw 16/32-bit values are interpreted.
    pub fn int(&self, tag: Tag) -> Option<i64> {
        let attr = self.get(tag)?;
        match &attr.value {
            Value::Numbers(n) => n.first_int(),
            Value::Strs(s) => s.first().and_then(|s| s.trim().parse().ok()),
            Value::Bytes(b) => {
                let width = attr.vr.endian_width();
                if b.len() < width || !(width == 2 || width == 4) {
                    return None;
                }
                let mut raw = b[..width].to_vec();
                if self.big_endian {
                    raw.reverse();
                }
                let unsigned = raw
                    .iter()
                    .rev()
                    .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
                Some(match (attr.vr, width) {
                    (VR::SS, _) => i64::from(unsigned as u16 as i16),
                    (VR::SL, _) => i64::from(unsigned as u32 as i32),
                    _ => unsigned as i64,
                })
            }
            _ => None,
        }
    }

    /// The first value of an attribute as an integer, or a default.
    pub fn int_or(&self, tag: Tag, default: i64) -> i64 {
        self.int(tag).unwrap_or(default)
    }

    /// The first value of an attribute as an unsigned 16-bit integer.
    pub fn u16(&self, tag: Tag) -> Option<u16> {
        self.int(tag).and_then(|v| u16::try_from(v).ok())
    }

    /// All values of a 16-bit attribute,
    /// whether held as numbers or as raw bytes (e.g. lookup table data in OW).
    pub fn u16_values(&self, tag: Tag) -> Option<Vec<u16>> {
        match self.value(tag)? {
            Value::Numbers(Numbers::U16(v)) => Some(v.to_vec()),
            Value::Numbers(Numbers::I16(v)) => Some(v.iter().map(|&x| x as u16).collect()),
            Value::Bytes(b) => Some(
                b.chunks_exact(2)
                    .map(|c| {
                        if self.big_endian {
                            u16::from_be_bytes([c[0], c[1]])
                        } else {
                            u16::from_le_bytes([c[0], c[1]])
                        }
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The specific character set terms which apply to this tree:
    /// its own (0008,0005) value, or the one inherited from its parent.
    pub fn specific_character_set(&self) -> Option<&[String]> {
        self.strings(SPECIFIC_CHARACTER_SET)
            .or(self.inherited_charset.as_deref())
    }

    /// Record the character set inherited from the enclosing tree.
    pub fn set_inherited_character_set(&mut self, terms: Option<C<String>>) {
        self.inherited_charset = terms;
    }

    /// Convert the tree to the given byte order,
    /// swapping raw binary values (also in nested items) as needed.
    pub fn into_endianness(mut self, big_endian: bool) -> Self {
        if self.big_endian == big_endian {
            return self;
        }
        for attr in self.entries.values_mut() {
            match &mut attr.value {
                Value::Bytes(bytes) => toggle_endian(bytes, attr.vr.endian_width()),
                Value::Sequence(items) => {
                    for item in items.iter_mut() {
                        let old = std::mem::take(item);
                        *item = old.into_endianness(big_endian);
                    }
                }
                _ => {}
            }
        }
        self.big_endian = big_endian;
        self
    }
}

impl<'a> IntoIterator for &'a AttributeTree {
    type Item = (&'a Tag, &'a Attribute);
    type IntoIter = btree_map::Iter<'a, Tag, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One level of the nesting path of an attribute:
/// the sequence containing it and the item index within that sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPointer {
    /// the tag of the sequence attribute
    pub sequence_tag: Tag,
    /// the private creator of the sequence, if it is a private attribute
    pub private_creator: Option<String>,
    /// zero-based index of the item
    pub index: usize,
}

impl ItemPointer {
    /// Create an item pointer to a standard sequence.
    pub fn new(sequence_tag: Tag, index: usize) -> Self {
        ItemPointer {
            sequence_tag,
            private_creator: None,
            index,
        }
    }

    /// Create an item pointer to a private sequence.
    pub fn private(sequence_tag: Tag, private_creator: impl Into<String>, index: usize) -> Self {
        ItemPointer {
            sequence_tag,
            private_creator: Some(private_creator.into()),
            index,
        }
    }
}

/// The stack of item pointers leading to an attribute.
/// An empty path designates the root level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributePath(Vec<ItemPointer>);

impl AttributePath {
    /// The root path.
    pub fn root() -> Self {
        AttributePath(Vec::new())
    }

    /// Descend into an item.
    pub fn push(&mut self, pointer: ItemPointer) {
        self.0.push(pointer);
    }

    /// Leave the innermost item.
    pub fn pop(&mut self) -> Option<ItemPointer> {
        self.0.pop()
    }

    /// The nesting depth (0 at the root).
    pub fn level(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The item pointers, outermost first.
    pub fn pointers(&self) -> &[ItemPointer] {
        &self.0
    }

    /// The innermost item pointer.
    pub fn last(&self) -> Option<&ItemPointer> {
        self.0.last()
    }

    /// Format the full path of an attribute in this path,
    /// as in `/SSSSSSSS/idx/TTTTTTTT`.
    pub fn to_string_with(&self, tag: Tag) -> String {
        format!("{}/{:08X}", self, tag.to_u32())
    }
}

impl From<Vec<ItemPointer>> for AttributePath {
    fn from(pointers: Vec<ItemPointer>) -> Self {
        AttributePath(pointers)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for p in &self.0 {
            write!(f, "/{:08X}/{}", p.sequence_tag.to_u32(), p.index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_tag() {
        let mut tree = AttributeTree::new();
        tree.put_u16(Tag(0x0028, 0x0010), 4);
        tree.put_str(Tag(0x0008, 0x0060), VR::CS, "OT");
        tree.put_str(Tag(0x0010, 0x0010), VR::PN, "Doe^John");
        let tags: Vec<_> = tree.tags().collect();
        assert_eq!(
            tags,
            vec![Tag(0x0008, 0x0060), Tag(0x0010, 0x0010), Tag(0x0028, 0x0010)]
        );
    }

    #[test]
    fn typed_getters() {
        let mut tree = AttributeTree::new();
        tree.put_u16(Tag(0x0028, 0x0100), 16);
        tree.put_str(Tag(0x0028, 0x0008), VR::IS, "2 ");
        tree.put_bytes(Tag(0x0028, 0x0103), VR::US, vec![0x01, 0x00]);
        assert_eq!(tree.u16(Tag(0x0028, 0x0100)), Some(16));
        assert_eq!(tree.int(Tag(0x0028, 0x0008)), Some(2));
        assert_eq!(tree.int(Tag(0x0028, 0x0103)), Some(1));
        assert_eq!(tree.int_or(Tag(0x0028, 0x0006), 0), 0);

        let mut be = AttributeTree::with_big_endian(true);
        be.put_bytes(Tag(0x0028, 0x1201), VR::OW, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(be.u16_values(Tag(0x0028, 0x1201)), Some(vec![0x0102, 0x0304]));
    }

    #[test]
    fn private_creator_lookup() {
        let mut tree = AttributeTree::new();
        tree.put_str(Tag(0x0009, 0x0010), VR::LO, "ACME 1.0");
        tree.put_str(Tag(0x0009, 0x1001), VR::LO, "payload");
        assert_eq!(tree.private_creator_of(Tag(0x0009, 0x1001)), Some("ACME 1.0"));
        assert_eq!(tree.private_creator_of(Tag(0x0009, 0x1101)), None);
        assert_eq!(tree.private_creator_of(Tag(0x0008, 0x1001)), None);
    }

    #[test]
    fn group_extraction() {
        let mut tree = AttributeTree::new();
        tree.put_str(Tag(0x0002, 0x0010), VR::UI, "1.2.840.10008.1.2");
        tree.put_str(Tag(0x0008, 0x0060), VR::CS, "OT");
        let meta = tree.extract_group(0x0002);
        assert_eq!(meta.len(), 1);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(Tag(0x0002, 0x0010)));
    }

    #[test]
    fn items_inherit_character_set() {
        let mut tree = AttributeTree::new();
        tree.put_str(Tag(0x0008, 0x0005), VR::CS, "ISO_IR 100");
        let item = tree.new_item();
        assert_eq!(item.specific_character_set(), Some(&["ISO_IR 100".to_string()][..]));
        assert_eq!(item, AttributeTree::new());
    }

    #[test]
    fn endianness_conversion_swaps_words() {
        let mut tree = AttributeTree::new();
        tree.put_bytes(Tag(0x7FE0, 0x0010), VR::OW, vec![1, 2, 3, 4]);
        tree.put_bytes(Tag(0x0042, 0x0011), VR::OB, vec![1, 2, 3, 4]);
        let mut item = tree.new_item();
        item.put_bytes(Tag(0x0018, 0x9219), VR::FL, vec![1, 2, 3, 4]);
        tree.put(Tag(0x0040, 0xA730), VR::SQ, Value::Sequence(vec![item]));

        let be = tree.clone().into_endianness(true);
        assert!(be.is_big_endian());
        assert_eq!(be.value(Tag(0x7FE0, 0x0010)).and_then(Value::bytes), Some(&[2, 1, 4, 3][..]));
        assert_eq!(be.value(Tag(0x0042, 0x0011)).and_then(Value::bytes), Some(&[1, 2, 3, 4][..]));
        let nested = &be.items(Tag(0x0040, 0xA730)).unwrap()[0];
        assert_eq!(nested.value(Tag(0x0018, 0x9219)).and_then(Value::bytes), Some(&[4, 3, 2, 1][..]));

        assert_eq!(be.into_endianness(false), tree);
    }

    #[test]
    fn path_display() {
        let mut path = AttributePath::root();
        assert!(path.is_root());
        path.push(ItemPointer::new(Tag(0x5400, 0x0100), 0));
        assert_eq!(path.level(), 1);
        assert_eq!(path.to_string(), "/54000100/0");
        assert_eq!(path.to_string_with(Tag(0x5400, 0x1010)), "/54000100/0/54001010");
    }
}
