//! Basic types for interpreting the header of an attribute:
//! the attribute tag, the value representation, and the value length.

use snafu::{Backtrace, Snafu};
use std::cmp::Ordering;
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Error type for issues constructing a sequence item header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SequenceItemHeaderError {
    /// Unexpected header tag.
    /// Only Item (0xFFFE, 0xE000),
    /// Item Delimiter (0xFFFE, 0xE00D),
    /// or Sequence Delimiter (0xFFFE, 0xE0DD)
    /// are admitted.
    #[snafu(display("Unexpected tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Unexpected delimiter value length.
    /// Must be zero for item delimiters.
    #[snafu(display("Unexpected delimiter length {}", len))]
    UnexpectedDelimiterLength { len: Length, backtrace: Backtrace },
}

type Result<T, E = SequenceItemHeaderError> = std::result::Result<T, E>;

/// Trait for any attribute header or item which may have a length.
pub trait HasLength {
    /// Retrieve the value data's length as specified by the header, in bytes.
    ///
    /// According to the standard, the concrete value size may be undefined,
    /// which can be the case for sequence elements and encapsulated pixel data.
    fn length(&self) -> Length;

    /// Check whether the value is empty (0 length).
    fn is_empty(&self) -> bool {
        self.length() == Length(0)
    }
}

/// A trait for a data type containing an attribute header.
pub trait Header: HasLength {
    /// Retrieve the attribute's tag.
    fn tag(&self) -> Tag;

    /// Check whether this is the header of an item.
    fn is_item(&self) -> bool {
        self.tag() == Tag::ITEM
    }

    /// Check whether this is the header of an item delimiter.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag::ITEM_DELIMITER
    }

    /// Check whether this is the header of a sequence delimiter.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag::SEQUENCE_DELIMITER
    }

    /// Check whether this is the header of encapsulated pixel data.
    fn is_encapsulated_pixeldata(&self) -> bool {
        self.tag() == Tag(0x7FE0, 0x0010) && self.length().is_undefined()
    }
}

/// An attribute header: tag, value representation and specified length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DataElementHeader {
    /// attribute tag
    pub tag: Tag,
    /// value representation
    pub vr: VR,
    /// value length
    pub len: Length,
}

impl HasLength for DataElementHeader {
    #[inline]
    fn length(&self) -> Length {
        self.len
    }
}

impl Header for DataElementHeader {
    #[inline]
    fn tag(&self) -> Tag {
        self.tag
    }
}

impl DataElementHeader {
    /// Create a new attribute header with the given properties.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            len,
        }
    }

    /// Retrieve the attribute's value representation, which can be unknown.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Check whether the header suggests a nested value:
    /// the value representation is SQ or the length is undefined.
    #[inline]
    pub fn is_non_primitive(&self) -> bool {
        self.vr == VR::SQ || self.len.is_undefined()
    }
}

impl From<SequenceItemHeader> for DataElementHeader {
    fn from(value: SequenceItemHeader) -> DataElementHeader {
        DataElementHeader {
            tag: value.tag(),
            vr: VR::UN,
            len: value.length(),
        }
    }
}

/// Header of an item, an item delimiter, or a sequence delimiter.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SequenceItemHeader {
    /// The cursor contains an item.
    Item {
        /// the length of the item in bytes (can be undefined)
        len: Length,
    },
    /// The cursor read an item delimiter.
    ItemDelimiter,
    /// The cursor read a sequence delimiter.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Create a sequence item header using the raw header properties.
    /// Fails if the tag is not one of the three item-level tags,
    /// or if an item delimiter declares a non-zero length.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<SequenceItemHeader> {
        match tag.into() {
            Tag::ITEM => Ok(SequenceItemHeader::Item { len }),
            Tag::ITEM_DELIMITER => {
                snafu::ensure!(len == Length(0), UnexpectedDelimiterLengthSnafu { len });
                Ok(SequenceItemHeader::ItemDelimiter)
            }
            Tag::SEQUENCE_DELIMITER => Ok(SequenceItemHeader::SequenceDelimiter),
            tag => UnexpectedTagSnafu { tag }.fail(),
        }
    }
}

impl HasLength for SequenceItemHeader {
    #[inline]
    fn length(&self) -> Length {
        match *self {
            SequenceItemHeader::Item { len } => len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => Length(0),
        }
    }
}

impl Header for SequenceItemHeader {
    #[inline]
    fn tag(&self) -> Tag {
        match *self {
            SequenceItemHeader::Item { .. } => Tag::ITEM,
            SequenceItemHeader::ItemDelimiter => Tag::ITEM_DELIMITER,
            SequenceItemHeader::SequenceDelimiter => Tag::SEQUENCE_DELIMITER,
        }
    }
}

/// An enum type for a value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

/// The broad family of a value representation,
/// which determines how its value is held in memory.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum VrFamily {
    /// character strings
    Text,
    /// fixed-size binary numbers (or attribute tags)
    Numeric,
    /// opaque byte sequences
    Binary,
    /// nested items
    Sequence,
}

/// How padding and insignificant characters are stripped
/// from a decoded string value.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum Trim {
    /// strip spaces and null characters on both ends of each value
    Both,
    /// strip spaces and null characters at the end only
    Trailing,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Whether explicit VR headers of this VR use the 8 byte form,
    /// with a 16-bit length field (PS3.5 7.1.2).
    /// All other VRs use 2 reserved bytes and a 32-bit length.
    pub fn has_short_length(self) -> bool {
        use VR::*;
        matches!(
            self,
            AE | AS | AT | CS | DA | DS | DT | FL | FD | IS | LO | LT | PN | SH | SL | SS | ST | TM
                | UI | UL | US
        )
    }

    /// Size of the explicit VR header in bytes.
    pub fn explicit_header_len(self) -> u32 {
        if self.has_short_length() {
            8
        } else {
            12
        }
    }

    /// The byte used to pad a value of odd length.
    pub fn padding(self) -> u8 {
        match self {
            VR::UI => 0,
            vr if vr.family() == VrFamily::Text => b' ',
            _ => 0,
        }
    }

    /// The number of bytes which need to be reversed
    /// when moving a value of this VR to the other byte order,
    /// or 0 if the value is insensitive to byte order.
    pub fn endian_width(self) -> usize {
        use VR::*;
        match self {
            AT | OW | SS | US => 2,
            FL | OF | OL | SL | UL => 4,
            FD | OD | OV | SV | UV => 8,
            _ => 0,
        }
    }

    /// The memory family of values of this VR.
    pub fn family(self) -> VrFamily {
        use VR::*;
        match self {
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT => {
                VrFamily::Text
            }
            AT | FL | FD | SL | SS | SV | UL | US | UV => VrFamily::Numeric,
            OB | OD | OF | OL | OV | OW | UN => VrFamily::Binary,
            SQ => VrFamily::Sequence,
        }
    }

    /// Whether a text value of this VR may hold multiple values
    /// separated by backslashes.
    pub fn is_multi_valued_text(self) -> bool {
        use VR::*;
        matches!(
            self,
            AE | AS | CS | DA | DS | DT | IS | LO | PN | SH | TM | UC | UI
        )
    }

    /// How decoded text values of this VR are trimmed.
    pub fn trim(self) -> Trim {
        use VR::*;
        match self {
            LT | ST | UT | UR => Trim::Trailing,
            _ => Trim::Both,
        }
    }

    /// Whether text values of this VR are subject to
    /// the specific character set, as opposed to the default repertoire.
    pub fn uses_specific_character_set(self) -> bool {
        use VR::*;
        matches!(self, LO | LT | PN | SH | ST | UC | UT)
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two alphabetic characters in upper case.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for attribute tags: a (group, element) pair.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Item (FFFE,E000)
    pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
    /// Item Delimitation Item (FFFE,E00D)
    pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
    /// Sequence Delimitation Item (FFFE,E0DD)
    pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);

    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// The tag as a single 32-bit number, group first.
    #[inline]
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | u32::from(self.1)
    }

    /// Build a tag from its 32-bit form.
    #[inline]
    pub fn from_u32(tag: u32) -> Self {
        Tag((tag >> 16) as u16, tag as u16)
    }

    /// Whether the tag belongs to a private (odd) group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether the tag identifies a private creator element,
    /// which reserves a block of elements in its group.
    #[inline]
    pub fn is_private_creator(self) -> bool {
        self.is_private() && (0x0010..=0x00FF).contains(&self.1)
    }

    /// The tag of the private creator element reserving this private tag,
    /// if this is a private data element.
    pub fn private_creator_tag(self) -> Option<Tag> {
        if self.is_private() && self.1 >= 0x1000 {
            Some(Tag(self.0, self.1 >> 8))
        } else {
            None
        }
    }

    /// Whether this is a group length tag (gggg,0000).
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0
    }

    /// Whether this tag belongs to the file meta information group.
    #[inline]
    pub fn is_file_meta(self) -> bool {
        self.0 == 0x0002
    }

    /// Whether this is one of the item-level tags in group FFFE.
    #[inline]
    pub fn is_item_level(self) -> bool {
        self.0 == 0xFFFE
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// A type for representing content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined length,
/// which has to be determined by reading up to a delimiter.
///
/// Two undefined lengths are not equal,
/// and comparing against an undefined length is always `false`.
///
/// ```
/// # use dcmio_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!(Length(16) < Length(64));
/// assert!(!(Length::UNDEFINED > Length(64)));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Check whether this length is undefined.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined.
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value,
    /// or `None` if it is undefined.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }

    /// Check whether the length is equally specified as another length.
    /// Unlike `PartialEq`, two undefined lengths are equivalent here.
    #[inline]
    pub fn inner_eq(self, other: Length) -> bool {
        self.0 == other.0
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
        assert_eq!(t.to_u32(), 0x0010_0020);
        assert_eq!(Tag::from_u32(0x7FE0_0010), Tag(0x7FE0, 0x0010));
    }

    #[test]
    fn tag_display() {
        assert_eq!(Tag(0x0028, 0x0010).to_string(), "(0028,0010)");
    }

    #[test]
    fn private_tags() {
        let creator = Tag(0x0009, 0x0010);
        assert!(creator.is_private_creator());
        assert_eq!(creator.private_creator_tag(), None);

        let data = Tag(0x0009, 0x1002);
        assert!(data.is_private());
        assert!(!data.is_private_creator());
        assert_eq!(data.private_creator_tag(), Some(creator));

        assert!(!Tag(0x0010, 0x0010).is_private());
    }

    #[test]
    fn vr_header_form() {
        assert!(VR::US.has_short_length());
        assert!(VR::UI.has_short_length());
        assert!(!VR::OB.has_short_length());
        assert!(!VR::UT.has_short_length());
        assert!(!VR::SQ.has_short_length());
        assert_eq!(VR::LO.explicit_header_len(), 8);
        assert_eq!(VR::UN.explicit_header_len(), 12);
    }

    #[test]
    fn vr_padding_and_toggle() {
        assert_eq!(VR::UI.padding(), 0);
        assert_eq!(VR::LO.padding(), b' ');
        assert_eq!(VR::OB.padding(), 0);
        assert_eq!(VR::OW.endian_width(), 2);
        assert_eq!(VR::FD.endian_width(), 8);
        assert_eq!(VR::OB.endian_width(), 0);
        assert_eq!(VR::LO.endian_width(), 0);
    }

    #[test]
    fn vr_binary_round() {
        for vr in [VR::AE, VR::OW, VR::SQ, VR::UV] {
            assert_eq!(VR::from_binary(vr.to_bytes()), Some(vr));
        }
        assert_eq!(VR::from_binary(*b"ZZ"), None);
        assert_eq!(VR::from_binary([0x00, 0x10]), None);
    }

    #[test]
    fn item_headers() {
        assert_eq!(
            SequenceItemHeader::new(Tag::ITEM, Length(8)).unwrap(),
            SequenceItemHeader::Item { len: Length(8) }
        );
        assert!(SequenceItemHeader::new(Tag::ITEM_DELIMITER, Length(4)).is_err());
        assert!(SequenceItemHeader::new(Tag(0x0008, 0x0016), Length(4)).is_err());
    }
}
