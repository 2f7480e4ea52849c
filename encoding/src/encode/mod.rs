//! This module contains all attribute header encoding logic.
//!
//! Values are encoded by the caller,
//! which knows their representation and the byte order of the output.

use byteordered::Endianness;
use dcmio_core::header::DataElementHeader;
use dcmio_core::value::Numbers;
use dcmio_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Write};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while encoding headers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to write attribute tag: {}", source))]
    WriteTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write attribute header: {}", source))]
    WriteHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item header: {}", source))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item delimiter: {}", source))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write sequence delimiter: {}", source))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Type trait for an encoder of basic data properties.
/// Unlike `Encode` (and similar to `BasicDecode`), this trait is not object
/// safe because it's better to just provide a dynamic implementation.
pub trait BasicEncode {
    /// Retrieve the encoder's endianness.
    fn endianness(&self) -> Endianness;

    /// Encode an unsigned short value to the given writer.
    fn encode_us<W>(&self, to: W, value: u16) -> io::Result<()>
    where
        W: Write;

    /// Encode an unsigned long value to the given writer.
    fn encode_ul<W>(&self, to: W, value: u32) -> io::Result<()>
    where
        W: Write;

    /// Encode an unsigned very long value to the given writer.
    fn encode_uv<W>(&self, to: W, value: u64) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed short value to the given writer.
    fn encode_ss<W>(&self, to: W, value: i16) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed long value to the given writer.
    fn encode_sl<W>(&self, to: W, value: i32) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed very long value to the given writer.
    fn encode_sv<W>(&self, to: W, value: i64) -> io::Result<()>
    where
        W: Write;

    /// Encode a single precision float value to the given writer.
    fn encode_fl<W>(&self, to: W, value: f32) -> io::Result<()>
    where
        W: Write;

    /// Encode a double precision float value to the given writer.
    fn encode_fd<W>(&self, to: W, value: f64) -> io::Result<()>
    where
        W: Write;

    /// Encode a sequence of binary numbers to the given writer.
    /// Returns the number of bytes written.
    fn encode_numbers<W>(&self, mut to: W, value: &Numbers) -> io::Result<usize>
    where
        W: Write,
    {
        match value {
            Numbers::U16(values) => {
                for v in values {
                    self.encode_us(&mut to, *v)?;
                }
            }
            Numbers::I16(values) => {
                for v in values {
                    self.encode_ss(&mut to, *v)?;
                }
            }
            Numbers::U32(values) => {
                for v in values {
                    self.encode_ul(&mut to, *v)?;
                }
            }
            Numbers::I32(values) => {
                for v in values {
                    self.encode_sl(&mut to, *v)?;
                }
            }
            Numbers::U64(values) => {
                for v in values {
                    self.encode_uv(&mut to, *v)?;
                }
            }
            Numbers::I64(values) => {
                for v in values {
                    self.encode_sv(&mut to, *v)?;
                }
            }
            Numbers::F32(values) => {
                for v in values {
                    self.encode_fl(&mut to, *v)?;
                }
            }
            Numbers::F64(values) => {
                for v in values {
                    self.encode_fd(&mut to, *v)?;
                }
            }
            Numbers::Tags(tags) => {
                for tag in tags {
                    self.encode_us(&mut to, tag.0)?;
                    self.encode_us(&mut to, tag.1)?;
                }
            }
        }
        Ok(value.byte_len())
    }
}

/// Type trait for an attribute header encoder.
pub trait Encode {
    /// Encode and write an attribute tag.
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write;

    /// Encode and write an attribute header to the given destination.
    /// Returns the number of bytes effectively written on success.
    ///
    /// The header form (short or long length field) follows the VR
    /// of the header as given.
    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write;

    /// Encode and write a sequence item header to the given destination.
    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write;

    /// Encode and write a sequence item delimiter to the given destination.
    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write;

    /// Encode and write a sequence delimiter to the given destination.
    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write;
}

impl<T: ?Sized> Encode for &T
where
    T: Encode,
{
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_tag(to, tag)
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        (**self).encode_element_header(to, de)
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_header(to, len)
    }

    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_delimiter(to)
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_sequence_delimiter(to)
    }
}

/// An attribute header encoder for any of the supported
/// combinations of VR explicitness and byte order,
/// decided at run-time.
#[derive(Debug, Clone)]
pub enum HeaderEncoder {
    /// Explicit VR Little Endian
    ExplicitLE(explicit_le::ExplicitVRLittleEndianEncoder),
    /// Explicit VR Big Endian
    ExplicitBE(explicit_be::ExplicitVRBigEndianEncoder),
    /// Implicit VR Little Endian
    ImplicitLE(implicit_le::ImplicitVRLittleEndianEncoder),
}

impl HeaderEncoder {
    /// Obtain the encoder for the given encoding,
    /// or `None` if the combination is not supported
    /// (implicit VR big endian).
    pub fn new(explicit_vr: bool, byte_order: Endianness) -> Option<Self> {
        match (explicit_vr, byte_order) {
            (true, Endianness::Little) => Some(HeaderEncoder::ExplicitLE(Default::default())),
            (true, Endianness::Big) => Some(HeaderEncoder::ExplicitBE(Default::default())),
            (false, Endianness::Little) => Some(HeaderEncoder::ImplicitLE(Default::default())),
            (false, Endianness::Big) => None,
        }
    }

    /// Whether value representations are written to the output.
    pub fn is_explicit_vr(&self) -> bool {
        !matches!(self, HeaderEncoder::ImplicitLE(_))
    }

    /// The byte order of the output.
    pub fn endianness(&self) -> Endianness {
        match self {
            HeaderEncoder::ExplicitBE(_) => Endianness::Big,
            _ => Endianness::Little,
        }
    }
}

macro_rules! for_each_encoder {
    ($s: expr, |$e: ident| $f: expr) => {
        match $s {
            HeaderEncoder::ExplicitLE($e) => $f,
            HeaderEncoder::ExplicitBE($e) => $f,
            HeaderEncoder::ImplicitLE($e) => $f,
        }
    };
}

impl Encode for HeaderEncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_tag(to, tag))
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_element_header(to, de))
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_item_header(to, len))
    }

    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_item_delimiter(to))
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_sequence_delimiter(to))
    }
}

#[cfg(test)]
mod tests {
    use super::basic::BasicEncoder;
    use super::{BasicEncode, HeaderEncoder};
    use byteordered::Endianness;
    use dcmio_core::value::Numbers;
    use dcmio_core::{smallvec::smallvec, Tag};

    #[test]
    fn header_encoder_kinds() {
        assert!(HeaderEncoder::new(false, Endianness::Big).is_none());
        let enc = HeaderEncoder::new(true, Endianness::Big).unwrap();
        assert!(enc.is_explicit_vr());
        assert_eq!(enc.endianness(), Endianness::Big);
        let enc = HeaderEncoder::new(false, Endianness::Little).unwrap();
        assert!(!enc.is_explicit_vr());
    }

    #[test]
    fn encode_numbers_in_both_orders() {
        let values = Numbers::U16(smallvec![0x0102, 0x0304]);
        let mut out = Vec::new();
        let n = BasicEncoder::from(Endianness::Big)
            .encode_numbers(&mut out, &values)
            .unwrap();
        assert_eq!(n, 4);
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04]);

        let tags = Numbers::Tags(smallvec![Tag(0x0028, 0x2110)]);
        let mut out = Vec::new();
        BasicEncoder::from(Endianness::Little)
            .encode_numbers(&mut out, &tags)
            .unwrap();
        assert_eq!(out, vec![0x28, 0x00, 0x10, 0x21]);
    }
}
