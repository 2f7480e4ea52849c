//! This module contains all attribute header decoding logic.

use self::explicit_be::ExplicitVRBigEndianDecoder;
use self::explicit_le::ExplicitVRLittleEndianDecoder;
use self::implicit_le::ImplicitVRLittleEndianDecoder;
use byteordered::Endianness;
use dcmio_core::dictionary::DataDictionary;
use dcmio_core::header::{DataElementHeader, SequenceItemHeader};
use dcmio_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while decoding headers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header: {}", source))]
    ReadHeaderTag {
        backtrace: Option<Backtrace>,
        source: io::Error,
    },
    #[snafu(display("Failed to read the item header: {}", source))]
    ReadItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's item length field: {}", source))]
    ReadItemLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's tag field: {}", source))]
    ReadTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes: {}", source))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field: {}", source))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's value representation: {}", source))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Bad sequence item header: {}", source))]
    BadSequenceHeader {
        source: dcmio_core::header::SequenceItemHeaderError,
    },
}

impl Error {
    /// Whether the error is an end of stream
    /// found before the first byte of a header.
    pub fn is_clean_eof(&self) -> bool {
        matches!(self, Error::ReadHeaderTag { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/** Type trait for reading and decoding basic data values from a data source.
 *
 * This trait aims to provide methods for reading binary numbers based on the
 * source's endianness. Unlike `Decode`, this trait is not object safe.
 * However, it doesn't have to because there are, and only will be, two
 * possible implementations (`LittleEndianBasicDecoder` and
 * `BigEndianBasicDecoder`).
 */
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S: Read>(&self, source: S) -> io::Result<u16>;

    /// Decode a sequence of unsigned shorts value from the given source
    /// into the given destination.
    fn decode_us_into<S: Read>(&self, source: S, dst: &mut [u16]) -> io::Result<()>;

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S: Read>(&self, source: S) -> io::Result<u32>;

    /// Decode a sequence of unsigned long values from the given source.
    fn decode_ul_into<S: Read>(&self, source: S, dst: &mut [u32]) -> io::Result<()>;

    /// Decode a sequence of unsigned very long values from the given source.
    fn decode_uv_into<S: Read>(&self, source: S, dst: &mut [u64]) -> io::Result<()>;

    /// Decode a sequence of signed short values from the given source.
    fn decode_ss_into<S: Read>(&self, source: S, dst: &mut [i16]) -> io::Result<()>;

    /// Decode a sequence of signed long values from the given source.
    fn decode_sl_into<S: Read>(&self, source: S, dst: &mut [i32]) -> io::Result<()>;

    /// Decode a sequence of signed very long values from the given source.
    fn decode_sv_into<S: Read>(&self, source: S, dst: &mut [i64]) -> io::Result<()>;

    /// Decode a sequence of single precision floats from the given source.
    fn decode_fl_into<S: Read>(&self, source: S, dst: &mut [f32]) -> io::Result<()>;

    /// Decode a sequence of double precision floats from the given source.
    fn decode_fd_into<S: Read>(&self, source: S, dst: &mut [f64]) -> io::Result<()>;

    /// Decode an attribute tag from the given source.
    fn decode_tag<S>(&self, mut source: S) -> io::Result<Tag>
    where
        S: Read,
    {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(source)?;
        Ok(Tag(g, e))
    }
}

/** Type trait for reading and decoding attribute headers.
 *
 * The specific behaviour of decoding, even when abstracted from the original
 * source, may depend on the transfer syntax.
 */
pub trait Decode {
    /** Fetch and decode the next attribute header from the given source.
     * This method returns only the header of the element. At the end of this
     * operation, the source will be pointing at the element's value data,
     * which should be read or skipped as necessary.
     *
     * Item, item delimiter and sequence delimiter headers are returned
     * with the VR `UN`.
     *
     * Returns the header and the exact number of bytes read.
     */
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /** Fetch and decode the next sequence item head from the given source. It is
     * a separate method because value representation is always implicit when
     * reading item headers and delimiters.
     * This method returns only the header of the item. At the end of this
     * operation, the source will be pointing at the beginning of the item's
     * data, which should be traversed if necessary.
     */
    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read;

    /// Decode an attribute tag value.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

impl<T: ?Sized> Decode for &T
where
    T: Decode,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        (**self).decode_header(source)
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        (**self).decode_item_header(source)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        (**self).decode_tag(source)
    }
}

/// An attribute header decoder for any of the supported
/// combinations of VR explicitness and byte order,
/// decided at run-time.
///
/// The dictionary `D` resolves value representations
/// in implicit VR mode.
#[derive(Debug)]
pub enum HeaderDecoder<D> {
    /// Explicit VR Little Endian
    ExplicitLE(ExplicitVRLittleEndianDecoder),
    /// Explicit VR Big Endian
    ExplicitBE(ExplicitVRBigEndianDecoder),
    /// Implicit VR Little Endian
    ImplicitLE(ImplicitVRLittleEndianDecoder<D>),
}

impl<D> HeaderDecoder<D>
where
    D: DataDictionary,
{
    /// Obtain the decoder for the given encoding,
    /// or `None` if the combination is not supported
    /// (implicit VR big endian).
    pub fn new(explicit_vr: bool, byte_order: Endianness, dict: D) -> Option<Self> {
        match (explicit_vr, byte_order) {
            (true, Endianness::Little) => Some(HeaderDecoder::ExplicitLE(Default::default())),
            (true, Endianness::Big) => Some(HeaderDecoder::ExplicitBE(Default::default())),
            (false, Endianness::Little) => Some(HeaderDecoder::ImplicitLE(
                ImplicitVRLittleEndianDecoder::with_dict(dict),
            )),
            (false, Endianness::Big) => None,
        }
    }

    /// Whether value representations are read from the source.
    pub fn is_explicit_vr(&self) -> bool {
        !matches!(self, HeaderDecoder::ImplicitLE(_))
    }

    /// The byte order of the source.
    pub fn endianness(&self) -> Endianness {
        match self {
            HeaderDecoder::ExplicitBE(_) => Endianness::Big,
            _ => Endianness::Little,
        }
    }
}

macro_rules! for_each_decoder {
    ($s: expr, |$d: ident| $f: expr) => {
        match $s {
            HeaderDecoder::ExplicitLE($d) => $f,
            HeaderDecoder::ExplicitBE($d) => $f,
            HeaderDecoder::ImplicitLE($d) => $f,
        }
    };
}

impl<D> Decode for HeaderDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_header(source))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_item_header(source))
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_tag(source))
    }
}

#[cfg(test)]
mod tests {
    use super::explicit_le::ExplicitVRLittleEndianDecoder;
    use super::{Decode, HeaderDecoder};
    use byteordered::Endianness;
    use dcmio_core::dictionary::StubDataDictionary;
    use dcmio_core::header::Header;
    use dcmio_core::{Tag, VR};
    use std::io::Cursor;

    #[test]
    fn clean_eof_is_distinguished() {
        let dec = ExplicitVRLittleEndianDecoder::default();
        let err = dec.decode_header(&mut Cursor::new(&[] as &[u8])).unwrap_err();
        assert!(err.is_clean_eof());

        // truncated after the tag
        let err = dec
            .decode_header(&mut Cursor::new(&[0x08u8, 0x00, 0x16, 0x00] as &[u8]))
            .unwrap_err();
        assert!(!err.is_clean_eof());
    }

    #[test]
    fn header_decoder_by_mode() {
        #[rustfmt::skip]
        let raw: &[u8] = &[0x28, 0x00, 0x10, 0x00, 0x02, 0x00, 0x00, 0x00];
        let dec = HeaderDecoder::new(false, Endianness::Little, StubDataDictionary).unwrap();
        assert!(!dec.is_explicit_vr());
        let (header, len) = dec.decode_header(&mut Cursor::new(raw)).unwrap();
        assert_eq!(header.tag(), Tag(0x0028, 0x0010));
        assert_eq!(header.vr(), VR::UN);
        assert_eq!(len, 8);

        assert!(HeaderDecoder::new(false, Endianness::Big, StubDataDictionary).is_none());
    }
}
