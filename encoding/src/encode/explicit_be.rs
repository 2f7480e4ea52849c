//! Explicit VR Big Endian header encoding

use crate::encode::{
    Encode, Result, WriteHeaderSnafu, WriteItemDelimiterSnafu, WriteItemHeaderSnafu,
    WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use byteordered::byteorder::{BigEndian, ByteOrder};
use dcmio_core::header::{DataElementHeader, HasLength, Header};
use dcmio_core::Tag;
use snafu::ResultExt;
use std::io::Write;

/// A concrete encoder for the transfer syntax Explicit VR Big Endian
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRBigEndianEncoder;

impl Encode for ExplicitVRBigEndianEncoder {
    fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 4];
        BigEndian::write_u16(&mut buf[..], tag.group());
        BigEndian::write_u16(&mut buf[2..], tag.element());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        let vr_bytes = de.vr().to_bytes();
        if de.vr().has_short_length() {
            let mut buf = [0u8; 8];
            BigEndian::write_u16(&mut buf[0..], de.tag().group());
            BigEndian::write_u16(&mut buf[2..], de.tag().element());
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            BigEndian::write_u16(&mut buf[6..], de.length().0 as u16);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(8)
        } else {
            let mut buf = [0u8; 12];
            BigEndian::write_u16(&mut buf[0..], de.tag().group());
            BigEndian::write_u16(&mut buf[2..], de.tag().element());
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            // buf[6..8] is kept zero'd
            BigEndian::write_u32(&mut buf[8..], de.length().0);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(12)
        }
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE000);
        BigEndian::write_u32(&mut buf[4..], len);
        to.write_all(&buf).context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE00D);
        to.write_all(&buf).context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE0DD);
        to.write_all(&buf).context(WriteSequenceDelimiterSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRBigEndianEncoder;
    use crate::encode::Encode;
    use dcmio_core::header::{DataElementHeader, Length};
    use dcmio_core::{Tag, VR};

    #[test]
    fn encode_explicit_vr_be_headers() {
        let enc = ExplicitVRBigEndianEncoder::default();
        let mut out = Vec::new();
        enc.encode_element_header(
            &mut out,
            DataElementHeader::new(Tag(0x0028, 0x0010), VR::US, Length(2)),
        )
        .unwrap();
        enc.encode_element_header(
            &mut out,
            DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OW, Length(4)),
        )
        .unwrap();
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02,
            0x7F, 0xE0, 0x00, 0x10, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
        ];
        assert_eq!(out, expected);
    }
}
