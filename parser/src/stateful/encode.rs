//! A stateful writer of attribute headers and value bytes.

use dcmio_core::header::{DataElementHeader, Length};
use dcmio_core::util::{even, toggle_endian};
use dcmio_core::value::Numbers;
use dcmio_encoding::encode::basic::BasicEncoder;
use dcmio_encoding::encode::{BasicEncode, Encode, HeaderEncoder};
use dcmio_encoding::transfer_syntax::{DataRWAdapter, Endianness, FinishWrite};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{self, Read, Write};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to encode a header at position {}", position))]
    EncodeHeader {
        position: u64,
        source: dcmio_encoding::encode::Error,
    },
    #[snafu(display("Could not write value data at position {}", position))]
    WriteValueData {
        position: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not finish the output stream at position {}", position))]
    FinishStream {
        position: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("The output stream was already finished"))]
    AlreadyFinished { backtrace: Backtrace },
    #[snafu(display("Implicit VR Big Endian is not a valid encoding"))]
    UnsupportedEncoding { backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The output stream of an encoder,
/// possibly funneled through an adapter such as a compressor.
enum Sink<'w> {
    Plain(Box<dyn Write + 'w>),
    Adapted(Box<dyn FinishWrite + 'w>),
    Finished,
}

impl Write for Sink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Adapted(w) => w.write(buf),
            Sink::Finished => Err(io::Error::new(
                io::ErrorKind::Other,
                "write after the end of the stream",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Adapted(w) => w.flush(),
            Sink::Finished => Ok(()),
        }
    }
}

/// A stateful encoder of attribute headers and values
/// in one of the supported encodings,
/// keeping track of the number of bytes written.
pub struct StatefulEncoder<'w> {
    to: Sink<'w>,
    encoder: HeaderEncoder,
    basic: BasicEncoder,
    bytes_written: u64,
}

impl std::fmt::Debug for StatefulEncoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("StatefulEncoder")
            .field("encoder", &self.encoder)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl<'w> StatefulEncoder<'w> {
    /// Create an encoder writing to `to` in the given encoding.
    pub fn new<W>(to: W, explicit_vr: bool, endianness: Endianness) -> Result<Self>
    where
        W: Write + 'w,
    {
        let encoder =
            HeaderEncoder::new(explicit_vr, endianness).context(UnsupportedEncodingSnafu)?;
        Ok(StatefulEncoder {
            to: Sink::Plain(Box::new(to)),
            encoder,
            basic: BasicEncoder::new(endianness),
            bytes_written: 0,
        })
    }

    /// Change the encoding of the following headers and values.
    pub fn set_mode(&mut self, explicit_vr: bool, endianness: Endianness) -> Result<()> {
        self.encoder =
            HeaderEncoder::new(explicit_vr, endianness).context(UnsupportedEncodingSnafu)?;
        self.basic = BasicEncoder::new(endianness);
        Ok(())
    }

    /// Whether value representations are written.
    pub fn is_explicit_vr(&self) -> bool {
        self.encoder.is_explicit_vr()
    }

    /// The byte order of the output.
    pub fn endianness(&self) -> Endianness {
        self.encoder.endianness()
    }

    /// Retrieve the number of bytes written so far.
    /// Once the output is adapted, this counts bytes before compression.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whether the output goes through an adapter.
    pub fn is_adapted(&self) -> bool {
        matches!(self.to, Sink::Adapted(_))
    }

    /// Funnel all following output through the given adapter.
    /// Has no effect if the output is already adapted.
    pub fn adapt_sink<A>(&mut self, adapter: &A)
    where
        A: ?Sized + DataRWAdapter,
    {
        if let Sink::Plain(_) = self.to {
            if let Sink::Plain(w) = std::mem::replace(&mut self.to, Sink::Finished) {
                self.to = Sink::Adapted(adapter.adapt_writer(w));
            }
        }
    }

    /// Encode and write an attribute header.
    /// A defined length is rounded up to an even number.
    pub fn encode_element_header(&mut self, mut de: DataElementHeader) -> Result<()> {
        if let Some(len) = de.len.get() {
            de.len = Length(even(len));
        }
        let bytes = self
            .encoder
            .encode_element_header(&mut self.to, de)
            .context(EncodeHeaderSnafu {
                position: self.bytes_written,
            })?;
        self.bytes_written += bytes as u64;
        Ok(())
    }

    /// Encode and write an item header,
    /// where `len` can be `0xFFFF_FFFF` for undefined length.
    pub fn encode_item_header(&mut self, len: u32) -> Result<()> {
        let len = if len == Length::UNDEFINED.0 {
            len
        } else {
            even(len)
        };
        self.encoder
            .encode_item_header(&mut self.to, len)
            .context(EncodeHeaderSnafu {
                position: self.bytes_written,
            })?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write an item delimiter.
    pub fn encode_item_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_item_delimiter(&mut self.to)
            .context(EncodeHeaderSnafu {
                position: self.bytes_written,
            })?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write a sequence delimiter.
    pub fn encode_sequence_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_sequence_delimiter(&mut self.to)
            .context(EncodeHeaderSnafu {
                position: self.bytes_written,
            })?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Write the given bytes directly, without padding.
    pub fn write_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.to.write_all(bytes).context(WriteValueDataSnafu {
            position: self.bytes_written,
        })?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Write a value, followed by the padding byte if its length is odd.
    pub fn write_bytes(&mut self, bytes: &[u8], padding: u8) -> Result<()> {
        self.write_raw_bytes(bytes)?;
        if bytes.len() % 2 != 0 {
            self.write_raw_bytes(&[padding])?;
        }
        Ok(())
    }

    /// Write a value held in the given byte order,
    /// swapping words of `width` bytes if it differs from the output.
    pub fn write_ordered_bytes(&mut self, bytes: &[u8], big_endian: bool, width: usize) -> Result<()> {
        if width > 1 && big_endian != (self.endianness() == Endianness::Big) {
            let mut swapped = bytes.to_vec();
            toggle_endian(&mut swapped, width);
            self.write_bytes(&swapped, 0)
        } else {
            self.write_bytes(bytes, 0)
        }
    }

    /// Encode binary numbers in the byte order of the output.
    pub fn write_numbers(&mut self, numbers: &Numbers) -> Result<()> {
        let n = self
            .basic
            .encode_numbers(&mut self.to, numbers)
            .context(WriteValueDataSnafu {
                position: self.bytes_written,
            })?;
        self.bytes_written += n as u64;
        Ok(())
    }

    /// Copy exactly `len` bytes from the given reader.
    pub fn copy_from<R>(&mut self, from: R, len: u64) -> Result<()>
    where
        R: Read,
    {
        let position = self.bytes_written;
        let copied = io::copy(&mut from.take(len), &mut self.to)
            .context(WriteValueDataSnafu { position })?;
        if copied < len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof))
                .context(WriteValueDataSnafu { position });
        }
        self.bytes_written += copied;
        Ok(())
    }

    /// Flush the output, writing the end of an adapted stream.
    ///
    /// No more data can be written afterwards.
    pub fn finish(&mut self) -> Result<()> {
        ensure!(!matches!(self.to, Sink::Finished), AlreadyFinishedSnafu);
        let position = self.bytes_written;
        match &mut self.to {
            Sink::Adapted(w) => w.finish().context(FinishStreamSnafu { position })?,
            sink => sink.flush().context(FinishStreamSnafu { position })?,
        }
        self.to = Sink::Finished;
        Ok(())
    }
}

impl Write for StatefulEncoder<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.to.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.to.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::StatefulEncoder;
    use dcmio_core::header::{DataElementHeader, Length};
    use dcmio_core::value::Numbers;
    use dcmio_core::{Tag, VR};
    use dcmio_encoding::transfer_syntax::Endianness;
    use smallvec::smallvec;

    #[test]
    fn headers_and_padding() {
        let mut out = Vec::new();
        {
            let mut enc = StatefulEncoder::new(&mut out, true, Endianness::Little).unwrap();
            enc.encode_element_header(DataElementHeader::new(
                Tag(0x0010, 0x0010),
                VR::PN,
                Length(5),
            ))
            .unwrap();
            enc.write_bytes(b"Doe^J", b' ').unwrap();
            assert_eq!(enc.bytes_written(), 14);
            enc.finish().unwrap();
            assert!(enc.finish().is_err());
            assert!(enc.write_raw_bytes(&[0]).is_err());
        }
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x06, 0x00,
            b'D', b'o', b'e', b'^', b'J', b' ',
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn numbers_and_swapped_words() {
        let mut out = Vec::new();
        {
            let mut enc = StatefulEncoder::new(&mut out, true, Endianness::Big).unwrap();
            enc.write_numbers(&Numbers::U16(smallvec![0x0102])).unwrap();
            // little endian words are swapped
            enc.write_ordered_bytes(&[0x03, 0x04], false, 2).unwrap();
            // opaque bytes are not
            enc.write_ordered_bytes(&[0x05, 0x06], false, 0).unwrap();
            enc.encode_item_header(Length::UNDEFINED.0).unwrap();
            enc.encode_sequence_delimiter().unwrap();
        }
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x01, 0x02, 0x04, 0x03, 0x05, 0x06,
            0xFF, 0xFE, 0xE0, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFE, 0xE0, 0xDD, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn copy_requires_all_bytes() {
        let mut out = Vec::new();
        let mut enc = StatefulEncoder::new(&mut out, false, Endianness::Little).unwrap();
        enc.copy_from(&[1u8, 2, 3, 4][..], 4).unwrap();
        assert!(enc.copy_from(&[1u8, 2][..], 4).is_err());
        assert!(StatefulEncoder::new(Vec::new(), false, Endianness::Big).is_err());
    }
}
