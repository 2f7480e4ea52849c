//! A positioned cursor over an attribute stream.
//!
//! [`StreamCursor`] couples a byte source with the header decoder
//! of the active encoding. Besides tracking the absolute read position,
//! it supports a bounded look-back through [`mark`](StreamCursor::mark)
//! and [`reset`](StreamCursor::reset),
//! which is what encoding detection and sequence probing are built on.

use dcmio_core::dictionary::DataDictionary;
use dcmio_core::header::{DataElementHeader, Header, Length};
use dcmio_core::util::toggle_endian;
use dcmio_core::value::{Numbers, C};
use dcmio_core::{Tag, VR};
use dcmio_encoding::decode::basic::BasicDecoder;
use dcmio_encoding::decode::{BasicDecode, Decode, HeaderDecoder};
use dcmio_encoding::transfer_syntax::Endianness;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{self, Cursor, Read, Write};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not decode attribute header at position {}", position))]
    DecodeHeader {
        position: u64,
        source: dcmio_encoding::decode::Error,
    },
    #[snafu(display("Could not read {} value bytes at position {}", len, position))]
    ReadValue {
        position: u64,
        len: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not skip {} bytes at position {}", len, position))]
    SkipValue {
        position: u64,
        len: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not copy {} value bytes at position {}", len, position))]
    CopyValue {
        position: u64,
        len: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Stream ended at position {} in the middle of a sequence", position))]
    UnexpectedEnd { position: u64, backtrace: Backtrace },
    #[snafu(display("Cannot reset to a missing or overrun mark at position {}", position))]
    InvalidMark { position: u64, backtrace: Backtrace },
    #[snafu(display("Implicit VR Big Endian is not a valid encoding"))]
    UnsupportedEncoding { backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The size of the chunks used when copying values between streams.
const COPY_CHUNK_SIZE: usize = 8192;

/// A recording of bytes consumed since a mark.
#[derive(Debug)]
struct Mark {
    limit: usize,
    position: u64,
    recorded: Vec<u8>,
}

/// The byte source of a cursor,
/// which can replay bytes previously consumed under a mark.
struct Source<'r> {
    inner: Box<dyn Read + 'r>,
    position: u64,
    replay: Vec<u8>,
    replay_pos: usize,
    mark: Option<Mark>,
}

impl<'r> Source<'r> {
    fn new(inner: Box<dyn Read + 'r>) -> Self {
        Source {
            inner,
            position: 0,
            replay: Vec::new(),
            replay_pos: 0,
            mark: None,
        }
    }

    fn pending_replay(&self) -> &[u8] {
        &self.replay[self.replay_pos..]
    }
}

impl Read for Source<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = if self.replay_pos < self.replay.len() {
            let pending = &self.replay[self.replay_pos..];
            let n = pending.len().min(buf.len());
            buf[..n].copy_from_slice(&pending[..n]);
            self.replay_pos += n;
            if self.replay_pos == self.replay.len() {
                self.replay.clear();
                self.replay_pos = 0;
            }
            n
        } else {
            self.inner.read(buf)?
        };

        if let Some(mark) = &mut self.mark {
            if mark.recorded.len() + n > mark.limit {
                self.mark = None;
            } else {
                mark.recorded.extend_from_slice(&buf[..n]);
            }
        }
        self.position += n as u64;
        Ok(n)
    }
}

/// The outcome of reading a header where an item was expected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ItemToken {
    /// an item with the given length
    Item(Length),
    /// the end of the sequence or fragment list
    Delimiter(Length),
    /// any other header, which does not belong here
    Other(DataElementHeader),
}

/// A stateful reader of attribute headers and value bytes.
///
/// The dictionary `D` resolves value representations
/// when the active encoding has implicit VR.
pub struct StreamCursor<'r, D> {
    src: Source<'r>,
    decoder: HeaderDecoder<D>,
    basic: BasicDecoder,
    dict: D,
    explicit_vr: bool,
    endianness: Endianness,
}

impl<D> std::fmt::Debug for StreamCursor<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("StreamCursor")
            .field("position", &self.src.position)
            .field("explicit_vr", &self.explicit_vr)
            .field("endianness", &self.endianness)
            .finish_non_exhaustive()
    }
}

impl<'r, D> StreamCursor<'r, D>
where
    D: DataDictionary + Clone,
{
    /// Create a cursor at position 0 of the given source.
    pub fn new<R>(source: R, explicit_vr: bool, endianness: Endianness, dict: D) -> Result<Self>
    where
        R: Read + 'r,
    {
        let decoder = HeaderDecoder::new(explicit_vr, endianness, dict.clone())
            .context(UnsupportedEncodingSnafu)?;
        Ok(StreamCursor {
            src: Source::new(Box::new(source)),
            decoder,
            basic: BasicDecoder::new(endianness),
            dict,
            explicit_vr,
            endianness,
        })
    }

    /// Change the encoding used to decode headers and binary values
    /// from this point onwards.
    pub fn set_mode(&mut self, explicit_vr: bool, endianness: Endianness) -> Result<()> {
        if explicit_vr == self.explicit_vr && endianness == self.endianness {
            return Ok(());
        }
        self.decoder = HeaderDecoder::new(explicit_vr, endianness, self.dict.clone())
            .context(UnsupportedEncodingSnafu)?;
        self.basic = BasicDecoder::new(endianness);
        self.explicit_vr = explicit_vr;
        self.endianness = endianness;
        Ok(())
    }

    /// The dictionary used to resolve value representations.
    pub fn dictionary(&self) -> &D {
        &self.dict
    }

    /// Decode the next attribute header.
    ///
    /// Returns `None` if the stream ended cleanly
    /// before the first byte of the header.
    pub fn decode_header(&mut self) -> Result<Option<DataElementHeader>> {
        let position = self.src.position;
        match self.decoder.decode_header(&mut self.src) {
            Ok((header, _)) => Ok(Some(header)),
            Err(e) if e.is_clean_eof() && self.src.position == position => Ok(None),
            Err(e) => Err(e).context(DecodeHeaderSnafu { position }),
        }
    }

    /// Read the header in a position where an item
    /// or the end of the enclosing sequence is expected.
    pub fn read_item_token(&mut self) -> Result<ItemToken> {
        let position = self.src.position;
        let header = self
            .decode_header()?
            .context(UnexpectedEndSnafu { position })?;
        Ok(match header.tag() {
            Tag::ITEM => ItemToken::Item(header.len),
            Tag::SEQUENCE_DELIMITER => ItemToken::Delimiter(header.len),
            _ => ItemToken::Other(header),
        })
    }
}

impl<'r, D> StreamCursor<'r, D> {
    /// The number of bytes consumed from the source so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.src.position
    }

    /// Whether headers are read with explicit value representations.
    #[inline]
    pub fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// The byte order of headers and binary values.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Start recording consumed bytes,
    /// so that up to `limit` bytes can be read again after a [`reset`](Self::reset).
    ///
    /// Reading past the limit discards the mark.
    pub fn mark(&mut self, limit: usize) {
        self.src.mark = Some(Mark {
            limit,
            position: self.src.position,
            recorded: Vec::with_capacity(limit.min(COPY_CHUNK_SIZE)),
        });
    }

    /// Return to the position of the last mark.
    pub fn reset(&mut self) -> Result<()> {
        let position = self.src.position;
        let mark = self.src.mark.take().context(InvalidMarkSnafu { position })?;
        let mut replay = mark.recorded;
        replay.extend_from_slice(self.src.pending_replay());
        self.src.replay = replay;
        self.src.replay_pos = 0;
        self.src.position = mark.position;
        Ok(())
    }

    /// Look at the next `n` bytes without consuming them.
    /// Fewer bytes are returned if the stream ends before that.
    pub fn peek(&mut self, n: usize) -> Result<Vec<u8>> {
        let position = self.src.position;
        self.mark(n);
        let mut buf = Vec::with_capacity(n);
        (&mut self.src)
            .take(n as u64)
            .read_to_end(&mut buf)
            .context(ReadValueSnafu {
                position,
                len: n as u64,
            })?;
        self.reset()?;
        Ok(buf)
    }

    /// Fill the given buffer with the next bytes of the stream.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let position = self.src.position;
        self.src.read_exact(buf).context(ReadValueSnafu {
            position,
            len: buf.len() as u64,
        })
    }

    /// Read 16-bit words in the byte order of the stream.
    pub fn read_u16_into(&mut self, dst: &mut [u16]) -> Result<()> {
        let position = self.src.position;
        self.basic
            .decode_us_into(&mut self.src, dst)
            .context(ReadValueSnafu {
                position,
                len: dst.len() as u64 * 2,
            })
    }

    /// Interpret a value already taken from the stream
    /// as binary numbers of the given VR, in the byte order of the stream.
    ///
    /// Returns `None` for VRs other than US, SS, UL, SL, UV, SV, FL and FD,
    /// or when the value length is not a multiple of the number size.
    pub fn decode_numbers(&self, vr: VR, bytes: &[u8]) -> Option<Numbers> {
        macro_rules! numbers {
            ($variant: ident, $typ: ty, $decode: ident) => {{
                let width = std::mem::size_of::<$typ>();
                if bytes.len() % width != 0 {
                    return None;
                }
                let mut values: C<$typ> = smallvec::smallvec![<$typ>::default(); bytes.len() / width];
                self.basic.$decode(bytes, &mut values).ok()?;
                Numbers::$variant(values)
            }};
        }

        Some(match vr {
            VR::US => numbers!(U16, u16, decode_us_into),
            VR::SS => numbers!(I16, i16, decode_ss_into),
            VR::UL => numbers!(U32, u32, decode_ul_into),
            VR::SL => numbers!(I32, i32, decode_sl_into),
            VR::UV => numbers!(U64, u64, decode_uv_into),
            VR::SV => numbers!(I64, i64, decode_sv_into),
            VR::FL => numbers!(F32, f32, decode_fl_into),
            VR::FD => numbers!(F64, f64, decode_fd_into),
            _ => return None,
        })
    }

    /// Read a value of `len` bytes.
    ///
    /// The buffer is first allocated with at most `allocate_limit` bytes
    /// and then doubled as the data arrives,
    /// so that a bogus length in a truncated stream
    /// fails before a large allocation takes place.
    pub fn read_value(&mut self, len: u32, allocate_limit: usize) -> Result<Vec<u8>> {
        let position = self.src.position;
        let len = len as usize;
        let mut filled = len.min(allocate_limit.max(1));
        let mut value = vec![0; filled];
        self.src.read_exact(&mut value).context(ReadValueSnafu {
            position,
            len: len as u64,
        })?;
        while filled < len {
            let grown = len.min(filled << 1);
            value.resize(grown, 0);
            self.src
                .read_exact(&mut value[filled..])
                .context(ReadValueSnafu {
                    position,
                    len: len as u64,
                })?;
            filled = grown;
        }
        Ok(value)
    }

    /// Consume `len` bytes without keeping them.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        let position = self.src.position;
        let skipped = io::copy(&mut (&mut self.src).take(len), &mut io::sink())
            .context(SkipValueSnafu { position, len })?;
        if skipped < len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof))
                .context(SkipValueSnafu { position, len });
        }
        Ok(())
    }

    /// Copy the next `len` bytes into the given writer,
    /// reversing each word of `swap_width` bytes on the way
    /// (0 to copy the bytes as they are).
    pub fn copy_to<W>(&mut self, len: u64, mut to: W, swap_width: usize) -> Result<u64>
    where
        W: Write,
    {
        let position = self.src.position;
        let chunk_size = COPY_CHUNK_SIZE as u64;
        let mut buf = vec![0u8; COPY_CHUNK_SIZE.min(len as usize)];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(chunk_size) as usize;
            let chunk = &mut buf[..n];
            self.src
                .read_exact(chunk)
                .context(CopyValueSnafu { position, len })?;
            toggle_endian(chunk, swap_width);
            to.write_all(chunk).context(CopyValueSnafu { position, len })?;
            remaining -= n as u64;
        }
        Ok(len)
    }

    /// Wrap the underlying source,
    /// typically with a decompressing reader.
    ///
    /// Bytes already buffered for replay are delivered to the adapter first.
    /// Any mark is discarded.
    pub fn adapt_source<F>(&mut self, f: F)
    where
        F: FnOnce(Box<dyn Read + 'r>) -> Box<dyn Read + 'r>,
    {
        let pending = self.src.pending_replay().to_vec();
        let old = std::mem::replace(&mut self.src.inner, Box::new(io::empty()));
        let chained: Box<dyn Read + 'r> = if pending.is_empty() {
            old
        } else {
            Box::new(Cursor::new(pending).chain(old))
        };
        self.src.inner = f(chained);
        self.src.replay.clear();
        self.src.replay_pos = 0;
        self.src.mark = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemToken, StreamCursor};
    use dcmio_core::dictionary::StubDataDictionary;
    use dcmio_core::header::{Header, Length};
    use dcmio_core::value::Numbers;
    use dcmio_core::{Tag, VR};
    use dcmio_encoding::transfer_syntax::Endianness;
    use smallvec::smallvec;
    use std::io::{self, Read};

    fn cursor(data: &[u8]) -> StreamCursor<'_, StubDataDictionary> {
        StreamCursor::new(data, true, Endianness::Little, StubDataDictionary).unwrap()
    }

    /// A reader which delivers at most 3 bytes per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.0.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn mark_and_reset_replay_bytes() {
        let data: Vec<u8> = (0..32).collect();
        let mut c = StreamCursor::new(Trickle(&data), true, Endianness::Little, StubDataDictionary)
            .unwrap();
        let mut buf = [0u8; 4];
        c.read_exact(&mut buf).unwrap();
        c.mark(16);
        let mut ahead = [0u8; 10];
        c.read_exact(&mut ahead).unwrap();
        assert_eq!(c.position(), 14);
        c.reset().unwrap();
        assert_eq!(c.position(), 4);

        // nested mark over replayed bytes
        c.mark(4);
        c.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [4, 5, 6, 7]);
        c.reset().unwrap();

        let mut rest = vec![0u8; 28];
        c.read_exact(&mut rest).unwrap();
        assert_eq!(rest, (4..32).collect::<Vec<u8>>());
        assert_eq!(c.position(), 32);
    }

    #[test]
    fn reset_fails_after_overrun() {
        let data: Vec<u8> = (0..32).collect();
        let mut c = cursor(&data);
        c.mark(4);
        let mut buf = [0u8; 8];
        c.read_exact(&mut buf).unwrap();
        assert!(c.reset().is_err());
        // without any mark
        assert!(c.reset().is_err());
    }

    #[test]
    fn numbers_follow_stream_byte_order() {
        let le = cursor(&[]);
        assert_eq!(
            le.decode_numbers(VR::US, &[0x01, 0x02, 0x03, 0x04]),
            Some(Numbers::U16(smallvec![0x0201, 0x0403]))
        );
        assert_eq!(
            le.decode_numbers(VR::SL, &[0xFE, 0xFF, 0xFF, 0xFF]),
            Some(Numbers::I32(smallvec![-2]))
        );
        assert_eq!(
            le.decode_numbers(VR::FD, &1.5f64.to_le_bytes()),
            Some(Numbers::F64(smallvec![1.5]))
        );

        let be = StreamCursor::new(&[][..], true, Endianness::Big, StubDataDictionary).unwrap();
        assert_eq!(
            be.decode_numbers(VR::UL, &[0x00, 0x00, 0x01, 0x02]),
            Some(Numbers::U32(smallvec![0x0102]))
        );

        // not a multiple of the number size
        assert_eq!(le.decode_numbers(VR::US, &[1, 2, 3]), None);
        // not a number
        assert_eq!(le.decode_numbers(VR::OW, &[1, 2]), None);
        assert_eq!(le.decode_numbers(VR::AT, &[1, 2, 3, 4]), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let data = [1u8, 2, 3, 4, 5];
        let mut c = cursor(&data);
        assert_eq!(c.peek(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(c.position(), 0);
        assert_eq!(c.peek(8).unwrap(), vec![1, 2, 3, 4, 5]);
        let mut buf = [0u8; 5];
        c.read_exact(&mut buf).unwrap();
        assert_eq!(buf, data);
    }

    #[test]
    fn growth_limited_read() {
        let data: Vec<u8> = (0..=255).cycle().take(1000).collect();
        let mut c = cursor(&data);
        let value = c.read_value(1000, 64).unwrap();
        assert_eq!(value, data);

        // a length beyond the end fails without reading a huge buffer upfront
        let mut c = cursor(&data);
        let err = c.read_value(0xFFFF_FFF0, 64).unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }

    #[test]
    fn skip_and_copy() {
        let data: Vec<u8> = (0..16).collect();
        let mut c = cursor(&data);
        c.skip(4).unwrap();
        let mut out = Vec::new();
        c.copy_to(8, &mut out, 2).unwrap();
        assert_eq!(out, vec![5, 4, 7, 6, 9, 8, 11, 10]);
        assert!(c.skip(8).is_err());
    }

    #[test]
    fn read_words_in_stream_order() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut c = StreamCursor::new(&data[..], true, Endianness::Big, StubDataDictionary).unwrap();
        let mut words = [0u16; 2];
        c.read_u16_into(&mut words).unwrap();
        assert_eq!(words, [0x0102, 0x0304]);
    }

    #[test]
    fn clean_end_of_stream() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
        ];
        let mut c = cursor(data);
        let header = c.decode_header().unwrap().unwrap();
        assert_eq!(header.tag(), Tag(0x0008, 0x0060));
        assert_eq!(header.vr(), VR::CS);
        c.skip(2).unwrap();
        assert_eq!(c.decode_header().unwrap(), None);

        // truncated header
        let mut c = cursor(&data[..6]);
        assert!(c.decode_header().is_err());
    }

    #[test]
    fn item_tokens() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut c = cursor(data);
        assert_eq!(c.read_item_token().unwrap(), ItemToken::Item(Length(4)));
        c.mark(8);
        assert_eq!(c.read_item_token().unwrap(), ItemToken::Delimiter(Length(0)));
        c.reset().unwrap();
        c.skip(8).unwrap();
        assert!(c.read_item_token().is_err());
    }

    #[test]
    fn switch_modes() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0x28, 0x00, 0x10, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let mut c = cursor(data);
        c.set_mode(false, Endianness::Little).unwrap();
        let header = c.decode_header().unwrap().unwrap();
        assert_eq!(header.len, Length(2));
        assert!(c.set_mode(false, Endianness::Big).is_err());
    }

    #[test]
    fn adapt_source_keeps_replayed_bytes() {
        let data: Vec<u8> = (0..8).collect();
        let mut c = cursor(&data);
        assert_eq!(c.peek(4).unwrap(), vec![0, 1, 2, 3]);
        c.adapt_source(|r| Box::new(r.take(6)));
        let mut out = Vec::new();
        c.copy_to(6, &mut out, 0).unwrap();
        assert_eq!(out, vec![0, 1, 2, 3, 4, 5]);
        assert!(c.skip(1).is_err());
    }
}
