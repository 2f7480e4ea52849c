//! Implementation of the data set adapter
//! for Deflated Explicit VR Little Endian.
//!
//! Everything after the file meta group is compressed
//! as a raw deflate stream.
//! Some writers produce a zlib stream instead,
//! which is recognized by its header and accepted with a warning.
use std::io::{self, BufRead, BufReader, Read, Write};

use dcmio_encoding::transfer_syntax::{DataRWAdapter, FinishWrite};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::DeflateEncoder;
use flate2::Compression;

/// Immaterial type representing an adapter for deflated data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlateAdapter;

/// Whether the buffered bytes begin with a zlib header
/// (deflate method with a 32K window, default compression level).
fn has_zlib_header(buf: &[u8]) -> bool {
    buf.len() >= 2 && buf[0] == 0x78 && buf[1] == 0x9C
}

impl DataRWAdapter for FlateAdapter {
    fn adapt_reader<'r>(&self, reader: Box<dyn Read + 'r>) -> Box<dyn Read + 'r> {
        let mut reader = BufReader::new(reader);
        let zlib = match reader.fill_buf() {
            Ok(buf) => has_zlib_header(buf),
            // let the decoder report it on first read
            Err(_) => false,
        };
        if zlib {
            tracing::warn!("Deflated data set is wrapped in a zlib stream");
            Box::new(ZlibDecoder::new(reader))
        } else {
            Box::new(DeflateDecoder::new(reader))
        }
    }

    fn adapt_writer<'w>(&self, writer: Box<dyn Write + 'w>) -> Box<dyn FinishWrite + 'w> {
        Box::new(DeflateWriter(DeflateEncoder::new(writer, Compression::fast())))
    }
}

/// A deflating writer which can be explicitly finished
/// without giving away the inner writer.
struct DeflateWriter<'w>(DeflateEncoder<Box<dyn Write + 'w>>);

impl Write for DeflateWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl FinishWrite for DeflateWriter<'_> {
    fn finish(&mut self) -> io::Result<()> {
        self.0.try_finish()?;
        self.0.get_mut().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zlib_header_detection() {
        assert!(has_zlib_header(&[0x78, 0x9C, 0x01]));
        assert!(!has_zlib_header(&[0x78]));
        assert!(!has_zlib_header(&[0x08, 0x00, 0x05, 0x00]));
    }
}
