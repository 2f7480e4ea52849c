//! This module provides implementations for primitive decoders of data, which
//! may be in either Little Endian or Big Endian.

use super::BasicDecode;
use byteordered::{ByteOrdered, Endianness};
use std::io::Read;

type Result<T> = std::io::Result<T>;

macro_rules! impl_basic_decode {
    ($typ: ident, $ctor: ident, $endianness: expr) => {
        impl BasicDecode for $typ {
            fn endianness(&self) -> Endianness {
                $endianness
            }

            fn decode_us<S: Read>(&self, source: S) -> Result<u16> {
                ByteOrdered::$ctor(source).read_u16()
            }

            fn decode_us_into<S: Read>(&self, source: S, dst: &mut [u16]) -> Result<()> {
                ByteOrdered::$ctor(source).read_u16_into(dst)
            }

            fn decode_ul<S: Read>(&self, source: S) -> Result<u32> {
                ByteOrdered::$ctor(source).read_u32()
            }

            fn decode_ul_into<S: Read>(&self, source: S, dst: &mut [u32]) -> Result<()> {
                ByteOrdered::$ctor(source).read_u32_into(dst)
            }

            fn decode_uv_into<S: Read>(&self, source: S, dst: &mut [u64]) -> Result<()> {
                ByteOrdered::$ctor(source).read_u64_into(dst)
            }

            fn decode_ss_into<S: Read>(&self, source: S, dst: &mut [i16]) -> Result<()> {
                ByteOrdered::$ctor(source).read_i16_into(dst)
            }

            fn decode_sl_into<S: Read>(&self, source: S, dst: &mut [i32]) -> Result<()> {
                ByteOrdered::$ctor(source).read_i32_into(dst)
            }

            fn decode_sv_into<S: Read>(&self, source: S, dst: &mut [i64]) -> Result<()> {
                ByteOrdered::$ctor(source).read_i64_into(dst)
            }

            fn decode_fl_into<S: Read>(&self, source: S, dst: &mut [f32]) -> Result<()> {
                ByteOrdered::$ctor(source).read_f32_into(dst)
            }

            fn decode_fd_into<S: Read>(&self, source: S, dst: &mut [f64]) -> Result<()> {
                ByteOrdered::$ctor(source).read_f64_into(dst)
            }
        }
    };
}

/// A basic decoder of primitive elements in little endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LittleEndianBasicDecoder;

impl_basic_decode!(LittleEndianBasicDecoder, le, Endianness::Little);

/// A basic decoder of primitive elements in big endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BigEndianBasicDecoder;

impl_basic_decode!(BigEndianBasicDecoder, be, Endianness::Big);

/// A basic decoder with support for both Little Endian an Big Endian
/// encoding, decided at run-time. Since only two values are possible,
/// this enum may become more efficient than the use of a trait object.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum BasicDecoder {
    /// Decode in Little Endian
    LE(LittleEndianBasicDecoder),
    /// Decode in Big Endian
    BE(BigEndianBasicDecoder),
}

impl BasicDecoder {
    /// Create a basic decoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => BasicDecoder::LE(LittleEndianBasicDecoder),
            Endianness::Big => BasicDecoder::BE(BigEndianBasicDecoder),
        }
    }
}

impl From<Endianness> for BasicDecoder {
    fn from(endianness: Endianness) -> Self {
        BasicDecoder::new(endianness)
    }
}

macro_rules! for_both {
    ($s: expr, |$e: ident| $f: expr) => {
        match *$s {
            BasicDecoder::LE(ref $e) => $f,
            BasicDecoder::BE(ref $e) => $f,
        }
    };
}

impl BasicDecode for BasicDecoder {
    fn endianness(&self) -> Endianness {
        for_both!(self, |e| e.endianness())
    }

    fn decode_us<S: Read>(&self, source: S) -> Result<u16> {
        for_both!(self, |e| e.decode_us(source))
    }

    fn decode_us_into<S: Read>(&self, source: S, dst: &mut [u16]) -> Result<()> {
        for_both!(self, |e| e.decode_us_into(source, dst))
    }

    fn decode_ul<S: Read>(&self, source: S) -> Result<u32> {
        for_both!(self, |e| e.decode_ul(source))
    }

    fn decode_ul_into<S: Read>(&self, source: S, dst: &mut [u32]) -> Result<()> {
        for_both!(self, |e| e.decode_ul_into(source, dst))
    }

    fn decode_uv_into<S: Read>(&self, source: S, dst: &mut [u64]) -> Result<()> {
        for_both!(self, |e| e.decode_uv_into(source, dst))
    }

    fn decode_ss_into<S: Read>(&self, source: S, dst: &mut [i16]) -> Result<()> {
        for_both!(self, |e| e.decode_ss_into(source, dst))
    }

    fn decode_sl_into<S: Read>(&self, source: S, dst: &mut [i32]) -> Result<()> {
        for_both!(self, |e| e.decode_sl_into(source, dst))
    }

    fn decode_sv_into<S: Read>(&self, source: S, dst: &mut [i64]) -> Result<()> {
        for_both!(self, |e| e.decode_sv_into(source, dst))
    }

    fn decode_fl_into<S: Read>(&self, source: S, dst: &mut [f32]) -> Result<()> {
        for_both!(self, |e| e.decode_fl_into(source, dst))
    }

    fn decode_fd_into<S: Read>(&self, source: S, dst: &mut [f64]) -> Result<()> {
        for_both!(self, |e| e.decode_fd_into(source, dst))
    }
}
