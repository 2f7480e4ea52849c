//! This module provides implementations for basic encoders: little endian and big endian.

use super::BasicEncode;
use byteordered::{ByteOrdered, Endianness};
use std::io::Write;

type Result<T> = std::io::Result<T>;

macro_rules! impl_basic_encode {
    ($typ: ident, $ctor: ident, $endianness: expr) => {
        impl BasicEncode for $typ {
            fn endianness(&self) -> Endianness {
                $endianness
            }

            fn encode_us<S>(&self, to: S, value: u16) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_u16(value)
            }

            fn encode_ul<S>(&self, to: S, value: u32) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_u32(value)
            }

            fn encode_uv<S>(&self, to: S, value: u64) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_u64(value)
            }

            fn encode_ss<S>(&self, to: S, value: i16) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_i16(value)
            }

            fn encode_sl<S>(&self, to: S, value: i32) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_i32(value)
            }

            fn encode_sv<S>(&self, to: S, value: i64) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_i64(value)
            }

            fn encode_fl<S>(&self, to: S, value: f32) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_f32(value)
            }

            fn encode_fd<S>(&self, to: S, value: f64) -> Result<()>
            where
                S: Write,
            {
                ByteOrdered::$ctor(to).write_f64(value)
            }
        }
    };
}

/// A basic encoder of primitive elements in little endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LittleEndianBasicEncoder;

impl_basic_encode!(LittleEndianBasicEncoder, le, Endianness::Little);

/// A basic encoder of primitive elements in big endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BigEndianBasicEncoder;

impl_basic_encode!(BigEndianBasicEncoder, be, Endianness::Big);

/// A basic encoder with support for both Little Endian an Big Endian
/// encoding, decided at run-time. Since only two values are possible,
/// this enum may become more efficient than the use of a trait object.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum BasicEncoder {
    /// Encode in Little Endian
    LE(LittleEndianBasicEncoder),
    /// Encode in Big Endian
    BE(BigEndianBasicEncoder),
}

impl BasicEncoder {
    /// Creates a basic encoder with the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => BasicEncoder::LE(LittleEndianBasicEncoder),
            Endianness::Big => BasicEncoder::BE(BigEndianBasicEncoder),
        }
    }
}

impl From<Endianness> for BasicEncoder {
    fn from(endianness: Endianness) -> Self {
        BasicEncoder::new(endianness)
    }
}

macro_rules! for_both {
    ($s: expr, |$e: ident| $f: expr) => {
        match *$s {
            BasicEncoder::LE(ref $e) => $f,
            BasicEncoder::BE(ref $e) => $f,
        }
    };
}

impl BasicEncode for BasicEncoder {
    fn endianness(&self) -> Endianness {
        for_both!(self, |e| e.endianness())
    }

    fn encode_us<S>(&self, to: S, value: u16) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_us(to, value))
    }

    fn encode_ul<S>(&self, to: S, value: u32) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_ul(to, value))
    }

    fn encode_uv<S>(&self, to: S, value: u64) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_uv(to, value))
    }

    fn encode_ss<S>(&self, to: S, value: i16) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_ss(to, value))
    }

    fn encode_sl<S>(&self, to: S, value: i32) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_sl(to, value))
    }

    fn encode_sv<S>(&self, to: S, value: i64) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_sv(to, value))
    }

    fn encode_fl<S>(&self, to: S, value: f32) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_fl(to, value))
    }

    fn encode_fd<S>(&self, to: S, value: f64) -> Result<()>
    where
        S: Write,
    {
        for_both!(self, |e| e.encode_fd(to, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_ul_le_be() {
        let mut out = Vec::new();
        LittleEndianBasicEncoder.encode_ul(&mut out, 0x0A0B_0C0D).unwrap();
        BigEndianBasicEncoder.encode_ul(&mut out, 0x0A0B_0C0D).unwrap();
        assert_eq!(out, vec![0x0D, 0x0C, 0x0B, 0x0A, 0x0A, 0x0B, 0x0C, 0x0D]);
    }

    #[test]
    fn test_write_fd_dynamic() {
        let mut out = Vec::new();
        BasicEncoder::new(Endianness::Big)
            .encode_fd(&mut out, 1.0)
            .unwrap();
        assert_eq!(out, vec![0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);
    }
}
