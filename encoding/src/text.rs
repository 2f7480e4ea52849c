//! Encoding and decoding of text values
//! according to the specific character set of a data set.
//!
//! Only single-byte repertoires and UTF-8 are supported.
//! Code extensions (ISO 2022 escape sequences) are not interpreted:
//! a data set declaring more than one term
//! is decoded with the first supported term.

use encoding::all::{GB18030, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, UTF_8};
use encoding::{DecoderTrap, EncoderTrap, Encoding, RawDecoder, StringWriter};
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;
use std::fmt::Debug;

/// An error which may occur when encoding text.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    EncodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

/// An error which may occur when decoding text.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// A custom error message.
    #[snafu(display("{}", message))]
    DecodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

type EncodeResult<T> = Result<T, EncodeTextError>;
type DecodeResult<T> = Result<T, DecodeTextError>;

/// A holder of encoding and decoding mechanisms for text.
pub trait TextCodec {
    /// Obtain the defined term (unique name) of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008, 0005) element to refer to this codec.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string.
    /// The resulting string _may_ contain backslash characters ('\')
    /// to delimit individual values.
    fn decode(&self, text: &[u8]) -> DecodeResult<String>;

    /// Encode a text value into a byte vector.
    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>>;
}

impl<'a, T: ?Sized> TextCodec for &'a T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        (**self).decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        (**self).encode(text)
    }
}

/// An enum type for the supported character sets.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SpecificCharacterSet {
    /// ISO IR 6: the default character repertoire
    #[default]
    Default,
    /// ISO IR 100: ISO 8859-1, Latin alphabet No. 1
    IsoIr100,
    /// ISO IR 101: ISO 8859-2, Latin alphabet No. 2
    IsoIr101,
    /// ISO IR 109: ISO 8859-3, Latin alphabet No. 3
    IsoIr109,
    /// ISO IR 110: ISO 8859-4, Latin alphabet No. 4
    IsoIr110,
    /// ISO IR 144: ISO 8859-5, Latin/Cyrillic alphabet
    IsoIr144,
    /// ISO IR 192: Unicode in UTF-8
    IsoIr192,
    /// GB18030: Simplified Chinese
    Gb18030,
}

impl SpecificCharacterSet {
    /// Obtain the character set identified by a defined term.
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim() {
            "" | "Default" | "ISO_IR_6" | "ISO_IR 6" | "ISO 2022 IR 6" => Some(Default),
            "ISO_IR_100" | "ISO_IR 100" | "ISO 2022 IR 100" => Some(IsoIr100),
            "ISO_IR_101" | "ISO_IR 101" | "ISO 2022 IR 101" => Some(IsoIr101),
            "ISO_IR_109" | "ISO_IR 109" | "ISO 2022 IR 109" => Some(IsoIr109),
            "ISO_IR_110" | "ISO_IR 110" | "ISO 2022 IR 110" => Some(IsoIr110),
            "ISO_IR_144" | "ISO_IR 144" | "ISO 2022 IR 144" => Some(IsoIr144),
            "ISO_IR_192" | "ISO_IR 192" => Some(IsoIr192),
            "GB18030" => Some(Gb18030),
            _ => None,
        }
    }

    /// Resolve the character set from the terms
    /// of a Specific Character Set attribute.
    ///
    /// The first recognized term wins.
    /// Returns `None` if none of the terms is supported.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Option<Self> {
        if terms.is_empty() {
            return Some(SpecificCharacterSet::Default);
        }
        terms
            .iter()
            .find_map(|t| SpecificCharacterSet::from_code(t.as_ref()))
    }

    fn codec(self) -> &'static dyn TextCodec {
        match self {
            SpecificCharacterSet::Default => &DefaultCharacterSetCodec,
            SpecificCharacterSet::IsoIr100 => &IsoIr100CharacterSetCodec,
            SpecificCharacterSet::IsoIr101 => &IsoIr101CharacterSetCodec,
            SpecificCharacterSet::IsoIr109 => &IsoIr109CharacterSetCodec,
            SpecificCharacterSet::IsoIr110 => &IsoIr110CharacterSetCodec,
            SpecificCharacterSet::IsoIr144 => &IsoIr144CharacterSetCodec,
            SpecificCharacterSet::IsoIr192 => &Utf8CharacterSetCodec,
            SpecificCharacterSet::Gb18030 => &Gb18030CharacterSetCodec,
        }
    }
}

impl TextCodec for SpecificCharacterSet {
    fn name(&self) -> &'static str {
        self.codec().name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        self.codec().decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        self.codec().encode(text)
    }
}

/// Replace an undecodable byte with its octal escape.
fn decode_text_trap(
    _decoder: &mut dyn RawDecoder,
    input: &[u8],
    output: &mut dyn StringWriter,
) -> bool {
    let c = input[0];
    let o0 = c & 7;
    let o1 = (c & 56) >> 3;
    let o2 = (c & 192) >> 6;
    output.write_char('\\');
    output.write_char((o2 + b'0') as char);
    output.write_char((o1 + b'0') as char);
    output.write_char((o0 + b'0') as char);
    true
}

macro_rules! decl_character_set {
    ($typ: ident, $term: literal, $val: expr) => {
        #[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
        #[doc = "Data type for the "]
        #[doc = $term]
        #[doc = "character set encoding."]
        pub struct $typ;

        impl TextCodec for $typ {
            fn name(&self) -> &'static str {
                $term
            }

            fn decode(&self, text: &[u8]) -> DecodeResult<String> {
                $val.decode(text, DecoderTrap::Call(decode_text_trap))
                    .map_err(|message| DecodeCustomSnafu { message }.build())
            }

            fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
                $val.encode(text, EncoderTrap::Strict)
                    .map_err(|message| EncodeCustomSnafu { message }.build())
            }
        }
    };
}

// ISO 8859-1 is a superset of the default repertoire
decl_character_set!(DefaultCharacterSetCodec, "ISO_IR 6", ISO_8859_1);
decl_character_set!(IsoIr100CharacterSetCodec, "ISO_IR 100", ISO_8859_1);
decl_character_set!(IsoIr101CharacterSetCodec, "ISO_IR 101", ISO_8859_2);
decl_character_set!(IsoIr109CharacterSetCodec, "ISO_IR 109", ISO_8859_3);
decl_character_set!(IsoIr110CharacterSetCodec, "ISO_IR 110", ISO_8859_4);
decl_character_set!(IsoIr144CharacterSetCodec, "ISO_IR 144", ISO_8859_5);
decl_character_set!(Utf8CharacterSetCodec, "ISO_IR 192", UTF_8);
decl_character_set!(Gb18030CharacterSetCodec, "GB18030", GB18030);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec<T>(codec: T, string: &str, bytes: &[u8])
    where
        T: TextCodec,
    {
        assert_eq!(codec.encode(string).expect("encoding"), bytes);
        assert_eq!(codec.decode(bytes).expect("decoding"), string);
    }

    #[test]
    fn iso_ir_100_baseline() {
        let codec = SpecificCharacterSet::IsoIr100;
        test_codec(codec, "Smith^John", b"Smith^John");
        test_codec(codec, "Müller^Jürgen", b"M\xfcller^J\xfcrgen");
    }

    #[test]
    fn iso_ir_192_baseline() {
        let codec = SpecificCharacterSet::IsoIr192;
        test_codec(codec, "Simões^John", "Simões^John".as_bytes());
    }

    #[test]
    fn resolve_terms() {
        assert_eq!(
            SpecificCharacterSet::from_terms::<&str>(&[]),
            Some(SpecificCharacterSet::Default)
        );
        assert_eq!(
            SpecificCharacterSet::from_terms(&["ISO_IR 192"]),
            Some(SpecificCharacterSet::IsoIr192)
        );
        assert_eq!(
            SpecificCharacterSet::from_terms(&["", "ISO 2022 IR 100"]),
            Some(SpecificCharacterSet::Default)
        );
        assert_eq!(SpecificCharacterSet::from_terms(&["ISO_IR 13"]), None);
    }

    #[test]
    fn bad_default_bytes_are_escaped() {
        let decoded = SpecificCharacterSet::IsoIr192.decode(b"A\xff").unwrap();
        assert_eq!(decoded, "A\\377");
    }
}
