//! Encoding and decoding primitives of the `dcmio` codec.
//!
//! This crate provides interfaces and data structures for reading and writing
//! attribute headers, binary values and text
//! in each of the supported encodings. It also hosts the concept
//! of [transfer syntax specifier], which can be used to produce
//! header decoders and encoders at run-time,
//! and the [pixel data adapter] traits implemented by frame codecs.
//!
//! All APIs are based on synchronous I/O.
//!
//! [transfer syntax specifier]: ./transfer_syntax/index.html
//! [pixel data adapter]: ./adapters/index.html

pub mod adapters;
pub mod decode;
pub mod encode;
pub mod text;
pub mod transfer_syntax;

pub use adapters::{EncodeOptions, PixelDataObject, PixelDataReader, PixelDataWriter};
pub use decode::Decode;
pub use encode::Encode;
pub use transfer_syntax::{Codec, TransferSyntax, TransferSyntaxIndex};

// public dependency re-export
pub use byteordered;
pub use snafu;
