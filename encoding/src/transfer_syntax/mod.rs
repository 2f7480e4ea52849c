//! Module containing the transfer syntax data structure and related methods.
//! The `TransferSyntax` describes how a data set is laid out on the wire:
//! VR explicitness, byte order, and the codec required
//! for the data set or for its pixel data.
//!
//! This crate does not host specific transfer syntaxes. Instead, they are
//! collected in a registry implementing [`TransferSyntaxIndex`],
//! which lives in the `dcmio-transfer-syntax-registry` crate.

use crate::adapters::{DynPixelDataReader, DynPixelDataWriter, NeverPixelAdapter};
use crate::adapters::{PixelDataReader, PixelDataWriter};
use crate::decode::basic::BasicDecoder;
use crate::decode::HeaderDecoder;
use crate::encode::basic::BasicEncoder;
use crate::encode::HeaderEncoder;
use dcmio_core::dictionary::DataDictionary;
use std::fmt;
use std::io::{self, Read, Write};

pub use byteordered::Endianness;

/// A transfer syntax specifier. The data RW adapter `A` specifies
/// custom codec capabilities for the whole data set when required,
/// whereas `R` and `W` decode and encode encapsulated pixel data.
pub struct TransferSyntax<A = DynDataRWAdapter, R = DynPixelDataReader, W = DynPixelDataWriter> {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// The transfer syntax' requirements and implemented capabilities.
    codec: Codec<A, R, W>,
}

impl<A, R, W> fmt::Debug for TransferSyntax<A, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransferSyntax")
            .field("uid", &self.uid)
            .field("name", &self.name)
            .field("byte_order", &self.byte_order)
            .field("explicit_vr", &self.explicit_vr)
            .finish_non_exhaustive()
    }
}

/// Trait for containers of transfer syntax specifiers.
///
/// Types implementing this trait are held responsible for populating
/// themselves with a set of transfer syntaxes, which can be fully supported,
/// partially supported, or not supported. Usually, only one implementation
/// of this trait is used for the entire program.
pub trait TransferSyntaxIndex {
    /// Obtain a transfer syntax by its respective UID.
    ///
    /// Implementations of this method should be robust to the possible
    /// presence of a trailing null character (`\0`) in `uid`.
    fn get(&self, uid: &str) -> Option<&TransferSyntax>;
}

impl<T: ?Sized> TransferSyntaxIndex for &T
where
    T: TransferSyntaxIndex,
{
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        (**self).get(uid)
    }
}

/// A description and possible implementation regarding
/// the encoding and decoding requirements of a transfer syntax.
/// This is also used as a means to describe whether pixel data is encapsulated
/// and whether this implementation supports it.
#[derive(Debug, Clone, PartialEq)]
pub enum Codec<A, R, W> {
    /// No codec is given, nor is it required.
    None,
    /// Custom encoding and decoding of the entire data set is required.
    /// `None` means that it is not supported by this build.
    Dataset(Option<A>),
    /// Pixel data is encapsulated,
    /// with an optional reader and writer for its frames.
    /// The data set can be read and written without either of them,
    /// with pixel data kept in its encapsulated form.
    EncapsulatedPixelData(Option<R>, Option<W>),
}

/// An alias for a transfer syntax specifier with no pixel data encapsulation
/// nor data set deflating.
pub type AdapterFreeTransferSyntax = TransferSyntax<NeverAdapter, NeverPixelAdapter, NeverPixelAdapter>;

/// A writer which requires an explicit end of stream,
/// such as a compressor.
pub trait FinishWrite: Write {
    /// Flush any pending output and write the end of the stream,
    /// without closing the underlying writer.
    ///
    /// This must be called exactly once,
    /// after which no other bytes may be written.
    fn finish(&mut self) -> io::Result<()>;
}

/// An adapter of byte read and write streams,
/// applied to everything after the file meta group.
pub trait DataRWAdapter {
    /// Adapt a byte reader.
    fn adapt_reader<'r>(&self, reader: Box<dyn Read + 'r>) -> Box<dyn Read + 'r>;

    /// Adapt a byte writer.
    fn adapt_writer<'w>(&self, writer: Box<dyn Write + 'w>) -> Box<dyn FinishWrite + 'w>;
}

/// Alias type for a dynamically dispatched data adapter.
pub type DynDataRWAdapter = Box<dyn DataRWAdapter + Send + Sync>;

impl<T: ?Sized> DataRWAdapter for Box<T>
where
    T: DataRWAdapter,
{
    fn adapt_reader<'r>(&self, reader: Box<dyn Read + 'r>) -> Box<dyn Read + 'r> {
        (**self).adapt_reader(reader)
    }

    fn adapt_writer<'w>(&self, writer: Box<dyn Write + 'w>) -> Box<dyn FinishWrite + 'w> {
        (**self).adapt_writer(writer)
    }
}

/** An immaterial type representing an adapter which is never required,
 * and as such is never instantiated. Most transfer syntaxes use this,
 * as they do not have to adapt readers and writers for encoding and decoding.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NeverAdapter {}

impl DataRWAdapter for NeverAdapter {
    fn adapt_reader<'r>(&self, _reader: Box<dyn Read + 'r>) -> Box<dyn Read + 'r> {
        match *self {}
    }

    fn adapt_writer<'w>(&self, _writer: Box<dyn Write + 'w>) -> Box<dyn FinishWrite + 'w> {
        match *self {}
    }
}

impl<A, R, W> TransferSyntax<A, R, W> {
    /** Create a new transfer syntax descriptor.
     *
     * Note that only transfer syntax implementors are expected to construct
     * TS descriptors from scratch. For a practical usage of transfer syntaxes,
     * one should look up an existing transfer syntax registry by UID.
     */
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        codec: Codec<A, R, W>,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            codec,
        }
    }

    /// Create a new descriptor
    /// for a transfer syntax in explicit VR little endian.
    pub const fn new_ele(uid: &'static str, name: &'static str, codec: Codec<A, R, W>) -> Self {
        TransferSyntax::new(uid, name, Endianness::Little, true, codec)
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Whether the value representation is written in attribute headers.
    pub const fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Obtain this transfer syntax' codec specification.
    pub fn codec(&self) -> &Codec<A, R, W> {
        &self.codec
    }

    /// Check whether no codecs are required for this transfer syntax,
    /// meaning that pixel data is native.
    pub fn is_codec_free(&self) -> bool {
        matches!(self.codec, Codec::None)
    }

    /// Whether everything after the file meta group
    /// goes through a data set adapter (such as deflate).
    pub fn is_deflated(&self) -> bool {
        matches!(self.codec, Codec::Dataset(_))
    }

    /// Whether the data set itself cannot be read or written
    /// with this build, because its adapter is missing.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.codec, Codec::Dataset(None))
    }

    /// Whether pixel data is encapsulated in fragments.
    pub fn is_encapsulated_pixel_data(&self) -> bool {
        matches!(self.codec, Codec::EncapsulatedPixelData(..))
    }

    /// Obtain the data set adapter, if any.
    pub fn data_adapter(&self) -> Option<&A> {
        match &self.codec {
            Codec::Dataset(a) => a.as_ref(),
            _ => None,
        }
    }

    /// Obtain the header decoder for this transfer syntax,
    /// resolving implicit value representations with the given dictionary.
    ///
    /// The resulting decoder does not consider pixel data encapsulation or
    /// data set compression rules. This means that the consumer of this method
    /// needs to adapt the reader before using the decoder.
    pub fn header_decoder<D>(&self, dict: D) -> Option<HeaderDecoder<D>>
    where
        D: DataDictionary,
    {
        HeaderDecoder::new(self.explicit_vr, self.byte_order, dict)
    }

    /// Obtain the header encoder for this transfer syntax.
    /// The resulting encoder does not consider pixel data encapsulation or
    /// data set compression rules.
    pub fn header_encoder(&self) -> Option<HeaderEncoder> {
        HeaderEncoder::new(self.explicit_vr, self.byte_order)
    }

    /// Obtain a dynamic basic decoder, based on this transfer syntax' expected endianness.
    pub fn basic_decoder(&self) -> BasicDecoder {
        BasicDecoder::from(self.endianness())
    }

    /// Obtain a dynamic basic encoder, based on this transfer syntax' expected endianness.
    pub fn basic_encoder(&self) -> BasicEncoder {
        BasicEncoder::from(self.endianness())
    }

    /// Type-erase the pixel data or data set codec.
    pub fn erased(self) -> TransferSyntax
    where
        A: DataRWAdapter + Send + Sync + 'static,
        R: PixelDataReader + Send + Sync + 'static,
        W: PixelDataWriter + Send + Sync + 'static,
    {
        let codec = match self.codec {
            Codec::None => Codec::None,
            Codec::Dataset(a) => Codec::Dataset(a.map(|a| Box::new(a) as DynDataRWAdapter)),
            Codec::EncapsulatedPixelData(r, w) => Codec::EncapsulatedPixelData(
                r.map(|r| Box::new(r) as DynPixelDataReader),
                w.map(|w| Box::new(w) as DynPixelDataWriter),
            ),
        };

        TransferSyntax {
            uid: self.uid,
            name: self.name,
            byte_order: self.byte_order,
            explicit_vr: self.explicit_vr,
            codec,
        }
    }
}

impl TransferSyntax {
    /// Obtain the pixel data reader of this transfer syntax, if available.
    pub fn pixel_data_reader(&self) -> Option<&dyn PixelDataReader> {
        match &self.codec {
            Codec::EncapsulatedPixelData(Some(r), _) => Some(&**r),
            _ => None,
        }
    }

    /// Obtain the pixel data writer of this transfer syntax, if available.
    pub fn pixel_data_writer(&self) -> Option<&dyn PixelDataWriter> {
        match &self.codec {
            Codec::EncapsulatedPixelData(_, Some(w)) => Some(&**w),
            _ => None,
        }
    }
}
