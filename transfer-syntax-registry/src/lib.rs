//! This crate contains the transfer syntax registry.
//! The transfer syntax registry maps the UID of a transfer syntax into the
//! respective transfer syntax specifier,
//! including the data set and frame codecs built into this crate.
//!
//! Which codecs are available depends on Cargo features:
//!
//! - `deflate`: Deflated Explicit VR Little Endian, via `flate2`;
//! - `rle`: RLE Lossless decoding and encoding;
//! - `jpeg`: JPEG baseline decoding and encoding,
//!   plus decoding of the extended and lossless processes.
//!
//! All of them are enabled by the default feature `native`.
//! Transfer syntaxes without a codec in this build are still registered,
//! so that data sets using them can be read and written
//! with pixel data in encapsulated form.

pub mod adapters;
#[cfg(feature = "deflate")]
pub mod deflate;
pub mod entries;

use byteordered::Endianness;
use dcmio_encoding::transfer_syntax::{
    AdapterFreeTransferSyntax, Codec, TransferSyntax, TransferSyntaxIndex,
};
use lazy_static::lazy_static;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// Main implementation of a registry of transfer syntaxes.
///
/// Consumers would generally use [`TransferSyntaxRegistry`] instead.
pub struct TransferSyntaxRegistryImpl {
    m: HashMap<&'static str, TransferSyntax>,
}

impl fmt::Debug for TransferSyntaxRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: HashMap<&str, &str> =
            self.m.iter().map(|(uid, ts)| (*uid, ts.name())).collect();
        f.debug_struct("TransferSyntaxRegistryImpl")
            .field("m", &entries)
            .finish()
    }
}

impl TransferSyntaxRegistryImpl {
    /// Obtain an iterator of all registered transfer syntaxes.
    pub fn iter(&self) -> impl Iterator<Item = &TransferSyntax> {
        self.m.values()
    }

    /// Obtain a transfer syntax by its UID.
    fn get<U: AsRef<str>>(&self, uid: U) -> Option<&TransferSyntax> {
        let ts_uid = uid.as_ref().trim_end_matches(|c: char| c == '\0' || c == ' ');
        self.m.get(ts_uid)
    }

    /// Register the given transfer syntax (TS) to the system. It can override
    /// another TS with the same UID, in the only case that the TS provides
    /// codecs which the previously registered TS does not.
    /// If no such improvement is offered, this function returns `false`
    /// and no changes are made.
    fn register(&mut self, ts: TransferSyntax) -> bool {
        match self.m.entry(ts.uid()) {
            Entry::Occupied(mut e) => {
                let replace = match (e.get().codec(), ts.codec()) {
                    (Codec::Dataset(None), Codec::Dataset(Some(_))) => true,
                    (
                        Codec::EncapsulatedPixelData(None, None),
                        Codec::EncapsulatedPixelData(..),
                    ) => true,
                    (
                        Codec::EncapsulatedPixelData(Some(_), None),
                        Codec::EncapsulatedPixelData(Some(_), Some(_)),
                    ) => true,
                    (
                        Codec::EncapsulatedPixelData(None, Some(_)),
                        Codec::EncapsulatedPixelData(Some(_), Some(_)),
                    ) => true,
                    _ => false,
                };

                if replace {
                    e.insert(ts);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(e) => {
                e.insert(ts);
                true
            }
        }
    }
}

impl TransferSyntaxIndex for TransferSyntaxRegistryImpl {
    #[inline]
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        Self::get(self, uid)
    }
}

/// Zero-sized representative of the main transfer syntax registry.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxRegistry {
    /// Obtain an iterator of all registered transfer syntaxes.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TransferSyntax> {
        get_registry().iter()
    }
}

impl TransferSyntaxIndex for TransferSyntaxRegistry {
    #[inline]
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        get_registry().get(uid)
    }
}

lazy_static! {
    static ref REGISTRY: TransferSyntaxRegistryImpl = {
        let mut registry = TransferSyntaxRegistryImpl { m: HashMap::new() };
        initialize_codecs(&mut registry);
        registry
    };
}

/// Retrieve a reference to the global codec registry.
#[inline]
pub(crate) fn get_registry() -> &'static TransferSyntaxRegistryImpl {
    &REGISTRY
}

/// Retrieve the default transfer syntax.
pub fn default() -> AdapterFreeTransferSyntax {
    entries::IMPLICIT_VR_LITTLE_ENDIAN
}

fn initialize_codecs(registry: &mut TransferSyntaxRegistryImpl) {
    use self::entries::*;

    // codec-free transfer syntaxes
    registry.register(IMPLICIT_VR_LITTLE_ENDIAN.erased());
    registry.register(EXPLICIT_VR_LITTLE_ENDIAN.erased());
    registry.register(EXPLICIT_VR_BIG_ENDIAN.erased());

    registry.register(DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN.erased());
    registry.register(JPIP_REFERENCED_DEFLATE.erased());

    registry.register(ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN.erased());
    registry.register(RLE_LOSSLESS.erased());

    registry.register(JPEG_BASELINE.erased());
    registry.register(JPEG_EXTENDED.erased());
    registry.register(JPEG_SPECTRAL_SELECTION.erased());
    registry.register(JPEG_FULL_PROGRESSION.erased());
    registry.register(JPEG_LOSSLESS_NON_HIERARCHICAL.erased());
    registry.register(JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION.erased());

    // stubs: pixel data is kept encapsulated
    registry.register(JPEG_LS_LOSSLESS_IMAGE_COMPRESSION.erased());
    registry.register(JPEG_LS_LOSSY_IMAGE_COMPRESSION.erased());
    registry.register(JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY.erased());
    registry.register(JPEG_2000_IMAGE_COMPRESSION.erased());
    registry.register(JPEG_2000_PART2_MULTI_COMPONENT_IMAGE_COMPRESSION_LOSSLESS_ONLY.erased());
    registry.register(JPEG_2000_PART2_MULTI_COMPONENT_IMAGE_COMPRESSION.erased());
    registry.register(JPIP_REFERENCED.erased());
    registry.register(MPEG2_MAIN_PROFILE_MAIN_LEVEL.erased());
    registry.register(MPEG2_MAIN_PROFILE_HIGH_LEVEL.erased());
    registry.register(MPEG4_AVC_H264_HIGH_PROFILE.erased());
    registry.register(HEVC_H265_MAIN_PROFILE.erased());
    registry.register(HIGH_THROUGHPUT_JPEG_2000_LOSSLESS_ONLY.erased());
    registry.register(HIGH_THROUGHPUT_JPEG_2000_WITH_RPCL_OPTIONS_LOSSLESS_ONLY.erased());
    registry.register(HIGH_THROUGHPUT_JPEG_2000.erased());
}

/// create a TS with an unsupported pixel encapsulation
pub(crate) const fn create_ts_stub(
    uid: &'static str,
    name: &'static str,
) -> AdapterFreeTransferSyntax {
    TransferSyntax::new(
        uid,
        name,
        Endianness::Little,
        true,
        Codec::EncapsulatedPixelData(None, None),
    )
}
