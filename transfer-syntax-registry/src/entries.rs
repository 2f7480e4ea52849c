//! A list of compiled transfer syntax specifiers.
//!
//! The constants exported here refer to the library's built-in support
//! for transfer syntaxes.
//!
//! - **Fully implemented** means that the registry
//!   provides built-in support for reading and writing data sets,
//!   as well as for encoding and decoding encapsulated pixel data,
//!   if applicable.
//! - When specified as **Implemented**,
//!   the transfer syntax is supported to some extent
//!   (usually decoding is supported but not encoding).
//! - **Stub descriptors** serve to provide information about
//!   the transfer syntax.
//!   Data sets can be read and written,
//!   but encapsulated pixel data cannot be encoded or decoded.

use crate::adapters::uncompressed::UncompressedAdapter;
use crate::create_ts_stub;
use byteordered::Endianness;
use dcmio_encoding::adapters::NeverPixelAdapter;
use dcmio_encoding::transfer_syntax::{AdapterFreeTransferSyntax as Ts, Codec};
use dcmio_encoding::transfer_syntax::{NeverAdapter, TransferSyntax};

#[cfg(feature = "jpeg")]
use crate::adapters::jpeg::JpegAdapter;
#[cfg(feature = "rle")]
use crate::adapters::rle_lossless::RleLosslessAdapter;
#[cfg(feature = "deflate")]
use crate::deflate::FlateAdapter;

// -- the three base transfer syntaxes, fully supported --

/// **Fully implemented:** Implicit VR Little Endian: Default Transfer Syntax
pub const IMPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    Codec::None,
);

/// **Fully implemented:** Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: Ts =
    Ts::new_ele("1.2.840.10008.1.2.1", "Explicit VR Little Endian", Codec::None);

/// **Fully implemented:** Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    Codec::None,
);

/// **Fully implemented:** Encapsulated Uncompressed Explicit VR Little Endian
pub const ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax<
    NeverAdapter,
    UncompressedAdapter,
    UncompressedAdapter,
> = TransferSyntax::new_ele(
    "1.2.840.10008.1.2.1.98",
    "Encapsulated Uncompressed Explicit VR Little Endian",
    Codec::EncapsulatedPixelData(Some(UncompressedAdapter), Some(UncompressedAdapter)),
);

// -- deflated data sets --

/// **Fully implemented**: Deflated Explicit VR Little Endian
#[cfg(feature = "deflate")]
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax<
    FlateAdapter,
    NeverPixelAdapter,
    NeverPixelAdapter,
> = TransferSyntax::new_ele(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Codec::Dataset(Some(FlateAdapter)),
);

/// **Stub descriptor:** Deflated Explicit VR Little Endian
#[cfg(not(feature = "deflate"))]
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new_ele(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Codec::Dataset(None),
);

/// **Fully implemented**: JPIP Referenced Deflate
#[cfg(feature = "deflate")]
pub const JPIP_REFERENCED_DEFLATE: TransferSyntax<
    FlateAdapter,
    NeverPixelAdapter,
    NeverPixelAdapter,
> = TransferSyntax::new_ele(
    "1.2.840.10008.1.2.4.95",
    "JPIP Referenced Deflate",
    Codec::Dataset(Some(FlateAdapter)),
);

/// **Stub descriptor:** JPIP Referenced Deflate
#[cfg(not(feature = "deflate"))]
pub const JPIP_REFERENCED_DEFLATE: Ts = Ts::new_ele(
    "1.2.840.10008.1.2.4.95",
    "JPIP Referenced Deflate",
    Codec::Dataset(None),
);

// -- run-length encoding --

/// **Fully implemented**: RLE Lossless
#[cfg(feature = "rle")]
pub const RLE_LOSSLESS: TransferSyntax<NeverAdapter, RleLosslessAdapter, RleLosslessAdapter> =
    TransferSyntax::new_ele(
        "1.2.840.10008.1.2.5",
        "RLE Lossless",
        Codec::EncapsulatedPixelData(Some(RleLosslessAdapter), Some(RleLosslessAdapter)),
    );

/// **Stub descriptor:** RLE Lossless
#[cfg(not(feature = "rle"))]
pub const RLE_LOSSLESS: Ts = create_ts_stub("1.2.840.10008.1.2.5", "RLE Lossless");

// -- JPEG --

#[cfg(feature = "jpeg")]
type JpegTs<W = JpegAdapter> = TransferSyntax<NeverAdapter, JpegAdapter, W>;

/// Create a JPEG transfer syntax with decoding support only.
#[cfg(feature = "jpeg")]
const fn create_ts_jpeg_decoder(uid: &'static str, name: &'static str) -> JpegTs<NeverPixelAdapter> {
    TransferSyntax::new_ele(uid, name, Codec::EncapsulatedPixelData(Some(JpegAdapter), None))
}

/// **Fully implemented:** JPEG Baseline (Process 1):
/// Default Transfer Syntax for Lossy JPEG 8 Bit Image Compression
#[cfg(feature = "jpeg")]
pub const JPEG_BASELINE: JpegTs = TransferSyntax::new_ele(
    "1.2.840.10008.1.2.4.50",
    "JPEG Baseline (Process 1)",
    Codec::EncapsulatedPixelData(Some(JpegAdapter), Some(JpegAdapter)),
);

/// **Stub descriptor:** JPEG Baseline (Process 1)
#[cfg(not(feature = "jpeg"))]
pub const JPEG_BASELINE: Ts = create_ts_stub("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");

/// **Implemented:** JPEG Extended (Process 2 & 4)
#[cfg(feature = "jpeg")]
pub const JPEG_EXTENDED: JpegTs<NeverPixelAdapter> =
    create_ts_jpeg_decoder("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");

/// **Stub descriptor:** JPEG Extended (Process 2 & 4)
#[cfg(not(feature = "jpeg"))]
pub const JPEG_EXTENDED: Ts =
    create_ts_stub("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");

/// **Stub descriptor:** JPEG Spectral Selection, Non-Hierarchical (Process 6 & 8)
pub const JPEG_SPECTRAL_SELECTION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.53",
    "JPEG Spectral Selection, Non-Hierarchical (Process 6 & 8)",
);

/// **Implemented:** JPEG Full Progression, Non-Hierarchical (Process 10 & 12)
#[cfg(feature = "jpeg")]
pub const JPEG_FULL_PROGRESSION: JpegTs<NeverPixelAdapter> = create_ts_jpeg_decoder(
    "1.2.840.10008.1.2.4.55",
    "JPEG Full Progression, Non-Hierarchical (Process 10 & 12)",
);

/// **Stub descriptor:** JPEG Full Progression, Non-Hierarchical (Process 10 & 12)
#[cfg(not(feature = "jpeg"))]
pub const JPEG_FULL_PROGRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.55",
    "JPEG Full Progression, Non-Hierarchical (Process 10 & 12)",
);

/// **Implemented:** JPEG Lossless, Non-Hierarchical (Process 14)
#[cfg(feature = "jpeg")]
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: JpegTs<NeverPixelAdapter> = create_ts_jpeg_decoder(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
);

/// **Stub descriptor:** JPEG Lossless, Non-Hierarchical (Process 14)
#[cfg(not(feature = "jpeg"))]
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
);

/// **Implemented:** JPEG Lossless, Non-Hierarchical, First-Order Prediction
/// (Process 14 [Selection Value 1]):
/// Default Transfer Syntax for Lossless JPEG Image Compression
#[cfg(feature = "jpeg")]
pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: JpegTs<NeverPixelAdapter> =
    create_ts_jpeg_decoder(
        "1.2.840.10008.1.2.4.70",
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    );

/// **Stub descriptor:** JPEG Lossless, Non-Hierarchical, First-Order Prediction
#[cfg(not(feature = "jpeg"))]
pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
);

// --- stubs ---

/// **Stub descriptor:** JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
);

/// **Stub descriptor:** JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
);

/// **Stub descriptor:** JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
);

/// **Stub descriptor:** JPEG 2000 Image Compression
pub const JPEG_2000_IMAGE_COMPRESSION: Ts =
    create_ts_stub("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression");

/// **Stub descriptor:** JPEG 2000 Part 2 Multi-component Image Compression (Lossless Only)
pub const JPEG_2000_PART2_MULTI_COMPONENT_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.92",
    "JPEG 2000 Part 2 Multi-component Image Compression (Lossless Only)",
);

/// **Stub descriptor:** JPEG 2000 Part 2 Multi-component Image Compression
pub const JPEG_2000_PART2_MULTI_COMPONENT_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.93",
    "JPEG 2000 Part 2 Multi-component Image Compression",
);

/// **Stub descriptor:** JPIP Referenced
pub const JPIP_REFERENCED: Ts = create_ts_stub("1.2.840.10008.1.2.4.94", "JPIP Referenced");

/// **Stub descriptor:** MPEG2 Main Profile / Main Level
pub const MPEG2_MAIN_PROFILE_MAIN_LEVEL: Ts =
    create_ts_stub("1.2.840.10008.1.2.4.100", "MPEG2 Main Profile / Main Level");

/// **Stub descriptor:** MPEG2 Main Profile / High Level
pub const MPEG2_MAIN_PROFILE_HIGH_LEVEL: Ts =
    create_ts_stub("1.2.840.10008.1.2.4.101", "MPEG2 Main Profile / High Level");

/// **Stub descriptor:** MPEG-4 AVC/H.264 High Profile / Level 4.1
pub const MPEG4_AVC_H264_HIGH_PROFILE: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.102",
    "MPEG-4 AVC/H.264 High Profile / Level 4.1",
);

/// **Stub descriptor:** HEVC/H.265 Main Profile / Level 5.1
pub const HEVC_H265_MAIN_PROFILE: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.107",
    "HEVC/H.265 Main Profile / Level 5.1",
);

/// **Stub descriptor:** High-Throughput JPEG 2000 Image Compression (Lossless Only)
pub const HIGH_THROUGHPUT_JPEG_2000_LOSSLESS_ONLY: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.201",
    "High-Throughput JPEG 2000 Image Compression (Lossless Only)",
);

/// **Stub descriptor:** High-Throughput JPEG 2000 with RPCL Options Image Compression (Lossless Only)
pub const HIGH_THROUGHPUT_JPEG_2000_WITH_RPCL_OPTIONS_LOSSLESS_ONLY: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.202",
    "High-Throughput JPEG 2000 with RPCL Options Image Compression (Lossless Only)",
);

/// **Stub descriptor:** High-Throughput JPEG 2000 Image Compression
pub const HIGH_THROUGHPUT_JPEG_2000: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.203",
    "High-Throughput JPEG 2000 Image Compression",
);
