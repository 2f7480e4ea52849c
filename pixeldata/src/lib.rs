//! Pixel data handling of the `dcmio` codec.
//!
//! This crate sits on top of the stream reader and writer
//! and the frame codecs of the transfer syntax registry.
//! It provides:
//!
//! - [`ImageDescriptor`], the image pixel description of a data set;
//! - [`Decompressor`] and [`Compressor`],
//!   which turn single frames from and into an encapsulated encoding
//!   and check the fidelity of lossy compression;
//! - [`decompress_tree`] and [`compress_tree`],
//!   for attribute trees already held in memory;
//! - [`Transcoder`], which converts a whole data stream
//!   to another transfer syntax frame by frame,
//!   without holding the pixel data in memory.
//!
//! # Example
//!
//! ```no_run
//! use dcmio_dictionary_std::uids;
//! use dcmio_parser::ReadOptions;
//! use dcmio_pixeldata::{TranscodeOptions, Transcoder};
//!
//! let reader = ReadOptions::new().open_file("ct.dcm")?;
//! let mut transcoder = Transcoder::new(reader, uids::RLE_LOSSLESS, TranscodeOptions::new())?;
//! transcoder.transcode(std::fs::File::create("ct-rle.dcm")?)?;
//! transcoder.close();
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

pub mod attribute;
pub mod codec;
pub mod descriptor;
pub mod frame;
pub mod lut;
pub mod photometric;
pub mod transcode;
pub mod ts_type;

pub use attribute::{GetAttributeError, PixelRepresentation};
pub use codec::{compress_tree, decompress_tree, Compressor, Decompressor};
pub use descriptor::ImageDescriptor;
pub use lut::{CreateLutError, PaletteLut};
pub use photometric::PhotometricInterpretation;
pub use transcode::{TranscodeOptions, TranscodeState, Transcoder};
pub use ts_type::TransferSyntaxType;
