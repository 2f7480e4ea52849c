//! Core module for building pixel data adapters.
//!
//! This module contains the core types and traits
//! for consumers and implementers of
//! transfer syntaxes with encapsulated pixel data.
//!
//! Adapters work one frame at a time.
//! Transfer syntaxes which define an encapsulated pixel data encoding
//! need to provide suitable implementations of
//! [`PixelDataReader`] and [`PixelDataWriter`]
//! to be able to decode and encode imaging data, respectively.

use snafu::Snafu;
use std::borrow::Cow;

/// The possible error conditions when decoding (reading) pixel data.
///
/// Users of this type are free to handle errors based on their variant,
/// but should not make decisions based on the display message,
/// since that is not considered part of the API
/// and may change on any new release.
///
/// Implementers of transfer syntaxes
/// are recommended to choose the most fitting error variant
/// for the tested condition.
/// When no suitable variant is available,
/// the [`Custom`](DecodeError::Custom) variant may be used.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub), module)]
pub enum DecodeError {
    /// A custom error occurred when decoding,
    /// reported as a dynamic error value with a message.
    ///
    /// The [`whatever!`](snafu::whatever) macro can be used
    /// to easily create an error of this kind.
    #[snafu(whatever, display("{}", message))]
    Custom {
        /// The error message.
        message: String,
        /// The underlying error cause, if any.
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync + 'static>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// A required attribute is missing
    /// from the object representing the image.
    #[snafu(display("Missing required attribute `{}`", name))]
    MissingAttribute { name: &'static str },

    /// An image attribute has a value which the adapter does not support.
    #[snafu(display("Unsupported {} `{}`", name, value))]
    UnsupportedAttribute { name: &'static str, value: String },

    /// The encoded frame is shorter than its own structure declares.
    #[snafu(display("Encoded frame is truncated at byte {}", position))]
    TruncatedFrame { position: usize },
}

/// The possible error conditions when encoding (writing) pixel data.
///
/// Users of this type are free to handle errors based on their variant,
/// but should not make decisions based on the display message,
/// since that is not considered part of the API
/// and may change on any new release.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub), module)]
pub enum EncodeError {
    /// A custom error when encoding fails.
    /// Read the `message` and the underlying `source`
    /// for more details.
    #[snafu(whatever, display("{}", message))]
    Custom {
        /// The error message.
        message: String,
        /// The underlying error cause, if any.
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync + 'static>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// A required attribute is missing
    /// from the object representing the image.
    #[snafu(display("Missing required attribute `{}`", name))]
    MissingAttribute { name: &'static str },

    /// An image attribute has a value which the adapter does not support.
    #[snafu(display("Unsupported {} `{}`", name, value))]
    UnsupportedAttribute { name: &'static str, value: String },

    /// The frame given to the encoder does not have the expected size.
    #[snafu(display("Frame has {} bytes, expected {}", actual, expected))]
    FrameLength { actual: usize, expected: usize },

    /// An encode parameter name is not known.
    #[snafu(display("Unknown encode parameter `{}`", name))]
    UnknownParameter { name: String },
}

/// The result of decoding (reading) pixel data
pub type DecodeResult<T, E = DecodeError> = Result<T, E>;

/// The result of encoding (writing) pixel data
pub type EncodeResult<T, E = EncodeError> = Result<T, E>;

/// An object trait to be interpreted as pixel data.
///
/// It provides the image attributes that frame codecs need.
/// It is defined in this crate so that
/// transfer syntax implementers only have to depend on `dcmio-encoding`.
pub trait PixelDataObject {
    /// Return the _Rows_, or `None` if it is not found
    fn rows(&self) -> Option<u16>;

    /// Return the _Columns_, or `None` if it is not found
    fn cols(&self) -> Option<u16>;

    /// Return the _Samples Per Pixel_, or `None` if it is not found
    fn samples_per_pixel(&self) -> Option<u16>;

    /// Return the _Bits Allocated_, or `None` if it is not defined
    fn bits_allocated(&self) -> Option<u16>;

    /// Return the _Bits Stored_, or `None` if it is not defined
    fn bits_stored(&self) -> Option<u16>;

    /// Return the _Pixel Representation_ (0 unsigned, 1 signed),
    /// or `None` if it is not defined
    fn pixel_representation(&self) -> Option<u16>;

    /// Return the _Photometric Interpretation_,
    /// or `None` if it is not defined
    fn photometric_interpretation(&self) -> Option<&str>;

    /// Return the _Planar Configuration_, or `None` if it is not defined
    fn planar_configuration(&self) -> Option<u16>;

    /// Return the _Number Of Frames_, or `None` if it is not defined
    fn number_of_frames(&self) -> Option<u32>;
}

/// Custom options when encoding pixel data into an encapsulated form.
///
/// Besides the typed fields,
/// options can be set by their parameter name
/// with [`set_param`](EncodeOptions::set_param).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct EncodeOptions {
    /// The quality of the output image as a number between 0 and 100,
    /// where 100 is the best quality that the encapsulated form can achieve
    /// and smaller values represent smaller data size
    /// with an increasingly higher error.
    /// It is ignored if the transfer syntax only supports lossless compression.
    ///
    /// If this option is not specified,
    /// the output quality is decided automatically by the underlying adapter.
    pub quality: Option<u8>,

    /// The amount of effort that the encoder may take to encode the pixel data,
    /// as a number between 0 and 100.
    /// Encoders are not required to support this option.
    pub effort: Option<u8>,

    /// The maximum tolerated absolute difference per sample
    /// between the original and the decompressed frame.
    /// When set, every compressed frame is decompressed again and verified.
    pub max_pixel_value_error: Option<u32>,

    /// The side of the square blocks whose average difference
    /// is compared against `max_pixel_value_error`.
    /// A value of 1 compares each sample.
    pub avg_pixel_value_block_size: u32,

    /// The sample depth to compress at,
    /// for codecs supporting fewer bits than allocated.
    pub bits_compressed: Option<u16>,

    /// The compression ratio to aim for, for lossy codecs that support it.
    pub compression_ratio: Option<f64>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            quality: None,
            effort: None,
            max_pixel_value_error: None,
            avg_pixel_value_block_size: 1,
            bits_compressed: None,
            compression_ratio: None,
        }
    }
}

impl EncodeOptions {
    /// Create the default set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output quality.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Set the encoding effort.
    pub fn effort(mut self, effort: u8) -> Self {
        self.effort = Some(effort);
        self
    }

    /// Enable verification against the given maximum sample error.
    pub fn max_pixel_value_error(mut self, max_error: u32) -> Self {
        self.max_pixel_value_error = Some(max_error);
        self
    }

    /// Set the block size for averaged verification.
    pub fn avg_pixel_value_block_size(mut self, size: u32) -> Self {
        self.avg_pixel_value_block_size = size.max(1);
        self
    }

    /// Set the number of bits to compress.
    pub fn bits_compressed(mut self, bits: u16) -> Self {
        self.bits_compressed = Some(bits);
        self
    }

    /// Set the target compression ratio.
    pub fn compression_ratio(mut self, ratio: f64) -> Self {
        self.compression_ratio = Some(ratio);
        self
    }

    /// Set an option by its parameter name:
    /// `maxPixelValueError`, `avgPixelValueBlockSize`, `bitsCompressed`,
    /// `compressionRatio`, `quality` or `effort`.
    pub fn set_param(&mut self, name: &str, value: f64) -> EncodeResult<()> {
        match name {
            "maxPixelValueError" => self.max_pixel_value_error = Some(value.max(0.) as u32),
            "avgPixelValueBlockSize" => self.avg_pixel_value_block_size = (value as u32).max(1),
            "bitsCompressed" => self.bits_compressed = Some(value as u16),
            "compressionRatio" => self.compression_ratio = Some(value),
            "quality" => self.quality = Some(value.clamp(0., 100.) as u8),
            "effort" => self.effort = Some(value.clamp(0., 100.) as u8),
            _ => {
                return encode_error::UnknownParameterSnafu { name }.fail();
            }
        }
        Ok(())
    }
}

/// Trait object responsible for decoding
/// pixel data frames based on the transfer syntax.
///
/// A transfer syntax with support for decoding encapsulated pixel data
/// would implement these methods.
pub trait PixelDataReader {
    /// Decode a single encoded frame
    /// (the concatenation of its fragments)
    /// into native pixel data in little endian,
    /// appending these bytes to the given vector `dst`.
    ///
    /// The output follows the image properties of the given object
    /// _save for the photometric interpretation and planar configuration_:
    /// samples of a pixel are contiguous in memory
    /// (planar configuration of 0).
    fn decode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()>;

    /// Correct known quirks of encoded frames before decoding.
    /// The default implementation leaves the input untouched.
    fn patch_input<'a>(&self, frame_data: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Borrowed(frame_data)
    }
}

/// Trait object responsible for encoding
/// pixel data frames based on a certain transfer syntax.
///
/// A transfer syntax with support for creating compressed pixel data
/// would implement these methods.
pub trait PixelDataWriter {
    /// Encode a single native frame in little endian,
    /// with samples of a pixel contiguous in memory,
    /// appending the encoded bytes to `dst`.
    ///
    /// The image properties are read from `src`.
    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: &[u8],
        options: &EncodeOptions,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()>;

    /// Correct known quirks of an encoded frame
    /// after `encode_frame` has written it to `dst`.
    /// The default implementation does nothing.
    fn patch_output(&self, _dst: &mut Vec<u8>) {}
}

impl<T: ?Sized> PixelDataReader for Box<T>
where
    T: PixelDataReader,
{
    fn decode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame_data: &[u8],
        dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        (**self).decode_frame(src, frame_data, dst)
    }

    fn patch_input<'a>(&self, frame_data: &'a [u8]) -> Cow<'a, [u8]> {
        (**self).patch_input(frame_data)
    }
}

impl<T: ?Sized> PixelDataWriter for Box<T>
where
    T: PixelDataWriter,
{
    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: &[u8],
        options: &EncodeOptions,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        (**self).encode_frame(src, frame, options, dst)
    }

    fn patch_output(&self, dst: &mut Vec<u8>) {
        (**self).patch_output(dst)
    }
}

/// Alias type for a dynamically dispatched pixel data reader.
pub type DynPixelDataReader = Box<dyn PixelDataReader + Send + Sync + 'static>;

/// Alias type for a dynamically dispatched pixel data writer.
pub type DynPixelDataWriter = Box<dyn PixelDataWriter + Send + Sync + 'static>;

/// An immaterial type representing a pixel data adapter which is never required,
/// and as such is never instantiated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NeverPixelAdapter {}

impl PixelDataReader for NeverPixelAdapter {
    fn decode_frame(
        &self,
        _src: &dyn PixelDataObject,
        _frame_data: &[u8],
        _dst: &mut Vec<u8>,
    ) -> DecodeResult<()> {
        match *self {}
    }
}

impl PixelDataWriter for NeverPixelAdapter {
    fn encode_frame(
        &self,
        _src: &dyn PixelDataObject,
        _frame: &[u8],
        _options: &EncodeOptions,
        _dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::EncodeOptions;

    #[test]
    fn encode_options_by_name() {
        let mut options = EncodeOptions::new();
        assert_eq!(options.avg_pixel_value_block_size, 1);
        options.set_param("maxPixelValueError", 2.).unwrap();
        options.set_param("avgPixelValueBlockSize", 4.).unwrap();
        options.set_param("compressionRatio", 7.5).unwrap();
        assert_eq!(options.max_pixel_value_error, Some(2));
        assert_eq!(options.avg_pixel_value_block_size, 4);
        assert_eq!(options.compression_ratio, Some(7.5));
        assert!(options.set_param("noSuchThing", 1.).is_err());

        let built = EncodeOptions::new().quality(90).bits_compressed(12);
        assert_eq!(built.quality, Some(90));
        assert_eq!(built.bits_compressed, Some(12));
    }
}
