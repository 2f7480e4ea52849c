//! Writing attribute trees to a byte stream.
//!
//! A [`StreamWriter`] serializes attribute trees
//! in the encoding of a given transfer syntax.
//! Lengths of sequences and items are defined or undefined
//! as chosen by the [`EncodingOptions`].
//! For a deflated transfer syntax,
//! everything after the file meta group goes through the compressor,
//! which is flushed by [`finish`](StreamWriter::finish).
use crate::stateful::encode::{Error as EncoderError, StatefulEncoder};
use dcmio_core::header::{DataElementHeader, Length, VrFamily};
use dcmio_core::tree::{Attribute, AttributeTree};
use dcmio_core::util::{even, toggle_endian};
use dcmio_core::value::{BulkData, Fragment, Value};
use dcmio_core::{Tag, VR};
use dcmio_dictionary_std::tags;
use dcmio_encoding::text::{EncodeTextError, SpecificCharacterSet, TextCodec};
use dcmio_encoding::transfer_syntax::{Endianness, TransferSyntax, TransferSyntaxIndex};
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// The registry used when writers are created from a UID alone.
static REGISTRY: TransferSyntaxRegistry = TransferSyntaxRegistry;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Could not create file '{}'", filename.display()))]
    CreateFile {
        filename: PathBuf,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Could not create encoder"))]
    CreateEncoder {
        #[snafu(backtrace)]
        source: EncoderError,
    },
    #[snafu(display("Could not write header of {}", tag))]
    WriteHeader {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncoderError,
    },
    #[snafu(display("Could not write value of {}", tag))]
    WriteValue {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncoderError,
    },
    #[snafu(display("Could not encode text of {}", tag))]
    EncodeText {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncodeTextError,
    },
    #[snafu(display("Bulk data of {} is not in a local file: {}", tag, uri))]
    UnsupportedBulkData {
        tag: Tag,
        uri: String,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read bulk data of {} from '{}'", tag, filename.display()))]
    ReadBulkData {
        tag: Tag,
        filename: PathBuf,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Value of {} is too long to encode ({} bytes)", tag, len))]
    ValueTooLong {
        tag: Tag,
        len: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not finish the output"))]
    Finish {
        #[snafu(backtrace)]
        source: EncoderError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Options deciding how lengths of sequences and items are encoded.
///
/// By default, no group lengths are written,
/// and non-empty sequences and items have undefined length.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct EncodingOptions {
    /// write a group length attribute in front of each group,
    /// which implies defined lengths everywhere
    pub group_length: bool,
    /// encode non-empty sequences with undefined length
    pub undefined_sequence_length: bool,
    /// encode empty sequences with undefined length
    pub undefined_empty_sequence_length: bool,
    /// encode non-empty items with undefined length
    pub undefined_item_length: bool,
    /// encode empty items with undefined length
    pub undefined_empty_item_length: bool,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        EncodingOptions {
            group_length: false,
            undefined_sequence_length: true,
            undefined_empty_sequence_length: false,
            undefined_item_length: true,
            undefined_empty_item_length: false,
        }
    }
}

impl EncodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with defined lengths for all sequences and items.
    pub fn defined_lengths() -> Self {
        EncodingOptions {
            group_length: false,
            undefined_sequence_length: false,
            undefined_empty_sequence_length: false,
            undefined_item_length: false,
            undefined_empty_item_length: false,
        }
    }

    pub fn group_length(mut self, group_length: bool) -> Self {
        self.group_length = group_length;
        self
    }

    pub fn undefined_sequence_length(mut self, undefined: bool) -> Self {
        self.undefined_sequence_length = undefined;
        self
    }

    pub fn undefined_empty_sequence_length(mut self, undefined: bool) -> Self {
        self.undefined_empty_sequence_length = undefined;
        self
    }

    pub fn undefined_item_length(mut self, undefined: bool) -> Self {
        self.undefined_item_length = undefined;
        self
    }

    pub fn undefined_empty_item_length(mut self, undefined: bool) -> Self {
        self.undefined_empty_item_length = undefined;
        self
    }

    fn undefined_sequence(&self, empty: bool) -> bool {
        !self.group_length
            && if empty {
                self.undefined_empty_sequence_length
            } else {
                self.undefined_sequence_length
            }
    }

    fn undefined_item(&self, empty: bool) -> bool {
        !self.group_length
            && if empty {
                self.undefined_empty_item_length
            } else {
                self.undefined_item_length
            }
    }
}

/// The character set of a tree:
/// its own specific character set, or else the one of its parent.
fn charset_of(tree: &AttributeTree, parent: SpecificCharacterSet) -> SpecificCharacterSet {
    match tree.strings(tags::SPECIFIC_CHARACTER_SET) {
        Some(terms) => SpecificCharacterSet::from_terms(terms).unwrap_or_else(|| {
            warn!(
                "Unsupported specific character set {:?}, using the default repertoire",
                terms
            );
            SpecificCharacterSet::Default
        }),
        None => parent,
    }
}

fn to_u32(tag: Tag, len: u64) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) if len != Length::UNDEFINED.0 => Ok(len),
        _ => ValueTooLongSnafu { tag, len }.fail(),
    }
}

/// A writer of attribute trees in the encoding of a transfer syntax.
pub struct StreamWriter<'w> {
    encoder: StatefulEncoder<'w>,
    ts: &'w TransferSyntax,
    options: EncodingOptions,
}

impl std::fmt::Debug for StreamWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("StreamWriter")
            .field("encoder", &self.encoder)
            .field("ts", &self.ts.uid())
            .field("options", &self.options)
            .finish()
    }
}

impl<'w> StreamWriter<'w> {
    /// Create a writer in the given transfer syntax.
    pub fn new<W>(to: W, ts: &'w TransferSyntax) -> Result<Self>
    where
        W: Write + 'w,
    {
        Self::with_options(to, ts, EncodingOptions::default())
    }

    /// Create a writer in the given transfer syntax,
    /// with custom encoding options.
    pub fn with_options<W>(to: W, ts: &'w TransferSyntax, options: EncodingOptions) -> Result<Self>
    where
        W: Write + 'w,
    {
        if ts.is_unsupported() {
            return UnsupportedTransferSyntaxSnafu { uid: ts.uid() }.fail();
        }
        let encoder = StatefulEncoder::new(to, ts.is_explicit_vr(), ts.endianness())
            .context(CreateEncoderSnafu)?;
        Ok(StreamWriter {
            encoder,
            ts,
            options,
        })
    }

    /// Create a writer in the transfer syntax of the given UID,
    /// looked up in the index.
    pub fn with_index<W, I>(to: W, uid: &str, index: &'w I, options: EncodingOptions) -> Result<Self>
    where
        W: Write + 'w,
        I: TransferSyntaxIndex,
    {
        let ts = index
            .get(uid)
            .context(UnsupportedTransferSyntaxSnafu { uid })?;
        Self::with_options(to, ts, options)
    }

    /// Create a writer in the transfer syntax of the given UID,
    /// looked up in the built-in registry.
    pub fn from_uid<W>(to: W, uid: &str, options: EncodingOptions) -> Result<Self>
    where
        W: Write + 'w,
    {
        Self::with_index(to, uid, &REGISTRY, options)
    }

    /// Create a file and write the preamble and magic code to it.
    pub fn create_file<P>(path: P, uid: &str, options: EncodingOptions) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path).context(CreateFileSnafu { filename: path })?;
        let mut writer = Self::from_uid(BufWriter::new(file), uid, options)?;
        writer.write_preamble(None)?;
        Ok(writer)
    }

    /// The transfer syntax of the output.
    pub fn transfer_syntax(&self) -> &TransferSyntax {
        self.ts
    }

    pub fn is_big_endian(&self) -> bool {
        self.ts.endianness() == Endianness::Big
    }

    pub fn is_explicit_vr(&self) -> bool {
        self.ts.is_explicit_vr()
    }

    /// The number of bytes written so far,
    /// before compression.
    pub fn bytes_written(&self) -> u64 {
        self.encoder.bytes_written()
    }

    /// Write the 128 byte preamble (zeros if not given)
    /// followed by the magic code.
    pub fn write_preamble(&mut self, preamble: Option<&[u8]>) -> Result<()> {
        let mut bytes = [0u8; 132];
        if let Some(preamble) = preamble {
            let n = preamble.len().min(128);
            bytes[..n].copy_from_slice(&preamble[..n]);
        }
        bytes[128..].copy_from_slice(b"DICM");
        self.encoder
            .write_raw_bytes(&bytes)
            .context(WriteValueSnafu {
                tag: tags::FILE_META_INFORMATION_GROUP_LENGTH,
            })
    }

    /// Write the file meta group in explicit VR little endian,
    /// preceded by its group length.
    pub fn write_file_meta(&mut self, meta: &AttributeTree) -> Result<()> {
        self.encoder
            .set_mode(true, Endianness::Little)
            .context(CreateEncoderSnafu)?;
        let charset = SpecificCharacterSet::Default;
        let mut group_len = 0u64;
        for (tag, attr) in meta {
            if !tag.is_group_length() {
                group_len += self.element_len(*tag, attr, charset)?;
            }
        }
        let group_len = to_u32(tags::FILE_META_INFORMATION_GROUP_LENGTH, group_len)?;
        self.write_group_length(tags::FILE_META_INFORMATION_GROUP_LENGTH, group_len)?;
        for (tag, attr) in meta {
            if !tag.is_group_length() {
                self.write_element(*tag, attr, meta.is_big_endian(), charset)?;
            }
        }
        self.encoder
            .set_mode(self.ts.is_explicit_vr(), self.ts.endianness())
            .context(CreateEncoderSnafu)
    }

    /// Write the file meta group, if given, followed by the data set.
    pub fn write_dataset(&mut self, meta: Option<&AttributeTree>, tree: &AttributeTree) -> Result<()> {
        if let Some(meta) = meta {
            self.write_file_meta(meta)?;
        }
        self.write_attributes(tree)
    }

    /// Write the attributes of a tree in the data set encoding.
    pub fn write_attributes(&mut self, tree: &AttributeTree) -> Result<()> {
        self.start_body();
        self.write_tree(tree, SpecificCharacterSet::Default)
    }

    /// Write a single attribute header.
    ///
    /// A short-length VR with a value longer than 64 KiB
    /// is written as UN.
    pub fn write_header(&mut self, tag: Tag, vr: VR, len: Length) -> Result<()> {
        self.start_body();
        let vr = match len.get() {
            Some(len) => self.effective_vr(vr, u64::from(len)),
            None => vr,
        };
        self.encoder
            .encode_element_header(DataElementHeader::new(tag, vr, len))
            .context(WriteHeaderSnafu { tag })
    }

    /// Write an item header, where `len` may be `0xFFFF_FFFF`.
    pub fn write_item_header(&mut self, len: u32) -> Result<()> {
        self.start_body();
        self.encoder
            .encode_item_header(len)
            .context(WriteHeaderSnafu { tag: Tag::ITEM })
    }

    /// Write an item delimiter.
    pub fn write_item_delimiter(&mut self) -> Result<()> {
        self.start_body();
        self.encoder
            .encode_item_delimiter()
            .context(WriteHeaderSnafu {
                tag: Tag::ITEM_DELIMITER,
            })
    }

    /// Write a sequence delimiter.
    pub fn write_sequence_delimiter(&mut self) -> Result<()> {
        self.start_body();
        self.encoder
            .encode_sequence_delimiter()
            .context(WriteHeaderSnafu {
                tag: Tag::SEQUENCE_DELIMITER,
            })
    }

    /// Write bytes as they are.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.start_body();
        self.encoder
            .write_raw_bytes(bytes)
            .context(WriteValueSnafu {
                tag: tags::PIXEL_DATA,
            })
    }

    /// Flush the output, completing a compressed stream.
    ///
    /// Must be called once after the last write.
    pub fn finish(&mut self) -> Result<()> {
        self.start_body();
        self.encoder.finish().context(FinishSnafu)
    }

    fn start_body(&mut self) {
        if self.encoder.is_adapted() {
            return;
        }
        if let Some(adapter) = self.ts.data_adapter() {
            self.encoder.adapt_sink(&**adapter);
        }
    }

    fn effective_vr(&self, vr: VR, len: u64) -> VR {
        if self.ts.is_explicit_vr() && vr.has_short_length() && len > 0xFFFF {
            VR::UN
        } else {
            vr
        }
    }

    fn header_len(&self, vr: VR) -> u64 {
        if self.ts.is_explicit_vr() {
            u64::from(vr.explicit_header_len())
        } else {
            8
        }
    }

    fn encode_text(&self, tag: Tag, attr: &Attribute, values: &[String], charset: SpecificCharacterSet) -> Result<Vec<u8>> {
        let joined = values.join("\\");
        let charset = if attr.vr.uses_specific_character_set() {
            charset
        } else {
            SpecificCharacterSet::Default
        };
        charset.encode(&joined).context(EncodeTextSnafu { tag })
    }

    /// The length of the value of a primitive attribute, padding included.
    fn value_len(&self, tag: Tag, attr: &Attribute, charset: SpecificCharacterSet) -> Result<u64> {
        Ok(match &attr.value {
            Value::Empty | Value::Sequence(_) | Value::Fragments(_) => 0,
            Value::Bytes(bytes) => bytes.len() as u64,
            Value::Strs(values) => self.encode_text(tag, attr, values, charset)?.len() as u64,
            Value::Numbers(numbers) => numbers.byte_len() as u64,
            Value::BulkData(bulk) => u64::from(bulk.length),
        })
        .map(|len| len + (len & 1))
    }

    fn item_content_len(&self, item: &AttributeTree, charset: SpecificCharacterSet) -> Result<u64> {
        let charset = charset_of(item, charset);
        let mut len = 0;
        let mut group = None;
        for (tag, attr) in item {
            if tag.is_group_length() {
                continue;
            }
            if self.options.group_length && group != Some(tag.group()) {
                group = Some(tag.group());
                len += 12;
            }
            len += self.element_len(*tag, attr, charset)?;
        }
        Ok(len)
    }

    fn sequence_value_len(&self, items: &[AttributeTree], charset: SpecificCharacterSet) -> Result<u64> {
        let mut len = 0;
        for item in items {
            len += 8 + self.item_content_len(item, charset)?;
            if self.options.undefined_item(item.is_empty()) {
                len += 8;
            }
        }
        Ok(len)
    }

    /// The encoded length of an attribute, header included.
    fn element_len(&self, tag: Tag, attr: &Attribute, charset: SpecificCharacterSet) -> Result<u64> {
        match &attr.value {
            Value::Sequence(items) => {
                let mut len = self.header_len(VR::SQ) + self.sequence_value_len(items, charset)?;
                if self.options.undefined_sequence(items.is_empty()) {
                    len += 8;
                }
                Ok(len)
            }
            Value::Empty if attr.vr == VR::SQ => {
                let mut len = self.header_len(VR::SQ);
                if self.options.undefined_sequence(true) {
                    len += 8;
                }
                Ok(len)
            }
            Value::Fragments(fragments) => {
                let items: u64 = fragments
                    .iter()
                    .map(|f| 8 + u64::from(even(f.len())))
                    .sum();
                Ok(self.header_len(attr.vr) + items + 8)
            }
            _ => {
                let len = self.value_len(tag, attr, charset)?;
                Ok(self.header_len(self.effective_vr(attr.vr, len)) + len)
            }
        }
    }

    fn write_group_length(&mut self, tag: Tag, len: u32) -> Result<()> {
        self.encoder
            .encode_element_header(DataElementHeader::new(tag, VR::UL, Length(4)))
            .context(WriteHeaderSnafu { tag })?;
        let bytes = match self.encoder.endianness() {
            Endianness::Little => len.to_le_bytes(),
            Endianness::Big => len.to_be_bytes(),
        };
        self.encoder
            .write_raw_bytes(&bytes)
            .context(WriteValueSnafu { tag })
    }

    fn write_tree(&mut self, tree: &AttributeTree, parent: SpecificCharacterSet) -> Result<()> {
        let charset = charset_of(tree, parent);
        let big_endian = tree.is_big_endian();
        let mut group = None;
        for (tag, attr) in tree {
            if tag.is_group_length() {
                continue;
            }
            if self.options.group_length && group != Some(tag.group()) {
                group = Some(tag.group());
                let mut group_len = 0;
                for (t, a) in tree.iter().filter(|(t, _)| t.group() == tag.group()) {
                    if !t.is_group_length() {
                        group_len += self.element_len(*t, a, charset)?;
                    }
                }
                let group_tag = Tag(tag.group(), 0x0000);
                let group_len = to_u32(group_tag, group_len)?;
                self.write_group_length(group_tag, group_len)?;
            }
            self.write_element(*tag, attr, big_endian, charset)?;
        }
        Ok(())
    }

    fn write_element(
        &mut self,
        tag: Tag,
        attr: &Attribute,
        big_endian: bool,
        charset: SpecificCharacterSet,
    ) -> Result<()> {
        match &attr.value {
            Value::Sequence(items) => self.write_sequence(tag, items, charset),
            Value::Empty if attr.vr == VR::SQ => self.write_sequence(tag, &[], charset),
            Value::Fragments(fragments) => self.write_fragments(tag, attr.vr, fragments, big_endian),
            Value::Strs(values) => {
                let bytes = self.encode_text(tag, attr, values, charset)?;
                self.write_primitive_header(tag, attr.vr, bytes.len() as u64)?;
                self.encoder
                    .write_bytes(&bytes, attr.vr.padding())
                    .context(WriteValueSnafu { tag })
            }
            Value::Bytes(bytes) => {
                self.write_primitive_header(tag, attr.vr, bytes.len() as u64)?;
                let width = attr.vr.endian_width();
                if width > 1 && big_endian != self.is_big_endian() {
                    self.encoder.write_ordered_bytes(bytes, big_endian, width)
                } else {
                    self.encoder.write_bytes(bytes, attr.vr.padding())
                }
                .context(WriteValueSnafu { tag })
            }
            Value::Numbers(numbers) => {
                self.write_primitive_header(tag, attr.vr, numbers.byte_len() as u64)?;
                self.encoder
                    .write_numbers(numbers)
                    .context(WriteValueSnafu { tag })
            }
            Value::BulkData(bulk) => {
                self.write_primitive_header(tag, attr.vr, u64::from(bulk.length))?;
                self.write_bulk_data(tag, attr.vr, bulk)
            }
            Value::Empty => self.write_primitive_header(tag, attr.vr, 0),
        }
    }

    fn write_primitive_header(&mut self, tag: Tag, vr: VR, len: u64) -> Result<()> {
        let padded = len + (len & 1);
        let vr = self.effective_vr(vr, padded);
        let len = to_u32(tag, padded)?;
        self.encoder
            .encode_element_header(DataElementHeader::new(tag, vr, Length(len)))
            .context(WriteHeaderSnafu { tag })
    }

    /// Copy a bulk data value from its file,
    /// swapping its byte order if needed.
    fn write_bulk_data(&mut self, tag: Tag, vr: VR, bulk: &BulkData) -> Result<()> {
        let filename = bulk
            .file_path()
            .context(UnsupportedBulkDataSnafu { tag, uri: &bulk.uri })?;
        let file = File::open(&filename).context(ReadBulkDataSnafu {
            tag,
            filename: &filename,
        })?;
        let width = vr.endian_width();
        if width > 1 && bulk.big_endian != self.is_big_endian() {
            let mut bytes = bulk
                .read_from(file)
                .context(ReadBulkDataSnafu { tag, filename })?;
            toggle_endian(&mut bytes, width);
            return self
                .encoder
                .write_bytes(&bytes, vr.padding())
                .context(WriteValueSnafu { tag });
        }
        bulk.copy_to(file, &mut self.encoder)
            .context(ReadBulkDataSnafu { tag, filename })?;
        if bulk.length % 2 != 0 {
            self.encoder
                .write_raw_bytes(&[vr.padding()])
                .context(WriteValueSnafu { tag })?;
        }
        Ok(())
    }

    fn write_sequence(&mut self, tag: Tag, items: &[AttributeTree], charset: SpecificCharacterSet) -> Result<()> {
        let undefined = self.options.undefined_sequence(items.is_empty());
        let len = if undefined {
            Length::UNDEFINED
        } else {
            Length(to_u32(tag, self.sequence_value_len(items, charset)?)?)
        };
        self.encoder
            .encode_element_header(DataElementHeader::new(tag, VR::SQ, len))
            .context(WriteHeaderSnafu { tag })?;
        for item in items {
            let undefined_item = self.options.undefined_item(item.is_empty());
            let item_len = if undefined_item {
                Length::UNDEFINED.0
            } else {
                to_u32(Tag::ITEM, self.item_content_len(item, charset)?)?
            };
            self.encoder
                .encode_item_header(item_len)
                .context(WriteHeaderSnafu { tag: Tag::ITEM })?;
            self.write_tree(item, charset)?;
            if undefined_item {
                self.encoder
                    .encode_item_delimiter()
                    .context(WriteHeaderSnafu {
                        tag: Tag::ITEM_DELIMITER,
                    })?;
            }
        }
        if undefined {
            self.encoder
                .encode_sequence_delimiter()
                .context(WriteHeaderSnafu {
                    tag: Tag::SEQUENCE_DELIMITER,
                })?;
        }
        Ok(())
    }

    fn write_fragments(&mut self, tag: Tag, vr: VR, fragments: &[Fragment], big_endian: bool) -> Result<()> {
        self.encoder
            .encode_element_header(DataElementHeader::new(tag, vr, Length::UNDEFINED))
            .context(WriteHeaderSnafu { tag })?;
        for fragment in fragments {
            self.encoder
                .encode_item_header(fragment.len())
                .context(WriteHeaderSnafu { tag: Tag::ITEM })?;
            match fragment {
                Fragment::Inline(bytes) => self
                    .encoder
                    .write_ordered_bytes(bytes, big_endian, vr.endian_width())
                    .context(WriteValueSnafu { tag })?,
                Fragment::BulkData(bulk) => self.write_bulk_data(tag, vr, bulk)?,
            }
        }
        self.encoder
            .encode_sequence_delimiter()
            .context(WriteHeaderSnafu {
                tag: Tag::SEQUENCE_DELIMITER,
            })
    }
}

impl Write for StreamWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.start_body();
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_dictionary_std::uids;

    fn write_with(uid: &str, options: EncodingOptions, tree: &AttributeTree) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = StreamWriter::from_uid(&mut out, uid, options).unwrap();
            writer.write_attributes(tree).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn odd_text_is_padded() {
        let mut tree = AttributeTree::new();
        tree.put_str(tags::PATIENT_NAME, VR::PN, "Doe^J");
        let out = write_with(uids::EXPLICIT_VR_LITTLE_ENDIAN, EncodingOptions::default(), &tree);
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x06, 0x00,
            b'D', b'o', b'e', b'^', b'J', b' ',
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn long_short_form_value_becomes_un() {
        let mut tree = AttributeTree::new();
        tree.put_bytes(Tag(0x0028, 0x1201), VR::US, vec![0; 0x1_0000]);
        let out = write_with(uids::EXPLICIT_VR_LITTLE_ENDIAN, EncodingOptions::default(), &tree);
        #[rustfmt::skip]
        let header: &[u8] = &[
            0x28, 0x00, 0x01, 0x12, b'U', b'N', 0x00, 0x00,
            0x00, 0x00, 0x01, 0x00,
        ];
        assert_eq!(&out[..12], header);
        assert_eq!(out.len(), 12 + 0x1_0000);

        // implicit VR has no such limit
        let out = write_with(uids::IMPLICIT_VR_LITTLE_ENDIAN, EncodingOptions::default(), &tree);
        assert_eq!(out.len(), 8 + 0x1_0000);
    }

    #[test]
    fn sequence_lengths() {
        let mut item = AttributeTree::new();
        item.put_str(Tag(0x0008, 0x1150), VR::UI, "1.2");
        let mut tree = AttributeTree::new();
        tree.put(Tag(0x0008, 0x1140), VR::SQ, Value::Sequence(vec![item]));

        let undefined = write_with(uids::IMPLICIT_VR_LITTLE_ENDIAN, EncodingOptions::default(), &tree);
        // header + item + element + item delimiter + sequence delimiter
        assert_eq!(undefined.len(), 8 + 8 + 12 + 8 + 8);
        assert_eq!(&undefined[4..8], &[0xFF; 4]);

        let defined = write_with(
            uids::IMPLICIT_VR_LITTLE_ENDIAN,
            EncodingOptions::defined_lengths(),
            &tree,
        );
        assert_eq!(defined.len(), 8 + 8 + 12);
        assert_eq!(&defined[4..8], &[20, 0, 0, 0]);
        assert_eq!(&defined[12..16], &[12, 0, 0, 0]);
        // UI is padded with a null byte
        assert_eq!(&defined[24..28], b"1.2\0");
    }

    #[test]
    fn group_lengths() {
        let mut tree = AttributeTree::new();
        tree.put_str(Tag(0x0008, 0x0060), VR::CS, "OT");
        tree.put_str(Tag(0x0010, 0x0010), VR::PN, "A^B");
        tree.put_u16(Tag(0x0010, 0x0000), 99);
        let out = write_with(
            uids::EXPLICIT_VR_LITTLE_ENDIAN,
            EncodingOptions::new().group_length(true),
            &tree,
        );
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x08, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 10, 0, 0, 0,
            0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
            0x10, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 12, 0, 0, 0,
            0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x04, 0x00, b'A', b'^', b'B', b' ',
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn swaps_bytes_for_big_endian() {
        let mut tree = AttributeTree::new();
        tree.put_bytes(Tag(0x0028, 0x0010), VR::US, vec![0x00, 0x02]);
        let out = write_with(uids::EXPLICIT_VR_BIG_ENDIAN, EncodingOptions::default(), &tree);
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02,
            0x02, 0x00,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn preamble_and_file_meta() {
        let mut meta = AttributeTree::new();
        meta.put_str(tags::TRANSFER_SYNTAX_UID, VR::UI, uids::IMPLICIT_VR_LITTLE_ENDIAN);
        let mut tree = AttributeTree::new();
        tree.put_str(Tag(0x0008, 0x0060), VR::CS, "OT");
        let mut out = Vec::new();
        {
            let mut writer =
                StreamWriter::from_uid(&mut out, uids::IMPLICIT_VR_LITTLE_ENDIAN, EncodingOptions::default())
                    .unwrap();
            writer.write_preamble(None).unwrap();
            writer.write_dataset(Some(&meta), &tree).unwrap();
            writer.finish().unwrap();
        }
        assert_eq!(&out[128..132], b"DICM");
        // meta group length: one UI element of 8 + 18 bytes
        assert_eq!(&out[132..140], &[0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00]);
        assert_eq!(&out[140..144], &[26, 0, 0, 0]);
        // data set in implicit VR
        assert_eq!(&out[170..], &[0x08, 0x00, 0x60, 0x00, 0x02, 0x00, 0x00, 0x00, b'O', b'T']);
    }

    #[test]
    fn unknown_transfer_syntax() {
        let out = Vec::new();
        assert!(matches!(
            StreamWriter::from_uid(out, "1.2.3.4", EncodingOptions::default()),
            Err(Error::UnsupportedTransferSyntax { .. })
        ));
    }
}
