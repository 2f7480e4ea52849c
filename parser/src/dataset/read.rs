//! Reading attribute trees from a byte stream.
//!
//! A [`StreamReader`] is created through [`ReadOptions`],
//! either from a file, which enables bulk data references into that file,
//! or from any reader.
//! Unless a transfer syntax is given,
//! the encoding of the stream is detected from its first bytes.
//! A file meta group, when present, is read before the data set
//! and its transfer syntax governs the rest of the stream.
use crate::dataset::bulk::BulkDataDescriptor;
use crate::stateful::decode::{Error as CursorError, ItemToken, StreamCursor};
use dcmio_core::dictionary::DataDictionary;
use dcmio_core::header::{DataElementHeader, Length, Trim, VrFamily};
use dcmio_core::tree::{AttributePath, AttributeTree, ItemPointer};
use dcmio_core::util::toggle_endian;
use dcmio_core::value::{BulkData, Fragment, Value, C};
use dcmio_core::{Tag, VR};
use dcmio_dictionary_std::{tags, uids, StandardDataDictionary};
use dcmio_encoding::text::{DecodeTextError, SpecificCharacterSet, TextCodec};
use dcmio_encoding::transfer_syntax::{Endianness, TransferSyntax, TransferSyntaxIndex};
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The magic code following the 128 byte preamble.
const DICM_MAGIC: &[u8; 4] = b"DICM";
const PREAMBLE_LEN: usize = 128;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not open file '{}'", filename.display()))]
    OpenFile {
        filename: PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not start reading the stream"))]
    CreateCursor {
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Not a recognized attribute stream (offset {})", position))]
    NotRecognized { position: u64, backtrace: Backtrace },
    #[snafu(display("Implicit VR Big Endian encoded attribute stream"))]
    ImplicitVrBigEndian { backtrace: Backtrace },
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Could not read attribute header"))]
    ReadHeader {
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not read item header"))]
    ReadItemHeader {
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not read {} value bytes of attribute {}", len, tag))]
    ReadValue {
        tag: Tag,
        len: u32,
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not skip {} bytes", len))]
    SkipValue {
        len: u64,
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not copy {} value bytes", len))]
    CopyValue {
        len: u64,
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not switch the stream encoding"))]
    SwitchEncoding {
        #[snafu(backtrace)]
        source: CursorError,
    },
    #[snafu(display("Could not decode text of attribute {} at position {}", tag, position))]
    DecodeText {
        tag: Tag,
        position: u64,
        #[snafu(backtrace)]
        source: DecodeTextError,
    },
    #[snafu(display("Stream ended inside an item or sequence at position {}", position))]
    UnexpectedEnd { position: u64, backtrace: Backtrace },
    #[snafu(display("Undefined length of {} at position {}", tag, position))]
    UndefinedLength {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not create bulk data file"))]
    CreateBulkDataFile {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not write bulk data to '{}'", filename.display()))]
    WriteBulkData {
        filename: PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether and how values recognized as bulk data are kept.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum IncludeBulkData {
    /// Bulk data is skipped and left out of the tree.
    No,
    /// Bulk data is read inline like any other value.
    #[default]
    Yes,
    /// Bulk data is replaced with a reference to its location in a file.
    Uri,
}

/// How to read an attribute of unknown VR with undefined length.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum UnknownUndefinedLength {
    /// Read it as a sequence of items in implicit VR little endian.
    #[default]
    Sequence,
    /// Read it as a list of fragments.
    Fragments,
}

/// A builder of stream readers.
///
/// # Example
///
/// ```no_run
/// # use dcmio_parser::dataset::{IncludeBulkData, ReadOptions};
/// let mut reader = ReadOptions::new()
///     .include_bulk_data(IncludeBulkData::Uri)
///     .open_file("image.dcm")?;
/// let dataset = reader.read_dataset()?;
/// # Result::<(), dcmio_parser::dataset::read::Error>::Ok(())
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ReadOptions<D = StandardDataDictionary, T = TransferSyntaxRegistry> {
    include_bulk_data: IncludeBulkData,
    bulk_data_descriptor: BulkDataDescriptor,
    allocate_limit: usize,
    unknown_undefined_length: UnknownUndefinedLength,
    bulk_data_directory: Option<PathBuf>,
    bulk_data_prefix: String,
    bulk_data_suffix: String,
    concatenate_bulk_data_files: bool,
    dictionary: D,
    ts_index: T,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            include_bulk_data: IncludeBulkData::Yes,
            bulk_data_descriptor: BulkDataDescriptor::DEFAULT,
            allocate_limit: 64 * 1024 * 1024,
            unknown_undefined_length: UnknownUndefinedLength::Sequence,
            bulk_data_directory: None,
            bulk_data_prefix: "blk".to_string(),
            bulk_data_suffix: String::new(),
            concatenate_bulk_data_files: true,
            dictionary: StandardDataDictionary,
            ts_index: TransferSyntaxRegistry,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        ReadOptions::default()
    }
}

impl<D, T> ReadOptions<D, T> {
    /// Set whether values recognized as bulk data are read.
    pub fn include_bulk_data(mut self, include: IncludeBulkData) -> Self {
        self.include_bulk_data = include;
        self
    }

    /// Set the policy recognizing bulk data.
    pub fn bulk_data_descriptor(mut self, descriptor: BulkDataDescriptor) -> Self {
        self.bulk_data_descriptor = descriptor;
        self
    }

    /// Set the initial allocation limit of value buffers.
    /// Longer values are read into a growing buffer.
    pub fn allocate_limit(mut self, limit: usize) -> Self {
        self.allocate_limit = limit;
        self
    }

    /// Set how attributes of unknown VR with undefined length are read.
    pub fn unknown_undefined_length(mut self, policy: UnknownUndefinedLength) -> Self {
        self.unknown_undefined_length = policy;
        self
    }

    /// Set the directory of bulk data files
    /// (the system temporary directory by default).
    pub fn bulk_data_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bulk_data_directory = Some(dir.into());
        self
    }

    /// Set the file name prefix of bulk data files.
    pub fn bulk_data_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bulk_data_prefix = prefix.into();
        self
    }

    /// Set the file name suffix of bulk data files.
    pub fn bulk_data_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.bulk_data_suffix = suffix.into();
        self
    }

    /// Set whether bulk data values share one file,
    /// or each value is written to a file of its own.
    pub fn concatenate_bulk_data_files(mut self, concatenate: bool) -> Self {
        self.concatenate_bulk_data_files = concatenate;
        self
    }

    /// Set the transfer syntax index to use.
    pub fn transfer_syntax_index<Tr>(self, ts_index: Tr) -> ReadOptions<D, Tr>
    where
        Tr: TransferSyntaxIndex,
    {
        ReadOptions {
            include_bulk_data: self.include_bulk_data,
            bulk_data_descriptor: self.bulk_data_descriptor,
            allocate_limit: self.allocate_limit,
            unknown_undefined_length: self.unknown_undefined_length,
            bulk_data_directory: self.bulk_data_directory,
            bulk_data_prefix: self.bulk_data_prefix,
            bulk_data_suffix: self.bulk_data_suffix,
            concatenate_bulk_data_files: self.concatenate_bulk_data_files,
            dictionary: self.dictionary,
            ts_index,
        }
    }

    /// Set the data element dictionary to use.
    pub fn dictionary<Di>(self, dict: Di) -> ReadOptions<Di, T>
    where
        Di: DataDictionary,
        Di: Clone,
    {
        ReadOptions {
            include_bulk_data: self.include_bulk_data,
            bulk_data_descriptor: self.bulk_data_descriptor,
            allocate_limit: self.allocate_limit,
            unknown_undefined_length: self.unknown_undefined_length,
            bulk_data_directory: self.bulk_data_directory,
            bulk_data_prefix: self.bulk_data_prefix,
            bulk_data_suffix: self.bulk_data_suffix,
            concatenate_bulk_data_files: self.concatenate_bulk_data_files,
            dictionary: dict,
            ts_index: self.ts_index,
        }
    }

    /// Open a file and detect its encoding.
    ///
    /// Bulk data read with [`IncludeBulkData::Uri`]
    /// refers to the file itself, unless the data set is deflated.
    pub fn open_file<'r, P>(self, path: P) -> Result<StreamReader<'r, D, T>>
    where
        P: AsRef<Path>,
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        let path = path.as_ref();
        let file = File::open(path).context(OpenFileSnafu { filename: path })?;
        let path = path
            .canonicalize()
            .context(OpenFileSnafu { filename: path })?;
        StreamReader::detect(BufReader::new(file), Some(path), self)
    }

    /// Read from the given source, detecting its encoding.
    pub fn from_reader<'r, R>(self, from: R) -> Result<StreamReader<'r, D, T>>
    where
        R: Read + 'r,
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        StreamReader::detect(from, None, self)
    }

    /// Read a data set without file meta group
    /// from the given source, in the given transfer syntax.
    pub fn from_reader_with_ts<'r, R>(self, from: R, ts_uid: &str) -> Result<StreamReader<'r, D, T>>
    where
        R: Read + 'r,
        D: DataDictionary + Clone,
        T: TransferSyntaxIndex,
    {
        let cursor = StreamCursor::new(from, true, Endianness::Little, self.dictionary.clone())
            .context(CreateCursorSnafu)?;
        let mut reader = StreamReader::with_cursor(cursor, None, self);
        reader.switch_transfer_syntax(ts_uid)?;
        Ok(reader)
    }
}

/// A file receiving bulk data values read from a stream
/// which cannot be referenced in place.
#[derive(Debug)]
struct BulkDataFile {
    path: PathBuf,
    out: BufWriter<File>,
    offset: u64,
}

impl BulkDataFile {
    fn create<D, T>(options: &ReadOptions<D, T>) -> Result<Self> {
        let dir = options
            .bulk_data_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let (file, path) = tempfile::Builder::new()
            .prefix(&options.bulk_data_prefix)
            .suffix(&options.bulk_data_suffix)
            .tempfile_in(dir)
            .context(CreateBulkDataFileSnafu)?
            .keep()
            .map_err(|e| e.error)
            .context(CreateBulkDataFileSnafu)?;
        debug!("Spooling bulk data to {}", path.display());
        Ok(BulkDataFile {
            path,
            out: BufWriter::new(file),
            offset: 0,
        })
    }
}

/// A reader of attribute trees from a byte stream.
pub struct StreamReader<'r, D = StandardDataDictionary, T = TransferSyntaxRegistry> {
    cursor: StreamCursor<'r, D>,
    options: ReadOptions<D, T>,
    /// the source file, for bulk data references
    file: Option<PathBuf>,
    /// whether the source is being inflated
    inflating: bool,
    preamble: Option<Vec<u8>>,
    has_file_meta: bool,
    file_meta: Option<AttributeTree>,
    ts_uid: String,
    path: AttributePath,
    bulk_data_file: Option<BulkDataFile>,
    bulk_data_files: Vec<PathBuf>,
}

impl<D, T> std::fmt::Debug for StreamReader<'_, D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("StreamReader")
            .field("cursor", &self.cursor)
            .field("file", &self.file)
            .field("inflating", &self.inflating)
            .field("has_file_meta", &self.has_file_meta)
            .field("ts_uid", &self.ts_uid)
            .field("path", &self.path)
            .field("bulk_data_files", &self.bulk_data_files)
            .finish_non_exhaustive()
    }
}

/// The outcome of probing the first attribute header.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Guess {
    Explicit(Endianness),
    ImplicitLittleEndian,
    ImplicitBigEndian,
}

fn read_tag(bytes: &[u8], endianness: Endianness) -> Tag {
    let (group, element) = match endianness {
        Endianness::Little => (
            u16::from_le_bytes([bytes[0], bytes[1]]),
            u16::from_le_bytes([bytes[2], bytes[3]]),
        ),
        Endianness::Big => (
            u16::from_be_bytes([bytes[0], bytes[1]]),
            u16::from_be_bytes([bytes[2], bytes[3]]),
        ),
    };
    Tag(group, element)
}

/// Guess the encoding of the stream from the first header,
/// with at least 8 bytes given.
fn guess_encoding<D>(bytes: &[u8], dict: &D, endianness: Endianness) -> Option<Guess>
where
    D: DataDictionary,
{
    let tag = read_tag(bytes, endianness);
    let vr = dict.vr_of(tag, None);
    if vr == VR::UN {
        return None;
    }
    let wire_vr = VR::from_binary([bytes[4], bytes[5]]);
    let explicit = match wire_vr {
        Some(w) => w == vr || (w.family() == VrFamily::Binary && vr.family() == VrFamily::Binary),
        None => false,
    };
    if explicit {
        return Some(Guess::Explicit(endianness));
    }
    let len_bytes = [bytes[4], bytes[5], bytes[6], bytes[7]];
    let len = match endianness {
        Endianness::Little => u32::from_le_bytes(len_bytes),
        Endianness::Big => u32::from_be_bytes(len_bytes),
    };
    if len >= 0x8000_0000 || 8 + len as usize > bytes.len() {
        return None;
    }
    Some(match endianness {
        Endianness::Little => Guess::ImplicitLittleEndian,
        Endianness::Big => Guess::ImplicitBigEndian,
    })
}

fn trim_text(text: &str, trim: Trim) -> String {
    let padding = |c: char| c == ' ' || c == '\0';
    match trim {
        Trim::Both => text.trim_matches(padding).to_string(),
        Trim::Trailing => text.trim_end_matches(padding).to_string(),
    }
}

impl<'r, D, T> StreamReader<'r, D, T>
where
    D: DataDictionary + Clone,
    T: TransferSyntaxIndex,
{
    fn with_cursor(
        cursor: StreamCursor<'r, D>,
        file: Option<PathBuf>,
        options: ReadOptions<D, T>,
    ) -> Self {
        StreamReader {
            cursor,
            options,
            file,
            inflating: false,
            preamble: None,
            has_file_meta: false,
            file_meta: None,
            ts_uid: uids::EXPLICIT_VR_LITTLE_ENDIAN.to_string(),
            path: AttributePath::root(),
            bulk_data_file: None,
            bulk_data_files: Vec::new(),
        }
    }

    fn detect<R>(from: R, file: Option<PathBuf>, options: ReadOptions<D, T>) -> Result<Self>
    where
        R: Read + 'r,
    {
        let cursor = StreamCursor::new(from, true, Endianness::Little, options.dictionary.clone())
            .context(CreateCursorSnafu)?;
        let mut reader = StreamReader::with_cursor(cursor, file, options);

        let mut header = reader.cursor.peek(PREAMBLE_LEN + 4).context(ReadHeaderSnafu)?;
        if header.len() == PREAMBLE_LEN + 4 && &header[PREAMBLE_LEN..] == DICM_MAGIC {
            reader.preamble = Some(header[..PREAMBLE_LEN].to_vec());
            reader
                .cursor
                .skip((PREAMBLE_LEN + 4) as u64)
                .context(SkipValueSnafu {
                    len: (PREAMBLE_LEN + 4) as u64,
                })?;
            header = reader.cursor.peek(PREAMBLE_LEN + 4).context(ReadHeaderSnafu)?;
        }

        let position = reader.cursor.position();
        snafu::ensure!(header.len() >= 8, NotRecognizedSnafu { position });
        let dict = reader.cursor.dictionary();
        let guess = guess_encoding(&header, dict, Endianness::Little)
            .or_else(|| guess_encoding(&header, dict, Endianness::Big))
            .context(NotRecognizedSnafu { position })?;
        let (explicit_vr, endianness, uid) = match guess {
            Guess::Explicit(Endianness::Little) => {
                (true, Endianness::Little, uids::EXPLICIT_VR_LITTLE_ENDIAN)
            }
            Guess::Explicit(Endianness::Big) => (true, Endianness::Big, uids::EXPLICIT_VR_BIG_ENDIAN),
            Guess::ImplicitLittleEndian => {
                (false, Endianness::Little, uids::IMPLICIT_VR_LITTLE_ENDIAN)
            }
            Guess::ImplicitBigEndian => return ImplicitVrBigEndianSnafu.fail(),
        };
        debug!("Detected {} at position {}", uid, position);
        reader
            .cursor
            .set_mode(explicit_vr, endianness)
            .context(SwitchEncodingSnafu)?;
        reader.ts_uid = uid.to_string();
        reader.has_file_meta = read_tag(&header, endianness).is_file_meta();
        Ok(reader)
    }

    /// Switch the encoding of the rest of the stream
    /// to the given transfer syntax.
    fn switch_transfer_syntax(&mut self, uid: &str) -> Result<()> {
        let uid = uid.trim_end_matches(|c: char| c == '\0' || c == ' ');
        match self.options.ts_index.get(uid) {
            None => {
                warn!(
                    "Unknown transfer syntax {}, reading as Explicit VR Little Endian",
                    uid
                );
                self.cursor
                    .set_mode(true, Endianness::Little)
                    .context(SwitchEncodingSnafu)?;
            }
            Some(ts) => {
                snafu::ensure!(
                    ts.is_explicit_vr() || ts.endianness() == Endianness::Little,
                    ImplicitVrBigEndianSnafu
                );
                self.cursor
                    .set_mode(ts.is_explicit_vr(), ts.endianness())
                    .context(SwitchEncodingSnafu)?;
                if ts.is_deflated() {
                    let adapter = ts
                        .data_adapter()
                        .context(UnsupportedTransferSyntaxSnafu { uid })?;
                    self.cursor.adapt_source(|src| adapter.adapt_reader(src));
                    self.inflating = true;
                }
            }
        }
        self.ts_uid = uid.to_string();
        Ok(())
    }

    /// Read the file meta group, if the stream starts with one
    /// and it was not read yet.
    ///
    /// The rest of the stream is then read
    /// in the transfer syntax declared in the group.
    pub fn read_file_meta(&mut self) -> Result<Option<&AttributeTree>> {
        if self.has_file_meta && self.file_meta.is_none() {
            let meta = self.read_file_meta_group()?;
            let uid = meta.string(tags::TRANSFER_SYNTAX_UID).map(str::to_owned);
            self.file_meta = Some(meta);
            match uid {
                Some(uid) => self.switch_transfer_syntax(&uid)?,
                None => {
                    warn!("Missing Transfer Syntax UID (0002,0010), assuming Explicit VR Little Endian");
                    self.switch_transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)?;
                }
            }
        }
        Ok(self.file_meta.as_ref())
    }

    fn read_file_meta_group(&mut self) -> Result<AttributeTree> {
        self.cursor
            .set_mode(true, Endianness::Little)
            .context(SwitchEncodingSnafu)?;
        let mut meta = AttributeTree::new();
        let mut end = None;
        loop {
            if matches!(end, Some(end) if self.cursor.position() >= end) {
                break;
            }
            let position = self.cursor.position();
            self.cursor.mark(12);
            let header = match self.cursor.decode_header().context(ReadHeaderSnafu)? {
                Some(header) => header,
                None => break,
            };
            if header.tag.group() != 0x0002 {
                warn!("Missing or wrong File Meta Information Group Length (0002,0000)");
                self.cursor.reset().context(ReadHeaderSnafu)?;
                break;
            }
            let len = header.len.get().context(UndefinedLengthSnafu {
                tag: header.tag,
                position,
            })?;
            let vr = if header.vr == VR::UN {
                self.cursor.dictionary().vr_of(header.tag, None)
            } else {
                header.vr
            };
            if header.tag == tags::FILE_META_INFORMATION_GROUP_LENGTH {
                let bytes = self
                    .cursor
                    .read_value(len, self.options.allocate_limit)
                    .context(ReadValueSnafu {
                        tag: header.tag,
                        len,
                    })?;
                if bytes.len() == 4 {
                    let group_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    end = Some(self.cursor.position() + u64::from(group_len));
                }
                continue;
            }
            let value = if len == 0 {
                Value::Empty
            } else {
                self.read_inline_value(&meta, header.tag, vr, len)?
            };
            meta.put(header.tag, vr, value);
        }
        Ok(meta)
    }

    /// Read the whole data set, after the file meta group if present.
    pub fn read_dataset(&mut self) -> Result<AttributeTree> {
        self.read_file_meta()?;
        let mut tree = AttributeTree::with_big_endian(self.is_big_endian());
        self.read_dataset_into(&mut tree)?;
        Ok(tree)
    }

    /// Read the rest of the data set into the given tree.
    ///
    /// Raw binary values are stored in the byte order of `tree`.
    pub fn read_dataset_into(&mut self, tree: &mut AttributeTree) -> Result<()> {
        self.read_file_meta()?;
        self.read_attributes(tree, Length::UNDEFINED, None)?;
        Ok(())
    }

    /// Read the data set into the given tree
    /// until the attribute with the given tag.
    ///
    /// The header of that attribute is returned
    /// with its value still unread,
    /// or `None` if the stream ended before it.
    pub fn read_dataset_until(
        &mut self,
        tree: &mut AttributeTree,
        stop: Tag,
    ) -> Result<Option<DataElementHeader>> {
        self.read_file_meta()?;
        self.read_attributes(tree, Length::UNDEFINED, Some(stop))
    }

    fn read_attributes(
        &mut self,
        tree: &mut AttributeTree,
        len: Length,
        stop: Option<Tag>,
    ) -> Result<Option<DataElementHeader>> {
        let end = len.get().map(|len| self.cursor.position() + u64::from(len));
        loop {
            if matches!(end, Some(end) if self.cursor.position() >= end) {
                return Ok(None);
            }
            let position = self.cursor.position();
            let header = match self.cursor.decode_header().context(ReadHeaderSnafu)? {
                Some(header) => header,
                None if end.is_none() => return Ok(None),
                None => return UnexpectedEndSnafu { position }.fail(),
            };
            let tag = header.tag;
            if stop == Some(tag) {
                return Ok(Some(header));
            }
            if tag == Tag::ITEM_DELIMITER {
                self.skip_nonzero(header.len)?;
                if self.path.is_root() {
                    warn!("Unexpected item delimiter in the data set @ {}", position);
                    continue;
                }
                return Ok(None);
            }
            if tag.is_item_level() {
                warn!("Unexpected attribute {} #{} @ {}", tag, header.len, position);
                let len = header
                    .len
                    .get()
                    .context(UndefinedLengthSnafu { tag, position })?;
                self.skip(u64::from(len))?;
                continue;
            }
            if tag.is_group_length() && tag.group() != 0x0002 {
                if let Some(len) = header.len.get() {
                    self.skip(u64::from(len))?;
                    continue;
                }
            }

            let private_creator = if tag.is_private() && !tag.is_private_creator() {
                tree.private_creator_of(tag).map(str::to_owned)
            } else {
                None
            };
            let wire_un = header.vr == VR::UN && self.cursor.is_explicit_vr();
            let mut vr = header.vr;
            if vr == VR::UN {
                vr = self
                    .cursor
                    .dictionary()
                    .vr_of(tag, private_creator.as_deref());
                if vr == VR::UN
                    && header.len.is_undefined()
                    && self.options.unknown_undefined_length == UnknownUndefinedLength::Sequence
                {
                    vr = VR::SQ;
                }
            }

            let is_bulk = match self.options.include_bulk_data {
                IncludeBulkData::Yes => false,
                IncludeBulkData::No | IncludeBulkData::Uri => {
                    self.options.bulk_data_descriptor.is_bulk_data(
                        &self.path,
                        private_creator.as_deref(),
                        tag,
                        vr,
                        header.len,
                    )
                }
            };
            let exclude = is_bulk && self.options.include_bulk_data == IncludeBulkData::No;
            let uri = is_bulk
                && self.options.include_bulk_data == IncludeBulkData::Uri
                && header.len != Length(0)
                && vr != VR::SQ;

            if exclude {
                debug!("Skipping bulk data {}", self.path.to_string_with(tag));
                match header.len.get() {
                    Some(len) => self.skip(u64::from(len))?,
                    None if vr == VR::SQ => {
                        let scratch = tree.new_item();
                        self.read_sequence(&scratch, tag, private_creator, header.len, wire_un)?;
                    }
                    None => {
                        self.read_fragments(tree, tag, vr, false)?;
                    }
                }
                continue;
            }

            let value = if vr == VR::SQ {
                if header.len == Length(0) {
                    Value::Empty
                } else {
                    let items =
                        self.read_sequence(tree, tag, private_creator, header.len, wire_un)?;
                    if items.is_empty() {
                        Value::Empty
                    } else {
                        Value::Sequence(items)
                    }
                }
            } else if header.len.is_undefined() {
                self.read_fragments(tree, tag, vr, uri)?
            } else if header.len == Length(0) {
                Value::Empty
            } else if uri {
                Value::BulkData(self.create_bulk_data(header.len.0)?)
            } else {
                self.read_inline_value(tree, tag, vr, header.len.0)?
            };
            tree.put(tag, vr, value);

            if tag == tags::SPECIFIC_CHARACTER_SET {
                if let Some(terms) = tree.strings(tag) {
                    if SpecificCharacterSet::from_terms(terms).is_none() {
                        warn!(
                            "Unsupported specific character set {:?}, using the default repertoire",
                            terms
                        );
                    }
                }
            }
        }
    }

    fn read_inline_value(&mut self, tree: &AttributeTree, tag: Tag, vr: VR, len: u32) -> Result<Value> {
        let position = self.cursor.position();
        let mut bytes = self
            .cursor
            .read_value(len, self.options.allocate_limit)
            .context(ReadValueSnafu { tag, len })?;
        match vr.family() {
            VrFamily::Text => {
                let charset = if vr.uses_specific_character_set() {
                    tree.specific_character_set()
                        .and_then(SpecificCharacterSet::from_terms)
                        .unwrap_or_default()
                } else {
                    SpecificCharacterSet::Default
                };
                let text = charset
                    .decode(&bytes)
                    .context(DecodeTextSnafu { tag, position })?;
                let values: C<String> = if vr.is_multi_valued_text() {
                    text.split('\\').map(|s| trim_text(s, vr.trim())).collect()
                } else {
                    smallvec::smallvec![trim_text(&text, vr.trim())]
                };
                Ok(Value::Strs(values))
            }
            VrFamily::Numeric if vr != VR::AT => match self.cursor.decode_numbers(vr, &bytes) {
                Some(numbers) => Ok(Value::Numbers(numbers)),
                None => {
                    warn!(
                        "Value length {} of {} {} @ {} is not a multiple of the number size",
                        len,
                        self.path.to_string_with(tag),
                        vr,
                        position
                    );
                    if self.is_big_endian() != tree.is_big_endian() {
                        toggle_endian(&mut bytes, vr.endian_width());
                    }
                    Ok(Value::Bytes(bytes))
                }
            },
            _ => {
                if self.is_big_endian() != tree.is_big_endian() {
                    toggle_endian(&mut bytes, vr.endian_width());
                }
                Ok(Value::Bytes(bytes))
            }
        }
    }

    fn read_sequence(
        &mut self,
        parent: &AttributeTree,
        tag: Tag,
        private_creator: Option<String>,
        len: Length,
        probe: bool,
    ) -> Result<Vec<AttributeTree>> {
        let explicit_vr = self.cursor.is_explicit_vr();
        let endianness = self.cursor.endianness();
        if probe {
            let bytes = self.cursor.peek(14).context(ReadItemHeaderSnafu)?;
            if bytes.len() == 14 && VR::from_binary([bytes[12], bytes[13]]).is_none() {
                debug!(
                    "Reading sequence {} in Implicit VR Little Endian",
                    self.path.to_string_with(tag)
                );
                self.cursor
                    .set_mode(false, Endianness::Little)
                    .context(SwitchEncodingSnafu)?;
            }
        }
        let items = self.read_items(parent, tag, private_creator, len);
        self.cursor
            .set_mode(explicit_vr, endianness)
            .context(SwitchEncodingSnafu)?;
        items
    }

    fn read_items(
        &mut self,
        parent: &AttributeTree,
        tag: Tag,
        private_creator: Option<String>,
        len: Length,
    ) -> Result<Vec<AttributeTree>> {
        let end = len.get().map(|len| self.cursor.position() + u64::from(len));
        let mut items = Vec::new();
        while end.map_or(true, |end| self.cursor.position() < end) {
            let position = self.cursor.position();
            match self.cursor.read_item_token().context(ReadItemHeaderSnafu)? {
                ItemToken::Item(item_len) => {
                    let pointer = match &private_creator {
                        Some(creator) => ItemPointer::private(tag, creator.clone(), items.len()),
                        None => ItemPointer::new(tag, items.len()),
                    };
                    self.path.push(pointer);
                    let mut item = parent.new_item();
                    let read = self.read_attributes(&mut item, item_len, None);
                    self.path.pop();
                    read?;
                    items.push(item);
                }
                ItemToken::Delimiter(len) => {
                    self.skip_nonzero(len)?;
                    break;
                }
                ItemToken::Other(header) => {
                    warn!(
                        "Unexpected attribute {} #{} @ {}",
                        header.tag, header.len, position
                    );
                    let len = header.len.get().context(UndefinedLengthSnafu {
                        tag: header.tag,
                        position,
                    })?;
                    self.skip(u64::from(len))?;
                }
            }
        }
        Ok(items)
    }

    fn read_fragments(&mut self, tree: &AttributeTree, tag: Tag, vr: VR, uri: bool) -> Result<Value> {
        let mut fragments = Vec::new();
        loop {
            let position = self.cursor.position();
            match self.cursor.read_item_token().context(ReadItemHeaderSnafu)? {
                ItemToken::Item(len) => {
                    let len = len.get().context(UndefinedLengthSnafu {
                        tag: Tag::ITEM,
                        position,
                    })?;
                    let fragment = if len == 0 {
                        Fragment::Inline(Vec::new())
                    } else if uri {
                        Fragment::BulkData(self.create_bulk_data(len)?)
                    } else {
                        let mut bytes = self
                            .cursor
                            .read_value(len, self.options.allocate_limit)
                            .context(ReadValueSnafu { tag, len })?;
                        if self.is_big_endian() != tree.is_big_endian() {
                            toggle_endian(&mut bytes, vr.endian_width());
                        }
                        Fragment::Inline(bytes)
                    };
                    fragments.push(fragment);
                }
                ItemToken::Delimiter(len) => {
                    self.skip_nonzero(len)?;
                    break;
                }
                ItemToken::Other(header) => {
                    warn!(
                        "Unexpected attribute {} #{} @ {}",
                        header.tag, header.len, position
                    );
                    let len = header.len.get().context(UndefinedLengthSnafu {
                        tag: header.tag,
                        position,
                    })?;
                    self.skip(u64::from(len))?;
                }
            }
        }
        Ok(if fragments.is_empty() {
            Value::Empty
        } else {
            Value::Fragments(fragments)
        })
    }

    fn create_bulk_data(&mut self, len: u32) -> Result<BulkData> {
        let big_endian = self.is_big_endian();
        if let (Some(file), false) = (&self.file, self.inflating) {
            let bulk = BulkData::for_file(file.clone(), self.cursor.position(), len, big_endian);
            self.skip(u64::from(len))?;
            return Ok(bulk);
        }

        let mut out = match self.bulk_data_file.take() {
            Some(out) => out,
            None => {
                let out = BulkDataFile::create(&self.options)?;
                self.bulk_data_files.push(out.path.clone());
                out
            }
        };
        let offset = out.offset;
        self.cursor
            .copy_to(u64::from(len), &mut out.out, 0)
            .context(CopyValueSnafu {
                len: u64::from(len),
            })?;
        out.out.flush().context(WriteBulkDataSnafu {
            filename: out.path.clone(),
        })?;
        out.offset += u64::from(len);
        let bulk = BulkData::for_file(out.path.clone(), offset, len, big_endian);
        if self.options.concatenate_bulk_data_files {
            self.bulk_data_file = Some(out);
        }
        Ok(bulk)
    }

    /// Read the next item header of an encapsulated pixel data value.
    ///
    /// Returns the length of the fragment,
    /// or `None` at the sequence delimiter.
    /// Unexpected attributes are skipped.
    pub fn next_item(&mut self) -> Result<Option<u32>> {
        loop {
            let position = self.cursor.position();
            match self.cursor.read_item_token().context(ReadItemHeaderSnafu)? {
                ItemToken::Item(len) => {
                    let len = len.get().context(UndefinedLengthSnafu {
                        tag: Tag::ITEM,
                        position,
                    })?;
                    return Ok(Some(len));
                }
                ItemToken::Delimiter(len) => {
                    self.skip_nonzero(len)?;
                    return Ok(None);
                }
                ItemToken::Other(header) => {
                    warn!(
                        "Unexpected attribute {} #{} @ {}",
                        header.tag, header.len, position
                    );
                    let len = header.len.get().context(UndefinedLengthSnafu {
                        tag: header.tag,
                        position,
                    })?;
                    self.skip(u64::from(len))?;
                }
            }
        }
    }

    /// Read the content of a fragment of the given length.
    pub fn read_fragment(&mut self, len: u32) -> Result<Vec<u8>> {
        self.cursor
            .read_value(len, self.options.allocate_limit)
            .context(ReadValueSnafu {
                tag: Tag::ITEM,
                len,
            })
    }

    /// Dispose of the next `len` bytes.
    pub fn skip_value(&mut self, len: u64) -> Result<()> {
        self.skip(len)
    }

    /// Copy the next `len` bytes to the given writer,
    /// reversing words of `swap_width` bytes (0 for none).
    pub fn copy_value<W>(&mut self, len: u64, to: W, swap_width: usize) -> Result<u64>
    where
        W: Write,
    {
        self.cursor
            .copy_to(len, to, swap_width)
            .context(CopyValueSnafu { len })
    }

    /// Fill the given buffer with the next bytes of the stream.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> Result<()> {
        self.cursor.read_exact(buf).context(ReadValueSnafu {
            tag: tags::PIXEL_DATA,
            len: buf.len() as u32,
        })
    }

    /// The transfer syntax of the data set, if known to the index.
    pub fn transfer_syntax(&self) -> Option<&TransferSyntax> {
        self.options.ts_index.get(&self.ts_uid)
    }

    /// The index used to look up transfer syntaxes.
    pub fn transfer_syntax_index(&self) -> &T {
        &self.options.ts_index
    }
}

impl<'r, D, T> StreamReader<'r, D, T> {
    fn skip(&mut self, len: u64) -> Result<()> {
        self.cursor.skip(len).context(SkipValueSnafu { len })
    }

    fn skip_nonzero(&mut self, len: Length) -> Result<()> {
        match len.get() {
            Some(len) if len > 0 => self.skip(u64::from(len)),
            _ => Ok(()),
        }
    }

    /// The UID of the transfer syntax of the data set.
    pub fn transfer_syntax_uid(&self) -> &str {
        &self.ts_uid
    }

    /// Whether the data set is in big endian.
    pub fn is_big_endian(&self) -> bool {
        self.cursor.endianness() == Endianness::Big
    }

    /// Whether the data set has explicit VR.
    pub fn is_explicit_vr(&self) -> bool {
        self.cursor.is_explicit_vr()
    }

    /// The number of bytes consumed from the source
    /// (after inflation, for deflated data sets).
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// The 128 byte preamble, if the stream had one.
    pub fn preamble(&self) -> Option<&[u8]> {
        self.preamble.as_deref()
    }

    /// Whether the stream starts with a file meta group.
    pub fn has_file_meta(&self) -> bool {
        self.has_file_meta
    }

    /// The file meta group, once read.
    pub fn file_meta(&self) -> Option<&AttributeTree> {
        self.file_meta.as_ref()
    }

    /// Take the file meta group away from the reader.
    pub fn take_file_meta(&mut self) -> Option<AttributeTree> {
        self.file_meta.take()
    }

    /// The files created so far to hold bulk data.
    /// Removing them is up to the caller.
    pub fn bulk_data_files(&self) -> &[PathBuf] {
        &self.bulk_data_files
    }

    /// The path of the source file, for file-backed readers.
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}
