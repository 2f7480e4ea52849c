//! In-memory representation of attribute values.

use crate::header::Tag;
use crate::tree::AttributeTree;
use smallvec::SmallVec;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// A sequence of binary numbers, in native memory form.
#[derive(Debug, Clone, PartialEq)]
pub enum Numbers {
    /// unsigned 16-bit integers (US)
    U16(C<u16>),
    /// signed 16-bit integers (SS)
    I16(C<i16>),
    /// unsigned 32-bit integers (UL)
    U32(C<u32>),
    /// signed 32-bit integers (SL)
    I32(C<i32>),
    /// unsigned 64-bit integers (UV)
    U64(C<u64>),
    /// signed 64-bit integers (SV)
    I64(C<i64>),
    /// single precision floats (FL)
    F32(C<f32>),
    /// double precision floats (FD)
    F64(C<f64>),
    /// attribute tags (AT)
    Tags(C<Tag>),
}

impl Numbers {
    /// The number of values.
    pub fn len(&self) -> usize {
        match self {
            Numbers::U16(v) => v.len(),
            Numbers::I16(v) => v.len(),
            Numbers::U32(v) => v.len(),
            Numbers::I32(v) => v.len(),
            Numbers::U64(v) => v.len(),
            Numbers::I64(v) => v.len(),
            Numbers::F32(v) => v.len(),
            Numbers::F64(v) => v.len(),
            Numbers::Tags(v) => v.len(),
        }
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The size of a single value in bytes.
    pub fn width(&self) -> usize {
        match self {
            Numbers::U16(_) | Numbers::I16(_) => 2,
            Numbers::U32(_) | Numbers::I32(_) | Numbers::F32(_) | Numbers::Tags(_) => 4,
            Numbers::U64(_) | Numbers::I64(_) | Numbers::F64(_) => 8,
        }
    }

    /// The encoded size of all values in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.width()
    }

    /// Retrieve the first value as a signed integer,
    /// if it is an integer which fits.
    pub fn first_int(&self) -> Option<i64> {
        match self {
            Numbers::U16(v) => v.first().map(|&x| i64::from(x)),
            Numbers::I16(v) => v.first().map(|&x| i64::from(x)),
            Numbers::U32(v) => v.first().map(|&x| i64::from(x)),
            Numbers::I32(v) => v.first().map(|&x| i64::from(x)),
            Numbers::U64(v) => v.first().and_then(|&x| i64::try_from(x).ok()),
            Numbers::I64(v) => v.first().copied(),
            _ => None,
        }
    }
}

/// A reference to a value held outside of memory:
/// a byte range in a file identified by its URI.
///
/// This type owns no data.
/// The referenced range is only valid while the file exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BulkData {
    /// location of the file holding the value
    pub uri: String,
    /// byte offset of the value in the file
    pub offset: u64,
    /// length of the value in bytes
    pub length: u32,
    /// whether the referenced bytes are in big endian
    pub big_endian: bool,
}

impl BulkData {
    /// Create a reference to a byte range of a file,
    /// turning the path into a `file:` URI.
    pub fn for_file(path: impl Into<PathBuf>, offset: u64, length: u32, big_endian: bool) -> Self {
        let path = path.into();
        BulkData {
            uri: format!("file://{}", path.display()),
            offset,
            length,
            big_endian,
        }
    }

    /// The local file path behind the URI, if it designates a local file.
    pub fn file_path(&self) -> Option<PathBuf> {
        let path = self.uri.split('?').next().unwrap_or_default();
        if let Some(path) = path.strip_prefix("file://") {
            Some(PathBuf::from(path))
        } else if path.contains("://") {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// Render the reference as a single URI
    /// carrying the offset and length as query parameters.
    pub fn to_uri(&self) -> String {
        format!("{}?offset={}&length={}", self.uri, self.offset, self.length)
    }

    /// Fetch the referenced bytes from an open handle to the file.
    pub fn read_from<R>(&self, mut source: R) -> io::Result<Vec<u8>>
    where
        R: Read + Seek,
    {
        source.seek(SeekFrom::Start(self.offset))?;
        let mut out = vec![0; self.length as usize];
        source.read_exact(&mut out)?;
        Ok(out)
    }

    /// Copy the referenced bytes from an open handle to the file
    /// into the given writer, without holding them all in memory.
    pub fn copy_to<R, W>(&self, mut source: R, to: W) -> io::Result<u64>
    where
        R: Read + Seek,
        W: Write,
    {
        source.seek(SeekFrom::Start(self.offset))?;
        let mut to = to;
        let copied = io::copy(&mut source.take(u64::from(self.length)), &mut to)?;
        if copied < u64::from(self.length) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "bulk data file is shorter than the referenced range",
            ));
        }
        Ok(copied)
    }
}

/// One item of a fragmented value.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// fragment bytes held in memory
    Inline(Vec<u8>),
    /// fragment bytes held elsewhere
    BulkData(BulkData),
}

impl Fragment {
    /// The length of the fragment in bytes.
    pub fn len(&self) -> u32 {
        match self {
            Fragment::Inline(data) => data.len() as u32,
            Fragment::BulkData(bulk) => bulk.length,
        }
    }

    /// Whether the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// no value
    Empty,
    /// raw bytes in the byte order of the owning tree
    Bytes(Vec<u8>),
    /// one or more strings
    Strs(C<String>),
    /// one or more binary numbers
    Numbers(Numbers),
    /// nested items
    Sequence(Vec<AttributeTree>),
    /// encapsulated pixel data items, starting with the basic offset table
    Fragments(Vec<Fragment>),
    /// a reference to a value held in a file
    BulkData(BulkData),
}

impl Value {
    /// Create a value from a single string.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Strs(smallvec::smallvec![value.into()])
    }

    /// Create a value from a list of unsigned 16-bit integers.
    pub fn from_u16s(values: impl IntoIterator<Item = u16>) -> Self {
        Value::Numbers(Numbers::U16(values.into_iter().collect()))
    }

    /// Whether the value holds no data.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Bytes(b) => b.is_empty(),
            Value::Strs(s) => s.iter().all(|s| s.is_empty()),
            Value::Numbers(n) => n.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            Value::Fragments(f) => f.is_empty(),
            Value::BulkData(b) => b.length == 0,
        }
    }

    /// The strings in the value, if it is a textual value.
    pub fn strings(&self) -> Option<&[String]> {
        match self {
            Value::Strs(s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes in the value, if held inline.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The nested items, if this is a sequence.
    pub fn items(&self) -> Option<&[AttributeTree]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the nested items, if this is a sequence.
    pub fn items_mut(&mut self) -> Option<&mut Vec<AttributeTree>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The fragments, if this is a fragmented value.
    pub fn fragments(&self) -> Option<&[Fragment]> {
        match self {
            Value::Fragments(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bulk_data_uri() {
        let bulk = BulkData::for_file("/tmp/blk123.bin", 1024, 512, false);
        assert_eq!(bulk.uri, "file:///tmp/blk123.bin");
        assert_eq!(
            bulk.to_uri(),
            "file:///tmp/blk123.bin?offset=1024&length=512"
        );
        assert_eq!(bulk.file_path(), Some(PathBuf::from("/tmp/blk123.bin")));

        let remote = BulkData {
            uri: "http://example.org/bulk/1".to_string(),
            offset: 0,
            length: 4,
            big_endian: false,
        };
        assert_eq!(remote.file_path(), None);
    }

    #[test]
    fn bulk_data_materialize() {
        let source: Vec<u8> = (0..32).collect();
        let bulk = BulkData::for_file("/dev/null", 4, 6, false);
        let bytes = bulk.read_from(Cursor::new(&source)).unwrap();
        assert_eq!(bytes, vec![4, 5, 6, 7, 8, 9]);

        let mut out = Vec::new();
        bulk.copy_to(Cursor::new(&source), &mut out).unwrap();
        assert_eq!(out, bytes);

        let past_end = BulkData::for_file("/dev/null", 30, 6, false);
        assert!(past_end.read_from(Cursor::new(&source)).is_err());
        assert!(past_end.copy_to(Cursor::new(&source), Vec::new()).is_err());
    }

    #[test]
    fn numbers_sizes() {
        let n = Numbers::U16(smallvec::smallvec![1, 2, 3]);
        assert_eq!(n.len(), 3);
        assert_eq!(n.byte_len(), 6);
        assert_eq!(n.first_int(), Some(1));
        assert_eq!(Numbers::F32(C::new()).first_int(), None);
    }
}
