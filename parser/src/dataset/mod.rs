//! Reading and writing whole data sets as attribute trees.
//!
//! A [`StreamReader`] detects the encoding of its input,
//! reads the file meta group if present,
//! and builds an [`AttributeTree`](dcmio_core::AttributeTree) of the data set,
//! leaving out or referencing the values selected by a [`BulkDataDescriptor`].
//! A [`StreamWriter`] does the reverse for a given transfer syntax.

pub mod bulk;
pub mod read;
pub mod write;

pub use self::bulk::{BulkDataDefaults, BulkDataDescriptor, BulkDataSelector};
pub use self::read::{IncludeBulkData, ReadOptions, StreamReader, UnknownUndefinedLength};
pub use self::write::{EncodingOptions, StreamWriter};
