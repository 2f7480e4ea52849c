//! Stream reading and writing of attribute trees.
//!
//! This crate turns byte streams in any of the supported transfer syntaxes
//! into [`AttributeTree`](dcmio_core::AttributeTree)s and back.
//!
//! - [`dataset::StreamReader`] detects the encoding of its input,
//!   reads the file meta group and the data set,
//!   and applies a bulk data policy to large values.
//! - [`dataset::StreamWriter`] encodes trees in a given transfer syntax,
//!   with configurable sequence and item lengths.
//! - [`meta`] creates file meta groups.
//! - [`stateful`] holds the lower level cursor and encoder
//!   used by both, also useful for pixel data streaming.
//!
//! All APIs are based on synchronous I/O.
//!
//! # Example
//!
//! ```no_run
//! use dcmio_parser::dataset::{IncludeBulkData, ReadOptions};
//!
//! let mut reader = ReadOptions::new()
//!     .include_bulk_data(IncludeBulkData::Uri)
//!     .open_file("image.dcm")?;
//! let tree = reader.read_dataset()?;
//! println!("{} attributes", tree.len());
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

pub mod dataset;
pub mod meta;
pub mod stateful;

pub use dataset::{ReadOptions, StreamReader, StreamWriter};
pub use stateful::decode::StreamCursor;
pub use stateful::encode::StatefulEncoder;
