#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! Core concepts and data structures of the `dcmio` codec.
//!
//! - [`header`] comprises the attribute header types,
//!   including tags, value representations and lengths.
//! - [`value`] holds attribute values, including bulk data references
//!   and encapsulated fragments.
//! - [`tree`] holds the ordered attribute tree and item paths.
//! - [`dictionary`] describes the attribute dictionary collaborator.

pub mod dictionary;
pub mod header;
pub mod tree;
pub mod util;
pub mod value;

pub use dictionary::DataDictionary;
pub use header::{DataElementHeader, HasLength, Header, Length, SequenceItemHeader, Tag, VR};
pub use tree::{Attribute, AttributePath, AttributeTree, ItemPointer};
pub use value::{BulkData, Fragment, Numbers, Value, C};

// re-export crates that are part of the public API
pub use smallvec;
