//! This crate implements the standard attribute dictionary and constants.
//!
//! - [`data_element`]: attributes with their value representation and keyword,
//!   queried at run time through [`StandardDataDictionary`].
//! - [`tags`]: constants mapping attribute keywords to tags.
//! - [`uids`]: transfer syntax and SOP class unique identifiers.
//!
//! The catalog covers the attributes handled by the codec
//! and those commonly found at the start of a data set.
pub mod data_element;
pub mod tags;
pub mod uids;

pub use data_element::{StandardDataDictionary, StandardDataDictionaryRegistry};
