//! The concept of an attribute dictionary,
//! the collaborator translating tags into value representations and keywords.
//!
//! The standard dictionary lives in the `dcmio-dictionary-std` crate.

pub mod stub;

pub use self::stub::StubDataDictionary;

use crate::header::{Tag, VR};
use std::fmt::Debug;

/// Type trait for a dictionary of attributes.
///
/// The methods herein have no generic parameters,
/// so as to enable being used as a trait object.
pub trait DataDictionary: Debug {
    /// The typical value representation of the attribute,
    /// or `UN` if the attribute is not known.
    ///
    /// `private_creator` is the value of the private creator element
    /// reserving the block of a private tag.
    fn vr_of(&self, tag: Tag, private_creator: Option<&str>) -> VR;

    /// The keyword of the attribute (e.g. `PatientName`), if known.
    fn keyword_of(&self, tag: Tag, private_creator: Option<&str>) -> Option<&str>;
}

impl<D> DataDictionary for &D
where
    D: DataDictionary + ?Sized,
{
    fn vr_of(&self, tag: Tag, private_creator: Option<&str>) -> VR {
        (**self).vr_of(tag, private_creator)
    }

    fn keyword_of(&self, tag: Tag, private_creator: Option<&str>) -> Option<&str> {
        (**self).keyword_of(tag, private_creator)
    }
}

impl<D> DataDictionary for Box<D>
where
    D: DataDictionary + ?Sized,
{
    fn vr_of(&self, tag: Tag, private_creator: Option<&str>) -> VR {
        (**self).vr_of(tag, private_creator)
    }

    fn keyword_of(&self, tag: Tag, private_creator: Option<&str>) -> Option<&str> {
        (**self).keyword_of(tag, private_creator)
    }
}

/// A dictionary entry with a string slice for its keyword.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag
    pub tag: Tag,
    /// The keyword of the attribute, in UpperCamelCase
    pub alias: &'a str,
    /// The typical value representation of the attribute
    pub vr: VR,
}

/// The value representation which applies to a tag
/// regardless of any dictionary:
/// group lengths are UL and private creators are LO.
/// Item-level tags have no value representation, reported as `UN`.
pub fn structural_vr(tag: Tag) -> Option<VR> {
    if tag.is_item_level() {
        Some(VR::UN)
    } else if tag.is_group_length() {
        Some(VR::UL)
    } else if tag.is_private_creator() {
        Some(VR::LO)
    } else {
        None
    }
}
