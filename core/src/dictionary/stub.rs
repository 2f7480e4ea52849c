//! A dictionary which knows no attributes.

use super::{structural_vr, DataDictionary};
use crate::header::{Tag, VR};

/// An empty attribute dictionary.
///
/// Only the structural value representations
/// (group lengths, private creators) are resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubDataDictionary;

impl DataDictionary for StubDataDictionary {
    fn vr_of(&self, tag: Tag, _: Option<&str>) -> VR {
        structural_vr(tag).unwrap_or(VR::UN)
    }

    fn keyword_of(&self, _: Tag, _: Option<&str>) -> Option<&str> {
        None
    }
}
