use crate::tags::ENTRIES;
use dcmio_core::dictionary::{structural_vr, DataDictionary, DictionaryEntryRef};
use dcmio_core::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

static DICT: Lazy<StandardDataDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
#[inline]
pub fn registry() -> &'static StandardDataDictionaryRegistry {
    &DICT
}

/// The data struct actually containing the standard dictionary.
///
/// This structure is made opaque via the unit type [`StandardDataDictionary`],
/// which provides a lazy loaded singleton.
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: keyword → entry
    by_name: HashMap<&'static str, &'static DictionaryEntryRef<'static>>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, &'static DictionaryEntryRef<'static>>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> StandardDataDictionaryRegistry {
        StandardDataDictionaryRegistry {
            by_name: HashMap::with_capacity(ENTRIES.len()),
            by_tag: HashMap::with_capacity(ENTRIES.len()),
        }
    }

    /// record the given dictionary entry reference
    fn index(&mut self, entry: &'static DictionaryEntryRef<'static>) -> &mut Self {
        self.by_name.insert(entry.alias, entry);
        self.by_tag.insert(entry.tag, entry);
        self
    }
}

/// A data element dictionary which consults
/// the library's global attribute registry.
///
/// Private attributes other than private creators are not known,
/// whatever their creator.
/// The dictionary index is automatically initialized upon the first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl StandardDataDictionary {
    fn indexed_tag(tag: Tag) -> Option<&'static DictionaryEntryRef<'static>> {
        let r = registry();
        r.by_tag.get(&tag).copied().or_else(|| {
            // curve (50xx) and overlay (60xx) groups repeat in even groups
            let base = tag.0 & 0xFF00;
            if (base == 0x5000 || base == 0x6000) && tag.0 & 1 == 0 {
                r.by_tag.get(&Tag(base, tag.1)).copied()
            } else {
                None
            }
        })
    }

    /// Fetch an entry by its keyword (e.g. "PatientName").
    pub fn by_name(&self, name: &str) -> Option<&'static DictionaryEntryRef<'static>> {
        registry().by_name.get(name).copied()
    }

    /// Fetch an entry by its tag.
    pub fn by_tag(&self, tag: Tag) -> Option<&'static DictionaryEntryRef<'static>> {
        StandardDataDictionary::indexed_tag(tag)
    }
}

impl DataDictionary for StandardDataDictionary {
    fn vr_of(&self, tag: Tag, _private_creator: Option<&str>) -> VR {
        if let Some(vr) = structural_vr(tag) {
            return vr;
        }
        if tag.is_private() {
            return VR::UN;
        }
        StandardDataDictionary::indexed_tag(tag)
            .map(|e| e.vr)
            .unwrap_or(VR::UN)
    }

    fn keyword_of(&self, tag: Tag, private_creator: Option<&str>) -> Option<&str> {
        if tag.is_private() && private_creator.is_some() {
            return None;
        }
        StandardDataDictionary::indexed_tag(tag).map(|e| e.alias)
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index(entry);
    }
    d
}
