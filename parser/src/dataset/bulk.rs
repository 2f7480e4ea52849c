//! Policies deciding which attributes hold bulk data.
//!
//! A value deemed bulk data can be left out of the attribute tree,
//! or be replaced with a reference to its location in a file,
//! depending on the reader's [`IncludeBulkData`](super::read::IncludeBulkData) option.

use dcmio_core::header::{Length, Tag, VR};
use dcmio_core::tree::AttributePath;
use dcmio_dictionary_std::tags;
use std::collections::BTreeMap;

/// The attributes recognized as bulk data regardless of selectors.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum BulkDataDefaults {
    /// Large payloads at the root level of the data set
    /// (pixel data, overlay data, audio, curve and spectroscopy data,
    /// encapsulated documents),
    /// plus waveform data directly inside a waveform sequence.
    Standard,
    /// Pixel data at the root level only.
    PixelData,
    /// Nothing.
    None,
}

/// A rule selecting attributes as bulk data.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum BulkDataSelector {
    /// Any attribute with this tag, at any level.
    Tag(Tag),
    /// The attribute with this tag within exactly this item path.
    Path {
        /// the enclosing items
        path: AttributePath,
        /// the attribute tag
        tag: Tag,
    },
    /// Any occurrence of a private attribute,
    /// identified by its group, private creator,
    /// and the low byte of its element number.
    PrivateTag {
        /// the private group
        group: u16,
        /// the private creator reserving the block
        creator: String,
        /// the element number within the block
        element: u8,
    },
}

impl BulkDataSelector {
    fn matches(&self, path: &AttributePath, private_creator: Option<&str>, tag: Tag) -> bool {
        match self {
            BulkDataSelector::Tag(t) => *t == tag,
            BulkDataSelector::Path { path: p, tag: t } => *t == tag && p == path,
            BulkDataSelector::PrivateTag {
                group,
                creator,
                element,
            } => {
                tag.is_private()
                    && tag.group() == *group
                    && (tag.element() & 0x00FF) as u8 == *element
                    && private_creator == Some(creator.as_str())
            }
        }
    }
}

/// A policy answering whether an attribute holds bulk data,
/// given its item path, private creator, tag, VR and length.
///
/// # Example
///
/// ```
/// # use dcmio_core::{AttributePath, Length, Tag, VR};
/// # use dcmio_parser::dataset::BulkDataDescriptor;
/// let descriptor = BulkDataDescriptor::DEFAULT.with_threshold(VR::OB, 1024);
/// let root = AttributePath::root();
/// assert!(!descriptor.is_bulk_data(&root, None, Tag(0x0009, 0x1001), VR::OB, Length(1024)));
/// assert!(descriptor.is_bulk_data(&root, None, Tag(0x0009, 0x1001), VR::OB, Length(1025)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDataDescriptor {
    defaults: BulkDataDefaults,
    selectors: Vec<BulkDataSelector>,
    thresholds: BTreeMap<VR, u32>,
}

impl Default for BulkDataDescriptor {
    fn default() -> Self {
        BulkDataDescriptor::DEFAULT
    }
}

impl BulkDataDescriptor {
    /// The standard set of large payload attributes.
    pub const DEFAULT: BulkDataDescriptor = BulkDataDescriptor {
        defaults: BulkDataDefaults::Standard,
        selectors: Vec::new(),
        thresholds: BTreeMap::new(),
    };

    /// Root level pixel data only.
    pub const PIXEL_DATA: BulkDataDescriptor = BulkDataDescriptor {
        defaults: BulkDataDefaults::PixelData,
        selectors: Vec::new(),
        thresholds: BTreeMap::new(),
    };

    /// A descriptor which recognizes nothing as bulk data,
    /// to be extended with selectors and thresholds.
    pub fn never() -> Self {
        BulkDataDescriptor {
            defaults: BulkDataDefaults::None,
            selectors: Vec::new(),
            thresholds: BTreeMap::new(),
        }
    }

    /// Replace the set of default attributes.
    pub fn with_defaults(mut self, defaults: BulkDataDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a selector.
    pub fn with_selector(mut self, selector: BulkDataSelector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Consider any value of the given VR longer than `threshold` bytes
    /// as bulk data.
    pub fn with_threshold(mut self, vr: VR, threshold: u32) -> Self {
        self.thresholds.insert(vr, threshold);
        self
    }

    /// Decide whether the attribute holds bulk data.
    pub fn is_bulk_data(
        &self,
        path: &AttributePath,
        private_creator: Option<&str>,
        tag: Tag,
        vr: VR,
        len: Length,
    ) -> bool {
        if tag.is_private_creator() {
            return false;
        }
        if self.is_default_bulk_data(path, tag) {
            return true;
        }
        if self
            .selectors
            .iter()
            .any(|s| s.matches(path, private_creator, tag))
        {
            return true;
        }
        match (self.thresholds.get(&vr), len.get()) {
            (Some(&threshold), Some(len)) => len > threshold,
            _ => false,
        }
    }

    fn is_default_bulk_data(&self, path: &AttributePath, tag: Tag) -> bool {
        match self.defaults {
            BulkDataDefaults::None => false,
            BulkDataDefaults::PixelData => path.is_root() && tag == tags::PIXEL_DATA,
            BulkDataDefaults::Standard => match normalize_repeating_group(tag) {
                tags::PIXEL_DATA_PROVIDER_URL
                | tags::AUDIO_SAMPLE_DATA
                | tags::CURVE_DATA
                | tags::SPECTROSCOPY_DATA
                | tags::OVERLAY_DATA
                | tags::ENCAPSULATED_DOCUMENT
                | tags::FLOAT_PIXEL_DATA
                | tags::DOUBLE_FLOAT_PIXEL_DATA
                | tags::PIXEL_DATA => path.is_root(),
                tags::WAVEFORM_DATA => {
                    path.level() == 1
                        && path
                            .last()
                            .map(|p| p.sequence_tag == tags::WAVEFORM_SEQUENCE)
                            .unwrap_or(false)
                }
                _ => false,
            },
        }
    }
}

/// Map the curve (50xx) and overlay (60xx) groups to their base group.
fn normalize_repeating_group(tag: Tag) -> Tag {
    let base = tag.group() & 0xFF00;
    if (base == 0x5000 || base == 0x6000) && tag.group() & 1 == 0 {
        Tag(base, tag.element())
    } else {
        tag
    }
}
