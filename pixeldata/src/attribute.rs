//! Utility module for fetching key image attributes from an attribute tree.

use dcmio_core::{AttributeTree, Tag};
use dcmio_dictionary_std::tags;
use snafu::{ensure, Backtrace, OptionExt, Snafu};

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum GetAttributeError {
    #[snafu(display("Missing required attribute `{}`", name))]
    MissingRequiredField {
        name: &'static str,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not read attribute `{}` as an integer", name))]
    ConvertValue {
        name: &'static str,
        backtrace: Backtrace,
    },

    #[snafu(display("Semantically invalid value `{}` for attribute `{}`", value, name))]
    InvalidValue {
        name: &'static str,
        value: String,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = GetAttributeError> = std::result::Result<T, E>;

/// Get the Columns from the tree
pub fn cols(tree: &AttributeTree) -> Result<u16> {
    retrieve_required_u16(tree, tags::COLUMNS, "Columns")
}

/// Get the Rows from the tree
pub fn rows(tree: &AttributeTree) -> Result<u16> {
    retrieve_required_u16(tree, tags::ROWS, "Rows")
}

/// Get the PhotometricInterpretation from the tree
pub fn photometric_interpretation(tree: &AttributeTree) -> Result<String> {
    Ok(tree
        .string(tags::PHOTOMETRIC_INTERPRETATION)
        .context(MissingRequiredFieldSnafu {
            name: "PhotometricInterpretation",
        })?
        .trim()
        .to_string())
}

/// Get the SamplesPerPixel from the tree
pub fn samples_per_pixel(tree: &AttributeTree) -> Result<u16> {
    retrieve_required_u16(tree, tags::SAMPLES_PER_PIXEL, "SamplesPerPixel")
}

/// Get the PlanarConfiguration from the tree, returning 0 by default
pub fn planar_configuration(tree: &AttributeTree) -> u16 {
    tree.u16(tags::PLANAR_CONFIGURATION).unwrap_or(0)
}

/// Get the BitsAllocated from the tree
pub fn bits_allocated(tree: &AttributeTree) -> Result<u16> {
    retrieve_required_u16(tree, tags::BITS_ALLOCATED, "BitsAllocated")
}

/// Get the BitsStored from the tree,
/// falling back to the given _Bits Allocated_
pub fn bits_stored(tree: &AttributeTree, bits_allocated: u16) -> Result<u16> {
    if !tree.contains(tags::BITS_STORED) {
        return Ok(bits_allocated);
    }
    let bits_stored = retrieve_required_u16(tree, tags::BITS_STORED, "BitsStored")?;
    ensure!(
        bits_stored > 0 && bits_stored <= bits_allocated,
        InvalidValueSnafu {
            name: "BitsStored",
            value: bits_stored.to_string(),
        }
    );
    Ok(bits_stored)
}

/// Get the NumberOfFrames from the tree,
/// returning 1 if it is not present
pub fn number_of_frames(tree: &AttributeTree) -> Result<u32> {
    if tree.value(tags::NUMBER_OF_FRAMES).map_or(true, |v| v.is_empty()) {
        return Ok(1);
    }
    let integer = tree
        .int(tags::NUMBER_OF_FRAMES)
        .context(ConvertValueSnafu {
            name: "NumberOfFrames",
        })?;

    ensure!(
        integer >= 0 && integer <= i64::from(u32::MAX),
        InvalidValueSnafu {
            name: "NumberOfFrames",
            value: integer.to_string(),
        }
    );

    Ok(integer as u32)
}

#[inline]
fn retrieve_required_u16(tree: &AttributeTree, tag: Tag, name: &'static str) -> Result<u16> {
    ensure!(tree.contains(tag), MissingRequiredFieldSnafu { name });
    tree.u16(tag).context(ConvertValueSnafu { name })
}

/// An interpreted representation of the _Pixel Representation_ attribute.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum PixelRepresentation {
    /// unsigned pixel data sample values
    #[default]
    Unsigned,
    /// signed pixel data sample values
    Signed,
}

/// Get the PixelRepresentation from the tree,
/// unsigned when absent
pub fn pixel_representation(tree: &AttributeTree) -> Result<PixelRepresentation> {
    if !tree.contains(tags::PIXEL_REPRESENTATION) {
        return Ok(PixelRepresentation::Unsigned);
    }
    let p = retrieve_required_u16(tree, tags::PIXEL_REPRESENTATION, "PixelRepresentation")?;

    match p {
        0 => Ok(PixelRepresentation::Unsigned),
        1 => Ok(PixelRepresentation::Signed),
        _ => InvalidValueSnafu {
            name: "PixelRepresentation",
            value: p.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::VR;

    #[test]
    fn defaults_and_errors() {
        let mut tree = AttributeTree::new();
        assert!(matches!(
            rows(&tree),
            Err(GetAttributeError::MissingRequiredField { name: "Rows", .. })
        ));
        assert_eq!(number_of_frames(&tree).unwrap(), 1);
        assert_eq!(planar_configuration(&tree), 0);
        assert_eq!(pixel_representation(&tree).unwrap(), PixelRepresentation::Unsigned);
        assert_eq!(bits_stored(&tree, 16).unwrap(), 16);

        tree.put_u16(tags::ROWS, 512);
        tree.put_str(tags::NUMBER_OF_FRAMES, VR::IS, " 3");
        tree.put_u16(tags::BITS_STORED, 17);
        tree.put_u16(tags::PIXEL_REPRESENTATION, 2);
        tree.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2 ");
        assert_eq!(rows(&tree).unwrap(), 512);
        assert_eq!(number_of_frames(&tree).unwrap(), 3);
        assert_eq!(photometric_interpretation(&tree).unwrap(), "MONOCHROME2");
        assert!(matches!(
            bits_stored(&tree, 16),
            Err(GetAttributeError::InvalidValue { name: "BitsStored", .. })
        ));
        assert!(pixel_representation(&tree).is_err());
    }
}
