//! Palette color look-up tables.
//!
//! This module contains the [`PaletteLut`] data type,
//! which turns the indices of a _PALETTE COLOR_ image
//! into 8-bit RGB triplets.

use dcmio_core::{AttributeTree, Tag};
use dcmio_dictionary_std::tags;
use snafu::{ensure, OptionExt, Snafu};

/// The palette color look-up table could not be created.
#[derive(Debug, PartialEq, Snafu)]
#[non_exhaustive]
pub enum CreateLutError {
    /// Missing or malformed {channel} palette descriptor
    InvalidDescriptor { channel: &'static str },
    /// Missing {channel} palette data
    MissingData { channel: &'static str },
    /// Segmented {channel} palette data is not supported
    SegmentedData { channel: &'static str },
    /// Unsupported {bits} bits per {channel} palette entry
    EntryBits { channel: &'static str, bits: u16 },
    /// {channel} palette data holds {actual} entries instead of {expected}
    DataLength {
        channel: &'static str,
        actual: usize,
        expected: usize,
    },
}

struct Channel {
    name: &'static str,
    descriptor: Tag,
    data: Tag,
    segmented: Tag,
}

const CHANNELS: [Channel; 3] = [
    Channel {
        name: "red",
        descriptor: tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
        data: tags::RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        segmented: tags::SEGMENTED_RED_PALETTE_COLOR_LOOKUP_TABLE_DATA,
    },
    Channel {
        name: "green",
        descriptor: tags::GREEN_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
        data: tags::GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        segmented: tags::SEGMENTED_GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA,
    },
    Channel {
        name: "blue",
        descriptor: tags::BLUE_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR,
        data: tags::BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA,
        segmented: tags::SEGMENTED_BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA,
    },
];

/// A look-up table from stored palette indices to RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteLut {
    /// the first index mapped by the table
    first: i32,
    /// one table per channel, all of the same size
    tables: [Vec<u8>; 3],
}

impl PaletteLut {
    /// Create the table from the palette color attributes of a data set.
    ///
    /// Entries of 16 bits are narrowed to their 8 most significant bits.
    pub fn from_tree(tree: &AttributeTree) -> Result<Self, CreateLutError> {
        let mut first = 0;
        let mut tables: [Vec<u8>; 3] = Default::default();
        for (channel, table) in CHANNELS.iter().zip(tables.iter_mut()) {
            let (len, first_mapped, bits) = read_descriptor(tree, channel)?;
            first = first_mapped;
            *table = read_table(tree, channel, len, bits)?;
        }
        let len = tables[0].len();
        for (channel, table) in CHANNELS.iter().zip(&tables).skip(1) {
            ensure!(
                table.len() == len,
                DataLengthSnafu {
                    channel: channel.name,
                    actual: table.len(),
                    expected: len,
                }
            );
        }
        Ok(PaletteLut { first, tables })
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.tables[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a stored index.
    /// Indices out of range map to the first or last entry.
    pub fn get(&self, index: i32) -> [u8; 3] {
        let last = self.len().saturating_sub(1) as i64;
        let i = (i64::from(index) - i64::from(self.first)).clamp(0, last) as usize;
        [self.tables[0][i], self.tables[1][i], self.tables[2][i]]
    }

    /// Map a native frame of indices to interleaved 8-bit RGB.
    ///
    /// Samples of 16 bits are read in little endian.
    pub fn apply(&self, frame: &[u8], bits_allocated: u16) -> Vec<u8> {
        if bits_allocated > 8 {
            frame
                .chunks_exact(2)
                .flat_map(|c| self.get(i32::from(u16::from_le_bytes([c[0], c[1]]))))
                .collect()
        } else {
            frame.iter().flat_map(|&i| self.get(i32::from(i))).collect()
        }
    }
}

/// Remove the palette color look-up table attributes from a data set.
pub fn remove_palette_attributes(tree: &mut AttributeTree) {
    tree.remove(tags::PALETTE_COLOR_LOOKUP_TABLE_UID);
    for channel in &CHANNELS {
        tree.remove(channel.descriptor);
        tree.remove(channel.data);
        tree.remove(channel.segmented);
    }
}

fn read_descriptor(
    tree: &AttributeTree,
    channel: &Channel,
) -> Result<(usize, i32, u16), CreateLutError> {
    let descriptor = tree
        .u16_values(channel.descriptor)
        .filter(|d| d.len() == 3)
        .context(InvalidDescriptorSnafu {
            channel: channel.name,
        })?;
    let len = match descriptor[0] {
        0 => 0x10000,
        n => usize::from(n),
    };
    // the first mapped value takes the signedness of the pixel data
    let first = if tree.int_or(tags::PIXEL_REPRESENTATION, 0) == 1 {
        i32::from(descriptor[1] as i16)
    } else {
        i32::from(descriptor[1])
    };
    Ok((len, first, descriptor[2]))
}

fn read_table(
    tree: &AttributeTree,
    channel: &Channel,
    len: usize,
    bits: u16,
) -> Result<Vec<u8>, CreateLutError> {
    ensure!(
        !tree.contains(channel.segmented),
        SegmentedDataSnafu {
            channel: channel.name
        }
    );
    let words = tree.u16_values(channel.data).context(MissingDataSnafu {
        channel: channel.name,
    })?;
    let table: Vec<u8> = match bits {
        16 => words.iter().map(|&w| (w >> 8) as u8).collect(),
        // 8-bit entries, either packed in pairs or one per word
        8 if words.len() * 2 == len || words.len() * 2 == len + 1 => words
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .take(len)
            .collect(),
        8 => words.iter().map(|&w| w as u8).collect(),
        bits => {
            return EntryBitsSnafu {
                channel: channel.name,
                bits,
            }
            .fail()
        }
    };
    ensure!(
        table.len() == len,
        DataLengthSnafu {
            channel: channel.name,
            actual: table.len(),
            expected: len,
        }
    );
    Ok(table)
}
