//! Byte-level helpers shared across the workspace.

/// Reverse the byte order of each `width`-byte word in place.
/// Widths below 2 leave the data untouched,
/// as does any trailing partial word.
pub fn toggle_endian(data: &mut [u8], width: usize) {
    if width < 2 {
        return;
    }
    for word in data.chunks_exact_mut(width) {
        word.reverse();
    }
}

/// Round a length up to the next even number.
#[inline]
pub fn even(len: u32) -> u32 {
    len + (len & 1)
}
