//! The fixed quantization palette.
//!
//! Quantization never chooses colors adaptively: every output pixel is one
//! of the first K entries of [`REFERENCE_PALETTE`], picked by intensity
//! bucket. The table is plain static data and is never mutated.

use super::color::Color;
use crate::level::QuantLevel;

/// Number of entries in every [`Palette`].
pub const PALETTE_SIZE: usize = 10;

/// The reference palette, channels in B, G, R storage order.
///
/// The values are fixed benchmark data and
/// carry no algorithmic meaning. Index 0 is black; brighter inputs land on
/// higher indices but the entries themselves are not sorted by intensity.
pub static REFERENCE_PALETTE: Palette = Palette::new([
    Color::new(0, 0, 0),
    Color::new(127, 0, 0),
    Color::new(255, 0, 0),
    Color::new(0, 127, 0),
    Color::new(0, 255, 0),
    Color::new(0, 0, 127),
    Color::new(0, 0, 255),
    Color::new(127, 0, 127),
    Color::new(127, 127, 0),
    Color::new(0, 127, 127),
]);

/// An ordered table of exactly [`PALETTE_SIZE`] colors.
///
/// A [`QuantLevel`] of K makes the first K entries addressable; see
/// [`Palette::active`].
///
/// # Example
///
/// ```
/// use intensity_quant::{Color, QuantLevel, REFERENCE_PALETTE};
///
/// let level = QuantLevel::new(4).unwrap();
/// assert_eq!(REFERENCE_PALETTE.active(level).len(), 4);
/// assert_eq!(REFERENCE_PALETTE.get(0), Color::BLACK);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Color; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette from a full table of entries.
    pub const fn new(entries: [Color; PALETTE_SIZE]) -> Self {
        Self { entries }
    }

    /// Number of entries (always [`PALETTE_SIZE`]).
    #[inline]
    pub const fn len(&self) -> usize {
        PALETTE_SIZE
    }

    /// A palette is never empty; provided for API symmetry with `len`.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Entry at `index`, or `None` past the end of the table.
    #[inline]
    pub fn entry(&self, index: usize) -> Option<Color> {
        self.entries.get(index).copied()
    }

    /// Entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PALETTE_SIZE`. Indices produced by
    /// [`quant_index`](crate::quant_index) are always in range.
    #[inline]
    pub fn get(&self, index: usize) -> Color {
        self.entries[index]
    }

    /// The entries addressable at `level`: the first K colors.
    #[inline]
    pub fn active(&self, level: QuantLevel) -> &[Color] {
        &self.entries[..level.count()]
    }

    /// Iterate over all entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        REFERENCE_PALETTE.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_palette_literal_values() {
        let expected: [[u8; 3]; PALETTE_SIZE] = [
            [0, 0, 0],
            [127, 0, 0],
            [255, 0, 0],
            [0, 127, 0],
            [0, 255, 0],
            [0, 0, 127],
            [0, 0, 255],
            [127, 0, 127],
            [127, 127, 0],
            [0, 127, 127],
        ];
        for (i, bytes) in expected.iter().enumerate() {
            assert_eq!(REFERENCE_PALETTE.get(i).to_bytes(), *bytes, "entry {i}");
        }
    }

    #[test]
    fn test_entry_out_of_range() {
        assert_eq!(REFERENCE_PALETTE.entry(9), Some(Color::new(0, 127, 127)));
        assert_eq!(REFERENCE_PALETTE.entry(10), None);
    }

    #[test]
    fn test_active_prefix() {
        for k in QuantLevel::MIN..=QuantLevel::MAX {
            let level = QuantLevel::new(k).unwrap();
            let active = REFERENCE_PALETTE.active(level);
            assert_eq!(active.len(), k as usize);
            assert_eq!(active[0], Color::BLACK);
            assert_eq!(active.last().copied(), REFERENCE_PALETTE.entry(k as usize - 1));
        }
    }

    #[test]
    fn test_default_is_reference() {
        assert_eq!(Palette::default(), REFERENCE_PALETTE);
        assert_eq!(REFERENCE_PALETTE.iter().count(), PALETTE_SIZE);
        assert!(!REFERENCE_PALETTE.is_empty());
    }
}
