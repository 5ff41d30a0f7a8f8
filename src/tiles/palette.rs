//! # Palette Deduplicator
//!
//! Grows a table of unique 4-colour palettes. A tile reuses the first palette whose slots already
//! contain all of its colours; otherwise a new palette is appended.

use log::debug;

use super::{Palette, MAX_PALETTES};
use crate::{
    error::{PackError, Result},
    pixel::Pixel,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteTable {
    palettes: Vec<Palette>,
}

impl PaletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the palette that will serve `colours`, appending one if needed.
    ///
    /// First fit in insertion order, not best fit. The zero pixel never reaches here as a
    /// candidate (its alpha is 0), so zero-filled slots cannot satisfy a real colour. An empty
    /// candidate set is contained in every palette and takes index 0 when the table is not empty.
    pub fn commit(&mut self, colours: &[Pixel]) -> Result<usize> {
        if let Some(index) = self.palettes.iter().position(|p| p.contains_all(colours)) {
            return Ok(index);
        }

        if self.palettes.len() >= MAX_PALETTES {
            return Err(PackError::PaletteTableFull);
        }

        let index = self.palettes.len();
        self.palettes.push(Palette::from_colours(colours));
        debug!("new palette {} with {} colours", index, colours.len());
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn as_slice(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn into_vec(self) -> Vec<Palette> {
        self.palettes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ZERO_PIXEL;
    use image::Rgba;

    fn colour(n: u8) -> Pixel {
        Rgba([n, 10, 20, 255])
    }

    #[test]
    fn test_subset_reuses_existing_palette() {
        let mut table = PaletteTable::new();
        assert_eq!(table.commit(&[colour(1), colour(2), colour(3)]).unwrap(), 0);
        // Different first-seen order and a strict subset both match
        assert_eq!(table.commit(&[colour(3), colour(1)]).unwrap(), 0);
        assert_eq!(table.commit(&[colour(2)]).unwrap(), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_first_fit_not_best_fit() {
        let mut table = PaletteTable::new();
        table.commit(&[colour(1), colour(2), colour(3), colour(4)]).unwrap();
        table.commit(&[colour(1)]).unwrap();
        assert_eq!(table.len(), 1);

        table.commit(&[colour(5)]).unwrap();
        assert_eq!(table.len(), 2);
        // colour(1) is an exact match for neither, but palette 0 comes first
        assert_eq!(table.commit(&[colour(1)]).unwrap(), 0);
    }

    #[test]
    fn test_superset_appends_new_palette() {
        let mut table = PaletteTable::new();
        table.commit(&[colour(1)]).unwrap();
        assert_eq!(table.commit(&[colour(1), colour(2)]).unwrap(), 1);
        let palette = table.get(1).unwrap();
        assert_eq!(palette.0, [colour(1), colour(2), ZERO_PIXEL, ZERO_PIXEL]);
    }

    #[test]
    fn test_empty_colour_set() {
        let mut table = PaletteTable::new();
        assert_eq!(table.commit(&[]).unwrap(), 0);
        assert_eq!(table.get(0).unwrap(), &Palette::default());

        let mut table = PaletteTable::new();
        table.commit(&[colour(9)]).unwrap();
        assert_eq!(table.commit(&[]).unwrap(), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zero_slots_never_match_real_colours() {
        let mut table = PaletteTable::new();
        table.commit(&[]).unwrap();
        // An all-zero palette must not absorb a real colour
        assert_eq!(table.commit(&[colour(1)]).unwrap(), 1);
    }

    #[test]
    fn test_ninth_palette_fails() {
        let mut table = PaletteTable::new();
        for n in 0..MAX_PALETTES as u8 {
            table.commit(&[colour(n)]).unwrap();
        }
        // Reuse still works at the ceiling
        assert_eq!(table.commit(&[colour(3)]).unwrap(), 3);
        let err = table.commit(&[colour(100)]).unwrap_err();
        assert!(matches!(err, PackError::PaletteTableFull));
        assert_eq!(table.len(), MAX_PALETTES);
    }
}
