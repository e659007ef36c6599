//! Ordered hardware palettes with memoized nearest-color matching
//!
//! Insertion order is meaningful: it fixes each color's hardware index
//! (monochrome = [black=0, white=1]; tri-color = [black=0, white=1,
//! yellow=2, red=3]). A palette is immutable once built; the nearest-match
//! cache fills lazily and is never invalidated.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::color::{Rgb, NAMED_COLORS};
use crate::error::PaletteError;

/// One palette slot: a named hardware color and its reference RGB value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub rgb: Rgb,
}

/// Ordered, de-duplicated set of named hardware colors.
pub struct Palette {
    entries: Vec<PaletteEntry>,
    /// Color -> entry index, populated on first lookup.
    cache: Mutex<HashMap<Rgb, usize>>,
}

impl Palette {
    /// Build a palette from recognized color names, preserving order and
    /// dropping repeats (the first occurrence keeps its index).
    pub fn from_names(names: &[&str]) -> Result<Self, PaletteError> {
        let mut entries: Vec<PaletteEntry> = Vec::with_capacity(names.len());
        for &name in names {
            let Some(&(canonical, rgb)) = NAMED_COLORS.iter().find(|(n, _)| *n == name) else {
                return Err(PaletteError::UnknownColorName(name.to_string()));
            };
            if entries.iter().any(|e| e.name == canonical) {
                continue;
            }
            entries.push(PaletteEntry {
                name: canonical,
                rgb,
            });
        }
        Ok(Self {
            entries,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Hardware index of a named entry.
    pub fn index_of(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| i as u8)
    }

    /// Entry at a hardware index; inverse of [`Palette::index_of`].
    pub fn entry_at(&self, index: u8) -> Option<&PaletteEntry> {
        self.entries.get(index as usize)
    }

    /// Nearest palette entry under the redmean metric.
    ///
    /// Deterministic and memoized: repeated queries for the same color
    /// return the identical entry reference. Exact matches short-circuit;
    /// ties go to the first-listed entry.
    pub fn nearest(&self, color: Rgb) -> &PaletteEntry {
        &self.entries[self.cached_index(color)]
    }

    /// Hardware index of the nearest palette entry.
    pub fn nearest_index(&self, color: Rgb) -> u8 {
        self.cached_index(color) as u8
    }

    fn cached_index(&self, color: Rgb) -> usize {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&index) = cache.get(&color) {
            return index;
        }
        let index = self.match_index(color);
        cache.insert(color, index);
        index
    }

    fn match_index(&self, color: Rgb) -> usize {
        let mut best = 0;
        let mut best_dist = f32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.rgb == color {
                return i;
            }
            let dist = color.redmean_distance_squared(entry.rgb);
            // strict `<` keeps the first-listed entry on ties
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_is_rejected() {
        let err = Palette::from_names(&["black", "chartreuse"]).unwrap_err();
        assert_eq!(err, PaletteError::UnknownColorName("chartreuse".into()));
    }

    #[test]
    fn duplicates_are_dropped_keeping_first_index() {
        let palette = Palette::from_names(&["black", "white", "black"]).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.index_of("black"), Some(0));
        assert_eq!(palette.index_of("white"), Some(1));
    }

    #[test]
    fn index_of_and_entry_at_are_inverse() {
        let palette = Palette::from_names(&["black", "white", "yellow", "red"]).unwrap();
        for entry in palette.entries() {
            let index = palette.index_of(entry.name).unwrap();
            assert_eq!(palette.entry_at(index).unwrap().name, entry.name);
        }
        assert!(palette.entry_at(4).is_none());
    }

    #[test]
    fn nearest_is_memoized_to_the_identical_entry() {
        let palette = Palette::from_names(&["black", "white"]).unwrap();
        let color = Rgb::new(30, 30, 30);
        let first = palette.nearest(color);
        let second = palette.nearest(color);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn exact_match_short_circuits() {
        let palette = Palette::from_names(&["black", "white", "red"]).unwrap();
        assert_eq!(palette.nearest(Rgb::new(255, 0, 0)).name, "red");
        assert_eq!(palette.nearest(Rgb::new(0, 0, 0)).name, "black");
    }

    #[test]
    fn exact_match_wins_regardless_of_position() {
        // an exact match short-circuits even when an earlier entry is close
        let palette = Palette::from_names(&["dark_gray", "light_gray"]).unwrap();
        assert_eq!(palette.nearest(Rgb::new(170, 170, 170)).name, "light_gray");
    }

    #[test]
    fn redmean_classifies_dark_blue_as_blue() {
        let palette = Palette::from_names(&["black", "white", "red", "blue"]).unwrap();
        assert_eq!(palette.nearest(Rgb::new(0, 0, 180)).name, "blue");
    }
}
