//! Font subsetting capability and glyph coverage checks.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use iconsubset_font_subsetter::Subsetter;
use read_fonts::{FontRef, TableProvider};

use crate::charset::CharacterSet;

/// Produces a font that only contains glyphs for a set of characters.
///
/// The pipeline only depends on this trait, so tests can substitute a fake
/// for HarfBuzz.
pub trait GlyphSubsetter: Sync {
    fn subset(&self, font: &[u8], chars: &CharacterSet) -> Result<Vec<u8>>;
}

/// [`GlyphSubsetter`] backed by hb-subset.
#[derive(Debug, Clone)]
pub struct HarfBuzzSubsetter {
    base: Subsetter,
}

impl HarfBuzzSubsetter {
    pub fn new() -> Self {
        Self { base: Subsetter::icon_font() }
    }
}

impl Default for HarfBuzzSubsetter {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphSubsetter for HarfBuzzSubsetter {
    fn subset(&self, font: &[u8], chars: &CharacterSet) -> Result<Vec<u8>> {
        self.base.clone().with_characters(chars.iter()).subset(font)
    }
}

/// Characters mapped by any cmap subtable of the font.
pub fn mapped_characters(font: &[u8]) -> Result<BTreeSet<char>> {
    let font = FontRef::new(font).context("Failed to parse font")?;
    let cmap = font.cmap().context("Font has no cmap table")?;

    let mut chars = BTreeSet::new();
    for record in cmap.encoding_records() {
        if let Ok(subtable) = record.subtable(cmap.offset_data()) {
            chars.extend(subtable.iter().filter_map(|(cp, _)| char::from_u32(cp)));
        }
    }
    Ok(chars)
}

/// Requested characters the font has no glyph for.
pub fn missing_from_font(font: &[u8], chars: &CharacterSet) -> Result<CharacterSet> {
    let mapped = mapped_characters(font)?;
    Ok(chars.iter().filter(|c| !mapped.contains(c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_from_font() {
        let data = font_test_data::CMAP12_FONT1;
        let mapped = mapped_characters(data).unwrap();
        let present = *mapped.iter().next().unwrap();
        let absent = ('\u{E000}'..='\u{F8FF}').find(|c| !mapped.contains(c)).unwrap();

        let requested: CharacterSet = [present, absent].into_iter().collect();
        let missing = missing_from_font(data, &requested).unwrap();

        assert_eq!(missing.iter().collect::<Vec<_>>(), vec![absent]);
    }

    #[test]
    fn test_mapped_characters_rejects_non_font() {
        assert!(mapped_characters(b"definitely not a font").is_err());
    }

    #[test]
    fn test_harfbuzz_subsetter_keeps_requested_glyph() {
        let data = font_test_data::CMAP12_FONT1;
        let keep = *mapped_characters(data).unwrap().iter().next().unwrap();
        let chars: CharacterSet = [keep].into_iter().collect();

        let subset = HarfBuzzSubsetter::new().subset(data, &chars).unwrap();
        let kept = mapped_characters(&subset).unwrap();

        assert_eq!(kept, BTreeSet::from([keep]));
    }
}
