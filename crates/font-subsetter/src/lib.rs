//! Character-set font subsetting wrapper around hb-subset with builder pattern.
//!
//! This crate provides a high-level interface for reducing a font to the glyphs
//! of an explicit set of characters using HarfBuzz's hb-subset library. It
//! operates purely on byte slices with no file I/O dependencies.
//!
//! # Example
//!
//! ```no_run
//! use iconsubset_font_subsetter::Subsetter;
//!
//! let font_data: &[u8] = &[];
//!
//! let subset = Subsetter::icon_font()
//!     .with_characters("\u{f1f8}\u{f007}".chars())
//!     .subset(font_data);
//! ```

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use hb_subset::{Blob, FontFace, SubsetInput, Tag};

/// Variable font tables to drop during subsetting.
///
/// Icon fonts are shipped as static fonts, so variation data only adds weight.
pub const VF_TABLES_TO_DROP: &[&[u8; 4]] = &[
    b"HVAR", b"MVAR", b"STAT", b"avar", b"fvar", b"gvar", b"cvar",
];

/// Layout features to retain during subsetting.
///
/// Some icon fonts (Material Design Icons among them) expose icons through
/// ligatures as well as codepoints, so `liga` and the shaping basics stay.
pub const LAYOUT_FEATURES: &[&[u8; 4]] = &[b"ccmp", b"liga", b"locl", b"kern", b"mark", b"mkmk"];

/// Font subsetter with builder pattern.
///
/// Provides a flexible way to configure font subsetting options before
/// performing the subset operation.
#[derive(Debug, Default, Clone)]
pub struct Subsetter {
    characters: BTreeSet<char>,
    drop_vf_tables: bool,
    retain_glyph_names: bool,
    layout_features: Vec<[u8; 4]>,
}

impl Subsetter {
    /// Creates a new subsetter with default settings.
    ///
    /// Default settings use the standard [`LAYOUT_FEATURES`] and do not
    /// drop variable font tables or retain glyph names.
    pub fn new() -> Self {
        Self {
            layout_features: LAYOUT_FEATURES.iter().map(|f| **f).collect(),
            ..Default::default()
        }
    }

    /// Creates a subsetter pre-configured for icon fonts.
    ///
    /// This preset drops variable font tables and uses the standard
    /// [`LAYOUT_FEATURES`]. Characters still have to be added.
    pub fn icon_font() -> Self {
        Self::new().drop_vf_tables(true)
    }

    /// Adds individual characters to include in the subset.
    pub fn with_characters(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.characters.extend(chars);
        self
    }

    /// Sets whether to drop variable font tables.
    pub fn drop_vf_tables(mut self, drop: bool) -> Self {
        self.drop_vf_tables = drop;
        self
    }

    /// Sets whether to retain glyph names in the subset.
    ///
    /// Glyph names can be useful for debugging but increase file size.
    pub fn retain_glyph_names(mut self, retain: bool) -> Self {
        self.retain_glyph_names = retain;
        self
    }

    /// Subsets the font data and returns the result.
    ///
    /// HarfBuzz always keeps `.notdef`, so an empty request still yields a
    /// valid font.
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = SubsetInput::new().context("Failed to allocate subset input")?;

        if self.retain_glyph_names {
            input.flags().retain_glyph_names();
        }

        {
            let mut feature_set = input.layout_feature_tag_set();
            for tag in &self.layout_features {
                feature_set.insert(Tag::new(tag));
            }
        }

        {
            let mut unicode_set = input.unicode_set();
            for c in &self.characters {
                unicode_set.insert(*c);
            }
        }

        if self.drop_vf_tables {
            let mut drop_tables = input.drop_table_tag_set();
            for table in VF_TABLES_TO_DROP {
                drop_tables.insert(Tag::new(*table));
            }
        }

        let blob = Blob::from_bytes(data).context("Failed to load font data")?;
        let font = FontFace::new(blob).context("Failed to parse font face")?;
        let subset_font = input.subset_font(&font).context("HarfBuzz subsetting failed")?;
        Ok(subset_font.underlying_blob().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use read_fonts::{FontRef, TableProvider};

    use super::*;

    fn mapped_chars(data: &[u8]) -> BTreeSet<char> {
        let font = FontRef::new(data).unwrap();
        let cmap = font.cmap().unwrap();
        let mut result = BTreeSet::new();
        for record in cmap.encoding_records() {
            if let Ok(subtable) = record.subtable(cmap.offset_data()) {
                result.extend(subtable.iter().filter_map(|(cp, _)| char::from_u32(cp)));
            }
        }
        result
    }

    #[test]
    fn test_layout_features_count() {
        assert_eq!(LAYOUT_FEATURES.len(), 6);
    }

    #[test]
    fn test_builder_chain() {
        let subsetter = Subsetter::new()
            .with_characters(['a', 'b', 'a'])
            .drop_vf_tables(true)
            .retain_glyph_names(true);

        assert_eq!(subsetter.characters, BTreeSet::from(['a', 'b']));
        assert!(subsetter.drop_vf_tables);
        assert!(subsetter.retain_glyph_names);
        assert_eq!(subsetter.layout_features.len(), LAYOUT_FEATURES.len());
    }

    #[test]
    fn test_icon_font_preset() {
        let subsetter = Subsetter::icon_font();
        assert!(subsetter.drop_vf_tables);
        assert!(!subsetter.retain_glyph_names);
        assert!(subsetter.characters.is_empty());
    }

    #[test]
    fn test_subset_keeps_only_requested_characters() {
        let data = font_test_data::CMAP12_FONT1;
        let original = mapped_chars(data);
        let keep = *original.iter().next().expect("test font maps at least one character");

        let subset = Subsetter::icon_font().with_characters([keep]).subset(data).unwrap();
        let kept = mapped_chars(&subset);

        assert!(!subset.is_empty());
        assert_eq!(kept, BTreeSet::from([keep]));
    }
}
