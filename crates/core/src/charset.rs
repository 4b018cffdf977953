//! Accumulated set of characters a font has to keep.

use std::{collections::BTreeSet, fmt};

/// De-duplicated set of Unicode scalar values.
///
/// Supplementary-plane characters are single `char`s here; UTF-16 consumers
/// get the surrogate pair from [`char::encode_utf16`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSet {
    chars: BTreeSet<char>,
}

impl CharacterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the character was not yet present.
    pub fn insert(&mut self, c: char) -> bool {
        self.chars.insert(c)
    }

    /// Merge another set into this one.
    pub fn union(&mut self, other: &CharacterSet) {
        self.chars.extend(other.chars.iter().copied());
    }

    /// Add every character of `extra`, regardless of whether any token used it.
    pub fn with_extra(mut self, extra: &str) -> Self {
        self.chars.extend(extra.chars());
        self
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// All characters concatenated in codepoint order.
    pub fn as_text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Codepoints formatted as `U+XXXX`.
    pub fn codepoints(&self) -> Vec<String> {
        self.chars.iter().map(|c| format!("U+{:04X}", *c as u32)).collect()
    }
}

impl Extend<char> for CharacterSet {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        self.chars.extend(iter);
    }
}

impl FromIterator<char> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self { chars: iter.into_iter().collect() }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codepoints().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates() {
        let mut set = CharacterSet::new();
        assert!(set.insert('\u{ee09}'));
        assert!(!set.insert('\u{ee09}'));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_extra_characters_are_split_into_scalars() {
        let set = CharacterSet::from_iter(['\u{f101}']).with_extra("trash-can");
        // t r a s h - c n
        assert_eq!(set.len(), 9);
        assert!(set.contains('\u{f101}'));
        assert!("trash-can".chars().all(|c| set.contains(c)));
    }

    #[test]
    fn test_union_is_order_independent() {
        let a: CharacterSet = ['a', 'b'].into_iter().collect();
        let b: CharacterSet = ['b', 'c'].into_iter().collect();

        let mut ab = a.clone();
        ab.union(&b);
        let mut ba = b.clone();
        ba.union(&a);

        assert_eq!(ab, ba);
        assert_eq!(ab.as_text(), "abc");
    }

    #[test]
    fn test_supplementary_plane() {
        let set: CharacterSet = ['\u{1F600}'].into_iter().collect();
        let units: Vec<u16> = set.as_text().encode_utf16().collect();
        assert_eq!(units, vec![0xD83D, 0xDE00]);
        assert_eq!(set.to_string(), "U+1F600");
    }
}
