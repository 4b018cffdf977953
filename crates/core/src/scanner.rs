//! Icon token scanning and rewriting.
//!
//! A token is the prefix followed by one or more lowercase letters or
//! hyphens, e.g. `fa-trash-can`. Tokens whose name is registered in the
//! mapping are replaced by the icon's character; all others are left alone.
//! Icon characters already present in a text count as used.

use std::{borrow::Cow, collections::BTreeSet};

use anyhow::{Context, Result, bail};
use log::trace;
use regex::{Captures, Regex};

use crate::{charset::CharacterSet, symbols::IconMapping};

/// Result of rewriting one text.
#[derive(Debug)]
pub struct Rewrite<'a> {
    pub text: Cow<'a, str>,
    /// Characters substituted for tokens.
    pub chars: CharacterSet,
    /// Names of matched tokens that are not registered.
    pub unresolved: BTreeSet<String>,
}

/// Rewrites `<prefix><icon-name>` tokens using an icon mapping.
#[derive(Debug, Clone)]
pub struct TokenScanner {
    prefix: String,
    pattern: Regex,
    mapping: IconMapping,
    glyphs: BTreeSet<char>,
}

impl TokenScanner {
    pub fn new(prefix: &str, mapping: IconMapping) -> Result<Self> {
        if prefix.is_empty() {
            bail!("token prefix must not be empty");
        }
        let pattern = Regex::new(&format!("{}([a-z-]+)", regex::escape(prefix)))
            .with_context(|| format!("Failed to build token pattern for prefix {prefix:?}"))?;
        let glyphs = mapping.iter().filter_map(|(name, _)| mapping.resolve(name)).collect();
        Ok(Self { prefix: prefix.to_string(), pattern, mapping, glyphs })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn mapping(&self) -> &IconMapping {
        &self.mapping
    }

    /// Replace every registered token in `text` with its character.
    pub fn rewrite<'a>(&self, text: &'a str) -> Rewrite<'a> {
        let mut chars = CharacterSet::new();
        let mut unresolved = BTreeSet::new();
        let text = self.pattern.replace_all(text, |caps: &Captures| {
            match self.mapping.resolve(&caps[1]) {
                Some(c) => {
                    chars.insert(c);
                    c.to_string()
                }
                None => {
                    trace!("Unregistered token {}", &caps[0]);
                    unresolved.insert(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });
        Rewrite { text, chars, unresolved }
    }

    /// Icon characters of this mapping that `text` already contains.
    pub fn present(&self, text: &str) -> CharacterSet {
        text.chars().filter(|c| self.glyphs.contains(c)).collect()
    }
}
