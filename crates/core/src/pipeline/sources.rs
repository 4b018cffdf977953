//! Source rewriting across every configured font.

use std::{
    borrow::Cow,
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::{
    charset::CharacterSet,
    io::read_source,
    parallel::collect_parallel,
    scanner::{Rewrite, TokenScanner},
};

/// One source file after every font's tokens were substituted.
#[derive(Debug, Clone)]
pub struct RewrittenSource {
    pub path: PathBuf,
    pub text: String,
    pub changed: bool,
}

/// What one font's scanner found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMatches {
    /// Characters substituted for tokens or already present as text.
    pub chars: CharacterSet,
    /// Token names that matched the pattern but are not registered.
    pub unresolved: BTreeSet<String>,
}

impl TokenMatches {
    pub fn merge(&mut self, other: &TokenMatches) {
        self.chars.union(&other.chars);
        self.unresolved.extend(other.unresolved.iter().cloned());
    }
}

/// Apply each font's scanner to `text` in order.
///
/// Each scanner sees the output of the previous one. Returns the final text
/// and one [`TokenMatches`] per scanner slot; fonts without tokens (`None`)
/// get an empty one.
pub fn rewrite_text<'a>(
    text: &'a str,
    scanners: &[Option<TokenScanner>],
) -> (Cow<'a, str>, Vec<TokenMatches>) {
    let mut current = Cow::Borrowed(text);
    let mut found = Vec::with_capacity(scanners.len());

    for scanner in scanners {
        let Some(scanner) = scanner else {
            found.push(TokenMatches::default());
            continue;
        };
        // rewritten sources keep their icons as characters
        let mut chars = scanner.present(&current);
        let (replaced, unresolved) = match scanner.rewrite(&current) {
            Rewrite { text: Cow::Owned(owned), chars: substituted, unresolved } => {
                chars.union(&substituted);
                (Some(owned), unresolved)
            }
            Rewrite { chars: substituted, unresolved, .. } => {
                chars.union(&substituted);
                (None, unresolved)
            }
        };
        found.push(TokenMatches { chars, unresolved });
        if let Some(owned) = replaced {
            current = Cow::Owned(owned);
        }
    }

    (current, found)
}

/// Rewrite every file and merge the per-file matches per font.
pub fn rewrite_sources(
    files: &[PathBuf],
    scanners: &[Option<TokenScanner>],
) -> Result<(Vec<RewrittenSource>, Vec<TokenMatches>)> {
    let results = collect_parallel(files, |path| rewrite_file(path, scanners));

    let mut sources = Vec::with_capacity(files.len());
    let mut totals = vec![TokenMatches::default(); scanners.len()];
    for result in results {
        let (source, found) = result?;
        for (total, matches) in totals.iter_mut().zip(&found) {
            total.merge(matches);
        }
        sources.push(source);
    }
    Ok((sources, totals))
}

fn rewrite_file(
    path: &Path,
    scanners: &[Option<TokenScanner>],
) -> Result<(RewrittenSource, Vec<TokenMatches>)> {
    let original = read_source(path)?;
    let (text, found) = rewrite_text(&original, scanners);
    let changed = text != original.as_str();
    let source = RewrittenSource { path: path.to_path_buf(), text: text.into_owned(), changed };
    Ok((source, found))
}
