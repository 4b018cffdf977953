//! Per-font configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    error::ConfigError,
    scanner::TokenScanner,
    symbols::{IconMapping, StylesheetSelector, extract_icons},
};

/// Everything needed to subset one icon font (or a family sharing one mapping).
#[derive(Debug, Clone)]
pub struct FontConfig {
    /// Label used in logs and reports.
    pub name: String,
    /// Font files that keep the same set of characters.
    pub fonts: Vec<PathBuf>,
    /// Marker in source text in front of an icon name, e.g. `fa-`.
    pub token_prefix: Option<String>,
    /// Explicit mapping; takes precedence over the stylesheet.
    pub token_values: Option<IconMapping>,
    pub stylesheet: Option<PathBuf>,
    pub selector: StylesheetSelector,
    /// Characters kept even if no token references them.
    pub extra_characters: String,
    /// Strip unused glyphs; otherwise the font is copied unmodified.
    pub strip: bool,
}

impl FontConfig {
    /// A single custom font without any token source yet.
    pub fn custom(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            fonts: vec![path],
            token_prefix: None,
            token_values: None,
            stylesheet: None,
            selector: StylesheetSelector::default(),
            extra_characters: String::new(),
            strip: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = Some(prefix.into());
        self
    }

    pub fn with_token_values(mut self, values: IconMapping) -> Self {
        self.token_values = Some(values);
        self
    }

    pub fn with_stylesheet(
        mut self,
        path: impl Into<PathBuf>,
        selector: StylesheetSelector,
    ) -> Self {
        self.stylesheet = Some(path.into());
        self.selector = selector;
        self
    }

    pub fn with_extra_characters(mut self, extra: impl Into<String>) -> Self {
        self.extra_characters = extra.into();
        self
    }

    pub fn strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    /// Whether source text has to be scanned for this font.
    pub fn has_tokens(&self) -> bool {
        self.token_values.is_some() || self.stylesheet.is_some()
    }

    /// Check everything that must hold before any file is parsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(missing) = self.fonts.iter().find(|path| !path.is_file()) {
            return Err(ConfigError::FontNotFound(missing.clone()));
        }
        if self.has_tokens() && self.token_prefix.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingTokenPrefix(self.name.clone()));
        }
        Ok(())
    }

    /// Explicit token values, else the stylesheet's icons, else nothing.
    pub fn icon_mapping(&self) -> Result<Option<IconMapping>> {
        if let Some(values) = &self.token_values {
            return Ok(Some(values.clone()));
        }
        match &self.stylesheet {
            Some(path) => extract_icons(path, &self.selector)
                .with_context(|| format!("Failed to extract icons for {}", self.name))
                .map(Some),
            None => Ok(None),
        }
    }

    /// Scanner for this font's tokens, if it has any.
    pub fn scanner(&self) -> Result<Option<TokenScanner>> {
        let Some(mapping) = self.icon_mapping()? else {
            return Ok(None);
        };
        let prefix = self
            .token_prefix
            .as_deref()
            .ok_or_else(|| ConfigError::MissingTokenPrefix(self.name.clone()))?;
        debug!("{}: {} icons, token prefix {prefix:?}", self.name, mapping.len());
        TokenScanner::new(prefix, mapping).map(Some)
    }

    /// Output file name of a font inside the fonts directory.
    pub fn output_name(path: &Path) -> Result<&std::ffi::OsStr> {
        path.file_name().with_context(|| format!("Invalid font path: {}", path.display()))
    }
}
