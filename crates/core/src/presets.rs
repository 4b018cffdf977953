//! Bundled icon sets resolved from an npm `node_modules` directory.

use std::path::Path;

use serde::Deserialize;

use crate::{
    error::ConfigError,
    font::FontConfig,
    symbols::StylesheetSelector,
};

/// FontAwesome variables stylesheet, relative to `node_modules`.
pub const FONT_AWESOME_SCSS: &str = "@fortawesome/fontawesome-free/scss/_variables.scss";

/// Prefix of FontAwesome's per-icon variables.
pub const FONT_AWESOME_SCSS_PREFIX: &str = "$fa-var-";

/// Default FontAwesome token prefix in application source.
pub const FONT_AWESOME_TOKEN_PREFIX: &str = "fa-";

/// Material Design Icons font, relative to `node_modules`.
pub const MDI_FONT: &str = "@mdi/font/fonts/materialdesignicons-webfont.ttf";

/// Material Design Icons variables stylesheet, relative to `node_modules`.
pub const MDI_SCSS: &str = "@mdi/font/scss/_variables.scss";

/// Aggregate variable listing every Material Design icon.
pub const MDI_SCSS_LIST: &str = "$mdi-icons";

/// Default Material Design Icons token prefix in application source.
pub const MDI_TOKEN_PREFIX: &str = "mdi-";

/// FontAwesome font files that can be bundled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontAwesomeFontType {
    Brands,
    Regular,
    Solid,
}

impl FontAwesomeFontType {
    /// Font path relative to `node_modules`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Brands => "@fortawesome/fontawesome-free/webfonts/fa-brands-400.ttf",
            Self::Regular => "@fortawesome/fontawesome-free/webfonts/fa-regular-400.ttf",
            Self::Solid => "@fortawesome/fontawesome-free/webfonts/fa-solid-900.ttf",
        }
    }
}

/// FontAwesome fonts sharing one mapping and one character set.
pub fn font_awesome(
    node_modules: &Path,
    font_types: &[FontAwesomeFontType],
) -> Result<FontConfig, ConfigError> {
    if font_types.is_empty() {
        return Err(ConfigError::MissingFontTypes);
    }

    let mut config = FontConfig::custom(node_modules.join(font_types[0].path()))
        .with_name("fontawesome")
        .with_token_prefix(FONT_AWESOME_TOKEN_PREFIX)
        .with_stylesheet(
            node_modules.join(FONT_AWESOME_SCSS),
            StylesheetSelector::Prefix(FONT_AWESOME_SCSS_PREFIX.to_string()),
        );
    for font_type in &font_types[1..] {
        let path = node_modules.join(font_type.path());
        if !config.fonts.contains(&path) {
            config.fonts.push(path);
        }
    }
    Ok(config)
}

/// The Material Design Icons webfont.
pub fn material_design_icons(node_modules: &Path) -> FontConfig {
    FontConfig::custom(node_modules.join(MDI_FONT))
        .with_name("mdi")
        .with_token_prefix(MDI_TOKEN_PREFIX)
        .with_stylesheet(
            node_modules.join(MDI_SCSS),
            StylesheetSelector::List(MDI_SCSS_LIST.to_string()),
        )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_font_awesome_requires_font_types() {
        assert!(matches!(
            font_awesome(Path::new("node_modules"), &[]),
            Err(ConfigError::MissingFontTypes)
        ));
    }

    #[test]
    fn test_font_awesome_paths() {
        let config = font_awesome(
            Path::new("node_modules"),
            &[FontAwesomeFontType::Solid, FontAwesomeFontType::Brands, FontAwesomeFontType::Solid],
        )
        .unwrap();

        assert_eq!(config.fonts, vec![
            PathBuf::from("node_modules/@fortawesome/fontawesome-free/webfonts/fa-solid-900.ttf"),
            PathBuf::from("node_modules/@fortawesome/fontawesome-free/webfonts/fa-brands-400.ttf"),
        ]);
        assert_eq!(config.token_prefix.as_deref(), Some("fa-"));
        assert_eq!(config.selector, StylesheetSelector::Prefix("$fa-var-".into()));
    }

    #[test]
    fn test_mdi_uses_aggregate_list() {
        let config = material_design_icons(Path::new("nm"));
        assert_eq!(config.fonts.len(), 1);
        assert_eq!(config.selector, StylesheetSelector::List("$mdi-icons".into()));
        assert_eq!(
            config.stylesheet.as_deref(),
            Some(Path::new("nm/@mdi/font/scss/_variables.scss"))
        );
    }
}
