//! Build manifest (`iconsubset.toml`) and its defaults.

use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    error::ConfigError,
    font::FontConfig,
    presets::{FontAwesomeFontType, font_awesome, material_design_icons},
    symbols::{IconMapping, StylesheetSelector},
};

/// Manifest file name looked up when none is given.
pub const DEFAULT_MANIFEST: &str = "iconsubset.toml";

/// Source file extensions scanned for icon tokens.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "js", "xml", "html"];

/// Path components excluded from scanning.
pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules"];

/// Directory inside the output directory that receives font assets.
pub const FONTS_DIR: &str = "fonts";

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_node_modules() -> PathBuf {
    PathBuf::from("node_modules")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()
}

/// Top-level build manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_node_modules")]
    pub node_modules: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

/// One `[[fonts]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum FontEntry {
    #[serde(rename = "fontawesome")]
    FontAwesome {
        #[serde(default)]
        font_types: Vec<FontAwesomeFontType>,
        token_prefix: Option<String>,
        #[serde(default)]
        strip: bool,
    },
    Mdi {
        token_prefix: Option<String>,
        #[serde(default)]
        strip: bool,
    },
    Custom {
        path: PathBuf,
        token_prefix: Option<String>,
        token_values: Option<BTreeMap<String, String>>,
        token_scss: Option<PathBuf>,
        token_scss_prefix: Option<String>,
        token_scss_list: Option<String>,
        #[serde(default)]
        extra_characters: String,
        #[serde(default)]
        strip: bool,
    },
}

impl Manifest {
    /// Load a manifest; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::parse(&content, base).map_err(|e| match e {
            ConfigError::InvalidManifest { message, .. } => {
                ConfigError::InvalidManifest { path: path.to_path_buf(), message }
            }
            other => other,
        })?)
    }

    /// Parse manifest text, resolving relative paths against `base`.
    pub fn parse(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut manifest: Self = toml::from_str(content).map_err(|e| ConfigError::InvalidManifest {
            path: PathBuf::from(DEFAULT_MANIFEST),
            message: e.to_string(),
        })?;
        manifest.resolve_paths(base);
        Ok(manifest)
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.source_dir = base.join(&self.source_dir);
        self.out_dir = base.join(&self.out_dir);
        self.node_modules = base.join(&self.node_modules);
        for entry in &mut self.fonts {
            if let FontEntry::Custom { path, token_scss, .. } = entry {
                *path = base.join(&*path);
                if let Some(scss) = token_scss {
                    *scss = base.join(&*scss);
                }
            }
        }
    }

    /// Turn every `[[fonts]]` entry into a [`FontConfig`].
    pub fn font_configs(&self) -> Result<Vec<FontConfig>, ConfigError> {
        self.fonts.iter().map(|entry| entry.to_config(&self.node_modules)).collect()
    }
}

impl FontEntry {
    pub fn to_config(&self, node_modules: &Path) -> Result<FontConfig, ConfigError> {
        let config = match self {
            FontEntry::FontAwesome { font_types, token_prefix, strip } => {
                let config = font_awesome(node_modules, font_types)?.strip(*strip);
                override_prefix(config, token_prefix)
            }
            FontEntry::Mdi { token_prefix, strip } => {
                override_prefix(material_design_icons(node_modules).strip(*strip), token_prefix)
            }
            FontEntry::Custom {
                path,
                token_prefix,
                token_values,
                token_scss,
                token_scss_prefix,
                token_scss_list,
                extra_characters,
                strip,
            } => {
                let mut config = FontConfig::custom(path)
                    .with_extra_characters(extra_characters.as_str())
                    .strip(*strip);
                config.token_prefix = token_prefix.clone();
                if let Some(values) = token_values {
                    let values: IconMapping =
                        values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                    config = config.with_token_values(values);
                }
                if let Some(scss) = token_scss {
                    let selector = match (token_scss_list, token_scss_prefix) {
                        (Some(list), _) => StylesheetSelector::List(list.clone()),
                        (None, Some(prefix)) => StylesheetSelector::Prefix(prefix.clone()),
                        (None, None) => StylesheetSelector::default(),
                    };
                    config = config.with_stylesheet(scss, selector);
                }
                config
            }
        };
        Ok(config)
    }
}

fn override_prefix(config: FontConfig, prefix: &Option<String>) -> FontConfig {
    match prefix {
        Some(prefix) if !prefix.is_empty() => config.with_token_prefix(prefix.as_str()),
        _ => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
source_dir = "app"

[[fonts]]
kind = "fontawesome"
font_types = ["solid", "regular"]
strip = true

[[fonts]]
kind = "mdi"
token_prefix = "md-"

[[fonts]]
kind = "custom"
path = "assets/icofont.ttf"
token_prefix = "icofont-"
token_values = { trash = "ee09" }
strip = true

[[fonts]]
kind = "custom"
path = "assets/icomoon.ttf"
token_prefix = "icon-"
token_scss = "assets/variables.scss"
token_scss_prefix = "$icon-"
extra_characters = "trash-can"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(MANIFEST, Path::new("/project")).unwrap();

        assert_eq!(manifest.source_dir, Path::new("/project/app"));
        assert_eq!(manifest.out_dir, Path::new("/project/dist"));
        assert_eq!(manifest.node_modules, Path::new("/project/node_modules"));
        assert_eq!(manifest.extensions, vec!["ts", "js", "xml", "html"]);
        assert_eq!(manifest.exclude, vec!["node_modules"]);
        assert_eq!(manifest.fonts.len(), 4);
    }

    #[test]
    fn test_font_configs() {
        let manifest = Manifest::parse(MANIFEST, Path::new("/project")).unwrap();
        let configs = manifest.font_configs().unwrap();

        assert_eq!(configs[0].name, "fontawesome");
        assert_eq!(configs[0].fonts.len(), 2);
        assert!(configs[0].strip);

        assert_eq!(configs[1].token_prefix.as_deref(), Some("md-"));
        assert!(!configs[1].strip);

        assert_eq!(configs[2].fonts, vec![PathBuf::from("/project/assets/icofont.ttf")]);
        assert_eq!(configs[2].token_values.as_ref().unwrap().get("trash"), Some("ee09"));

        assert_eq!(
            configs[3].stylesheet.as_deref(),
            Some(Path::new("/project/assets/variables.scss"))
        );
        assert_eq!(configs[3].selector, StylesheetSelector::Prefix("$icon-".into()));
        assert_eq!(configs[3].extra_characters, "trash-can");
    }

    #[test]
    fn test_fontawesome_without_font_types() {
        let manifest =
            Manifest::parse("[[fonts]]\nkind = \"fontawesome\"\n", Path::new("")).unwrap();
        assert!(matches!(manifest.font_configs(), Err(ConfigError::MissingFontTypes)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Manifest::parse("sourcedir = \"x\"", Path::new("")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidManifest { .. }));
    }

    #[test]
    fn test_unknown_font_field_is_rejected() {
        let content = r#"
[[fonts]]
kind = "custom"
path = "icons.ttf"
strip_characters = true
"#;
        let err = Manifest::parse(content, Path::new("")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidManifest { message, .. } if message.contains("strip_characters")
        ));
    }

    #[test]
    fn test_load_reports_manifest_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(&path, "fonts = 3").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(config_err, ConfigError::InvalidManifest { path: p, .. } if p == &path));
    }
}
