//! Icon font subsetting core.
//!
//! Extracts icon name to codepoint mappings from SCSS variable files,
//! rewrites `<prefix><icon-name>` tokens in application sources to the
//! icon characters, and subsets each font to the characters actually used.

pub mod charset;
pub mod config;
pub mod error;
pub mod font;
pub mod io;
pub mod parallel;
pub mod pipeline;
pub mod presets;
pub mod scanner;
pub mod subset;
pub mod symbols;

pub use charset::CharacterSet;
pub use config::{FontEntry, Manifest};
pub use error::ConfigError;
pub use font::FontConfig;
pub use iconsubset_font_subsetter::Subsetter;
pub use pipeline::{BuildOptions, BuildReport, FontPlan, ScanReport, TokenMatches, build, scan};
pub use presets::FontAwesomeFontType;
pub use scanner::TokenScanner;
pub use subset::{GlyphSubsetter, HarfBuzzSubsetter};
pub use symbols::{IconMapping, StylesheetSelector, extract_icons};
