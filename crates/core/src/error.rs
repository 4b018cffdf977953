//! Error types for icon font configuration.

use std::{path::PathBuf, result};

/// Configuration problems that abort the whole build.
///
/// These are detected before any stylesheet is parsed or source is scanned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("you must pass the font types to use, e.g. font_types = [\"solid\"]")]
    MissingFontTypes,

    #[error("font file does not exist: {}", .0.display())]
    FontNotFound(PathBuf),

    #[error("font '{0}' maps icon tokens but has no token prefix")]
    MissingTokenPrefix(String),

    #[error(
        "fonts {} and {} would both be written as {name}",
        .first.display(),
        .second.display()
    )]
    DuplicateOutput { name: String, first: PathBuf, second: PathBuf },

    #[error("invalid manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },
}

pub type Result<T> = result::Result<T, ConfigError>;
