//! Shared file I/O utilities.

use std::{
    fs::{create_dir_all, read, read_to_string, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;

/// Read font data from a file.
pub fn read_font(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    read(path).with_context(|| format!("Failed to read font: {}", path.display()))
}

/// Read a source file as UTF-8 text.
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    read_to_string(path).with_context(|| format!("Failed to read source: {}", path.display()))
}

/// Write data, creating the parent directory if needed.
pub fn write_output(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    write(path, data).with_context(|| format!("Failed to write: {}", path.display()))
}

/// Create parent directory if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Find files matching a glob pattern in a directory.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect())
}

/// Source files under `dir` with one of `extensions`.
///
/// Paths with a component named in `exclude`, or inside `skip_dir`, are
/// left out. The result is sorted so every build visits files in the same
/// order.
pub fn glob_sources(
    dir: &Path,
    extensions: &[String],
    exclude: &[String],
    skip_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in extensions {
        files.extend(glob_files(dir, &format!("**/*.{ext}"))?);
    }

    files.retain(|path| {
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let excluded = relative
            .components()
            .any(|c| exclude.iter().any(|name| c.as_os_str() == name.as_str()));
        !excluded && skip_dir.is_none_or(|skip| !path.starts_with(skip))
    });
    files.sort();
    files.dedup();
    Ok(files)
}
