use std::{fs::remove_dir_all, path::Path};

use anyhow::{Context, Result};

/// Remove the output directory. Returns whether anything was removed.
pub fn clean(out_dir: &Path) -> Result<bool> {
    if !out_dir.exists() {
        println!("Skipped {} (not found)", out_dir.display());
        return Ok(false);
    }

    remove_dir_all(out_dir)
        .with_context(|| format!("Failed to remove {}", out_dir.display()))?;
    println!("Removed {}", out_dir.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir_all(out.join("fonts")).unwrap();

        assert!(clean(&out).unwrap());
        assert!(!out.exists());
        assert!(!clean(&out).unwrap());
    }
}
