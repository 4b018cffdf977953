//! Font asset output: copy or subset every configured font file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    charset::CharacterSet,
    font::FontConfig,
    io::{read_font, write_output},
    parallel::process_parallel_iter,
    subset::{GlyphSubsetter, missing_from_font},
};

/// A font config with its final character set.
#[derive(Debug, Clone)]
pub struct FontPlan {
    pub config: FontConfig,
    pub chars: CharacterSet,
}

impl FontPlan {
    /// Add the config's extra characters to the characters found in sources.
    pub fn new(config: FontConfig, found: CharacterSet) -> Self {
        let chars = found.with_extra(&config.extra_characters);
        Self { config, chars }
    }
}

/// A font file written to the output directory.
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub source: PathBuf,
    pub output: PathBuf,
    pub input_size: usize,
    pub output_size: usize,
    pub stripped: bool,
}

impl FontAsset {
    /// Size reduction in percent.
    pub fn reduction(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        (1.0 - self.output_size as f64 / self.input_size as f64) * 100.0
    }
}

/// Write every font of every plan to `fonts_dir`.
///
/// Fonts of plans with `strip` set are subset to the plan's characters,
/// others are copied byte for byte. Any failure fails the whole step; a
/// font that failed to subset is never written unmodified.
pub fn write_font_assets(
    plans: &[FontPlan],
    fonts_dir: &Path,
    subsetter: &dyn GlyphSubsetter,
    force_copy: bool,
) -> Result<Vec<FontAsset>> {
    let jobs: Vec<(&FontPlan, &PathBuf)> = plans
        .iter()
        .flat_map(|plan| plan.config.fonts.iter().map(move |font| (plan, font)))
        .collect();

    let (batch, assets) = process_parallel_iter("fonts", jobs, |(plan, font)| {
        let strip = plan.config.strip && !force_copy;
        write_font_asset(plan, font, fonts_dir, strip, subsetter)
            .with_context(|| format!("Failed to process font {}", font.display()))
    });
    batch.ok_or_bail("Font output")?;
    Ok(assets)
}

fn write_font_asset(
    plan: &FontPlan,
    font: &Path,
    fonts_dir: &Path,
    strip: bool,
    subsetter: &dyn GlyphSubsetter,
) -> Result<FontAsset> {
    let output = fonts_dir.join(FontConfig::output_name(font)?);
    let data = read_font(font)?;

    let out_data = if strip {
        report_coverage(&plan.config.name, font, &data, &plan.chars);
        subsetter.subset(&data, &plan.chars)?
    } else {
        data.clone()
    };
    write_output(&output, &out_data)?;

    let asset = FontAsset {
        source: font.to_path_buf(),
        output,
        input_size: data.len(),
        output_size: out_data.len(),
        stripped: strip,
    };
    if strip {
        info!(
            "Subset {} -> {} ({} characters, {:.2} KB -> {:.2} KB, {:.1}% reduction)",
            font.file_name().unwrap_or_default().to_string_lossy(),
            asset.output.display(),
            plan.chars.len(),
            asset.input_size as f64 / 1024.0,
            asset.output_size as f64 / 1024.0,
            asset.reduction()
        );
    } else {
        info!("Copied {} -> {}", font.display(), asset.output.display());
    }
    Ok(asset)
}

fn report_coverage(name: &str, font: &Path, data: &[u8], chars: &CharacterSet) {
    match missing_from_font(data, chars) {
        Ok(missing) if !missing.is_empty() => {
            warn!("{name}: {} has no glyph for {missing}", font.display());
        }
        Ok(_) => {}
        Err(e) => debug!("{name}: skipping coverage check for {}: {e:#}", font.display()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use anyhow::bail;

    use super::*;

    struct Tagging;

    impl GlyphSubsetter for Tagging {
        fn subset(&self, _font: &[u8], chars: &CharacterSet) -> Result<Vec<u8>> {
            Ok(chars.as_text().into_bytes())
        }
    }

    struct Failing;

    impl GlyphSubsetter for Failing {
        fn subset(&self, _font: &[u8], _chars: &CharacterSet) -> Result<Vec<u8>> {
            bail!("corrupt glyf table")
        }
    }

    fn plan(dir: &Path, name: &str, strip: bool) -> FontPlan {
        let font = dir.join(name);
        write(&font, b"original font bytes").unwrap();
        let config = FontConfig::custom(font).with_extra_characters("ab").strip(strip);
        FontPlan::new(config, ['\u{e000}'].into_iter().collect())
    }

    #[test]
    fn test_plan_adds_extra_characters() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan(dir.path(), "icons.ttf", true);
        assert_eq!(plan.chars.as_text(), "ab\u{e000}");
    }

    #[test]
    fn test_strip_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let plans =
            vec![plan(dir.path(), "stripped.ttf", true), plan(dir.path(), "copied.ttf", false)];
        let fonts_dir = dir.path().join("dist/fonts");

        let assets = write_font_assets(&plans, &fonts_dir, &Tagging, false).unwrap();

        assert_eq!(assets.len(), 2);
        assert!(assets[0].stripped);
        assert_eq!(std::fs::read(fonts_dir.join("stripped.ttf")).unwrap(), "ab\u{e000}".as_bytes());
        assert!(!assets[1].stripped);
        assert_eq!(std::fs::read(fonts_dir.join("copied.ttf")).unwrap(), b"original font bytes");
    }

    #[test]
    fn test_force_copy_skips_subsetting() {
        let dir = tempfile::tempdir().unwrap();
        let plans = vec![plan(dir.path(), "icons.ttf", true)];
        let fonts_dir = dir.path().join("fonts");

        let assets = write_font_assets(&plans, &fonts_dir, &Failing, true).unwrap();
        assert!(!assets[0].stripped);
        assert_eq!(assets[0].reduction(), 0.0);
    }

    #[test]
    fn test_subset_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let plans = vec![plan(dir.path(), "icons.ttf", true)];
        let fonts_dir = dir.path().join("fonts");

        assert!(write_font_assets(&plans, &fonts_dir, &Failing, false).is_err());
        assert!(!fonts_dir.join("icons.ttf").exists());
    }
}
