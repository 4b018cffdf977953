//! Build pipeline: validate, extract, rewrite sources, accumulate, write fonts.

mod clean;
mod fonts;
mod sources;

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Result;
use log::debug;

use crate::{
    config::{FONTS_DIR, Manifest},
    error::ConfigError,
    font::FontConfig,
    io::{glob_sources, write_output},
    scanner::TokenScanner,
    subset::GlyphSubsetter,
};

pub use clean::clean;
pub use fonts::{FontAsset, FontPlan, write_font_assets};
pub use sources::{RewrittenSource, TokenMatches, rewrite_sources, rewrite_text};

/// Where sources come from and where outputs go.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub out_dir: PathBuf,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    /// Rewrite sources where they are instead of under `out_dir`.
    pub in_place: bool,
    /// Copy every font unmodified, ignoring `strip`.
    pub force_copy: bool,
}

impl BuildOptions {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            source_dir: manifest.source_dir.clone(),
            out_dir: manifest.out_dir.clone(),
            extensions: manifest.extensions.clone(),
            exclude: manifest.exclude.clone(),
            in_place: false,
            force_copy: false,
        }
    }

    /// Directory receiving font assets.
    pub fn fonts_dir(&self) -> PathBuf {
        self.out_dir.join(FONTS_DIR)
    }

    /// Eligible source files in a stable order.
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        let skip = (!self.in_place).then_some(self.out_dir.as_path());
        glob_sources(&self.source_dir, &self.extensions, &self.exclude, skip)
    }

    fn output_path(&self, source: &Path) -> PathBuf {
        if self.in_place {
            return source.to_path_buf();
        }
        let relative = source.strip_prefix(&self.source_dir).unwrap_or(source);
        self.out_dir.join(relative)
    }
}

/// Outcome of a full build.
#[derive(Debug)]
pub struct BuildReport {
    pub sources: usize,
    pub rewritten: usize,
    pub fonts: Vec<FontPlan>,
    pub assets: Vec<FontAsset>,
}

/// Outcome of a dry run.
#[derive(Debug)]
pub struct ScanReport {
    pub sources: usize,
    pub fonts: Vec<FontPlan>,
    /// Token names per font that matched the pattern but are not registered.
    pub unresolved: Vec<BTreeSet<String>>,
}

const BUILD_STEPS: usize = 5;
const SCAN_STEPS: usize = 3;

/// Run a named pipeline step with timing.
fn run_step<T>(
    name: &str,
    step_num: usize,
    total: usize,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    let value = f()?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(value)
}

/// Check every font before any stylesheet or source is read.
///
/// Fonts are written to one directory, so no two may share a file name.
pub fn validate(configs: &[FontConfig]) -> Result<()> {
    let mut outputs: BTreeMap<_, &Path> = BTreeMap::new();
    for config in configs {
        config.validate()?;
        for font in &config.fonts {
            let name = FontConfig::output_name(font)?;
            if let Some(first) = outputs.insert(name, font) {
                return Err(ConfigError::DuplicateOutput {
                    name: name.to_string_lossy().into_owned(),
                    first: first.to_path_buf(),
                    second: font.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Build one scanner slot per font, in configuration order.
pub fn prepare_scanners(configs: &[FontConfig]) -> Result<Vec<Option<TokenScanner>>> {
    configs.iter().map(FontConfig::scanner).collect()
}

fn plans(configs: &[FontConfig], found: &[TokenMatches]) -> Vec<FontPlan> {
    configs
        .iter()
        .cloned()
        .zip(found)
        .map(|(config, matches)| FontPlan::new(config, matches.chars.clone()))
        .collect()
}

/// Rewrite sources and write subset fonts.
pub fn build(
    options: &BuildOptions,
    configs: &[FontConfig],
    subsetter: &dyn GlyphSubsetter,
) -> Result<BuildReport> {
    let start = Instant::now();

    run_step("validate", 1, BUILD_STEPS, || {
        println!("  Checking {} font configurations...", configs.len());
        validate(configs)
    })?;

    let scanners = run_step("extract-icons", 2, BUILD_STEPS, || {
        let scanners = prepare_scanners(configs)?;
        for (config, scanner) in configs.iter().zip(&scanners) {
            match scanner {
                Some(scanner) => println!(
                    "  {}: {} icons (token prefix {:?})",
                    config.name,
                    scanner.mapping().len(),
                    scanner.prefix()
                ),
                None => println!("  {}: no icon tokens", config.name),
            }
        }
        Ok(scanners)
    })?;

    let (sources, found) = run_step("rewrite-sources", 3, BUILD_STEPS, || {
        let files = options.source_files()?;
        println!("  Scanning {} source files in {}...", files.len(), options.source_dir.display());
        let (sources, found) = rewrite_sources(&files, &scanners)?;
        write_sources(options, &sources)?;
        Ok((sources, found))
    })?;

    let fonts = run_step("accumulate", 4, BUILD_STEPS, || {
        let fonts = plans(configs, &found);
        for plan in &fonts {
            println!("  {}: {} characters", plan.config.name, plan.chars.len());
            debug!("{}: {}", plan.config.name, plan.chars);
        }
        Ok(fonts)
    })?;

    let assets = run_step("write-fonts", 5, BUILD_STEPS, || {
        let fonts_dir = options.fonts_dir();
        println!("  Writing fonts to {}...", fonts_dir.display());
        write_font_assets(&fonts, &fonts_dir, subsetter, options.force_copy)
    })?;

    let rewritten = sources.iter().filter(|s| s.changed).count();
    println!("\n✨ Build complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Sources: {} scanned, {rewritten} rewritten", sources.len());
    for asset in &assets {
        println!(
            "   {} ({:.2} KB, {:.1}% reduction)",
            asset.output.display(),
            asset.output_size as f64 / 1024.0,
            asset.reduction()
        );
    }

    Ok(BuildReport { sources: sources.len(), rewritten, fonts, assets })
}

fn write_sources(options: &BuildOptions, sources: &[RewrittenSource]) -> Result<()> {
    let mut written = 0;
    for source in sources {
        if options.in_place && !source.changed {
            continue;
        }
        write_output(options.output_path(&source.path), &source.text)?;
        written += 1;
    }
    println!("  Wrote {written} source files");
    Ok(())
}

/// Compute every font's character set without writing anything.
pub fn scan(options: &BuildOptions, configs: &[FontConfig]) -> Result<ScanReport> {
    run_step("validate", 1, SCAN_STEPS, || validate(configs))?;
    let scanners = run_step("extract-icons", 2, SCAN_STEPS, || prepare_scanners(configs))?;

    run_step("scan-sources", 3, SCAN_STEPS, || {
        let files = options.source_files()?;
        println!("  Scanning {} source files...", files.len());
        let (_, found) = rewrite_sources(&files, &scanners)?;

        let fonts = plans(configs, &found);
        let unresolved = found.into_iter().map(|matches| matches.unresolved).collect();
        Ok(ScanReport { sources: files.len(), fonts, unresolved })
    })
}
