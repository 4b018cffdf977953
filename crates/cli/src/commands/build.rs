//! Manifest-driven commands: build, scan, clean.

use anyhow::Result;
use iconsubset_core::{
    BuildOptions, BuildReport, FontConfig, HarfBuzzSubsetter, Manifest, ScanReport,
    pipeline,
};
use log::info;

use crate::cli::ManifestArgs;

/// Load the manifest and apply command-line overrides.
pub fn load_build(args: &ManifestArgs) -> Result<(BuildOptions, Vec<FontConfig>)> {
    let manifest = Manifest::load(&args.config)?;
    let configs = manifest.font_configs()?;
    let mut options = BuildOptions::from_manifest(&manifest);
    if let Some(dir) = &args.source_dir {
        options.source_dir = dir.clone();
    }
    if let Some(dir) = &args.out_dir {
        options.out_dir = dir.clone();
    }
    info!(
        "Loaded {} ({} fonts, sources in {})",
        args.config.display(),
        configs.len(),
        options.source_dir.display()
    );
    Ok((options, configs))
}

pub fn build(args: &ManifestArgs, in_place: bool, no_strip: bool) -> Result<BuildReport> {
    let (mut options, configs) = load_build(args)?;
    options.in_place = in_place;
    options.force_copy = no_strip;
    pipeline::build(&options, &configs, &HarfBuzzSubsetter::new())
}

pub fn scan(args: &ManifestArgs, show_unresolved: bool) -> Result<ScanReport> {
    let (options, configs) = load_build(args)?;
    let report = pipeline::scan(&options, &configs)?;

    println!("\nScanned {} source files", report.sources);
    for (plan, unresolved) in report.fonts.iter().zip(&report.unresolved) {
        println!("  {}: {} characters", plan.config.name, plan.chars.len());
        if !plan.chars.is_empty() {
            println!("    {}", plan.chars.codepoints().join(" "));
        }
        if show_unresolved && !unresolved.is_empty() {
            let prefix = plan.config.token_prefix.as_deref().unwrap_or_default();
            let names: Vec<String> =
                unresolved.iter().map(|name| format!("{prefix}{name}")).collect();
            println!("    unresolved: {}", names.join(" "));
        }
    }
    Ok(report)
}

pub fn clean(args: &ManifestArgs) -> Result<()> {
    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => Manifest::load(&args.config)?.out_dir,
    };
    pipeline::clean(&out_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        fs::{create_dir_all, write},
        path::Path,
    };

    use super::*;

    fn args(root: &Path) -> ManifestArgs {
        ManifestArgs { config: root.join("iconsubset.toml"), source_dir: None, out_dir: None }
    }

    fn project(root: &Path) {
        create_dir_all(root.join("app")).unwrap();
        write(root.join("icons.ttf"), b"font").unwrap();
        write(root.join("app/main.ts"), "icon-trash icon-trsh").unwrap();
        write(
            root.join("iconsubset.toml"),
            r#"
source_dir = "app"

[[fonts]]
kind = "custom"
path = "icons.ttf"
token_prefix = "icon-"
token_values = { trash = "ee09" }
"#,
        )
        .unwrap();
    }

    #[test]
    fn test_overrides_replace_manifest_dirs() {
        let dir = tempfile::tempdir().unwrap();
        project(dir.path());

        let mut args = args(dir.path());
        args.out_dir = Some(dir.path().join("public"));
        let (options, configs) = load_build(&args).unwrap();

        assert_eq!(options.source_dir, dir.path().join("app"));
        assert_eq!(options.out_dir, dir.path().join("public"));
        assert_eq!(configs.len(), 1);
    }

    #[test]
    fn test_scan_and_build_without_strip() {
        let dir = tempfile::tempdir().unwrap();
        project(dir.path());

        let report = scan(&args(dir.path()), true).unwrap();
        assert_eq!(report.fonts[0].chars.as_text(), "\u{ee09}");
        assert!(report.unresolved[0].contains("trsh"));

        // the font is not stripped, so HarfBuzz never sees the fake font data
        let report = build(&args(dir.path()), false, false).unwrap();
        assert_eq!(report.rewritten, 1);
        assert_eq!(std::fs::read(dir.path().join("dist/fonts/icons.ttf")).unwrap(), b"font");

        clean(&args(dir.path())).unwrap();
        assert!(!dir.path().join("dist").exists());
    }
}
