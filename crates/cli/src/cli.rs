//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use iconsubset_core::config::DEFAULT_MANIFEST;

use crate::commands::{build, clean, coverage, extract, scan, subset};

#[derive(Parser)]
#[command(name = "iconsubset")]
#[command(about = "Subset icon fonts to the icons an application actually uses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ManifestArgs {
    /// Build manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    pub config: PathBuf,
    /// Overrides the manifest's source_dir
    #[arg(long)]
    pub source_dir: Option<PathBuf>,
    /// Overrides the manifest's out_dir
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite icon tokens in sources and write (subset) fonts
    Build {
        #[command(flatten)]
        args: ManifestArgs,
        /// Rewrite sources where they are
        #[arg(long)]
        in_place: bool,
        /// Copy fonts unmodified even if `strip` is set
        #[arg(long)]
        no_strip: bool,
    },
    /// Report the characters each font would keep, without writing anything
    Scan {
        #[command(flatten)]
        args: ManifestArgs,
        /// Also list tokens that match a prefix but name no icon
        #[arg(long)]
        unresolved: bool,
    },
    /// Print the icon mapping of a stylesheet
    Extract {
        stylesheet: PathBuf,
        /// Variable prefix of flat per-icon variables
        #[arg(long, default_value = "$", conflicts_with = "list")]
        prefix: String,
        /// Name of an aggregate list variable, e.g. `$mdi-icons`
        #[arg(long)]
        list: Option<String>,
    },
    /// Subset a single font to the given characters
    Subset {
        #[arg(required = true)]
        input: PathBuf,
        #[arg(required = true)]
        output: PathBuf,
        #[arg(long, default_value = "")]
        chars: String,
        /// Hexadecimal codepoints, e.g. `f1f8,1F600`
        #[arg(long, value_delimiter = ',')]
        codepoints: Vec<String>,
        /// Keep glyph names in the output
        #[arg(long)]
        keep_glyph_names: bool,
    },
    /// List characters the font has no glyph for
    Coverage {
        #[arg(required = true)]
        font: PathBuf,
        #[arg(long)]
        chars: String,
    },
    /// Remove the output directory
    Clean {
        #[command(flatten)]
        args: ManifestArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args, in_place, no_strip } => {
                build(&args, in_place, no_strip)?;
            }
            Commands::Scan { args, unresolved } => {
                scan(&args, unresolved)?;
            }
            Commands::Extract { stylesheet, prefix, list } => {
                extract(&stylesheet, prefix, list)?;
            }
            Commands::Subset { input, output, chars, codepoints, keep_glyph_names } => {
                subset(&input, &output, &chars, &codepoints, keep_glyph_names)?;
            }
            Commands::Coverage { font, chars } => {
                coverage(&font, &chars)?;
            }
            Commands::Clean { args } => {
                clean(&args)?;
            }
        }
        Ok(())
    }
}
