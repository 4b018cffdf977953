//! CLI command implementations.

mod build;
mod fonts;

pub use build::{build, clean, load_build, scan};
pub use fonts::{coverage, extract, subset};
