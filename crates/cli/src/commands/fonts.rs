//! Single-file commands: extract, subset, coverage.

use std::path::Path;

use anyhow::{Result, bail};
use iconsubset_core::{
    CharacterSet, StylesheetSelector, Subsetter, extract_icons,
    io::{read_font, write_output},
    subset::missing_from_font,
    symbols::parse_codepoint,
};
use log::{info, warn};

pub fn extract(stylesheet: &Path, prefix: String, list: Option<String>) -> Result<()> {
    let selector = match list {
        Some(list) => StylesheetSelector::List(list),
        None => StylesheetSelector::Prefix(prefix),
    };
    let mapping = extract_icons(stylesheet, &selector)?;
    for (name, codepoint) in mapping.iter() {
        println!("{name} {codepoint}");
    }
    info!("Extracted {} icons from {}", mapping.len(), stylesheet.display());
    Ok(())
}

/// Characters from literal text plus hexadecimal codepoints.
pub fn requested_characters(chars: &str, codepoints: &[String]) -> Result<CharacterSet> {
    let mut set: CharacterSet = chars.chars().collect();
    for codepoint in codepoints.iter().filter(|cp| !cp.is_empty()) {
        match parse_codepoint(codepoint) {
            Some(c) => {
                set.insert(c);
            }
            None => bail!("Invalid codepoint: {codepoint}"),
        }
    }
    Ok(set)
}

pub fn subset(
    input: &Path,
    output: &Path,
    chars: &str,
    codepoints: &[String],
    keep_glyph_names: bool,
) -> Result<()> {
    let requested = requested_characters(chars, codepoints)?;
    if requested.is_empty() {
        bail!("No characters requested, pass --chars or --codepoints");
    }

    let data = read_font(input)?;
    let missing = missing_from_font(&data, &requested)?;
    if !missing.is_empty() {
        warn!("{} has no glyphs for {missing}", input.display());
    }

    let subset_data = Subsetter::icon_font()
        .retain_glyph_names(keep_glyph_names)
        .with_characters(requested.iter())
        .subset(&data)?;
    write_output(output, &subset_data)?;

    let input_size = data.len() as f64 / 1024.0;
    let output_size = subset_data.len() as f64 / 1024.0;
    info!(
        "Subset {} -> {} ({input_size:.2} KB -> {output_size:.2} KB, {:.1}% reduction)",
        input.file_name().unwrap_or_default().to_string_lossy(),
        output.file_name().unwrap_or_default().to_string_lossy(),
        (1.0 - output_size / input_size) * 100.0
    );
    println!("Wrote {} ({} characters)", output.display(), requested.len());
    Ok(())
}

pub fn coverage(font: &Path, chars: &str) -> Result<()> {
    let requested: CharacterSet = chars.chars().collect();
    let missing = missing_from_font(&read_font(font)?, &requested)?;
    if missing.is_empty() {
        println!("All {} characters are covered", requested.len());
    } else {
        println!("Missing {} of {} characters: {missing}", missing.len(), requested.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_characters() {
        let set = requested_characters("ab", &["f1f8".into(), "1F600".into()]).unwrap();
        assert_eq!(set.as_text(), "ab\u{f1f8}\u{1F600}");
    }

    #[test]
    fn test_invalid_codepoint_is_an_error() {
        assert!(requested_characters("", &["d800".into()]).is_err());
        assert!(requested_characters("", &["zz".into()]).is_err());
    }
}
