//! Icon name to codepoint mappings extracted from SCSS variable files.
//!
//! Two layouts are understood:
//!
//! - one variable per icon, e.g. FontAwesome's `$fa-var-trash: \f1f8;`
//! - one aggregate list variable, e.g. Material Design Icons'
//!   `$mdi-icons: "ab-testing" F01C9, "abacus" F16E0;`

use std::{fs::read_to_string, path::Path};

use anyhow::{Context, Result};
use cssparser::{ParseError, Parser, ParserInput, Token};
use indexmap::IndexMap;
use log::{debug, warn};

/// Mapping from icon name to hexadecimal codepoint string.
///
/// Keeps the order in which icons were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconMapping {
    icons: IndexMap<String, String>,
}

impl IconMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, codepoint: impl Into<String>) {
        self.icons.insert(name.into(), codepoint.into());
    }

    /// Raw codepoint string registered for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }

    /// Character for `name`, if registered with a valid Unicode scalar value.
    pub fn resolve(&self, name: &str) -> Option<char> {
        self.get(name).and_then(parse_codepoint)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.icons.iter().map(|(name, cp)| (name.as_str(), cp.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IconMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, codepoint) in iter {
            mapping.insert(name, codepoint);
        }
        mapping
    }
}

/// Parse a hexadecimal codepoint string into a character.
///
/// Returns `None` for non-hex input, values above U+10FFFF and surrogates.
pub fn parse_codepoint(hex: &str) -> Option<char> {
    u32::from_str_radix(hex.trim(), 16).ok().and_then(char::from_u32)
}

/// How icon variables are located in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSelector {
    /// Every variable whose name starts with this prefix is one icon.
    Prefix(String),
    /// A single variable holding a comma separated `"name" codepoint` list.
    List(String),
}

impl Default for StylesheetSelector {
    fn default() -> Self {
        Self::Prefix("$".to_string())
    }
}

/// A top-level SCSS variable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScssVariable {
    /// Name including the leading `$`.
    pub name: String,
    /// Value with comments and `!default`/`!global` flags removed.
    pub value: String,
}

/// Read a stylesheet and extract its icon mapping.
pub fn extract_icons(path: &Path, selector: &StylesheetSelector) -> Result<IconMapping> {
    let source = read_to_string(path)
        .with_context(|| format!("Failed to read stylesheet: {}", path.display()))?;
    let mapping = icons_from_source(&source, selector);
    debug!("Extracted {} icons from {}", mapping.len(), path.display());
    Ok(mapping)
}

/// Extract an icon mapping from stylesheet source text.
pub fn icons_from_source(source: &str, selector: &StylesheetSelector) -> IconMapping {
    let variables = parse_variables(source);
    match selector {
        StylesheetSelector::Prefix(prefix) => icons_from_prefixed(&variables, prefix),
        StylesheetSelector::List(name) => match variables.iter().find(|v| &v.name == name) {
            Some(variable) => icons_from_list(&variable.value),
            None => {
                warn!("Stylesheet variable {name} not found, no icons extracted");
                IconMapping::new()
            }
        },
    }
}

fn icons_from_prefixed(variables: &[ScssVariable], prefix: &str) -> IconMapping {
    variables
        .iter()
        .filter_map(|v| {
            let name = v.name.strip_prefix(prefix)?;
            (!name.is_empty()).then(|| (name, clean_codepoint(&v.value)))
        })
        .collect()
}

fn icons_from_list(value: &str) -> IconMapping {
    let value = value.trim();
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value);

    inner
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry
                .split(|c: char| c.is_whitespace() || c == ':')
                .filter(|part| !part.is_empty());
            let name = parts.next()?.trim_matches(['"', '\'']);
            let codepoint = clean_codepoint(parts.next()?);
            (!name.is_empty()).then(|| (name.to_string(), codepoint))
        })
        .collect()
}

/// `"f001"`, `"\f001"` and `\f001` all become `f001`.
fn clean_codepoint(value: &str) -> String {
    let value = value.trim().trim_matches(['"', '\'']);
    value.strip_prefix('\\').unwrap_or(value).trim().to_string()
}

/// Collect top-level `$name: value;` declarations.
///
/// Declarations nested in blocks are local to them and skipped. SCSS `//`
/// comments are dropped along with CSS block comments.
pub fn parse_variables(source: &str) -> Vec<ScssVariable> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let mut variables = Vec::new();
    let mut statement_start = true;

    loop {
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => {}
            Token::Delim('/') if at_line_comment(&mut parser) => skip_line_comment(&mut parser),
            // block contents are skipped by the next call to `next`
            Token::Semicolon | Token::CurlyBracketBlock | Token::CloseCurlyBracket => {
                statement_start = true;
            }
            Token::Delim('$') if statement_start => match parse_declaration(&mut parser) {
                Some(variable) => variables.push(variable),
                None => statement_start = false,
            },
            _ => statement_start = false,
        }
    }

    variables
}

/// Parse `ident: value;` after a `$`. Rewinds if no colon follows the name.
fn parse_declaration(parser: &mut Parser<'_, '_>) -> Option<ScssVariable> {
    let name = parser
        .try_parse(|p| {
            let name = match p.next_including_whitespace_and_comments() {
                Ok(Token::Ident(ident)) => format!("${}", &**ident),
                _ => return Err(()),
            };
            loop {
                match p.next_including_whitespace_and_comments() {
                    Ok(Token::WhiteSpace(_) | Token::Comment(_)) => {}
                    Ok(Token::Colon) => return Ok(name),
                    _ => return Err(()),
                }
            }
        })
        .ok()?;

    let mut value = String::new();
    collect_value(parser, &mut value, true);
    Some(ScssVariable { name, value: strip_flags(&value).to_string() })
}

/// Append the raw text of a value to `value`, without comments.
///
/// At the top level the value ends at `;` or `}`; nested blocks run to
/// their closing bracket.
fn collect_value<'i>(parser: &mut Parser<'i, '_>, value: &mut String, top_level: bool) {
    let mut after_colon = false;
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return,
        };
        let is_colon = matches!(token, Token::Colon);
        let closing = match token {
            Token::Semicolon | Token::CloseCurlyBracket if top_level => return,
            Token::Comment(_) => None,
            Token::WhiteSpace(ws) => {
                value.push_str(ws);
                None
            }
            // `//` right after a colon is a URL scheme, not a comment
            Token::Delim('/') if !after_colon && at_line_comment(parser) => {
                skip_line_comment(parser);
                value.push('\n');
                None
            }
            Token::Function(_) | Token::ParenthesisBlock => Some(')'),
            Token::SquareBracketBlock => Some(']'),
            Token::CurlyBracketBlock => Some('}'),
            _ => {
                value.push_str(parser.slice_from(start));
                None
            }
        };
        if let Some(closing) = closing {
            value.push_str(parser.slice_from(start));
            let _ = parser.parse_nested_block(|nested| {
                collect_value(nested, value, false);
                Ok::<_, ParseError<'i, ()>>(())
            });
            value.push(closing);
        }
        after_colon = is_colon;
    }
}

/// Consume the second `/` of a `//` comment if there is one.
fn at_line_comment(parser: &mut Parser<'_, '_>) -> bool {
    parser
        .try_parse(|p| match p.next_including_whitespace_and_comments() {
            Ok(Token::Delim('/')) => Ok(()),
            _ => Err(()),
        })
        .is_ok()
}

fn skip_line_comment(parser: &mut Parser<'_, '_>) {
    while let Ok(token) = parser.next_including_whitespace_and_comments() {
        if matches!(token, Token::WhiteSpace(ws) if ws.contains('\n')) {
            return;
        }
    }
}

fn strip_flags(value: &str) -> &str {
    let mut value = value.trim();
    loop {
        match ["!default", "!global"]
            .iter()
            .find_map(|flag| value.strip_suffix(flag))
        {
            Some(rest) => value = rest.trim_end(),
            None => return value,
        }
    }
}
