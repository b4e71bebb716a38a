//! Leading `---` metadata blocks.
//!
//! The block pass only needs the line range to skip; lessons also expose the
//! YAML mapping as JSON.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors emitted while parsing frontmatter metadata.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts YAML frontmatter from an input document as a JSON mapping.
///
/// Returns `{}` when there is no frontmatter. A block without a closing `---`
/// is not frontmatter.
pub fn extract_frontmatter(input: &str) -> Result<JsonValue, FrontmatterError> {
    match find_yaml_block(input) {
        Some(block) => parse_yaml_block(&block),
        None => Ok(JsonValue::Object(Default::default())),
    }
}

/// Line range (inclusive) of the frontmatter block within `lines`.
///
/// The first non-blank line must be exactly `---` and a later line must be
/// exactly `---` as well.
pub fn frontmatter_range(lines: &[&str]) -> Option<(usize, usize)> {
    let open = lines.iter().position(|line| !line.trim().is_empty())?;
    if !is_yaml_fence(lines[open]) {
        return None;
    }
    let close = lines[open + 1..].iter().position(|line| is_yaml_fence(line))?;
    Some((open, open + 1 + close))
}

/// Returns the lines following the frontmatter block, or all lines if none.
pub fn strip_frontmatter_lines<'l, 'a>(lines: &'l [&'a str]) -> &'l [&'a str] {
    match frontmatter_range(lines) {
        Some((_, close)) => &lines[close + 1..],
        None => lines,
    }
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    let empty = || JsonValue::Object(Default::default());
    if block.trim().is_empty() {
        return Ok(empty());
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))? {
        JsonValue::Null => Ok(empty()),
        mapping @ JsonValue::Object(_) => Ok(mapping),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

/// Collects the YAML text between the fences.
fn find_yaml_block(input: &str) -> Option<String> {
    let lines: Vec<&str> = strip_bom(input).split('\n').collect();
    let (open, close) = frontmatter_range(&lines)?;
    let block = lines[open + 1..close]
        .iter()
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join("\n");
    Some(block)
}

pub(crate) fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}
