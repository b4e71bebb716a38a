//! Directive syntax.
//!
//! Directives are `:::name [argument]` lines. Container directives open a
//! section closed by a bare `:::` line; sections nest, so close-matching
//! counts every nested container opener.

use std::ops::Range;

/// Directive names understood by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `:::toc`
    Toc,
    /// `:::audio <url>`
    Audio,
    /// `:::video <url>`
    Video,
    /// `:::callout [emoji]`
    Callout,
    /// `:::column-list`
    ColumnList,
    /// `:::column`, only meaningful inside a column list.
    Column,
    /// `:::synced-block [id]`
    SyncedBlock,
    /// `:::study-text`
    StudyText,
    /// `:::toggle-heading <label>`
    ToggleHeading,
    /// `:::toggle-h1|h2|h3 <label>`
    ToggleH(u8),
}

impl DirectiveKind {
    fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "toc" => Self::Toc,
            "audio" => Self::Audio,
            "video" => Self::Video,
            "callout" => Self::Callout,
            "column-list" => Self::ColumnList,
            "column" => Self::Column,
            "synced-block" => Self::SyncedBlock,
            "study-text" => Self::StudyText,
            "toggle-heading" => Self::ToggleHeading,
            "toggle-h1" => Self::ToggleH(1),
            "toggle-h2" => Self::ToggleH(2),
            "toggle-h3" => Self::ToggleH(3),
            _ => return None,
        };
        Some(kind)
    }

    /// Source name of the directive.
    pub fn name(self) -> &'static str {
        match self {
            Self::Toc => "toc",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Callout => "callout",
            Self::ColumnList => "column-list",
            Self::Column => "column",
            Self::SyncedBlock => "synced-block",
            Self::StudyText => "study-text",
            Self::ToggleHeading => "toggle-heading",
            Self::ToggleH(1) => "toggle-h1",
            Self::ToggleH(2) => "toggle-h2",
            Self::ToggleH(_) => "toggle-h3",
        }
    }

    /// Whether the directive opens a `:::`-terminated section.
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Toc | Self::Audio | Self::Video)
    }
}

/// Parsed representation of a directive opening line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveOpening<'a> {
    /// Recognized directive.
    pub kind: DirectiveKind,
    /// Trimmed text after the name (label, URL, emoji or id); may be empty.
    pub argument: &'a str,
}

/// Splits `:::name rest` into the lowercased name and the trimmed rest.
fn split_directive(line: &str) -> Option<(String, &str)> {
    let after_colons = line.trim().strip_prefix(":::")?;
    let name_end = after_colons
        .find(char::is_whitespace)
        .unwrap_or(after_colons.len());
    let name = after_colons[..name_end].to_ascii_lowercase();
    Some((name, after_colons[name_end..].trim()))
}

/// Parse an opening directive line like `:::toggle-h2 Answers`.
///
/// Returns `None` for bare closers and unknown names.
pub fn parse_opening_directive(line: &str) -> Option<DirectiveOpening<'_>> {
    let (name, argument) = split_directive(line)?;
    let kind = DirectiveKind::from_name(&name)?;
    Some(DirectiveOpening { kind, argument })
}

/// Whether a line opens a nested section for close-matching.
///
/// Any `toggle-` name counts, recognized or not.
fn deepens_section(line: &str) -> bool {
    let Some((name, _)) = split_directive(line) else {
        return false;
    };
    name.starts_with("toggle-")
        || DirectiveKind::from_name(&name).is_some_and(DirectiveKind::is_container)
}

/// Check if a line is a directive closer (`:::`).
pub fn is_directive_closer(line: &str) -> bool {
    line.trim() == ":::"
}

/// Extent of a directive section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Interior line range, excluding the opener and closer.
    pub interior: Range<usize>,
    /// Index of the first line after the section.
    pub next: usize,
    /// Whether a balanced closer was found.
    pub closed: bool,
}

/// Finds the end of the section opened at `lines[open]`.
///
/// Depth starts at 1, grows on nested container openers and shrinks on bare
/// `:::` lines. Without a balanced closer the section runs to end-of-input.
pub fn find_section_end(lines: &[&str], open: usize) -> Section {
    let mut depth = 1usize;

    for (index, line) in lines.iter().enumerate().skip(open + 1) {
        if is_directive_closer(line) {
            depth -= 1;
            if depth == 0 {
                return Section {
                    interior: open + 1..index,
                    next: index + 1,
                    closed: true,
                };
            }
        } else if deepens_section(line) {
            depth += 1;
        }
    }

    Section {
        interior: (open + 1).min(lines.len())..lines.len(),
        next: lines.len(),
        closed: false,
    }
}

/// Column buckets found inside a column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSplit<'l, 'a> {
    /// Interior lines of each `:::column` section, in order.
    pub columns: Vec<&'l [&'a str]>,
    /// Non-blank lines outside any column section.
    pub ignored: usize,
}

/// Splits column-list interior lines into per-column buckets.
pub fn split_columns<'l, 'a>(lines: &'l [&'a str]) -> ColumnSplit<'l, 'a> {
    let mut columns = Vec::new();
    let mut ignored = 0;
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        match parse_opening_directive(line) {
            Some(opening) if opening.kind == DirectiveKind::Column => {
                let section = find_section_end(lines, index);
                columns.push(&lines[section.interior]);
                index = section.next;
            }
            _ => {
                if !line.trim().is_empty() {
                    ignored += 1;
                }
                index += 1;
            }
        }
    }

    ColumnSplit { columns, ignored }
}
