//! Pipe tables.

use crate::block::{Block, RichText};
use crate::inline::parse_inline;

/// Returns true if the line belongs to a pipe table.
pub fn is_table_line(line: &str) -> bool {
    line.trim().starts_with('|')
}

/// Splits one table line into trimmed cell strings.
///
/// An empty first or last cell produced by a leading or trailing pipe is
/// dropped.
pub fn split_row(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.trim().split('|').collect();
    if cells.first().is_some_and(|cell| cell.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(str::trim).collect()
}

fn is_separator_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':'))
}

/// Parses the table starting at `lines[start]`.
///
/// Returns the block and the index of the first line after the table, or
/// `None` if `lines[start]` is not a table line.
pub fn parse_table(lines: &[&str], start: usize) -> Option<(Block, usize)> {
    let run = lines[start.min(lines.len())..]
        .iter()
        .take_while(|line| is_table_line(line))
        .count();
    if run == 0 {
        return None;
    }

    let mut rows: Vec<Vec<&str>> = lines[start..start + run]
        .iter()
        .map(|line| split_row(line))
        .collect();

    let has_header = rows.len() >= 2 && is_separator_row(&rows[1]);
    if has_header {
        rows.remove(1);
    }

    let width = rows.first().map_or(0, Vec::len);
    let rows: Vec<Vec<Vec<RichText>>> = rows
        .into_iter()
        .map(|cells| cells.into_iter().map(parse_inline).collect())
        .collect();

    Some((
        Block::Table {
            width,
            has_header,
            rows,
        },
        start + run,
    ))
}
