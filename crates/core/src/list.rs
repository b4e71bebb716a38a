//! Indentation-driven list nesting.
//!
//! The tracker keeps a stack of open list items. Each entry records the
//! item's indentation and its index path into the output tree, so later lines
//! can reach the still-growing item without holding a reference into it.

use crate::block::{Block, ListKind, RichText};

/// Columns a tab expands to when measuring indentation.
pub const TAB_WIDTH: usize = 4;

/// Indentation width of a line's leading whitespace.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// A list marker recognized at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker<'a> {
    /// Indentation of the marker.
    pub indent: usize,
    /// Bullet or numbered.
    pub kind: ListKind,
    /// Item text after the marker, trimmed.
    pub text: &'a str,
}

/// Recognizes `- item`, `* item` and `12. item` lines.
pub fn parse_list_marker(line: &str) -> Option<ListMarker<'_>> {
    let content = line.trim_start();
    let indent = indent_width(line);

    if let Some(text) = content
        .strip_prefix("- ")
        .or_else(|| content.strip_prefix("* "))
    {
        return Some(ListMarker {
            indent,
            kind: ListKind::Bullet,
            text: text.trim(),
        });
    }

    let digits = content.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let text = content[digits..].strip_prefix(". ")?;
    Some(ListMarker {
        indent,
        kind: ListKind::Numbered,
        text: text.trim(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListEntry {
    indent: usize,
    path: Vec<usize>,
}

/// Stack of open list items shared by bullet and numbered kinds.
#[derive(Debug, Default)]
pub struct ListNestingTracker {
    stack: Vec<ListEntry>,
}

impl ListNestingTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes every open item.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Appends a list item at `indent`, nesting it under the nearest open item
    /// with smaller indentation.
    pub fn push_item(
        &mut self,
        out: &mut Vec<Block>,
        indent: usize,
        kind: ListKind,
        text: Vec<RichText>,
    ) {
        while self.stack.last().is_some_and(|entry| entry.indent >= indent) {
            self.stack.pop();
        }

        let item = Block::list_item(kind, text);
        let path = match self.stack.last() {
            Some(parent) => attach_child(out, &parent.path, item),
            None => push_top_level(out, item),
        };
        log::trace!("list item {kind:?} at indent {indent} -> {path:?}");
        self.stack.push(ListEntry { indent, path });
    }

    /// Places a non-list line at `indent`.
    ///
    /// The paragraph becomes a child of the deepest open item indented less
    /// than the line; deeper items are closed. With no such item the paragraph
    /// goes to the top level and the stack is cleared.
    pub fn push_continuation(&mut self, out: &mut Vec<Block>, indent: usize, text: Vec<RichText>) {
        let paragraph = Block::paragraph(text);
        match self.stack.iter().rposition(|entry| entry.indent < indent) {
            Some(owner) => {
                self.stack.truncate(owner + 1);
                let path = attach_child(out, &self.stack[owner].path, paragraph);
                log::trace!("continuation at indent {indent} -> {path:?}");
            }
            None => {
                self.stack.clear();
                out.push(paragraph);
            }
        }
    }
}

fn push_top_level(out: &mut Vec<Block>, block: Block) -> Vec<usize> {
    out.push(block);
    vec![out.len() - 1]
}

fn block_at<'b>(out: &'b mut [Block], path: &[usize]) -> Option<&'b mut Block> {
    let (first, rest) = path.split_first()?;
    let mut block = out.get_mut(*first)?;
    for &index in rest {
        block = block.children_mut()?.get_mut(index)?;
    }
    Some(block)
}

/// Appends `block` to the children of the block at `parent` and returns the
/// new block's path. Falls back to the top level if the path is stale.
fn attach_child(out: &mut Vec<Block>, parent: &[usize], block: Block) -> Vec<usize> {
    match block_at(out, parent).and_then(Block::children_mut) {
        Some(children) => {
            children.push(block);
            let mut path = parent.to_vec();
            path.push(children.len() - 1);
            path
        }
        None => push_top_level(out, block),
    }
}
