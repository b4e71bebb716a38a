//! Fenced code blocks.
//!
//! A fence opens on a line whose trimmed text starts with three backticks and
//! closes on the next such line. Content between them is kept verbatim.

/// Language reported when the opening fence carries none.
pub const DEFAULT_LANGUAGE: &str = "plain text";

const FENCE: &str = "```";

/// Returns true if the line opens or closes a code fence.
pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// A parsed fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    /// Language hint from the opening line.
    pub language: String,
    /// Verbatim content, lines joined with `\n`.
    pub content: String,
    /// Index of the first line after the block.
    pub next: usize,
    /// Whether a closing fence was found.
    pub closed: bool,
}

/// Parses the code fence opening at `lines[start]`.
///
/// Returns `None` if that line is not a fence. An unclosed fence consumes the
/// remaining input.
pub fn parse_code_fence(lines: &[&str], start: usize) -> Option<CodeFence> {
    let opener = lines.get(start)?.trim();
    if !opener.starts_with(FENCE) {
        return None;
    }

    let language = opener.trim_start_matches('`').trim();
    let language = if language.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        language.to_string()
    };

    let body = &lines[start + 1..];
    let (content_lines, next, closed) = match body.iter().position(|line| is_fence_line(line)) {
        Some(end) => (&body[..end], start + 1 + end + 1, true),
        None => (body, lines.len(), false),
    };

    Some(CodeFence {
        language,
        content: content_lines.join("\n"),
        next,
        closed,
    })
}
