//! Inline rich-text tokenizer.
//!
//! A single left-to-right scan over one line of text. Bold, italic and
//! strikethrough are independent toggles; every toggle flushes the pending
//! buffer into a run carrying the styles active until then. Unmatched
//! delimiters are always literal text.

use crate::block::RichText;

/// Characters a backslash turns into literals.
const ESCAPABLE: &[char] = &['*', '_', '`', '~', '[', ']', '!'];

/// Tokenizes one line of text into rich-text runs.
///
/// Always returns at least one run; empty input yields a single empty run.
pub fn parse_inline(text: &str) -> Vec<RichText> {
    let mut runs = InlineTokenizer::new(text).run();
    if runs.is_empty() {
        runs.push(RichText::plain(""));
    }
    runs
}

/// For each index, the position of the next `target` at or after it.
fn next_occurrences(chars: &[char], target: char) -> Vec<usize> {
    let mut next = vec![chars.len(); chars.len() + 1];
    for index in (0..chars.len()).rev() {
        next[index] = if chars[index] == target { index } else { next[index + 1] };
    }
    next
}

#[derive(Debug, Clone, Copy, Default)]
struct Style {
    bold: bool,
    italic: bool,
    strikethrough: bool,
}

impl Style {
    fn apply(self, run: &mut RichText) {
        if run.code {
            return;
        }
        run.bold |= self.bold;
        run.italic |= self.italic;
        run.strikethrough |= self.strikethrough;
    }
}

struct InlineTokenizer {
    chars: Vec<char>,
    /// Index of the next `]` at or after each position (`chars.len()` if none).
    next_label_end: Vec<usize>,
    /// Index of the next `)` at or after each position.
    next_url_end: Vec<usize>,
    pos: usize,
    buffer: String,
    style: Style,
    runs: Vec<RichText>,
}

impl InlineTokenizer {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self {
            next_label_end: next_occurrences(&chars, ']'),
            next_url_end: next_occurrences(&chars, ')'),
            chars,
            pos: 0,
            buffer: String::new(),
            style: Style::default(),
            runs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RichText> {
        while let Some(c) = self.peek(0) {
            let consumed = match c {
                '\\' => self.try_escape(),
                '!' if self.peek(1) == Some('[') => self.try_image(),
                '[' => self.try_link(),
                '*' if self.peek(1) == Some('*') => {
                    self.double_delimiter('*');
                    true
                }
                '*' => {
                    self.italic_delimiter();
                    true
                }
                '~' if self.peek(1) == Some('~') => {
                    self.double_delimiter('~');
                    true
                }
                '`' => self.try_code_span(),
                _ => false,
            };

            if !consumed {
                self.buffer.push(c);
                self.pos += 1;
            }
        }

        self.flush();
        self.runs
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut run = RichText::plain(std::mem::take(&mut self.buffer));
        self.style.apply(&mut run);
        self.runs.push(run);
    }

    fn try_escape(&mut self) -> bool {
        match self.peek(1) {
            Some(next) if ESCAPABLE.contains(&next) => {
                self.buffer.push(next);
                self.pos += 2;
                true
            }
            _ => false,
        }
    }

    /// Finds `](` after `open` at the first `]`, then the closing `)`.
    ///
    /// Returns `(label_end, url_end)` as char indices of `]` and `)`.
    fn bracket_target(&self, open: usize) -> Option<(usize, usize)> {
        let close = *self.next_label_end.get(open)?;
        if self.chars.get(close + 1) != Some(&'(') {
            return None;
        }
        let url_end = *self.next_url_end.get(close + 2)?;
        if url_end == self.chars.len() {
            return None;
        }
        Some((close, url_end))
    }

    fn try_image(&mut self) -> bool {
        let Some((alt_end, url_end)) = self.bracket_target(self.pos + 2) else {
            return false;
        };
        let alt = self.slice(self.pos + 2, alt_end);
        let url = self.slice(alt_end + 2, url_end);

        self.flush();
        let label = if alt.is_empty() { "Image".to_string() } else { alt };
        let mut run = RichText::plain(label).with_link(url);
        self.style.apply(&mut run);
        self.runs.push(run);
        self.pos = url_end + 1;
        true
    }

    fn try_link(&mut self) -> bool {
        let Some((label_end, url_end)) = self.bracket_target(self.pos + 1) else {
            return false;
        };
        let label = self.slice(self.pos + 1, label_end);
        let url = self.slice(label_end + 2, url_end);

        self.flush();
        for mut run in parse_inline(&label) {
            self.style.apply(&mut run);
            self.runs.push(run.with_link(url.as_str()));
        }
        self.pos = url_end + 1;
        true
    }

    fn try_code_span(&mut self) -> bool {
        let start = self.pos + 1;
        let Some(len) = self.chars[start..].iter().position(|&c| c == '`') else {
            return false;
        };
        if len == 0 {
            // Empty span: both backticks stay literal.
            self.buffer.push_str("``");
            self.pos += 2;
            return true;
        }

        self.flush();
        self.runs.push(RichText::code(self.slice(start, start + len)));
        self.pos = start + len + 1;
        true
    }

    /// `**` (bold) or `~~` (strikethrough).
    fn double_delimiter(&mut self, marker: char) {
        let active = match marker {
            '*' => self.style.bold,
            _ => self.style.strikethrough,
        };
        let opens = !active
            && self.peek(2).is_some_and(|c| !c.is_whitespace())
            && self.has_unescaped_ahead(self.pos + 2, &[marker, marker]);

        if active || opens {
            self.flush();
            match marker {
                '*' => self.style.bold = !active,
                _ => self.style.strikethrough = !active,
            }
        } else {
            self.buffer.push(marker);
            self.buffer.push(marker);
        }
        self.pos += 2;
    }

    fn italic_delimiter(&mut self) {
        let active = self.style.italic;
        let after_boundary = match self.pos.checked_sub(1).map(|i| self.chars[i]) {
            None => true,
            Some(prev) => prev.is_whitespace() || prev == '(',
        };
        let opens = !active
            && after_boundary
            && self.peek(1).is_some_and(|c| !c.is_whitespace())
            && self.has_unescaped_ahead(self.pos + 1, &['*']);

        if active || opens {
            self.flush();
            self.style.italic = !active;
        } else {
            self.buffer.push('*');
        }
        self.pos += 1;
    }

    fn has_unescaped_ahead(&self, from: usize, pattern: &[char]) -> bool {
        (from..self.chars.len()).any(|i| {
            self.chars[i..].starts_with(pattern) && (i == 0 || self.chars[i - 1] != '\\')
        })
    }
}
