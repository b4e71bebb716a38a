//! Compiler entry points, options and the recursion context.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::block::Block;
use crate::directives::DirectiveKind;
use crate::error::{Error, ParseDiagnostics, ParseWarning};
use crate::frontmatter::{extract_frontmatter, strip_bom, strip_frontmatter_lines};
use crate::scanner::BlockScanner;

/// Compiler options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest directive nesting compiled; deeper sections are dropped.
    pub max_nesting_depth: usize,
    /// Remove a leading `---` frontmatter block before scanning.
    pub strip_frontmatter: bool,
}

impl ParseOptions {
    /// Default nesting limit.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

    /// Defaults for lesson documents.
    pub const fn lesson() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
            strip_frontmatter: true,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::lesson()
    }
}

/// Blocks together with the warnings recorded while producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Degradations recorded during the compile.
    pub diagnostics: ParseDiagnostics,
}

/// A compiled lesson: frontmatter metadata plus its block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    /// Frontmatter mapping as JSON (`{}` when absent or invalid).
    pub frontmatter: JsonValue,
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Degradations recorded during the compile, frontmatter included.
    pub diagnostics: ParseDiagnostics,
}

/// Compiles lesson markdown into a block tree with default options.
///
/// Never fails; malformed constructs degrade to plain content.
pub fn md_to_blocks(markdown: &str) -> Vec<Block> {
    md_to_blocks_with_options(markdown, &ParseOptions::lesson()).blocks
}

/// Compiles lesson markdown and reports the degradations it hit.
pub fn md_to_blocks_with_options(markdown: &str, options: &ParseOptions) -> ParseOutput {
    let text = normalize(markdown);
    let lines: Vec<&str> = text.split('\n').collect();

    let mut compiler = Compiler::new(*options);
    let blocks = compiler.compile(&lines);
    ParseOutput {
        blocks,
        diagnostics: compiler.diagnostics,
    }
}

/// Compiles a lesson and parses its YAML frontmatter.
///
/// Invalid frontmatter is reported as [`ParseWarning::InvalidFrontmatter`]
/// and yields an empty mapping. `strip_frontmatter` only affects the block
/// pass.
pub fn parse_lesson(markdown: &str, options: &ParseOptions) -> Lesson {
    let text = normalize(markdown);
    let mut diagnostics = ParseDiagnostics::new();

    let frontmatter = match extract_frontmatter(&text) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.add_warning(ParseWarning::InvalidFrontmatter {
                message: err.to_string(),
            });
            JsonValue::Object(Default::default())
        }
    };

    let output = md_to_blocks_with_options(&text, options);
    diagnostics.warnings.extend(output.diagnostics);

    Lesson {
        frontmatter,
        blocks: output.blocks,
        diagnostics,
    }
}

/// Serializes a block tree to the JSON handed to API clients.
pub fn blocks_to_json(blocks: &[Block]) -> Result<String, Error> {
    Ok(serde_json::to_string(blocks)?)
}

/// Strips a BOM and rewrites `\r\n` and lone `\r` line endings to `\n`.
fn normalize(markdown: &str) -> Cow<'_, str> {
    let text = strip_bom(markdown);
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// State shared by one compile and every nested directive it enters.
pub(crate) struct Compiler {
    options: ParseOptions,
    diagnostics: ParseDiagnostics,
    depth: usize,
}

impl Compiler {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            diagnostics: ParseDiagnostics::new(),
            depth: 0,
        }
    }

    /// Scans a line range into blocks.
    pub(crate) fn compile(&mut self, lines: &[&str]) -> Vec<Block> {
        let lines = if self.options.strip_frontmatter {
            strip_frontmatter_lines(lines)
        } else {
            lines
        };
        BlockScanner::new(self, lines).run()
    }

    /// Runs `body` one directive level deeper, or drops the section with a
    /// warning once the nesting limit is reached.
    pub(crate) fn nested<T>(
        &mut self,
        kind: DirectiveKind,
        body: impl FnOnce(&mut Self) -> T,
    ) -> Option<T> {
        if self.depth >= self.options.max_nesting_depth {
            self.warn(ParseWarning::NestingTooDeep {
                name: kind.name().to_string(),
                limit: self.options.max_nesting_depth,
            });
            return None;
        }

        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        Some(result)
    }

    pub(crate) fn warn(&mut self, warning: ParseWarning) {
        self.diagnostics.add_warning(warning);
    }
}
