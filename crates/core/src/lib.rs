#![deny(missing_docs)]
//! Blockmark core: compiles lesson markdown into a typed block tree.

/// Block tree data model.
pub mod block;
/// Code fence detection and parsing.
pub mod code_fence;
/// `:::name` directive recognition and section matching.
pub mod directives;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Inline rich-text tokenizer.
pub mod inline;
/// Indentation-driven list nesting.
pub mod list;
/// Compiler entry points and options.
pub mod parse;
/// Block-level line scanner.
mod scanner;
/// Pipe table parsing.
pub mod table;

pub use block::{Block, Color, Link, ListKind, RichText, plain_text};
pub use error::{Error, ParseDiagnostics, ParseWarning};
pub use frontmatter::{FrontmatterError, extract_frontmatter};
pub use inline::parse_inline;
pub use parse::{
    Lesson, ParseOptions, ParseOutput, blocks_to_json, md_to_blocks, md_to_blocks_with_options,
    parse_lesson,
};

pub use code_fence::{CodeFence, DEFAULT_LANGUAGE, parse_code_fence};
pub use directives::{DirectiveKind, DirectiveOpening, is_directive_closer, parse_opening_directive};
