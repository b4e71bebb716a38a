//! Block-level line scanner.
//!
//! Walks the line array once with a cursor. Each step tries the block rules in
//! priority order and consumes every line the matching rule owns. Directive
//! sections re-enter the compiler on their interior lines.

use crate::block::{Block, RichText};
use crate::code_fence::parse_code_fence;
use crate::directives::{DirectiveKind, DirectiveOpening, find_section_end, parse_opening_directive, split_columns};
use crate::error::ParseWarning;
use crate::inline::parse_inline;
use crate::list::{ListNestingTracker, indent_width, parse_list_marker};
use crate::parse::Compiler;
use crate::table::parse_table;

/// Title given to legacy `:::study-text` toggles.
const STUDY_TEXT_TITLE: &str = "study-text";

/// Callout title used when the body does not open with a paragraph.
const EMPTY_CALLOUT_TITLE: &str = " ";

pub(crate) struct BlockScanner<'c, 'l, 'a> {
    compiler: &'c mut Compiler,
    lines: &'l [&'a str],
    cursor: usize,
    out: Vec<Block>,
    lists: ListNestingTracker,
}

impl<'c, 'l, 'a> BlockScanner<'c, 'l, 'a> {
    pub(crate) fn new(compiler: &'c mut Compiler, lines: &'l [&'a str]) -> Self {
        Self {
            compiler,
            lines,
            cursor: 0,
            out: Vec::new(),
            lists: ListNestingTracker::new(),
        }
    }

    pub(crate) fn run(mut self) -> Vec<Block> {
        while self.cursor < self.lines.len() {
            self.step();
        }
        self.out
    }

    fn step(&mut self) {
        let line = self.lines[self.cursor];
        let trimmed = line.trim();

        match parse_opening_directive(line) {
            Some(opening) if opening.kind != DirectiveKind::Column => {
                self.lists.clear();
                self.directive(opening);
                return;
            }
            _ => {}
        }

        if let Some(fence) = parse_code_fence(self.lines, self.cursor) {
            if !fence.closed {
                self.compiler.warn(ParseWarning::UnclosedCodeFence {
                    language: fence.language.clone(),
                });
            }
            let block = Block::Code {
                content: fence.content,
                language: fence.language,
            };
            self.emit(block, fence.next);
            return;
        }

        if let Some((table, next)) = parse_table(self.lines, self.cursor) {
            self.emit(table, next);
            return;
        }

        let next = self.cursor + 1;

        if let Some(quoted) = trimmed.strip_prefix('>') {
            let quoted = quoted.strip_prefix(' ').unwrap_or(quoted);
            self.emit(Block::Quote { text: parse_inline(quoted) }, next);
            return;
        }

        if let Some(image) = parse_standalone_image(trimmed) {
            self.emit(image, next);
            return;
        }

        if let Some((depth, text)) = parse_heading(trimmed) {
            let heading = Block::Heading {
                depth,
                text: parse_inline(text),
                toggleable: false,
                children: Vec::new(),
            };
            self.emit(heading, next);
            return;
        }

        self.cursor = next;

        if let Some(marker) = parse_list_marker(line) {
            self.lists
                .push_item(&mut self.out, marker.indent, marker.kind, parse_inline(marker.text));
        } else if trimmed.is_empty() {
            self.lists.clear();
        } else {
            self.lists
                .push_continuation(&mut self.out, indent_width(line), parse_inline(trimmed));
        }
    }

    fn emit(&mut self, block: Block, next: usize) {
        self.lists.clear();
        self.out.push(block);
        self.cursor = next;
    }

    fn directive(&mut self, opening: DirectiveOpening<'_>) {
        let kind = opening.kind;
        if !kind.is_container() {
            self.cursor += 1;
            if let Some(block) = self.single_line_directive(opening) {
                self.out.push(block);
            }
            return;
        }

        let lines = self.lines;
        let section = find_section_end(lines, self.cursor);
        self.cursor = section.next;
        if !section.closed {
            self.compiler.warn(ParseWarning::UnclosedDirective {
                name: kind.name().to_string(),
            });
        }

        if requires_argument(kind) && opening.argument.is_empty() {
            self.compiler.warn(ParseWarning::MissingDirectiveArgument {
                name: kind.name().to_string(),
            });
            return;
        }

        let interior = &lines[section.interior];
        if kind == DirectiveKind::ColumnList {
            self.column_list(interior);
            return;
        }

        if let Some(children) = self.compiler.nested(kind, |compiler| compiler.compile(interior)) {
            self.out.push(container_block(opening, children));
        }
    }

    fn single_line_directive(&mut self, opening: DirectiveOpening<'_>) -> Option<Block> {
        let url = opening.argument.to_string();
        match opening.kind {
            DirectiveKind::Toc => Some(Block::TableOfContents),
            DirectiveKind::Audio | DirectiveKind::Video if url.is_empty() => {
                self.compiler.warn(ParseWarning::MissingDirectiveArgument {
                    name: opening.kind.name().to_string(),
                });
                None
            }
            DirectiveKind::Audio => Some(Block::Audio { url }),
            DirectiveKind::Video => Some(Block::Video { url }),
            _ => None,
        }
    }

    fn column_list(&mut self, interior: &[&str]) {
        let split = split_columns(interior);
        if split.columns.is_empty() {
            if let Some(blocks) = self
                .compiler
                .nested(DirectiveKind::ColumnList, |compiler| compiler.compile(interior))
            {
                self.out.extend(blocks);
            }
            return;
        }

        if split.ignored > 0 {
            self.compiler.warn(ParseWarning::IgnoredColumnListContent {
                lines: split.ignored,
            });
        }

        let columns = self.compiler.nested(DirectiveKind::ColumnList, |compiler| {
            split
                .columns
                .iter()
                .map(|column| compiler.compile(column))
                .collect::<Vec<_>>()
        });
        if let Some(columns) = columns {
            self.out.push(Block::ColumnList { columns });
        }
    }
}

fn requires_argument(kind: DirectiveKind) -> bool {
    matches!(kind, DirectiveKind::ToggleHeading | DirectiveKind::ToggleH(_))
}

fn non_empty(argument: &str) -> Option<String> {
    (!argument.is_empty()).then(|| argument.to_string())
}

/// Builds the block for a container directive from its compiled interior.
fn container_block(opening: DirectiveOpening<'_>, mut children: Vec<Block>) -> Block {
    match opening.kind {
        DirectiveKind::Callout => {
            let title = match children.first_mut() {
                Some(Block::Paragraph { text }) => {
                    let title = std::mem::take(text);
                    children.remove(0);
                    title
                }
                _ => vec![RichText::plain(EMPTY_CALLOUT_TITLE)],
            };
            Block::Callout {
                icon: non_empty(opening.argument),
                title,
                children,
            }
        }
        DirectiveKind::SyncedBlock => Block::SyncedBlock {
            sync_from_id: non_empty(opening.argument),
            children,
        },
        DirectiveKind::StudyText => Block::Toggle {
            title: vec![RichText::plain(STUDY_TEXT_TITLE)],
            children,
        },
        DirectiveKind::ToggleH(depth) => Block::Heading {
            depth,
            text: parse_inline(opening.argument),
            toggleable: true,
            children,
        },
        _ => Block::Toggle {
            title: parse_inline(opening.argument),
            children,
        },
    }
}

/// Recognizes `# `, `## ` and `### ` headings on a trimmed line.
fn parse_heading(trimmed: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(marker, depth)| trimmed.strip_prefix(marker).map(|text| (depth, text.trim())))
}

/// Recognizes a line consisting only of `![alt](url)`.
fn parse_standalone_image(trimmed: &str) -> Option<Block> {
    let inner = trimmed.strip_prefix("![")?.strip_suffix(')')?;
    let (alt, url) = inner.split_once("](")?;
    let url = url.trim();
    if url.is_empty() || url.contains(')') || alt.contains(']') {
        return None;
    }
    Some(Block::Image {
        url: url.to_string(),
        alt: non_empty(alt.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::plain_text;
    use crate::parse::{ParseOptions, md_to_blocks, md_to_blocks_with_options};

    fn paragraph(text: &str) -> Block {
        Block::paragraph(vec![RichText::plain(text)])
    }

    #[test]
    fn headings_by_depth() {
        let blocks = md_to_blocks("# One\n## Two\n### Three\n#### Four\n#NoSpace");
        let depths: Vec<_> = blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { depth, toggleable: false, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(blocks[3], paragraph("#### Four"));
        assert_eq!(blocks[4], paragraph("#NoSpace"));
    }

    #[test]
    fn quote_strips_marker_and_one_space() {
        let blocks = md_to_blocks(">  spaced\n>tight");
        assert_eq!(blocks[0], Block::Quote { text: vec![RichText::plain(" spaced")] });
        assert_eq!(blocks[1], Block::Quote { text: vec![RichText::plain("tight")] });
    }

    #[test]
    fn standalone_image() {
        let blocks = md_to_blocks("![Diagram](https://x.test/d.png)\n![](https://x.test/e.png)");
        assert_eq!(
            blocks[0],
            Block::Image {
                url: "https://x.test/d.png".to_string(),
                alt: Some("Diagram".to_string()),
            }
        );
        assert!(matches!(&blocks[1], Block::Image { alt: None, .. }));
    }

    #[test]
    fn image_with_trailing_text_is_paragraph() {
        let blocks = md_to_blocks("![a](u) caption");
        assert_eq!(blocks[0].kind(), "paragraph");
    }

    #[test]
    fn several_images_on_one_line_are_a_paragraph() {
        let blocks = md_to_blocks("![a](x.png) ![b](y.png)");
        let [Block::Paragraph { text }] = blocks.as_slice() else {
            panic!("expected one paragraph, got {blocks:?}");
        };
        let links: Vec<_> = text
            .iter()
            .filter_map(|run| run.link.as_ref().map(|link| link.url.as_str()))
            .collect();
        assert_eq!(links, vec!["x.png", "y.png"]);
    }

    #[test]
    fn image_followed_by_parens_is_a_paragraph() {
        let blocks = md_to_blocks("![a](b)(c)");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind(), "paragraph");
        assert_eq!(parse_standalone_image("![a](b)(c)"), None);
    }

    #[test]
    fn code_fence_reports_unclosed() {
        let output = md_to_blocks_with_options("```rust\nfn main() {}", &ParseOptions::lesson());
        assert_eq!(
            output.blocks,
            vec![Block::Code {
                content: "fn main() {}".to_string(),
                language: "rust".to_string(),
            }]
        );
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::UnclosedCodeFence { language: "rust".to_string() }]
        );
    }

    #[test]
    fn block_rules_clear_the_list_stack() {
        let blocks = md_to_blocks("- a\n# H\n  cont");
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].children().is_empty());
        assert_eq!(blocks[2], paragraph("cont"));
    }

    #[test]
    fn blank_line_clears_the_list_stack() {
        let blocks = md_to_blocks("- a\n\n  cont");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], paragraph("cont"));
    }

    #[test]
    fn numbered_item_continuation() {
        let blocks = md_to_blocks("1. step\n   detail");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind(), "numbered_item");
        assert_eq!(blocks[0].children(), &[paragraph("detail")]);
    }

    #[test]
    fn toc_and_media() {
        let blocks = md_to_blocks(":::toc\n:::audio https://x.test/a.mp3\n:::VIDEO https://x.test/v.mp4");
        assert_eq!(
            blocks,
            vec![
                Block::TableOfContents,
                Block::Audio { url: "https://x.test/a.mp3".to_string() },
                Block::Video { url: "https://x.test/v.mp4".to_string() },
            ]
        );
    }

    #[test]
    fn media_without_url_is_dropped() {
        let output = md_to_blocks_with_options(":::audio\nafter", &ParseOptions::lesson());
        assert_eq!(output.blocks, vec![paragraph("after")]);
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::MissingDirectiveArgument { name: "audio".to_string() }]
        );
    }

    #[test]
    fn callout_hoists_first_paragraph() {
        let blocks = md_to_blocks(":::callout 💡\n**Note** text\nBody\n:::");
        let Block::Callout { icon, title, children } = &blocks[0] else {
            panic!("expected callout, got {:?}", blocks[0]);
        };
        assert_eq!(icon.as_deref(), Some("💡"));
        assert_eq!(plain_text(title), "Note text");
        assert!(title[0].bold);
        assert_eq!(children, &vec![paragraph("Body")]);
    }

    #[test]
    fn callout_without_leading_paragraph_gets_blank_title() {
        let blocks = md_to_blocks(":::callout\n## Tip\nBody\n:::");
        let Block::Callout { icon, title, children } = &blocks[0] else {
            panic!("expected callout");
        };
        assert!(icon.is_none());
        assert_eq!(title, &vec![RichText::plain(" ")]);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn toggle_heading_and_toggleable_headings() {
        let blocks = md_to_blocks(":::toggle-heading Answers\nLine one\n:::\n:::toggle-h2 More\n- a\n:::");
        assert_eq!(
            blocks[0],
            Block::Toggle {
                title: vec![RichText::plain("Answers")],
                children: vec![paragraph("Line one")],
            }
        );
        let Block::Heading { depth, toggleable, children, .. } = &blocks[1] else {
            panic!("expected heading");
        };
        assert_eq!(*depth, 2);
        assert!(*toggleable);
        assert_eq!(children[0].kind(), "bullet_item");
    }

    #[test]
    fn study_text_is_a_toggle() {
        let blocks = md_to_blocks(":::study-text\nRead this\n:::");
        assert_eq!(
            blocks,
            vec![Block::Toggle {
                title: vec![RichText::plain("study-text")],
                children: vec![paragraph("Read this")],
            }]
        );
    }

    #[test]
    fn synced_block_keeps_optional_id() {
        let blocks = md_to_blocks(":::synced-block abc123\nShared\n:::\n:::synced-block\n:::");
        assert_eq!(
            blocks,
            vec![
                Block::SyncedBlock {
                    sync_from_id: Some("abc123".to_string()),
                    children: vec![paragraph("Shared")],
                },
                Block::SyncedBlock {
                    sync_from_id: None,
                    children: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn column_list_splits_columns() {
        let blocks = md_to_blocks(":::column-list\n:::column\nLeft\n:::\n:::column\nRight\n:::\n:::");
        assert_eq!(
            blocks,
            vec![Block::ColumnList {
                columns: vec![vec![paragraph("Left")], vec![paragraph("Right")]],
            }]
        );
    }

    #[test]
    fn column_list_without_columns_is_spliced() {
        let blocks = md_to_blocks("before\n:::column-list\nInside\n:::\nafter");
        assert_eq!(blocks, vec![paragraph("before"), paragraph("Inside"), paragraph("after")]);
    }

    #[test]
    fn column_list_reports_stray_lines() {
        let output = md_to_blocks_with_options(
            ":::column-list\nstray\n:::column\nA\n:::\n:::",
            &ParseOptions::lesson(),
        );
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::IgnoredColumnListContent { lines: 1 }]
        );
    }

    #[test]
    fn missing_label_drops_section_but_keeps_siblings() {
        let output = md_to_blocks_with_options(
            "before\n:::toggle-heading\nhidden\n:::\nafter",
            &ParseOptions::lesson(),
        );
        assert_eq!(output.blocks, vec![paragraph("before"), paragraph("after")]);
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::MissingDirectiveArgument {
                name: "toggle-heading".to_string(),
            }]
        );
    }

    #[test]
    fn unclosed_directive_consumes_rest() {
        let output = md_to_blocks_with_options(":::callout\ntext\nmore", &ParseOptions::lesson());
        let Block::Callout { title, children, .. } = &output.blocks[0] else {
            panic!("expected callout");
        };
        assert_eq!(plain_text(title), "text");
        assert_eq!(children, &vec![paragraph("more")]);
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::UnclosedDirective { name: "callout".to_string() }]
        );
    }

    #[test]
    fn nesting_limit_drops_deep_sections() {
        let options = ParseOptions {
            max_nesting_depth: 1,
            ..ParseOptions::lesson()
        };
        let output = md_to_blocks_with_options(
            ":::callout\n:::toggle-heading X\ninner\n:::\n:::",
            &options,
        );
        assert_eq!(
            output.blocks,
            vec![Block::Callout {
                icon: None,
                title: vec![RichText::plain(" ")],
                children: Vec::new(),
            }]
        );
        assert_eq!(
            output.diagnostics.warnings,
            vec![ParseWarning::NestingTooDeep {
                name: "toggle-heading".to_string(),
                limit: 1,
            }]
        );
    }

    #[test]
    fn unknown_directives_and_stray_closers_are_paragraphs() {
        let blocks = md_to_blocks(":::note hi\n:::\n:::column");
        assert_eq!(
            blocks,
            vec![paragraph(":::note hi"), paragraph(":::"), paragraph(":::column")]
        );
    }

    #[test]
    fn heading_parser_trims_text() {
        assert_eq!(parse_heading("##   spaced  "), Some((2, "spaced")));
        assert_eq!(parse_heading("#"), None);
    }
}
