//! Block tree produced by the compiler.
//!
//! Every variant maps onto one block-creation request of the downstream
//! document API. Consumers walk `children` (and `columns` for column lists)
//! recursively to build nested requests.

use serde::Serialize;

/// Text color attached to a rich-text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default text color.
    #[default]
    Default,
    /// Highlight color used for inline code.
    Red,
}

/// Color every inline code run carries.
pub const CODE_COLOR: Color = Color::Red;

/// Link target attached to a rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Destination URL, verbatim from the source.
    pub url: String,
}

/// A span of text with independent style annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichText {
    /// Visible text of the run.
    pub text: String,
    /// Bold annotation.
    pub bold: bool,
    /// Italic annotation.
    pub italic: bool,
    /// Strikethrough annotation.
    pub strikethrough: bool,
    /// Inline code annotation. Never combined with the other styles.
    pub code: bool,
    /// Text color; [`CODE_COLOR`] for code runs.
    pub color: Color,
    /// Optional link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl RichText {
    /// Creates an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            strikethrough: false,
            code: false,
            color: Color::Default,
            link: None,
        }
    }

    /// Creates an inline code run.
    pub fn code(text: impl Into<String>) -> Self {
        Self {
            code: true,
            color: CODE_COLOR,
            ..Self::plain(text)
        }
    }

    /// Returns the run with a link attached.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(Link { url: url.into() });
        self
    }
}

/// Concatenates the visible text of a run sequence.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// List flavor of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-` or `*` marker.
    Bullet,
    /// `1.` style marker.
    Numbered,
}

/// A structural content unit of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Plain text paragraph.
    Paragraph {
        /// Paragraph content.
        text: Vec<RichText>,
    },
    /// Heading at depth 1-3, optionally collapsible.
    Heading {
        /// Heading depth (1-3).
        depth: u8,
        /// Heading content.
        text: Vec<RichText>,
        /// Whether the heading folds its children.
        toggleable: bool,
        /// Nested blocks (toggleable headings only).
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    /// Bulleted list item.
    BulletItem {
        /// Item content.
        text: Vec<RichText>,
        /// Nested items and continuation paragraphs.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    /// Numbered list item.
    NumberedItem {
        /// Item content.
        text: Vec<RichText>,
        /// Nested items and continuation paragraphs.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    /// Block quotation.
    Quote {
        /// Quoted content.
        text: Vec<RichText>,
    },
    /// Fenced code block.
    Code {
        /// Verbatim code, lines joined with `\n`.
        content: String,
        /// Language hint (`"plain text"` when absent).
        language: String,
    },
    /// Standalone image.
    Image {
        /// Image source URL.
        url: String,
        /// Alt text, when non-empty.
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// Pipe table.
    Table {
        /// Cell count of the first row.
        width: usize,
        /// Whether the first row is a header row.
        has_header: bool,
        /// Rows of cells; each cell is a run sequence.
        rows: Vec<Vec<Vec<RichText>>>,
    },
    /// Callout box with an optional emoji icon.
    Callout {
        /// Emoji given on the opening line.
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        /// Callout headline.
        title: Vec<RichText>,
        /// Blocks rendered inside the callout.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    /// Side-by-side columns.
    ColumnList {
        /// One block list per column.
        columns: Vec<Vec<Block>>,
    },
    /// Table of contents marker.
    TableOfContents,
    /// Embedded audio.
    Audio {
        /// Audio source URL.
        url: String,
    },
    /// Embedded video.
    Video {
        /// Video source URL.
        url: String,
    },
    /// Collapsible toggle.
    Toggle {
        /// Toggle label.
        title: Vec<RichText>,
        /// Folded content.
        children: Vec<Block>,
    },
    /// Synced block, either an original or a reference to one.
    SyncedBlock {
        /// Identifier of the original block this one mirrors.
        #[serde(skip_serializing_if = "Option::is_none")]
        sync_from_id: Option<String>,
        /// Synced content.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
}

impl Block {
    /// Creates a paragraph from run content.
    pub fn paragraph(text: Vec<RichText>) -> Self {
        Block::Paragraph { text }
    }

    /// Creates a childless list item of the given kind.
    pub fn list_item(kind: ListKind, text: Vec<RichText>) -> Self {
        match kind {
            ListKind::Bullet => Block::BulletItem {
                text,
                children: Vec::new(),
            },
            ListKind::Numbered => Block::NumberedItem {
                text,
                children: Vec::new(),
            },
        }
    }

    /// Serialized tag name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading { .. } => "heading",
            Block::BulletItem { .. } => "bullet_item",
            Block::NumberedItem { .. } => "numbered_item",
            Block::Quote { .. } => "quote",
            Block::Code { .. } => "code",
            Block::Image { .. } => "image",
            Block::Table { .. } => "table",
            Block::Callout { .. } => "callout",
            Block::ColumnList { .. } => "column_list",
            Block::TableOfContents => "table_of_contents",
            Block::Audio { .. } => "audio",
            Block::Video { .. } => "video",
            Block::Toggle { .. } => "toggle",
            Block::SyncedBlock { .. } => "synced_block",
        }
    }

    /// Nested blocks of container variants; empty for leaves.
    ///
    /// Column lists expose no direct children, see [`Block::ColumnList`].
    pub fn children(&self) -> &[Block] {
        match self {
            Block::Heading { children, .. }
            | Block::BulletItem { children, .. }
            | Block::NumberedItem { children, .. }
            | Block::Callout { children, .. }
            | Block::Toggle { children, .. }
            | Block::SyncedBlock { children, .. } => children,
            Block::Paragraph { .. }
            | Block::Quote { .. }
            | Block::Code { .. }
            | Block::Image { .. }
            | Block::Table { .. }
            | Block::ColumnList { .. }
            | Block::TableOfContents
            | Block::Audio { .. }
            | Block::Video { .. } => &[],
        }
    }

    /// Mutable access to the child list of container variants.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Heading { children, .. }
            | Block::BulletItem { children, .. }
            | Block::NumberedItem { children, .. }
            | Block::Callout { children, .. }
            | Block::Toggle { children, .. }
            | Block::SyncedBlock { children, .. } => Some(children),
            Block::Paragraph { .. }
            | Block::Quote { .. }
            | Block::Code { .. }
            | Block::Image { .. }
            | Block::Table { .. }
            | Block::ColumnList { .. }
            | Block::TableOfContents
            | Block::Audio { .. }
            | Block::Video { .. } => None,
        }
    }

    /// Visible text of the block's own label, without descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { text }
            | Block::Quote { text }
            | Block::Heading { text, .. }
            | Block::BulletItem { text, .. }
            | Block::NumberedItem { text, .. } => plain_text(text),
            Block::Callout { title, .. } | Block::Toggle { title, .. } => plain_text(title),
            Block::Code { content, .. } => content.clone(),
            Block::Image { alt, .. } => alt.clone().unwrap_or_default(),
            Block::Table { rows, .. } => rows
                .iter()
                .map(|row| row.iter().map(|cell| plain_text(cell)).collect::<Vec<_>>().join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Audio { url } | Block::Video { url } => url.clone(),
            Block::ColumnList { .. } | Block::TableOfContents | Block::SyncedBlock { .. } => {
                String::new()
            }
        }
    }

    /// Number of blocks in this subtree, the block itself included.
    pub fn count(&self) -> usize {
        let nested: usize = match self {
            Block::ColumnList { columns } => columns.iter().flatten().map(Block::count).sum(),
            _ => self.children().iter().map(Block::count).sum(),
        };
        1 + nested
    }
}
