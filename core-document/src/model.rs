//! Rendered document model

use serde::Serialize;

/// Default heading level when a heading style carries no trailing number.
pub const DEFAULT_HEADING_LEVEL: u8 = 2;

/// A run of text with its emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// One displayable unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { spans: Vec<Span> },
    /// An embedded picture, base64-encoded.
    Image {
        content_type: String,
        data_base64: String,
    },
}

impl Block {
    /// `data:` URI for image blocks.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Block::Image {
                content_type,
                data_base64,
            } => Some(format!("data:{};base64,{}", content_type, data_base64)),
            _ => None,
        }
    }
}

/// Result of rendering one document.
///
/// Text blocks appear in document order, followed by every image in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn images(&self) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Image { .. }))
    }

    /// Text of all headings and paragraphs, one line per block.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { text, .. } => Some(text.clone()),
                Block::Paragraph { spans } => {
                    Some(spans.iter().map(|s| s.text.as_str()).collect::<String>())
                }
                Block::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
