//! # Document Rendering
//!
//! Converts a word-processing document (`.docx`) into a sequence of display
//! blocks and from there into HTML markup.
//!
//! ## Overview
//!
//! - Paragraphs become headings when their style name contains "heading";
//!   the level is the style's trailing number, 2 when there is none.
//! - Other paragraphs keep their runs with bold and italic flags.
//! - Inline pictures are base64-encoded and appended after all text, in
//!   document order.
//!
//! Rendering is pure: no I/O, no shared state.
//!
//! ## Errors
//!
//! A container or XML failure fails the whole document with
//! [`RenderError`]. A picture that cannot be extracted is skipped.
//!
//! ## Usage
//!
//! ```ignore
//! let rendered = core_document::render(&bytes)?;
//! let html = rendered.to_html();
//! ```

pub mod error;
mod markup;
pub mod model;
pub mod package;
pub mod parser;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

pub use error::{RenderError, Result};
pub use model::{Block, RenderedDocument, Span, DEFAULT_HEADING_LEVEL};

use package::{
    parse_relationships, parse_style_names, resolve_target, ContentTypes, DocxPackage,
    CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, STYLES_PART,
};

/// Render a `.docx` document.
///
/// # Errors
///
/// Returns an error when the bytes are not a ZIP container, the main
/// document part is missing, or a required part is malformed XML.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn render(bytes: &[u8]) -> Result<RenderedDocument> {
    let mut package = DocxPackage::open(bytes)?;

    let style_names = match package.read_xml(STYLES_PART)? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };

    let document_xml = package
        .read_xml(DOCUMENT_PART)?
        .ok_or_else(|| RenderError::MissingPart(DOCUMENT_PART.to_string()))?;
    let body = parser::parse_body(&document_xml, &style_names)?;

    let mut blocks = body.blocks;
    if !body.image_relationships.is_empty() {
        blocks.extend(extract_images(&mut package, &body.image_relationships));
    }

    debug!(blocks = blocks.len(), "Rendered document");
    Ok(RenderedDocument { blocks })
}

/// Render straight to HTML markup.
pub fn render_to_html(bytes: &[u8]) -> Result<String> {
    render(bytes).map(|doc| doc.to_html())
}

fn extract_images(package: &mut DocxPackage<'_>, relationship_ids: &[String]) -> Vec<Block> {
    let relationships = match package
        .read_xml(DOCUMENT_RELS_PART)
        .and_then(|xml| xml.map(|xml| parse_relationships(&xml)).transpose())
    {
        Ok(relationships) => relationships.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Relationships unreadable, skipping all images");
            return Vec::new();
        }
    };

    let content_types = match package
        .read_xml(CONTENT_TYPES_PART)
        .and_then(|xml| xml.map(|xml| ContentTypes::parse(&xml)).transpose())
    {
        Ok(types) => types.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Content types unreadable, guessing from extensions");
            ContentTypes::default()
        }
    };

    let mut images = Vec::with_capacity(relationship_ids.len());

    for rel_id in relationship_ids {
        let Some(relationship) = relationships.get(rel_id) else {
            warn!(rel_id = %rel_id, "Image relationship missing, skipping");
            continue;
        };

        if relationship.external {
            warn!(rel_id = %rel_id, "Linked image is not embedded, skipping");
            continue;
        }

        let part = resolve_target(&relationship.target);
        let data = match package.read_part(&part) {
            Ok(Some(data)) if !data.is_empty() => data,
            Ok(_) => {
                warn!(part = %part, "Image part missing or empty, skipping");
                continue;
            }
            Err(e) => {
                warn!(part = %part, error = %e, "Image part unreadable, skipping");
                continue;
            }
        };

        let content_type = content_types
            .for_part(&part)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        images.push(Block::Image {
            content_type,
            data_base64: STANDARD.encode(&data),
        });
    }

    images
}
