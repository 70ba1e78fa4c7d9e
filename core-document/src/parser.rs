//! WordprocessingML body parser
//!
//! Streams `word/document.xml` and collects paragraphs, headings and the
//! relationship ids of inline pictures, all in document order.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use crate::error::{RenderError, Result};
use crate::model::{Block, Span, DEFAULT_HEADING_LEVEL};
use crate::package::{attributes, DOCUMENT_PART};

/// Text blocks plus the relationship ids of inline images.
#[derive(Debug, Default)]
pub struct ParsedBody {
    pub blocks: Vec<Block>,
    pub image_relationships: Vec<String>,
}

#[derive(Default)]
struct ParagraphState {
    style_id: Option<String>,
    spans: Vec<Span>,
    holds_image: bool,
}

#[derive(Default)]
struct RunState {
    text: String,
    bold: bool,
    italic: bool,
}

#[derive(Default)]
struct BodyParser<'s> {
    style_names: Option<&'s HashMap<String, String>>,
    out: ParsedBody,
    paragraph: Option<ParagraphState>,
    run: Option<RunState>,
    /// Nesting of `w:p`; text boxes put paragraphs inside paragraphs.
    paragraph_depth: usize,
    /// Nesting of drawing containers whose text is not body text.
    drawing_depth: usize,
    fallback_depth: usize,
    /// Nesting of `w:rPrChange` / `w:pPrChange`, which hold the properties
    /// from before a tracked change.
    revision_depth: usize,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_text: bool,
    in_inline: bool,
}

/// Parse the main document part.
///
/// `style_names` maps style ids to display names; ids without an entry are
/// used as their own name.
pub fn parse_body(xml: &str, style_names: &HashMap<String, String>) -> Result<ParsedBody> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut parser = BodyParser {
        style_names: Some(style_names),
        ..Default::default()
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.start(e, false)?,
            Ok(Event::Empty(ref e)) => parser.start(e, true)?,
            Ok(Event::End(ref e)) => parser.end(e.local_name().as_ref()),
            Ok(Event::Text(ref e)) => {
                if parser.in_text && parser.drawing_depth == 0 {
                    if let Some(run) = parser.run.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| RenderError::xml(DOCUMENT_PART, err))?;
                        run.text.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RenderError::Xml {
                    part: DOCUMENT_PART.to_string(),
                    message: format!("at position {}: {}", reader.buffer_position(), e),
                })
            }
            _ => {}
        }
    }

    Ok(parser.out)
}

impl<'s> BodyParser<'s> {
    fn in_body_paragraph(&self) -> bool {
        self.paragraph_depth == 1 && self.drawing_depth == 0 && self.paragraph.is_some()
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        match e.local_name().as_ref() {
            b"p" => {
                if empty {
                    if self.paragraph_depth == 0 && self.drawing_depth == 0 {
                        self.out.blocks.push(Block::Paragraph { spans: Vec::new() });
                    }
                } else {
                    self.paragraph_depth += 1;
                    if self.paragraph_depth == 1 && self.drawing_depth == 0 {
                        self.paragraph = Some(ParagraphState::default());
                    }
                }
            }
            b"rPrChange" | b"pPrChange" if !empty => self.revision_depth += 1,
            _ if self.revision_depth > 0 => {}
            b"pPr" if !empty => self.in_paragraph_props = true,
            b"pStyle" if self.in_paragraph_props && self.in_body_paragraph() => {
                let style_id = attributes(e, DOCUMENT_PART)?.remove("val");
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = style_id;
                }
            }
            b"r" if !empty && self.in_body_paragraph() => {
                self.run = Some(RunState::default());
            }
            b"rPr" if !empty => {
                self.in_run_props =
                    self.run.is_some() && !self.in_paragraph_props && self.drawing_depth == 0;
            }
            b"b" if self.in_run_props => {
                let on = toggle_on(e)?;
                if let Some(run) = self.run.as_mut() {
                    run.bold = on;
                }
            }
            b"i" if self.in_run_props => {
                let on = toggle_on(e)?;
                if let Some(run) = self.run.as_mut() {
                    run.italic = on;
                }
            }
            b"t" if !empty && self.run.is_some() => self.in_text = true,
            b"tab" if self.accepts_run_content() => self.push_run_text('\t'),
            b"br" | b"cr" if self.accepts_run_content() => self.push_run_text('\n'),
            b"drawing" | b"pict" | b"object" if !empty => self.drawing_depth += 1,
            b"Fallback" if !empty => self.fallback_depth += 1,
            b"inline" if !empty => self.in_inline = true,
            b"blip" if self.in_inline && self.fallback_depth == 0 => {
                if let Some(embed) = attributes(e, DOCUMENT_PART)?.remove("embed") {
                    self.out.image_relationships.push(embed);
                    if let Some(paragraph) = self.paragraph.as_mut() {
                        paragraph.holds_image = true;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" => {
                if self.paragraph_depth == 1 {
                    if let Some(paragraph) = self.paragraph.take() {
                        if let Some(block) = self.finish_paragraph(paragraph) {
                            self.out.blocks.push(block);
                        }
                    }
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"rPrChange" | b"pPrChange" => {
                self.revision_depth = self.revision_depth.saturating_sub(1)
            }
            _ if self.revision_depth > 0 => {}
            b"pPr" => self.in_paragraph_props = false,
            b"r" if self.drawing_depth == 0 => {
                if let Some(run) = self.run.take() {
                    if !run.text.is_empty() {
                        if let Some(paragraph) = self.paragraph.as_mut() {
                            paragraph.spans.push(Span {
                                text: run.text,
                                bold: run.bold,
                                italic: run.italic,
                            });
                        }
                    }
                }
            }
            b"rPr" => self.in_run_props = false,
            b"t" => self.in_text = false,
            b"drawing" | b"pict" | b"object" => {
                self.drawing_depth = self.drawing_depth.saturating_sub(1)
            }
            b"Fallback" => self.fallback_depth = self.fallback_depth.saturating_sub(1),
            b"inline" => self.in_inline = false,
            _ => {}
        }
    }

    fn accepts_run_content(&self) -> bool {
        self.run.is_some() && !self.in_run_props && self.drawing_depth == 0
    }

    fn push_run_text(&mut self, c: char) {
        if let Some(run) = self.run.as_mut() {
            run.text.push(c);
        }
    }

    /// `None` for a paragraph that only carries a picture; the picture is
    /// emitted with the images instead.
    fn finish_paragraph(&self, paragraph: ParagraphState) -> Option<Block> {
        if paragraph.holds_image && paragraph.spans.is_empty() {
            return None;
        }

        let style_name = paragraph.style_id.as_ref().map(|id| {
            self.style_names
                .and_then(|names| names.get(id))
                .unwrap_or(id)
                .as_str()
        });

        Some(match style_name.and_then(heading_level) {
            Some(level) => Block::Heading {
                level,
                text: paragraph.spans.into_iter().map(|s| s.text).collect(),
            },
            None => Block::Paragraph {
                spans: paragraph.spans,
            },
        })
    }
}

/// Heading level for a style name, `None` when it is not a heading style.
///
/// Any name containing "heading" (case-insensitive) is a heading; the level
/// is its trailing number, clamped to 1..=6, or the default when absent.
pub fn heading_level(style_name: &str) -> Option<u8> {
    if !style_name.to_lowercase().contains("heading") {
        return None;
    }

    let trimmed = style_name.trim_end();
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    let level = digits_start
        .and_then(|start| trimmed[start..].parse::<u32>().ok())
        .map(|n| n.clamp(1, 6) as u8)
        .unwrap_or(DEFAULT_HEADING_LEVEL);

    Some(level)
}

/// Whether an on/off property such as `w:b` is switched on.
fn toggle_on(e: &BytesStart<'_>) -> Result<bool> {
    Ok(match attributes(e, DOCUMENT_PART)?.get("val") {
        Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "off"),
        None => true,
    })
}
