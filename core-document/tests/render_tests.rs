//! End-to-end rendering tests over `.docx` packages built in memory.

use core_document::{render, render_to_html, Block, RenderError, Span};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="Heading 3"/></w:style>
  <w:style w:type="paragraph" w:styleId="RecipeHeading"><w:name w:val="Heading"/></w:style>
</w:styles>"#;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// Test builder for minimal `.docx` packages
struct DocxBuilder {
    body: String,
    relationships: Vec<(String, String, bool)>,
    media: Vec<(String, Vec<u8>)>,
    with_styles: bool,
}

impl DocxBuilder {
    fn new() -> Self {
        Self {
            body: String::new(),
            relationships: Vec::new(),
            media: Vec::new(),
            with_styles: true,
        }
    }

    fn paragraph(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    fn image(mut self, rel_id: &str, part_name: &str, bytes: &[u8]) -> Self {
        self.body.push_str(&inline_image(rel_id));
        self.relationships
            .push((rel_id.to_string(), format!("media/{}", part_name), false));
        self.media
            .push((format!("word/media/{}", part_name), bytes.to_vec()));
        self
    }

    fn relationship(mut self, rel_id: &str, target: &str, external: bool) -> Self {
        self.relationships
            .push((rel_id.to_string(), target.to_string(), external));
        self
    }

    fn without_styles(mut self) -> Self {
        self.with_styles = false;
        self
    }

    fn build(self) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
            xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
<w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body
        );

        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
{}</Relationships>"#,
            self.relationships
                .iter()
                .map(|(id, target, external)| format!(
                    r#"  <Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"{}/>"#,
                    id,
                    target,
                    if *external { r#" TargetMode="External""# } else { "" }
                ))
                .collect::<Vec<_>>()
                .join("\n")
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        let mut add = |name: &str, data: &[u8]| {
            writer.start_file(name, options).unwrap();
            writer.write_all(data).unwrap();
        };

        add("[Content_Types].xml", CONTENT_TYPES.as_bytes());
        add("word/document.xml", document.as_bytes());
        add("word/_rels/document.xml.rels", rels.as_bytes());
        if self.with_styles {
            add("word/styles.xml", STYLES.as_bytes());
        }
        for (name, data) in &self.media {
            add(name, data);
        }

        writer.finish().unwrap().into_inner()
    }
}

/// Overwrite the uncompressed size the central directory declares for `part`.
fn declare_uncompressed_size(bytes: &mut [u8], part: &str, size: u32) {
    const CENTRAL_HEADER: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
    let name = part.as_bytes();

    let offset = (0..bytes.len().saturating_sub(46))
        .find(|&i| {
            bytes[i..i + 4] == CENTRAL_HEADER
                && u16::from_le_bytes([bytes[i + 28], bytes[i + 29]]) as usize == name.len()
                && bytes[i + 46..].starts_with(name)
        })
        .expect("central directory entry for part");

    bytes[offset + 24..offset + 28].copy_from_slice(&size.to_le_bytes());
}

fn inline_image(rel_id: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><wp:extent cx="100" cy="100"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        rel_id
    )
}

fn text_paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

fn styled_paragraph(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        style_id, text
    )
}

#[test]
fn test_paragraph_and_image_scenario() {
    let bytes = DocxBuilder::new()
        .paragraph(&text_paragraph("Mix flour and sugar."))
        .image("rId10", "image1.png", PNG_BYTES)
        .build();

    let doc = render(&bytes).unwrap();

    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(
        doc.blocks[0],
        Block::Paragraph {
            spans: vec![Span::plain("Mix flour and sugar.")]
        }
    );
    match doc.blocks.last() {
        Some(Block::Image {
            content_type,
            data_base64,
        }) => {
            assert_eq!(content_type, "image/png");
            assert!(!data_base64.is_empty());
        }
        other => panic!("expected trailing image, got {:?}", other),
    }
    assert_eq!(doc.images().count(), 1);
}

#[test]
fn test_bold_italic_nesting_round_trip() {
    let bytes = DocxBuilder::new()
        .paragraph(
            r#"<w:p><w:r><w:t xml:space="preserve">He said </w:t></w:r><w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>hello</w:t></w:r></w:p>"#,
        )
        .build();

    let first = render_to_html(&bytes).unwrap();
    let second = render_to_html(&bytes).unwrap();

    assert_eq!(first, "<p>He said <strong><em>hello</em></strong></p>\n");
    assert_eq!(first, second);
}

#[test]
fn test_heading_levels_from_styles() {
    let bytes = DocxBuilder::new()
        .paragraph(&styled_paragraph("Heading3", "Method"))
        .paragraph(&styled_paragraph("RecipeHeading", "Ingredients"))
        .paragraph(&styled_paragraph("Normal", "Two eggs"))
        .build();

    let doc = render(&bytes).unwrap();

    assert_eq!(
        doc.blocks,
        vec![
            Block::Heading {
                level: 3,
                text: "Method".into()
            },
            Block::Heading {
                level: 2,
                text: "Ingredients".into()
            },
            Block::Paragraph {
                spans: vec![Span::plain("Two eggs")]
            },
        ]
    );
}

#[test]
fn test_missing_styles_part_falls_back_to_style_id() {
    let bytes = DocxBuilder::new()
        .without_styles()
        .paragraph(&styled_paragraph("Heading1", "Title"))
        .build();

    let doc = render(&bytes).unwrap();
    assert_eq!(
        doc.blocks,
        vec![Block::Heading {
            level: 1,
            text: "Title".into()
        }]
    );
}

#[test]
fn test_images_appended_after_all_text() {
    let bytes = DocxBuilder::new()
        .paragraph(&text_paragraph("first"))
        .image("rId10", "a.png", PNG_BYTES)
        .paragraph(&text_paragraph("second"))
        .image("rId11", "b.gif", b"GIF89a")
        .build();

    let doc = render(&bytes).unwrap();
    let kinds: Vec<&str> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Paragraph { .. } => "text",
            Block::Heading { .. } => "heading",
            Block::Image { .. } => "image",
        })
        .collect();

    assert_eq!(kinds, vec!["text", "text", "image", "image"]);

    let types: Vec<_> = doc
        .images()
        .filter_map(|b| match b {
            Block::Image { content_type, .. } => Some(content_type.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(types, vec!["image/png", "image/gif"]);
}

#[test]
fn test_broken_images_are_skipped() {
    let bytes = DocxBuilder::new()
        .paragraph(&text_paragraph("kept"))
        // relationship points at a part that is not in the archive
        .relationship("rIdGone", "media/gone.png", false)
        .paragraph(&inline_image("rIdGone"))
        // linked, not embedded
        .relationship("rIdLink", "https://example.com/photo.png", true)
        .paragraph(&inline_image("rIdLink"))
        // no relationship at all
        .paragraph(&inline_image("rIdUnknown"))
        .image("rIdOk", "ok.png", PNG_BYTES)
        .build();

    let doc = render(&bytes).unwrap();

    assert_eq!(doc.images().count(), 1);
    assert!(doc.plain_text().starts_with("kept"));
}

#[test]
fn test_not_a_container_is_fatal() {
    let result = render(b"This is plain text, not a document");
    assert!(matches!(result, Err(RenderError::Container(_))));
}

#[test]
fn test_archive_without_document_part_is_fatal() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("hello.txt", FileOptions::default())
        .unwrap();
    writer.write_all(b"hi").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    assert!(matches!(render(&bytes), Err(RenderError::MissingPart(_))));
}

#[test]
fn test_malformed_document_xml_is_fatal() {
    let bytes = DocxBuilder::new()
        .paragraph("<w:p><w:r><w:t>unclosed</w:r></w:p>")
        .build();

    assert!(matches!(render(&bytes), Err(RenderError::Xml { .. })));
}

#[test]
fn test_forged_document_size_is_fatal_not_a_panic() {
    let mut bytes = DocxBuilder::new()
        .paragraph(&text_paragraph("Mix flour and sugar."))
        .build();
    assert!(render(&bytes).is_ok());

    declare_uncompressed_size(&mut bytes, "word/document.xml", 0xFFFF_FFF0);

    let result = std::panic::catch_unwind(|| render(&bytes));
    assert!(matches!(
        result,
        Ok(Err(RenderError::PartTooLarge { ref part, .. })) if part == "word/document.xml"
    ));
}

#[test]
fn test_forged_image_size_skips_only_that_image() {
    let mut bytes = DocxBuilder::new()
        .paragraph(&text_paragraph("kept"))
        .image("rId10", "huge.png", PNG_BYTES)
        .image("rId11", "fine.png", PNG_BYTES)
        .build();

    declare_uncompressed_size(&mut bytes, "word/media/huge.png", 0xFFFF_FFF0);

    let doc = render(&bytes).unwrap();
    assert_eq!(doc.images().count(), 1);
    assert!(doc.plain_text().starts_with("kept"));
}
