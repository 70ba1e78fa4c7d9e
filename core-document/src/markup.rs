//! HTML markup for rendered documents

use crate::model::{Block, RenderedDocument, Span};

impl RenderedDocument {
    /// HTML fragment for display.
    ///
    /// Bold wraps italic (`<strong><em>…</em></strong>`) so the same input
    /// always produces the same nesting.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for block in &self.blocks {
            write_block(&mut html, block);
            html.push('\n');
        }
        html
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{}>", level));
            push_escaped(out, text);
            out.push_str(&format!("</h{}>", level));
        }
        Block::Paragraph { spans } => {
            out.push_str("<p>");
            for span in spans {
                write_span(out, span);
            }
            out.push_str("</p>");
        }
        Block::Image { .. } => {
            if let Some(uri) = block.data_uri() {
                out.push_str("<img src=\"");
                push_escaped(out, &uri);
                out.push_str("\"/>");
            }
        }
    }
}

fn write_span(out: &mut String, span: &Span) {
    if span.bold {
        out.push_str("<strong>");
    }
    if span.italic {
        out.push_str("<em>");
    }
    push_escaped(out, &span.text);
    if span.italic {
        out.push_str("</em>");
    }
    if span.bold {
        out.push_str("</strong>");
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br/>"),
            _ => out.push(c),
        }
    }
}
