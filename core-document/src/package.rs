//! Office Open XML package access
//!
//! A `.docx` file is a ZIP archive of XML parts. This module opens the
//! archive and reads the parts the renderer needs: the main document, its
//! relationships, the style table and the content-type map.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{RenderError, Result};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Largest size a single part may inflate to.
pub const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// An opened `.docx` container.
pub struct DocxPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> DocxPackage<'a> {
    /// Open a package from raw bytes.
    ///
    /// # Errors
    ///
    /// [`RenderError::Container`] when the bytes are not a ZIP archive,
    /// [`RenderError::MissingPart`] when there is no main document part.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        let package = Self { archive };

        if !package.has_part(DOCUMENT_PART) {
            return Err(RenderError::MissingPart(DOCUMENT_PART.to_string()));
        }

        Ok(package)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Raw bytes of a part, `None` when absent.
    ///
    /// # Errors
    ///
    /// [`RenderError::PartTooLarge`] when the part declares or inflates to
    /// more than [`MAX_PART_BYTES`].
    pub fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // The declared size comes from the archive and may be forged
        if file.size() > MAX_PART_BYTES {
            return Err(too_large(name, MAX_PART_BYTES));
        }

        read_capped(file, name, MAX_PART_BYTES).map(Some)
    }

    /// A part decoded as UTF-8 XML text, `None` when absent.
    pub fn read_xml(&mut self, name: &str) -> Result<Option<String>> {
        match self.read_part(name)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| RenderError::xml(name, e)),
            None => Ok(None),
        }
    }
}

/// Read at most `limit` bytes, failing when the reader holds more.
fn read_capped<R: Read>(reader: R, part: &str, limit: u64) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|source| RenderError::Io {
            part: part.to_string(),
            source,
        })?;

    if buffer.len() as u64 > limit {
        return Err(too_large(part, limit));
    }
    Ok(buffer)
}

fn too_large(part: &str, limit: u64) -> RenderError {
    RenderError::PartTooLarge {
        part: part.to_string(),
        limit,
    }
}

/// A relationship from the main document to another part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub target: String,
    pub external: bool,
}

/// `Id` → relationship, from `word/_rels/document.xml.rels`.
pub fn parse_relationships(xml: &str) -> Result<HashMap<String, Relationship>> {
    let mut reader = Reader::from_str(xml);
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let attrs = attributes(e, DOCUMENT_RELS_PART)?;
                if let (Some(id), Some(target)) = (attrs.get("Id"), attrs.get("Target")) {
                    relationships.insert(
                        id.clone(),
                        Relationship {
                            target: target.clone(),
                            external: attrs
                                .get("TargetMode")
                                .is_some_and(|m| m.eq_ignore_ascii_case("external")),
                        },
                    );
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(RenderError::xml(DOCUMENT_RELS_PART, e)),
            _ => {}
        }
    }

    Ok(relationships)
}

/// `styleId` → display name, from `word/styles.xml`.
pub fn parse_style_names(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_style: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current_style = attributes(e, STYLES_PART)?.remove("styleId");
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"name" =>
            {
                if let Some(style_id) = current_style.as_ref() {
                    if let Some(name) = attributes(e, STYLES_PART)?.remove("val") {
                        names.insert(style_id.clone(), name);
                    }
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => {
                current_style = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(RenderError::xml(STYLES_PART, e)),
            _ => {}
        }
    }

    Ok(names)
}

/// Content-type map from `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut types = ContentTypes::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            let mut attrs = attributes(e, CONTENT_TYPES_PART)?;
                            if let (Some(ext), Some(ct)) =
                                (attrs.remove("Extension"), attrs.remove("ContentType"))
                            {
                                types.defaults.insert(ext.to_ascii_lowercase(), ct);
                            }
                        }
                        b"Override" => {
                            let mut attrs = attributes(e, CONTENT_TYPES_PART)?;
                            if let (Some(part), Some(ct)) =
                                (attrs.remove("PartName"), attrs.remove("ContentType"))
                            {
                                types
                                    .overrides
                                    .insert(part.trim_start_matches('/').to_string(), ct);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(RenderError::xml(CONTENT_TYPES_PART, e)),
                _ => {}
            }
        }

        Ok(types)
    }

    /// Content type of a part: override first, then extension default,
    /// then a guess from the extension.
    pub fn for_part(&self, part: &str) -> Option<String> {
        if let Some(ct) = self.overrides.get(part) {
            return Some(ct.clone());
        }

        let ext = part.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults
            .get(&ext)
            .cloned()
            .or_else(|| guess_image_type(&ext).map(str::to_string))
    }
}

fn guess_image_type(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "emf" => Some("image/x-emf"),
        "wmf" => Some("image/x-wmf"),
        _ => None,
    }
}

/// Resolve a relationship target against the `word/` folder.
pub fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Attributes of an element keyed by local name, values unescaped.
pub(crate) fn attributes(e: &BytesStart<'_>, part: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| RenderError::xml(part, err))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| RenderError::xml(part, err))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}
