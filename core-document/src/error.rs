use thiserror::Error;

/// Errors that make a whole document unrenderable.
///
/// Problems with a single embedded image never surface here; the image is
/// skipped and logged.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Not a valid document container: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("Document part missing: {0}")]
    MissingPart(String),

    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Part {part} exceeds the {limit} byte limit")]
    PartTooLarge { part: String, limit: u64 },

    #[error("I/O error reading {part}: {source}")]
    Io {
        part: String,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn xml(part: &str, error: impl std::fmt::Display) -> Self {
        RenderError::Xml {
            part: part.to_string(),
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
