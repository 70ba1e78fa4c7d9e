use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Render error: {0}")]
    Render(#[from] core_document::RenderError),

    #[error("Unsupported content type: {mime_type}")]
    Unsupported { mime_type: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
