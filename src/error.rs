//! Error types for the markdown-studio library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while producing the rendered view.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Highlighting error: {0}")]
    Highlight(String),
}

/// Errors raised by the attachment registry.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("File {0:?} has no readable content")]
    EmptyFile(String),
}

/// Errors raised while fetching the starter template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found at {0}")]
    NotFound(String),

    #[error("Template fetch failed: {0}")]
    Fetch(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Invalid config: {0}")]
    Parse(String),
}
