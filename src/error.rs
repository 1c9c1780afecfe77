use miette::Diagnostic;
use thiserror::Error;

/// Main error type for surfacelab operations
#[derive(Error, Diagnostic, Debug)]
pub enum LabError {
    #[error("IO error: {0}")]
    #[diagnostic(code(surfacelab::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(surfacelab::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(surfacelab::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(surfacelab::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Watch error: {message}")]
    #[diagnostic(code(surfacelab::watch))]
    Watch { message: String },
}

pub type Result<T> = std::result::Result<T, LabError>;
