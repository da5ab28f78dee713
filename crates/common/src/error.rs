//! Error types shared across Coverforge crates.

use std::path::PathBuf;

/// Top-level error type for Coverforge operations.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Asset error: {message}")]
    Asset { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CoverError.
pub type CoverResult<T> = Result<T, CoverError>;

impl CoverError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn script(line: usize, msg: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_messages() {
        let err = CoverError::export("encoder refused input");
        assert_eq!(err.to_string(), "Export error: encoder refused input");

        let err = CoverError::script(3, "unknown step");
        assert_eq!(err.to_string(), "Script error on line 3: unknown step");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoverError = io.into();
        assert!(matches!(err, CoverError::Io(_)));
    }
}
