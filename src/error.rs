//! Error types.
//!
//! - `LoadError` is the typed failure of building an engine snapshot.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use std::path::PathBuf;

/// Why a sales record set could not be loaded.
///
/// Loads are all-or-nothing: a single bad row rejects the whole source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Sales data not found: '{}'", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::SourceNotFound { .. })
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let hint = if err.is_not_found() {
            " (run `sales generate` to create demo data)"
        } else {
            ""
        };
        AppError::new(2, format!("{err}{hint}"))
    }
}
