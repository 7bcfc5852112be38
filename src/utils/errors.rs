use std::path::PathBuf;
use thiserror::Error;

/// Error location attached to compile failures
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            file_path: None,
        }
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }
}

#[derive(Error, Debug)]
pub enum SassModulesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot resolve import '{specifier}' from {importer}")]
    Unresolved { specifier: String, importer: PathBuf },

    #[error("Compile error in {id}: {message}")]
    Compile {
        id: String,
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("CSS processing error: {0}")]
    Processor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{0}")]
    Other(String),
}

impl SassModulesError {
    pub fn unresolved(specifier: &str, importer: impl Into<PathBuf>) -> Self {
        Self::Unresolved {
            specifier: specifier.to_string(),
            importer: importer.into(),
        }
    }

    pub fn compile(id: &str, message: String) -> Self {
        Self::Compile {
            id: id.to_string(),
            message,
            context: None,
        }
    }

    pub fn compile_with_context(id: &str, message: String, context: ErrorContext) -> Self {
        Self::Compile {
            id: id.to_string(),
            message,
            context: Some(context),
        }
    }

    pub fn config(message: String) -> Self {
        Self::Config(message)
    }

    /// Format error with enhanced context display
    pub fn format_detailed(&self) -> String {
        match self {
            SassModulesError::Compile {
                id,
                message,
                context,
            } => {
                let mut output = format!("Compile Error in {}:\n{}", id, message);

                if let Some(ctx) = context {
                    if let Some(ref file_path) = ctx.file_path {
                        output.push_str(&format!("\n📁 File: {}", file_path.display()));
                    }
                }

                output
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SassModulesError>;

impl From<serde_json::Error> for SassModulesError {
    fn from(err: serde_json::Error) -> Self {
        SassModulesError::Config(err.to_string())
    }
}
