// ABOUTME: Error types for template engine operations
// ABOUTME: Covers function failures, template parsing, and template execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("no value for '{key}' and no default given")]
    MissingValueNoDefault { key: String },

    #[error("cannot serialize value: {0}")]
    Serialization(String),

    #[error("template '{name}' not found (included from '{from}')")]
    TemplateNotFound { name: String, from: String },

    #[error("include of '{name}' exceeds maximum depth of {limit}")]
    IncludeDepthExceeded { name: String, limit: usize },

    #[error("{function}: {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },

    #[error("{function}: {message}")]
    HelperFailed {
        function: &'static str,
        message: String,
    },

    #[error("Template syntax error in '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("Template render error: {0}")]
    Execution(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TemplateError {
    pub(crate) fn invalid_argument(function: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function,
            message: message.into(),
        }
    }

    pub(crate) fn helper_failed(function: &'static str, message: impl Into<String>) -> Self {
        Self::HelperFailed {
            function,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
