// ABOUTME: Template engine wrapping Handlebars with the kube-render function registry
// ABOUTME: Parses the root template, then renders it to a string or streams it to a writer

use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::error::{Result, TemplateError};
use super::functions::FunctionRegistry;
use crate::values::VariableMap;

/// A parsed template set plus the functions visible to it.
///
/// The function set is fixed at construction; only templates can be added afterwards.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("strict_mode", &self.handlebars.strict_mode())
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Create an engine whose functions close over `values`.
    pub fn new(values: VariableMap) -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.set_dev_mode(false);

        // Output is YAML, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        FunctionRegistry::new(values).install(&mut handlebars);

        Self { handlebars }
    }

    /// In strict mode a missing variable path is a render error instead of an empty value.
    pub fn set_strict_mode(&mut self, strict: bool) {
        self.handlebars.set_strict_mode(strict);
    }

    pub fn strict_mode(&self) -> bool {
        self.handlebars.strict_mode()
    }

    /// Parse `source` and register it under `name`.
    pub fn register_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, source)
            .map_err(|err| TemplateError::Parse {
                name: name.to_string(),
                source: err,
            })?;
        debug!("Registered template {} ({} bytes)", name, source.len());
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Render a registered template to a string.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(TemplateError::Execution)
    }

    /// Render a registered template straight into `writer`.
    ///
    /// Output is streamed, so a failing template may leave partial output behind.
    pub fn render_to_write<T, W>(&self, name: &str, data: &T, writer: W) -> Result<()>
    where
        T: Serialize,
        W: Write,
    {
        self.handlebars
            .render_to_write(name, data, writer)
            .map_err(TemplateError::Execution)
    }

    /// Render an unregistered template string.
    pub fn render_template<T: Serialize>(&self, source: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(source, data)
            .map_err(TemplateError::Execution)
    }

    /// Validate template syntax without registering it
    pub fn validate_template(&self, source: &str) -> Result<()> {
        handlebars::Template::compile(source)
            .map(|_| ())
            .map_err(|err| TemplateError::Parse {
                name: "<inline>".to_string(),
                source: err,
            })
    }
}

/// The name a template file is registered under: its base name.
pub fn template_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TemplateError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' does not name a file", path.display()),
            ))
        })
}
