// ABOUTME: Main library module for kube-render
// ABOUTME: Exports variable resolution, the template engine, and the CLI driver

pub mod cli;
pub mod template;
pub mod values;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use template::{FunctionRegistry, TemplateEngine, TemplateError};
pub use values::{resolve_variables, ValueError, ValueResolver, VariableMap};

// Error handling
pub type Result<T> = anyhow::Result<T>;
