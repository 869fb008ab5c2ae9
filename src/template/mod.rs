// ABOUTME: Template engine module for kube-render
// ABOUTME: Provides the Handlebars engine, the custom function registry, and the helper library

pub mod engine;
pub mod error;
pub mod functions;
pub mod library;
pub mod value;

pub use engine::{template_name, TemplateEngine};
pub use error::{Result, TemplateError};
pub use functions::{FunctionEntry, FunctionRegistry, MAX_INCLUDE_DEPTH};
