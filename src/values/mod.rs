// ABOUTME: Variable resolution module for kube-render
// ABOUTME: Merges process environment and --set overrides into a single variable map

pub mod error;
pub mod resolver;

pub use error::{Result, ValueError};
pub use resolver::{parse_assignment, resolve_variables, ValueResolver, VariableMap};
