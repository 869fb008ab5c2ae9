// ABOUTME: Error types for variable resolution
// ABOUTME: Reports malformed NAME=VALUE assignments from the environment or --set flags

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Malformed variable assignment '{0}'. Expected 'NAME=VALUE'")]
    MalformedVariableAssignment(String),
}

pub type Result<T> = std::result::Result<T, ValueError>;
