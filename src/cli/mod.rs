//! CLI support for the `udf` binary
//!
//! Exposed from the library so the same operations can be driven from tests
//! or embedded in other tools.

mod call;
mod convert;
mod list;

pub use call::{CallOptions, execute_call};
pub use convert::{json_to_value, value_to_json};
pub use list::list_functions;

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Registration error: {0}")]
    Registration(#[from] crate::RegistrationError),

    #[error("{0}")]
    Call(#[from] crate::CallError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Arguments read from stdin were not a JSON array
    #[error("Expected a JSON array of arguments, got {0}")]
    NotAnArray(&'static str),
}
