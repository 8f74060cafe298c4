//! User-defined function registry.
//!
//! - **[wrapper]** - adapts native callables of arity 0..3, N or variadic
//!   into one `(context, args) -> value` contract
//! - **[registry]** - case-insensitive `(name, arity)` resolution
//! - **[global]** - the process-wide registry and per-context forks
//! - **[builtins]** - functions installed at startup
//!
//! Lookup prefers an exact-arity variant, then a variadic variant whose
//! minimum arity is satisfied. A known name with no matching variant is an
//! arity mismatch, distinct from an unknown name.

pub mod builtins;
mod error;
pub mod global;
pub mod registry;
pub mod wrapper;

pub use error::{InvocationError, LookupError, RegistrationError};
pub use global::{
    GlobalRegistry, configure_global, fork_from_global, freeze_global, global, install_builtins, register_global,
};
pub use registry::{FunctionRegistry, normalize_name};
pub use wrapper::{Arity, UdfFn, Wrapper};
