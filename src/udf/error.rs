use super::Arity;

/// Errors returned when adding a function to a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A variant with the same name and arity contract is already present.
    #[error("function `{name}` is already registered with arity {arity}")]
    Conflict { name: String, arity: Arity },

    /// The global registry no longer accepts writes.
    #[error("cannot register `{name}`: the global registry is frozen")]
    Frozen { name: String },

    /// The global registry's configuration can no longer change.
    #[error("cannot reconfigure: the global registry is frozen")]
    ConfigFrozen,
}

/// Errors returned by [`FunctionRegistry::lookup`](super::FunctionRegistry::lookup).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No function is registered under the name at all.
    #[error("unknown function `{name}`")]
    NotExist { name: String },

    /// The name is known but none of its variants accepts this many arguments.
    #[error("function `{name}` does not accept {arity} arguments")]
    ArityMismatch { name: String, arity: usize },
}

impl LookupError {
    /// True when the name itself is unknown, false when only the arity is wrong.
    pub fn is_not_exist(&self) -> bool {
        matches!(self, LookupError::NotExist { .. })
    }
}

/// Errors produced while invoking a [`Wrapper`](super::Wrapper).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    /// The wrapper was called with an argument count its contract rejects.
    /// Lookup filters by arity, so this indicates a caller bug.
    #[error("invalid invocation: expected {expected} arguments, got {got}")]
    Arity { expected: Arity, got: usize },

    /// An argument had a type the function cannot work with.
    #[error("type error: {0}")]
    Type(String),

    /// The function body failed.
    #[error("{0}")]
    Failed(String),
}
