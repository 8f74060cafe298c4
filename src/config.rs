//! Registry configuration

/// What happens when a function is registered over an existing variant with
/// the same name and arity contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// Fail with a conflict error and leave the registry unchanged.
    #[default]
    Reject,
    /// Overwrite the existing variant.
    Replace,
}

/// Options for a [`FunctionRegistry`](crate::FunctionRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub policy: RegistrationPolicy,
}

impl RegistryConfig {
    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        RegistryConfig { policy }
    }
}
