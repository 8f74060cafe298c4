//! The process-wide function registry and per-context forks of it.
//!
//! Built-in and plugin functions are registered here during startup. Each
//! execution context then takes its own copy with [`fork_from_global`] and
//! registers session-local functions on that copy only.

use std::sync::LazyLock;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{FunctionRegistry, RegistrationError, Wrapper, builtins, normalize_name};
use crate::{config::RegistryConfig, context::ExecutionContext};

/// A registry shared between threads, with an optional freeze point.
///
/// Writes take the write lock and forks take the read lock, so a fork
/// always sees a consistent set of entries.
#[derive(Debug, Default)]
pub struct GlobalRegistry {
    state: RwLock<GlobalState>,
}

#[derive(Debug, Default)]
struct GlobalState {
    registry: FunctionRegistry,
    frozen: bool,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty global registry whose forks inherit `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        GlobalRegistry {
            state: RwLock::new(GlobalState {
                registry: FunctionRegistry::with_config(config),
                frozen: false,
            }),
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.state.read().registry.config()
    }

    /// Replaces the configuration. Fails once the registry is frozen.
    pub fn configure(&self, config: RegistryConfig) -> Result<(), RegistrationError> {
        let mut state = self.state.write();
        if state.frozen {
            return Err(RegistrationError::ConfigFrozen);
        }
        state.registry.set_config(config);
        info!(policy = ?config.policy, "configured global function registry");
        Ok(())
    }

    pub fn register(&self, name: &str, wrapper: Wrapper) -> Result<(), RegistrationError> {
        let mut state = self.state.write();
        if state.frozen {
            return Err(RegistrationError::Frozen {
                name: normalize_name(name),
            });
        }
        state.registry.register(name, wrapper)
    }

    /// Registers the built-in library, stopping at the first conflict.
    pub fn install_builtins(&self) -> Result<(), RegistrationError> {
        let mut state = self.state.write();
        if state.frozen {
            return Err(RegistrationError::Frozen {
                name: "builtins".to_string(),
            });
        }
        // Stage into a copy so a conflict leaves the shared table untouched.
        let mut staged = state.registry.clone();
        builtins::register_all(&mut staged)?;
        state.registry = staged;
        info!(functions = state.registry.len(), "installed builtin functions");
        Ok(())
    }

    /// Returns an independent copy of the current entries.
    pub fn fork(&self, ctx: &ExecutionContext) -> FunctionRegistry {
        let state = self.state.read();
        debug!(
            context = ctx.name(),
            functions = state.registry.len(),
            "forked function registry"
        );
        state.registry.clone()
    }

    /// Rejects all further writes.
    pub fn freeze(&self) {
        let mut state = self.state.write();
        if !state.frozen {
            state.frozen = true;
            info!("global function registry frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.state.read().frozen
    }

    /// Runs `f` against the current entries under the read lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&FunctionRegistry) -> R) -> R {
        f(&self.state.read().registry)
    }
}

static GLOBAL: LazyLock<GlobalRegistry> = LazyLock::new(GlobalRegistry::new);

/// The process-wide registry.
pub fn global() -> &'static GlobalRegistry {
    &GLOBAL
}

pub fn register_global(name: &str, wrapper: Wrapper) -> Result<(), RegistrationError> {
    GLOBAL.register(name, wrapper)
}

pub fn configure_global(config: RegistryConfig) -> Result<(), RegistrationError> {
    GLOBAL.configure(config)
}

pub fn install_builtins() -> Result<(), RegistrationError> {
    GLOBAL.install_builtins()
}

pub fn fork_from_global(ctx: &ExecutionContext) -> FunctionRegistry {
    GLOBAL.fork(ctx)
}

pub fn freeze_global() {
    GLOBAL.freeze()
}
