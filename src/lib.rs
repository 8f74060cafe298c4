pub mod cli;
pub mod config;
pub mod context;
pub mod session;
pub mod udf;
pub mod value;

pub use config::{RegistrationPolicy, RegistryConfig};
pub use context::ExecutionContext;
pub use session::{CallError, Session};
pub use udf::{
    Arity, FunctionRegistry, GlobalRegistry, InvocationError, LookupError, RegistrationError,
    Wrapper, configure_global, fork_from_global, freeze_global, install_builtins, register_global,
};
pub use value::Value;
