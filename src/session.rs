use crate::{
    context::ExecutionContext,
    udf::{self, FunctionRegistry, InvocationError, LookupError, RegistrationError, Wrapper},
    value::Value,
};

/// Errors surfaced to the query evaluator when calling a function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// Unknown name or unsupported argument count
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The function was found but failed while running
    #[error("error in function `{name}`: {source}")]
    Invocation {
        name: String,
        #[source]
        source: InvocationError,
    },
}

/// Function-calling state for one execution context.
///
/// A session forks the global registry once, when it is created. Functions
/// registered on the session afterwards are private to it.
///
/// # Examples
///
/// ```
/// use udf_registry::{ExecutionContext, FunctionRegistry, Session, Value, Wrapper};
///
/// let mut session = Session::with_registry(ExecutionContext::new("q1"), FunctionRegistry::new());
/// session
///     .register("add1", Wrapper::unary(|_, v| Ok(Value::Integer(v.as_int().unwrap_or(0) + 1))))
///     .unwrap();
///
/// assert_eq!(session.call("add1", &[Value::Integer(5)]).unwrap(), Value::Integer(6));
/// assert_eq!(
///     session.call("add2", &[]).unwrap_err().to_string(),
///     "unknown function `add2`"
/// );
/// ```
#[derive(Debug)]
pub struct Session {
    ctx: ExecutionContext,
    functions: FunctionRegistry,
}

impl Session {
    /// Creates a session whose registry is forked from the global one.
    pub fn new(name: impl Into<String>) -> Self {
        let ctx = ExecutionContext::new(name);
        let functions = udf::fork_from_global(&ctx);
        Session { ctx, functions }
    }

    /// Creates a session around an already built registry.
    pub fn with_registry(ctx: ExecutionContext, functions: FunctionRegistry) -> Self {
        Session { ctx, functions }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Registers a function visible to this session only.
    pub fn register(&mut self, name: &str, wrapper: Wrapper) -> Result<(), RegistrationError> {
        self.functions.register(name, wrapper)
    }

    /// Resolves `name` for `args.len()` arguments and invokes it.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let wrapper = self.functions.lookup(name, args.len())?;
        wrapper
            .invoke(&self.ctx, args)
            .map_err(|source| CallError::Invocation {
                name: udf::normalize_name(name),
                source,
            })
    }
}
