//! Uniform invocation contract over differently-shaped native callables.

use std::{fmt, sync::Arc};

use super::InvocationError;
use crate::{context::ExecutionContext, value::Value};

/// Signature every wrapped function is adapted to.
pub type UdfFn =
    dyn Fn(&ExecutionContext, &[Value]) -> Result<Value, InvocationError> + Send + Sync;

/// Number of arguments a function variant accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many arguments
    Exact(usize),
    /// Any count at or above `min`
    Variadic { min: usize },
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Variadic { min } => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Variadic { min } => write!(f, "at least {}", min),
        }
    }
}

/// A registered function together with its arity contract.
///
/// Wrappers are immutable and cheap to clone; clones share the callable.
/// Fixed-arity adapters receive their arguments individually, variadic and
/// generic ones get the whole slice.
///
/// # Examples
///
/// ```
/// use udf_registry::{ExecutionContext, Value, Wrapper};
///
/// let add1 = Wrapper::unary(|_, v| match v {
///     Value::Integer(n) => Ok(Value::Integer(n + 1)),
///     other => Ok(other.clone()),
/// });
///
/// let ctx = ExecutionContext::default();
/// assert_eq!(add1.invoke(&ctx, &[Value::Integer(5)]).unwrap(), Value::Integer(6));
/// assert!(add1.invoke(&ctx, &[]).is_err());
/// ```
#[derive(Clone)]
pub enum Wrapper {
    Exact { arity: usize, call: Arc<UdfFn> },
    Variadic { min_arity: usize, call: Arc<UdfFn> },
}

impl Wrapper {
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        Self::fixed(0, move |ctx, args| match args {
            [] => f(ctx),
            _ => Err(arity_error(Arity::Exact(0), args.len())),
        })
    }

    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &Value) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Self::fixed(1, move |ctx, args| match args {
            [a] => f(ctx, a),
            _ => Err(arity_error(Arity::Exact(1), args.len())),
        })
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &Value, &Value) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Self::fixed(2, move |ctx, args| match args {
            [a, b] => f(ctx, a, b),
            _ => Err(arity_error(Arity::Exact(2), args.len())),
        })
    }

    pub fn ternary<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &Value, &Value, &Value) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Self::fixed(3, move |ctx, args| match args {
            [a, b, c] => f(ctx, a, b, c),
            _ => Err(arity_error(Arity::Exact(3), args.len())),
        })
    }

    /// Wraps a slice-taking function that requires exactly `arity` arguments.
    pub fn fixed<F>(arity: usize, f: F) -> Self
    where
        F: Fn(&ExecutionContext, &[Value]) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Wrapper::Exact {
            arity,
            call: Arc::new(f),
        }
    }

    /// Wraps a function accepting any number of arguments.
    pub fn variadic<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &[Value]) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Self::variadic_min(0, f)
    }

    /// Wraps a function accepting `min_arity` or more arguments.
    pub fn variadic_min<F>(min_arity: usize, f: F) -> Self
    where
        F: Fn(&ExecutionContext, &[Value]) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        Wrapper::Variadic {
            min_arity,
            call: Arc::new(f),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Wrapper::Exact { arity, .. } => Arity::Exact(*arity),
            Wrapper::Variadic { min_arity, .. } => Arity::Variadic { min: *min_arity },
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Wrapper::Variadic { .. })
    }

    /// Whether a call with `count` arguments satisfies this wrapper's contract.
    pub fn accepts(&self, count: usize) -> bool {
        self.arity().accepts(count)
    }

    /// Calls the wrapped function.
    ///
    /// The argument count is checked again here so that a wrapper used
    /// without going through lookup still cannot be called with the wrong
    /// number of arguments. The function's own result is returned as is.
    pub fn invoke(&self, ctx: &ExecutionContext, args: &[Value]) -> Result<Value, InvocationError> {
        if !self.accepts(args.len()) {
            return Err(arity_error(self.arity(), args.len()));
        }
        match self {
            Wrapper::Exact { call, .. } | Wrapper::Variadic { call, .. } => call(ctx, args),
        }
    }

    /// True when both wrappers share the same underlying callable.
    pub fn same_function(&self, other: &Wrapper) -> bool {
        match (self, other) {
            (Wrapper::Exact { call: a, .. }, Wrapper::Exact { call: b, .. })
            | (Wrapper::Variadic { call: a, .. }, Wrapper::Variadic { call: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("arity", &self.arity())
            .finish()
    }
}

fn arity_error(expected: Arity, got: usize) -> InvocationError {
    InvocationError::Arity { expected, got }
}
