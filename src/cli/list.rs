//! List registered functions

use crate::FunctionRegistry;

/// One line per registered variant: `name/arity`, variadic ones as `name/N+`.
pub fn list_functions(registry: &FunctionRegistry) -> Vec<String> {
    registry
        .list()
        .into_iter()
        .map(|(name, arity)| match arity {
            crate::Arity::Exact(n) => format!("{}/{}", name, n),
            crate::Arity::Variadic { min } => format!("{}/{}+", name, min),
        })
        .collect()
}
