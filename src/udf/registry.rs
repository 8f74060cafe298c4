//! Name and arity resolution of registered functions.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace, warn};

use super::{Arity, LookupError, RegistrationError, Wrapper};
use crate::config::{RegistrationPolicy, RegistryConfig};

/// All variants registered under one function name.
#[derive(Debug, Clone, Default)]
struct Overloads {
    exact: BTreeMap<usize, Wrapper>,
    variadic: Option<Wrapper>,
}

impl Overloads {
    /// Exact arity wins over the variadic variant.
    fn resolve(&self, arity: usize) -> Option<&Wrapper> {
        self.exact
            .get(&arity)
            .or_else(|| self.variadic.as_ref().filter(|w| w.accepts(arity)))
    }

    fn slot(&self, arity: Arity) -> Option<&Wrapper> {
        match arity {
            Arity::Exact(n) => self.exact.get(&n),
            Arity::Variadic { .. } => self.variadic.as_ref(),
        }
    }

    fn insert(&mut self, wrapper: Wrapper) {
        match wrapper.arity() {
            Arity::Exact(n) => {
                self.exact.insert(n, wrapper);
            }
            Arity::Variadic { .. } => self.variadic = Some(wrapper),
        }
    }

    fn arities(&self) -> impl Iterator<Item = Arity> + '_ {
        self.exact
            .keys()
            .map(|n| Arity::Exact(*n))
            .chain(self.variadic.iter().map(Wrapper::arity))
    }
}

/// A table of functions keyed by case-insensitive name.
///
/// Several variants may live under one name: at most one per exact arity
/// plus at most one variadic variant. Cloning a registry yields an
/// independent copy; the wrappers themselves are shared.
///
/// # Examples
///
/// ```
/// use udf_registry::{FunctionRegistry, Value, Wrapper};
///
/// let mut registry = FunctionRegistry::new();
/// registry
///     .register("Twice", Wrapper::unary(|_, v| Ok(Value::Integer(v.as_int().unwrap_or(0) * 2))))
///     .unwrap();
///
/// assert!(registry.lookup("TWICE", 1).is_ok());
/// assert!(!registry.lookup("twice", 2).unwrap_err().is_not_exist());
/// assert!(registry.lookup("thrice", 1).unwrap_err().is_not_exist());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: HashMap<String, Overloads>,
    config: RegistryConfig,
}

/// Normalizes a function name for use as a registry key.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        FunctionRegistry {
            entries: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Changes the policy applied to later registrations.
    pub fn set_config(&mut self, config: RegistryConfig) {
        self.config = config;
    }

    /// Adds `wrapper` under `name`.
    ///
    /// Under [`RegistrationPolicy::Reject`] an existing variant with the same
    /// exact arity, or a second variadic variant, is a conflict and the
    /// registry is left untouched.
    pub fn register(&mut self, name: &str, wrapper: Wrapper) -> Result<(), RegistrationError> {
        let key = normalize_name(name);
        let arity = wrapper.arity();

        let overloads = self.entries.get(&key);
        if let Some(existing) = overloads.and_then(|o| o.slot(arity)) {
            match self.config.policy {
                RegistrationPolicy::Reject => {
                    return Err(RegistrationError::Conflict { name: key, arity });
                }
                RegistrationPolicy::Replace => {
                    warn!(
                        name = %key,
                        old = %existing.arity(),
                        new = %arity,
                        "replacing registered function"
                    );
                }
            }
        }

        debug!(name = %key, %arity, "registered function");
        self.entries.entry(key).or_default().insert(wrapper);
        Ok(())
    }

    /// Resolves `name` called with `arity` arguments.
    ///
    /// An exact-arity variant is preferred; otherwise a variadic variant whose
    /// minimum is satisfied. A known name with no accepting variant yields
    /// [`LookupError::ArityMismatch`] rather than [`LookupError::NotExist`].
    pub fn lookup(&self, name: &str, arity: usize) -> Result<Wrapper, LookupError> {
        let key = normalize_name(name);
        let Some(overloads) = self.entries.get(&key) else {
            trace!(name = %key, "lookup of unknown function");
            return Err(LookupError::NotExist { name: key });
        };

        match overloads.resolve(arity) {
            Some(wrapper) => Ok(wrapper.clone()),
            None => {
                trace!(name = %key, arity, "no variant accepts arity");
                Err(LookupError::ArityMismatch { name: key, arity })
            }
        }
    }

    /// Removes every variant registered under `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        let key = normalize_name(name);
        let removed = self.entries.remove(&key).is_some();
        if removed {
            debug!(name = %key, "unregistered function");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    /// Every registered `(name, arity)` pair, sorted by name then arity.
    pub fn list(&self) -> Vec<(String, Arity)> {
        let mut out: Vec<(String, Arity)> = self
            .entries
            .iter()
            .flat_map(|(name, o)| o.arities().map(move |a| (name.clone(), a)))
            .collect();
        out.sort_by(|(na, aa), (nb, ab)| na.cmp(nb).then_with(|| arity_order(*aa, *ab)));
        out
    }

    /// Number of distinct function names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Exact arities ascending, the variadic variant last.
fn arity_order(a: Arity, b: Arity) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Arity::Exact(x), Arity::Exact(y)) => x.cmp(&y),
        (Arity::Exact(_), Arity::Variadic { .. }) => Ordering::Less,
        (Arity::Variadic { .. }, Arity::Exact(_)) => Ordering::Greater,
        (Arity::Variadic { min: x }, Arity::Variadic { min: y }) => x.cmp(&y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn constant(n: i64) -> Wrapper {
        Wrapper::variadic(move |_, _| Ok(Value::Integer(n)))
    }

    fn unary(n: i64) -> Wrapper {
        Wrapper::unary(move |_, _| Ok(Value::Integer(n)))
    }

    #[test]
    fn test_empty_registry_reports_not_exist() {
        let registry = FunctionRegistry::new();
        for arity in 0..4 {
            let err = registry.lookup("anything", arity).unwrap_err();
            assert!(err.is_not_exist());
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_exact_arity_is_rejected() {
        let mut registry = FunctionRegistry::new();
        registry.register("f", unary(1)).unwrap();
        let err = registry.register("F", unary(2)).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::Conflict {
                name: "f".to_string(),
                arity: Arity::Exact(1)
            }
        );
    }

    #[test]
    fn test_rejected_registration_leaves_registry_unchanged() {
        let mut registry = FunctionRegistry::new();
        let original = unary(1);
        registry.register("f", original.clone()).unwrap();
        assert!(registry.register("f", unary(2)).is_err());

        let found = registry.lookup("f", 1).unwrap();
        assert!(found.same_function(&original));
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_second_variadic_is_rejected_even_with_different_minimum() {
        let mut registry = FunctionRegistry::new();
        registry.register("v", constant(1)).unwrap();
        let other = Wrapper::variadic_min(2, |_, _| Ok(Value::Null));
        let err = registry.register("v", other).unwrap_err();
        assert!(matches!(err, RegistrationError::Conflict { .. }));
    }

    #[test]
    fn test_exact_and_variadic_coexist() {
        let mut registry = FunctionRegistry::new();
        registry.register("f", unary(1)).unwrap();
        registry.register("f", constant(99)).unwrap();
        registry
            .register("f", Wrapper::binary(|_, _, _| Ok(Value::Integer(2))))
            .unwrap();

        assert_eq!(
            registry.list(),
            vec![
                ("f".to_string(), Arity::Exact(1)),
                ("f".to_string(), Arity::Exact(2)),
                ("f".to_string(), Arity::Variadic { min: 0 }),
            ]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_policy_overwrites() {
        let mut registry =
            FunctionRegistry::with_config(RegistryConfig::with_policy(RegistrationPolicy::Replace));
        registry.register("f", unary(1)).unwrap();
        let replacement = unary(2);
        registry.register("f", replacement.clone()).unwrap();

        assert!(registry.lookup("f", 1).unwrap().same_function(&replacement));
        assert_eq!(registry.clone().config().policy, RegistrationPolicy::Replace);
    }

    #[test]
    fn test_unregister_removes_all_variants() {
        let mut registry = FunctionRegistry::new();
        registry.register("f", unary(1)).unwrap();
        registry.register("f", constant(2)).unwrap();

        assert!(registry.unregister("F"));
        assert!(!registry.contains("f"));
        assert!(registry.lookup("f", 1).unwrap_err().is_not_exist());
        assert!(!registry.unregister("f"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut registry = FunctionRegistry::new();
        registry.register("shared", unary(1)).unwrap();

        let mut copy = registry.clone();
        copy.register("local", unary(2)).unwrap();

        assert!(copy.contains("local"));
        assert!(!registry.contains("local"));
        assert_eq!(copy.config(), registry.config());
        assert!(
            copy.lookup("shared", 1)
                .unwrap()
                .same_function(&registry.lookup("shared", 1).unwrap())
        );
    }
}
