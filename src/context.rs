use std::{sync::Arc, time::SystemTime};

/// Handle for one query execution context.
///
/// Every function invocation receives the context of the session that made
/// the call. The registry passes it through without looking at it.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    name: String,
    created_at: SystemTime,
}

impl ExecutionContext {
    pub fn new(name: impl Into<String>) -> Self {
        ExecutionContext {
            inner: Arc::new(ContextInner {
                name: name.into(),
                created_at: SystemTime::now(),
            }),
        }
    }

    /// Name of the session that owns this context
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn created_at(&self) -> SystemTime {
        self.inner.created_at
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        ExecutionContext::new("default")
    }
}
