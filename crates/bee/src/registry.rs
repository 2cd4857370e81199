//! Table of backend functions the frontend may call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A frontend-callable function: no arguments, no return value.
pub type Callable = Arc<dyn Fn() + Send + Sync + 'static>;

/// Name → handler table owned by the UI server.
///
/// Filled before the server starts and read-only afterwards, so it is
/// shared between connections without locking.
#[derive(Clone, Default)]
pub struct CallableRegistry {
    handlers: HashMap<String, Callable>,
}

impl CallableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`.
    ///
    /// Registering a name twice replaces the first handler. Returns `true`
    /// when that happened.
    pub fn expose<F>(&mut self, name: impl Into<String>, handler: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self.handlers.insert(name.clone(), Arc::new(handler)).is_some();
        if replaced {
            tracing::warn!(%name, "callable registered twice, keeping the newest handler");
        } else {
            tracing::debug!(%name, "callable exposed");
        }
        replaced
    }

    /// Looks up a handler.
    pub fn get(&self, name: &str) -> Option<Callable> {
        self.handlers.get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered callables.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for CallableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("CallableRegistry").field("names", &names).finish()
    }
}
