//! Named collaborators consulted while building the chain
//!
//! - [`RuleRegistry`] holds shared rule bodies for `RULE:name` references.
//! - [`ComponentLookup`] resolves `EXT:name` directives to an
//!   [`ExternalValidator`]. [`ComponentRegistry`] is the stock implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// RULE REGISTRY
// ============================================================================

/// Rule bodies addressable by name.
///
/// A body is a rule without its field name, e.g. `["INT", "REQ"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleRegistry {
    rules: HashMap<String, Vec<String>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule body.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, rule: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .insert(name.into(), rule.into_iter().map(Into::into).collect())
    }

    /// Whether a rule with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// The rule body registered under `name`.
    pub fn rule(&self, name: &str) -> Option<&[String]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K, I, S> FromIterator<(K, I)> for RuleRegistry
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut registry = Self::new();
        for (name, rule) in iter {
            registry.insert(name, rule);
        }
        registry
    }
}

// ============================================================================
// EXTERNAL VALIDATORS
// ============================================================================

/// Error returned by an [`ExternalValidator`] that could not reach a verdict.
pub type ExternalError = Box<dyn std::error::Error + Send + Sync>;

/// A validation capability implemented outside the rule language.
///
/// Called synchronously from validation calls that may run on many threads
/// at once.
pub trait ExternalValidator: Send + Sync {
    /// Returns whether `value` is valid. `Err` means the check itself
    /// failed and aborts the whole validation call.
    fn validate(&self, value: &Value) -> Result<bool, ExternalError>;
}

impl<F> ExternalValidator for F
where
    F: Fn(&Value) -> Result<bool, ExternalError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<bool, ExternalError> {
        self(value)
    }
}

/// Resolves component names used by `EXT:name` directives.
pub trait ComponentLookup: Send + Sync {
    /// The component registered under `name`, if any.
    fn lookup(&self, name: &str) -> Option<Arc<dyn ExternalValidator>>;
}

/// Thread-safe name to [`ExternalValidator`] map.
///
/// Components may be registered while other threads look them up.
#[derive(Default)]
pub struct ComponentRegistry {
    components: DashMap<String, Arc<dyn ExternalValidator>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, returning the one it replaced.
    pub fn register<V>(&self, name: impl Into<String>, validator: V) -> Option<Arc<dyn ExternalValidator>>
    where
        V: ExternalValidator + 'static,
    {
        self.components.insert(name.into(), Arc::new(validator))
    }

    /// Removes a component.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn ExternalValidator>> {
        self.components.remove(name).map(|(_, v)| v)
    }

    /// Whether a component is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no components are registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentLookup for ComponentRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ExternalValidator>> {
        self.components.get(name).map(|entry| Arc::clone(entry.value()))
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.components.iter().map(|e| e.key().clone()).collect();
        names.sort();
        f.debug_struct("ComponentRegistry")
            .field("components", &names)
            .finish()
    }
}
