//! Strategy Registry
//!
//! An ordered list of labelled strategies. Registration order is the order in
//! which strategies run and the order in which they are reported.

use crate::strategies::{
    FillWith, PinnedThreads, RayonParIter, RayonPool, RayonScope, RayonStatic, ScopedThreads,
    Sequential, WideLanes,
};
use crate::strategy::{FillStrategy, StrategyError};
use thiserror::Error;

/// Registry construction failure
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two strategies share a label
    #[error("duplicate strategy label: {0}")]
    DuplicateLabel(String),
    /// A strategy could not be constructed
    #[error("failed to construct strategy {label}: {source}")]
    Strategy {
        /// Label of the strategy
        label: String,
        /// Construction error
        #[source]
        source: StrategyError,
    },
}

/// A labelled strategy
pub struct StrategyDef {
    label: String,
    strategy: Box<dyn FillStrategy>,
}

impl StrategyDef {
    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The strategy itself
    pub fn strategy(&self) -> &dyn FillStrategy {
        self.strategy.as_ref()
    }
}

impl std::fmt::Debug for StrategyDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyDef")
            .field("label", &self.label)
            .field("availability", &self.strategy.availability())
            .finish()
    }
}

/// Ordered collection of strategies
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<StrategyDef>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy under `label`.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        strategy: impl FillStrategy + 'static,
    ) -> Result<(), RegistryError> {
        let label = label.into();
        if self.entries.iter().any(|e| e.label == label) {
            return Err(RegistryError::DuplicateLabel(label));
        }
        self.entries.push(StrategyDef {
            label,
            strategy: Box::new(strategy),
        });
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(
        mut self,
        label: impl Into<String>,
        strategy: impl FillStrategy + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(label, strategy)?;
        Ok(self)
    }

    /// The built-in strategies.
    ///
    /// `workers` drives the rayon decompositions, `threads` the OS-thread ones.
    pub fn standard(workers: usize, threads: usize) -> Result<Self, RegistryError> {
        let pool = RayonPool::new(workers).map_err(|source| RegistryError::Strategy {
            label: "rayon-pool".to_string(),
            source,
        })?;

        Registry::new()
            .with("sequential", Sequential)?
            .with("fill-with", FillWith)?
            .with("rayon-static", RayonStatic::new(workers))?
            .with("rayon-scope", RayonScope::new(workers))?
            .with("rayon-par-iter", RayonParIter)?
            .with("pinned-threads", PinnedThreads::new(threads))?
            .with("scoped-threads", ScopedThreads::new(threads))?
            .with("rayon-pool", pool)?
            .with("wide-lanes", WideLanes)
    }

    /// Strategies in registration order
    pub fn iter(&self) -> impl Iterator<Item = &StrategyDef> {
        self.entries.iter()
    }

    /// Labels in registration order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Look up a strategy by label
    pub fn get(&self, label: &str) -> Option<&StrategyDef> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a StrategyDef;
    type IntoIter = std::slice::Iter<'a, StrategyDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy_fn;

    #[test]
    fn test_registration_order() {
        let registry = Registry::new()
            .with("zeta", Sequential)
            .unwrap()
            .with("alpha", FillWith)
            .unwrap()
            .with("mid", WideLanes)
            .unwrap();

        let labels: Vec<_> = registry.labels().collect();
        assert_eq!(labels, ["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut registry = Registry::new();
        registry.register("seq", Sequential).unwrap();
        let err = registry.register("seq", FillWith).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateLabel(ref l) if l == "seq"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_closure_registration() {
        let mut registry = Registry::new();
        registry
            .register("noop", strategy_fn(|_buffer| Ok(())))
            .unwrap();
        assert!(registry.get("noop").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_standard_registry() {
        let registry = Registry::standard(4, 2).unwrap();
        let labels: Vec<_> = registry.labels().collect();
        assert_eq!(
            labels,
            [
                "sequential",
                "fill-with",
                "rayon-static",
                "rayon-scope",
                "rayon-par-iter",
                "pinned-threads",
                "scoped-threads",
                "rayon-pool",
                "wide-lanes",
            ]
        );
    }
}
