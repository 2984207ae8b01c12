//! Strategy Planner
//!
//! Builds the execution plan by filtering registered strategies.
//!
//! Filtering options:
//! - Regex pattern matching on the strategy label
//! - Regex exclusion on the strategy label
//!
//! Ordering: registration order is kept, so output lines appear in the order
//! strategies were registered.

use fillbench_core::{Registry, StrategyDef};
use regex::Regex;

/// Execution plan for strategies
#[derive(Debug)]
pub struct ExecutionPlan<'a> {
    /// Strategies to run, in registration order
    pub strategies: Vec<&'a StrategyDef>,
}

impl ExecutionPlan<'_> {
    /// Width of the longest selected label, for column alignment
    pub fn label_width(&self) -> usize {
        self.strategies
            .iter()
            .map(|s| s.label().len())
            .max()
            .unwrap_or(0)
    }
}

/// Build an execution plan from the registry
pub fn build_plan<'a>(
    registry: &'a Registry,
    filter: Option<&Regex>,
    skip: Option<&Regex>,
) -> ExecutionPlan<'a> {
    let strategies = registry
        .iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(s.label())))
        .filter(|s| !skip.is_some_and(|re| re.is_match(s.label())))
        .collect();

    ExecutionPlan { strategies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fillbench_core::strategies::{FillWith, Sequential, WideLanes};

    fn registry() -> Registry {
        Registry::new()
            .with("zeta-seq", Sequential)
            .unwrap()
            .with("alpha-fill", FillWith)
            .unwrap()
            .with("lanes", WideLanes)
            .unwrap()
    }

    fn labels<'a>(plan: &'a ExecutionPlan<'_>) -> Vec<&'a str> {
        plan.strategies.iter().map(|s| s.label()).collect()
    }

    #[test]
    fn test_no_filter_keeps_registration_order() {
        let registry = registry();
        let plan = build_plan(&registry, None, None);
        assert_eq!(labels(&plan), ["zeta-seq", "alpha-fill", "lanes"]);
        assert_eq!(plan.label_width(), 10);
    }

    #[test]
    fn test_regex_filter() {
        let registry = registry();
        let re = Regex::new("seq|lanes").unwrap();
        let plan = build_plan(&registry, Some(&re), None);
        assert_eq!(labels(&plan), ["zeta-seq", "lanes"]);
    }

    #[test]
    fn test_skip() {
        let registry = registry();
        let skip = Regex::new("^alpha").unwrap();
        let plan = build_plan(&registry, None, Some(&skip));
        assert_eq!(labels(&plan), ["zeta-seq", "lanes"]);
    }

    #[test]
    fn test_nothing_matches() {
        let registry = registry();
        let re = Regex::new("^gpu").unwrap();
        let plan = build_plan(&registry, Some(&re), None);
        assert!(plan.strategies.is_empty());
        assert_eq!(plan.label_width(), 0);
    }
}
