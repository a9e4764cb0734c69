//! Join strategies and the registry that names them.
//!
//! Every strategy turns a [`Dataset`] into one [`OrderAggregate`] per order,
//! pairing `Order::id` with `OrderLine::order_id` and leaving `line` empty
//! when no line matches. Only the algorithm differs:
//! - [`scan`] — nested linear scans, O(N·M)
//! - [`join`] — declarative merge join and grouped hash join
//! - [`dict`] — hash map lookups, built per call or reused from setup
//!
//! The runner only ever sees [`StrategyEntry`] values, so adding a strategy
//! means registering one more function.

pub mod dict;
pub mod join;
pub mod scan;

use anyhow::{bail, Result};
use oj_core::dataset::Dataset;
use oj_core::lookup::LineLookup;
use oj_core::types::{Order, OrderAggregate};

/// Name of the strategy every other one is checked against.
pub const BASELINE: &str = "nested_scan";

pub type StrategyFn = fn(&Dataset) -> Vec<OrderAggregate>;

/// A named strategy.
#[derive(Debug, Clone, Copy)]
pub struct StrategyEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// Part of the default selection when no names are given.
    pub enabled: bool,
    pub run: StrategyFn,
}

impl StrategyEntry {
    pub const fn new(name: &'static str, description: &'static str, run: StrategyFn) -> Self {
        Self {
            name,
            description,
            enabled: true,
            run,
        }
    }

    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Strategies in registration order.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in strategy.
    pub fn with_defaults() -> Self {
        Self {
            entries: builtin_strategies(),
        }
    }

    pub fn register(&mut self, entry: StrategyEntry) -> Result<()> {
        if self.get(entry.name).is_some() {
            bail!("strategy '{}' is already registered", entry.name);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StrategyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn all(&self) -> &[StrategyEntry] {
        &self.entries
    }

    pub fn enabled(&self) -> Vec<&StrategyEntry> {
        self.entries.iter().filter(|e| e.enabled).collect()
    }

    /// Resolve a list of names. An empty list selects the enabled set.
    ///
    /// Unknown names are reported together in one error.
    pub fn select(&self, names: &[String]) -> Result<Vec<&StrategyEntry>> {
        if names.is_empty() {
            return Ok(self.enabled());
        }

        let unknown: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| self.get(n).is_none())
            .collect();
        if !unknown.is_empty() {
            bail!(
                "unknown strategy name(s): {} (registered: {})",
                unknown.join(", "),
                self.names().join(", ")
            );
        }

        let mut selected: Vec<&StrategyEntry> = Vec::with_capacity(names.len());
        for name in names {
            if let Some(entry) = self.get(name) {
                if !selected.iter().any(|e| e.name == entry.name) {
                    selected.push(entry);
                }
            }
        }
        Ok(selected)
    }
}

fn builtin_strategies() -> Vec<StrategyEntry> {
    vec![
        StrategyEntry::new(
            BASELINE,
            "indexed loop over orders, linear scan of lines per order",
            scan::nested_scan,
        ),
        StrategyEntry::new(
            "query_join",
            "left outer merge join over id-sorted views",
            join::query_join,
        ),
        StrategyEntry::new(
            "dict_created",
            "collect lines into a fresh map, then look up each order",
            dict::dict_created,
        ),
        StrategyEntry::new(
            "dict_precomputed",
            "look up each order in the map built at setup",
            dict::dict_precomputed,
        ),
        StrategyEntry::new(
            "manual_dict",
            "explicit loops with a pre-sized map and existence-check lookups",
            dict::manual_dict,
        ),
        StrategyEntry::new(
            "for_each_scan",
            "for-each over orders with an iterator find per order",
            scan::for_each_scan,
        )
        .disabled(),
        StrategyEntry::new(
            "select_scan",
            "map/collect pipeline with a linear scan per order",
            scan::select_scan,
        )
        .disabled(),
        StrategyEntry::new(
            "hash_join",
            "group lines by order id, then left outer join",
            join::hash_join,
        )
        .disabled(),
        StrategyEntry::new(
            "scan_lookup",
            "generic lookup join driven by a linear-scan backing",
            scan::scan_lookup,
        )
        .disabled(),
    ]
}

/// Join `orders` against any lookup backing, one aggregate per order.
pub fn join_with<L: LineLookup + ?Sized>(orders: &[Order], lookup: &L) -> Vec<OrderAggregate> {
    orders
        .iter()
        .map(|order| OrderAggregate::new(order, lookup.find(order.id).copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oj_core::dataset::generate_dataset;

    fn noop(_: &Dataset) -> Vec<OrderAggregate> {
        Vec::new()
    }

    #[test]
    fn builtin_names_are_unique() {
        let mut names: Vec<_> = builtin_strategies().iter().map(|e| e.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(StrategyRegistry::with_defaults().all().len(), total);
    }

    #[test]
    fn defaults_start_with_baseline() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.names()[0], BASELINE);
        assert_eq!(registry.all().len(), 9);
    }

    #[test]
    fn enabled_set_is_the_five_core_strategies() {
        let registry = StrategyRegistry::with_defaults();
        let names: Vec<&str> = registry.enabled().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "nested_scan",
                "query_join",
                "dict_created",
                "dict_precomputed",
                "manual_dict"
            ]
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = StrategyRegistry::with_defaults();
        let err = registry
            .register(StrategyEntry::new(BASELINE, "dup", noop))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn custom_strategy_is_selectable() {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyEntry::new("noop", "does nothing", noop))
            .unwrap();
        let selected = registry.select(&["noop".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert!((selected[0].run)(&generate_dataset(3).unwrap()).is_empty());
    }

    #[test]
    fn select_reports_unknown_names() {
        let registry = StrategyRegistry::with_defaults();
        let err = registry
            .select(&["nested_scan".to_string(), "bogus".to_string()])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(!msg.contains("unknown strategy name(s): nested_scan"));
    }

    #[test]
    fn select_dedups_and_keeps_request_order() {
        let registry = StrategyRegistry::with_defaults();
        let names = ["manual_dict", "hash_join", "manual_dict"].map(String::from);
        let selected: Vec<&str> = registry
            .select(&names)
            .unwrap()
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(selected, vec!["manual_dict", "hash_join"]);
    }

    #[test]
    fn empty_selection_means_enabled() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.select(&[]).unwrap().len(), registry.enabled().len());
    }
}
