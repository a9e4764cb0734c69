//! Synthetic dataset generation.
//!
//! A generated dataset of size N holds orders `0..N` and one line per order,
//! so every order has exactly one match. The id→line index is built here once
//! and shared read-only by every strategy run against the dataset.

use crate::lookup::MapLookup;
use crate::types::{Order, OrderLine};
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Orders, lines and the precomputed line index for one benchmark size.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub lines: Vec<OrderLine>,
    pub line_index: MapLookup,
}

impl Dataset {
    /// Build a dataset from arbitrary collections. The index keeps the first
    /// line seen for each order id.
    pub fn from_parts(orders: Vec<Order>, lines: Vec<OrderLine>) -> Self {
        let line_index = MapLookup::build(&lines);
        Self {
            orders,
            lines,
            line_index,
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Copy of this dataset with every line for `order_id` removed.
    pub fn without_line(&self, order_id: i32) -> Self {
        let lines = self
            .lines
            .iter()
            .copied()
            .filter(|l| l.order_id != order_id)
            .collect();
        Self::from_parts(self.orders.clone(), lines)
    }

    /// Copy of this dataset with orders and lines in a seeded random order.
    ///
    /// Strategies must not depend on the input being sorted by id.
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut orders = self.orders.clone();
        let mut lines = self.lines.clone();
        orders.shuffle(&mut rng);
        lines.shuffle(&mut rng);
        Self::from_parts(orders, lines)
    }
}

/// Generate `size` orders and `size` lines with a dense 1:1 id relationship.
///
/// A negative size is a configuration error.
pub fn generate_dataset(size: i64) -> Result<Dataset> {
    if size < 0 {
        bail!("dataset size must be >= 0, got {size}");
    }
    if size > i64::from(i32::MAX) {
        bail!("dataset size {size} exceeds the order id range");
    }
    let n = size as i32;

    log::debug!("Generating dataset with {n} orders");

    let orders: Vec<Order> = (0..n).map(Order::numbered).collect();
    let lines: Vec<OrderLine> = (0..n).map(|i| OrderLine::new(i, i64::from(i))).collect();

    Ok(Dataset::from_parts(orders, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LineLookup;

    #[test]
    fn negative_size_is_rejected() {
        let err = generate_dataset(-1).unwrap_err();
        assert!(err.to_string().contains("must be >= 0"));
    }

    #[test]
    fn zero_size_is_empty() {
        let ds = generate_dataset(0).unwrap();
        assert!(ds.is_empty());
        assert!(ds.lines.is_empty());
        assert!(ds.line_index.is_empty());
    }

    #[test]
    fn ids_are_dense_and_paired() {
        let ds = generate_dataset(50).unwrap();
        assert_eq!(ds.len(), 50);
        assert_eq!(ds.lines.len(), 50);
        for (i, (order, line)) in ds.orders.iter().zip(&ds.lines).enumerate() {
            assert_eq!(order.id, i as i32);
            assert_eq!(order.label, format!("Number {i}"));
            assert_eq!(line.order_id, i as i32);
            assert_eq!(line.total, i as i64);
        }
        assert_eq!(ds.line_index.len(), 50);
        assert_eq!(ds.line_index.find(49), Some(&OrderLine::new(49, 49)));
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_dataset(100).unwrap(), generate_dataset(100).unwrap());
    }

    #[test]
    fn without_line_drops_only_that_order() {
        let ds = generate_dataset(10).unwrap().without_line(4);
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.lines.len(), 9);
        assert_eq!(ds.line_index.find(4), None);
        assert!(ds.line_index.find(5).is_some());
    }

    #[test]
    fn shuffled_keeps_contents() {
        let ds = generate_dataset(64).unwrap();
        let sh = ds.shuffled(7);
        assert_ne!(sh.orders, ds.orders);

        let mut ids: Vec<i32> = sh.orders.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..64).collect::<Vec<_>>());
        assert_eq!(sh.line_index, ds.line_index);
    }
}
