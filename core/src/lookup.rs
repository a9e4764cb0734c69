//! Line lookup by order id.
//!
//! [`LineLookup`] is the capability the dictionary-style strategies are
//! written against. Two backings are provided:
//! - [`MapLookup`] — hash map keyed by order id, O(1) per lookup
//! - [`ScanLookup`] — borrowed slice searched linearly, O(M) per lookup
//!
//! A missing key is an ordinary `None`, never a panic or an error.

use crate::types::OrderLine;
use std::collections::HashMap;

pub trait LineLookup {
    /// Line for `order_id`, or `None` when the order has no line.
    fn find(&self, order_id: i32) -> Option<&OrderLine>;

    /// Number of distinct order ids that can be found.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash-map-backed lookup. Owns copies of the lines it indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapLookup {
    by_order: HashMap<i32, OrderLine>,
}

impl MapLookup {
    /// Index `lines`, keeping the first line seen for each order id.
    pub fn build(lines: &[OrderLine]) -> Self {
        let mut by_order = HashMap::with_capacity(lines.len());
        for line in lines {
            by_order.entry(line.order_id).or_insert(*line);
        }
        Self { by_order }
    }
}

impl FromIterator<OrderLine> for MapLookup {
    /// Later lines for an already indexed order id are ignored, same as
    /// [`MapLookup::build`].
    fn from_iter<I: IntoIterator<Item = OrderLine>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut by_order = HashMap::with_capacity(iter.size_hint().0);
        for line in iter {
            by_order.entry(line.order_id).or_insert(line);
        }
        Self { by_order }
    }
}

impl LineLookup for MapLookup {
    fn find(&self, order_id: i32) -> Option<&OrderLine> {
        self.by_order.get(&order_id)
    }

    fn len(&self) -> usize {
        self.by_order.len()
    }
}

/// Linear-scan lookup over a borrowed slice.
#[derive(Debug, Clone, Copy)]
pub struct ScanLookup<'a> {
    lines: &'a [OrderLine],
}

impl<'a> ScanLookup<'a> {
    pub fn new(lines: &'a [OrderLine]) -> Self {
        Self { lines }
    }
}

impl LineLookup for ScanLookup<'_> {
    fn find(&self, order_id: i32) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.order_id == order_id)
    }

    fn len(&self) -> usize {
        let mut ids: Vec<i32> = self.lines.iter().map(|l| l.order_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<OrderLine> {
        vec![
            OrderLine::new(3, 30),
            OrderLine::new(1, 10),
            OrderLine::new(3, 99),
            OrderLine::new(2, 20),
        ]
    }

    #[test]
    fn map_lookup_finds_present_keys() {
        let lookup = MapLookup::build(&lines());
        assert_eq!(lookup.find(1), Some(&OrderLine::new(1, 10)));
        assert_eq!(lookup.find(2), Some(&OrderLine::new(2, 20)));
    }

    #[test]
    fn map_lookup_missing_key_is_none() {
        let lookup = MapLookup::build(&lines());
        assert_eq!(lookup.find(42), None);
        assert_eq!(lookup.find(-1), None);
    }

    #[test]
    fn duplicate_ids_keep_first_line() {
        let built = MapLookup::build(&lines());
        let collected: MapLookup = lines().into_iter().collect();
        assert_eq!(built.find(3), Some(&OrderLine::new(3, 30)));
        assert_eq!(built, collected);
        assert_eq!(built.len(), 3);
    }

    #[test]
    fn scan_lookup_matches_map_lookup() {
        let data = lines();
        let map = MapLookup::build(&data);
        let scan = ScanLookup::new(&data);
        for id in -1..5 {
            assert_eq!(map.find(id), scan.find(id), "order id {id}");
        }
        assert_eq!(map.len(), scan.len());
    }

    #[test]
    fn empty_lookups() {
        let map = MapLookup::build(&[]);
        let scan = ScanLookup::new(&[]);
        assert!(map.is_empty());
        assert!(scan.is_empty());
        assert_eq!(map.find(0), None);
        assert_eq!(scan.find(0), None);
    }
}
