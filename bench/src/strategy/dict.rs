//! Hash map strategies.
//!
//! All lookups go through `get`/`find`, so a missing order id costs the same
//! as a hit and yields `line: None`.

use super::join_with;
use oj_core::dataset::Dataset;
use oj_core::lookup::MapLookup;
use oj_core::types::{OrderAggregate, OrderLine};
use std::collections::HashMap;

/// Build a map from the lines on every call, then look up each order.
pub fn dict_created(ds: &Dataset) -> Vec<OrderAggregate> {
    let lookup: MapLookup = ds.lines.iter().copied().collect();
    join_with(&ds.orders, &lookup)
}

/// Reuse the index built once at dataset setup.
pub fn dict_precomputed(ds: &Dataset) -> Vec<OrderAggregate> {
    join_with(&ds.orders, &ds.line_index)
}

/// Same work as [`dict_created`], written as explicit loops over pre-sized
/// containers.
pub fn manual_dict(ds: &Dataset) -> Vec<OrderAggregate> {
    let mut by_order: HashMap<i32, OrderLine> = HashMap::with_capacity(ds.lines.len());
    for line in &ds.lines {
        by_order.entry(line.order_id).or_insert(*line);
    }

    let mut out = Vec::with_capacity(ds.orders.len());
    for order in &ds.orders {
        out.push(OrderAggregate::new(order, by_order.get(&order.id).copied()));
    }
    out
}
