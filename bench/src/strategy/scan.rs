//! Nested-scan strategies: every order searches the full line list.

use super::join_with;
use oj_core::dataset::Dataset;
use oj_core::lookup::ScanLookup;
use oj_core::types::OrderAggregate;

/// Baseline. Indexed loop over orders, linear scan of lines for each one.
#[allow(clippy::needless_range_loop)]
pub fn nested_scan(ds: &Dataset) -> Vec<OrderAggregate> {
    let mut out = Vec::new();
    for i in 0..ds.orders.len() {
        let order = &ds.orders[i];
        let mut line = None;
        for candidate in &ds.lines {
            if candidate.order_id == order.id {
                line = Some(*candidate);
                break;
            }
        }
        out.push(OrderAggregate::new(order, line));
    }
    out
}

pub fn for_each_scan(ds: &Dataset) -> Vec<OrderAggregate> {
    let mut out = Vec::new();
    for order in &ds.orders {
        let line = ds.lines.iter().find(|l| l.order_id == order.id).copied();
        out.push(OrderAggregate::new(order, line));
    }
    out
}

pub fn select_scan(ds: &Dataset) -> Vec<OrderAggregate> {
    ds.orders
        .iter()
        .map(|order| {
            let line = ds.lines.iter().find(|l| l.order_id == order.id).copied();
            OrderAggregate::new(order, line)
        })
        .collect()
}

pub fn scan_lookup(ds: &Dataset) -> Vec<OrderAggregate> {
    join_with(&ds.orders, &ScanLookup::new(&ds.lines))
}
