//! Declarative join strategies.
//!
//! Both are left outer joins: an order without a line still yields one
//! aggregate with `line: None`. When several lines share an order id, the
//! first one in input order is used, matching the scan and map strategies.

use oj_core::dataset::Dataset;
use oj_core::types::{Order, OrderAggregate, OrderLine};
use std::collections::HashMap;

/// Sort-merge join over id-sorted views of both collections.
pub fn query_join(ds: &Dataset) -> Vec<OrderAggregate> {
    let mut orders: Vec<&Order> = ds.orders.iter().collect();
    orders.sort_by_key(|o| o.id);
    // Stable sort keeps the first line per id in front.
    let mut lines: Vec<&OrderLine> = ds.lines.iter().collect();
    lines.sort_by_key(|l| l.order_id);

    let mut lines = lines.into_iter().peekable();
    orders
        .into_iter()
        .map(|order| {
            while lines.next_if(|l| l.order_id < order.id).is_some() {}
            let line = lines
                .peek()
                .filter(|l| l.order_id == order.id)
                .map(|l| **l);
            OrderAggregate::new(order, line)
        })
        .collect()
}

/// Group lines by order id, then probe the groups once per order.
pub fn hash_join(ds: &Dataset) -> Vec<OrderAggregate> {
    let groups: HashMap<i32, Vec<&OrderLine>> =
        ds.lines.iter().fold(HashMap::new(), |mut acc, line| {
            acc.entry(line.order_id).or_default().push(line);
            acc
        });

    ds.orders
        .iter()
        .map(|order| {
            let line = groups
                .get(&order.id)
                .and_then(|group| group.first())
                .map(|l| **l);
            OrderAggregate::new(order, line)
        })
        .collect()
}
