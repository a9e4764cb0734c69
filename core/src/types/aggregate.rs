use serde::{Deserialize, Serialize};

use super::{Order, OrderLine};

/// Joined output record: an order plus its matching line, if one exists.
///
/// Built fresh by each strategy invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderAggregate {
    pub order_id: i32,
    pub label: String,
    pub line: Option<OrderLine>,
}

impl OrderAggregate {
    pub fn new(order: &Order, line: Option<OrderLine>) -> Self {
        Self {
            order_id: order.id,
            label: order.label.clone(),
            line,
        }
    }
}
