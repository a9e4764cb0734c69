use serde::{Deserialize, Serialize};

/// A line belonging to an order; `order_id` refers to `Order::id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: i32,
    pub total: i64,
}

impl OrderLine {
    pub fn new(order_id: i32, total: i64) -> Self {
        Self { order_id, total }
    }
}
