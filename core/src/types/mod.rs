//! Record types shared by the dataset generator and every join strategy.

mod aggregate;
mod order;
mod order_line;

pub use aggregate::OrderAggregate;
pub use order::Order;
pub use order_line::OrderLine;
