//! Order/Line Join Micro-Benchmark
//!
//! Compares equivalent ways of joining orders to their lines by order id:
//! - **Nested scan**: every order scans the full line list (baseline)
//! - **Query join**: left outer merge join over id-sorted views
//! - **Dictionary**: hash map lookups, built per call or reused from setup
//!
//! Each strategy must produce the same aggregates; the runner verifies that
//! before timing anything. A small index-of search benchmark rides along.
//!
//! Run benchmarks: `cargo bench`
//! Run the reporting binary: `cargo run --release -- --sizes 1000,10000`
//! Run tests: `cargo test`

pub mod alloc;
pub mod config;
pub mod report;
pub mod runner;
pub mod strategy;
pub mod verify;
