//! Integration tests: strategy equivalence, absence handling, search parity
//! and the runner end to end.

use oj_core::dataset::{generate_dataset, Dataset};
use oj_core::search::{index_of_builtin, index_of_manual};
use oj_core::types::{Order, OrderAggregate, OrderLine};
use orderjoin_bench::alloc::{self, TrackingAllocator};
use orderjoin_bench::report::{build_rows, write_report, ReportFormat};
use orderjoin_bench::runner::{run_strategy, run_sweep, RunConfig};
use orderjoin_bench::strategy::{StrategyEntry, StrategyRegistry, BASELINE};
use orderjoin_bench::verify::check_consistency;
use std::sync::Arc;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator;

fn sorted(mut out: Vec<OrderAggregate>) -> Vec<OrderAggregate> {
    out.sort();
    out
}

fn every_strategy() -> Vec<StrategyEntry> {
    StrategyRegistry::with_defaults().all().to_vec()
}

fn quick() -> RunConfig {
    RunConfig {
        warmup: 1,
        samples: 5,
        ..RunConfig::default()
    }
}

// ── Cardinality and field copying ───────────────────────────────────

#[test]
fn every_strategy_yields_one_aggregate_per_order() {
    for n in [0, 1, 2, 17, 256] {
        let ds = generate_dataset(n).unwrap();
        for entry in every_strategy() {
            let out = (entry.run)(&ds);
            assert_eq!(out.len(), n as usize, "{} at {n}", entry.name);

            for agg in &out {
                let order = &ds.orders[agg.order_id as usize];
                assert_eq!(agg.label, order.label, "{}", entry.name);
                assert_eq!(
                    agg.line,
                    Some(OrderLine::new(order.id, order.id as i64)),
                    "{}",
                    entry.name
                );
            }
        }
    }
}

#[test]
fn all_strategies_agree_as_multisets() {
    let ds = generate_dataset(300).unwrap();
    let expected = sorted(orderjoin_bench::strategy::scan::nested_scan(&ds));
    for entry in every_strategy() {
        assert_eq!(sorted((entry.run)(&ds)), expected, "{}", entry.name);
    }
}

#[test]
fn shuffled_input_gives_same_multiset() {
    let ds = generate_dataset(128).unwrap();
    let shuffled = ds.shuffled(0xC0FFEE);
    for entry in every_strategy() {
        assert_eq!(
            sorted((entry.run)(&shuffled)),
            sorted((entry.run)(&ds)),
            "{}",
            entry.name
        );
    }
}

// ── Absence handling ────────────────────────────────────────────────

#[test]
fn missing_line_yields_none_for_every_strategy() {
    let ds = generate_dataset(20).unwrap().without_line(13);
    for entry in every_strategy() {
        let out = (entry.run)(&ds);
        assert_eq!(out.len(), 20, "{}", entry.name);
        let missing = out.iter().find(|a| a.order_id == 13).unwrap();
        assert_eq!(missing.line, None, "{}", entry.name);
        assert_eq!(
            out.iter().filter(|a| a.line.is_some()).count(),
            19,
            "{}",
            entry.name
        );
    }
}

#[test]
fn orders_without_any_lines() {
    let ds = Dataset::from_parts(vec![Order::numbered(4), Order::new(9, "nine")], Vec::new());
    for entry in every_strategy() {
        let out = sorted((entry.run)(&ds));
        assert_eq!(
            out,
            vec![
                OrderAggregate::new(&Order::numbered(4), None),
                OrderAggregate::new(&Order::new(9, "nine"), None),
            ],
            "{}",
            entry.name
        );
    }
}

#[test]
fn consistency_check_passes_with_absent_lines() {
    let registry = StrategyRegistry::with_defaults();
    let all: Vec<&StrategyEntry> = registry.all().iter().collect();
    let ds = generate_dataset(50).unwrap().without_line(0).without_line(49);
    check_consistency(&registry, &all, &ds).unwrap();
}

// ── Search ──────────────────────────────────────────────────────────

#[test]
fn search_variants_match_reference_cases() {
    for f in [index_of_builtin, index_of_manual] {
        assert_eq!(f(&[1, 2, 3], 4), -1);
        assert_eq!(f(&[1, 2, 3], 2), 1);
        assert_eq!(f(&[], 5), -1);
    }
}

#[test]
fn search_variants_agree_on_every_target() {
    let values: Vec<i32> = (0..40).map(|i| (i * 7) % 13).collect();
    for target in -2..15 {
        assert_eq!(
            index_of_builtin(&values, target),
            index_of_manual(&values, target),
            "target {target}"
        );
    }
}

// ── Idempotence ─────────────────────────────────────────────────────

#[test]
fn independent_generations_give_equal_results() {
    for entry in every_strategy() {
        let a = (entry.run)(&generate_dataset(64).unwrap());
        let b = (entry.run)(&generate_dataset(64).unwrap());
        assert_eq!(a, b, "{}", entry.name);
    }
}

// ── Runner ──────────────────────────────────────────────────────────

#[test]
fn sweep_reports_rows_and_memory() {
    let registry = StrategyRegistry::with_defaults();
    let selection = registry.enabled();
    let outcome = run_sweep(&registry, &selection, &[100, 200], &quick()).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.results.len(), selection.len() * 2);

    // The allocator is installed in this test binary, and every strategy
    // allocates its output vector.
    assert!(alloc::is_tracking());
    for r in &outcome.results {
        assert!(r.mean_alloc_bytes() > 0, "{}/{}", r.strategy, r.size);
    }

    let rows = build_rows(&outcome.results);
    let baseline = rows
        .iter()
        .find(|r| r.strategy == BASELINE && r.size == 200)
        .unwrap();
    assert_eq!(baseline.speedup_vs_baseline, Some(1.0));

    let mut json = Vec::new();
    write_report(&mut json, &rows, ReportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), rows.len());
}

#[test]
fn precomputed_map_does_not_allocate_an_index() {
    let registry = StrategyRegistry::with_defaults();
    let ds = Arc::new(generate_dataset(2_000).unwrap());
    let created = run_strategy(registry.get("dict_created").unwrap(), &ds, &quick()).unwrap();
    let reused = run_strategy(registry.get("dict_precomputed").unwrap(), &ds, &quick()).unwrap();
    assert!(
        reused.mean_alloc_bytes() < created.mean_alloc_bytes(),
        "precomputed {} B vs created {} B",
        reused.mean_alloc_bytes(),
        created.mean_alloc_bytes()
    );
}

#[test]
fn doubling_size_does_not_shrink_map_speedup() {
    let registry = StrategyRegistry::with_defaults();
    let nested = registry.get(BASELINE).unwrap();
    let dict = registry.get("dict_precomputed").unwrap();
    let cfg = RunConfig {
        warmup: 2,
        samples: 9,
        ..RunConfig::default()
    };

    let speedup = |size: i64| {
        let ds = Arc::new(generate_dataset(size).unwrap());
        let n = run_strategy(nested, &ds, &cfg).unwrap().min_us();
        let d = run_strategy(dict, &ds, &cfg).unwrap().min_us().max(1e-3);
        n / d
    };

    let small = speedup(1_000);
    let large = speedup(2_000);
    // Nested scan is quadratic, so the ratio should roughly double. Only
    // guard against it collapsing.
    assert!(
        large >= small * 0.75,
        "speedup at 2000 ({large:.1}) fell below speedup at 1000 ({small:.1})"
    );
}
