//! Cross-strategy consistency check.
//!
//! A strategy that disagrees with the nested-scan baseline is broken, so the
//! runner refuses to time it. Output order is not compared: both sides are
//! sorted before comparison, which makes this a multiset equality.

use crate::strategy::{StrategyEntry, StrategyRegistry, BASELINE};
use anyhow::{bail, Context, Result};
use oj_core::dataset::Dataset;
use oj_core::types::OrderAggregate;

fn normalized(mut out: Vec<OrderAggregate>) -> Vec<OrderAggregate> {
    out.sort_unstable();
    out
}

/// Compare one strategy's output against an already normalized baseline.
pub fn check_against(
    expected: &[OrderAggregate],
    entry: &StrategyEntry,
    dataset: &Dataset,
) -> Result<()> {
    let actual = normalized((entry.run)(dataset));

    if actual.len() != expected.len() {
        bail!(
            "strategy '{}' produced {} aggregates, baseline produced {} (orders: {})",
            entry.name,
            actual.len(),
            expected.len(),
            dataset.len()
        );
    }

    if let Some((exp, act)) = expected.iter().zip(&actual).find(|(e, a)| e != a) {
        bail!(
            "strategy '{}' diverges from baseline at order id {}: expected {:?}, got {:?}",
            entry.name,
            exp.order_id,
            exp,
            act
        );
    }

    Ok(())
}

/// Run the baseline and every selected strategy on `dataset` and require
/// equal outputs.
pub fn check_consistency(
    registry: &StrategyRegistry,
    selection: &[&StrategyEntry],
    dataset: &Dataset,
) -> Result<()> {
    let baseline = registry
        .get(BASELINE)
        .with_context(|| format!("baseline strategy '{BASELINE}' is not registered"))?;
    let expected = normalized((baseline.run)(dataset));

    for entry in selection.iter().filter(|e| e.name != BASELINE) {
        check_against(&expected, entry, dataset)?;
        log::debug!("Strategy '{}' matches baseline ({} orders)", entry.name, dataset.len());
    }
    Ok(())
}
