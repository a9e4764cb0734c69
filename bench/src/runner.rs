//! Measurement runner: generates one dataset per size, checks the selected
//! strategies agree, then times each of them.
//!
//! Invocations run one at a time. Each one runs on its own worker thread
//! while the caller waits at most `max_invocation` for the result; a worker
//! that overruns is abandoned and its size is aborted. The dataset is shared
//! read-only with the workers and dropped before the next size is generated.

use crate::alloc::{AllocDelta, AllocSnapshot};
use crate::report::StrategyResult;
use crate::strategy::{StrategyEntry, StrategyRegistry};
use crate::verify::check_consistency;
use anyhow::{anyhow, bail, Context, Result};
use oj_core::dataset::{generate_dataset, Dataset};
use oj_core::search::{search_cases, SEARCH_VARIANTS};
use std::hint::black_box;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WARMUP: u32 = 3;
pub const DEFAULT_SAMPLES: u32 = 20;
pub const DEFAULT_MAX_INVOCATION: Duration = Duration::from_secs(30);

/// Repetition and safety settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Untimed invocations before sampling starts.
    pub warmup: u32,
    pub samples: u32,
    /// Any single invocation slower than this aborts the size it belongs to.
    pub max_invocation: Duration,
    /// Skip the cross-strategy consistency check.
    pub skip_verify: bool,
    /// Remove this order's line from every generated dataset.
    pub drop_line: Option<i32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup: DEFAULT_WARMUP,
            samples: DEFAULT_SAMPLES,
            max_invocation: DEFAULT_MAX_INVOCATION,
            skip_verify: false,
            drop_line: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            bail!("samples must be > 0");
        }
        if self.max_invocation.is_zero() {
            bail!("max invocation time must be > 0");
        }
        Ok(())
    }
}

/// Results of a sweep. A failing size does not stop the others.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub results: Vec<StrategyResult>,
    pub failures: Vec<(i64, anyhow::Error)>,
}

impl SweepOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run `f` on a worker thread and wait at most `max` for its result.
///
/// On timeout the worker is detached and keeps running until `f` returns or
/// the process exits; the caller gets an error right away.
pub fn run_with_limit<T, F>(what: &str, max: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let handle = thread::Builder::new()
        .name("orderjoin-invocation".to_string())
        .spawn(move || {
            // The receiver is gone only after a timeout.
            let _ = tx.send(f());
        })
        .with_context(|| format!("failed to spawn worker for {what}"))?;

    match rx.recv_timeout(max) {
        Ok(out) => {
            let _ = handle.join();
            Ok(out)
        }
        Err(RecvTimeoutError::Timeout) => Err(anyhow!(
            "{what} did not finish within the {:.3}s limit; lower the size or raise the limit",
            max.as_secs_f64()
        )),
        Err(RecvTimeoutError::Disconnected) => match handle.join() {
            Err(_) => bail!("{what} panicked"),
            Ok(()) => bail!("{what} exited without a result"),
        },
    }
}

/// One timed invocation under the limit: elapsed time and allocation delta,
/// both measured on the worker thread.
fn timed<T, F>(max: Duration, what: &str, f: F) -> Result<(Duration, AllocDelta)>
where
    T: 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (elapsed, delta) = run_with_limit(what, max, move || {
        let start_alloc = AllocSnapshot::start();
        let start = Instant::now();
        let out = f();
        let elapsed = start.elapsed();
        // Taken before the output is dropped, so its own buffers count.
        let delta = AllocSnapshot::take().delta_since(&start_alloc);
        drop(black_box(out));
        (elapsed, delta)
    })?;

    if elapsed > max {
        bail!(
            "{what} took {:.3}s, over the {:.3}s limit; lower the size or raise the limit",
            elapsed.as_secs_f64(),
            max.as_secs_f64()
        );
    }
    Ok((elapsed, delta))
}

/// Time `samples` invocations of one strategy against a prepared dataset.
pub fn run_strategy(
    entry: &StrategyEntry,
    dataset: &Arc<Dataset>,
    cfg: &RunConfig,
) -> Result<StrategyResult> {
    let what = format!("strategy '{}' at size {}", entry.name, dataset.len());
    let run = entry.run;

    let invoke = || {
        let ds = Arc::clone(dataset);
        move || run(black_box(ds.as_ref()))
    };

    for _ in 0..cfg.warmup {
        timed(cfg.max_invocation, &what, invoke())?;
    }

    let mut result = StrategyResult::new(entry.name, dataset.len());
    for _ in 0..cfg.samples {
        let (elapsed, delta) = timed(cfg.max_invocation, &what, invoke())?;
        result.add_sample(elapsed, delta);
    }
    Ok(result)
}

/// Prepare the dataset for `size`, honoring `drop_line`.
pub fn prepare_dataset(size: i64, cfg: &RunConfig) -> Result<Dataset> {
    let dataset = generate_dataset(size)?;
    Ok(match cfg.drop_line {
        Some(id) => dataset.without_line(id),
        None => dataset,
    })
}

/// Consistency check under the limit, scaled by the number of strategies it
/// has to run.
fn verify_with_limit(
    registry: &StrategyRegistry,
    selection: &[&StrategyEntry],
    dataset: &Arc<Dataset>,
    cfg: &RunConfig,
) -> Result<()> {
    let runs = u32::try_from(selection.len() + 1).unwrap_or(u32::MAX);
    let max = cfg.max_invocation.saturating_mul(runs);
    let registry = registry.clone();
    let selection: Vec<StrategyEntry> = selection.iter().map(|e| **e).collect();
    let ds = Arc::clone(dataset);
    let what = format!("consistency check at size {}", dataset.len());

    run_with_limit(&what, max, move || {
        let refs: Vec<&StrategyEntry> = selection.iter().collect();
        check_consistency(&registry, &refs, &ds)
    })?
}

fn run_size(
    registry: &StrategyRegistry,
    selection: &[&StrategyEntry],
    size: i64,
    cfg: &RunConfig,
) -> Result<Vec<StrategyResult>> {
    let dataset = Arc::new(prepare_dataset(size, cfg)?);

    if !cfg.skip_verify {
        verify_with_limit(registry, selection, &dataset, cfg)
            .with_context(|| format!("consistency check failed at size {size}"))?;
    }

    let mut results = Vec::with_capacity(selection.len());
    for entry in selection {
        log::info!("Benchmarking {}/{}...", entry.name, size);
        let r = run_strategy(entry, &dataset, cfg)?;
        log::info!(
            "  {}/{} done ({:.1}µs mean, {} B allocated)",
            entry.name,
            size,
            r.mean_us(),
            r.mean_alloc_bytes()
        );
        results.push(r);
    }
    Ok(results)
}

/// Run every selected strategy at every size, in the order given.
pub fn run_sweep(
    registry: &StrategyRegistry,
    selection: &[&StrategyEntry],
    sizes: &[i64],
    cfg: &RunConfig,
) -> Result<SweepOutcome> {
    cfg.validate()?;
    if sizes.is_empty() {
        bail!("no dataset sizes configured");
    }
    if selection.is_empty() {
        bail!("no strategies selected");
    }

    let mut outcome = SweepOutcome::default();
    for &size in sizes {
        match run_size(registry, selection, size, cfg) {
            Ok(results) => outcome.results.extend(results),
            Err(e) => {
                log::error!("Size {size} aborted: {e:#}");
                outcome.failures.push((size, e));
            }
        }
    }
    Ok(outcome)
}

/// Time both search variants over the bundled search cases. Rows are named
/// `search/<variant>/<case>` and use the slice length as size.
pub fn run_search_suite(cfg: &RunConfig) -> Result<Vec<StrategyResult>> {
    cfg.validate()?;
    let mut results = Vec::new();

    for case in search_cases() {
        let case = Arc::new(case);
        for variant in SEARCH_VARIANTS {
            let name = format!("search/{}/{}", variant.name, case.label);
            log::info!("Benchmarking {name}...");

            let run = variant.run;
            let invoke = || {
                let case = Arc::clone(&case);
                move || run(black_box(case.values.as_slice()), black_box(case.target))
            };

            for _ in 0..cfg.warmup {
                timed(cfg.max_invocation, &name, invoke())?;
            }

            let mut result = StrategyResult::new(&name, case.values.len());
            for _ in 0..cfg.samples {
                let (elapsed, delta) = timed(cfg.max_invocation, &name, invoke())?;
                result.add_sample(elapsed, delta);
            }
            results.push(result);
        }
    }
    Ok(results)
}
