//! Report module: per strategy × size statistics and the table/JSON/markdown
//! renderings of them.

use crate::alloc::AllocDelta;
use crate::strategy::BASELINE;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Samples collected for one strategy at one dataset size.
#[derive(Debug, Clone)]
pub struct StrategyResult {
    pub strategy: String,
    pub size: usize,
    pub durations: Vec<Duration>,
    pub allocs: Vec<AllocDelta>,
}

impl StrategyResult {
    pub fn new(strategy: &str, size: usize) -> Self {
        Self {
            strategy: strategy.to_string(),
            size,
            durations: Vec::new(),
            allocs: Vec::new(),
        }
    }

    pub fn add_sample(&mut self, elapsed: Duration, alloc: AllocDelta) {
        self.durations.push(elapsed);
        self.allocs.push(alloc);
    }

    pub fn sample_count(&self) -> usize {
        self.durations.len()
    }

    fn samples_us(&self) -> impl Iterator<Item = f64> + '_ {
        self.durations.iter().map(|d| d.as_secs_f64() * 1e6)
    }

    pub fn mean_us(&self) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        self.samples_us().sum::<f64>() / self.durations.len() as f64
    }

    pub fn min_us(&self) -> f64 {
        self.samples_us().reduce(f64::min).unwrap_or(0.0)
    }

    /// Population standard deviation of the samples.
    pub fn std_dev_us(&self) -> f64 {
        if self.durations.len() < 2 {
            return 0.0;
        }
        let mean = self.mean_us();
        let var = self
            .samples_us()
            .map(|s| (s - mean) * (s - mean))
            .sum::<f64>()
            / self.durations.len() as f64;
        var.sqrt()
    }

    pub fn percentile_us(&self, pct: f64) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples_us().collect();
        sorted.sort_by(f64::total_cmp);
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Mean bytes allocated per invocation.
    pub fn mean_alloc_bytes(&self) -> u64 {
        if self.allocs.is_empty() {
            return 0;
        }
        self.allocs.iter().map(|a| a.bytes).sum::<u64>() / self.allocs.len() as u64
    }

    pub fn mean_alloc_count(&self) -> u64 {
        if self.allocs.is_empty() {
            return 0;
        }
        self.allocs.iter().map(|a| a.count).sum::<u64>() / self.allocs.len() as u64
    }

    pub fn peak_bytes(&self) -> u64 {
        self.allocs.iter().map(|a| a.peak_bytes).max().unwrap_or(0)
    }

    /// Items processed per second at the mean duration. For join strategies
    /// an item is an order.
    pub fn throughput(&self) -> f64 {
        let mean = self.mean_us();
        if mean <= 0.0 {
            return 0.0;
        }
        self.size as f64 / (mean / 1e6)
    }
}

/// Flattened, serializable form of a [`StrategyResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub strategy: String,
    pub size: usize,
    pub samples: usize,
    pub mean_us: f64,
    pub p50_us: f64,
    pub p95_us: f64,
    pub min_us: f64,
    pub std_dev_us: f64,
    pub alloc_bytes: u64,
    pub alloc_count: u64,
    pub peak_bytes: u64,
    pub throughput_per_sec: f64,
    /// Baseline mean divided by this mean, when a baseline row exists for
    /// the same size. Above 1.0 means faster than the baseline.
    pub speedup_vs_baseline: Option<f64>,
}

pub fn build_rows(results: &[StrategyResult]) -> Vec<ReportRow> {
    results
        .iter()
        .map(|r| {
            let mean = r.mean_us();
            let speedup_vs_baseline = results
                .iter()
                .find(|b| b.strategy == BASELINE && b.size == r.size)
                .map(|b| b.mean_us())
                .filter(|_| mean > 0.0)
                .map(|base| base / mean);
            ReportRow {
                strategy: r.strategy.clone(),
                size: r.size,
                samples: r.sample_count(),
                mean_us: mean,
                p50_us: r.percentile_us(50.0),
                p95_us: r.percentile_us(95.0),
                min_us: r.min_us(),
                std_dev_us: r.std_dev_us(),
                alloc_bytes: r.mean_alloc_bytes(),
                alloc_count: r.mean_alloc_count(),
                peak_bytes: r.peak_bytes(),
                throughput_per_sec: r.throughput(),
                speedup_vs_baseline,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

pub fn write_report<W: Write>(w: &mut W, rows: &[ReportRow], format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Table => write_table(w, rows)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, rows)?;
            writeln!(w)?;
        }
        ReportFormat::Markdown => write_markdown(w, rows)?,
    }
    Ok(())
}

fn speedup_cell(row: &ReportRow) -> String {
    match row.speedup_vs_baseline {
        Some(s) => format!("{s:.2}x"),
        None => "-".to_string(),
    }
}

fn write_table<W: Write>(w: &mut W, rows: &[ReportRow]) -> Result<()> {
    writeln!(w, "\n{}", "=".repeat(100))?;
    writeln!(w, "  Order join benchmark report (baseline: {BASELINE})")?;
    writeln!(w, "{}", "=".repeat(100))?;
    writeln!(
        w,
        "  {:20} {:>9} {:>12} {:>12} {:>10} {:>14} {:>12} {:>9}",
        "Strategy", "Size", "Mean (µs)", "p95 (µs)", "± (µs)", "Alloc (B)", "Peak (B)", "Speedup"
    )?;
    writeln!(w, "  {}", "-".repeat(96))?;

    let mut last_size = None;
    for row in rows {
        if last_size.is_some_and(|s| s != row.size) {
            writeln!(w)?;
        }
        last_size = Some(row.size);
        writeln!(
            w,
            "  {:20} {:>9} {:>12.1} {:>12.1} {:>10.1} {:>14} {:>12} {:>9}",
            row.strategy,
            row.size,
            row.mean_us,
            row.p95_us,
            row.std_dev_us,
            row.alloc_bytes,
            row.peak_bytes,
            speedup_cell(row),
        )?;
    }
    writeln!(w, "{}", "=".repeat(100))?;
    Ok(())
}

fn write_markdown<W: Write>(w: &mut W, rows: &[ReportRow]) -> Result<()> {
    writeln!(
        w,
        "| Strategy | Size | Mean (µs) | p95 (µs) | Alloc (B) | Peak (B) | Speedup |"
    )?;
    writeln!(w, "|---|---:|---:|---:|---:|---:|---:|")?;
    for row in rows {
        writeln!(
            w,
            "| {} | {} | {:.1} | {:.1} | {} | {} | {} |",
            row.strategy,
            row.size,
            row.mean_us,
            row.p95_us,
            row.alloc_bytes,
            row.peak_bytes,
            speedup_cell(row),
        )?;
    }
    Ok(())
}
