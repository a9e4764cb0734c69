//! Command-line and environment configuration.
//!
//! Every option can also come from an `ORDERJOIN_*` environment variable; a
//! `.env` file in the working directory is loaded before parsing.

use crate::report::ReportFormat;
use crate::runner::{RunConfig, DEFAULT_SAMPLES, DEFAULT_WARMUP};
use crate::strategy::{StrategyEntry, StrategyRegistry};
use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

/// Order/line join micro-benchmark
#[derive(Debug, Parser)]
#[command(name = "orderjoin-bench")]
#[command(about = "Compare join strategies over synthetic order/line datasets")]
#[command(version)]
pub struct Cli {
    /// Dataset sizes to sweep, comma separated
    #[arg(
        long,
        env = "ORDERJOIN_SIZES",
        value_delimiter = ',',
        default_value = "10000",
        allow_negative_numbers = true
    )]
    pub sizes: Vec<i64>,

    /// Strategies to run, comma separated (default: the enabled set)
    #[arg(long, env = "ORDERJOIN_STRATEGIES", value_delimiter = ',')]
    pub strategies: Vec<String>,

    /// Run every registered strategy, including the ones disabled by default.
    /// Takes precedence over --strategies.
    #[arg(long)]
    pub all: bool,

    /// Untimed invocations per strategy and size
    #[arg(long, env = "ORDERJOIN_WARMUP", default_value_t = DEFAULT_WARMUP)]
    pub warmup: u32,

    /// Timed invocations per strategy and size
    #[arg(long, env = "ORDERJOIN_SAMPLES", default_value_t = DEFAULT_SAMPLES)]
    pub samples: u32,

    /// Abort a size when one invocation takes longer than this
    #[arg(
        long,
        env = "ORDERJOIN_MAX_INVOCATION_SECS",
        default_value_t = 30.0,
        allow_negative_numbers = true
    )]
    pub max_invocation_secs: f64,

    /// Report format
    #[arg(long, value_enum, env = "ORDERJOIN_FORMAT", default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Also run the index-of search benchmark
    #[arg(long)]
    pub search: bool,

    /// Skip the cross-strategy consistency check
    #[arg(long)]
    pub skip_verify: bool,

    /// Remove this order's line from every dataset before running
    #[arg(long, value_name = "ORDER_ID")]
    pub drop_line: Option<i32>,

    /// List registered strategies and exit
    #[arg(long)]
    pub list: bool,

    /// Log level written to stderr
    #[arg(long, env = "ORDERJOIN_LOG", default_value = "info")]
    pub log_level: LevelFilter,

    /// Also append log output to this file
    #[arg(long, env = "ORDERJOIN_LOG_FILE")]
    pub log_file: Option<String>,
}

impl Cli {
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let max_invocation = Duration::try_from_secs_f64(self.max_invocation_secs).map_err(|e| {
            anyhow::anyhow!(
                "invalid --max-invocation-secs {}: {e}",
                self.max_invocation_secs
            )
        })?;
        let cfg = RunConfig {
            warmup: self.warmup,
            samples: self.samples,
            max_invocation,
            skip_verify: self.skip_verify,
            drop_line: self.drop_line,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Strategies to run: everything with `--all`, otherwise the named ones,
    /// otherwise the enabled set.
    pub fn select<'a>(
        &self,
        registry: &'a StrategyRegistry,
    ) -> anyhow::Result<Vec<&'a StrategyEntry>> {
        if self.all {
            return Ok(registry.all().iter().collect());
        }
        registry.select(&self.strategies)
    }
}
