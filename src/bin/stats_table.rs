//! Print solver statistics as a fixed-width table with per-solver averages.
//!
//! Usage:
//!   stats_table [INSTANCES] [SOLVER_STATS]
//!
//! Sources default to INSTANCES_SRC / SOLVER_STATS_SRC; the column shown is
//! CHART_METRIC (default `data`). Set SUMMARY_JSON=1 to print the per-solver
//! summary as JSON instead.

use anyhow::{Context, Result};
use solverchart::summary::{render_table, summarize};
use solverchart::{load_instances, load_solver_stats, DocumentFetcher, RenderConfig, Source};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = RenderConfig::from_env().with_args(std::env::args().skip(1));
    let fetcher = DocumentFetcher::from_config(&cfg)?;
    let instances_src = Source::parse(&cfg.instances_src);
    let solvers_src = Source::parse(&cfg.solver_stats_src);

    let (instances, stats) = tokio::try_join!(
        load_instances(&fetcher, &instances_src),
        load_solver_stats(&fetcher, &solvers_src),
    )
    .context("loading statistics")?;

    let as_json = std::env::var("SUMMARY_JSON")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if as_json {
        let summary = summarize(&stats, &cfg.metric);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_table(&instances, &stats, &cfg.metric));
    }
    Ok(())
}
