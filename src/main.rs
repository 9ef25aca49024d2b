//! Render solver statistics into a chart page.
//!
//! Usage:
//!   solverchart [INSTANCES] [SOLVER_STATS] [OUT]
//!
//! INSTANCES and SOLVER_STATS are file paths or http(s) URLs. Defaults and
//! the remaining knobs come from the environment (see `RenderConfig`):
//! INSTANCES_SRC, SOLVER_STATS_SRC, CHART_OUT, CHART_TYPE, CHART_METRIC,
//! CHART_TITLE, CANVAS_ID, CHART_BACKEND, FETCH_TIMEOUT_SECS,
//! STRICT_ALIGNMENT, UNIFORM_COLOR, USE_SYSTEM_PROXY.
//!
//! With CHART_BACKEND=json and an OUT ending in `.json`, the bare Chart.js
//! config is written instead of an HTML page, and a failed run leaves OUT
//! untouched. Otherwise a failed run still writes the page with its error
//! banner. Either way the exit status reflects the run's error.

use anyhow::{Context, Result};
use solverchart::{write_output, PageController, RenderConfig, Source};
use std::path::Path;

const USAGE: &str = "usage: solverchart [INSTANCES] [SOLVER_STATS] [OUT]";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }
    let cfg = RenderConfig::from_env().with_args(args);

    let mut controller = PageController::from_config(&cfg).context("setting up renderer")?;
    let result = controller
        .run(
            &Source::parse(&cfg.instances_src),
            &Source::parse(&cfg.solver_stats_src),
        )
        .await;
    let page = controller.into_page();

    let out = Path::new(&cfg.out_path);
    let handle = write_output(&page, &cfg, out, result)
        .with_context(|| format!("chart not rendered into {}", out.display()))?;
    println!(
        "rendered {} datasets over {} instances into #{} ({}) -> {}",
        handle.datasets,
        handle.labels,
        handle.canvas_id,
        handle.backend,
        out.display()
    );
    Ok(())
}
