//! Drives one render: load both documents, build the chart, draw it.

use serde_json::json;
use std::path::Path;

use crate::chart::ChartBuilder;
use crate::config::RenderConfig;
use crate::error::ChartError;
use crate::instances::{load_instances, InstanceList};
use crate::logging::{log, log_failure, log_render, obj, v_str, Domain, Level};
use crate::render::{Backend, ChartPage, Renderer};
use crate::solvers::{load_solver_stats, SolverStats};
use crate::source::{DocumentFetcher, Source};

/// What was drawn, returned to the caller instead of kept in page globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub canvas_id: String,
    pub backend: &'static str,
    pub labels: usize,
    pub datasets: usize,
}

pub struct PageController {
    page: ChartPage,
    canvas_id: String,
    builder: ChartBuilder,
    renderer: Box<dyn Renderer + Send + Sync>,
    fetcher: DocumentFetcher,
}

impl PageController {
    pub fn new(
        page: ChartPage,
        canvas_id: &str,
        builder: ChartBuilder,
        renderer: Box<dyn Renderer + Send + Sync>,
        fetcher: DocumentFetcher,
    ) -> Self {
        Self {
            page,
            canvas_id: canvas_id.to_string(),
            builder,
            renderer,
            fetcher,
        }
    }

    pub fn from_config(cfg: &RenderConfig) -> Result<Self, ChartError> {
        Ok(Self::new(
            ChartPage::new(&cfg.title).with_canvas(&cfg.canvas_id),
            &cfg.canvas_id,
            ChartBuilder::from_config(cfg),
            cfg.backend.build(),
            DocumentFetcher::from_config(cfg)?,
        ))
    }

    /// Both documents, fetched concurrently. The first failure wins.
    pub async fn load(
        &self,
        instances: &Source,
        solvers: &Source,
    ) -> Result<(InstanceList, SolverStats), ChartError> {
        let (instances, stats) = tokio::try_join!(
            load_instances(&self.fetcher, instances),
            load_solver_stats(&self.fetcher, solvers),
        )?;
        log(
            Level::Info,
            Domain::Load,
            "loaded",
            obj(&[
                ("instances", json!(instances.len())),
                ("solvers", json!(stats.len())),
            ]),
        );
        Ok((instances, stats))
    }

    pub fn draw(
        &mut self,
        instances: &InstanceList,
        stats: &SolverStats,
    ) -> Result<ChartHandle, ChartError> {
        let config = self.builder.build(instances, stats)?;
        let canvas = self.page.canvas_mut(&self.canvas_id)?;
        self.renderer.render(canvas, &config)?;

        let handle = ChartHandle {
            canvas_id: self.canvas_id.clone(),
            backend: self.renderer.name(),
            labels: config.labels.len(),
            datasets: config.datasets.len(),
        };
        log_render(handle.backend, &handle.canvas_id, handle.labels, handle.datasets);
        Ok(handle)
    }

    /// Load, build and draw. On failure the page shows the error and the
    /// canvas keeps whatever it had before.
    pub async fn run(
        &mut self,
        instances: &Source,
        solvers: &Source,
    ) -> Result<ChartHandle, ChartError> {
        log(
            Level::Info,
            Domain::System,
            "start",
            obj(&[
                ("instances", v_str(&instances.to_string())),
                ("solvers", v_str(&solvers.to_string())),
            ]),
        );
        let result = match self.load(instances, solvers).await {
            Ok((i, s)) => self.draw(&i, &s),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_failure(failure_domain(e), e.kind(), &e.to_string());
            self.page.show_error(&e.to_string());
        }
        result
    }

    pub fn page(&self) -> &ChartPage {
        &self.page
    }

    pub fn into_page(self) -> ChartPage {
        self.page
    }
}

/// True when `out` should receive the bare Chart.js config rather than a page.
pub fn is_bare_json(cfg: &RenderConfig, out: &Path) -> bool {
    cfg.backend == Backend::Json && out.extension().map_or(false, |ext| ext == "json")
}

/// Write what a finished run produced to `out` and hand back its result.
///
/// A rendered run writes the page, or the bare config for a `.json` output
/// with the JSON backend. A failed run writes the page with its error banner,
/// except in bare-JSON mode where the output file is left alone. The run's
/// own error is returned ahead of any write failure, which is logged.
pub fn write_output(
    page: &ChartPage,
    cfg: &RenderConfig,
    out: &Path,
    result: Result<ChartHandle, ChartError>,
) -> Result<ChartHandle, ChartError> {
    let bare_json = is_bare_json(cfg, out);
    let written = match (&result, bare_json) {
        (Ok(_), true) => {
            let body = page
                .canvas(&cfg.canvas_id)
                .and_then(|c| c.drawing())
                .map(|d| d.body.as_str())
                .unwrap_or_default();
            std::fs::write(out, body)
                .map(|_| true)
                .map_err(|e| ChartError::Output {
                    path: out.display().to_string(),
                    reason: e.to_string(),
                })
        }
        (Err(_), true) => Ok(false),
        (_, false) => page.write_to(out).map(|_| true),
    };
    match written {
        Ok(true) => log(
            Level::Info,
            Domain::Render,
            "written",
            obj(&[
                ("path", v_str(&out.display().to_string())),
                ("ok", json!(result.is_ok())),
            ]),
        ),
        Ok(false) => log(
            Level::Warn,
            Domain::Render,
            "not_written",
            obj(&[("path", v_str(&out.display().to_string()))]),
        ),
        Err(e) if result.is_err() => log_failure(Domain::Render, e.kind(), &e.to_string()),
        Err(e) => return Err(e),
    }
    result
}

fn failure_domain(e: &ChartError) -> Domain {
    match e {
        ChartError::Load { .. } | ChartError::Schema { .. } => Domain::Load,
        ChartError::Alignment { .. } => Domain::Build,
        ChartError::ElementNotFound { .. } | ChartError::Output { .. } => Domain::Render,
    }
}
