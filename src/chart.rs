//! Chart model and the builder that reshapes solver statistics into it.
//!
//! A [`ChartConfig`] is write-once: the builder assembles it from an
//! [`InstanceList`] and [`SolverStats`], and renderers only read it.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{ChartType, RenderConfig};
use crate::error::ChartError;
use crate::instances::InstanceList;
use crate::logging::log_schema_warning;
use crate::solvers::{SolverStats, DEFAULT_METRIC};

/// Colors assigned to datasets by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<&'static str>,
}

impl Palette {
    pub const RED: &'static str = "rgb(255, 99, 132)";
    pub const ORANGE: &'static str = "rgb(255, 159, 64)";
    pub const YELLOW: &'static str = "rgb(255, 205, 86)";
    pub const GREEN: &'static str = "rgb(75, 192, 192)";
    pub const BLUE: &'static str = "rgb(54, 162, 235)";
    pub const PURPLE: &'static str = "rgb(153, 102, 255)";
    pub const GREY: &'static str = "rgb(201, 203, 207)";
    pub const BEAU_BLUE: &'static str = "rgb(188, 212, 230)";

    /// Every dataset gets the same color.
    pub fn uniform() -> Self {
        Self {
            colors: vec![Self::BEAU_BLUE],
        }
    }

    /// Color of the dataset at `index`; cycles when there are more datasets
    /// than colors.
    pub fn color_for(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Self::RED,
                Self::ORANGE,
                Self::YELLOW,
                Self::GREEN,
                Self::BLUE,
                Self::PURPLE,
                Self::GREY,
            ],
        }
    }
}

/// One solver's series as the chart library expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub chart_type: ChartType,
    pub title: String,
    pub labels: InstanceList,
    pub datasets: Vec<ChartDataset>,
}

impl ChartConfig {
    /// Chart.js configuration object: `{type, data: {labels, datasets}, options}`.
    pub fn to_chartjs(&self) -> Value {
        json!({
            "type": self.chart_type,
            "data": {
                "labels": self.labels,
                "datasets": self.datasets,
            },
            "options": {
                "responsive": true,
                "plugins": {
                    "title": { "display": !self.title.is_empty(), "text": self.title },
                    "legend": { "position": "top" },
                },
                "scales": {
                    "y": { "beginAtZero": true },
                },
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChartBuilder {
    chart_type: ChartType,
    title: String,
    metric: String,
    palette: Palette,
    strict_alignment: bool,
}

impl ChartBuilder {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            title: String::new(),
            metric: DEFAULT_METRIC.to_string(),
            palette: Palette::default(),
            strict_alignment: false,
        }
    }

    pub fn from_config(cfg: &RenderConfig) -> Self {
        let palette = if cfg.uniform_color {
            Palette::uniform()
        } else {
            Palette::default()
        };
        Self::new(cfg.chart_type)
            .title(&cfg.title)
            .metric(&cfg.metric)
            .palette(palette)
            .strict_alignment(cfg.strict_alignment)
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn metric(mut self, metric: &str) -> Self {
        self.metric = metric.to_string();
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn strict_alignment(mut self, strict: bool) -> Self {
        self.strict_alignment = strict;
        self
    }

    /// One dataset per solver, in solver order.
    pub fn build(
        &self,
        instances: &InstanceList,
        stats: &SolverStats,
    ) -> Result<ChartConfig, ChartError> {
        let mut datasets = Vec::with_capacity(stats.len());
        for (index, (name, entry)) in stats.iter().enumerate() {
            let data = entry.series(&self.metric).ok_or_else(|| {
                ChartError::schema(
                    stats.resource(),
                    format!("solvers.{}.{}", name, self.metric),
                    "missing series",
                )
            })?;
            if data.len() != instances.len() {
                if self.strict_alignment {
                    return Err(ChartError::Alignment {
                        solver: name.clone(),
                        expected: instances.len(),
                        actual: data.len(),
                    });
                }
                log_schema_warning(
                    name,
                    "series length differs from instance count",
                    instances.len(),
                    data.len(),
                );
            }
            let color = self.palette.color_for(index);
            datasets.push(ChartDataset {
                label: name.clone(),
                background_color: color.to_string(),
                border_color: color.to_string(),
                data: data.to_vec(),
            });
        }
        Ok(ChartConfig {
            chart_type: self.chart_type,
            title: self.title.clone(),
            labels: instances.clone(),
            datasets,
        })
    }
}
