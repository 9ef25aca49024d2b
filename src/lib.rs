//! Solver statistics charts.
//!
//! Loads an instance list and per-solver statistics from two JSON documents
//! (files or http URLs), reshapes them into a chart configuration and draws
//! it through a swappable [`render::Renderer`] backend.

pub mod chart;
pub mod config;
pub mod error;
pub mod instances;
pub mod logging;
pub mod page;
pub mod render;
pub mod solvers;
pub mod source;
pub mod summary;

pub use chart::{ChartBuilder, ChartConfig, ChartDataset, Palette};
pub use config::{ChartType, RenderConfig};
pub use error::ChartError;
pub use instances::{load_instances, InstanceList};
pub use page::{write_output, ChartHandle, PageController};
pub use render::{Backend, ChartPage, Renderer};
pub use solvers::{load_solver_stats, SolverEntry, SolverStats};
pub use source::{DocumentFetcher, Source};
