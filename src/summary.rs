use serde::Serialize;

use crate::instances::InstanceList;
use crate::solvers::SolverStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverSummary {
    pub solver: String,
    /// Values present; gaps are not counted.
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize(stats: &SolverStats, metric: &str) -> Vec<SolverSummary> {
    stats
        .iter()
        .map(|(name, entry)| {
            let values: Vec<f64> = entry
                .series(metric)
                .unwrap_or(&[])
                .iter()
                .flatten()
                .copied()
                .collect();
            let count = values.len();
            let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
            SolverSummary {
                solver: name.clone(),
                count,
                mean,
                min: values.iter().copied().reduce(f64::min),
                max: values.iter().copied().reduce(f64::max),
            }
        })
        .collect()
}

/// Fixed-width table: one row per instance, one column per solver, and an
/// `AVG` row at the bottom.
pub fn render_table(instances: &InstanceList, stats: &SolverStats, metric: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}", "instance"));
    for name in stats.names() {
        out.push_str(&format!("{:>16}", truncate(name, 15)));
    }
    out.push('\n');

    for (row, instance) in instances.iter().enumerate() {
        out.push_str(&format!("{:<12}", truncate(instance, 11)));
        for (_, entry) in stats.iter() {
            let cell = entry
                .series(metric)
                .and_then(|s| s.get(row).copied().flatten());
            out.push_str(&format!("{:>16}", fmt_cell(cell)));
        }
        out.push('\n');
    }

    out.push_str(&format!("{:<12}", "AVG"));
    for summary in summarize(stats, metric) {
        out.push_str(&format!("{:>16}", fmt_cell(summary.mean)));
    }
    out.push('\n');
    out
}

fn fmt_cell(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
