use std::time::Duration;

use crate::render::Backend;

pub const MIN_FETCH_TIMEOUT_SECS: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub instances_src: String,
    pub solver_stats_src: String,
    pub out_path: String,
    pub chart_type: ChartType,
    /// Series of each solver entry to plot; `data` unless overridden.
    pub metric: String,
    pub title: String,
    pub canvas_id: String,
    pub backend: Backend,
    pub fetch_timeout_secs: u64,
    pub strict_alignment: bool,
    pub uniform_color: bool,
    pub use_system_proxy: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            instances_src: "instances.json".to_string(),
            solver_stats_src: "available_solver_stats.json".to_string(),
            out_path: "chart.html".to_string(),
            chart_type: ChartType::Bar,
            metric: "data".to_string(),
            title: "Solver statistics".to_string(),
            canvas_id: "canvas".to_string(),
            backend: Backend::ChartJs,
            fetch_timeout_secs: 30,
            strict_alignment: false,
            uniform_color: false,
            use_system_proxy: true,
        }
    }
}

impl RenderConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `var`.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        let d = Self::default();
        let flag = |key: &str| {
            var(key).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        };
        Self {
            instances_src: var("INSTANCES_SRC").unwrap_or(d.instances_src),
            solver_stats_src: var("SOLVER_STATS_SRC").unwrap_or(d.solver_stats_src),
            out_path: var("CHART_OUT").unwrap_or(d.out_path),
            chart_type: var("CHART_TYPE").and_then(|v| ChartType::parse(&v)).unwrap_or(d.chart_type),
            metric: var("CHART_METRIC").unwrap_or(d.metric),
            title: var("CHART_TITLE").unwrap_or(d.title),
            canvas_id: var("CANVAS_ID").unwrap_or(d.canvas_id),
            backend: var("CHART_BACKEND").and_then(|v| Backend::parse(&v)).unwrap_or(d.backend),
            // 0 would time out every fetch before it starts
            fetch_timeout_secs: var("FETCH_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.max(MIN_FETCH_TIMEOUT_SECS))
                .unwrap_or(d.fetch_timeout_secs),
            strict_alignment: flag("STRICT_ALIGNMENT").unwrap_or(d.strict_alignment),
            uniform_color: flag("UNIFORM_COLOR").unwrap_or(d.uniform_color),
            use_system_proxy: flag("USE_SYSTEM_PROXY").unwrap_or(d.use_system_proxy),
        }
    }

    /// Positional overrides: `[INSTANCES] [SOLVER_STATS] [OUT]`.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        let mut args = args.into_iter();
        if let Some(v) = args.next() {
            self.instances_src = v;
        }
        if let Some(v) = args.next() {
            self.solver_stats_src = v;
        }
        if let Some(v) = args.next() {
            self.out_path = v;
        }
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(MIN_FETCH_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_chart_type_parse() {
        assert_eq!(ChartType::parse("bar"), Some(ChartType::Bar));
        assert_eq!(ChartType::parse("LINE"), Some(ChartType::Line));
        assert_eq!(ChartType::parse("pie"), None);
    }

    #[test]
    fn test_positional_args_override_in_order() {
        let cfg = RenderConfig::default().with_args(vec![
            "a.json".to_string(),
            "b.json".to_string(),
        ]);
        assert_eq!(cfg.instances_src, "a.json");
        assert_eq!(cfg.solver_stats_src, "b.json");
        assert_eq!(cfg.out_path, "chart.html");
    }

    fn lookup(pairs: &[(&str, &str)]) -> RenderConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RenderConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_unset_vars_keep_defaults() {
        let cfg = lookup(&[]);
        let d = RenderConfig::default();
        assert_eq!(cfg.metric, d.metric);
        assert_eq!(cfg.backend, Backend::ChartJs);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(30));
        assert!(!cfg.strict_alignment);
        assert!(!cfg.uniform_color);
        assert!(cfg.use_system_proxy);
    }

    #[test]
    fn test_env_knobs_are_read() {
        let cfg = lookup(&[
            ("CHART_TYPE", "line"),
            ("CHART_METRIC", "makespan"),
            ("CHART_TITLE", "Makespan"),
            ("CANVAS_ID", "chart"),
            ("CHART_BACKEND", "json"),
            ("FETCH_TIMEOUT_SECS", "7"),
            ("STRICT_ALIGNMENT", "1"),
            ("UNIFORM_COLOR", "true"),
            ("USE_SYSTEM_PROXY", "0"),
        ]);
        assert_eq!(cfg.chart_type, ChartType::Line);
        assert_eq!(cfg.metric, "makespan");
        assert_eq!(cfg.title, "Makespan");
        assert_eq!(cfg.canvas_id, "chart");
        assert_eq!(cfg.backend, Backend::Json);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(7));
        assert!(cfg.strict_alignment);
        assert!(cfg.uniform_color);
        assert!(!cfg.use_system_proxy);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let cfg = lookup(&[
            ("CHART_TYPE", "pie"),
            ("CHART_BACKEND", "svg"),
            ("FETCH_TIMEOUT_SECS", "soon"),
            ("UNIFORM_COLOR", "maybe"),
        ]);
        assert_eq!(cfg.chart_type, ChartType::Bar);
        assert_eq!(cfg.backend, Backend::ChartJs);
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert!(!cfg.uniform_color);
    }

    #[test]
    fn test_zero_fetch_timeout_is_clamped() {
        let cfg = lookup(&[("FETCH_TIMEOUT_SECS", "0")]);
        assert_eq!(cfg.fetch_timeout_secs, MIN_FETCH_TIMEOUT_SECS);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(1));

        let cfg = RenderConfig {
            fetch_timeout_secs: 0,
            ..RenderConfig::default()
        };
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(1));
    }
}
