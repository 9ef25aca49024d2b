use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ChartError;
use crate::source::{DocumentFetcher, Source};

/// Name of the series a bare array entry is stored under.
pub const DEFAULT_METRIC: &str = "data";

/// Per-instance series of one solver, keyed by metric name.
///
/// `null` values are kept as gaps so positions stay aligned with the
/// instance list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverEntry {
    series: IndexMap<String, Vec<Option<f64>>>,
}

impl SolverEntry {
    pub fn from_data(values: Vec<Option<f64>>) -> Self {
        let mut series = IndexMap::new();
        series.insert(DEFAULT_METRIC.to_string(), values);
        Self { series }
    }

    pub fn with_series(mut self, metric: &str, values: Vec<Option<f64>>) -> Self {
        self.series.insert(metric.to_string(), values);
        self
    }

    pub fn series(&self, metric: &str) -> Option<&[Option<f64>]> {
        self.series.get(metric).map(Vec::as_slice)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    fn from_value(resource: &str, name: &str, value: &Value) -> Result<Self, ChartError> {
        match value {
            Value::Array(items) => parse_series(items)
                .map(Self::from_data)
                .ok_or_else(|| {
                    ChartError::schema(
                        resource,
                        format!("solvers.{}", name),
                        "expected an array of numbers",
                    )
                }),
            Value::Object(fields) => {
                // non-numeric members (descriptions, instance lists) are not series
                let series = fields
                    .iter()
                    .filter_map(|(k, v)| {
                        v.as_array()
                            .and_then(|items| parse_series(items))
                            .map(|s| (k.clone(), s))
                    })
                    .collect();
                Ok(Self { series })
            }
            _ => Err(ChartError::schema(
                resource,
                format!("solvers.{}", name),
                "expected an array or an object",
            )),
        }
    }
}

fn parse_series(items: &[Value]) -> Option<Vec<Option<f64>>> {
    items
        .iter()
        .map(|v| match v {
            Value::Null => Some(None),
            Value::Number(n) => n.as_f64().map(Some),
            _ => None,
        })
        .collect()
}

/// Solver name to statistics, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverStats {
    /// Document the entries came from, named in errors raised later.
    resource: String,
    entries: IndexMap<String, SolverEntry>,
}

impl Default for SolverStats {
    fn default() -> Self {
        Self {
            resource: "solver stats".to_string(),
            entries: IndexMap::new(),
        }
    }
}

impl SolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = resource.to_string();
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn insert(&mut self, name: &str, entry: SolverEntry) {
        self.entries.insert(name.to_string(), entry);
    }

    /// Extract the `solvers` field of a parsed document.
    pub fn from_document(resource: &str, doc: &Value) -> Result<Self, ChartError> {
        let field = doc
            .get("solvers")
            .ok_or_else(|| ChartError::schema(resource, "solvers", "missing field"))?;
        let solvers = field
            .as_object()
            .ok_or_else(|| ChartError::schema(resource, "solvers", "expected an object"))?;
        let mut stats = Self::new().with_resource(resource);
        for (name, value) in solvers {
            stats.insert(name, SolverEntry::from_value(resource, name, value)?);
        }
        Ok(stats)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SolverEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, SolverEntry> {
        self.entries.iter()
    }
}

pub async fn load_solver_stats(
    fetcher: &DocumentFetcher,
    source: &Source,
) -> Result<SolverStats, ChartError> {
    let doc = fetcher.fetch_json(source).await?;
    SolverStats::from_document(&source.to_string(), &doc)
}
