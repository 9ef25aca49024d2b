use thiserror::Error;

/// Failures surfaced while loading, building or rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// IO, network, HTTP status, timeout or malformed JSON.
    #[error("failed to load {resource}: {reason}")]
    Load { resource: String, reason: String },

    /// A required field is absent or has the wrong shape.
    #[error("schema error in {resource} at `{field}`: {reason}")]
    Schema {
        resource: String,
        field: String,
        reason: String,
    },

    #[error("canvas element `{id}` not found on page")]
    ElementNotFound { id: String },

    #[error("solver `{solver}` has {actual} values for {expected} instances")]
    Alignment {
        solver: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to write {path}: {reason}")]
    Output { path: String, reason: String },
}

impl ChartError {
    pub fn load(resource: impl Into<String>, reason: impl ToString) -> Self {
        ChartError::Load {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema(
        resource: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ChartError::Schema {
            resource: resource.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short tag used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::Load { .. } => "load",
            ChartError::Schema { .. } => "schema",
            ChartError::ElementNotFound { .. } => "element_not_found",
            ChartError::Alignment { .. } => "alignment",
            ChartError::Output { .. } => "output",
        }
    }
}
