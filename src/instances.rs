use serde::Serialize;
use serde_json::Value;

use crate::error::ChartError;
use crate::source::{DocumentFetcher, Source};

/// Benchmark instance identifiers, in document order. Used as axis labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstanceList(Vec<String>);

impl InstanceList {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Extract the `instances` field of a parsed document.
    pub fn from_document(resource: &str, doc: &Value) -> Result<Self, ChartError> {
        let field = doc
            .get("instances")
            .ok_or_else(|| ChartError::schema(resource, "instances", "missing field"))?;
        let items = field.as_array().ok_or_else(|| {
            ChartError::schema(resource, "instances", "expected an array of strings")
        })?;
        items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    ChartError::schema(resource, format!("instances[{}]", i), "expected a string")
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(InstanceList)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

pub async fn load_instances(
    fetcher: &DocumentFetcher,
    source: &Source,
) -> Result<InstanceList, ChartError> {
    let doc = fetcher.fetch_json(source).await?;
    InstanceList::from_document(&source.to_string(), &doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_instances_in_order() {
        let doc = json!({"instances": ["ft06", "la01", "aaa1"]});
        let list = InstanceList::from_document("instances.json", &doc).unwrap();
        assert_eq!(list.as_slice(), ["ft06", "la01", "aaa1"]);
    }

    #[test]
    fn test_empty_instances_ok() {
        let list = InstanceList::from_document("i.json", &json!({"instances": []})).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let err = InstanceList::from_document("i.json", &json!({"names": []})).unwrap_err();
        match err {
            ChartError::Schema { field, .. } => assert_eq!(field, "instances"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_string_entry_names_index() {
        let err = InstanceList::from_document("i.json", &json!({"instances": ["a", 3]})).unwrap_err();
        match err {
            ChartError::Schema { field, .. } => assert_eq!(field, "instances[1]"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
