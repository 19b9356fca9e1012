//! Uniform output shape shared by every report.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A primitive cell value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Named fields in insertion order. Serializes as a JSON object with keys in
/// that same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    fields: Vec<(&'static str, Value)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Titled output of one report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub title: &'static str,
    pub rows: Vec<ResultRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new(title: &'static str, rows: Vec<ResultRow>) -> Self {
        Self {
            title,
            rows,
            error: None,
        }
    }

    pub fn failed(title: &'static str, error: &anyhow::Error) -> Self {
        Self {
            title,
            rows: Vec::new(),
            error: Some(format!("{error:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_serializes_in_insertion_order() {
        let row = ResultRow::new()
            .with("route", "A -> B")
            .with("count", 2usize)
            .with("avg", 1.5);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"route":"A -> B","count":2,"avg":1.5}"#);
    }

    #[test]
    fn test_row_lookup() {
        let row = ResultRow::new().with("station", "A").with("difference", -3i64);
        assert_eq!(row.get("difference"), Some(&Value::Int(-3)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["station", "difference"]);
    }

    #[test]
    fn test_failed_report_keeps_title() {
        let err = anyhow::anyhow!("no trips loaded");
        let report = Report::failed("7. Weather", &err);
        assert!(report.rows.is_empty());
        assert_eq!(report.error.as_deref(), Some("no trips loaded"));
    }
}
