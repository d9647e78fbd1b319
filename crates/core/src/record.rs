use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PipelineError, Result};

/// A single raw attribute as entered on the form or read from an uploaded cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

/// One order's input attributes keyed by column name. Never defaulted: a
/// lookup of an absent column is a schema error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AttributeRecord {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<AttributeValue> {
        self.values.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&AttributeValue> {
        self.values.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails with a schema error naming every column in `columns` that is absent.
    pub fn require(&self, columns: &[&str]) -> Result<()> {
        let missing: Vec<&str> = columns.iter().copied().filter(|c| !self.contains(c)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::missing(missing))
        }
    }

    pub fn number(&self, column: &str) -> Result<f64> {
        match self.lookup(column)? {
            AttributeValue::Number(n) => Ok(*n),
            AttributeValue::Text(raw) => parse_number(raw).ok_or_else(|| PipelineError::Encoding {
                column: column.to_string(),
                value: raw.clone(),
                reason: "not a number".to_string(),
            }),
        }
    }

    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.lookup(column)?.to_string())
    }

    fn lookup(&self, column: &str) -> Result<&AttributeValue> {
        self.values.get(column).ok_or_else(|| PipelineError::missing([column]))
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeRecord
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = AttributeRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}
