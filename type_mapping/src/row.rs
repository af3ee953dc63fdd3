//! Result rows
//!
//! A row keeps its columns in cursor order. Typed mapping goes through serde:
//! the row is rendered as a JSON object and deserialized into the target.

use crate::convert::FromDbValue;
use crate::errors::TypeMappingError;
use crate::types::DbValue;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, DbValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append
    pub fn with(mut self, name: impl Into<String>, value: impl Into<DbValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<DbValue>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Column by name; exact match first, then case-insensitive
    pub fn get(&self, name: &str) -> Option<&DbValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|(column, _)| column.eq_ignore_ascii_case(name))
            })
            .map(|(_, value)| value)
    }

    pub fn get_as<T: FromDbValue>(&self, name: &str) -> Result<T, TypeMappingError> {
        T::from_nullable(self.get(name).cloned().unwrap_or(DbValue::Null))
    }

    pub fn columns(&self) -> &[(String, DbValue)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.columns
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Map this row onto a deserializable type
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, TypeMappingError> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

impl FromIterator<(String, DbValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, DbValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
