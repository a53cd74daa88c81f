//! Records
//!
//! A record is one observation keyed by column name. Training records carry
//! the target column as a numeric attribute; inference records do not.

use crate::error::{DataError, Result};
use crate::schema::AttributeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Real value
    Numeric(f64),
    /// Category label
    Category(String),
}

impl AttributeValue {
    /// Kind of this value.
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Numeric(_) => AttributeKind::Numeric,
            Self::Category(_) => AttributeKind::Categorical,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}

/// One observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, AttributeValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a numeric attribute.
    pub fn with_numeric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, AttributeValue::Numeric(value));
        self
    }

    /// Builder-style insert of a categorical attribute.
    pub fn with_category(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, AttributeValue::Category(value.into()));
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.values.insert(name.into(), value);
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.values.remove(name)
    }

    /// Raw attribute value.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Whether the record has the attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric attribute value.
    ///
    /// # Errors
    /// `MissingAttribute` if absent, `WrongKind` if it holds a category.
    pub fn numeric(&self, name: &str) -> Result<f64> {
        match self.values.get(name) {
            Some(AttributeValue::Numeric(v)) => Ok(*v),
            Some(AttributeValue::Category(_)) => Err(DataError::WrongKind {
                attribute: name.to_string(),
                expected: AttributeKind::Numeric,
            }),
            None => Err(DataError::MissingAttribute(name.to_string())),
        }
    }

    /// Categorical attribute value.
    ///
    /// # Errors
    /// `MissingAttribute` if absent, `WrongKind` if it holds a number.
    pub fn category(&self, name: &str) -> Result<&str> {
        match self.values.get(name) {
            Some(AttributeValue::Category(v)) => Ok(v),
            Some(AttributeValue::Numeric(_)) => Err(DataError::WrongKind {
                attribute: name.to_string(),
                expected: AttributeKind::Categorical,
            }),
            None => Err(DataError::MissingAttribute(name.to_string())),
        }
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
