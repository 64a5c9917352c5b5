//! Style bag and named style groups
//!
//! Draw implementations read whatever keys they care about from the
//! [`StyleBag`]; the engine itself never interprets them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::ObjectError;

/// A single style value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Numeric value (line width, opacity, font size)
    Number(f64),
    /// Text value (colors, fonts)
    Text(String),
    /// Boolean value
    Bool(bool),
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Key/value presentation settings of a render object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleBag {
    values: BTreeMap<String, StyleValue>,
}

impl StyleBag {
    /// Create an empty style bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a key, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look a key up
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.values.get(key)
    }

    /// Numeric value of a key
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(StyleValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Text value of a key
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(StyleValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Boolean value of a key
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(StyleValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Remove a key
    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.values.remove(key)
    }

    /// Copy every key of `other` onto this bag; keys only present here survive
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag has no keys
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate keys and values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Named style snapshots owned by one object
#[derive(Debug, Clone, Default)]
pub struct StyleGroups {
    groups: HashMap<String, StyleBag>,
}

impl StyleGroups {
    /// Register a new group; fails if the name is taken
    pub fn create(&mut self, name: &str, style: StyleBag) -> Result<(), ObjectError> {
        if self.groups.contains_key(name) {
            return Err(ObjectError::StyleGroupExists(name.to_string()));
        }
        self.groups.insert(name.to_string(), style);
        Ok(())
    }

    /// Look a group up; fails if it was never created
    pub fn get(&self, name: &str) -> Result<&StyleBag, ObjectError> {
        self.groups
            .get(name)
            .ok_or_else(|| ObjectError::StyleGroupMissing(name.to_string()))
    }

    /// Whether a group exists
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }
}
