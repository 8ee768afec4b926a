//! Item access traits and the in-memory `Row` record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Evaluation-time view of a single item.
///
/// `get` reads declared properties; `try_dynamic` is the dynamic property
/// bag consulted for open-type access. Implementations backed by a fixed
/// struct can leave `try_dynamic` at its default (no dynamic properties).
pub trait Record {
    /// Reads a declared property by name.
    fn get(&self, name: &str) -> Option<Value>;

    /// Reads a dynamic property by name.
    ///
    /// `None` means the property is absent; open-type evaluation treats an
    /// absent property as null rather than an error.
    fn try_dynamic(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }
}

/// In-memory record: a named bag of values.
///
/// Doubles as the dynamic property bag for open types, so the same rows
/// can back both statically-typed and open-type sources in tests and
/// embedded callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    #[must_use]
    pub fn new() -> Self {
        Row {
            values: HashMap::new(),
        }
    }

    /// Sets a property value on the row.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style `set`, for test fixtures and literals-in-code.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the number of properties on the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the property names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl Record for Row {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn try_dynamic(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}
