//! Host-owned row records.
//!
//! A [`RowRecord`] is an open, loosely-typed key-value record representing one
//! data row. Rows are owned by the host's data collection; the engine never
//! creates or destroys them, it only mutates fields on existing rows through
//! edit callbacks. Rows are passed by stable identity: every clone aliases the
//! same underlying map, so any live view holding the record observes an edit
//! immediately. That sharing is the contract, not a leak.

use serde_json::{Map, Value};

use crate::state::Shared;

/// Field name of the selection flag owned by the virtualized selection
/// sub-engine.
pub const CHECKED_KEY: &str = "checked";

/// One shared, mutable data row.
#[derive(Debug, Clone, Default)]
pub struct RowRecord {
    fields: Shared<Map<String, Value>>,
}

impl RowRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(key, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields = Map::new();
        for (key, value) in pairs {
            fields.insert(key.into(), value.into());
        }
        Self {
            fields: Shared::new(fields),
        }
    }

    /// Build a record from a JSON object. Non-object values yield an empty
    /// record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self {
                fields: Shared::new(fields),
            },
            _ => Self::default(),
        }
    }

    /// Read one field. `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields.with(|fields| fields.get(key).cloned())
    }

    /// Write one field in place. Every alias of this record sees the change.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.fields.update(|fields| {
            fields.insert(key, value);
        });
    }

    /// Remove one field, returning its previous value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut removed = None;
        self.fields.update(|fields| {
            removed = fields.remove(key);
        });
        removed
    }

    /// The selection flag, `false` when unset or non-boolean.
    pub fn checked(&self) -> bool {
        matches!(self.get(CHECKED_KEY), Some(Value::Bool(true)))
    }

    /// Set the selection flag.
    pub fn set_checked(&self, checked: bool) {
        self.set(CHECKED_KEY, checked);
    }

    /// Snapshot the record as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.get())
    }

    /// Field names currently present, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.with(|fields| fields.keys().cloned().collect())
    }

    /// Whether the record changed since the flag was last cleared.
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty()
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.fields.clear_dirty();
    }

    /// Whether two handles alias the same underlying row.
    pub fn same_row(&self, other: &Self) -> bool {
        self.fields.same_cell(&other.fields)
    }
}
