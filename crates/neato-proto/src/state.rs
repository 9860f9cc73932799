use std::collections::HashMap;

use crate::error::{NeatoError, Result};
use crate::types::{motor_fields, FieldEntry, FieldValue};

/// Last known value of every telemetry field seen so far.
///
/// Fields are overwritten by newer responses and never removed, so a field
/// missing from the latest response keeps its previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    fields: HashMap<String, FieldValue>,
}

impl Default for SensorState {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorState {
    /// A store with the wheel positions zeroed, as odometry starts from rest.
    pub fn new() -> Self {
        let mut fields = HashMap::new();
        fields.insert(motor_fields::LEFT_WHEEL_POSITION.to_string(), FieldValue::Int(0));
        fields.insert(motor_fields::RIGHT_WHEEL_POSITION.to_string(), FieldValue::Int(0));
        Self { fields }
    }

    /// Record decoded entries, replacing older values of the same fields.
    pub fn apply<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = FieldEntry>,
    {
        for entry in entries {
            self.fields.insert(entry.name, entry.value);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The stored value of `name`, or [`NeatoError::FieldNotPopulated`].
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        self.fields
            .get(name)
            .copied()
            .ok_or_else(|| NeatoError::FieldNotPopulated(name.to_string()))
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get(name).map(FieldValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.get(name).map(FieldValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get(name).map(FieldValue::as_bool)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
