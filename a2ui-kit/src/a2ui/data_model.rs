//! A2UI Data Model
//!
//! Per-surface data store addressed with JSON Pointer paths.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::message::{DataContent, DataValue};

/// A data store whose values are accessible via JSON Pointer paths.
///
/// # Path Format
///
/// Paths follow JSON Pointer (RFC 6901) format:
/// - `/` - root
/// - `/foo` - property "foo"
/// - `/items/0/name` - property of array element
/// - `/a~1b` - property "a/b" (`~1` is `/`, `~0` is `~`)
///
/// # Example
///
/// ```rust,ignore
/// let mut model = DataModel::new();
/// model.set("/user/name", json!("Alice"));
/// let name = model.get_string("/user/name"); // Some("Alice")
/// ```
#[derive(Debug, Clone)]
pub struct DataModel {
    /// The root data value
    data: Value,

    /// Bumped on every successful mutation
    version: u64,
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataModel {
    /// Create a new empty data model
    pub fn new() -> Self {
        DataModel {
            data: Value::Object(Map::new()),
            version: 0,
        }
    }

    /// Create a data model with initial data
    pub fn with_data(data: Value) -> Self {
        DataModel { data, version: 0 }
    }

    /// Get the current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get a value at the given path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;
        for segment in parse_pointer(path) {
            current = match current {
                Value::Object(map) => map.get(segment.as_ref())?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Get a string value at the given path
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a number value at the given path
    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    /// Get a boolean value at the given path
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Set a value at the given path, creating intermediate objects/arrays
    /// as needed. Returns `false` if the path cannot be created.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let segments = parse_pointer(path);
        let changed = set_in(&mut self.data, &segments, value);
        if changed {
            self.version += 1;
        }
        changed
    }

    /// Delete a value at the given path
    pub fn delete(&mut self, path: &str) -> bool {
        let segments = parse_pointer(path);
        let Some((last, parents)) = segments.split_last() else {
            self.data = Value::Object(Map::new());
            self.version += 1;
            return true;
        };

        let mut current = &mut self.data;
        for segment in parents {
            current = match current {
                Value::Object(map) => match map.get_mut(segment.as_ref()) {
                    Some(v) => v,
                    None => return false,
                },
                Value::Array(arr) => match segment.parse::<usize>().ok().and_then(|i| arr.get_mut(i)) {
                    Some(v) => v,
                    None => return false,
                },
                _ => return false,
            };
        }

        let removed = match current {
            Value::Object(map) => map.remove(last.as_ref()).is_some(),
            Value::Array(arr) => match last.parse::<usize>() {
                Ok(index) if index < arr.len() => {
                    arr.remove(index);
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if removed {
            self.version += 1;
        }
        removed
    }

    /// Merge updates from a DataModelUpdate message
    pub fn apply_updates(&mut self, base_path: &str, contents: &[DataContent]) {
        for content in contents {
            let full_path = if base_path == "/" || base_path.is_empty() {
                format!("/{}", content.key)
            } else {
                format!("{}/{}", base_path.trim_end_matches('/'), content.key)
            };
            self.set(&full_path, content.value.to_json());
        }
    }

    /// Get the entire data as a Value
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Replace the entire data model
    pub fn replace(&mut self, data: Value) {
        self.data = data;
        self.version += 1;
    }
}

impl DataValue {
    /// Convert the tagged wire form into plain JSON
    pub fn to_json(&self) -> Value {
        match self {
            DataValue::ValueString(s) => Value::String(s.clone()),
            DataValue::ValueNumber(n) => serde_json::json!(n),
            DataValue::ValueBoolean(b) => Value::Bool(*b),
            DataValue::ValueMap(contents) => Value::Object(
                contents
                    .iter()
                    .map(|c| (c.key.clone(), c.value.to_json()))
                    .collect(),
            ),
            DataValue::ValueArray(items) => Value::Array(items.iter().map(DataValue::to_json).collect()),
        }
    }
}

/// Split a JSON Pointer into unescaped segments
fn parse_pointer(path: &str) -> Vec<Cow<'_, str>> {
    if path.is_empty() || path == "/" {
        return vec![];
    }

    path.trim_start_matches('/')
        .split('/')
        .map(|s| {
            if s.contains('~') {
                Cow::Owned(s.replace("~1", "/").replace("~0", "~"))
            } else {
                Cow::Borrowed(s)
            }
        })
        .collect()
}

fn empty_container_for(next: &str) -> Value {
    if next.parse::<usize>().is_ok() {
        Value::Array(vec![])
    } else {
        Value::Object(Map::new())
    }
}

fn set_in(current: &mut Value, segments: &[Cow<'_, str>], value: Value) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        *current = value;
        return true;
    };

    // Scalars in the way are replaced by a container
    if !current.is_object() && !current.is_array() {
        *current = Value::Object(Map::new());
    }

    let slot = match current {
        Value::Object(map) => map
            .entry(segment.to_string())
            .or_insert_with(|| rest.first().map_or(Value::Null, |next| empty_container_for(next))),
        Value::Array(arr) => {
            let Ok(index) = segment.parse::<usize>() else {
                return false;
            };
            if rest.is_empty() && index > arr.len() {
                return false;
            }
            while arr.len() <= index {
                arr.push(Value::Null);
            }
            &mut arr[index]
        }
        _ => return false,
    };

    if rest.is_empty() {
        *slot = value;
        true
    } else {
        set_in(slot, rest, value)
    }
}
