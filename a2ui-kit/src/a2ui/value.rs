//! A2UI Value Types
//!
//! Represents the bound value types used in A2UI protocol for data binding,
//! and resolves them against a surface's data model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::ComponentNode;

/// A declarative property value: a literal, a data-bound path, or a value
/// that the data model already resolved.
///
/// # Examples
///
/// ```json
/// "Hello"                      // bare string: a path if it resolves, else a literal
/// {"literalString": "Hello"}
/// {"literalNumber": 42}
/// {"path": "/user/name"}
/// {"valueBoolean": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum BoundValue {
    /// A bare string, tried as a path before being used as a literal
    String(String),
    /// A bare number
    Number(f64),
    /// A bare boolean
    Boolean(bool),

    LiteralString(String),
    LiteralNumber(f64),
    LiteralBoolean(bool),

    /// A path reference to the data model that must resolve
    Path(String),

    ValueString(String),
    ValueNumber(f64),
    ValueBoolean(bool),
}

impl BoundValue {
    /// Create a new literal string value
    pub fn literal(s: impl Into<String>) -> Self {
        BoundValue::LiteralString(s.into())
    }

    /// Create a new path reference
    pub fn path(p: impl Into<String>) -> Self {
        BoundValue::Path(p.into())
    }

    /// Classify a raw JSON property.
    ///
    /// Object tags are probed in a fixed order: the literal tags, then
    /// `path`, then the value wrappers. A tag only matches when its payload
    /// has the matching JSON type. `null` and unrecognized shapes yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(BoundValue::Boolean(*b)),
            Value::Number(n) => n.as_f64().map(BoundValue::Number),
            Value::String(s) => Some(BoundValue::String(s.clone())),
            Value::Object(obj) => {
                if let Some(s) = obj.get("literalString").and_then(Value::as_str) {
                    return Some(BoundValue::LiteralString(s.to_string()));
                }
                if let Some(n) = obj.get("literalNumber").and_then(Value::as_f64) {
                    return Some(BoundValue::LiteralNumber(n));
                }
                if let Some(b) = obj.get("literalBoolean").and_then(Value::as_bool) {
                    return Some(BoundValue::LiteralBoolean(b));
                }
                if let Some(p) = obj.get("path").and_then(Value::as_str) {
                    return Some(BoundValue::Path(p.to_string()));
                }
                if let Some(s) = obj.get("valueString").and_then(Value::as_str) {
                    return Some(BoundValue::ValueString(s.to_string()));
                }
                if let Some(n) = obj.get("valueNumber").and_then(Value::as_f64) {
                    return Some(BoundValue::ValueNumber(n));
                }
                if let Some(b) = obj.get("valueBoolean").and_then(Value::as_bool) {
                    return Some(BoundValue::ValueBoolean(b));
                }
                None
            }
            Value::Array(_) => None,
        }
    }

    /// Check if this is an explicit path reference
    pub fn is_path(&self) -> bool {
        matches!(self, BoundValue::Path(_))
    }

    /// Get the path if this is an explicit path reference
    pub fn as_path(&self) -> Option<&str> {
        match self {
            BoundValue::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl TryFrom<Value> for BoundValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        BoundValue::from_json(&value).ok_or_else(|| format!("not a bound value: {}", value))
    }
}

impl From<BoundValue> for Value {
    fn from(value: BoundValue) -> Self {
        use serde_json::json;
        match value {
            BoundValue::String(s) => Value::String(s),
            BoundValue::Number(n) => json!(n),
            BoundValue::Boolean(b) => Value::Bool(b),
            BoundValue::LiteralString(s) => json!({ "literalString": s }),
            BoundValue::LiteralNumber(n) => json!({ "literalNumber": n }),
            BoundValue::LiteralBoolean(b) => json!({ "literalBoolean": b }),
            BoundValue::Path(p) => json!({ "path": p }),
            BoundValue::ValueString(s) => json!({ "valueString": s }),
            BoundValue::ValueNumber(n) => json!({ "valueNumber": n }),
            BoundValue::ValueBoolean(b) => json!({ "valueBoolean": b }),
        }
    }
}

/// Read access to a surface's data model, scoped by the requesting node.
///
/// Returning `None` means "no data at path".
pub trait DataAccessor {
    fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value>;
}

impl<F> DataAccessor for F
where
    F: Fn(&ComponentNode, &str, &str) -> Option<Value>,
{
    fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value> {
        self(node, path, surface_id)
    }
}

/// Conversion from a resolved JSON value into a typed property value.
pub trait FromBound: Clone + PartialEq + 'static {
    fn from_resolved(value: &Value) -> Option<Self>;

    /// Whether two resolved values count as unchanged
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl FromBound for String {
    fn from_resolved(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromBound for f64 {
    fn from_resolved(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    // NaN never equals itself
    fn same_value(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl FromBound for i64 {
    fn from_resolved(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromBound for bool {
    fn from_resolved(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromBound for Value {
    fn from_resolved(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Unwrap `valueString` / `valueNumber` / `valueBoolean` wrapper objects
/// returned by a data accessor. Other values pass through.
pub fn normalize_resolved(value: Value) -> Value {
    if let Value::Object(obj) = &value {
        for key in ["valueString", "valueNumber", "valueBoolean"] {
            if let Some(inner) = obj.get(key) {
                return inner.clone();
            }
        }
    }
    value
}

fn lookup(
    accessor: &dyn DataAccessor,
    node: &ComponentNode,
    path: &str,
    surface_id: &str,
) -> Option<Value> {
    match accessor.get_data(node, path, surface_id) {
        None | Some(Value::Null) => None,
        Some(found) => Some(normalize_resolved(found)),
    }
}

/// Resolve a bound value to raw JSON. `None` means "use the default".
pub fn resolve_bound_value(
    prop: Option<&BoundValue>,
    accessor: &dyn DataAccessor,
    node: &ComponentNode,
    surface_id: &str,
) -> Option<Value> {
    match prop? {
        BoundValue::Number(n) | BoundValue::LiteralNumber(n) | BoundValue::ValueNumber(n) => {
            Some(serde_json::json!(*n))
        }
        BoundValue::Boolean(b) | BoundValue::LiteralBoolean(b) | BoundValue::ValueBoolean(b) => {
            Some(Value::Bool(*b))
        }
        // A bare string that does not resolve is meant as a literal
        BoundValue::String(s) => {
            lookup(accessor, node, s, surface_id).or_else(|| Some(Value::String(s.clone())))
        }
        BoundValue::LiteralString(s) | BoundValue::ValueString(s) => Some(Value::String(s.clone())),
        BoundValue::Path(path) => lookup(accessor, node, path, surface_id),
    }
}

/// Resolve a bound value to a typed value, falling back to `default` when
/// nothing resolves or the resolved value has the wrong shape.
pub fn resolve_value<T: FromBound>(
    prop: Option<&BoundValue>,
    default: T,
    accessor: &dyn DataAccessor,
    node: &ComponentNode,
    surface_id: &str,
) -> T {
    resolve_bound_value(prop, accessor, node, surface_id)
        .and_then(|value| T::from_resolved(&value))
        .unwrap_or(default)
}

/// Resolve a raw JSON property (as found on a node) to a typed value.
pub fn resolve_json_value<T: FromBound>(
    prop: Option<&Value>,
    default: T,
    accessor: &dyn DataAccessor,
    node: &ComponentNode,
    surface_id: &str,
) -> T {
    let bound = prop.and_then(BoundValue::from_json);
    resolve_value(bound.as_ref(), default, accessor, node, surface_id)
}
