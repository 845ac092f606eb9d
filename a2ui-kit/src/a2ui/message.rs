//! A2UI Protocol Message Types
//!
//! This module defines the Rust types for the server-to-client A2UI messages.
//! Messages are serialized/deserialized using serde_json.
//!
//! Component payloads are kept as open property bags: which component types
//! exist is decided by the registry at render time, not by this module.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::error::ConfigError;

/// Lenient f64 deserializer, accepts numbers and ignores other types.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let val = Option::<Value>::deserialize(d)?.and_then(|v| v.as_f64());
    Ok(val)
}

/// Top-level A2UI message enum.
///
/// Each variant corresponds to one of the A2UI protocol message types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum A2uiMessage {
    /// Initialize a new UI surface
    BeginRendering(BeginRendering),

    /// Add or update components in the tree
    SurfaceUpdate(SurfaceUpdate),

    /// Update the data model
    DataModelUpdate(DataModelUpdate),

    /// Delete a surface
    DeleteSurface(DeleteSurface),
}

impl A2uiMessage {
    /// Get the surface ID this message applies to
    pub fn surface_id(&self) -> &str {
        match self {
            A2uiMessage::BeginRendering(m) => &m.surface_id,
            A2uiMessage::SurfaceUpdate(m) => &m.surface_id,
            A2uiMessage::DataModelUpdate(m) => &m.surface_id,
            A2uiMessage::DeleteSurface(m) => &m.surface_id,
        }
    }
}

/// Initialize a new UI surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "beginRendering": {
///     "surfaceId": "main",
///     "root": "root-column",
///     "styles": {
///       "primaryColor": "#007BFF",
///       "font": "Roboto"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    /// Unique identifier for this surface
    pub surface_id: String,

    /// ID of the root component
    pub root: String,

    /// Optional style configuration
    #[serde(default)]
    pub styles: Option<SurfaceStyles>,
}

/// Style configuration for a surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStyles {
    /// Primary color (hex format)
    #[serde(default)]
    pub primary_color: Option<String>,

    /// Font family name
    #[serde(default)]
    pub font: Option<String>,

    /// Additional custom styles
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Add or update components in the surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "surfaceUpdate": {
///     "surfaceId": "main",
///     "components": [
///       {
///         "id": "root",
///         "component": {
///           "Column": {
///             "children": {"explicitList": ["header", "content"]}
///           }
///         }
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    /// Target surface ID
    pub surface_id: String,

    /// Components to add or update
    pub components: Vec<ComponentDefinition>,
}

/// A single component definition in the adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Unique component ID
    pub id: String,

    /// Optional flex weight for Row/Column layouts
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,

    /// The component type and properties
    pub component: ComponentSpec,
}

/// A component type tag with its raw properties.
///
/// On the wire this is an object with exactly one key, the type name:
/// `{"Text": {"text": {"literalString": "Hi"}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ComponentSpec {
    /// Type name looked up in the component registry
    pub component_type: String,

    /// Raw properties, child references still unresolved
    pub properties: Map<String, Value>,
}

impl ComponentSpec {
    pub fn new(component_type: impl Into<String>, properties: Map<String, Value>) -> Self {
        ComponentSpec {
            component_type: component_type.into(),
            properties,
        }
    }
}

impl TryFrom<Map<String, Value>> for ComponentSpec {
    type Error = ConfigError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(ConfigError::InvalidComponent(format!(
                "expected exactly one type key, found {}",
                map.len()
            )));
        }
        let Some((component_type, body)) = map.into_iter().next() else {
            return Err(ConfigError::InvalidComponent("no type key".to_string()));
        };
        let properties = match body {
            Value::Object(properties) => properties,
            Value::Null => Map::new(),
            other => {
                return Err(ConfigError::InvalidComponent(format!(
                    "properties of {} must be an object, got {}",
                    component_type, other
                )));
            }
        };
        Ok(ComponentSpec {
            component_type,
            properties,
        })
    }
}

impl From<ComponentSpec> for Map<String, Value> {
    fn from(spec: ComponentSpec) -> Self {
        let mut map = Map::new();
        map.insert(spec.component_type, Value::Object(spec.properties));
        map
    }
}

/// Update the data model.
///
/// # Example JSON
///
/// ```text
/// {
///   "dataModelUpdate": {
///     "surfaceId": "main",
///     "path": "/",
///     "contents": [
///       {"key": "products", "valueMap": [...]}
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    /// Target surface ID
    pub surface_id: String,

    /// Base path for updates (default "/")
    #[serde(default = "default_path")]
    pub path: String,

    /// Data updates
    pub contents: Vec<DataContent>,
}

fn default_path() -> String {
    "/".to_string()
}

/// A single data content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataContent {
    /// Key name
    pub key: String,

    /// Value (one of the typed variants)
    #[serde(flatten)]
    pub value: DataValue,
}

/// Data value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataValue {
    /// String value
    ValueString(String),
    /// Number value
    ValueNumber(f64),
    /// Boolean value
    ValueBoolean(bool),
    /// Nested map (object)
    ValueMap(Vec<DataContent>),
    /// Array of values
    ValueArray(Vec<DataValue>),
}

/// Delete a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    /// Surface ID to delete
    pub surface_id: String,
}

/// Parse a JSON payload holding A2UI messages.
///
/// Tries a strict array parse first. On failure, falls back to parsing each
/// element individually (skipping malformed ones) so that valid messages
/// still render even if one of them has schema issues. A payload that is
/// not an array is parsed as a single message.
pub fn parse_messages(json: &str) -> Result<Vec<A2uiMessage>, serde_json::Error> {
    match serde_json::from_str::<Vec<A2uiMessage>>(json) {
        Ok(messages) => return Ok(messages),
        Err(e) => {
            ::log::debug!("[A2UI] Strict array parse failed: {}", e);
        }
    }

    if let Ok(values) = serde_json::from_str::<Vec<Value>>(json) {
        let mut messages = Vec::with_capacity(values.len());
        for (i, val) in values.into_iter().enumerate() {
            match serde_json::from_value::<A2uiMessage>(val) {
                Ok(msg) => messages.push(msg),
                Err(e) => {
                    ::log::warn!("[A2UI] Skipping message[{}]: {}", i, e);
                }
            }
        }
        return Ok(messages);
    }

    let message: A2uiMessage = serde_json::from_str(json)?;
    Ok(vec![message])
}
