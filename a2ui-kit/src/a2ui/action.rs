//! User actions
//!
//! Interactive components describe what should happen on interaction with an
//! [`ActionDefinition`]. When the user triggers it, the renderer resolves the
//! action context against the data model and hands a [`UserActionMessage`]
//! to the host, which forwards it to the agent.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    node::ComponentNode,
    value::{BoundValue, DataAccessor, resolve_bound_value},
};

/// Action definition for interactive components
///
/// # Example JSON
///
/// ```text
/// {
///   "name": "addToCart",
///   "context": [
///     {"key": "productId", "value": {"path": "id"}},
///     {"key": "quantity", "value": {"literalNumber": 1}}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Action name (e.g., "addToCart", "submit")
    pub name: String,

    /// Context values to include with the action
    #[serde(default)]
    pub context: Vec<ActionContextItem>,
}

/// A single context item for an action.
///
/// LLMs sometimes generate malformed context items (e.g. `{"path": "/x"}`
/// instead of `{"key": "x", "value": {"path": "/x"}}`). Fields are
/// defaulted to make deserialization lenient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContextItem {
    /// Key name
    #[serde(default)]
    pub key: String,

    /// Bound value, resolved when the action fires
    #[serde(default)]
    pub value: Value,
}

impl ActionDefinition {
    /// Read an action from a component property
    pub fn from_json(value: &Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(action) => Some(action),
            Err(e) => {
                ::log::warn!("[A2UI] Ignoring malformed action {}: {}", value, e);
                None
            }
        }
    }
}

/// Message sent from client to agent when the user triggers an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionMessage {
    pub user_action: UserActionEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionEvent {
    /// Action name
    pub name: String,

    /// Source surface ID
    pub surface_id: String,

    /// ID of the component that triggered the action
    pub source_component_id: String,

    /// ISO-8601 UTC timestamp with millisecond precision
    pub timestamp: String,

    /// Resolved context, omitted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<IndexMap<String, Value>>,
}

impl UserActionMessage {
    /// Replace the timestamp (for replaying recorded actions)
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.user_action.timestamp = timestamp.into();
        self
    }
}

/// Build the outbound message for a triggered action, stamped with the
/// current time.
pub fn build_user_action(
    name: &str,
    surface_id: &str,
    source_component_id: &str,
    context: IndexMap<String, Value>,
) -> UserActionMessage {
    UserActionMessage {
        user_action: UserActionEvent {
            name: name.to_string(),
            surface_id: surface_id.to_string(),
            source_component_id: source_component_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            context: if context.is_empty() { None } else { Some(context) },
        },
    }
}

/// Resolve every context entry of `action`. Entries that do not resolve are
/// left out.
pub fn resolve_action_context(
    action: &ActionDefinition,
    accessor: &dyn DataAccessor,
    node: &ComponentNode,
    surface_id: &str,
) -> IndexMap<String, Value> {
    let mut context = IndexMap::new();
    for item in &action.context {
        let bound = BoundValue::from_json(&item.value);
        if let Some(value) = resolve_bound_value(bound.as_ref(), accessor, node, surface_id) {
            context.insert(item.key.clone(), value);
        }
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_data(_: &ComponentNode, path: &str, _: &str) -> Option<Value> {
        match path {
            "id" => Some(json!("sku-1")),
            "/cart/size" => Some(json!({"valueNumber": 2})),
            _ => None,
        }
    }

    #[test]
    fn test_resolve_action_context() {
        let action: ActionDefinition = serde_json::from_value(json!({
            "name": "addToCart",
            "context": [
                {"key": "productId", "value": {"path": "id"}},
                {"key": "quantity", "value": {"literalNumber": 1}},
                {"key": "cartSize", "value": {"path": "/cart/size"}},
                {"key": "missing", "value": {"path": "/nope"}}
            ]
        }))
        .unwrap();

        let node = ComponentNode::new("buy", "Button");
        let context = resolve_action_context(&action, &product_data, &node, "main");

        assert_eq!(context.len(), 3);
        assert_eq!(context["productId"], json!("sku-1"));
        assert_eq!(context["quantity"], json!(1.0));
        assert_eq!(context["cartSize"], json!(2));
        assert!(!context.contains_key("missing"));
    }

    #[test]
    fn test_lenient_context_items() {
        let action = ActionDefinition::from_json(&json!({
            "name": "submit",
            "context": [{"path": "/x"}]
        }))
        .unwrap();
        assert_eq!(action.context[0].key, "");
        assert_eq!(action.context[0].value, Value::Null);

        assert!(ActionDefinition::from_json(&json!("submit")).is_none());
    }

    #[test]
    fn test_build_user_action() {
        let mut context = IndexMap::new();
        context.insert("q".to_string(), json!("rust"));
        let message = build_user_action("search", "main", "go", context);

        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["userAction"]["name"], "search");
        assert_eq!(wire["userAction"]["sourceComponentId"], "go");
        assert_eq!(wire["userAction"]["context"]["q"], "rust");

        let timestamp = message.user_action.timestamp.clone();
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }

    #[test]
    fn test_empty_context_is_omitted() {
        let message = build_user_action("close", "main", "x", IndexMap::new())
            .with_timestamp("2024-01-01T00:00:00.000Z");
        let wire = serde_json::to_value(&message).unwrap();

        assert!(wire["userAction"].get("context").is_none());
        assert_eq!(wire["userAction"]["timestamp"], "2024-01-01T00:00:00.000Z");
    }
}
