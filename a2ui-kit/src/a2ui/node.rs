//! A2UI Component Nodes
//!
//! The resolved component tree a processor builds for each surface. Nodes are
//! shared, immutable handles: the renderer reads them and compares them by
//! identity, only the processor creates or replaces them.

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

/// One element of a surface's declarative UI tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// Component ID, unique within its surface
    pub id: String,

    /// Type tag looked up in the component registry (e.g. `"Text"`)
    pub component_type: String,

    /// Property bag; child references are already resolved into nodes
    pub properties: IndexMap<String, NodeProperty>,

    /// Optional flex weight for Row/Column layouts
    pub weight: Option<f64>,

    /// Data model path that relative paths on this node resolve against.
    /// Set for nodes instantiated from a list template.
    pub data_context_path: Option<String>,
}

/// A single property value of a [`ComponentNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProperty {
    /// Declarative value (usually a bound value)
    Value(Value),
    /// A single child node
    Child(Rc<ComponentNode>),
    /// An ordered list of child nodes
    Children(Vec<Rc<ComponentNode>>),
}

impl ComponentNode {
    /// Create a node without properties
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        ComponentNode {
            id: id.into(),
            component_type: component_type.into(),
            properties: IndexMap::new(),
            weight: None,
            data_context_path: None,
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, property: NodeProperty) -> Self {
        self.properties.insert(key.into(), property);
        self
    }

    /// Builder-style plain value setter
    pub fn with_value(self, key: impl Into<String>, value: Value) -> Self {
        self.with_property(key, NodeProperty::Value(value))
    }

    /// Get a property by key
    pub fn property(&self, key: &str) -> Option<&NodeProperty> {
        self.properties.get(key)
    }

    /// Get a property only if it is a plain value
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.properties.get(key) {
            Some(NodeProperty::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Iterate over every direct child node, in property order
    pub fn child_nodes(&self) -> impl Iterator<Item = &Rc<ComponentNode>> {
        self.properties.values().flat_map(NodeProperty::nodes)
    }

    /// Resolve `path` against this node's data context.
    ///
    /// - Absolute paths (`/a/b`) are returned unchanged
    /// - `.` and the empty path refer to the data context itself
    /// - Anything else is appended to the data context (or to `/`)
    pub fn resolve_path(&self, path: &str) -> String {
        resolve_path(path, self.data_context_path.as_deref())
    }
}

impl NodeProperty {
    /// The child nodes held by this property (empty for plain values)
    pub fn nodes(&self) -> &[Rc<ComponentNode>] {
        match self {
            NodeProperty::Child(child) => std::slice::from_ref(child),
            NodeProperty::Children(children) => children,
            NodeProperty::Value(_) => &[],
        }
    }
}

/// Resolve a path with optional scope prefix.
pub fn resolve_path(path: &str, scope: Option<&str>) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }

    let relative = path.trim_start_matches("./");
    match scope {
        Some(scope) if relative.is_empty() || relative == "." => scope.to_string(),
        Some(scope) => format!("{}/{}", scope.trim_end_matches('/'), relative),
        None if relative == "." => "/".to_string(),
        None => format!("/{}", relative),
    }
}
