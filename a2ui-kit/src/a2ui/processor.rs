//! A2UI Message Processor
//!
//! Processes incoming A2UI messages and maintains, per surface, the component
//! adjacency list, the data model and the resolved component tree.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{
    data_model::DataModel,
    message::*,
    node::{ComponentNode, NodeProperty, resolve_path},
};

/// Represents a UI surface with its component tree and data.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Surface ID
    pub id: String,

    /// Root component ID, set by `beginRendering`
    pub root: Option<String>,

    /// Style configuration
    pub styles: Option<SurfaceStyles>,

    /// Component definitions by ID
    pub components: HashMap<String, ComponentDefinition>,

    /// The surface's data model
    pub data_model: DataModel,

    /// Resolved tree, `None` until the root component is known
    pub component_tree: Option<Rc<ComponentNode>>,

    /// Bumped every time `component_tree` is rebuilt
    pub version: u64,

    /// Whether the tree expands list templates over data
    uses_templates: bool,
}

impl Surface {
    /// Create a new empty surface
    pub fn new(id: impl Into<String>) -> Self {
        Surface {
            id: id.into(),
            root: None,
            styles: None,
            components: HashMap::new(),
            data_model: DataModel::new(),
            component_tree: None,
            version: 0,
            uses_templates: false,
        }
    }

    /// Get a component by ID
    pub fn get_component(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    /// Number of component definitions received so far
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Rebuild `component_tree` from the adjacency list and data model
    fn rebuild_tree(&mut self) {
        let mut builder = TreeBuilder {
            components: &self.components,
            data: &self.data_model,
            visiting: HashSet::new(),
            uses_templates: false,
        };
        let tree = self
            .root
            .as_deref()
            .and_then(|root| builder.build(root, None, ""));
        self.uses_templates = builder.uses_templates;
        self.component_tree = tree;
        self.version += 1;

        ::log::debug!(
            "[A2UI] Rebuilt tree for surface {} (version {}, templates: {})",
            self.id,
            self.version,
            self.uses_templates
        );
    }
}

/// The contract the rendering layer needs from a message processor.
///
/// Mutating operations a processor does not support default to no-ops.
pub trait MessageProcessor {
    /// Apply a batch of protocol messages
    fn process_messages(&mut self, messages: Vec<A2uiMessage>);

    /// All live surfaces by ID
    fn surfaces(&self) -> &IndexMap<String, Surface>;

    /// A single surface by ID
    fn surface(&self, surface_id: &str) -> Option<&Surface> {
        self.surfaces().get(surface_id)
    }

    /// Read data at `path`, relative paths resolved against `node`'s data
    /// context. `None` means no data at path.
    fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value>;

    /// Write data at `path`, relative paths resolved against `node`'s data
    /// context when a node is given.
    fn set_data(
        &mut self,
        node: Option<&ComponentNode>,
        path: &str,
        value: Value,
        surface_id: &str,
    ) {
        let _ = (node, value);
        ::log::debug!(
            "[A2UI] set_data({}, {}) not supported by this processor",
            surface_id,
            path
        );
    }

    /// Remove every surface
    fn clear_surfaces(&mut self) {
        ::log::debug!("[A2UI] clear_surfaces not supported by this processor");
    }
}

/// The A2UI message processor.
///
/// Manages surfaces, component trees, and data models.
///
/// # Example
///
/// ```rust,ignore
/// let mut processor = A2uiMessageProcessor::new();
///
/// let json = r#"[{"beginRendering": {"surfaceId": "main", "root": "root"}}]"#;
/// processor.process_messages(parse_messages(json)?);
///
/// let tree = processor.surface("main").and_then(|s| s.component_tree.clone());
/// ```
#[derive(Debug, Default)]
pub struct A2uiMessageProcessor {
    /// Active surfaces by ID, in creation order
    surfaces: IndexMap<String, Surface>,
}

impl A2uiMessageProcessor {
    /// Create a new processor without surfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all surface IDs
    pub fn surface_ids(&self) -> impl Iterator<Item = &String> {
        self.surfaces.keys()
    }

    /// Get the data model for a surface
    pub fn get_data_model(&self, surface_id: &str) -> Option<&DataModel> {
        self.surfaces.get(surface_id).map(|s| &s.data_model)
    }

    /// Process a single A2UI message
    pub fn process_message(&mut self, message: A2uiMessage) {
        match message {
            A2uiMessage::BeginRendering(msg) => self.process_begin_rendering(msg),
            A2uiMessage::SurfaceUpdate(msg) => self.process_surface_update(msg),
            A2uiMessage::DataModelUpdate(msg) => self.process_data_model_update(msg),
            A2uiMessage::DeleteSurface(msg) => self.process_delete_surface(msg),
        }
    }

    // ========================================================================
    // Private processing methods
    // ========================================================================

    fn surface_mut(&mut self, surface_id: &str) -> &mut Surface {
        self.surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| Surface::new(surface_id))
    }

    fn process_begin_rendering(&mut self, msg: BeginRendering) {
        let surface = self.surface_mut(&msg.surface_id);
        surface.root = Some(msg.root);
        surface.styles = msg.styles;
        surface.rebuild_tree();
    }

    fn process_surface_update(&mut self, msg: SurfaceUpdate) {
        let surface = self.surface_mut(&msg.surface_id);
        for component in msg.components {
            surface.components.insert(component.id.clone(), component);
        }
        surface.rebuild_tree();
    }

    fn process_data_model_update(&mut self, msg: DataModelUpdate) {
        let surface = self.surface_mut(&msg.surface_id);
        surface.data_model.apply_updates(&msg.path, &msg.contents);
        if surface.uses_templates {
            surface.rebuild_tree();
        }
    }

    fn process_delete_surface(&mut self, msg: DeleteSurface) {
        if self.surfaces.shift_remove(&msg.surface_id).is_none() {
            ::log::debug!("[A2UI] deleteSurface for unknown surface {}", msg.surface_id);
        }
    }
}

impl MessageProcessor for A2uiMessageProcessor {
    fn process_messages(&mut self, messages: Vec<A2uiMessage>) {
        for message in messages {
            self.process_message(message);
        }
    }

    fn surfaces(&self) -> &IndexMap<String, Surface> {
        &self.surfaces
    }

    fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value> {
        let surface = self.surfaces.get(surface_id)?;
        match surface.data_model.get(&node.resolve_path(path))? {
            Value::Null => None,
            value => Some(value.clone()),
        }
    }

    fn set_data(
        &mut self,
        node: Option<&ComponentNode>,
        path: &str,
        value: Value,
        surface_id: &str,
    ) {
        let Some(surface) = self.surfaces.get_mut(surface_id) else {
            ::log::warn!("[A2UI] set_data on unknown surface {}", surface_id);
            return;
        };
        let full_path = match node {
            Some(node) => node.resolve_path(path),
            None => resolve_path(path, None),
        };
        if !surface.data_model.set(&full_path, value) {
            ::log::warn!("[A2UI] Cannot set {} on surface {}", full_path, surface_id);
            return;
        }
        if surface.uses_templates {
            surface.rebuild_tree();
        }
    }

    fn clear_surfaces(&mut self) {
        self.surfaces.clear();
    }
}

/// Walks a surface's adjacency list from the root and resolves child
/// references into shared nodes.
struct TreeBuilder<'a> {
    components: &'a HashMap<String, ComponentDefinition>,
    data: &'a DataModel,
    /// Definition ids on the current path, for cycle detection
    visiting: HashSet<String>,
    uses_templates: bool,
}

impl TreeBuilder<'_> {
    fn build(
        &mut self,
        definition_id: &str,
        scope: Option<&str>,
        suffix: &str,
    ) -> Option<Rc<ComponentNode>> {
        let components = self.components;
        let Some(definition) = components.get(definition_id) else {
            ::log::debug!("[A2UI] Component {} not defined yet", definition_id);
            return None;
        };
        if !self.visiting.insert(definition_id.to_string()) {
            ::log::warn!("[A2UI] Reference cycle through component {}", definition_id);
            return None;
        }

        let mut node = ComponentNode::new(
            format!("{}{}", definition_id, suffix),
            definition.component.component_type.clone(),
        );
        node.weight = definition.weight;
        node.data_context_path = scope.map(str::to_string);

        for (key, value) in &definition.component.properties {
            if let Some(property) = self.resolve_property(key, value, scope, suffix) {
                node.properties.insert(key.clone(), property);
            }
        }

        self.visiting.remove(definition_id);
        Some(Rc::new(node))
    }

    fn resolve_property(
        &mut self,
        key: &str,
        value: &Value,
        scope: Option<&str>,
        suffix: &str,
    ) -> Option<NodeProperty> {
        match value {
            Value::String(id) if is_child_key(key) => {
                if !self.components.contains_key(id) {
                    ::log::warn!("[A2UI] Dangling child reference {} in {}", id, key);
                    return None;
                }
                self.build(id, scope, suffix).map(NodeProperty::Child)
            }
            // Bare strings naming a component are references too
            Value::String(id) if self.components.contains_key(id) => {
                self.build(id, scope, suffix).map(NodeProperty::Child)
            }
            Value::Object(obj) if key == "children" => {
                Some(NodeProperty::Children(self.resolve_children(obj, scope, suffix)))
            }
            _ => Some(NodeProperty::Value(value.clone())),
        }
    }

    fn resolve_children(
        &mut self,
        obj: &Map<String, Value>,
        scope: Option<&str>,
        suffix: &str,
    ) -> Vec<Rc<ComponentNode>> {
        if let Some(list) = obj.get("explicitList").and_then(Value::as_array) {
            return list
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|id| {
                    if !self.components.contains_key(id) {
                        ::log::warn!("[A2UI] Dangling child reference {}", id);
                        return None;
                    }
                    self.build(id, scope, suffix)
                })
                .collect();
        }

        let Some(template) = obj.get("template").and_then(Value::as_object) else {
            return Vec::new();
        };
        let (Some(template_id), Some(binding)) = (
            template.get("componentId").and_then(Value::as_str),
            template.get("dataBinding").and_then(Value::as_str),
        ) else {
            ::log::warn!("[A2UI] Template without componentId/dataBinding");
            return Vec::new();
        };

        self.uses_templates = true;
        let list_path = resolve_path(binding, scope);
        let keys: Vec<String> = match self.data.get(&list_path) {
            Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };

        keys.into_iter()
            .filter_map(|key| {
                let item_scope = format!("{}/{}", list_path.trim_end_matches('/'), key);
                let item_suffix = format!("{}:{}", suffix, key);
                self.build(template_id, Some(&item_scope), &item_suffix)
            })
            .collect()
    }
}

fn is_child_key(key: &str) -> bool {
    key == "child" || key.ends_with("Child")
}
