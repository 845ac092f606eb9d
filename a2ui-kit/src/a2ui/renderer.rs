//! Surface renderer
//!
//! Walks a surface's component tree, looks every node's type up in the
//! [`ComponentRegistry`] and lets the registered [`A2uiComponent`] produce its
//! [`View`]. Rendering is retained: each node gets a [`Mount`] that keeps the
//! node's bindings and last output, so a data change only re-runs the
//! components whose bound values actually changed.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::{
    action::{ActionDefinition, UserActionMessage, build_user_action, resolve_action_context},
    binding::ValueBinding,
    emitter::ObservedProcessor,
    node::{ComponentNode, NodeProperty},
    registry::ComponentRegistry,
    value::{BoundValue, FromBound, resolve_json_value},
    view::{Element, EventHandler, SlotKey, UiEvent, View},
};

/// A component implementation: turns the node in `cx` into a [`View`].
///
/// Plain closures work as components:
///
/// ```rust,ignore
/// registry.register(
///     "Badge",
///     Rc::new(|cx: &mut RenderCx<'_>| {
///         let label: String = cx.use_value("label", String::new());
///         Element::new("span").attr("class", "badge").child(label).into()
///     }),
///     DEFAULT_NAMESPACE,
/// );
/// ```
pub trait A2uiComponent {
    fn render(&self, cx: &mut RenderCx<'_>) -> View;
}

impl<F> A2uiComponent for F
where
    F: Fn(&mut RenderCx<'_>) -> View,
{
    fn render(&self, cx: &mut RenderCx<'_>) -> View {
        self(cx)
    }
}

/// Receives user actions triggered on a surface
pub type ActionEmitter = Rc<dyn Fn(UserActionMessage)>;

/// Everything a render pass shares across the mounts it visits
pub(crate) struct RenderScope<'a> {
    pub registry: &'a ComponentRegistry,
    pub namespace: &'a str,
    pub processor: &'a Rc<ObservedProcessor>,
    pub surface_id: &'a str,
    pub action_emitter: Option<&'a ActionEmitter>,
    /// Raised whenever a mount needs to render again
    pub redraw: &'a Rc<Cell<bool>>,
}

/// Identity of the inputs a mount's output was produced with
struct MountInputs {
    processor: Rc<ObservedProcessor>,
    surface_id: String,
    namespace: String,
    action_emitter: Option<ActionEmitter>,
}

impl MountInputs {
    fn capture(scope: &RenderScope<'_>) -> Self {
        MountInputs {
            processor: scope.processor.clone(),
            surface_id: scope.surface_id.to_string(),
            namespace: scope.namespace.to_string(),
            action_emitter: scope.action_emitter.cloned(),
        }
    }

    /// Same processor and surface. Anything else changing only re-runs the
    /// component, a different processor or surface starts it over.
    fn same_source(&self, scope: &RenderScope<'_>) -> bool {
        Rc::ptr_eq(&self.processor, scope.processor) && self.surface_id == scope.surface_id
    }

    fn matches(&self, scope: &RenderScope<'_>) -> bool {
        let same_emitter = match (&self.action_emitter, scope.action_emitter) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        self.same_source(scope) && self.namespace == scope.namespace && same_emitter
    }
}

/// The retained render slot of one node.
///
/// Holds the node's hooks (bindings and local state) across renders and the
/// raw output of the last run, with child slots left as placeholders.
pub(crate) struct Mount {
    node: Rc<ComponentNode>,
    implementation: Option<Rc<dyn A2uiComponent>>,
    hooks: IndexMap<(String, TypeId), Box<dyn Any>>,
    children: IndexMap<String, Mount>,
    output: Option<View>,
    dirty: Rc<Cell<bool>>,
    inputs: Option<MountInputs>,
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("id", &self.node.id)
            .field("type", &self.node.component_type)
            .field("hooks", &self.hooks.len())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl Mount {
    pub fn new(node: Rc<ComponentNode>) -> Self {
        Mount {
            node,
            implementation: None,
            hooks: IndexMap::new(),
            children: IndexMap::new(),
            output: None,
            dirty: Rc::new(Cell::new(false)),
            inputs: None,
        }
    }

    pub fn node(&self) -> &Rc<ComponentNode> {
        &self.node
    }

    /// Point the mount at a (possibly) new node. Identical nodes keep the
    /// cached output.
    pub fn update_node(&mut self, node: &Rc<ComponentNode>) {
        if !Rc::ptr_eq(&self.node, node) {
            self.node = node.clone();
            self.dirty.set(true);
        }
    }

    /// Drop hooks, children and output
    fn unmount(&mut self) {
        self.implementation = None;
        self.hooks.clear();
        self.children.clear();
        self.output = None;
        self.inputs = None;
        self.dirty.set(false);
    }

    pub fn render(&mut self, scope: &RenderScope<'_>) -> View {
        let Some(implementation) = scope
            .registry
            .get(&self.node.component_type, scope.namespace)
        else {
            let cached = self.implementation.is_none()
                && !self.dirty.get()
                && self.inputs.as_ref().is_some_and(|inputs| inputs.matches(scope));
            if cached && let Some(output) = &self.output {
                return output.clone();
            }
            self.unmount();
            let placeholder = unknown_component(&self.node, scope);
            self.output = Some(placeholder.clone());
            self.inputs = Some(MountInputs::capture(scope));
            return placeholder;
        };

        let same_implementation = self
            .implementation
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &implementation));
        let same_source = self
            .inputs
            .as_ref()
            .is_none_or(|inputs| inputs.same_source(scope));
        if !same_implementation || !same_source {
            self.unmount();
            self.implementation = Some(implementation.clone());
        }

        let inputs_changed = self
            .inputs
            .as_ref()
            .is_none_or(|inputs| !inputs.matches(scope));
        if self.output.is_none() || self.dirty.get() || inputs_changed {
            self.dirty.set(false);
            let mut cx = RenderCx {
                mount: self,
                scope,
                used_children: IndexSet::new(),
            };
            let output = implementation.render(&mut cx);
            let used = cx.used_children;

            self.children.retain(|key, _| used.contains(key));
            self.output = Some(output);
            self.inputs = Some(MountInputs::capture(scope));
        }

        let Mount {
            output, children, ..
        } = self;
        match output {
            Some(output) => compose(output, children, scope),
            None => View::Empty,
        }
    }
}

/// Fill child slots of a raw output with the children's current views
fn compose(view: &View, children: &mut IndexMap<String, Mount>, scope: &RenderScope<'_>) -> View {
    match view {
        View::Slot(SlotKey(key)) => match children.get_mut(key) {
            Some(child) => child.render(scope),
            None => View::Empty,
        },
        View::Element(element) => {
            let mut composed = Element {
                tag: element.tag.clone(),
                attrs: element.attrs.clone(),
                children: Vec::with_capacity(element.children.len()),
                handlers: element.handlers.clone(),
            };
            for child in &element.children {
                composed.children.push(compose(child, children, scope));
            }
            View::Element(composed)
        }
        View::Fragment(items) => View::Fragment(
            items
                .iter()
                .map(|item| compose(item, children, scope))
                .collect(),
        ),
        View::Text(_) | View::Empty => view.clone(),
    }
}

fn unknown_component(node: &ComponentNode, scope: &RenderScope<'_>) -> View {
    ::log::warn!(
        "[A2UI] Unknown component type {} for {} (namespace: {}). Registered: {:?}",
        node.component_type,
        node.id,
        scope.namespace,
        scope.registry.registered_components(scope.namespace)
    );

    Element::new("div")
        .attr("class", "a2ui-unknown-component")
        .attr("data-component-id", node.id.as_str())
        .attr("data-component-type", node.component_type.as_str())
        .attr("data-namespace", scope.namespace)
        .child(format!(
            "Unknown component: {} (namespace: {})",
            node.component_type, scope.namespace
        ))
        .into()
}

/// Component-local state kept across renders. Setting it re-renders the
/// owning component.
pub struct State<T> {
    value: Rc<RefCell<T>>,
    dirty: Rc<Cell<bool>>,
    redraw: Rc<Cell<bool>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        State {
            value: self.value.clone(),
            dirty: self.dirty.clone(),
            redraw: self.redraw.clone(),
        }
    }
}

impl<T: Clone> State<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.dirty.set(true);
        self.redraw.set(true);
    }
}

/// The per-render bundle handed to an [`A2uiComponent`]
pub struct RenderCx<'a> {
    mount: &'a mut Mount,
    scope: &'a RenderScope<'a>,
    used_children: IndexSet<String>,
}

impl<'a> RenderCx<'a> {
    /// The node being rendered
    pub fn node(&self) -> &Rc<ComponentNode> {
        &self.mount.node
    }

    pub fn surface_id(&self) -> &str {
        self.scope.surface_id
    }

    pub fn namespace(&self) -> &str {
        self.scope.namespace
    }

    pub fn processor(&self) -> &Rc<ObservedProcessor> {
        self.scope.processor
    }

    pub fn action_emitter(&self) -> Option<&ActionEmitter> {
        self.scope.action_emitter
    }

    /// Read property `key` of the node through a binding that follows data
    /// changes.
    pub fn use_value<T: FromBound>(&mut self, key: &str, default: T) -> T {
        let prop = self.mount.node.value(key).and_then(BoundValue::from_json);
        self.use_bound_value(key, prop, default)
    }

    /// Resolve `prop` through a binding kept in hook slot `slot`.
    ///
    /// The binding is created on first use; later renders retarget it at the
    /// current property and node. Its default is the one passed first.
    pub fn use_bound_value<T: FromBound>(
        &mut self,
        slot: &str,
        prop: Option<BoundValue>,
        default: T,
    ) -> T {
        let key = (slot.to_string(), TypeId::of::<T>());
        if let Some(binding) = self
            .mount
            .hooks
            .get(&key)
            .and_then(|hook| hook.downcast_ref::<ValueBinding<T>>())
        {
            binding.retarget(prop, self.mount.node.clone());
            return binding.get();
        }

        let binding = ValueBinding::new(
            prop,
            default,
            self.scope.processor,
            self.mount.node.clone(),
            self.scope.surface_id,
        );
        let dirty = self.mount.dirty.clone();
        let redraw = self.scope.redraw.clone();
        binding.on_change(move || {
            dirty.set(true);
            redraw.set(true);
        });

        let value = binding.get();
        self.mount.hooks.insert(key, Box::new(binding));
        value
    }

    /// Local state in hook slot `key`, initialised on first use
    pub fn use_state<T: Clone + 'static>(&mut self, key: &str, init: impl FnOnce() -> T) -> State<T> {
        let key = (format!("state:{}", key), TypeId::of::<State<T>>());
        if let Some(state) = self
            .mount
            .hooks
            .get(&key)
            .and_then(|hook| hook.downcast_ref::<State<T>>())
        {
            return state.clone();
        }

        let state = State {
            value: Rc::new(RefCell::new(init())),
            dirty: self.mount.dirty.clone(),
            redraw: self.scope.redraw.clone(),
        };
        self.mount.hooks.insert(key, Box::new(state.clone()));
        state
    }

    /// One-shot resolution of a raw property, without following changes
    pub fn resolve<T: FromBound>(&self, prop: Option<&Value>, default: T) -> T {
        resolve_json_value(
            prop,
            default,
            &**self.scope.processor,
            &self.mount.node,
            self.scope.surface_id,
        )
    }

    /// Render a child node in place
    pub fn child(&mut self, node: &Rc<ComponentNode>) -> View {
        let key = node.id.clone();
        self.mount
            .children
            .entry(key.clone())
            .or_insert_with(|| Mount::new(node.clone()))
            .update_node(node);
        self.used_children.insert(key.clone());
        View::Slot(SlotKey(key))
    }

    /// Render the single child held by property `key`
    pub fn child_prop(&mut self, key: &str) -> Option<View> {
        let node = self.mount.node.clone();
        match node.property(key) {
            Some(NodeProperty::Child(child)) => Some(self.child(child)),
            _ => None,
        }
    }

    /// Render every child held by property `key`
    pub fn children(&mut self, key: &str) -> Vec<View> {
        let node = self.mount.node.clone();
        match node.property(key) {
            Some(property) => property.nodes().iter().map(|child| self.child(child)).collect(),
            None => Vec::new(),
        }
    }

    /// A handler that emits `action` as a user action. The context is
    /// resolved when the event fires.
    pub fn action_handler(&self, action: ActionDefinition) -> EventHandler {
        let processor = self.scope.processor.clone();
        let node = self.mount.node.clone();
        let surface_id = self.scope.surface_id.to_string();
        let emitter = self.scope.action_emitter.cloned();

        Rc::new(move |_event: &UiEvent| {
            let context = resolve_action_context(&action, &*processor, &node, &surface_id);
            let message = build_user_action(&action.name, &surface_id, &node.id, context);
            match &emitter {
                Some(emit) => emit(message),
                None => ::log::debug!(
                    "[A2UI] No action handler for {} on surface {}",
                    action.name,
                    surface_id
                ),
            }
        })
    }

    /// A handler writing input back to the data path property `key` is
    /// bound to. `None` when the property is not path-bound.
    pub fn two_way_handler(&self, key: &str) -> Option<EventHandler> {
        let path = self
            .mount
            .node
            .value(key)
            .and_then(BoundValue::from_json)?
            .as_path()?
            .to_string();
        let processor = self.scope.processor.clone();
        let node = self.mount.node.clone();
        let surface_id = self.scope.surface_id.to_string();

        Some(Rc::new(move |event: &UiEvent| {
            let value = match event {
                UiEvent::Input(text) | UiEvent::Select(text) => Value::String(text.clone()),
                UiEvent::Toggle(checked) => Value::Bool(*checked),
                UiEvent::Click => return,
            };
            processor.set_data(Some(&node), &path, value, &surface_id);
        }))
    }

    /// Write to the data model, relative to the node's data context
    pub fn set_data(&self, path: &str, value: Value) {
        self.scope
            .processor
            .set_data(Some(&self.mount.node), path, value, self.scope.surface_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::emitter::NotifyQueue;
    use crate::a2ui::processor::A2uiMessageProcessor;
    use crate::a2ui::registry::DEFAULT_NAMESPACE;
    use serde_json::json;

    struct Fixture {
        queue: NotifyQueue,
        processor: Rc<ObservedProcessor>,
        redraw: Rc<Cell<bool>>,
    }

    impl Fixture {
        fn new() -> Self {
            let queue = NotifyQueue::new();
            let processor = ObservedProcessor::new(A2uiMessageProcessor::new(), queue.spawner());
            processor
                .process_json(
                    r#"[{"dataModelUpdate": {"surfaceId": "main", "contents": [
                        {"key": "name", "valueString": "Ada"}
                    ]}}]"#,
                )
                .unwrap();
            queue.flush();
            Fixture {
                queue,
                processor,
                redraw: Rc::new(Cell::new(false)),
            }
        }

        fn render(&self, registry: &ComponentRegistry, mount: &mut Mount) -> View {
            let scope = RenderScope {
                registry,
                namespace: DEFAULT_NAMESPACE,
                processor: &self.processor,
                surface_id: "main",
                action_emitter: None,
                redraw: &self.redraw,
            };
            mount.render(&scope)
        }
    }

    fn counting_label(count: Rc<Cell<u32>>) -> Rc<dyn A2uiComponent> {
        Rc::new(move |cx: &mut RenderCx<'_>| {
            count.set(count.get() + 1);
            let text: String = cx.use_value("text", String::new());
            View::text(text)
        })
    }

    fn label(id: &str, text: Value) -> Rc<ComponentNode> {
        Rc::new(ComponentNode::new(id, "Label").with_value("text", text))
    }

    #[test]
    fn test_unknown_component_placeholder() {
        let fixture = Fixture::new();
        let registry = ComponentRegistry::new();
        let mut mount = Mount::new(Rc::new(ComponentNode::new("x", "Sparkline")));

        let view = fixture.render(&registry, &mut mount);
        let element = view.find_by_component_id("x").unwrap();
        assert_eq!(element.attrs["data-component-type"], "Sparkline");
        assert!(view.text_content().contains("Sparkline"));
        assert!(view.text_content().contains("namespace: default"));
    }

    #[test]
    fn test_unknown_placeholder_is_kept_until_the_node_changes() {
        let fixture = Fixture::new();
        let mut registry = ComponentRegistry::new();
        let mut mount = Mount::new(Rc::new(ComponentNode::new("x", "Sparkline")));

        let first = fixture.render(&registry, &mut mount).to_markup();
        assert!(mount.implementation.is_none());
        assert!(mount.inputs.is_some());
        assert_eq!(fixture.render(&registry, &mut mount).to_markup(), first);

        mount.update_node(&Rc::new(ComponentNode::new("x", "Chart")));
        let view = fixture.render(&registry, &mut mount);
        assert_eq!(
            view.find_by_component_id("x").unwrap().attrs["data-component-type"],
            "Chart"
        );

        registry.register(
            "Chart",
            Rc::new(|_cx: &mut RenderCx<'_>| View::text("chart")),
            DEFAULT_NAMESPACE,
        );
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "chart");
    }

    #[test]
    fn test_output_is_reused_until_a_binding_changes() {
        let fixture = Fixture::new();
        let count = Rc::new(Cell::new(0));
        let mut registry = ComponentRegistry::new();
        registry.register("Label", counting_label(count.clone()), DEFAULT_NAMESPACE);

        let mut mount = Mount::new(label("greeting", json!({"path": "/name"})));
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "Ada");
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "Ada");
        assert_eq!(count.get(), 1);

        fixture.processor.set_data(None, "/name", json!("Grace"), "main");
        fixture.queue.flush();
        assert!(fixture.redraw.get());
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "Grace");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_children_render_through_slots() {
        let fixture = Fixture::new();
        let label_count = Rc::new(Cell::new(0));
        let mut registry = ComponentRegistry::new();
        registry.register("Label", counting_label(label_count.clone()), DEFAULT_NAMESPACE);
        registry.register(
            "Stack",
            Rc::new(|cx: &mut RenderCx<'_>| {
                let id = cx.node().id.clone();
                Element::new("div")
                    .attr("data-component-id", id)
                    .children(cx.children("children"))
                    .into()
            }),
            DEFAULT_NAMESPACE,
        );

        let root = Rc::new(ComponentNode::new("root", "Stack").with_property(
            "children",
            NodeProperty::Children(vec![
                label("a", json!({"path": "/name"})),
                label("b", json!("static")),
            ]),
        ));
        let mut mount = Mount::new(root);

        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "Adastatic");
        assert_eq!(label_count.get(), 2);

        fixture.processor.set_data(None, "/name", json!("Linus"), "main");
        fixture.queue.flush();
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "Linusstatic");
        // Only the bound label ran again
        assert_eq!(label_count.get(), 3);
    }

    #[test]
    fn test_replaced_implementation_remounts() {
        let fixture = Fixture::new();
        let mut registry = ComponentRegistry::new();
        registry.register("Label", counting_label(Rc::new(Cell::new(0))), DEFAULT_NAMESPACE);

        let mut mount = Mount::new(label("greeting", json!({"path": "/name"})));
        fixture.render(&registry, &mut mount);
        assert_eq!(fixture.processor.emitter().listener_count(), 1);

        registry.register(
            "Label",
            Rc::new(|_cx: &mut RenderCx<'_>| View::text("replaced")),
            DEFAULT_NAMESPACE,
        );
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "replaced");
        assert_eq!(fixture.processor.emitter().listener_count(), 0);
    }

    #[test]
    fn test_dropped_children_release_bindings() {
        let fixture = Fixture::new();
        let mut registry = ComponentRegistry::new();
        registry.register("Label", counting_label(Rc::new(Cell::new(0))), DEFAULT_NAMESPACE);
        registry.register(
            "Stack",
            Rc::new(|cx: &mut RenderCx<'_>| View::Fragment(cx.children("children"))),
            DEFAULT_NAMESPACE,
        );

        let with_child = Rc::new(ComponentNode::new("root", "Stack").with_property(
            "children",
            NodeProperty::Children(vec![label("a", json!({"path": "/name"}))]),
        ));
        let mut mount = Mount::new(with_child);
        fixture.render(&registry, &mut mount);
        assert_eq!(fixture.processor.emitter().listener_count(), 1);

        mount.update_node(&Rc::new(ComponentNode::new("root", "Stack")));
        fixture.render(&registry, &mut mount);
        assert_eq!(fixture.processor.emitter().listener_count(), 0);
    }

    #[test]
    fn test_local_state() {
        let fixture = Fixture::new();
        let state_handle: Rc<RefCell<Option<State<u32>>>> = Rc::new(RefCell::new(None));
        let handle = state_handle.clone();
        let mut registry = ComponentRegistry::new();
        registry.register(
            "Counter",
            Rc::new(move |cx: &mut RenderCx<'_>| {
                let state = cx.use_state("count", || 0u32);
                *handle.borrow_mut() = Some(state.clone());
                View::text(state.get().to_string())
            }),
            DEFAULT_NAMESPACE,
        );

        let mut mount = Mount::new(Rc::new(ComponentNode::new("c", "Counter")));
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "0");

        state_handle.borrow().as_ref().unwrap().set(5);
        assert!(fixture.redraw.get());
        assert_eq!(fixture.render(&registry, &mut mount).text_content(), "5");
    }

    #[test]
    fn test_two_way_handler_writes_back() {
        let fixture = Fixture::new();
        let handler: Rc<RefCell<Option<EventHandler>>> = Rc::new(RefCell::new(None));
        let h = handler.clone();
        let mut registry = ComponentRegistry::new();
        registry.register(
            "Field",
            Rc::new(move |cx: &mut RenderCx<'_>| {
                *h.borrow_mut() = cx.two_way_handler("text");
                assert!(cx.two_way_handler("label").is_none());
                View::Empty
            }),
            DEFAULT_NAMESPACE,
        );

        let node = ComponentNode::new("f", "Field")
            .with_value("text", json!({"path": "/name"}))
            .with_value("label", json!("Name"));
        let mut mount = Mount::new(Rc::new(node));
        fixture.render(&registry, &mut mount);

        let handler = handler.borrow().clone().unwrap();
        handler(&UiEvent::Input("Hopper".to_string()));
        let probe = ComponentNode::new("probe", "Text");
        assert_eq!(
            fixture.processor.get_data(&probe, "/name", "main"),
            Some(json!("Hopper"))
        );
    }

    #[test]
    fn test_action_handler_resolves_context_on_event() {
        let fixture = Fixture::new();
        let handler: Rc<RefCell<Option<EventHandler>>> = Rc::new(RefCell::new(None));
        let h = handler.clone();
        let mut registry = ComponentRegistry::new();
        registry.register(
            "Go",
            Rc::new(move |cx: &mut RenderCx<'_>| {
                let action = ActionDefinition::from_json(cx.node().value("action").unwrap()).unwrap();
                *h.borrow_mut() = Some(cx.action_handler(action));
                View::Empty
            }),
            DEFAULT_NAMESPACE,
        );

        let sent: Rc<RefCell<Vec<UserActionMessage>>> = Rc::new(RefCell::new(Vec::new()));
        let s = sent.clone();
        let emitter: ActionEmitter =
            Rc::new(move |message: UserActionMessage| s.borrow_mut().push(message));

        let node = ComponentNode::new("go", "Go").with_value(
            "action",
            json!({"name": "greet", "context": [{"key": "who", "value": {"path": "/name"}}]}),
        );
        let mut mount = Mount::new(Rc::new(node));
        let scope = RenderScope {
            registry: &registry,
            namespace: DEFAULT_NAMESPACE,
            processor: &fixture.processor,
            surface_id: "main",
            action_emitter: Some(&emitter),
            redraw: &fixture.redraw,
        };
        mount.render(&scope);

        fixture.processor.set_data(None, "/name", json!("Barbara"), "main");
        let handler = handler.borrow().clone().unwrap();
        handler(&UiEvent::Click);

        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_action.source_component_id, "go");
        assert_eq!(
            sent[0].user_action.context.as_ref().unwrap()["who"],
            json!("Barbara")
        );
    }
}
