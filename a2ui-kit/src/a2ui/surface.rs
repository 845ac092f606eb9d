//! A2UI Surface
//!
//! [`A2uiSurface`] is the root container rendering one surface of an
//! [`ObservedProcessor`]. It follows the processor's change notifications,
//! keeps a snapshot of the surface's tree and renders it through the
//! retained [`Mount`] tree.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{
    emitter::{ObservedProcessor, Subscription},
    message::A2uiMessage,
    node::ComponentNode,
    registry::{ComponentRegistry, DEFAULT_NAMESPACE},
    renderer::{ActionEmitter, Mount, RenderScope},
    view::{Element, View},
};

// ============================================================================
// Snapshots
// ============================================================================

/// What a surface looks like to the view layer at one point in time
#[derive(Debug, Clone, Default)]
pub struct SurfaceSnapshot {
    /// Root of the component tree, `None` until the root is known
    pub tree: Option<Rc<ComponentNode>>,

    /// Tree version of the surface
    pub version: u64,

    /// Whether the processor knows the surface at all
    pub exists: bool,
}

impl SurfaceSnapshot {
    /// Structural equality: same tree handle, version and existence
    pub fn same_as(&self, other: &SurfaceSnapshot) -> bool {
        let same_tree = match (&self.tree, &other.tree) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        same_tree && self.version == other.version && self.exists == other.exists
    }
}

/// Compute the current snapshot of a surface.
///
/// Hosts can call this before creating the [`A2uiSurface`] and pass the
/// result as [`SurfaceOptions::initial_snapshot`] to paint immediately.
pub fn surface_snapshot(processor: &ObservedProcessor, surface_id: &str) -> SurfaceSnapshot {
    processor.with_processor(|processor| match processor.surface(surface_id) {
        Some(surface) => SurfaceSnapshot {
            tree: surface.component_tree.clone(),
            version: surface.version,
            exists: true,
        },
        None => SurfaceSnapshot::default(),
    })
}

// ============================================================================
// Environment
// ============================================================================

/// Shared rendering context of an application: the processor, the component
/// registry and the namespace surfaces render in unless told otherwise.
#[derive(Clone)]
pub struct A2uiEnvironment {
    pub processor: Rc<ObservedProcessor>,
    pub registry: Rc<RefCell<ComponentRegistry>>,
    pub namespace: String,
}

impl fmt::Debug for A2uiEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("A2uiEnvironment")
            .field("processor", &self.processor)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl A2uiEnvironment {
    pub fn new(processor: Rc<ObservedProcessor>, registry: ComponentRegistry) -> Self {
        A2uiEnvironment {
            processor,
            registry: Rc::new(RefCell::new(registry)),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Per-surface settings
#[derive(Default)]
pub struct SurfaceOptions {
    /// Registry namespace, defaults to the environment's
    pub namespace: Option<String>,

    /// Snapshot to start from instead of computing one
    pub initial_snapshot: Option<SurfaceSnapshot>,

    /// Messages processed when the surface is created
    pub initial_messages: Vec<A2uiMessage>,

    /// Receives user actions triggered on this surface
    pub on_user_action: Option<ActionEmitter>,

    /// Called with the surface id when a rendered surface disappears
    pub on_surface_missing: Option<Rc<dyn Fn(&str)>>,
}

// ============================================================================
// Surface
// ============================================================================

struct SurfaceState {
    surface_id: String,
    processor: Rc<ObservedProcessor>,
    snapshot: RefCell<Rc<SurfaceSnapshot>>,
    redraw: Rc<Cell<bool>>,
    on_surface_missing: Option<Rc<dyn Fn(&str)>>,
}

impl SurfaceState {
    fn refresh(&self) {
        let next = surface_snapshot(&self.processor, &self.surface_id);
        let previous = self.snapshot.borrow().clone();
        if previous.same_as(&next) {
            return;
        }

        let vanished = previous.tree.is_some() && !next.exists;
        *self.snapshot.borrow_mut() = Rc::new(next);
        self.redraw.set(true);

        if vanished {
            ::log::debug!("[A2UI] Surface {} disappeared", self.surface_id);
            if let Some(on_surface_missing) = &self.on_surface_missing {
                on_surface_missing(&self.surface_id);
            }
        }
    }
}

/// Renders one surface and keeps it in sync with the processor.
///
/// # Example
///
/// ```rust,ignore
/// let queue = NotifyQueue::new();
/// let processor = ObservedProcessor::new(A2uiMessageProcessor::new(), queue.spawner());
/// let env = A2uiEnvironment::new(processor.clone(), ComponentRegistry::with_standard_catalog());
/// let mut surface = A2uiSurface::new(&env, "main", SurfaceOptions::default());
///
/// processor.process_json(payload)?;
/// queue.flush();
/// if surface.needs_render() {
///     let view = surface.render();
/// }
/// ```
pub struct A2uiSurface {
    env: A2uiEnvironment,
    namespace: String,
    on_user_action: Option<ActionEmitter>,
    state: Rc<SurfaceState>,
    root: Option<Mount>,
    _subscription: Subscription,
}

impl fmt::Debug for A2uiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("A2uiSurface")
            .field("surface_id", &self.state.surface_id)
            .field("namespace", &self.namespace)
            .field("snapshot", &self.state.snapshot.borrow())
            .field("root", &self.root)
            .finish()
    }
}

impl A2uiSurface {
    pub fn new(env: &A2uiEnvironment, surface_id: impl Into<String>, options: SurfaceOptions) -> Self {
        let surface_id = surface_id.into();
        // Initial messages are part of the first paint
        if !options.initial_messages.is_empty() {
            env.processor.process_messages(options.initial_messages);
        }
        let snapshot = options
            .initial_snapshot
            .unwrap_or_else(|| surface_snapshot(&env.processor, &surface_id));

        let state = Rc::new(SurfaceState {
            surface_id,
            processor: env.processor.clone(),
            snapshot: RefCell::new(Rc::new(snapshot)),
            redraw: Rc::new(Cell::new(true)),
            on_surface_missing: options.on_surface_missing,
        });

        let weak = Rc::downgrade(&state);
        let subscription = env.processor.emitter().subscribe(move || {
            if let Some(state) = weak.upgrade() {
                state.refresh();
            }
        });

        A2uiSurface {
            env: env.clone(),
            namespace: options.namespace.unwrap_or_else(|| env.namespace.clone()),
            on_user_action: options.on_user_action,
            state,
            root: None,
            _subscription: subscription,
        }
    }

    pub fn surface_id(&self) -> &str {
        &self.state.surface_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The current snapshot. The handle only changes when the surface
    /// structurally changed.
    pub fn snapshot(&self) -> Rc<SurfaceSnapshot> {
        self.state.snapshot.borrow().clone()
    }

    /// Whether something changed since the last [`A2uiSurface::render`]
    pub fn needs_render(&self) -> bool {
        self.state.redraw.get()
    }

    /// Render the surface. Components whose inputs did not change reuse
    /// their previous output.
    pub fn render(&mut self) -> View {
        self.state.redraw.set(false);

        let snapshot = self.snapshot();
        let Some(tree) = snapshot.tree.clone() else {
            self.root = None;
            return Element::new("div")
                .attr("class", "a2ui-surface-empty")
                .attr("data-surface-id", self.state.surface_id.as_str())
                .child(format!(
                    "Surface {} has no component tree",
                    self.state.surface_id
                ))
                .into();
        };

        if self.root.as_ref().is_some_and(|root| root.node().id != tree.id) {
            self.root = None;
        }
        let root = self.root.get_or_insert_with(|| Mount::new(tree.clone()));
        root.update_node(&tree);

        let registry = self.env.registry.borrow();
        let scope = RenderScope {
            registry: &registry,
            namespace: &self.namespace,
            processor: &self.env.processor,
            surface_id: &self.state.surface_id,
            action_emitter: self.on_user_action.as_ref(),
            redraw: &self.state.redraw,
        };
        let view = root.render(&scope);

        Element::new("div")
            .attr("class", "a2ui-surface")
            .attr("data-surface-id", self.state.surface_id.as_str())
            .child(view)
            .into()
    }
}
