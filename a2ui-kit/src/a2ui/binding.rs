//! Reactive value bindings
//!
//! A [`ValueBinding`] keeps a typed value in sync with a bound property: it
//! resolves once on creation, then again on every change notification of
//! the processor, and reports when the resolved value actually changed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{
    emitter::{ObservedProcessor, Subscription},
    node::ComponentNode,
    value::{BoundValue, FromBound, resolve_value},
};

struct BindingState<T> {
    prop: RefCell<Option<BoundValue>>,
    node: RefCell<Rc<ComponentNode>>,
    /// Captured on creation and never replaced
    default: T,
    value: RefCell<T>,
    processor: Rc<ObservedProcessor>,
    surface_id: String,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
    active: Cell<bool>,
}

impl<T: FromBound> BindingState<T> {
    fn resolve(&self) -> T {
        let node = self.node.borrow();
        resolve_value(
            self.prop.borrow().as_ref(),
            self.default.clone(),
            &*self.processor,
            &node,
            &self.surface_id,
        )
    }

    /// Re-resolve; returns whether the value changed
    fn refresh(&self) -> bool {
        if !self.active.get() {
            return false;
        }
        let next = self.resolve();
        if self.value.borrow().same_value(&next) {
            return false;
        }
        *self.value.borrow_mut() = next;
        true
    }
}

/// A typed value that follows a bound property through data changes.
///
/// # Example
///
/// ```rust,ignore
/// let title = ValueBinding::new(
///     BoundValue::from_json(&json!({"path": "/title"})),
///     String::from("Untitled"),
///     &processor,
///     node.clone(),
///     "main",
/// );
/// title.on_change(|| println!("title changed"));
/// ```
pub struct ValueBinding<T: FromBound> {
    state: Rc<BindingState<T>>,
    subscription: Subscription,
}

impl<T: FromBound + fmt::Debug> fmt::Debug for ValueBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinding")
            .field("prop", &self.state.prop.borrow())
            .field("value", &self.state.value.borrow())
            .field("active", &self.state.active.get())
            .finish()
    }
}

impl<T: FromBound> ValueBinding<T> {
    /// Resolve `prop` now and keep following it
    pub fn new(
        prop: Option<BoundValue>,
        default: T,
        processor: &Rc<ObservedProcessor>,
        node: Rc<ComponentNode>,
        surface_id: &str,
    ) -> Self {
        let state = Rc::new(BindingState {
            prop: RefCell::new(prop),
            node: RefCell::new(node),
            value: RefCell::new(default.clone()),
            default,
            processor: processor.clone(),
            surface_id: surface_id.to_string(),
            on_change: RefCell::new(None),
            active: Cell::new(true),
        });
        let initial = state.resolve();
        *state.value.borrow_mut() = initial;

        let weak = Rc::downgrade(&state);
        let subscription = processor.emitter().subscribe(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if state.refresh() {
                let observer = state.on_change.borrow().clone();
                if let Some(observer) = observer {
                    observer();
                }
            }
        });

        ValueBinding {
            state,
            subscription,
        }
    }

    /// The current value
    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// The default this binding falls back to
    pub fn default_value(&self) -> &T {
        &self.state.default
    }

    /// Observe value changes caused by data updates. Replaces any previous
    /// observer.
    pub fn on_change(&self, observer: impl Fn() + 'static) {
        *self.state.on_change.borrow_mut() = Some(Rc::new(observer));
    }

    /// Point the binding at a new property and node, re-resolving without
    /// calling the change observer.
    pub fn retarget(&self, prop: Option<BoundValue>, node: Rc<ComponentNode>) {
        *self.state.prop.borrow_mut() = prop;
        *self.state.node.borrow_mut() = node;
        if self.state.active.get() {
            let next = self.state.resolve();
            *self.state.value.borrow_mut() = next;
        }
    }

    /// Stop following changes. The binding keeps its last value.
    pub fn unsubscribe(&self) {
        self.state.active.set(false);
        self.subscription.unsubscribe();
        self.state.on_change.borrow_mut().take();
    }

    pub fn is_active(&self) -> bool {
        self.state.active.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::emitter::NotifyQueue;
    use crate::a2ui::processor::A2uiMessageProcessor;
    use serde_json::json;

    fn setup() -> (NotifyQueue, Rc<ObservedProcessor>, Rc<ComponentNode>) {
        let queue = NotifyQueue::new();
        let processor = ObservedProcessor::new(A2uiMessageProcessor::new(), queue.spawner());
        processor
            .process_json(
                r#"[
                {"beginRendering": {"surfaceId": "main", "root": "root"}},
                {"dataModelUpdate": {"surfaceId": "main", "contents": [{"key": "title", "valueString": "Hello"}]}}
            ]"#,
            )
            .unwrap();
        queue.flush();
        (queue, processor, Rc::new(ComponentNode::new("title", "Text")))
    }

    fn path(p: &str) -> Option<BoundValue> {
        Some(BoundValue::path(p))
    }

    #[test]
    fn test_resolves_synchronously() {
        let (_queue, processor, node) = setup();
        let binding = ValueBinding::new(path("/title"), String::new(), &processor, node, "main");
        assert_eq!(binding.get(), "Hello");
    }

    #[test]
    fn test_follows_data_changes() {
        let (queue, processor, node) = setup();
        let binding = ValueBinding::new(path("/title"), String::new(), &processor, node, "main");
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        binding.on_change(move || c.set(c.get() + 1));

        processor.set_data(None, "/title", json!("World"), "main");
        assert_eq!(binding.get(), "Hello");
        queue.flush();
        assert_eq!(binding.get(), "World");
        assert_eq!(changes.get(), 1);

        // Unrelated data: no change reported
        processor.set_data(None, "/other", json!(1), "main");
        queue.flush();
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn test_default_is_stable() {
        let (queue, processor, node) = setup();
        let binding = ValueBinding::new(path("/count"), 5.0, &processor, node, "main");
        assert_eq!(binding.get(), 5.0);

        processor.set_data(None, "/count", json!(9), "main");
        queue.flush();
        assert_eq!(binding.get(), 9.0);

        processor.set_data(None, "/count", json!(null), "main");
        queue.flush();
        assert_eq!(binding.get(), 5.0);
        assert_eq!(*binding.default_value(), 5.0);
    }

    #[test]
    fn test_nan_is_not_a_change() {
        let (queue, processor, node) = setup();
        processor.set_data(None, "/ratio", json!("NaN"), "main");
        queue.flush();

        let binding = ValueBinding::new(path("/ratio"), 1.0, &processor, node, "main");
        assert!(binding.get().is_nan());
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        binding.on_change(move || c.set(c.get() + 1));

        processor.set_data(None, "/other", json!(1), "main");
        queue.flush();
        assert_eq!(changes.get(), 0);

        processor.set_data(None, "/ratio", json!(0.5), "main");
        queue.flush();
        assert_eq!(changes.get(), 1);
        assert_eq!(binding.get(), 0.5);
    }

    #[test]
    fn test_retarget_is_silent() {
        let (queue, processor, node) = setup();
        processor.set_data(None, "/subtitle", json!("Sub"), "main");
        queue.flush();

        let binding = ValueBinding::new(path("/title"), String::new(), &processor, node.clone(), "main");
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        binding.on_change(move || c.set(c.get() + 1));

        binding.retarget(path("/subtitle"), node);
        assert_eq!(binding.get(), "Sub");
        assert_eq!(changes.get(), 0);
    }

    #[test]
    fn test_unsubscribe_is_permanent() {
        let (queue, processor, node) = setup();
        let binding = ValueBinding::new(path("/title"), String::new(), &processor, node, "main");
        binding.unsubscribe();
        binding.unsubscribe();
        assert!(!binding.is_active());

        processor.set_data(None, "/title", json!("Ignored"), "main");
        queue.flush();
        assert_eq!(binding.get(), "Hello");
        assert_eq!(processor.emitter().listener_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (_queue, processor, node) = setup();
        {
            let _binding = ValueBinding::new(path("/title"), String::new(), &processor, node, "main");
            assert_eq!(processor.emitter().listener_count(), 1);
        }
        assert_eq!(processor.emitter().listener_count(), 0);
    }
}
