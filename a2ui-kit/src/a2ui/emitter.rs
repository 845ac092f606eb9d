//! Change notification
//!
//! Turns the mutation-based [`MessageProcessor`] into something a reactive
//! view layer can subscribe to. Mutations go through [`ObservedProcessor`],
//! which calls [`ChangeEmitter::notify`] afterwards. Notifications are
//! delivered on the next [`NotifyQueue::flush`], and any number of `notify`
//! calls before that collapse into a single round.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use indexmap::IndexMap;
use serde_json::Value;

use super::{
    message::{A2uiMessage, parse_messages},
    node::ComponentNode,
    processor::MessageProcessor,
    surface::{SurfaceSnapshot, surface_snapshot},
    value::DataAccessor,
};

/// The cooperative task queue that delivers deferred notifications.
///
/// Hosts own one queue per UI thread and call [`NotifyQueue::flush`] from
/// their event loop (once per frame, or after handling input).
pub struct NotifyQueue {
    pool: RefCell<LocalPool>,
}

impl Default for NotifyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotifyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyQueue").finish_non_exhaustive()
    }
}

impl NotifyQueue {
    pub fn new() -> Self {
        Self {
            pool: RefCell::new(LocalPool::new()),
        }
    }

    /// A handle for queueing work on this queue
    pub fn spawner(&self) -> LocalSpawner {
        self.pool.borrow().spawner()
    }

    /// Run queued work until nothing is left to do.
    ///
    /// Work queued while flushing (a listener mutating the processor again)
    /// runs in the same flush. Nested calls from inside a listener are ignored.
    pub fn flush(&self) {
        match self.pool.try_borrow_mut() {
            Ok(mut pool) => pool.run_until_stalled(),
            Err(_) => ::log::debug!("[A2UI] Ignoring nested NotifyQueue::flush"),
        }
    }
}

type Listener = Rc<dyn Fn()>;

struct EmitterInner {
    listeners: RefCell<IndexMap<u64, Listener>>,
    next_id: Cell<u64>,
    pending: Cell<bool>,
    spawner: LocalSpawner,
}

impl EmitterInner {
    fn dispatch(&self) {
        self.pending.set(false);

        let round: Vec<(u64, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();
        ::log::debug!("[A2UI] Notifying {} listener(s)", round.len());

        for (id, listener) in round {
            // Unsubscribed by an earlier listener of this round
            if !self.listeners.borrow().contains_key(&id) {
                continue;
            }
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener())) {
                ::log::error!(
                    "[A2UI] Change listener {} panicked: {}",
                    id,
                    panic_message(panic.as_ref())
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// A subscribable, coalescing change signal.
///
/// Cloning yields another handle to the same emitter.
#[derive(Clone)]
pub struct ChangeEmitter {
    inner: Rc<EmitterInner>,
}

impl fmt::Debug for ChangeEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field("listeners", &self.listener_count())
            .field("pending", &self.inner.pending.get())
            .finish()
    }
}

impl ChangeEmitter {
    pub fn new(spawner: LocalSpawner) -> Self {
        ChangeEmitter {
            inner: Rc::new(EmitterInner {
                listeners: RefCell::new(IndexMap::new()),
                next_id: Cell::new(0),
                pending: Cell::new(false),
                spawner,
            }),
        }
    }

    /// Register a listener, called once per notification round.
    ///
    /// Registering the same closure twice yields two independent
    /// subscriptions.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));

        Subscription {
            emitter: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Schedule a notification round unless one is already pending
    pub fn notify(&self) {
        if self.inner.pending.replace(true) {
            return;
        }

        let emitter = Rc::downgrade(&self.inner);
        let spawned = self.inner.spawner.spawn_local(async move {
            if let Some(inner) = emitter.upgrade() {
                inner.dispatch();
            }
        });
        if let Err(err) = spawned {
            ::log::warn!("[A2UI] Cannot schedule change notification: {}", err);
            self.inner.pending.set(false);
        }
    }

    /// Whether a round is scheduled but not delivered yet
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether both handles refer to the same emitter
    pub fn ptr_eq(&self, other: &ChangeEmitter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Handle of a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    emitter: Weak<EmitterInner>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// Remove the listener. Safe to call any number of times, including
    /// from inside a notification round.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.emitter.upgrade() {
            inner.listeners.borrow_mut().shift_remove(&self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.emitter
            .upgrade()
            .is_some_and(|inner| inner.listeners.borrow().contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// A [`MessageProcessor`] wrapped so that every mutation notifies its
/// [`ChangeEmitter`].
///
/// Each decorator owns exactly one emitter, so everything observing the
/// same processor shares one notification stream.
pub struct ObservedProcessor {
    processor: RefCell<Box<dyn MessageProcessor>>,
    emitter: ChangeEmitter,
}

impl fmt::Debug for ObservedProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedProcessor")
            .field("surfaces", &self.surface_ids())
            .field("emitter", &self.emitter)
            .finish()
    }
}

impl ObservedProcessor {
    pub fn new(processor: impl MessageProcessor + 'static, spawner: LocalSpawner) -> Rc<Self> {
        Rc::new(ObservedProcessor {
            processor: RefCell::new(Box::new(processor)),
            emitter: ChangeEmitter::new(spawner),
        })
    }

    /// The emitter of this processor (always the same one)
    pub fn emitter(&self) -> &ChangeEmitter {
        &self.emitter
    }

    pub fn process_messages(&self, messages: Vec<A2uiMessage>) {
        self.processor.borrow_mut().process_messages(messages);
        self.emitter.notify();
    }

    /// Parse and process a JSON payload. Nothing is applied or notified
    /// when the payload does not parse.
    pub fn process_json(&self, json: &str) -> Result<(), serde_json::Error> {
        let messages = parse_messages(json)?;
        self.process_messages(messages);
        Ok(())
    }

    pub fn set_data(
        &self,
        node: Option<&ComponentNode>,
        path: &str,
        value: Value,
        surface_id: &str,
    ) {
        self.processor
            .borrow_mut()
            .set_data(node, path, value, surface_id);
        self.emitter.notify();
    }

    pub fn clear_surfaces(&self) {
        self.processor.borrow_mut().clear_surfaces();
        self.emitter.notify();
    }

    pub fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value> {
        self.processor.borrow().get_data(node, path, surface_id)
    }

    /// Current snapshot of a surface
    pub fn surface_snapshot(&self, surface_id: &str) -> SurfaceSnapshot {
        surface_snapshot(self, surface_id)
    }

    pub fn surface_ids(&self) -> Vec<String> {
        self.processor.borrow().surfaces().keys().cloned().collect()
    }

    /// Read-only access to the wrapped processor
    pub fn with_processor<R>(&self, f: impl FnOnce(&dyn MessageProcessor) -> R) -> R {
        f(self.processor.borrow().as_ref())
    }
}

impl DataAccessor for ObservedProcessor {
    fn get_data(&self, node: &ComponentNode, path: &str, surface_id: &str) -> Option<Value> {
        ObservedProcessor::get_data(self, node, path, surface_id)
    }
}
