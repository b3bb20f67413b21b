use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::id::SystemId;

/// An event carried through [`SystemTree::dispatch_event`](crate::SystemTree::dispatch_event).
///
/// Mirrors a custom event: a type string, an arbitrary JSON `detail`
/// payload, and the cancel/stop flags listeners may set.
#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    detail: Value,
    cancelable: bool,
    default_prevented: bool,
    stop_immediate: bool,
    target: Option<SystemId>,
    current_target: Option<SystemId>,
    time_stamp: DateTime<Utc>,
}

impl Event {
    /// Create a non-cancelable event of the given type with a null detail.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: Value::Null,
            cancelable: false,
            default_prevented: false,
            stop_immediate: false,
            target: None,
            current_target: None,
            time_stamp: Utc::now(),
        }
    }

    /// Attach a detail payload.
    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Allow listeners to cancel this event with [`prevent_default`](Self::prevent_default).
    pub fn cancelable(mut self) -> Self {
        self.cancelable = true;
        self
    }

    /// The event type listeners are matched against.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The detail payload.
    pub fn detail(&self) -> &Value {
        &self.detail
    }

    /// Whether listeners may cancel this event.
    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Whether a listener cancelled this event.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Cancel the event. Has no effect unless the event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Skip the remaining listeners of the current dispatch.
    pub fn stop_immediate_propagation(&mut self) {
        self.stop_immediate = true;
    }

    /// The system the event was last dispatched to.
    pub fn target(&self) -> Option<SystemId> {
        self.target
    }

    /// The system whose listeners are running, `None` outside a dispatch.
    pub fn current_target(&self) -> Option<SystemId> {
        self.current_target
    }

    /// When the event was created.
    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }

    pub(crate) fn begin_dispatch(&mut self, target: SystemId) {
        self.target = Some(target);
        self.current_target = Some(target);
        self.stop_immediate = false;
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.stop_immediate
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.current_target = None;
        self.stop_immediate = false;
    }
}

/// An object that handles events, the counterpart of a plain callback.
pub trait EventHandler {
    /// Called once per matching dispatch.
    fn handle_event(&self, event: &mut Event);
}

type Callback = Rc<dyn Fn(&mut Event)>;

/// A normalized event listener.
///
/// Built from either a closure or an [`EventHandler`]; both end up behind
/// a single [`invoke`](Self::invoke). Two listeners are the same when they
/// were built from the same allocation, which is what duplicate
/// suppression and removal compare.
#[derive(Clone)]
pub struct Listener {
    key: *const (),
    callback: Callback,
}

impl Listener {
    /// Wrap a plain callback.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        let callback: Callback = Rc::new(f);
        Self {
            key: Rc::as_ptr(&callback).cast::<()>(),
            callback,
        }
    }

    /// Wrap a handler object. Wrapping the same `Rc` twice yields equal listeners.
    pub fn from_handler<H>(handler: Rc<H>) -> Self
    where
        H: EventHandler + ?Sized + 'static,
    {
        let key = Rc::as_ptr(&handler).cast::<()>();
        Self {
            key,
            callback: Rc::new(move |event: &mut Event| handler.handle_event(event)),
        }
    }

    /// Run the listener against an event.
    pub fn invoke(&self, event: &mut Event) {
        (self.callback)(event);
    }

    /// Whether both listeners were built from the same callback or handler.
    pub fn same_as(&self, other: &Listener) -> bool {
        std::ptr::eq(self.key, other.key)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("key", &self.key).finish()
    }
}

/// Listeners of a single system, keyed by event type, in registration order.
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    by_kind: HashMap<String, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Register a listener. Returns false if it was already registered for `kind`.
    pub fn add(&mut self, kind: &str, listener: Listener) -> bool {
        let list = self.by_kind.entry(kind.to_string()).or_default();
        if list.iter().any(|l| l.same_as(&listener)) {
            return false;
        }
        list.push(listener);
        true
    }

    /// Remove a listener. Returns false if it was not registered for `kind`.
    pub fn remove(&mut self, kind: &str, listener: &Listener) -> bool {
        let Some(list) = self.by_kind.get_mut(kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| !l.same_as(listener));
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_kind.remove(kind);
        }
        removed
    }

    /// Whether `listener` is registered for `kind`.
    pub fn contains(&self, kind: &str, listener: &Listener) -> bool {
        self.by_kind
            .get(kind)
            .is_some_and(|list| list.iter().any(|l| l.same_as(listener)))
    }

    /// Copy of the listeners for `kind`, so a dispatch is unaffected by
    /// registrations it triggers.
    pub fn snapshot(&self, kind: &str) -> Vec<Listener> {
        self.by_kind.get(kind).cloned().unwrap_or_default()
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, Vec::len)
    }

    /// Total listeners across all event types.
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}
