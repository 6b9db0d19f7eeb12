//! Single-threaded publish/subscribe primitives.
//!
//! [`Emitter`] keeps an ordered list of listeners. Emission works on a snapshot
//! of that list and holds no borrow while listeners run, so a listener may add
//! or remove listeners (or re-enter whatever owns the emitter) safely.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifier returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// Ordered listener list for events of type `E`
pub struct Emitter<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<E> Emitter<E> {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in registration order
    pub fn add(&self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Deliver `event` to every listener registered at the time of the call
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Disposer for a registered listener.
///
/// The listener is removed when [`Subscription::dispose`] is called or when the
/// subscription is dropped. Use [`Subscription::detach`] to keep the listener
/// alive for the lifetime of its emitter instead.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a disposal closure
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Remove the listener now
    pub fn dispose(mut self) {
        self.run();
    }

    /// Keep the listener registered and forget the disposer
    pub fn detach(mut self) {
        self.dispose = None;
    }

    fn run(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
