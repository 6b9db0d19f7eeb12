//! Radio-button coordination.
//!
//! An [`ExclusiveSelectionGroup`] listens to the `select` events of its
//! exclusive members and keeps exactly one of them selected and locked.

use crate::behavior::BehaviorKind;
use crate::error::SelectionError;
use crate::event::InteractionEventKind;
use crate::handler::HandlerRef;
use raypick_scene::{Emitter, ListenerId, Subscription};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Event emitted by a group
#[derive(Debug, Clone)]
pub enum GroupEvent {
    /// A member became the selected one
    Select {
        /// The newly selected member
        handler: HandlerRef,
    },
}

struct Member {
    handler: HandlerRef,
    // Removes the group's `select` listener from the handler when dropped.
    _subscription: Subscription,
}

/// Keeps at most one exclusive handler selected
pub struct ExclusiveSelectionGroup {
    weak_self: Weak<Self>,
    members: RefCell<Vec<Member>>,
    selected: RefCell<Option<HandlerRef>>,
    emitter: Emitter<GroupEvent>,
}

impl std::fmt::Debug for ExclusiveSelectionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusiveSelectionGroup")
            .field("members", &self.len())
            .field("selected", &self.selected.borrow().as_ref().map(|h| h.node()))
            .finish()
    }
}

impl ExclusiveSelectionGroup {
    /// Create an empty group
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            members: RefCell::new(Vec::new()),
            selected: RefCell::new(None),
            emitter: Emitter::new(),
        })
    }

    /// Create a group from `handlers`
    pub fn with_handlers<'a>(
        handlers: impl IntoIterator<Item = &'a HandlerRef>,
    ) -> Result<Rc<Self>, SelectionError> {
        let group = Self::new();
        for handler in handlers {
            group.add_handler(handler)?;
        }
        Ok(group)
    }

    /// Add an exclusive handler. Adding a member twice is a no-op
    pub fn add_handler(&self, handler: &HandlerRef) -> Result<(), SelectionError> {
        if handler.behavior_kind() != BehaviorKind::Exclusive {
            return Err(SelectionError::NotExclusive(handler.node()));
        }
        if self.contains(handler) {
            debug!(node = %handler.node(), "Handler already in selection group");
            return Ok(());
        }

        let group = self.weak_self.clone();
        let subscription = handler.subscribe(InteractionEventKind::Select, move |event| {
            if event.is_selected != Some(true) {
                return;
            }
            if let Some(group) = group.upgrade() {
                group.select(&event.source);
            }
        });

        self.members.borrow_mut().push(Member {
            handler: Rc::clone(handler),
            _subscription: subscription,
        });
        Ok(())
    }

    /// Remove a member. Returns `None` if it was not managed by this group.
    ///
    /// The removed handler leaves unselected and unlocked so it responds to
    /// clicks on its own again.
    pub fn remove_handler(&self, handler: &HandlerRef) -> Option<HandlerRef> {
        let member = {
            let mut members = self.members.borrow_mut();
            let index = members
                .iter()
                .position(|m| Rc::ptr_eq(&m.handler, handler))?;
            members.remove(index)
        };

        let mut selected = self.selected.borrow_mut();
        if selected.as_ref().is_some_and(|s| Rc::ptr_eq(s, handler)) {
            *selected = None;
        }
        drop(selected);

        let Member { handler, .. } = member;
        handler.set_exclusive_lock(false);
        Some(handler)
    }

    /// Make `handler` the selected member; every other member is unselected
    /// and unlocked.
    ///
    /// Selecting a handler outside the group logs a warning and changes
    /// nothing. Re-selecting the current, locked member emits nothing.
    pub fn select(&self, handler: &HandlerRef) {
        let members = self.members();
        if !members.iter().any(|m| Rc::ptr_eq(m, handler)) {
            warn!(node = %handler.node(), "Handler is not managed by this selection group; ignoring select");
            return;
        }

        let already_selected = self
            .selected
            .borrow()
            .as_ref()
            .is_some_and(|s| Rc::ptr_eq(s, handler));
        if already_selected && handler.is_frozen() {
            return;
        }

        *self.selected.borrow_mut() = Some(Rc::clone(handler));
        for member in &members {
            member.set_exclusive_lock(Rc::ptr_eq(member, handler));
        }

        debug!(node = %handler.node(), value = %handler.value(), "Selection group changed");
        self.emitter.emit(&GroupEvent::Select {
            handler: Rc::clone(handler),
        });
    }

    /// Currently selected member
    pub fn selected(&self) -> Option<HandlerRef> {
        self.selected.borrow().clone()
    }

    /// Payload of the selected member
    pub fn selected_value(&self) -> Option<Value> {
        self.selected.borrow().as_ref().map(|h| h.value())
    }

    /// Members in insertion order
    pub fn members(&self) -> Vec<HandlerRef> {
        self.members
            .borrow()
            .iter()
            .map(|m| Rc::clone(&m.handler))
            .collect()
    }

    /// Whether `handler` is a member
    pub fn contains(&self, handler: &HandlerRef) -> bool {
        self.members
            .borrow()
            .iter()
            .any(|m| Rc::ptr_eq(&m.handler, handler))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a listener for group events
    pub fn on(&self, listener: impl Fn(&GroupEvent) + 'static) -> ListenerId {
        self.emitter.add(listener)
    }

    /// Remove a group listener
    pub fn off(&self, id: ListenerId) -> bool {
        self.emitter.remove(id)
    }

    /// Register a listener; it is removed when the subscription is dropped
    pub fn subscribe(&self, listener: impl Fn(&GroupEvent) + 'static) -> Subscription {
        let id = self.on(listener);
        let group = self.weak_self.clone();
        Subscription::new(move || {
            if let Some(group) = group.upgrade() {
                group.off(id);
            }
        })
    }
}
