//! Captures handler and group events in emission order.

use crate::EventRecord;
use raypick_interact::{ExclusiveSelectionGroup, GroupEvent, HandlerRef, InteractionEventKind};
use raypick_scene::{NodeId, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

const HANDLER_EVENTS: [InteractionEventKind; 6] = [
    InteractionEventKind::Down,
    InteractionEventKind::Up,
    InteractionEventKind::Over,
    InteractionEventKind::Out,
    InteractionEventKind::Click,
    InteractionEventKind::Select,
];

#[derive(Debug, Default)]
struct Log {
    records: Vec<EventRecord>,
}

impl Log {
    fn push(&mut self, node: NodeId, kind: &str, is_selected: Option<bool>) {
        let seq = self.records.len() as u64;
        self.records.push(EventRecord {
            seq,
            node,
            kind: kind.to_string(),
            is_selected,
        });
    }
}

/// Records every event of the handlers and groups it watches.
///
/// Listeners are removed when the recorder is dropped.
#[derive(Debug, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Log>>,
    subscriptions: Vec<Subscription>,
}

impl EventRecorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Record all events emitted by `handler`
    pub fn watch(&mut self, handler: &HandlerRef) {
        for kind in HANDLER_EVENTS {
            let log = Rc::clone(&self.log);
            self.subscriptions.push(handler.subscribe(kind, move |event| {
                log.borrow_mut()
                    .push(event.source.node(), event.kind.as_str(), event.is_selected);
            }));
        }
    }

    /// Record `group_select` events of `group`
    pub fn watch_group(&mut self, group: &ExclusiveSelectionGroup) {
        let log = Rc::clone(&self.log);
        self.subscriptions
            .push(group.subscribe(move |GroupEvent::Select { handler }| {
                log.borrow_mut().push(handler.node(), "group_select", None);
            }));
    }

    /// Recorded events
    pub fn records(&self) -> Vec<EventRecord> {
        self.log.borrow().records.clone()
    }

    /// Recorded events as `(node, kind)` pairs
    pub fn kinds(&self) -> Vec<(NodeId, String)> {
        self.log
            .borrow()
            .records
            .iter()
            .map(|r| (r.node, r.kind.clone()))
            .collect()
    }

    /// Remove and return the recorded events
    pub fn take(&self) -> Vec<EventRecord> {
        std::mem::take(&mut self.log.borrow_mut().records)
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.log.borrow().records.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
