//! Per-object interaction state machine.
//!
//! An [`InteractionHandler`] is attached to one scene node. It tracks hover,
//! press, enabled and frozen flags, runs its [`ClickBehavior`] on completed
//! clicks, emits [`InteractionEvent`]s, and swaps the node's visual resource
//! from its [`MaterialStateSet`] whenever the visible state changes.
//!
//! Handlers are shared (`Rc`) and mutate through `&self`. No interior borrow
//! is held while listeners run, so listeners may call back into the handler,
//! its group, or other handlers.

use crate::behavior::{BehaviorKind, ClickBehavior};
use crate::error::InteractionError;
use crate::event::{InteractionEvent, InteractionEventKind, PointerEvent};
use crate::material_set::MaterialStateSet;
use crate::state::ClickableState;
use raypick_scene::{Emitter, ListenerId, NodeId, SceneGraph, Subscription, VisualResource};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Shared handle to a handler
pub type HandlerRef = Rc<InteractionHandler>;

/// Scene graph whose nodes may carry an interaction handler
pub type InteractiveScene = SceneGraph<HandlerRef>;

/// Shared scene handle used by handlers and routers
pub type SharedScene = Rc<RefCell<InteractiveScene>>;

/// Create an empty shared scene
pub fn new_scene() -> SharedScene {
    Rc::new(RefCell::new(InteractiveScene::new()))
}

/// Weak reference from a handler to the node it drives
#[derive(Debug, Clone)]
pub struct ViewRef {
    scene: Weak<RefCell<InteractiveScene>>,
    node: NodeId,
}

impl ViewRef {
    /// Node driven by the handler
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The scene, if it is still alive
    pub fn scene(&self) -> Option<SharedScene> {
        self.scene.upgrade()
    }

    fn assign(&self, resource: VisualResource) {
        let Some(scene) = self.scene.upgrade() else {
            return;
        };
        let Ok(mut scene) = scene.try_borrow_mut() else {
            warn!(node = %self.node, "Scene is borrowed; skipping material assignment");
            return;
        };
        if !scene.contains(self.node) {
            debug!(node = %self.node, "View node is no longer in the scene; skipping material assignment");
            return;
        }
        if !scene.set_resource(self.node, resource) {
            trace!(node = %self.node, "View has no resource slot; skipping material assignment");
        }
    }
}

#[derive(Debug)]
struct HandlerState {
    state: ClickableState,
    is_press: bool,
    is_over: bool,
    mouse_enabled: bool,
    frozen: bool,
    global_alpha: f32,
    value: Value,
    behavior: ClickBehavior,
}

impl HandlerState {
    fn check_active(&self) -> bool {
        self.mouse_enabled && !self.frozen && !self.behavior.is_frozen()
    }
}

/// Interaction state machine bound to one scene node
#[derive(Debug)]
pub struct InteractionHandler {
    view: ViewRef,
    state: RefCell<HandlerState>,
    material_set: RefCell<Option<MaterialStateSet>>,
    emitter: Emitter<InteractionEvent>,
}

impl InteractionHandler {
    /// Create a handler for `node` and attach it to the node, replacing any
    /// previous handler. The node's resource is set from `material_set`
    /// immediately.
    pub fn attach(
        scene: &SharedScene,
        node: NodeId,
        material_set: Option<MaterialStateSet>,
        behavior: ClickBehavior,
    ) -> Result<HandlerRef, InteractionError> {
        let handler = Rc::new(Self {
            view: ViewRef {
                scene: Rc::downgrade(scene),
                node,
            },
            state: RefCell::new(HandlerState {
                state: ClickableState::Normal,
                is_press: false,
                is_over: false,
                mouse_enabled: true,
                frozen: false,
                global_alpha: 1.0,
                value: Value::Null,
                behavior,
            }),
            material_set: RefCell::new(material_set),
            emitter: Emitter::new(),
        });

        let previous = scene.borrow_mut().attach(node, Rc::clone(&handler))?;
        if previous.is_some() {
            debug!(node = %node, "Replaced existing interaction handler");
        }
        handler.update_material();
        Ok(handler)
    }

    /// Attach a plain button handler
    pub fn button(
        scene: &SharedScene,
        node: NodeId,
        material_set: Option<MaterialStateSet>,
    ) -> Result<HandlerRef, InteractionError> {
        Self::attach(scene, node, material_set, ClickBehavior::Plain)
    }

    /// Attach a checkbox handler
    pub fn checkbox(
        scene: &SharedScene,
        node: NodeId,
        material_set: Option<MaterialStateSet>,
    ) -> Result<HandlerRef, InteractionError> {
        Self::attach(scene, node, material_set, ClickBehavior::toggle())
    }

    /// Attach a radio button handler
    pub fn radio(
        scene: &SharedScene,
        node: NodeId,
        material_set: Option<MaterialStateSet>,
        value: impl Into<Value>,
    ) -> Result<HandlerRef, InteractionError> {
        let handler = Self::attach(scene, node, material_set, ClickBehavior::exclusive())?;
        handler.set_value(value);
        Ok(handler)
    }

    // === Queries ===

    /// The view this handler drives
    pub fn view(&self) -> &ViewRef {
        &self.view
    }

    /// Node this handler drives
    pub fn node(&self) -> NodeId {
        self.view.node
    }

    /// Current visual state
    pub fn state(&self) -> ClickableState {
        self.state.borrow().state
    }

    /// Whether a press is in progress
    pub fn is_press(&self) -> bool {
        self.state.borrow().is_press
    }

    /// Whether the pointer is over this object. Tracked even while inactive
    pub fn is_over(&self) -> bool {
        self.state.borrow().is_over
    }

    /// Whether pointer interaction is enabled
    pub fn mouse_enabled(&self) -> bool {
        self.state.borrow().mouse_enabled
    }

    /// Caller-controlled soft lock
    pub fn frozen(&self) -> bool {
        self.state.borrow().frozen
    }

    /// Group-controlled lock of an exclusive handler
    pub fn is_frozen(&self) -> bool {
        self.state.borrow().behavior.is_frozen()
    }

    /// Whether pointer events currently change state
    pub fn check_active(&self) -> bool {
        self.state.borrow().check_active()
    }

    /// Global opacity multiplier
    pub fn alpha(&self) -> f32 {
        self.state.borrow().global_alpha
    }

    /// Capability tag
    pub fn behavior_kind(&self) -> BehaviorKind {
        self.state.borrow().behavior.kind()
    }

    /// Click behavior and the state it owns
    pub fn behavior(&self) -> ClickBehavior {
        self.state.borrow().behavior
    }

    /// Selection of a checkbox or radio handler
    pub fn is_selected(&self) -> Result<bool, InteractionError> {
        self.state
            .borrow()
            .behavior
            .selection()
            .ok_or(InteractionError::NotSelectable(self.node()))
    }

    /// Opaque payload
    pub fn value(&self) -> Value {
        self.state.borrow().value.clone()
    }

    /// Material set in use, if any
    pub fn material_set(&self) -> Option<MaterialStateSet> {
        self.material_set.borrow().clone()
    }

    // === Mutation ===

    /// Replace the opaque payload
    pub fn set_value(&self, value: impl Into<Value>) {
        self.state.borrow_mut().value = value.into();
    }

    /// Set the caller-controlled soft lock
    pub fn set_frozen(&self, frozen: bool) {
        self.state.borrow_mut().frozen = frozen;
    }

    /// Set the global opacity multiplier and refresh the material
    pub fn set_alpha(&self, alpha: f32) {
        self.state.borrow_mut().global_alpha = alpha;
        self.update_material();
    }

    /// Replace the material set and refresh
    pub fn set_material_set(&self, material_set: Option<MaterialStateSet>) {
        *self.material_set.borrow_mut() = material_set;
        self.update_material();
    }

    /// Enable interaction
    pub fn enable(&self) {
        self.switch_enable(true);
    }

    /// Disable interaction
    pub fn disable(&self) {
        self.switch_enable(false);
    }

    /// Enable or disable interaction. Enabling returns to `Normal`
    pub fn switch_enable(&self, enabled: bool) {
        {
            let mut s = self.state.borrow_mut();
            s.mouse_enabled = enabled;
            s.state = if enabled {
                ClickableState::Normal
            } else {
                ClickableState::Disable
            };
        }
        self.update_material();
    }

    /// Set the selection of a checkbox or radio handler without emitting
    pub fn set_selection(&self, selected: bool) -> Result<(), InteractionError> {
        if !self.state.borrow_mut().behavior.set_selection(selected) {
            return Err(InteractionError::NotSelectable(self.node()));
        }
        self.update_material();
        Ok(())
    }

    /// Group path: set selection and lock together
    pub(crate) fn set_exclusive_lock(&self, locked: bool) {
        {
            let mut s = self.state.borrow_mut();
            s.behavior.set_selection(locked);
            s.behavior.set_frozen(locked);
        }
        self.update_material();
    }

    // === Events ===

    /// Register a listener for one event kind
    pub fn on(
        &self,
        kind: InteractionEventKind,
        listener: impl Fn(&InteractionEvent) + 'static,
    ) -> ListenerId {
        self.emitter.add(move |event: &InteractionEvent| {
            if event.kind == kind {
                listener(event);
            }
        })
    }

    /// Remove a listener registered with [`on`](Self::on)
    pub fn off(&self, id: ListenerId) -> bool {
        self.emitter.remove(id)
    }

    /// Register a listener; it is removed when the subscription is dropped
    pub fn subscribe(
        self: &Rc<Self>,
        kind: InteractionEventKind,
        listener: impl Fn(&InteractionEvent) + 'static,
    ) -> Subscription {
        let id = self.on(kind, listener);
        let weak = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(handler) = weak.upgrade() {
                handler.off(id);
            }
        })
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.emitter.len()
    }

    fn emit(self: &Rc<Self>, kind: InteractionEventKind, is_selected: Option<bool>) {
        trace!(node = %self.node(), event = %kind, "Emitting interaction event");
        self.emitter.emit(&InteractionEvent {
            kind,
            source: Rc::clone(self),
            is_selected,
        });
    }

    // === Pointer input ===

    /// Pointer pressed on this object
    pub fn on_pointer_down(self: &Rc<Self>, _event: &PointerEvent) {
        {
            let mut s = self.state.borrow_mut();
            if !s.check_active() {
                return;
            }
            s.is_press = true;
            s.state = ClickableState::Down;
        }
        self.update_material();
        self.emit(InteractionEventKind::Down, None);
    }

    /// Pointer released on this object. A release that ends a press is a click
    pub fn on_pointer_up(self: &Rc<Self>, _event: &PointerEvent) {
        let was_press = {
            let mut s = self.state.borrow_mut();
            if !s.check_active() {
                return;
            }
            let was_press = s.is_press;
            s.is_press = false;
            s.state = if s.is_over {
                ClickableState::Over
            } else {
                ClickableState::Normal
            };
            was_press
        };
        self.update_material();
        self.emit(InteractionEventKind::Up, None);

        if was_press {
            self.click();
            self.emit(InteractionEventKind::Click, None);
        }
    }

    /// Pointer entered this object
    pub fn on_pointer_over(self: &Rc<Self>, _event: &PointerEvent) {
        self.hover(true);
    }

    /// Pointer left this object
    pub fn on_pointer_out(self: &Rc<Self>, _event: &PointerEvent) {
        self.hover(false);
    }

    fn hover(self: &Rc<Self>, over: bool) {
        {
            let mut s = self.state.borrow_mut();
            s.is_over = over;
            if !s.check_active() {
                return;
            }
            s.state = if over {
                ClickableState::Over
            } else {
                ClickableState::Normal
            };
        }
        self.update_material();
        let kind = if over {
            InteractionEventKind::Over
        } else {
            InteractionEventKind::Out
        };
        self.emit(kind, None);
    }

    fn click(self: &Rc<Self>) {
        let changed = self.state.borrow_mut().behavior.on_click();
        if let Some(selected) = changed {
            self.emit(InteractionEventKind::Select, Some(selected));
            self.update_material();
        }
    }

    /// Push opacity and the current state's material to the view
    pub fn update_material(&self) {
        let (state, mouse_enabled, selected, alpha) = {
            let s = self.state.borrow();
            (
                s.state,
                s.mouse_enabled,
                s.behavior.selection().unwrap_or(false),
                s.global_alpha,
            )
        };
        let resource = {
            let set = self.material_set.borrow();
            let Some(set) = set.as_ref() else {
                return;
            };
            set.set_opacity(alpha);
            set.get_material(state, mouse_enabled, selected)
                .resource()
                .clone()
        };
        self.view.assign(resource);
    }
}
