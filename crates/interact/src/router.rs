//! Pointer event routing: hit testing, hover bookkeeping and bubbling.
//!
//! A [`PointerEventRouter`] turns raw pointer events from one canvas into
//! handler calls. Moves are sampled at most once per throttle interval (driven
//! by a [`Ticker`]); presses and releases are always processed.
//!
//! For each event the router casts a ray through the pointer, walks the hits
//! nearest-first and, for the first hit that resolves to an enabled handler,
//! dispatches to that handler and to every enabled handler among its
//! ancestors. Nodes without a handler are transparent; a disabled handler ends
//! the walk.

use crate::config::RouterOptions;
use crate::event::{PointerEvent, PointerEventKind};
use crate::handler::{HandlerRef, InteractiveScene, SharedScene};
use crate::viewport::{has_area, is_contained, to_normalized_coords, Canvas, Viewport};
use glam::Vec2;
use raypick_scene::{Camera, NodeId, Subscription, Ticker};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Move-sampling gate re-armed by accumulated frame time
#[derive(Debug)]
struct Throttle {
    interval_ms: Cell<f64>,
    elapsed_ms: Cell<f64>,
    armed: Cell<bool>,
}

impl Throttle {
    fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: Cell::new(interval_ms),
            elapsed_ms: Cell::new(0.0),
            armed: Cell::new(true),
        }
    }

    fn advance(&self, delta_ms: f64) {
        let elapsed = self.elapsed_ms.get() + delta_ms;
        if elapsed >= self.interval_ms.get() {
            self.elapsed_ms.set(0.0);
            self.armed.set(true);
        } else {
            self.elapsed_ms.set(elapsed);
        }
    }

    fn try_acquire(&self) -> bool {
        if self.interval_ms.get() <= 0.0 {
            return true;
        }
        self.armed.replace(false)
    }
}

/// Routes pointer events from one canvas into the handlers of a scene
#[derive(Debug)]
pub struct PointerEventRouter {
    scene: SharedScene,
    camera: Camera,
    canvas: Canvas,
    options: RouterOptions,
    throttle: Rc<Throttle>,
    current_over: Vec<HandlerRef>,
    _tick: Subscription,
}

impl PointerEventRouter {
    /// Create a router for `scene` as seen through `camera` on `canvas`.
    /// The router samples pointer moves on `ticker` until it is dropped.
    pub fn new(
        scene: &SharedScene,
        camera: Camera,
        canvas: Canvas,
        ticker: &Rc<Ticker>,
        options: RouterOptions,
    ) -> Self {
        let throttle = Rc::new(Throttle::new(options.throttle_ms));
        let gate = Rc::clone(&throttle);
        let tick = ticker.subscribe(move |evt| gate.advance(evt.delta_ms));

        debug!(
            throttle_ms = options.throttle_ms,
            viewport = ?options.viewport,
            "Pointer event router created"
        );

        Self {
            scene: Rc::clone(scene),
            camera,
            canvas,
            options,
            throttle,
            current_over: Vec::new(),
            _tick: tick,
        }
    }

    /// Dispatch a raw pointer event by kind
    pub fn handle_event(&mut self, event: &PointerEvent) {
        if self.options.primary_only && !event.is_primary {
            trace!(pointer_id = event.pointer_id, "Ignoring non-primary pointer");
            return;
        }
        match event.kind {
            PointerEventKind::Move => self.on_pointer_move(event),
            PointerEventKind::Down => self.on_pointer_down(event),
            PointerEventKind::Up => self.on_pointer_up(event),
        }
    }

    /// Update hover state. Throttled
    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        if !self.throttle.try_acquire() {
            trace!("Pointer move throttled");
            return;
        }

        let chain = self.pick(event.offset);
        let previous = std::mem::take(&mut self.current_over);

        for handler in &chain {
            if !contains(&previous, handler) {
                handler.on_pointer_over(event);
            }
        }
        for handler in &previous {
            if !contains(&chain, handler) {
                handler.on_pointer_out(event);
            }
        }

        self.current_over = chain;
    }

    /// Press on whatever is under the pointer. Never throttled
    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        for handler in self.pick(event.offset) {
            handler.on_pointer_down(event);
        }
    }

    /// Release on whatever is under the pointer. Never throttled
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        for handler in self.pick(event.offset) {
            handler.on_pointer_up(event);
        }
    }

    /// The pointer left the canvas: every hovered handler gets `out`
    pub fn on_pointer_leave(&mut self, event: &PointerEvent) {
        for handler in std::mem::take(&mut self.current_over) {
            handler.on_pointer_out(event);
        }
    }

    /// Handlers that would receive an event at `point`: the first enabled
    /// handler hit, followed by its enabled ancestors.
    pub fn pick(&self, point: Vec2) -> Vec<HandlerRef> {
        let viewport = self.options.viewport.as_ref();
        if !has_area(&self.canvas, viewport) {
            debug!(?viewport, canvas = ?self.canvas, "Hit target has no area; skipping hit test");
            return Vec::new();
        }
        if !is_contained(&self.canvas, viewport, point) {
            return Vec::new();
        }

        let ndc = to_normalized_coords(&self.canvas, point, viewport);
        if !ndc.is_finite() {
            debug!(?point, "Pointer maps to non-finite coordinates; skipping hit test");
            return Vec::new();
        }
        let ray = self.camera.ray_from_ndc(ndc);

        let Ok(scene) = self.scene.try_borrow() else {
            warn!("Scene is mutably borrowed; skipping hit test");
            return Vec::new();
        };
        let hits = scene.intersect_ray(&ray, self.camera.position());

        for hit in &hits {
            if let Some(target) = find_target(&scene, hit.node) {
                trace!(node = %hit.node, target = %target, distance = hit.distance, "Pointer hit");
                return bubble_chain(&scene, target);
            }
        }
        Vec::new()
    }

    /// Handlers currently under the pointer
    pub fn current_over(&self) -> &[HandlerRef] {
        &self.current_over
    }

    /// Router options
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Restrict (or stop restricting) hit testing to a viewport
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.options.viewport = viewport;
    }

    /// Change the move-sampling interval
    pub fn set_throttle_ms(&mut self, throttle_ms: f64) {
        self.options.throttle_ms = throttle_ms;
        self.throttle.interval_ms.set(throttle_ms);
    }

    /// Canvas size descriptor
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Update the canvas after a resize
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Camera used for hit testing
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }
}

fn contains(list: &[HandlerRef], handler: &HandlerRef) -> bool {
    list.iter().any(|h| Rc::ptr_eq(h, handler))
}

/// Walk up from a hit node to the first node carrying an enabled handler
fn find_target(scene: &InteractiveScene, node: NodeId) -> Option<NodeId> {
    let root = scene.root();
    let mut current = Some(node);
    while let Some(id) = current {
        if id == root {
            return None;
        }
        match scene.attachment(id) {
            Some(handler) if handler.mouse_enabled() => return Some(id),
            Some(_) => return None,
            None => current = scene.parent_of(id),
        }
    }
    None
}

/// `target`'s handler followed by every enabled handler above it, stopping at
/// the root or at the first disabled handler.
fn bubble_chain(scene: &InteractiveScene, target: NodeId) -> Vec<HandlerRef> {
    let root = scene.root();
    let mut chain: Vec<HandlerRef> = scene.attachment(target).cloned().into_iter().collect();

    for ancestor in scene.ancestors(target) {
        if ancestor == root {
            break;
        }
        match scene.attachment(ancestor) {
            Some(handler) if handler.mouse_enabled() => chain.push(Rc::clone(handler)),
            Some(_) => break,
            None => {}
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_free_then_waits_for_interval() {
        let throttle = Throttle::new(33.0);
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());

        throttle.advance(16.0);
        assert!(!throttle.try_acquire());
        throttle.advance(17.0);
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn accumulator_resets_after_rearm() {
        let throttle = Throttle::new(33.0);
        throttle.try_acquire();
        throttle.advance(40.0);
        throttle.try_acquire();
        throttle.advance(20.0);
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn zero_interval_never_throttles() {
        let throttle = Throttle::new(0.0);
        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
    }
}
