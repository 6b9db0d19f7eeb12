//! Scripted pointer sessions replayed through a ticker and a router.
//!
//! Scripts are JSON:
//!
//! ```json
//! { "steps": [
//!     { "event": { "kind": "move", "offset": [50.0, 50.0] } },
//!     { "advance_ms": 33.0 },
//!     { "event": { "kind": "down", "offset": [50.0, 50.0] } }
//! ] }
//! ```
//!
//! Each step first advances the ticker by `advance_ms` (when positive), then
//! delivers `event` (when present).

use anyhow::Result;
use raypick_interact::{PointerEvent, PointerEventRouter};
use raypick_scene::Ticker;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, rc::Rc};
use tracing::debug;

/// One step of a scripted session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerStep {
    /// Frame time to advance before the event
    #[serde(default)]
    pub advance_ms: f64,
    /// Event to deliver
    #[serde(default)]
    pub event: Option<PointerEvent>,
}

/// Deterministic sequence of ticks and pointer events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerScript {
    /// Steps in playback order
    pub steps: Vec<PointerStep>,
}

impl PointerScript {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a script from JSON
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(contents)?;
        if script.steps.is_empty() {
            anyhow::bail!("pointer script contains no steps");
        }
        Ok(script)
    }

    /// Load a script from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Builder: advance the ticker
    pub fn wait(mut self, ms: f64) -> Self {
        self.steps.push(PointerStep {
            advance_ms: ms,
            event: None,
        });
        self
    }

    /// Builder: deliver an event
    pub fn event(mut self, event: PointerEvent) -> Self {
        self.steps.push(PointerStep {
            advance_ms: 0.0,
            event: Some(event),
        });
        self
    }

    /// Builder: move to `(x, y)`
    pub fn move_to(self, x: f32, y: f32) -> Self {
        self.event(PointerEvent::moved(x, y))
    }

    /// Builder: press and release at `(x, y)`
    pub fn click_at(self, x: f32, y: f32) -> Self {
        self.event(PointerEvent::down(x, y)).event(PointerEvent::up(x, y))
    }

    /// Total frame time the script advances
    pub fn duration_ms(&self) -> f64 {
        self.steps.iter().map(|s| s.advance_ms.max(0.0)).sum()
    }

    /// Replay every step. Returns the number of events delivered
    pub fn play(&self, ticker: &Rc<Ticker>, router: &mut PointerEventRouter) -> usize {
        let mut delivered = 0;
        for step in &self.steps {
            if step.advance_ms > 0.0 {
                ticker.tick(step.advance_ms);
            }
            if let Some(event) = &step.event {
                router.handle_event(event);
                delivered += 1;
            }
        }
        debug!(steps = self.steps.len(), delivered, "Pointer script replayed");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raypick_interact::{new_scene, Canvas, InteractionHandler, PointerEventKind, RouterOptions};
    use raypick_scene::{Aabb, Camera};

    #[test]
    fn parses_documented_format() {
        let script = PointerScript::from_json_str(
            r#"{ "steps": [
                { "event": { "kind": "move", "offset": [50.0, 50.0] } },
                { "advance_ms": 33.0 },
                { "event": { "kind": "down", "offset": [50.0, 50.0], "is_primary": false } }
            ] }"#,
        )
        .expect("script parses");
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.duration_ms(), 33.0);
        let last = script.steps[2].event.expect("event present");
        assert_eq!(last.kind, PointerEventKind::Down);
        assert!(!last.is_primary);
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(PointerScript::from_json_str(r#"{ "steps": [] }"#).is_err());
    }

    #[test]
    fn replay_clicks_through_router() {
        let scene = new_scene();
        let node = {
            let mut s = scene.borrow_mut();
            let root = s.root();
            s.add_mesh(root, "box", Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0)), None)
                .unwrap()
        };
        let checkbox = InteractionHandler::checkbox(&scene, node, None).unwrap();
        let ticker = Ticker::new();
        let mut router = PointerEventRouter::new(
            &scene,
            Camera::default(),
            Canvas::new(100.0, 100.0),
            &ticker,
            RouterOptions::default(),
        );

        let delivered = PointerScript::new()
            .move_to(50.0, 50.0)
            .wait(33.0)
            .click_at(50.0, 50.0)
            .play(&ticker, &mut router);

        assert_eq!(delivered, 3);
        assert_eq!(ticker.elapsed_ms(), 33.0);
        assert!(checkbox.is_over());
        assert_eq!(checkbox.is_selected(), Ok(true));
    }
}
