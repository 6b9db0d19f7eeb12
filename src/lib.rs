//! Pointer interaction for retained 3D scene graphs.
//!
//! Attach an [`InteractionHandler`] to a scene node to give it hover, press
//! and click behavior. Handlers swap the node's material from a
//! [`MaterialStateSet`] as their state changes, checkboxes toggle on click,
//! and radio buttons coordinate through an [`ExclusiveSelectionGroup`]. A
//! [`PointerEventRouter`] hit tests raw pointer input against the scene and
//! delivers it to the handler under the pointer and to its enabled ancestors.
//!
//! # Example
//!
//! ```rust
//! use raypick::glam::Vec3;
//! use raypick::{
//!     new_scene, Aabb, Camera, Canvas, InteractionHandler, PointerEvent, PointerEventRouter,
//!     RouterOptions, Ticker,
//! };
//!
//! let scene = new_scene();
//! let node = {
//!     let mut s = scene.borrow_mut();
//!     let root = s.root();
//!     s.add_mesh(root, "button", Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0)), None)
//!         .unwrap()
//! };
//! let checkbox = InteractionHandler::checkbox(&scene, node, None).unwrap();
//!
//! let ticker = Ticker::new();
//! let mut router = PointerEventRouter::new(
//!     &scene,
//!     Camera::default(),
//!     Canvas::new(100.0, 100.0),
//!     &ticker,
//!     RouterOptions::default(),
//! );
//!
//! router.handle_event(&PointerEvent::down(50.0, 50.0));
//! router.handle_event(&PointerEvent::up(50.0, 50.0));
//! assert_eq!(checkbox.is_selected(), Ok(true));
//! ```

pub use glam;
pub use raypick_interact::*;
pub use raypick_scene::{
    ray_billboard_quad, Aabb, Camera, Emitter, ListenerId, Material, MaterialHandle, Node, NodeId,
    NodeKind, Ray, SceneError, SceneGraph, SceneHit, Subscription, TickEvent, Ticker,
    VisualResource,
};
pub use serde_json::Value;

use anyhow::Result;

/// Version of the raypick crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize raypick with default settings
pub fn init() -> Result<()> {
    tracing::info!("Initializing raypick v{}", VERSION);
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
