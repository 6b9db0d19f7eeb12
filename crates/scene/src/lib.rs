#![warn(missing_docs)]
//! Scene-side collaborators for pointer interaction.
//!
//! This crate holds the pieces the interaction layer consumes but does not
//! own: an arena scene graph with ray intersection, shared materials, a camera
//! that turns normalized pointer coordinates into world rays, a frame ticker,
//! and the small publish/subscribe primitives everything above is built on.

pub mod camera;
pub mod graph;
pub mod material;
pub mod ray;
pub mod signal;
pub mod ticker;

pub use camera::Camera;
pub use graph::{Ancestors, Node, NodeId, NodeKind, SceneError, SceneGraph, SceneHit};
pub use material::{Material, MaterialHandle, VisualResource};
pub use ray::{ray_billboard_quad, Aabb, Ray};
pub use signal::{Emitter, ListenerId, Subscription};
pub use ticker::{TickEvent, Ticker};
