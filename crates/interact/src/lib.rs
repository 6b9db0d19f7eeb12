#![warn(missing_docs)]
//! Pointer interaction for 3D scene objects.
//!
//! Features:
//! - Per-object state machine (normal / over / down / disabled) with
//!   plain, toggle and exclusive click behaviors
//! - Material sets that map state and selection to a visual resource
//! - Exclusive selection groups (radio buttons)
//! - Viewport-aware pointer mapping and a throttled event router that hit
//!   tests the scene and bubbles events to enabled ancestors

pub mod behavior;
pub mod config;
pub mod error;
pub mod event;
pub mod group;
pub mod handler;
pub mod material_set;
pub mod router;
pub mod state;
pub mod viewport;

pub use behavior::{BehaviorKind, ClickBehavior};
pub use config::{ConfigError, RouterOptions, DEFAULT_THROTTLE_MS};
pub use error::{InteractionError, MaterialSetError, SelectionError};
pub use event::{InteractionEvent, InteractionEventKind, PointerEvent, PointerEventKind};
pub use group::{ExclusiveSelectionGroup, GroupEvent};
pub use handler::{new_scene, HandlerRef, InteractionHandler, InteractiveScene, SharedScene, ViewRef};
pub use material_set::{MaterialSlots, MaterialStateSet, StateMaterial};
pub use router::PointerEventRouter;
pub use state::{ClickableState, MaterialSlot};
pub use viewport::{
    has_area, is_contained, rectangle_of, to_normalized_coords, to_normalized_coords_into, Canvas,
    Viewport, ViewportRect,
};
