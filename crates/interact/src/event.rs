//! Pointer input and the events interaction handlers emit.

use crate::handler::HandlerRef;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of raw pointer event delivered by the host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer moved
    Move,
    /// Button pressed
    Down,
    /// Button released
    Up,
}

/// Raw pointer event in canvas-local CSS pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Event kind
    pub kind: PointerEventKind,
    /// Offset from the canvas' top-left corner
    pub offset: Vec2,
    /// Pointer identifier reported by the host
    #[serde(default)]
    pub pointer_id: u32,
    /// Whether this is the primary pointer
    #[serde(default = "primary_default")]
    pub is_primary: bool,
}

fn primary_default() -> bool {
    true
}

impl PointerEvent {
    /// Primary-pointer event at `(x, y)`
    pub fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            offset: Vec2::new(x, y),
            pointer_id: 1,
            is_primary: true,
        }
    }

    /// Primary pointer move
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    /// Primary pointer press
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    /// Primary pointer release
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }
}

/// Event names emitted by interaction handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionEventKind {
    /// Pressed
    Down,
    /// Released
    Up,
    /// Pointer entered
    Over,
    /// Pointer left
    Out,
    /// Press followed by release
    Click,
    /// Selection changed
    Select,
}

impl InteractionEventKind {
    /// Event name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Over => "over",
            Self::Out => "out",
            Self::Click => "click",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for InteractionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to handler listeners
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    /// Event name
    pub kind: InteractionEventKind,
    /// Handler that emitted the event
    pub source: HandlerRef,
    /// Selection after the change; set on `select` events only
    pub is_selected: Option<bool>,
}
