use raypick_scene::{NodeId, SceneError};
use thiserror::Error;

/// Errors raised when building a material state set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialSetError {
    /// The mandatory `normal` slot was not supplied
    #[error("material state set requires a `normal` material")]
    MissingNormal,
}

/// Errors raised by interaction handlers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// Selection was queried or set on a handler with plain click behavior
    #[error("handler on node {0} has no selection state")]
    NotSelectable(NodeId),
    /// The handler could not be attached to its node
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors raised by exclusive selection groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Only handlers with exclusive click behavior can join a group
    #[error("handler on node {0} is not an exclusive (radio) handler")]
    NotExclusive(NodeId),
}
