//! Visual resources assigned to scene nodes.

use std::cell::RefCell;
use std::rc::Rc;

/// A renderable material. Only `opacity` is touched by interaction code
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Debug label (e.g. `"button/over"`)
    pub label: String,
    /// Base RGBA color
    pub color: [f32; 4],
    /// Opacity in `0.0..=1.0`
    pub opacity: f32,
}

impl Material {
    /// Create an opaque material
    pub fn new(label: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            color,
            opacity: 1.0,
        }
    }

    /// Builder: set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Wrap in a shared handle
    pub fn into_handle(self) -> MaterialHandle {
        Rc::new(RefCell::new(self))
    }
}

/// Shared, mutable material. Cloning the handle aliases the material
pub type MaterialHandle = Rc<RefCell<Material>>;

/// What a mesh or sprite draws with: one material or one per geometry group
#[derive(Debug, Clone)]
pub enum VisualResource {
    /// A single material
    Single(MaterialHandle),
    /// One material per geometry group
    Multi(Vec<MaterialHandle>),
}

impl VisualResource {
    /// Every material handle in this resource
    pub fn materials(&self) -> &[MaterialHandle] {
        match self {
            Self::Single(handle) => std::slice::from_ref(handle),
            Self::Multi(handles) => handles,
        }
    }

    /// Current opacity of every material, in order
    pub fn opacities(&self) -> Vec<f32> {
        self.materials()
            .iter()
            .map(|handle| handle.borrow().opacity)
            .collect()
    }

    /// Whether both resources reference the same materials in the same order
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let (a, b) = (self.materials(), other.materials());
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
    }
}

impl From<MaterialHandle> for VisualResource {
    fn from(handle: MaterialHandle) -> Self {
        Self::Single(handle)
    }
}

impl From<Material> for VisualResource {
    fn from(material: Material) -> Self {
        Self::Single(material.into_handle())
    }
}

impl From<Vec<MaterialHandle>> for VisualResource {
    fn from(handles: Vec<MaterialHandle>) -> Self {
        Self::Multi(handles)
    }
}
