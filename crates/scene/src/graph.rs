//! Retained scene graph.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`]. Each node may carry one attachment of type `A`; the interaction
//! layer uses it to tag nodes that own an interaction handler.

use crate::material::VisualResource;
use crate::ray::{ray_billboard_quad, Aabb, Ray};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Handle to a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised by scene mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The node was never created or has been removed
    #[error("unknown scene node {0}")]
    UnknownNode(NodeId),
    /// The root cannot be removed or reparented
    #[error("the scene root cannot be modified this way")]
    RootImmutable,
    /// Node ids are `u32`; the arena has no index left to hand out
    #[error("scene node capacity exceeded")]
    CapacityExceeded,
}

/// What a node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Container without geometry or material
    Group,
    /// Box-shaped geometry; `bounds` are relative to the node's world position
    Mesh {
        /// Local bounds
        bounds: Aabb,
        /// Material(s) drawn with
        resource: Option<VisualResource>,
    },
    /// Camera-facing quad centered on the node's world position
    Sprite {
        /// Width and height in world units
        size: (f32, f32),
        /// Material drawn with
        resource: Option<VisualResource>,
    },
}

impl NodeKind {
    /// Whether this kind holds a visual resource slot
    pub fn has_resource_slot(&self) -> bool {
        !matches!(self, Self::Group)
    }
}

/// A node in the scene
#[derive(Debug)]
pub struct Node<A> {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    translation: Vec3,
    visible: bool,
    attachment: Option<A>,
}

impl<A> Node<A> {
    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Translation relative to the parent
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Whether the node (and therefore its subtree) takes part in hit tests
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Attached payload, if any
    pub fn attachment(&self) -> Option<&A> {
        self.attachment.as_ref()
    }
}

/// A ray hit against one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Node that was hit
    pub node: NodeId,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Arena-backed scene graph with a single root group
#[derive(Debug)]
pub struct SceneGraph<A> {
    nodes: Vec<Option<Node<A>>>,
    root: NodeId,
}

impl<A> Default for SceneGraph<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> SceneGraph<A> {
    /// Create a scene containing only the root group
    pub fn new() -> Self {
        let root = Node {
            name: "scene".to_string(),
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
            translation: Vec3::ZERO,
            visible: true,
            attachment: None,
        };
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    /// The root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the scene holds only its root
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&Node<A>> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<A>, SceneError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Insert a node under `parent`
    pub fn insert(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, SceneError> {
        let id = node_id_for(self.nodes.len())?;
        self.node_mut(parent)?.children.push(id);
        self.nodes.push(Some(Node {
            name: name.into(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            translation: Vec3::ZERO,
            visible: true,
            attachment: None,
        }));
        Ok(id)
    }

    /// Insert a group under `parent`
    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        self.insert(parent, name, NodeKind::Group)
    }

    /// Insert a box mesh under `parent`
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        bounds: Aabb,
        resource: Option<VisualResource>,
    ) -> Result<NodeId, SceneError> {
        self.insert(parent, name, NodeKind::Mesh { bounds, resource })
    }

    /// Insert a sprite under `parent`
    pub fn add_sprite(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        size: (f32, f32),
        resource: Option<VisualResource>,
    ) -> Result<NodeId, SceneError> {
        self.insert(parent, name, NodeKind::Sprite { size, resource })
    }

    /// Remove a node and its subtree. Attachments are returned in
    /// depth-first order so the caller decides when they are dropped.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<A>, SceneError> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        let parent = self.node(id).ok_or(SceneError::UnknownNode(id))?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) {
                stack.extend(node.children.iter().rev());
                removed.extend(node.attachment);
            }
        }
        tracing::debug!(node = %id, attachments = removed.len(), "Removed scene subtree");
        Ok(removed)
    }

    /// Parent of `id`, `None` for the root or unknown nodes
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id`
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, ending with the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, A> {
        Ancestors {
            graph: self,
            next: self.parent_of(id),
        }
    }

    /// Set the translation relative to the parent
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.translation = translation;
        Ok(())
    }

    /// Sum of translations from the root down to `id`
    pub fn world_translation(&self, id: NodeId) -> Vec3 {
        let own = self.node(id).map(|n| n.translation).unwrap_or(Vec3::ZERO);
        self.ancestors(id)
            .filter_map(|a| self.node(a))
            .fold(own, |acc, n| acc + n.translation)
    }

    /// Show or hide a node and its subtree for hit testing
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Attach a payload, returning the previous one
    pub fn attach(&mut self, id: NodeId, attachment: A) -> Result<Option<A>, SceneError> {
        Ok(self.node_mut(id)?.attachment.replace(attachment))
    }

    /// Payload of a node
    pub fn attachment(&self, id: NodeId) -> Option<&A> {
        self.node(id).and_then(|n| n.attachment.as_ref())
    }

    /// Visual resource currently assigned to a node
    pub fn resource(&self, id: NodeId) -> Option<&VisualResource> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Mesh { resource, .. }) | Some(NodeKind::Sprite { resource, .. }) => {
                resource.as_ref()
            }
            _ => None,
        }
    }

    /// Assign a visual resource. Returns `false` when the node has no
    /// resource slot (groups) or does not exist.
    pub fn set_resource(&mut self, id: NodeId, new_resource: VisualResource) -> bool {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Ok(NodeKind::Mesh { resource, .. }) | Ok(NodeKind::Sprite { resource, .. }) => {
                *resource = Some(new_resource);
                true
            }
            _ => false,
        }
    }

    /// Intersect `ray` with every visible mesh and sprite, nearest first.
    ///
    /// `camera_pos` orients sprites toward the viewer.
    pub fn intersect_ray(&self, ray: &Ray, camera_pos: Vec3) -> Vec<SceneHit> {
        let mut hits = Vec::new();
        let mut stack = vec![(self.root, Vec3::ZERO)];

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world + node.translation;

            let distance = match &node.kind {
                NodeKind::Group => None,
                NodeKind::Mesh { bounds, .. } => bounds.translated(world).ray_intersection(ray),
                NodeKind::Sprite { size, .. } => {
                    ray_billboard_quad(ray, world, *size, camera_pos).map(|(t, _)| t)
                }
            };
            if let Some(distance) = distance {
                hits.push(SceneHit { node: id, distance });
            }

            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a, A> {
    graph: &'a SceneGraph<A>,
    next: Option<NodeId>,
}

impl<A> Iterator for Ancestors<'_, A> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.parent_of(current);
        Some(current)
    }
}

fn node_id_for(index: usize) -> Result<NodeId, SceneError> {
    u32::try_from(index)
        .map(NodeId)
        .map_err(|_| SceneError::CapacityExceeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn unit_box() -> Aabb {
        Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn ancestors_end_at_root() {
        let mut scene = SceneGraph::<()>::new();
        let panel = scene.add_group(scene.root(), "panel").unwrap();
        let button = scene.add_mesh(panel, "button", unit_box(), None).unwrap();

        let chain: Vec<_> = scene.ancestors(button).collect();
        assert_eq!(chain, vec![panel, scene.root()]);
        assert_eq!(scene.ancestors(scene.root()).count(), 0);
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut scene = SceneGraph::<()>::new();
        let far = scene.add_mesh(scene.root(), "far", unit_box(), None).unwrap();
        scene.set_translation(far, Vec3::new(0.0, 0.0, -5.0)).unwrap();
        let near = scene.add_mesh(scene.root(), "near", unit_box(), None).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = scene.intersect_ray(&ray, ray.origin);
        let order: Vec<_> = hits.iter().map(|h| h.node).collect();
        assert_eq!(order, vec![near, far]);
    }

    #[test]
    fn translations_accumulate_down_the_tree() {
        let mut scene = SceneGraph::<()>::new();
        let panel = scene.add_group(scene.root(), "panel").unwrap();
        scene.set_translation(panel, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        let button = scene.add_mesh(panel, "button", unit_box(), None).unwrap();
        scene.set_translation(button, Vec3::new(0.0, 2.0, 0.0)).unwrap();

        assert_eq!(scene.world_translation(button), Vec3::new(3.0, 2.0, 0.0));

        let ray = Ray::new(Vec3::new(3.0, 2.0, 10.0), Vec3::NEG_Z);
        let hits = scene.intersect_ray(&ray, ray.origin);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, button);
    }

    #[test]
    fn hidden_subtrees_are_not_hit() {
        let mut scene = SceneGraph::<()>::new();
        let panel = scene.add_group(scene.root(), "panel").unwrap();
        scene.add_mesh(panel, "button", unit_box(), None).unwrap();
        scene.set_visible(panel, false).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(scene.intersect_ray(&ray, ray.origin).is_empty());
    }

    #[test]
    fn sprites_are_hit_facing_the_camera() {
        let mut scene = SceneGraph::<()>::new();
        let sprite = scene
            .add_sprite(scene.root(), "icon", (1.0, 1.0), None)
            .unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = scene.intersect_ray(&ray, ray.origin);
        assert_eq!(hits[0].node, sprite);
        assert!((hits[0].distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn groups_have_no_resource_slot() {
        let mut scene = SceneGraph::<()>::new();
        let group = scene.add_group(scene.root(), "g").unwrap();
        let mesh = scene.add_mesh(scene.root(), "m", unit_box(), None).unwrap();
        let resource = VisualResource::from(Material::new("m", [1.0; 4]));

        assert!(!scene.set_resource(group, resource.clone()));
        assert!(scene.set_resource(mesh, resource.clone()));
        assert!(scene.resource(mesh).unwrap().ptr_eq(&resource));
    }

    #[test]
    fn remove_returns_subtree_attachments() {
        let mut scene = SceneGraph::<&'static str>::new();
        let panel = scene.add_group(scene.root(), "panel").unwrap();
        let button = scene.add_mesh(panel, "button", unit_box(), None).unwrap();
        scene.attach(panel, "panel").unwrap();
        scene.attach(button, "button").unwrap();

        let removed = scene.remove(panel).unwrap();
        assert_eq!(removed, vec!["panel", "button"]);
        assert!(!scene.contains(button));
        assert!(scene.children_of(scene.root()).is_empty());
        assert_eq!(scene.remove(scene.root()), Err(SceneError::RootImmutable));
    }

    #[test]
    fn node_ids_beyond_u32_are_rejected() {
        assert_eq!(node_id_for(7), Ok(NodeId(7)));
        assert_eq!(node_id_for(u32::MAX as usize), Ok(NodeId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            node_id_for(u32::MAX as usize + 1),
            Err(SceneError::CapacityExceeded)
        );
    }
}
