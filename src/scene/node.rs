//! Scene nodes: a world-space pose plus attached component references.

use glam::Vec4;

use crate::scene::{ComponentKey, NodeKey};

/// Upper bound on a node's children and attached components.
pub const NODE_LIST_CAPACITY: usize = 64;

/// A transform-carrying scene entity.
///
/// The pose is expressed as an eye/interest/up triple in world space - the
/// same parameterization a look-at transform consumes - rather than a matrix.
/// Children conceptually compose transforms, but positions are world-space
/// and traversal only defines visit order (children before their parent).
///
/// Nodes do not own their components; [`Scene`](crate::scene::Scene) pools
/// do. Detaching a component from a node leaves the component alive.
#[derive(Debug, Clone)]
pub struct Node {
    /// World-space position (`w = 1`).
    pub position: Vec4,
    /// World-space point the node faces (`w = 1`).
    pub interest: Vec4,
    /// Up hint for the node's orientation (`w = 0`).
    pub up: Vec4,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) components: Vec<ComponentKey>,
}

impl Node {
    /// Create a node at the origin, facing −Z, with +Y up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            interest: Vec4::new(0.0, 0.0, -1.0, 1.0),
            up: Vec4::new(0.0, 1.0, 0.0, 0.0),
            children: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Child node keys, in attach order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Attached component keys. Order is not significant; detach is a
    /// swap-remove.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentKey] {
        &self.components
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
