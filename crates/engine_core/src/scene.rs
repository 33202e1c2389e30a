//! In-memory scene hierarchy stored in a `hecs` world.
//!
//! Each node is an entity carrying a name, an optional parent link, a local
//! transform, a visibility flag and optionally a material shader. Parent links
//! point upward only; children are found by scanning, which is fine for the
//! part-sized hierarchies this is used for.

use crate::{NodeId, ShaderId, Transform};
use hecs::World;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Name(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parent(Option<NodeId>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visible(bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Material {
    shader: ShaderId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("{0} does not exist")]
    NoSuchNode(NodeId),
    #[error("{0} has no material")]
    NoMaterial(NodeId),
    #[error("parenting {child} under {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}

/// Scene hierarchy.
#[derive(Default)]
pub struct SceneGraph {
    world: World,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a visible node without a material.
    pub fn spawn(&mut self, name: &str, parent: Option<NodeId>, transform: Transform) -> NodeId {
        NodeId(self.world.spawn((
            Name(name.to_string()),
            Parent(parent),
            transform,
            Visible(true),
        )))
    }

    /// Spawn a visible node rendered with `shader`.
    pub fn spawn_with_material(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        transform: Transform,
        shader: ShaderId,
    ) -> NodeId {
        NodeId(self.world.spawn((
            Name(name.to_string()),
            Parent(parent),
            transform,
            Visible(true),
            Material { shader },
        )))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.world.contains(node.0)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn name(&self, node: NodeId) -> Option<String> {
        self.world.get::<&Name>(node.0).ok().map(|n| n.0.clone())
    }

    /// Direct children of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.world
            .query::<&Parent>()
            .iter()
            .filter(|(_, parent)| parent.0 == Some(node))
            .map(|(entity, _)| NodeId(entity))
            .collect()
    }

    /// `node` and all of its descendants, parents before children.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut i = 0;
        while i < out.len() {
            let children = self.children(out[i]);
            out.extend(children);
            i += 1;
        }
        out
    }

    /// Depth-first search of `root`'s descendants (and `root` itself) by name.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.subtree(root)
            .into_iter()
            .find(|&n| self.name(n).as_deref() == Some(name))
    }

    /// Remove `node` and every descendant.
    pub fn despawn_recursive(&mut self, node: NodeId) -> Result<(), SceneError> {
        if !self.contains(node) {
            return Err(SceneError::NoSuchNode(node));
        }
        for n in self.subtree(node) {
            let _ = self.world.despawn(n.0);
        }
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, SceneError> {
        self.world
            .get::<&Parent>(node.0)
            .map(|p| p.0)
            .map_err(|_| SceneError::NoSuchNode(node))
    }

    /// Re-parent `node`, keeping its local transform as is.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::NoSuchNode(p));
            }
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == node {
                    return Err(SceneError::Cycle { child: node, parent: p });
                }
                cursor = self.parent(c)?;
            }
        }
        let mut link = self
            .world
            .get::<&mut Parent>(node.0)
            .map_err(|_| SceneError::NoSuchNode(node))?;
        link.0 = parent;
        Ok(())
    }

    pub fn local_transform(&self, node: NodeId) -> Result<Transform, SceneError> {
        self.world
            .get::<&Transform>(node.0)
            .map(|t| *t)
            .map_err(|_| SceneError::NoSuchNode(node))
    }

    pub fn set_local_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), SceneError> {
        let mut t = self
            .world
            .get::<&mut Transform>(node.0)
            .map_err(|_| SceneError::NoSuchNode(node))?;
        *t = transform;
        Ok(())
    }

    pub fn is_visible(&self, node: NodeId) -> Result<bool, SceneError> {
        self.world
            .get::<&Visible>(node.0)
            .map(|v| v.0)
            .map_err(|_| SceneError::NoSuchNode(node))
    }

    /// Show or hide `node` and its whole subtree.
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<(), SceneError> {
        if !self.contains(node) {
            return Err(SceneError::NoSuchNode(node));
        }
        for n in self.subtree(node) {
            if let Ok(mut v) = self.world.get::<&mut Visible>(n.0) {
                v.0 = visible;
            }
        }
        Ok(())
    }

    pub fn shader(&self, node: NodeId) -> Result<ShaderId, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::NoSuchNode(node));
        }
        self.world
            .get::<&Material>(node.0)
            .map(|m| m.shader)
            .map_err(|_| SceneError::NoMaterial(node))
    }

    pub fn set_shader(&mut self, node: NodeId, shader: ShaderId) -> Result<(), SceneError> {
        if !self.contains(node) {
            return Err(SceneError::NoSuchNode(node));
        }
        let mut m = self
            .world
            .get::<&mut Material>(node.0)
            .map_err(|_| SceneError::NoMaterial(node))?;
        m.shader = shader;
        Ok(())
    }
}
