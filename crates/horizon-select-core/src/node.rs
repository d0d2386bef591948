//! Node tree for the host document.
//!
//! Every element a widget renders (container root, trigger, panel, option
//! rows) is a node with a parent and an ordered list of children. The tree is
//! what outside-click detection walks: a pointer target is "inside" a panel
//! when the panel node is one of its inclusive ancestors.

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a node in a [`NodeTree`].
    ///
    /// Ids are generational: an id of a destroyed node never matches a node
    /// created later.
    pub struct NodeId;
}

/// Errors that can occur during node operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The node ID is invalid or has been destroyed.
    #[error("Invalid or destroyed node ID")]
    InvalidNodeId,
    /// Attempted to set a node as its own parent/ancestor.
    #[error("Cannot set a node as its own parent or ancestor")]
    CircularParentage,
}

/// Result type for node operations.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

#[derive(Debug)]
struct NodeData {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An ordered tree of named nodes.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, NodeData>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless node.
    pub fn create(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.nodes.insert(NodeData {
            name: name.into(),
            parent: None,
            children: Vec::new(),
        });
        tracing::trace!(target: targets::NODE, ?id, "created node");
        id
    }

    /// Create a node appended as the last child of `parent`.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeResult<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(NodeError::InvalidNodeId);
        }
        let id = self.create(name);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Destroy a node and all of its descendants.
    pub fn destroy(&mut self, id: NodeId) -> NodeResult<()> {
        let descendants = self.descendants(id)?;
        tracing::trace!(target: targets::NODE, ?id, descendant_count = descendants.len(), "destroying node subtree");

        if let Some(parent_id) = self.nodes.get(id).and_then(|d| d.parent) {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }
        for child in descendants {
            self.nodes.remove(child);
        }
        self.nodes.remove(id);
        Ok(())
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Move `id` under `new_parent` (appended last), or detach it with `None`.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> NodeResult<()> {
        if !self.nodes.contains_key(id) {
            return Err(NodeError::InvalidNodeId);
        }
        if let Some(parent_id) = new_parent {
            if !self.nodes.contains_key(parent_id) {
                return Err(NodeError::InvalidNodeId);
            }
            if self.is_inclusive_ancestor(id, parent_id) {
                return Err(NodeError::CircularParentage);
            }
        }

        if let Some(old_parent) = self.nodes.get(id).and_then(|d| d.parent) {
            if let Some(parent) = self.nodes.get_mut(old_parent) {
                parent.children.retain(|&child| child != id);
            }
        }
        if let Some(data) = self.nodes.get_mut(id) {
            data.parent = new_parent;
        }
        if let Some(parent_id) = new_parent {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.push(id);
            }
        }
        Ok(())
    }

    /// Get the children of a node in insertion order.
    pub fn children(&self, id: NodeId) -> NodeResult<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(NodeError::InvalidNodeId)
    }

    /// Get the node's name.
    pub fn name(&self, id: NodeId) -> NodeResult<&str> {
        self.nodes
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(NodeError::InvalidNodeId)
    }

    /// Ancestors of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        if !self.nodes.contains_key(id) {
            return Err(NodeError::InvalidNodeId);
        }
        let mut result = Vec::new();
        let mut current = self.nodes.get(id).and_then(|d| d.parent);
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    ///
    /// Returns `false` when either node is not in the tree.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.nodes.contains_key(ancestor) && self.is_inclusive_ancestor(ancestor, node)
    }

    fn is_inclusive_ancestor(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// All descendants of `id`, children before their parents.
    fn descendants(&self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) -> NodeResult<()> {
        let children = self.children(id)?;
        for &child in children {
            self.collect_descendants(child, result)?;
            result.push(child);
        }
        Ok(())
    }
}
