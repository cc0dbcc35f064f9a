//! TreeNode - one entry of the asset hierarchy
//!
//! A node mirrors the id and name of the entity it wraps and carries the
//! entity itself as its payload. Children are always present (possibly
//! empty) and are only wired by the builder.

use serde::{Deserialize, Serialize};

use super::types::{ComponentAsset, Location, NonComponentAsset};

/// Discriminant of a node, serialized as the node's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Location,
    Asset,
    Component,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Location => "location",
            NodeType::Asset => "asset",
            NodeType::Component => "component",
        }
    }
}

/// Entity wrapped by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Location(Location),
    Asset(NonComponentAsset),
    Component(ComponentAsset),
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Location(_) => NodeType::Location,
            NodeData::Asset(_) => NodeType::Asset,
            NodeData::Component(_) => NodeType::Component,
        }
    }
}

/// Node of the asset hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn location(location: Location) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            data: NodeData::Location(location),
            children: Vec::new(),
        }
    }

    pub fn asset(asset: NonComponentAsset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            data: NodeData::Asset(asset),
            children: Vec::new(),
        }
    }

    pub fn component(component: ComponentAsset) -> Self {
        Self {
            id: component.id.clone(),
            name: component.name.clone(),
            data: NodeData::Component(component),
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment, mostly for hand-made fixtures
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn add_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    /// Same node with a replaced child list
    pub fn with_same_data(&self, children: Vec<TreeNode>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            data: self.data.clone(),
            children,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentAsset> {
        match &self.data {
            NodeData::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    // =========================================================================
    // TREE OPERATIONS
    // =========================================================================

    /// Total descendants (recursive count, excluding self)
    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_count()).sum()
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Ids from this node down to the node with `id`
    pub fn path_to(&self, id: &str) -> Option<Vec<&str>> {
        if self.id == id {
            return Some(vec![self.id.as_str()]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self.id.as_str());
                return Some(path);
            }
        }
        None
    }

    /// Pre-order walk of the subtree, self first
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Pre-order walk of a whole forest
pub fn flatten(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    nodes.iter().flat_map(|n| n.walk()).collect()
}

/// Find a node anywhere in a forest
pub fn find_in<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    nodes.iter().find_map(|n| n.find(id))
}

/// Ids from a root of the forest down to the node with `id`
pub fn path_in<'a>(nodes: &'a [TreeNode], id: &str) -> Option<Vec<&'a str>> {
    nodes.iter().find_map(|n| n.path_to(id))
}

/// Number of nodes in a forest
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(|n| 1 + n.descendant_count()).sum()
}
