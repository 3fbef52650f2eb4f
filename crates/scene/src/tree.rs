use crate::error::{Result, SceneError};
use serde::{Deserialize, Serialize};

/// Stable handle of a node inside a [`NodeTree`] arena
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena slot of this node
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw id value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Typed facet attached to a node (collider, mesh, gameplay script, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    /// Concrete capability type name
    pub type_name: String,
}

impl Capability {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

/// Address of one capability: owning node plus position in its capability list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub node: NodeId,
    pub index: usize,
}

/// Named point in the hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name (not unique within a tree)
    pub name: String,

    /// Inactive nodes hide their whole subtree from default searches
    pub active: bool,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
    capabilities: Vec<Capability>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            active: true,
            parent,
            children: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in their stored order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// Rooted tree of named nodes stored as an arena.
///
/// Nodes are only ever appended, so a [`NodeId`] stays valid for the lifetime
/// of the tree. Parent/child links are index relations.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Create a tree holding a single root node
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name.into(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Node data, or [`SceneError::UnknownNode`] for foreign ids
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(SceneError::UnknownNode(id.raw()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(SceneError::UnknownNode(id.raw()))
    }

    /// Node name; empty for foreign ids
    pub fn name(&self, id: NodeId) -> &str {
        self.get(id).map_or("", |node| node.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Append a child under `parent` and return its id
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.node(parent)?;
        let raw = u32::try_from(self.nodes.len())
            .map_err(|_| SceneError::invalid_document("node arena exhausted"))?;
        let id = NodeId(raw);
        self.nodes.push(Node::new(name.into(), Some(parent)));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Attach a capability to `node`
    pub fn add_capability(
        &mut self,
        node: NodeId,
        type_name: impl Into<String>,
    ) -> Result<CapabilityRef> {
        let entry = self.node_mut(node)?;
        entry.capabilities.push(Capability::new(type_name));
        Ok(CapabilityRef {
            node,
            index: entry.capabilities.len() - 1,
        })
    }

    pub fn set_active(&mut self, node: NodeId, active: bool) -> Result<()> {
        self.node_mut(node)?.active = active;
        Ok(())
    }

    /// Rename `node`, returning its previous name
    pub fn rename(&mut self, node: NodeId, name: impl Into<String>) -> Result<String> {
        let entry = self.node_mut(node)?;
        Ok(std::mem::replace(&mut entry.name, name.into()))
    }

    /// Capabilities of `node` in attachment order; empty for foreign ids
    pub fn capabilities_of(&self, node: NodeId) -> &[Capability] {
        self.get(node).map(Node::capabilities).unwrap_or_default()
    }

    pub fn capability(&self, cap: CapabilityRef) -> Option<&Capability> {
        self.get(cap.node)
            .and_then(|node| node.capabilities.get(cap.index))
    }

    /// `node` and every node below it in pre-order, children in stored order.
    ///
    /// With `include_inactive == false` an inactive node is skipped together
    /// with its subtree, including `node` itself.
    pub fn descendants(&self, node: NodeId, include_inactive: bool) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            let Some(entry) = self.get(current) else {
                continue;
            };
            if !include_inactive && !entry.active {
                continue;
            }
            result.push(current);
            stack.extend(entry.children.iter().rev().copied());
        }

        result
    }

    /// True when `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Names from `ancestor` down to `node` joined by `sep`.
    ///
    /// Falls back to the full root path when `ancestor` is not above `node`.
    pub fn path_from(&self, ancestor: NodeId, node: NodeId, sep: &str) -> String {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(entry) = self.get(id) else {
                break;
            };
            names.push(entry.name.as_str());
            if id == ancestor {
                break;
            }
            current = entry.parent;
        }
        names.reverse();
        names.join(sep)
    }

    /// Full path from the tree root
    pub fn path(&self, node: NodeId, sep: &str) -> String {
        self.path_from(self.root(), node, sep)
    }

    /// Every node whose root path equals `path`, in pre-order
    pub fn find_all_by_path(&self, path: &str, sep: &str) -> Vec<NodeId> {
        let mut segments = path.split(sep).filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return Vec::new();
        };

        let mut frontier: Vec<NodeId> = if self.name(self.root()) == first {
            vec![self.root()]
        } else {
            Vec::new()
        };

        for segment in segments {
            frontier = frontier
                .iter()
                .flat_map(|&id| self.get(id).map(Node::children).unwrap_or_default())
                .copied()
                .filter(|&child| self.name(child) == segment)
                .collect();
            if frontier.is_empty() {
                break;
            }
        }

        frontier
    }

    /// First node whose root path equals `path`
    pub fn find_by_path(&self, path: &str, sep: &str) -> Option<NodeId> {
        self.find_all_by_path(path, sep).into_iter().next()
    }

    /// Child positions leading from the root down to `node`.
    ///
    /// Unlike a name path this stays unique when names repeat or contain
    /// the separator.
    pub fn locator(&self, node: NodeId) -> Option<Vec<usize>> {
        self.get(node)?;
        let mut steps = Vec::new();
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            let position = self
                .get(parent)?
                .children
                .iter()
                .position(|&child| child == current)?;
            steps.push(position);
            current = parent;
        }
        steps.reverse();
        Some(steps)
    }

    /// Node reached by following child positions from the root
    pub fn find_by_locator(&self, locator: &[usize]) -> Option<NodeId> {
        locator.iter().try_fold(self.root(), |id, &position| {
            self.get(id)?.children.get(position).copied()
        })
    }
}
