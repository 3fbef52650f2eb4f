use crate::registry::TypeRegistry;
use crate::tree::{CapabilityRef, NodeId, NodeTree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a lookup should return for a matching node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The node itself
    Node,

    /// The node's placement facet
    Transform,

    /// A capability assignable to the named type
    Capability(String),
}

/// Value held by a bound slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundValue {
    Node(NodeId),
    Transform(NodeId),
    Capability(CapabilityRef),
}

impl BoundValue {
    /// Node that owns this value
    pub fn owner(&self) -> NodeId {
        match self {
            Self::Node(id) | Self::Transform(id) => *id,
            Self::Capability(cap) => cap.node,
        }
    }
}

/// Why a unique lookup failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchError {
    /// No matching named and typed descendant
    #[error("no matching descendant")]
    NotFound,

    /// More than one matching named and typed descendant
    #[error("{candidates} matching descendants")]
    Ambiguous { candidates: usize },
}

/// Read-only lookups of named, typed descendants
pub struct CapabilityMatcher<'a> {
    tree: &'a NodeTree,
    types: &'a TypeRegistry,
}

impl<'a> CapabilityMatcher<'a> {
    pub fn new(tree: &'a NodeTree, types: &'a TypeRegistry) -> Self {
        Self { tree, types }
    }

    /// Find the single value named `name` at or below `node`.
    ///
    /// Every hit is tallied: two nodes sharing the name, or one node carrying
    /// two compatible capabilities, both yield [`MatchError::Ambiguous`].
    pub fn find_unique(
        &self,
        node: NodeId,
        name: &str,
        target: &Target,
        include_inactive: bool,
    ) -> Result<BoundValue, MatchError> {
        let named = self
            .tree
            .descendants(node, include_inactive)
            .into_iter()
            .filter(|&id| self.tree.name(id) == name);

        let hits: Vec<BoundValue> = match target {
            Target::Node => named.map(BoundValue::Node).collect(),
            Target::Transform => named.map(BoundValue::Transform).collect(),
            Target::Capability(type_name) => named
                .flat_map(|id| self.compatible(id, type_name))
                .map(BoundValue::Capability)
                .collect(),
        };

        match hits.as_slice() {
            [single] => Ok(*single),
            [] => Err(MatchError::NotFound),
            many => {
                log::warn!(
                    "{} candidates named `{}` under `{}`",
                    many.len(),
                    name,
                    self.tree.name(node)
                );
                Err(MatchError::Ambiguous {
                    candidates: many.len(),
                })
            }
        }
    }

    /// First compatible capability at or below `node`, ignoring names
    pub fn find_first(
        &self,
        node: NodeId,
        type_name: &str,
        include_inactive: bool,
    ) -> Result<CapabilityRef, MatchError> {
        self.tree
            .descendants(node, include_inactive)
            .into_iter()
            .flat_map(|id| self.compatible(id, type_name))
            .next()
            .ok_or(MatchError::NotFound)
    }

    /// Every compatible capability at or below `node`, in pre-order
    pub fn find_all(
        &self,
        node: NodeId,
        type_name: &str,
        include_inactive: bool,
    ) -> Vec<CapabilityRef> {
        self.tree
            .descendants(node, include_inactive)
            .into_iter()
            .flat_map(|id| self.compatible(id, type_name))
            .collect()
    }

    fn compatible(&self, node: NodeId, type_name: &str) -> Vec<CapabilityRef> {
        self.tree
            .capabilities_of(node)
            .iter()
            .enumerate()
            .filter(|(_, cap)| self.types.is_assignable(&cap.type_name, type_name))
            .map(|(index, _)| CapabilityRef { node, index })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm_tree() -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new("Player");
        let left = tree.add_child(tree.root(), "Hand").unwrap();
        let right = tree.add_child(tree.root(), "Hand").unwrap();
        tree.add_capability(left, "BoxCollider").unwrap();
        tree.add_capability(right, "SphereCollider").unwrap();
        (tree, left, right)
    }

    fn types() -> TypeRegistry {
        TypeRegistry::new()
            .with("BoxCollider", "Collider")
            .with("SphereCollider", "Collider")
    }

    #[test]
    fn test_duplicate_names_are_ambiguous() {
        let (tree, _, _) = arm_tree();
        let types = types();
        let matcher = CapabilityMatcher::new(&tree, &types);

        let result = matcher.find_unique(
            tree.root(),
            "Hand",
            &Target::Capability("Collider".into()),
            false,
        );
        assert_eq!(result, Err(MatchError::Ambiguous { candidates: 2 }));

        let result = matcher.find_unique(tree.root(), "Hand", &Target::Node, false);
        assert_eq!(result, Err(MatchError::Ambiguous { candidates: 2 }));
    }

    #[test]
    fn test_type_narrows_duplicate_names() {
        let (tree, left, _) = arm_tree();
        let types = types();
        let matcher = CapabilityMatcher::new(&tree, &types);

        let result = matcher.find_unique(
            tree.root(),
            "Hand",
            &Target::Capability("BoxCollider".into()),
            false,
        );
        assert_eq!(
            result,
            Ok(BoundValue::Capability(CapabilityRef {
                node: left,
                index: 0
            }))
        );
    }

    #[test]
    fn test_missing_type_is_not_found() {
        let (tree, _, _) = arm_tree();
        let types = types();
        let matcher = CapabilityMatcher::new(&tree, &types);

        let result = matcher.find_unique(
            tree.root(),
            "Hand",
            &Target::Capability("Renderer".into()),
            false,
        );
        assert_eq!(result, Err(MatchError::NotFound));
    }

    #[test]
    fn test_inactive_nodes_skipped_unless_requested() {
        let (mut tree, left, right) = arm_tree();
        tree.set_active(right, false).unwrap();
        let types = types();
        let matcher = CapabilityMatcher::new(&tree, &types);

        assert_eq!(
            matcher.find_unique(tree.root(), "Hand", &Target::Transform, false),
            Ok(BoundValue::Transform(left))
        );
        assert_eq!(
            matcher.find_unique(tree.root(), "Hand", &Target::Transform, true),
            Err(MatchError::Ambiguous { candidates: 2 })
        );
    }

    #[test]
    fn test_find_first_and_all() {
        let (tree, left, right) = arm_tree();
        let types = types();
        let matcher = CapabilityMatcher::new(&tree, &types);

        assert_eq!(
            matcher.find_first(tree.root(), "Collider", false),
            Ok(CapabilityRef {
                node: left,
                index: 0
            })
        );
        assert_eq!(
            matcher.find_all(tree.root(), "Collider", false),
            vec![
                CapabilityRef {
                    node: left,
                    index: 0
                },
                CapabilityRef {
                    node: right,
                    index: 0
                },
            ]
        );
        assert_eq!(
            matcher.find_first(tree.root(), "Renderer", true),
            Err(MatchError::NotFound)
        );
    }
}
