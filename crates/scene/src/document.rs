//! JSON form of a scene: node hierarchy, capability types, slot tables and
//! host instances with their current slot values.
//!
//! Node references carry a readable root path plus an optional `at` locator
//! (child positions from the root). When present the locator wins, so names
//! that repeat or contain `/` still load back onto the same node.

use crate::error::{Result, SceneError};
use crate::matcher::BoundValue;
use crate::registry::TypeRegistry;
use crate::slot::{Host, SlotRegistry, SlotTable};
use crate::tree::{CapabilityRef, NodeId, NodeTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator used for every path stored in a document
const DOC_SEP: &str = "/";

fn default_active() -> bool {
    true
}

fn is_active(active: &bool) -> bool {
    *active
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,

    #[serde(default = "default_active", skip_serializing_if = "is_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            capabilities: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Stored slot value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueSpec {
    Node {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<Vec<usize>>,
    },
    Transform {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<Vec<usize>>,
    },
    Capability {
        path: String,
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<Vec<usize>>,
        /// Position in the node's capability list
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSpec {
    /// Root path of the host node
    pub node: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Vec<usize>>,

    #[serde(rename = "type")]
    pub host_type: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, ValueSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Capability type -> direct supertypes
    #[serde(default, skip_serializing_if = "TypeRegistry::is_empty")]
    pub types: TypeRegistry,

    pub root: NodeSpec,

    #[serde(default)]
    pub host_types: Vec<SlotTable>,

    #[serde(default)]
    pub hosts: Vec<HostSpec>,
}

/// Loaded scene ready for binding passes
#[derive(Debug, Clone)]
pub struct Scene {
    pub tree: NodeTree,
    pub types: TypeRegistry,
    pub registry: SlotRegistry,
    pub hosts: Vec<Host>,
}

impl Scene {
    /// Index of the first host attached to the node at `path`
    pub fn host_at(&self, path: &str) -> Option<usize> {
        let nodes = self.tree.find_all_by_path(path, DOC_SEP);
        self.hosts.iter().position(|host| nodes.contains(&host.node()))
    }

    /// Document snapshot of the current tree and slot values
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            types: self.types.clone(),
            root: node_spec(&self.tree, self.tree.root()),
            host_types: self.registry.tables().cloned().collect(),
            hosts: self.hosts.iter().map(|h| host_spec(&self.tree, h)).collect(),
        }
    }
}

impl SceneDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the arena, register slot tables and attach hosts
    pub fn into_scene(self) -> Result<Scene> {
        let mut tree = NodeTree::new(self.root.name.clone());
        let root = tree.root();
        populate(&mut tree, root, &self.root)?;

        let mut registry = SlotRegistry::new();
        for table in self.host_types {
            registry.register(table)?;
        }

        let mut hosts = Vec::with_capacity(self.hosts.len());
        for spec in &self.hosts {
            let node = locate(&tree, &spec.node, spec.at.as_deref())?;
            let mut host = registry.instantiate(&spec.host_type, node)?;
            for (slot, value) in &spec.values {
                host.set(slot, Some(resolve_value(&tree, value)?))?;
            }
            hosts.push(host);
        }

        log::debug!(
            "Loaded scene `{}`: {} nodes, {} hosts",
            tree.name(tree.root()),
            tree.len(),
            hosts.len()
        );

        Ok(Scene {
            tree,
            types: self.types,
            registry,
            hosts,
        })
    }
}

fn populate(tree: &mut NodeTree, id: NodeId, spec: &NodeSpec) -> Result<()> {
    tree.set_active(id, spec.active)?;
    for capability in &spec.capabilities {
        tree.add_capability(id, capability.as_str())?;
    }
    for child in &spec.children {
        let child_id = tree.add_child(id, child.name.as_str())?;
        populate(tree, child_id, child)?;
    }
    Ok(())
}

/// Node named by a locator when present, otherwise by its root path
fn locate(tree: &NodeTree, path: &str, at: Option<&[usize]>) -> Result<NodeId> {
    let node = match at {
        Some(locator) => tree.find_by_locator(locator),
        None => tree.find_by_path(path, DOC_SEP),
    };
    node.ok_or_else(|| SceneError::PathNotFound(path.to_string()))
}

fn resolve_value(tree: &NodeTree, value: &ValueSpec) -> Result<BoundValue> {
    match value {
        ValueSpec::Node { path, at } => locate(tree, path, at.as_deref()).map(BoundValue::Node),
        ValueSpec::Transform { path, at } => {
            locate(tree, path, at.as_deref()).map(BoundValue::Transform)
        }
        ValueSpec::Capability {
            path,
            type_name,
            at,
            index,
        } => {
            let missing = || SceneError::PathNotFound(format!("{path} ({type_name})"));
            let nodes: Vec<NodeId> = match at {
                Some(locator) => tree.find_by_locator(locator).into_iter().collect(),
                None => tree.find_all_by_path(path, DOC_SEP),
            };
            nodes
                .into_iter()
                .find_map(|node| {
                    let caps = tree.capabilities_of(node);
                    let index = match index {
                        Some(index) => Some(*index).filter(|&i| {
                            caps.get(i).is_some_and(|cap| &cap.type_name == type_name)
                        }),
                        None => caps.iter().position(|cap| &cap.type_name == type_name),
                    }?;
                    Some(BoundValue::Capability(CapabilityRef { node, index }))
                })
                .ok_or_else(missing)
        }
    }
}

fn node_spec(tree: &NodeTree, id: NodeId) -> NodeSpec {
    let Some(node) = tree.get(id) else {
        return NodeSpec::new("");
    };
    NodeSpec {
        name: node.name.clone(),
        active: node.active,
        capabilities: node
            .capabilities()
            .iter()
            .map(|cap| cap.type_name.clone())
            .collect(),
        children: node
            .children()
            .iter()
            .map(|&child| node_spec(tree, child))
            .collect(),
    }
}

fn host_spec(tree: &NodeTree, host: &Host) -> HostSpec {
    let values = host
        .slots()
        .filter_map(|(slot, value)| {
            let value = value?;
            let owner = value.owner();
            let path = tree.path(owner, DOC_SEP);
            let at = tree.locator(owner);
            let spec = match value {
                BoundValue::Node(_) => ValueSpec::Node { path, at },
                BoundValue::Transform(_) => ValueSpec::Transform { path, at },
                BoundValue::Capability(cap) => ValueSpec::Capability {
                    path,
                    type_name: tree.capability(cap)?.type_name.clone(),
                    at,
                    index: Some(cap.index),
                },
            };
            Some((slot.name.clone(), spec))
        })
        .collect();

    HostSpec {
        node: tree.path(host.node(), DOC_SEP),
        at: tree.locator(host.node()),
        host_type: host.host_type().to_string(),
        values,
    }
}
