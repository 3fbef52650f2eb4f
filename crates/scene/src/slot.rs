use crate::error::{Result, SceneError};
use crate::matcher::{BoundValue, Target};
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared type of a slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// Reference to a node
    Node,

    /// Reference to a node's placement facet
    Transform,

    /// Reference to a capability of the named type (or a subtype)
    Capability(String),

    /// Homogeneous collection; never auto-resolved
    Collection(Box<SlotType>),

    /// Plain data field (numbers, strings, ...); never auto-resolved
    Value(String),
}

impl SlotType {
    pub fn capability(type_name: impl Into<String>) -> Self {
        Self::Capability(type_name.into())
    }

    pub fn collection(inner: SlotType) -> Self {
        Self::Collection(Box::new(inner))
    }

    /// Lookup target for reference types; `None` for collections and plain data
    pub fn target(&self) -> Option<Target> {
        match self {
            Self::Node => Some(Target::Node),
            Self::Transform => Some(Target::Transform),
            Self::Capability(name) => Some(Target::Capability(name.clone())),
            Self::Collection(_) | Self::Value(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

/// Opt-in / opt-out markers on a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Private slot explicitly opted into auto-binding
    pub auto_bind: bool,

    /// Public slot explicitly opted out of auto-binding
    pub hide: bool,
}

/// Why a slot is left out of binding and renaming passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligible {
    /// Private slot without the auto-bind marker
    NotOptedIn,

    /// Public slot carrying the hide marker
    OptedOut,

    /// Collection slot
    Collection,

    /// Plain data slot
    NotReference,
}

/// One declared slot in a host type's table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotDecl {
    /// Slot name; must equal the target node's name
    pub name: String,

    #[serde(rename = "type")]
    pub ty: SlotType,

    pub visibility: Visibility,

    #[serde(default)]
    pub markers: Markers,
}

impl SlotDecl {
    pub fn new(name: impl Into<String>, ty: SlotType, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility,
            markers: Markers::default(),
        }
    }

    pub fn public(name: impl Into<String>, ty: SlotType) -> Self {
        Self::new(name, ty, Visibility::Public)
    }

    pub fn private(name: impl Into<String>, ty: SlotType) -> Self {
        Self::new(name, ty, Visibility::Private)
    }

    /// Builder: opt a private slot into auto-binding
    #[must_use]
    pub fn auto_bind(mut self) -> Self {
        self.markers.auto_bind = true;
        self
    }

    /// Builder: opt a public slot out of auto-binding
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.markers.hide = true;
        self
    }

    /// Lookup target when the slot takes part in auto-binding
    pub fn eligibility(&self) -> std::result::Result<Target, Ineligible> {
        let target = match &self.ty {
            SlotType::Collection(_) => return Err(Ineligible::Collection),
            SlotType::Value(_) => return Err(Ineligible::NotReference),
            ty => ty.target().ok_or(Ineligible::NotReference)?,
        };

        match self.visibility {
            Visibility::Private if !self.markers.auto_bind => Err(Ineligible::NotOptedIn),
            Visibility::Public if self.markers.hide => Err(Ineligible::OptedOut),
            _ => Ok(target),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.eligibility().is_ok()
    }
}

/// Declarative slot table registered for one host type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTable {
    pub host_type: String,

    /// Slots in declaration order
    pub slots: Vec<SlotDecl>,
}

impl SlotTable {
    pub fn new(host_type: impl Into<String>) -> Self {
        Self {
            host_type: host_type.into(),
            slots: Vec::new(),
        }
    }

    /// Builder: append a slot declaration
    #[must_use]
    pub fn with(mut self, slot: SlotDecl) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    /// Eligible slots in declaration order with their lookup targets
    pub fn eligible(&self) -> impl Iterator<Item = (usize, &SlotDecl, Target)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot.eligibility() {
                Ok(target) => Some((idx, slot, target)),
                Err(reason) => {
                    log::debug!("Slot `{}` not eligible: {:?}", slot.name, reason);
                    None
                }
            })
    }
}

/// Slot tables keyed by host type name, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    tables: Vec<SlotTable>,
    index: HashMap<String, usize>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table; each host type may be registered once
    pub fn register(&mut self, table: SlotTable) -> Result<()> {
        if self.index.contains_key(&table.host_type) {
            return Err(SceneError::DuplicateHostType(table.host_type));
        }
        self.index.insert(table.host_type.clone(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    pub fn get(&self, host_type: &str) -> Option<&SlotTable> {
        self.index.get(host_type).map(|&idx| &self.tables[idx])
    }

    /// Every registered table, in registration order
    pub fn tables(&self) -> impl Iterator<Item = &SlotTable> {
        self.tables.iter()
    }

    /// Create a host with every slot unassigned
    pub fn instantiate(&self, host_type: &str, node: NodeId) -> Result<Host> {
        let table = self
            .get(host_type)
            .ok_or_else(|| SceneError::UnknownHostType(host_type.to_string()))?;
        Ok(Host::new(node, table.clone()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Host object: a node carrying a slot table and the slots' current values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    node: NodeId,
    table: SlotTable,
    values: Vec<Option<BoundValue>>,
}

impl Host {
    pub fn new(node: NodeId, table: SlotTable) -> Self {
        let values = vec![None; table.slots.len()];
        Self {
            node,
            table,
            values,
        }
    }

    /// Node the host is attached to
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub fn host_type(&self) -> &str {
        &self.table.host_type
    }

    /// Current value of a slot; `None` when unassigned or undeclared
    pub fn value(&self, slot: &str) -> Option<BoundValue> {
        self.table
            .position(slot)
            .and_then(|idx| self.values[idx])
    }

    /// Assign (or clear) a slot by name
    pub fn set(&mut self, slot: &str, value: Option<BoundValue>) -> Result<()> {
        let idx = self
            .table
            .position(slot)
            .ok_or_else(|| SceneError::UnknownSlot {
                host_type: self.table.host_type.clone(),
                slot: slot.to_string(),
            })?;
        self.values[idx] = value;
        Ok(())
    }

    pub(crate) fn value_at(&self, idx: usize) -> Option<BoundValue> {
        self.values.get(idx).copied().flatten()
    }

    pub(crate) fn assign_at(&mut self, idx: usize, value: BoundValue) {
        if let Some(entry) = self.values.get_mut(idx) {
            *entry = Some(value);
        }
    }

    /// Declared slots paired with their current values
    pub fn slots(&self) -> impl Iterator<Item = (&SlotDecl, Option<BoundValue>)> {
        self.table.slots.iter().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_and_markers() {
        let gun = SlotType::capability("Gun");

        assert!(SlotDecl::public("Weapon", gun.clone()).is_eligible());
        assert_eq!(
            SlotDecl::public("Weapon", gun.clone()).hidden().eligibility(),
            Err(Ineligible::OptedOut)
        );
        assert_eq!(
            SlotDecl::private("Weapon", gun.clone()).eligibility(),
            Err(Ineligible::NotOptedIn)
        );
        assert_eq!(
            SlotDecl::private("Weapon", gun).auto_bind().eligibility(),
            Ok(Target::Capability("Gun".into()))
        );
    }

    #[test]
    fn test_non_reference_slots_never_eligible() {
        let list = SlotDecl::public("Hands", SlotType::collection(SlotType::Node));
        assert_eq!(list.eligibility(), Err(Ineligible::Collection));

        let speed = SlotDecl::private("Speed", SlotType::Value("f32".into())).auto_bind();
        assert_eq!(speed.eligibility(), Err(Ineligible::NotReference));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = SlotRegistry::new();
        registry.register(SlotTable::new("PlayerView")).unwrap();
        assert!(matches!(
            registry.register(SlotTable::new("PlayerView")),
            Err(SceneError::DuplicateHostType(_))
        ));
        assert!(registry.instantiate("EnemyView", NodeId::default()).is_err());
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = SlotRegistry::new();
        for host_type in ["Zeta", "Alpha", "Mid"] {
            registry.register(SlotTable::new(host_type)).unwrap();
        }

        let order: Vec<&str> = registry.tables().map(|t| t.host_type.as_str()).collect();
        assert_eq!(order, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(registry.get("Alpha").map(|t| t.host_type.as_str()), Some("Alpha"));
    }

    #[test]
    fn test_host_values_by_name() {
        let table = SlotTable::new("PlayerView").with(SlotDecl::public("Root", SlotType::Node));
        let mut host = Host::new(NodeId::default(), table);

        assert_eq!(host.value("Root"), None);
        host.set("Root", Some(BoundValue::Node(NodeId::default())))
            .unwrap();
        assert_eq!(host.value("Root"), Some(BoundValue::Node(NodeId::default())));
        assert!(host.set("Missing", None).is_err());
    }
}
