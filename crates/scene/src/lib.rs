//! # Autobind Scene
//!
//! Resolves declared slots on a host node against the named nodes below it,
//! and renames nodes so they match the slots that already point at them.
//!
//! ## Architecture
//!
//! ```text
//! SceneDocument (JSON)
//!     │
//!     ├──> NodeTree (arena of named nodes + capabilities)
//!     ├──> TypeRegistry (capability subtype relation)
//!     └──> SlotRegistry (declarative slot table per host type)
//!
//! CapabilityMatcher
//!     ├─ descendants in pre-order, filtered by name
//!     ├─ compatible capabilities only
//!     └─ exactly one hit, otherwise NotFound / Ambiguous
//!
//! AutoBinder ──> SlotReport (Bound / Skipped per eligible slot)
//! NodeRenamer ─> SlotReport (path before rename -> slot name)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use autobind_scene::{AutoBinder, BindConfig, Host, NodeTree, SlotDecl, SlotTable, SlotType, TypeRegistry};
//!
//! let mut tree = NodeTree::new("Player");
//! let weapon = tree.add_child(tree.root(), "Weapon").unwrap();
//! tree.add_capability(weapon, "Gun").unwrap();
//!
//! let table = SlotTable::new("PlayerView").with(SlotDecl::public("Weapon", SlotType::capability("Gun")));
//! let mut host = Host::new(tree.root(), table);
//!
//! let binder = AutoBinder::new(TypeRegistry::new(), BindConfig::default());
//! let report = binder.resolve(&tree, &mut host);
//! assert_eq!(report.lines()[0], "Player/Weapon -> Weapon");
//! ```

mod binder;
mod config;
mod document;
mod error;
mod matcher;
mod registry;
mod renamer;
mod report;
mod slot;
mod tree;

pub use binder::AutoBinder;
pub use config::BindConfig;
pub use document::{HostSpec, NodeSpec, Scene, SceneDocument, ValueSpec};
pub use error::{Result, SceneError};
pub use matcher::{BoundValue, CapabilityMatcher, MatchError, Target};
pub use registry::TypeRegistry;
pub use renamer::{NodeRenamer, RenamePlan};
pub use report::{Outcome, ReportEntry, ReportKind, SkipReason, SlotReport};
pub use slot::{Host, Ineligible, Markers, SlotDecl, SlotRegistry, SlotTable, SlotType, Visibility};
pub use tree::{Capability, CapabilityRef, Node, NodeId, NodeTree};

/// Report produced by [`AutoBinder::resolve`].
pub type BindReport = SlotReport;

/// Report produced by [`NodeRenamer::rename_to_match_slots`].
pub type RenameReport = SlotReport;
