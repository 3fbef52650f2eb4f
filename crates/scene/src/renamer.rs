use crate::config::BindConfig;
use crate::error::Result;
use crate::report::{ReportEntry, ReportKind, SkipReason, SlotReport};
use crate::slot::Host;
use crate::tree::{NodeId, NodeTree};

/// Renames planned for a host, together with the report they produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub report: SlotReport,

    /// Node and its new name, in slot declaration order
    pub renames: Vec<(NodeId, String)>,
}

/// Renames the nodes behind bound slots so they carry the slot's name.
///
/// Sibling collisions are not checked: two slots pointing at siblings may
/// leave them with names that later resolve ambiguously.
pub struct NodeRenamer {
    config: BindConfig,
}

impl NodeRenamer {
    pub fn new(config: BindConfig) -> Self {
        Self { config }
    }

    /// Compute renames without touching the tree
    pub fn plan(&self, tree: &NodeTree, host: &Host) -> RenamePlan {
        let sep = self.config.path_separator.as_str();
        let mut report = SlotReport::new(ReportKind::Rename, tree.path(host.node(), sep));
        let mut renames = Vec::new();

        for (idx, slot, _) in host.table().eligible() {
            let Some(value) = host.value_at(idx) else {
                report.push(ReportEntry::skipped(&slot.name, SkipReason::Unbound));
                continue;
            };

            let node = value.owner();
            if node == host.node() {
                log::debug!("Not renaming host node for slot `{}`", slot.name);
                report.push(ReportEntry::skipped(&slot.name, SkipReason::SelfReference));
                continue;
            }
            if !tree.contains(node) {
                log::warn!("Slot `{}` points at a node outside this tree", slot.name);
                report.push(ReportEntry::skipped(&slot.name, SkipReason::NotFound));
                continue;
            }

            let before = tree.path(node, sep);
            report.push(ReportEntry::bound(&slot.name, before));
            renames.push((node, slot.name.clone()));
        }

        RenamePlan { report, renames }
    }

    /// Apply a plan produced by [`NodeRenamer::plan`]
    pub fn apply(tree: &mut NodeTree, plan: &RenamePlan) -> Result<()> {
        for (node, name) in &plan.renames {
            tree.rename(*node, name.as_str())?;
        }
        Ok(())
    }

    /// Rename every node behind an eligible, bound, non-host slot
    pub fn rename_to_match_slots(&self, tree: &mut NodeTree, host: &Host) -> SlotReport {
        let plan = self.plan(tree, host);
        if let Err(err) = Self::apply(tree, &plan) {
            log::warn!("Rename pass on `{}` stopped early: {}", plan.report.host, err);
        }

        log::info!(
            "Rename `{}`: {} renamed, {} skipped",
            plan.report.host,
            plan.report.bound_count(),
            plan.report.skipped_count()
        );
        plan.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::BoundValue;
    use crate::slot::{SlotDecl, SlotTable, SlotType};

    #[test]
    fn test_plan_leaves_tree_untouched() {
        let mut tree = NodeTree::new("Player");
        let child = tree.add_child(tree.root(), "GameObject").unwrap();

        let table = SlotTable::new("PlayerView").with(SlotDecl::public("Muzzle", SlotType::Transform));
        let mut host = Host::new(tree.root(), table);
        host.set("Muzzle", Some(BoundValue::Transform(child))).unwrap();

        let renamer = NodeRenamer::new(BindConfig::default());
        let plan = renamer.plan(&tree, &host);

        assert_eq!(plan.renames, vec![(child, "Muzzle".to_string())]);
        assert_eq!(tree.name(child), "GameObject");

        NodeRenamer::apply(&mut tree, &plan).unwrap();
        assert_eq!(tree.name(child), "Muzzle");
    }
}
