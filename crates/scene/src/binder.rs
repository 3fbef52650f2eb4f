use crate::config::BindConfig;
use crate::matcher::{BoundValue, CapabilityMatcher};
use crate::registry::TypeRegistry;
use crate::report::{ReportEntry, ReportKind, SkipReason, SlotReport};
use crate::slot::Host;
use crate::tree::{CapabilityRef, NodeTree};

/// Resolves a host's eligible slots by name against the nodes below it
pub struct AutoBinder {
    types: TypeRegistry,
    config: BindConfig,
}

impl AutoBinder {
    pub fn new(types: TypeRegistry, config: BindConfig) -> Self {
        Self { types, config }
    }

    /// Bind every eligible slot that has exactly one match.
    ///
    /// Failed slots keep their previous value. Running twice on an unchanged
    /// tree yields the same report and the same assignments.
    pub fn resolve(&self, tree: &NodeTree, host: &mut Host) -> SlotReport {
        let (report, assignments) = self.evaluate(tree, host);
        for (idx, value) in assignments {
            host.assign_at(idx, value);
        }

        log::info!(
            "Auto-bind `{}`: {} bound, {} skipped",
            report.host,
            report.bound_count(),
            report.skipped_count()
        );
        report
    }

    /// Report what [`AutoBinder::resolve`] would do without assigning anything
    pub fn plan(&self, tree: &NodeTree, host: &Host) -> SlotReport {
        self.evaluate(tree, host).0
    }

    /// Every capability of `type_name` below the host, for collection slots
    /// that are bound explicitly rather than by name
    pub fn bind_collection(&self, tree: &NodeTree, host: &Host, type_name: &str) -> Vec<CapabilityRef> {
        CapabilityMatcher::new(tree, &self.types).find_all(
            host.node(),
            type_name,
            self.config.include_inactive,
        )
    }

    fn evaluate(&self, tree: &NodeTree, host: &Host) -> (SlotReport, Vec<(usize, BoundValue)>) {
        let sep = self.config.path_separator.as_str();
        let matcher = CapabilityMatcher::new(tree, &self.types);
        let mut report = SlotReport::new(ReportKind::Bind, tree.path(host.node(), sep));
        let mut assignments = Vec::new();

        for (idx, slot, target) in host.table().eligible() {
            match matcher.find_unique(host.node(), &slot.name, &target, self.config.include_inactive) {
                Ok(value) => {
                    let path = tree.path(value.owner(), sep);
                    log::debug!("Bound `{}` to {}", slot.name, path);
                    report.push(ReportEntry::bound(&slot.name, path));
                    assignments.push((idx, value));
                }
                Err(err) => {
                    log::debug!("Skipped `{}`: {}", slot.name, err);
                    report.push(ReportEntry::skipped(&slot.name, SkipReason::from(err)));
                }
            }
        }

        (report, assignments)
    }
}
