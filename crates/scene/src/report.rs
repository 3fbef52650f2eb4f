use crate::matcher::MatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which pass produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Bind,
    Rename,
}

/// Why an attempted slot was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No matching named and typed descendant
    NotFound,

    /// More than one matching named and typed descendant
    Ambiguous { candidates: usize },

    /// Rename target is the host's own node
    SelfReference,

    /// Rename requested on a slot without a value
    Unbound,
}

impl SkipReason {
    /// Terse tag used in the text rendering
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Ambiguous { .. } => "ambiguous",
            Self::SelfReference => "self",
            Self::Unbound => "unbound",
        }
    }
}

impl From<MatchError> for SkipReason {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::NotFound => Self::NotFound,
            MatchError::Ambiguous { candidates } => Self::Ambiguous { candidates },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Slot bound (bind) or node renamed (rename); `source_path` is the
    /// matched node's path, or the path before renaming
    Bound { source_path: String },

    Skipped { reason: SkipReason },
}

/// One attempted slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub slot: String,

    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ReportEntry {
    pub fn bound(slot: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            outcome: Outcome::Bound {
                source_path: source_path.into(),
            },
        }
    }

    pub fn skipped(slot: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            slot: slot.into(),
            outcome: Outcome::Skipped { reason },
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.outcome, Outcome::Bound { .. })
    }

    /// `sourcePath -> slotName` or `slotName skipped (tag)`
    pub fn line(&self) -> String {
        match &self.outcome {
            Outcome::Bound { source_path } => format!("{} -> {}", source_path, self.slot),
            Outcome::Skipped { reason } => format!("{} skipped ({})", self.slot, reason.tag()),
        }
    }
}

/// Ordered result of a bind or rename pass, one entry per attempted slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotReport {
    pub kind: ReportKind,

    /// Host node path the pass ran on
    pub host: String,

    /// Entries in slot declaration order
    pub entries: Vec<ReportEntry>,
}

impl SlotReport {
    pub fn new(kind: ReportKind, host: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn bound_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_bound()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.bound_count()
    }

    pub fn entry(&self, slot: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.slot == slot)
    }

    /// Trailing summary line
    pub fn summary(&self) -> String {
        format!(
            "total: {} bound, {} skipped",
            self.bound_count(),
            self.skipped_count()
        )
    }

    /// One line per entry followed by the summary
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(ReportEntry::line)
            .chain(std::iter::once(self.summary()))
            .collect()
    }
}

impl fmt::Display for SlotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
