use crate::graph::DependencySource;
use crate::progress::ProgressSink;
use crate::types::AssetKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Direction of a dependency query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Downstream: what `asset` pulls in
    DependenciesOf { asset: String },

    /// Upstream: prefabs and scenes under `scope` that pull in `asset`
    ReferencesTo { asset: String, scope: String },
}

impl Query {
    pub fn dependencies_of(asset: impl Into<String>) -> Self {
        Self::DependenciesOf {
            asset: asset.into(),
        }
    }

    pub fn references_to(asset: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::ReferencesTo {
            asset: asset.into(),
            scope: scope.into(),
        }
    }

    pub fn asset(&self) -> &str {
        match self {
            Self::DependenciesOf { asset } | Self::ReferencesTo { asset, .. } => asset,
        }
    }
}

/// Query result: disjoint buckets keyed by kind, in precedence order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorization {
    #[serde(flatten)]
    pub query: Query,

    pub buckets: BTreeMap<AssetKind, BTreeSet<String>>,
}

impl Categorization {
    fn empty(query: Query) -> Self {
        Self {
            query,
            buckets: BTreeMap::new(),
        }
    }

    fn insert(&mut self, kind: AssetKind, path: String) {
        self.buckets.entry(kind).or_default().insert(path);
    }

    pub fn bucket(&self, kind: AssetKind) -> Option<&BTreeSet<String>> {
        self.buckets.get(&kind)
    }

    /// Number of assets across all buckets
    pub fn total(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `[bucket]` headers with indented paths, then a total line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (kind, paths) in &self.buckets {
            if paths.is_empty() {
                continue;
            }
            lines.push(format!("[{}]", kind.bucket()));
            lines.extend(paths.iter().map(|path| format!("  {path}")));
        }
        lines.push(format!("total: {} assets", self.total()));
        lines
    }
}

impl fmt::Display for Categorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Walks a [`DependencySource`] and buckets results by asset kind
pub struct DependencyCategorizer<'a, S: DependencySource + ?Sized> {
    source: &'a S,
    recursive: bool,
    progress: &'a dyn ProgressSink,
}

impl<'a, S: DependencySource + ?Sized> DependencyCategorizer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            recursive: true,
            progress: &(),
        }
    }

    /// Builder: follow only direct references
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Builder: report walk progress
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Run a query to completion.
    ///
    /// A missing asset or an empty scope yields an empty result.
    pub fn categorize(&self, query: &Query) -> Categorization {
        let result = match query {
            Query::DependenciesOf { asset } => self.dependencies_of(query, asset),
            Query::ReferencesTo { asset, scope } => self.references_to(query, asset, scope),
        };

        log::info!(
            "Categorized {} assets for `{}` into {} buckets",
            result.total(),
            query.asset(),
            result.buckets.len()
        );
        result
    }

    fn dependencies_of(&self, query: &Query, asset: &str) -> Categorization {
        let mut result = Categorization::empty(query.clone());
        if !self.source.contains(asset) {
            log::debug!("Asset not in graph: {}", asset);
            return result;
        }

        let start = BTreeSet::from([asset.to_string()]);
        let closure = self.source.dependencies_of(&start, self.recursive);
        let total = closure.len();

        for (i, path) in closure.into_iter().enumerate() {
            match AssetKind::from_path(&path) {
                AssetKind::Unclassified => log::debug!("Dropping unrecognized asset: {}", path),
                kind => result.insert(kind, path),
            }
            self.progress.progress(i + 1, total);
        }
        self.progress.finish();

        result
    }

    fn references_to(&self, query: &Query, asset: &str, scope: &str) -> Categorization {
        let mut result = Categorization::empty(query.clone());
        if scope.trim_matches('/').is_empty() || !self.source.contains(asset) {
            log::debug!("Nothing to search for `{}` in scope `{}`", asset, scope);
            return result;
        }

        let candidates = self.source.all_assets_of_kind(&AssetKind::REFERRERS, scope);
        let total = candidates.len();

        for (i, candidate) in candidates.into_iter().enumerate() {
            let start = BTreeSet::from([candidate.clone()]);
            if self
                .source
                .dependencies_of(&start, self.recursive)
                .contains(asset)
            {
                // The candidate lands in exactly one bucket, however many
                // paths lead from it to the asset.
                match AssetKind::from_path(&candidate) {
                    AssetKind::Unclassified => {
                        log::debug!("Dropping unrecognized referrer: {}", candidate)
                    }
                    kind => result.insert(kind, candidate),
                }
            }
            self.progress.progress(i + 1, total);
        }
        self.progress.finish();

        result
    }
}
