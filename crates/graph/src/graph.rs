use crate::types::{AssetKind, AssetRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Read access to asset dependencies, whatever backs them
pub trait DependencySource {
    /// Assets referenced by `paths`, excluding `paths` themselves.
    ///
    /// With `recursive` the whole closure is returned, otherwise only direct
    /// references. Unknown paths contribute nothing.
    fn dependencies_of(&self, paths: &BTreeSet<String>, recursive: bool) -> BTreeSet<String>;

    /// Every asset of one of `kinds` whose path lies under folder `scope`
    fn all_assets_of_kind(&self, kinds: &[AssetKind], scope: &str) -> BTreeSet<String>;

    /// True when `path` is a known asset
    fn contains(&self, path: &str) -> bool;
}

/// Directed asset graph: an edge A -> B means "A references B"
#[derive(Debug, Clone, Default)]
pub struct AssetGraph {
    /// Directed graph (asset -> referenced asset)
    pub graph: DiGraph<AssetRecord, ()>,

    /// Asset path -> NodeIndex mapping for fast lookup
    pub path_index: HashMap<String, NodeIndex>,
}

impl AssetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, returning the existing node when the path is known
    pub fn add_asset(&mut self, path: impl Into<String>) -> NodeIndex {
        let path = path.into();
        if let Some(&idx) = self.path_index.get(&path) {
            return idx;
        }

        let idx = self.graph.add_node(AssetRecord::new(path.clone()));
        self.path_index.insert(path, idx);
        idx
    }

    /// Record that `from` references `to`; registers both and ignores
    /// self references and duplicate edges
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let from = self.add_asset(from);
        let to = self.add_asset(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn find_asset(&self, path: &str) -> Option<NodeIndex> {
        self.path_index.get(path).copied()
    }

    pub fn get_asset(&self, idx: NodeIndex) -> Option<&AssetRecord> {
        self.graph.node_weight(idx)
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetRecord> {
        self.graph.node_weights()
    }

    /// Direct references of one asset
    pub fn direct_dependencies(&self, path: &str) -> Vec<&AssetRecord> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Assets that directly reference `path`
    pub fn direct_referrers(&self, path: &str) -> Vec<&AssetRecord> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&AssetRecord> {
        let Some(idx) = self.find_asset(path) else {
            return Vec::new();
        };
        let mut result: Vec<&AssetRecord> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.get_asset(n))
            .collect();
        result.sort_by(|a, b| a.path.cmp(&b.path));
        result
    }

    /// Every asset of `kind` under `folder`, sorted
    pub fn list_assets(&self, kind: AssetKind, folder: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .assets()
            .filter(|asset| asset.kind == kind && in_scope(&asset.path, folder))
            .map(|asset| asset.path.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn asset_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// True when `path` lies inside folder `scope` (or equals it)
fn in_scope(path: &str, scope: &str) -> bool {
    let scope = scope.trim_end_matches('/');
    if scope.is_empty() {
        return false;
    }
    path == scope
        || path
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl DependencySource for AssetGraph {
    fn dependencies_of(&self, paths: &BTreeSet<String>, recursive: bool) -> BTreeSet<String> {
        let starts: Vec<NodeIndex> = paths.iter().filter_map(|p| self.find_asset(p)).collect();
        let start_set: HashSet<NodeIndex> = starts.iter().copied().collect();

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = starts;
        let mut result = BTreeSet::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let is_start = start_set.contains(&current);
            if !is_start {
                if let Some(asset) = self.get_asset(current) {
                    result.insert(asset.path.clone());
                }
            }
            if is_start || recursive {
                stack.extend(
                    self.graph
                        .neighbors_directed(current, Direction::Outgoing)
                        .filter(|n| !visited.contains(n)),
                );
            }
        }

        result
    }

    fn all_assets_of_kind(&self, kinds: &[AssetKind], scope: &str) -> BTreeSet<String> {
        self.assets()
            .filter(|asset| kinds.contains(&asset.kind) && in_scope(&asset.path, scope))
            .map(|asset| asset.path.clone())
            .collect()
    }

    fn contains(&self, path: &str) -> bool {
        self.path_index.contains_key(path)
    }
}
