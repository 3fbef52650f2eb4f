use crate::config::ScanConfig;
use crate::error::{GraphError, Result};
use crate::graph::AssetGraph;
use crate::progress::ProgressSink;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Explicit dependency listing, used when no project folder is available
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,

    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Builds an [`AssetGraph`] from a project folder or a manifest
pub struct GraphBuilder {
    config: ScanConfig,
    guid_pattern: Regex,
}

impl GraphBuilder {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        let guid_pattern = Regex::new(r"guid:\s*([0-9a-fA-F]{32})")
            .map_err(|e| GraphError::BuildError(format!("Failed to compile GUID pattern: {e}")))?;
        Ok(Self {
            config,
            guid_pattern,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Build graph from a manifest document
    pub fn from_manifest(manifest: &AssetManifest) -> AssetGraph {
        let mut graph = AssetGraph::new();
        for entry in &manifest.assets {
            graph.add_asset(entry.path.as_str());
            for dep in &entry.dependencies {
                graph.add_dependency(&entry.path, dep);
            }
        }

        log::info!(
            "Built asset graph from manifest: {} assets, {} references",
            graph.asset_count(),
            graph.dependency_count()
        );
        graph
    }

    /// Parse a manifest from JSON text
    pub fn parse_manifest(text: &str) -> Result<AssetManifest> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build graph from a project folder.
    ///
    /// Every non-`.meta` file becomes an asset addressed by its path relative
    /// to `root`. GUIDs come from `.meta` files; text assets are scanned for
    /// `guid:` references.
    pub fn scan(&self, root: &Path, progress: &dyn ProgressSink) -> Result<AssetGraph> {
        let files = self.collect_files(root)?;
        let mut graph = AssetGraph::new();

        // Phase 1: register assets and their GUIDs
        let mut guid_to_path: HashMap<String, String> = HashMap::new();
        for (abs, rel) in &files {
            graph.add_asset(rel.as_str());
            if !self.config.follow_meta {
                continue;
            }
            let meta = meta_path(abs);
            if !meta.is_file() {
                continue;
            }
            let bytes = fs::read(&meta)?;
            if let Some(guid) = self.first_guid(&String::from_utf8_lossy(&bytes)) {
                guid_to_path.insert(guid, rel.clone());
            }
        }

        // Phase 2: resolve references inside text assets
        let total = files.len();
        for (i, (abs, rel)) in files.iter().enumerate() {
            if self.config.is_text_asset(rel) {
                let bytes = fs::read(abs)?;
                let text = String::from_utf8_lossy(&bytes);
                for guid in self.guids(&text) {
                    match guid_to_path.get(&guid) {
                        Some(target) => graph.add_dependency(rel, target),
                        None => log::trace!("{}: unknown guid {}", rel, guid),
                    }
                }
            }
            progress.progress(i + 1, total);
        }
        progress.finish();

        log::info!(
            "Scanned {}: {} assets, {} references",
            root.display(),
            graph.asset_count(),
            graph.dependency_count()
        );
        Ok(graph)
    }

    /// Files under `root` (minus `.meta` and ignored folders), sorted by
    /// relative path
    fn collect_files(&self, root: &Path) -> Result<Vec<(PathBuf, String)>> {
        if !root.is_dir() {
            return Err(GraphError::AssetNotFound(root.display().to_string()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| e.depth() != 1 || !self.is_ignored(e.file_name())) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = relative_asset_path(root, entry.path()) else {
                continue;
            };
            if rel.to_ascii_lowercase().ends_with(".meta") {
                continue;
            }
            files.push((entry.path().to_path_buf(), rel));
        }

        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }

    fn is_ignored(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy();
        self.config.ignore_dirs.iter().any(|dir| dir.as_str() == name)
    }

    fn first_guid(&self, text: &str) -> Option<String> {
        self.guid_pattern
            .captures(text)
            .map(|caps| caps[1].to_ascii_lowercase())
    }

    fn guids(&self, text: &str) -> Vec<String> {
        let mut guids: Vec<String> = self
            .guid_pattern
            .captures_iter(text)
            .map(|caps| caps[1].to_ascii_lowercase())
            .collect();
        guids.sort();
        guids.dedup();
        guids
    }
}

fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".meta");
    PathBuf::from(name)
}

/// Project-relative path with forward slashes
fn relative_asset_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencySource;
    use crate::types::AssetKind;
    use std::collections::BTreeSet;

    #[test]
    fn test_build_from_manifest() {
        let manifest = GraphBuilder::parse_manifest(
            r#"{"assets": [
                {"path": "Assets/Hero.prefab", "dependencies": ["Assets/Hero.mat"]},
                {"path": "Assets/Hero.mat", "dependencies": ["Assets/skin.png"]},
                {"path": "Assets/Lonely.prefab"}
            ]}"#,
        )
        .unwrap();
        let graph = GraphBuilder::from_manifest(&manifest);

        assert_eq!(graph.asset_count(), 4);
        assert_eq!(graph.dependency_count(), 2);
        let start: BTreeSet<String> = ["Assets/Hero.prefab".to_string()].into_iter().collect();
        assert_eq!(graph.dependencies_of(&start, true).len(), 2);
    }

    #[test]
    fn test_list_assets_by_folder() {
        let mut graph = AssetGraph::new();
        graph.add_asset("Assets/Prefabs/B.prefab");
        graph.add_asset("Assets/Prefabs/Sub/A.prefab");
        graph.add_asset("Assets/Other/C.prefab");
        graph.add_asset("Assets/Prefabs/tex.png");

        assert_eq!(
            graph.list_assets(AssetKind::Prefab, "Assets/Prefabs"),
            vec!["Assets/Prefabs/B.prefab", "Assets/Prefabs/Sub/A.prefab"]
        );
    }

    #[test]
    fn test_guid_extraction() {
        let builder = GraphBuilder::new(ScanConfig::default()).unwrap();
        let text = "m_Script: {fileID: 11500000, guid: 0123456789ABCDEF0123456789abcdef, type: 3}\n\
                    m_Material: {fileID: 2100000, guid: 0123456789abcdef0123456789abcdef, type: 2}\n\
                    m_Other: {fileID: 0}";
        assert_eq!(
            builder.guids(text),
            vec!["0123456789abcdef0123456789abcdef".to_string()]
        );
        assert_eq!(builder.first_guid("fileFormatVersion: 2\n"), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScanConfig {
            scope: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            GraphBuilder::new(config),
            Err(GraphError::InvalidConfig(_))
        ));
    }
}
