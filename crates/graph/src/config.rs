use serde::{Deserialize, Serialize};

/// Configuration for project scanning and dependency walks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Folder searched for referrers (prefabs and scenes)
    pub scope: String,

    /// Follow references transitively
    pub recursive: bool,

    /// Read `<asset>.meta` files to map GUIDs to asset paths
    pub follow_meta: bool,

    /// Suffixes of text-serialised assets scanned for GUID references
    pub text_extensions: Vec<String>,

    /// Top-level directories never scanned
    pub ignore_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scope: "Assets".to_string(),
            recursive: true,
            follow_meta: true,
            text_extensions: [
                "prefab",
                "unity",
                "mat",
                "controller",
                "overrideController",
                "anim",
                "asset",
                "playable",
                "mask",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
            ignore_dirs: ["Library", "Temp", "Logs", "obj", "Build", ".git"]
                .iter()
                .map(|dir| dir.to_string())
                .collect(),
        }
    }
}

impl ScanConfig {
    /// Config that only reports direct references
    pub fn direct_only() -> Self {
        Self {
            recursive: false,
            ..Default::default()
        }
    }

    /// True when `path` has one of the configured text suffixes
    pub fn is_text_asset(&self, path: &str) -> bool {
        path.rsplit_once('.').is_some_and(|(_, ext)| {
            self.text_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.scope.trim_matches('/').is_empty() {
            return Err("scope must name a folder".to_string());
        }
        if self.scope.contains('\\') {
            return Err(format!(
                "scope ({}) must use forward slashes",
                self.scope
            ));
        }
        if let Some(bad) = self.text_extensions.iter().find(|ext| ext.starts_with('.')) {
            return Err(format!(
                "text_extensions entries are given without a dot (got {bad})"
            ));
        }
        Ok(())
    }
}
