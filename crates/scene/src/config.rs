use serde::{Deserialize, Serialize};

/// Configuration for binding and renaming passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Consider inactive nodes (and everything below them) when matching
    pub include_inactive: bool,

    /// Separator used when rendering node paths
    pub path_separator: String,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            include_inactive: false,
            path_separator: "/".to_string(),
        }
    }
}

impl BindConfig {
    /// Config that also searches inactive subtrees
    pub fn including_inactive() -> Self {
        Self {
            include_inactive: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.path_separator.is_empty() {
            return Err("path_separator must not be empty".to_string());
        }
        if self.path_separator.chars().any(char::is_whitespace) {
            return Err(format!(
                "path_separator ({:?}) must not contain whitespace",
                self.path_separator
            ));
        }
        Ok(())
    }
}
