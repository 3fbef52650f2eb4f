use anyhow::{anyhow, Context, Result};
use autobind_graph::ScanConfig;
use autobind_scene::BindConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable overriding the folder searched for referrers
pub const SCOPE_ENV: &str = "AUTOBIND_SCOPE";

/// Tool configuration, read from an optional TOML file.
///
/// ```toml
/// [bind]
/// include_inactive = true
///
/// [scan]
/// scope = "Assets/Game"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub bind: BindConfig,
    pub scan: ScanConfig,
}

impl ToolConfig {
    /// Load from `path` (defaults when absent), then apply environment
    /// overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(scope) = env::var(SCOPE_ENV) {
            if !scope.trim().is_empty() {
                log::debug!("{} overrides scope: {}", SCOPE_ENV, scope);
                config.scan.scope = scope;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.bind
            .validate()
            .map_err(|e| anyhow!("[bind] {e}"))?;
        self.scan
            .validate()
            .map_err(|e| anyhow!("[scan] {e}"))?;
        Ok(())
    }
}
