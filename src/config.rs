use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use crate::analyzer::AnalysisOptions;
use crate::build_info::PropertyOptions;
use crate::graph::DependencyTreeOptions;
use crate::license::LicenseOptions;

pub const CONFIG_FILE: &str = "deploy-manifest.toml";

const OUTPUT_FORMATS: &[&str] = &["table", "json"];
const KNOWN_SCOPES: &[&str] = &["compile", "runtime", "provided", "test", "system", "import"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format (table, json)
    pub format: Option<String>,

    /// Local repository root; `~/.m2/repository` when unset
    pub local_repository: Option<PathBuf>,

    /// Exit non-zero when an incompatible license is found
    pub fail_on_incompatible: bool,

    pub licenses: LicenseOptions,
    pub dependency_tree: DependencyTreeOptions,
    pub properties: PropertyOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some("table".to_string()),
            local_repository: None,
            fail_on_incompatible: false,
            licenses: LicenseOptions::default(),
            dependency_tree: DependencyTreeOptions::default(),
            properties: PropertyOptions::default(),
        }
    }
}

impl Config {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            licenses: self.licenses.clone(),
            dependency_tree: self.dependency_tree.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Reject values that parse but cannot be acted on
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.format {
            if !OUTPUT_FORMATS.contains(&format.as_str()) {
                bail!("Unknown output format '{}' (expected one of: {})", format, OUTPUT_FORMATS.join(", "));
            }
        }
        for scope in self.licenses.scopes.iter().chain(&self.dependency_tree.scopes) {
            if !KNOWN_SCOPES.contains(&scope.trim().to_lowercase().as_str()) {
                bail!("Unknown dependency scope '{}'", scope);
            }
        }
        if self.dependency_tree.depth < -1 {
            bail!("dependency_tree.depth must be -1 (unlimited) or a non-negative number");
        }
        if let Some(repo) = &self.local_repository {
            if !repo.is_dir() {
                bail!("local_repository does not exist: {}", repo.display());
            }
        }
        Ok(())
    }
}

/// Load configuration from `path`, or from `deploy-manifest.toml` in the
/// working directory. An explicit path must exist; an implicit one may not.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let implicit = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(CONFIG_FILE);
            if !implicit.exists() {
                return Ok(Config::default());
            }
            implicit
        }
    };

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}
