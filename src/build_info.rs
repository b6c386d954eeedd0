use std::collections::{BTreeMap, HashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::pom::Manifest;
use crate::resolve::PropertyTable;

pub const MASKED_VALUE: &str = "***MASKED***";

/// Key fragments treated as sensitive unless configured otherwise
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    "password",
    "secret",
    "token",
    "apikey",
    "api-key",
    "api_key",
    "credentials",
    "auth",
    "key",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyOptions {
    pub include: bool,
    pub include_environment: bool,
    pub filter_sensitive: bool,
    /// Mask sensitive values instead of dropping them
    pub mask_sensitive: bool,
    /// Extra key fragments added to the sensitive set
    pub exclusions: Vec<String>,
}

impl Default for PropertyOptions {
    fn default() -> Self {
        Self {
            include: false,
            include_environment: false,
            filter_sensitive: true,
            mask_sensitive: true,
            exclusions: Vec::new(),
        }
    }
}

impl PropertyOptions {
    fn sensitive_set(&self) -> HashSet<String> {
        DEFAULT_SENSITIVE_KEYS
            .iter()
            .map(|k| k.to_string())
            .chain(
                self.exclusions
                    .iter()
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty()),
            )
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProperties {
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub project: IndexMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub maven: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub custom: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    pub masked_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesInfo {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub available: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
}

/// Grouped snapshot of the module's declared properties; `None` when disabled
pub fn collect_build_properties(
    manifest: &Manifest,
    table: &PropertyTable,
    options: &PropertyOptions,
) -> Option<BuildProperties> {
    if !options.include {
        return None;
    }
    let mut snapshot = Snapshot {
        sensitive: options.sensitive_set(),
        options,
        masked: 0,
    };

    let mut project = IndexMap::new();
    if let Some(group) = manifest.effective_group_id() {
        project.insert("project.groupId".to_string(), group.to_string());
    }
    if let Some(artifact) = &manifest.artifact_id {
        project.insert("project.artifactId".to_string(), artifact.clone());
    }
    if let Some(version) = manifest.effective_version() {
        project.insert("project.version".to_string(), version.to_string());
    }
    project.insert("project.packaging".to_string(), manifest.packaging_or_default().to_string());
    if let Some(name) = &manifest.name {
        project.insert("project.name".to_string(), table.substitute(name));
    }

    let mut maven = BTreeMap::new();
    let mut custom = BTreeMap::new();
    for (key, value) in &manifest.properties {
        if key.starts_with("project.") {
            continue;
        }
        let value = table.substitute(value);
        if key.starts_with("maven.") || is_known_build_flag(key) {
            snapshot.put(&mut maven, key, value);
        } else {
            snapshot.put(&mut custom, key, value);
        }
    }

    let environment = options.include_environment.then(|| {
        let mut env = BTreeMap::new();
        for (key, value) in std::env::vars() {
            snapshot.put(&mut env, &key, value);
        }
        env
    });

    Some(BuildProperties {
        project,
        maven,
        custom,
        environment,
        masked_count: snapshot.masked,
    })
}

/// Declared profiles and the first one active by default
pub fn collect_profiles(manifest: &Manifest) -> Option<ProfilesInfo> {
    if manifest.profiles.is_empty() {
        return None;
    }
    Some(ProfilesInfo {
        available: manifest.profiles.iter().map(|p| p.id.clone()).collect(),
        default_profile: manifest
            .profiles
            .iter()
            .find(|p| p.active_by_default)
            .map(|p| p.id.clone()),
    })
}

struct Snapshot<'o> {
    sensitive: HashSet<String>,
    options: &'o PropertyOptions,
    masked: usize,
}

impl Snapshot<'_> {
    fn put(&mut self, target: &mut BTreeMap<String, String>, key: &str, value: String) {
        let key = key.trim();
        if self.options.filter_sensitive && is_sensitive_key(key, &self.sensitive) {
            if self.options.mask_sensitive {
                self.masked += 1;
                target.insert(key.to_string(), MASKED_VALUE.to_string());
            }
            return;
        }
        target.insert(key.to_string(), value);
    }
}

fn is_sensitive_key(key: &str, sensitive: &HashSet<String>) -> bool {
    let lower = key.to_lowercase();
    sensitive.iter().any(|fragment| lower.contains(fragment.as_str()))
}

fn is_known_build_flag(key: &str) -> bool {
    let k = key.to_lowercase();
    matches!(
        k.as_str(),
        "skiptests" | "maven.test.skip" | "maven.javadoc.skip" | "maven.deploy.skip" | "enforcer.skip"
    ) || k.starts_with("maven.compiler.")
}
