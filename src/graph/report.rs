use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::resolve::{EffectiveManifest, ResolverContext};
use super::{flatten, normalize_scopes, walk, ResolvedDependency, WalkOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyTreeFormat {
    #[default]
    Flat,
    Tree,
    Both,
}

impl DependencyTreeFormat {
    /// Lenient parse; anything unrecognised is `Flat`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "both" => Self::Both,
            _ => Self::Flat,
        }
    }

    fn wants_flat(self) -> bool {
        matches!(self, Self::Flat | Self::Both)
    }

    fn wants_tree(self) -> bool {
        matches!(self, Self::Tree | Self::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyTreeOptions {
    pub include: bool,
    /// -1 = unlimited, 0 = direct only
    pub depth: i32,
    pub scopes: Vec<String>,
    pub format: DependencyTreeFormat,
    pub exclude_transitive: bool,
    pub include_optional: bool,
}

impl Default for DependencyTreeOptions {
    fn default() -> Self {
        Self {
            include: false,
            depth: -1,
            scopes: vec!["compile".to_string(), "runtime".to_string()],
            format: DependencyTreeFormat::Flat,
            exclude_transitive: false,
            include_optional: false,
        }
    }
}

impl DependencyTreeOptions {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            allowed_scopes: normalize_scopes(&self.scopes),
            include_optional: self.include_optional,
            include_transitive: !self.exclude_transitive,
            max_depth: self.depth,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencySummary {
    pub total: usize,
    pub direct: usize,
    pub transitive: usize,
    pub scopes: BTreeMap<String, usize>,
    pub optional: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyFlatEntry {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub scope: String,
    #[serde(rename = "type")]
    pub dep_type: String,
    pub optional: bool,
    pub depth: usize,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub scope: String,
    #[serde(rename = "type")]
    pub dep_type: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<DependencyNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyTreeReport {
    pub summary: DependencySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat: Option<Vec<DependencyFlatEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<DependencyNode>>,
}

/// Dependency tree section of a module report; `None` when disabled or when
/// the module declares no dependencies
pub fn collect_dependency_tree(
    ctx: &mut ResolverContext<'_>,
    root: &EffectiveManifest,
    options: &DependencyTreeOptions,
) -> Option<DependencyTreeReport> {
    if !options.include || root.manifest.dependencies.is_empty() {
        return None;
    }

    let entries = walk(ctx, root, &options.walk_options());
    let all = flatten(&entries);

    let mut summary = DependencySummary {
        total: all.len(),
        direct: entries.len(),
        transitive: all.len() - entries.len(),
        ..Default::default()
    };
    for entry in &all {
        *summary.scopes.entry(entry.scope.clone()).or_insert(0) += 1;
        if entry.declaration.optional {
            summary.optional += 1;
        }
    }

    let flat = options
        .format
        .wants_flat()
        .then(|| all.iter().map(|entry| flat_entry(entry)).collect());
    let tree = options
        .format
        .wants_tree()
        .then(|| entries.iter().map(tree_node).collect());

    Some(DependencyTreeReport { summary, flat, tree })
}

fn flat_entry(entry: &ResolvedDependency) -> DependencyFlatEntry {
    DependencyFlatEntry {
        group_id: entry.coordinate.group_id.clone(),
        artifact_id: entry.coordinate.artifact_id.clone(),
        version: entry.resolved_version.clone(),
        scope: entry.scope.clone(),
        dep_type: entry.dep_type().to_string(),
        optional: entry.declaration.optional,
        depth: entry.depth,
        path: entry.path.clone(),
    }
}

fn tree_node(entry: &ResolvedDependency) -> DependencyNode {
    DependencyNode {
        group_id: entry.coordinate.group_id.clone(),
        artifact_id: entry.coordinate.artifact_id.clone(),
        version: entry.resolved_version.clone(),
        scope: entry.scope.clone(),
        dep_type: entry.dep_type().to_string(),
        optional: entry.declaration.optional,
        children: entry.children.iter().map(tree_node).collect(),
    }
}
