//! Depth-first walk over direct and transitive dependencies.

use std::collections::{BTreeSet, HashSet};
use tracing::debug;
use crate::pom::{Coordinate, DependencyDeclaration};
use crate::resolve::{EffectiveManifest, ResolverContext};

pub mod report;

pub use report::{
    collect_dependency_tree, DependencyFlatEntry, DependencyNode, DependencySummary,
    DependencyTreeFormat, DependencyTreeOptions, DependencyTreeReport,
};

/// Separator between nodes of a materialized path
pub const PATH_SEPARATOR: &str = " -> ";

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Normalized (trimmed, lower-case) scopes to keep
    pub allowed_scopes: BTreeSet<String>,
    pub include_optional: bool,
    pub include_transitive: bool,
    /// -1 for unlimited; 0 and 1 both mean direct dependencies only
    pub max_depth: i32,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            allowed_scopes: default_scopes(),
            include_optional: false,
            include_transitive: true,
            max_depth: -1,
        }
    }
}

impl WalkOptions {
    fn descends_below(&self, depth: usize) -> bool {
        self.include_transitive && (self.max_depth < 0 || (depth as i64) < i64::from(self.max_depth))
    }
}

pub fn default_scopes() -> BTreeSet<String> {
    ["compile", "runtime"].into_iter().map(String::from).collect()
}

/// Trim, lower-case and drop blanks; an empty result falls back to compile + runtime
pub fn normalize_scopes<I, S>(scopes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized: BTreeSet<String> = scopes
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if normalized.is_empty() {
        default_scopes()
    } else {
        normalized
    }
}

/// One visited dependency
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub declaration: DependencyDeclaration,
    /// Placeholder-resolved group, artifact and version (empty version when unresolved)
    pub coordinate: Coordinate,
    pub resolved_version: Option<String>,
    pub scope: String,
    /// 1 for direct dependencies
    pub depth: usize,
    /// Root module first, this entry last
    pub path: String,
    pub children: Vec<ResolvedDependency>,
}

impl ResolvedDependency {
    pub fn dep_type(&self) -> &str {
        self.declaration.type_or_default()
    }
}

/// Walk `root`'s dependencies depth-first. Each coordinate is emitted at most
/// once, at the depth where it is first reached.
pub fn walk(ctx: &mut ResolverContext<'_>, root: &EffectiveManifest, options: &WalkOptions) -> Vec<ResolvedDependency> {
    let root_coordinate = root.manifest.coordinate();
    let mut visited = HashSet::new();
    visited.insert(root_coordinate.key());
    let root_label = node_label(&root_coordinate, root.manifest.packaging_or_default());
    walk_level(ctx, root, 1, &root_label, options, &mut visited)
}

fn walk_level(
    ctx: &mut ResolverContext<'_>,
    owner: &EffectiveManifest,
    depth: usize,
    parent_path: &str,
    options: &WalkOptions,
    visited: &mut HashSet<String>,
) -> Vec<ResolvedDependency> {
    let mut entries = Vec::new();

    for declaration in &owner.manifest.dependencies {
        let scope = declaration.normalized_scope();
        if !options.allowed_scopes.contains(&scope) {
            continue;
        }
        if declaration.optional && !options.include_optional {
            continue;
        }

        let resolved_version = owner.resolve_version(declaration);
        let coordinate = owner.coordinate_of(declaration);
        if !visited.insert(coordinate.key()) {
            debug!(coordinate = %coordinate, depth, "already visited, skipping");
            continue;
        }

        let path = format!(
            "{parent_path}{PATH_SEPARATOR}{}",
            node_label(&coordinate, declaration.type_or_default())
        );

        let mut children = Vec::new();
        if options.descends_below(depth) {
            match ctx.load(&coordinate) {
                Some(manifest) => {
                    let effective = ctx.effective(&manifest, None);
                    children = walk_level(ctx, &effective, depth + 1, &path, options, visited);
                }
                None => debug!(coordinate = %coordinate, "no manifest for transitive resolution"),
            }
        }

        entries.push(ResolvedDependency {
            declaration: declaration.clone(),
            coordinate,
            resolved_version,
            scope,
            depth,
            path,
            children,
        });
    }

    entries
}

/// Pre-order view of a walked forest
pub fn flatten(entries: &[ResolvedDependency]) -> Vec<&ResolvedDependency> {
    let mut out = Vec::new();
    for entry in entries {
        out.push(entry);
        out.extend(flatten(&entry.children));
    }
    out
}

fn node_label(coordinate: &Coordinate, dep_type: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        coordinate.group_id, coordinate.artifact_id, dep_type, coordinate.version
    )
}
