use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use indexmap::IndexMap;
use tracing::debug;
use crate::graph::{flatten, normalize_scopes, walk, ResolvedDependency, WalkOptions};
use crate::pom::{LicenseDeclaration, Manifest};
use crate::resolve::{EffectiveManifest, ResolverContext};

pub mod compliance;
pub mod tokens;

pub use tokens::{first_incompatible, license_tokens, normalize_license_set};

/// Label and histogram bucket for dependencies without license metadata
pub const UNKNOWN_LICENSE: &str = "unknown";

/// Separator used when a manifest declares several licenses
pub const LICENSE_SEPARATOR: &str = " OR ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseOptions {
    pub include: bool,
    /// Emit MEDIUM warnings for unknown and HIGH warnings for incompatible licenses
    pub warnings: bool,
    pub include_transitive: bool,
    pub include_optional: bool,
    pub scopes: Vec<String>,
    pub incompatible: Vec<String>,
}

impl Default for LicenseOptions {
    fn default() -> Self {
        Self {
            include: true,
            warnings: true,
            include_transitive: false,
            include_optional: false,
            scopes: vec!["compile".to_string(), "runtime".to_string()],
            incompatible: vec![
                "GPL-2.0".to_string(),
                "GPL-3.0".to_string(),
                "AGPL-3.0".to_string(),
                "SSPL-1.0".to_string(),
            ],
        }
    }
}

impl LicenseOptions {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            allowed_scopes: normalize_scopes(&self.scopes),
            include_optional: self.include_optional,
            include_transitive: self.include_transitive,
            max_depth: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDetail {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub scope: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    pub multi_license: bool,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WarningSeverity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseWarning {
    pub severity: WarningSeverity,
    pub artifact: String,
    pub license: String,
    pub reason: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub total: usize,
    pub identified: usize,
    pub unknown: usize,
    /// License name → number of dependencies, most frequent first
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub by_type: IndexMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseCompliance {
    pub has_incompatible_licenses: bool,
    pub incompatible_count: usize,
    pub unknown_count: usize,
    pub commercially_viable: bool,
    pub requires_attribution: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseReport {
    pub summary: LicenseSummary,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<LicenseDetail>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<LicenseWarning>,
    pub compliance: LicenseCompliance,
}

/// License section of a module report; `None` when disabled
pub fn collect_licenses(
    ctx: &mut ResolverContext<'_>,
    root: &EffectiveManifest,
    options: &LicenseOptions,
) -> Option<LicenseReport> {
    if !options.include {
        return None;
    }

    let entries = walk(ctx, root, &options.walk_options());
    let mut aggregation = LicenseAggregation::new(normalize_license_set(&options.incompatible), options.warnings);
    for entry in flatten(&entries) {
        aggregation.record(ctx, entry);
    }
    Some(aggregation.finish())
}

/// Licenses declared by `manifest`, or by its nearest ancestor that declares any
pub fn resolve_licenses(ctx: &mut ResolverContext<'_>, manifest: &Manifest) -> Vec<LicenseDeclaration> {
    if !manifest.licenses.is_empty() {
        return manifest.licenses.clone();
    }
    ctx.ancestors(manifest, None)
        .into_iter()
        .map(|ancestor| ancestor.manifest.licenses)
        .find(|licenses| !licenses.is_empty())
        .unwrap_or_default()
}

/// Accumulator threaded through one aggregation run
pub struct LicenseAggregation {
    incompatible: HashSet<String>,
    emit_warnings: bool,
    details: Vec<LicenseDetail>,
    warnings: Vec<LicenseWarning>,
    by_type: HashMap<String, usize>,
    incompatible_count: usize,
}

impl LicenseAggregation {
    pub fn new(incompatible: HashSet<String>, emit_warnings: bool) -> Self {
        Self {
            incompatible,
            emit_warnings,
            details: Vec::new(),
            warnings: Vec::new(),
            by_type: HashMap::new(),
            incompatible_count: 0,
        }
    }

    pub fn record(&mut self, ctx: &mut ResolverContext<'_>, entry: &ResolvedDependency) {
        let licenses = match ctx.load(&entry.coordinate) {
            Some(manifest) => resolve_licenses(ctx, &manifest),
            None => {
                debug!(coordinate = %entry.coordinate, "no manifest, license unknown");
                Vec::new()
            }
        };
        self.record_licenses(entry, &licenses);
    }

    /// Fold one dependency's declared licenses into the aggregation
    pub fn record_licenses(&mut self, entry: &ResolvedDependency, licenses: &[LicenseDeclaration]) {
        let names: Vec<String> = licenses
            .iter()
            .filter_map(|l| l.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        let artifact = entry.coordinate.key();

        let license = if names.is_empty() {
            *self.by_type.entry(UNKNOWN_LICENSE.to_string()).or_insert(0) += 1;
            if self.emit_warnings {
                self.warnings.push(LicenseWarning {
                    severity: WarningSeverity::Medium,
                    artifact: artifact.clone(),
                    license: UNKNOWN_LICENSE.to_string(),
                    reason: "License information not found in POM".to_string(),
                    recommendation: "Add <licenses> to dependency POM or replace with clearly licensed alternative"
                        .to_string(),
                });
            }
            UNKNOWN_LICENSE.to_string()
        } else {
            for name in &names {
                *self.by_type.entry(name.clone()).or_insert(0) += 1;
            }
            names.join(LICENSE_SEPARATOR)
        };

        if let Some(token) = first_incompatible(&license, &self.incompatible) {
            self.incompatible_count += 1;
            if self.emit_warnings {
                self.warnings.push(LicenseWarning {
                    severity: WarningSeverity::High,
                    artifact,
                    license: license.clone(),
                    reason: format!("Incompatible license detected: {token}"),
                    recommendation: "Replace with Apache-2.0 or MIT licensed alternative".to_string(),
                });
            }
        }

        self.details.push(LicenseDetail {
            group_id: entry.coordinate.group_id.clone(),
            artifact_id: entry.coordinate.artifact_id.clone(),
            version: entry.resolved_version.clone(),
            scope: entry.scope.clone(),
            license,
            license_url: licenses.first().and_then(|l| l.url.clone()),
            multi_license: names.len() > 1,
            depth: entry.depth,
        });
    }

    pub fn finish(self) -> LicenseReport {
        // Sort by count (descending), then name, into an ordered map
        let mut by_type: Vec<(String, usize)> = self.by_type.into_iter().collect();
        by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let summary = compliance::summarize(&self.details, by_type.into_iter().collect());
        let compliance = compliance::score(&summary, self.incompatible_count);
        LicenseReport {
            summary,
            details: self.details,
            warnings: self.warnings,
            compliance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::DependencyDeclaration;
    use crate::store::test_support::write_pom;
    use crate::store::ManifestStore;
    use tempfile::TempDir;

    fn root_with(deps: &[(&str, &str)]) -> Manifest {
        Manifest {
            group_id: Some("com.example".to_string()),
            artifact_id: Some("demo".to_string()),
            version: Some("1.0.0".to_string()),
            dependencies: deps
                .iter()
                .map(|(artifact, version)| DependencyDeclaration {
                    group_id: "com.example".to_string(),
                    artifact_id: artifact.to_string(),
                    version: Some(version.to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn run(repo: &std::path::Path, root: &Manifest, options: &LicenseOptions) -> LicenseReport {
        let store = ManifestStore::new(repo);
        let mut ctx = ResolverContext::new(&store);
        let effective = ctx.effective(root, None);
        collect_licenses(&mut ctx, &effective, options).unwrap()
    }

    #[test]
    fn test_license_inherited_from_parent() {
        let repo = TempDir::new().unwrap();
        write_pom(
            repo.path(),
            "g",
            "parent",
            "1.0",
            "<licenses><license><name>Apache-2.0</name><url>https://www.apache.org/licenses/LICENSE-2.0</url></license></licenses>",
        );
        write_pom(
            repo.path(),
            "g",
            "a",
            "1.0",
            "<parent><groupId>g</groupId><artifactId>parent</artifactId><version>1.0</version></parent>",
        );
        let root = Manifest {
            dependencies: vec![DependencyDeclaration {
                group_id: "g".to_string(),
                artifact_id: "a".to_string(),
                version: Some("1.0".to_string()),
                ..Default::default()
            }],
            ..root_with(&[])
        };

        let report = run(repo.path(), &root, &LicenseOptions::default());
        let detail = &report.details[0];
        assert_eq!(detail.license, "Apache-2.0");
        assert_eq!(detail.scope, "compile");
        assert_eq!(detail.depth, 1);
        assert_eq!(detail.license_url.as_deref(), Some("https://www.apache.org/licenses/LICENSE-2.0"));
    }

    #[test]
    fn test_transitive_license_inherited_from_parent_keeps_dependency_depth() {
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "g", "parent", "1.0", "<licenses><license><name>EPL-2.0</name></license></licenses>");
        write_pom(
            repo.path(),
            "com.example",
            "direct-a",
            "1.0",
            r#"<licenses><license><name>MIT</name></license></licenses>
               <dependencies><dependency><groupId>g</groupId><artifactId>b</artifactId><version>2.0</version></dependency></dependencies>"#,
        );
        write_pom(
            repo.path(),
            "g",
            "b",
            "2.0",
            "<parent><groupId>g</groupId><artifactId>parent</artifactId><version>1.0</version></parent>",
        );
        let options = LicenseOptions { include_transitive: true, ..Default::default() };
        let report = run(repo.path(), &root_with(&[("direct-a", "1.0")]), &options);

        let inherited = report.details.iter().find(|d| d.artifact_id == "b").unwrap();
        assert_eq!(inherited.license, "EPL-2.0");
        assert_eq!(inherited.depth, 2);
        assert_eq!(report.summary.by_type.get("EPL-2.0"), Some(&1));
    }

    #[test]
    fn test_multi_license_counts_each_name() {
        let repo = TempDir::new().unwrap();
        write_pom(
            repo.path(),
            "com.example",
            "dual",
            "1.0",
            "<licenses><license><name>MPL-2.0</name></license><license><name>EPL-1.0</name></license></licenses>",
        );
        let report = run(repo.path(), &root_with(&[("dual", "1.0")]), &LicenseOptions::default());

        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].license, "MPL-2.0 OR EPL-1.0");
        assert!(report.details[0].multi_license);
        assert_eq!(report.summary.by_type.get("MPL-2.0"), Some(&1));
        assert_eq!(report.summary.by_type.get("EPL-1.0"), Some(&1));
        assert_eq!(report.summary.total, 1);
    }

    #[test]
    fn test_transitive_incompatible_license_warns_once() {
        let repo = TempDir::new().unwrap();
        write_pom(
            repo.path(),
            "com.example",
            "direct-a",
            "1.0",
            r#"<licenses><license><name>Apache-2.0</name></license></licenses>
               <dependencies><dependency><groupId>com.example</groupId><artifactId>gpl-lib</artifactId><version>2.1.0</version><scope>runtime</scope></dependency></dependencies>"#,
        );
        write_pom(
            repo.path(),
            "com.example",
            "gpl-lib",
            "2.1.0",
            "<licenses><license><name>GPL-3.0</name></license></licenses>",
        );
        let options = LicenseOptions {
            include_transitive: true,
            incompatible: vec!["gpl-3.0".to_string()],
            ..Default::default()
        };
        let report = run(repo.path(), &root_with(&[("direct-a", "1.0")]), &options);

        assert_eq!(report.summary.total, 2);
        let high: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::High)
            .collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].artifact, "com.example:gpl-lib:2.1.0");
        assert!(report.compliance.has_incompatible_licenses);
        assert!(!report.compliance.commercially_viable);
        assert_eq!(report.details[1].depth, 2);
    }

    #[test]
    fn test_direct_only_without_transitive_flag() {
        let repo = TempDir::new().unwrap();
        write_pom(
            repo.path(),
            "com.example",
            "direct-a",
            "1.0",
            r#"<dependencies><dependency><groupId>com.example</groupId><artifactId>trans-b</artifactId><version>1.0</version></dependency></dependencies>"#,
        );
        let report = run(repo.path(), &root_with(&[("direct-a", "1.0")]), &LicenseOptions::default());
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.unknown, 1);
        assert_eq!(report.summary.by_type.get(UNKNOWN_LICENSE), Some(&1));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, WarningSeverity::Medium);
    }

    #[test]
    fn test_missing_manifest_is_unknown_without_warnings_when_disabled() {
        let repo = TempDir::new().unwrap();
        let options = LicenseOptions { warnings: false, ..Default::default() };
        let report = run(repo.path(), &root_with(&[("absent", "9")]), &options);
        assert_eq!(report.details[0].license, UNKNOWN_LICENSE);
        assert!(report.warnings.is_empty());
        assert!(!report.compliance.requires_attribution);
    }

    #[test]
    fn test_disabled_returns_none() {
        let repo = TempDir::new().unwrap();
        let store = ManifestStore::new(repo.path());
        let mut ctx = ResolverContext::new(&store);
        let effective = ctx.effective(&root_with(&[("x", "1")]), None);
        let options = LicenseOptions { include: false, ..Default::default() };
        assert!(collect_licenses(&mut ctx, &effective, &options).is_none());
    }

    #[test]
    fn test_histogram_is_sorted_by_count() {
        let repo = TempDir::new().unwrap();
        for artifact in ["m1", "m2"] {
            write_pom(repo.path(), "com.example", artifact, "1", "<licenses><license><name>MIT</name></license></licenses>");
        }
        write_pom(repo.path(), "com.example", "a1", "1", "<licenses><license><name>Apache-2.0</name></license></licenses>");
        let report = run(
            repo.path(),
            &root_with(&[("a1", "1"), ("m1", "1"), ("m2", "1")]),
            &LicenseOptions::default(),
        );
        let order: Vec<_> = report.summary.by_type.keys().cloned().collect();
        assert_eq!(order, vec!["MIT".to_string(), "Apache-2.0".to_string()]);
    }
}
