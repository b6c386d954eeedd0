use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::build_info::{collect_build_properties, collect_profiles, BuildProperties, ProfilesInfo, PropertyOptions};
use crate::graph::{collect_dependency_tree, DependencyTreeOptions, DependencyTreeReport};
use crate::license::{collect_licenses, LicenseOptions, LicenseReport};
use crate::pom::{Manifest, PomParser, MANIFEST_FILE};
use crate::resolve::ResolverContext;
use crate::store::ManifestStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub licenses: LicenseOptions,
    pub dependency_tree: DependencyTreeOptions,
    pub properties: PropertyOptions,
}

/// Deployment report for one module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleReport {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
    pub module_path: PathBuf,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licenses: Option<LicenseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyTreeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BuildProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<ProfilesInfo>,
}

pub struct ModuleAnalyzer {
    store: ManifestStore,
    options: AnalysisOptions,
}

impl ModuleAnalyzer {
    pub fn new(store: ManifestStore, options: AnalysisOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze the module whose `pom.xml` lives in `module_dir`
    pub fn analyze(&self, module_dir: &Path) -> Result<ModuleReport> {
        let pom_path = if module_dir.is_file() {
            module_dir.to_path_buf()
        } else {
            module_dir.join(MANIFEST_FILE)
        };
        let manifest = PomParser::parse_file(&pom_path)
            .with_context(|| format!("Failed to load module manifest: {}", pom_path.display()))?;
        let dir = pom_path.parent().unwrap_or(module_dir);
        Ok(self.analyze_manifest(&manifest, Some(dir)))
    }

    /// Analyze an already parsed root manifest. Every call gets its own
    /// resolver context; nothing is shared between calls.
    pub fn analyze_manifest(&self, manifest: &Manifest, module_dir: Option<&Path>) -> ModuleReport {
        let mut ctx = ResolverContext::new(&self.store);
        let effective = ctx.effective(manifest, module_dir);
        let coordinate = manifest.coordinate();
        debug!(
            module = %coordinate,
            properties = effective.properties.len(),
            managed = effective.managed.len(),
            "resolved effective manifest"
        );

        let licenses = collect_licenses(&mut ctx, &effective, &self.options.licenses);
        let dependencies = collect_dependency_tree(&mut ctx, &effective, &self.options.dependency_tree);
        let properties = collect_build_properties(manifest, &effective.properties, &self.options.properties);

        info!(module = %coordinate, "module analyzed");
        ModuleReport {
            group_id: coordinate.group_id,
            artifact_id: coordinate.artifact_id,
            version: coordinate.version,
            packaging: manifest.packaging_or_default().to_string(),
            module_path: module_dir.map(Path::to_path_buf).unwrap_or_default(),
            generated_at: Utc::now(),
            licenses,
            dependencies,
            properties,
            profiles: collect_profiles(manifest),
        }
    }

    /// Analyze several modules in parallel, keeping input order
    pub fn analyze_all(&self, module_dirs: &[PathBuf]) -> Vec<Result<ModuleReport>> {
        module_dirs
            .par_iter()
            .map(|dir| self.analyze(dir))
            .collect()
    }
}

/// One-shot analysis of a single module
pub fn analyze_module(module_dir: &Path, store: ManifestStore, options: AnalysisOptions) -> Result<ModuleReport> {
    ModuleAnalyzer::new(store, options).analyze(module_dir)
}
