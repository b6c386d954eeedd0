//! Effective manifest resolution.
//!
//! Everything here runs against a [`ResolverContext`] created for a single
//! top-level analysis. The context owns the per-call memo of manifests loaded
//! from the local repository and is dropped with the call; nothing is cached
//! across invocations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::pom::{Coordinate, DependencyDeclaration, Manifest};
use crate::store::ManifestStore;

pub mod managed;
pub mod parent;
pub mod properties;

pub use managed::ManagedVersions;
pub use properties::{resolve_properties, substitute, PropertyTable, MAX_SUBSTITUTION_PASSES};

/// A manifest together with the directory it was read from.
/// `dir` is `None` for manifests that came out of the local repository.
#[derive(Debug, Clone)]
pub struct LocatedManifest {
    pub manifest: Manifest,
    pub dir: Option<PathBuf>,
}

/// A manifest with its inherited properties and managed versions resolved
#[derive(Debug, Clone)]
pub struct EffectiveManifest {
    pub manifest: Manifest,
    pub dir: Option<PathBuf>,
    pub properties: PropertyTable,
    pub managed: ManagedVersions,
}

impl EffectiveManifest {
    /// Inline version if present, otherwise the managed one; `None` when neither exists
    pub fn resolve_version(&self, dependency: &DependencyDeclaration) -> Option<String> {
        if let Some(version) = dependency.declared_version() {
            let resolved = self.properties.substitute(version);
            if !resolved.trim().is_empty() {
                return Some(resolved);
            }
        }
        let group = self.properties.substitute(&dependency.group_id);
        let artifact = self.properties.substitute(&dependency.artifact_id);
        self.managed
            .get(&group, &artifact)
            .map(|version| self.properties.substitute(version))
            .filter(|version| !version.trim().is_empty())
    }

    /// Placeholder-resolved coordinate of a declared dependency
    pub fn coordinate_of(&self, dependency: &DependencyDeclaration) -> Coordinate {
        Coordinate::new(
            self.properties.substitute(&dependency.group_id),
            self.properties.substitute(&dependency.artifact_id),
            self.resolve_version(dependency).unwrap_or_default(),
        )
    }
}

pub struct ResolverContext<'s> {
    store: &'s ManifestStore,
    loaded: HashMap<String, Option<Manifest>>,
}

impl<'s> ResolverContext<'s> {
    pub fn new(store: &'s ManifestStore) -> Self {
        Self {
            store,
            loaded: HashMap::new(),
        }
    }

    pub fn store(&self) -> &ManifestStore {
        self.store
    }

    /// Store lookup, memoized for the lifetime of this context
    pub fn load(&mut self, coordinate: &Coordinate) -> Option<Manifest> {
        let store = self.store;
        self.loaded
            .entry(coordinate.key())
            .or_insert_with(|| store.load(coordinate))
            .clone()
    }

    /// Resolve properties, BOM imports and parent-managed versions for `manifest`
    pub fn effective(&mut self, manifest: &Manifest, module_dir: Option<&Path>) -> EffectiveManifest {
        let (managed, properties) = self.gather_managed_versions(manifest, module_dir);
        EffectiveManifest {
            manifest: manifest.clone(),
            dir: module_dir.map(Path::to_path_buf),
            properties,
            managed,
        }
    }
}
