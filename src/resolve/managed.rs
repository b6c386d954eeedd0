use std::collections::HashSet;
use std::path::Path;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use crate::pom::{Coordinate, DependencyDeclaration, Manifest};
use super::properties::{resolve_properties, PropertyTable};
use super::ResolverContext;

/// `group:artifact` → version, first write wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ManagedVersions {
    entries: IndexMap<String, String>,
}

impl ManagedVersions {
    pub fn get(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.entries
            .get(&format!("{group_id}:{artifact_id}"))
            .map(String::as_str)
    }

    pub fn insert_if_absent(&mut self, key: String, version: String) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, version);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

impl<'s> ResolverContext<'s> {
    /// Managed versions visible to `manifest`, plus the property table enriched
    /// with every BOM and ancestor property encountered on the way.
    ///
    /// Precedence: own plain entries, own BOM imports, then each ancestor in
    /// the same order. Nothing already present is ever replaced.
    pub fn gather_managed_versions(
        &mut self,
        manifest: &Manifest,
        module_dir: Option<&Path>,
    ) -> (ManagedVersions, PropertyTable) {
        let mut table = resolve_properties(manifest, None);
        let mut managed = ManagedVersions::default();
        let mut seen_boms = HashSet::new();
        seen_boms.insert(manifest.coordinate().key());

        self.ingest_chain(manifest, module_dir, &mut table, &mut managed, &mut seen_boms);
        (managed, table)
    }

    fn ingest_chain(
        &mut self,
        manifest: &Manifest,
        module_dir: Option<&Path>,
        table: &mut PropertyTable,
        managed: &mut ManagedVersions,
        seen_boms: &mut HashSet<String>,
    ) {
        // the whole chain's properties must be visible before any declaration
        // is keyed, since a child may import a BOM versioned by its parent
        let ancestors = self.ancestors(manifest, module_dir);
        for ancestor in &ancestors {
            table.merge_declared(&ancestor.manifest);
        }

        self.ingest_declarations(manifest, table, managed, seen_boms);
        for ancestor in &ancestors {
            self.ingest_declarations(&ancestor.manifest, table, managed, seen_boms);
        }
    }

    fn ingest_declarations(
        &mut self,
        manifest: &Manifest,
        table: &mut PropertyTable,
        managed: &mut ManagedVersions,
        seen_boms: &mut HashSet<String>,
    ) {
        // own entries first so they always beat anything a BOM brings in
        for declaration in manifest.managed_dependencies.iter().filter(|d| !d.is_bom_import()) {
            let Some(version) = declaration.declared_version() else {
                continue;
            };
            let key = format!(
                "{}:{}",
                table.substitute(&declaration.group_id),
                table.substitute(&declaration.artifact_id)
            );
            managed.insert_if_absent(key, table.substitute(version));
        }

        for declaration in manifest.managed_dependencies.iter().filter(|d| d.is_bom_import()) {
            self.import_bom(declaration, table, managed, seen_boms);
        }
    }

    fn import_bom(
        &mut self,
        declaration: &DependencyDeclaration,
        active: &mut PropertyTable,
        managed: &mut ManagedVersions,
        seen_boms: &mut HashSet<String>,
    ) {
        let coordinate = Coordinate::new(
            active.substitute(&declaration.group_id),
            active.substitute(&declaration.artifact_id),
            declaration
                .declared_version()
                .map(|v| active.substitute(v))
                .unwrap_or_default(),
        );
        if !seen_boms.insert(coordinate.key()) {
            debug!(bom = %coordinate, "BOM already imported");
            return;
        }
        let Some(bom) = self.load(&coordinate) else {
            debug!(bom = %coordinate, "imported BOM not found in local repository");
            return;
        };

        active.merge_declared(&bom);

        // BOM entries see the BOM's own identity first, then the importer's values
        let mut scoped = resolve_properties(&bom, None);
        scoped.merge_absent(&*active);
        self.ingest_chain(&bom, None, &mut scoped, managed, seen_boms);
    }
}
