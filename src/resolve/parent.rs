use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use crate::pom::{Manifest, ParentRef, PomParser, MANIFEST_FILE};
use super::{LocatedManifest, ResolverContext};

impl<'s> ResolverContext<'s> {
    /// Locate the parent manifest of `manifest`.
    ///
    /// Tries the declared relative path, then `../pom.xml` when no relative
    /// path is declared (only if it really is the declared parent), then the
    /// local repository.
    pub fn find_parent(&mut self, manifest: &Manifest, module_dir: Option<&Path>) -> Option<LocatedManifest> {
        let parent = manifest.parent.as_ref()?;

        if let Some(dir) = module_dir {
            match parent.relative_path.as_deref().map(str::trim) {
                Some(relative) if !relative.is_empty() => {
                    let mut candidate = dir.join(relative);
                    if candidate.is_dir() {
                        candidate = candidate.join(MANIFEST_FILE);
                    }
                    if candidate.is_file() {
                        match PomParser::parse_file(&candidate) {
                            Ok(found) => {
                                return Some(LocatedManifest {
                                    manifest: found,
                                    dir: candidate.parent().map(Path::to_path_buf),
                                });
                            }
                            Err(e) => debug!("unreadable parent at relative path: {}", e),
                        }
                    }
                }
                // explicit empty <relativePath/> disables file system lookup
                Some(_) => {}
                None => {
                    let candidate = dir.join("..").join(MANIFEST_FILE);
                    if candidate.is_file() {
                        match PomParser::parse_file(&candidate) {
                            Ok(found) if is_declared_parent(&found, parent) => {
                                return Some(LocatedManifest {
                                    manifest: found,
                                    dir: candidate.parent().map(Path::to_path_buf),
                                });
                            }
                            Ok(found) => debug!(
                                sibling = %found.coordinate(),
                                declared = %parent.coordinate(),
                                "ignoring unrelated manifest in parent directory"
                            ),
                            Err(e) => debug!("unreadable manifest in parent directory: {}", e),
                        }
                    }
                }
            }
        }

        self.load(&parent.coordinate())
            .map(|found| LocatedManifest { manifest: found, dir: None })
    }

    /// Parent chain of `manifest`, nearest first. Stops at the first repeated coordinate.
    pub fn ancestors(&mut self, manifest: &Manifest, module_dir: Option<&Path>) -> Vec<LocatedManifest> {
        let mut visited = HashSet::new();
        visited.insert(manifest.coordinate().key());

        let mut chain = Vec::new();
        let mut current = self.find_parent(manifest, module_dir);
        while let Some(located) = current {
            if !visited.insert(located.manifest.coordinate().key()) {
                debug!(coordinate = %located.manifest.coordinate(), "parent chain cycle detected");
                break;
            }
            current = self.find_parent(&located.manifest, located.dir.as_deref());
            chain.push(located);
        }
        chain
    }
}

fn is_declared_parent(candidate: &Manifest, declared: &ParentRef) -> bool {
    candidate.effective_group_id() == declared.group_id.as_deref()
        && candidate.artifact_id.as_deref() == declared.artifact_id.as_deref()
        && candidate.effective_version() == declared.version.as_deref()
}
