use std::path::{Path, PathBuf};
use tracing::debug;
use crate::pom::{Coordinate, Manifest, PomParser};

/// Extension of manifests stored in the local repository
pub const REPOSITORY_MANIFEST_EXT: &str = "pom";

/// Read-only view of a pre-populated local artifact repository
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
}

impl ManifestStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Use the configured repository, or the conventional user cache
    pub fn from_config(local_repository: Option<PathBuf>) -> Self {
        match local_repository {
            Some(root) => Self::new(root),
            None => Self::new(default_repository()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `group/as/dirs/artifact/version/artifact-version.pom` under the root
    pub fn path_for(&self, coordinate: &Coordinate) -> PathBuf {
        let mut path = self.root.clone();
        for segment in coordinate.group_id.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact_id);
        path.push(&coordinate.version);
        path.push(format!(
            "{}-{}.{}",
            coordinate.artifact_id, coordinate.version, REPOSITORY_MANIFEST_EXT
        ));
        path
    }

    /// Load a manifest; any failure is reported as `None`
    pub fn load(&self, coordinate: &Coordinate) -> Option<Manifest> {
        if !coordinate.is_complete() || coordinate.version.contains("${") {
            debug!(coordinate = %coordinate, "skipping lookup of incomplete coordinate");
            return None;
        }
        let path = self.path_for(coordinate);
        match PomParser::parse_file(&path) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                debug!(coordinate = %coordinate, "manifest lookup failed: {}", e);
                None
            }
        }
    }
}

/// `$HOME/.m2/repository`, falling back to the working directory
pub fn default_repository() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".m2").join("repository")
}
