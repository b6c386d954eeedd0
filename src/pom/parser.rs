use std::path::{Path, PathBuf};
use roxmltree::{Document, Node};
use thiserror::Error;
use super::{DependencyDeclaration, LicenseDeclaration, Manifest, ParentRef, Profile};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("root element of {0} is not <project>")]
    NotAProject(PathBuf),
}

pub struct PomParser;

impl PomParser {
    /// Read and parse a manifest file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
        let path_ref = path.as_ref();
        if !path_ref.is_file() {
            return Err(ManifestError::NotFound(path_ref.to_path_buf()));
        }
        let content = std::fs::read_to_string(path_ref).map_err(|source| ManifestError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content, path_ref)
    }

    /// Parse manifest text; `origin` is only used in error messages
    pub fn parse_str(content: &str, origin: &Path) -> Result<Manifest, ManifestError> {
        let doc = Document::parse(content).map_err(|source| ManifestError::Xml {
            path: origin.to_path_buf(),
            source,
        })?;
        let project = doc.root_element();
        if project.tag_name().name() != "project" {
            return Err(ManifestError::NotAProject(origin.to_path_buf()));
        }

        let mut manifest = Manifest {
            group_id: child_text(project, "groupId"),
            artifact_id: child_text(project, "artifactId"),
            version: child_text(project, "version"),
            packaging: child_text(project, "packaging"),
            name: child_text(project, "name"),
            parent: child(project, "parent").map(parse_parent),
            ..Default::default()
        };

        if let Some(properties) = child(project, "properties") {
            for prop in properties.children().filter(Node::is_element) {
                let key = prop.tag_name().name().to_string();
                let value = node_text(prop).unwrap_or_default();
                // first declaration wins on duplicate keys
                manifest.properties.entry(key).or_insert(value);
            }
        }

        manifest.dependencies = parse_dependencies(child(project, "dependencies"));
        manifest.managed_dependencies = parse_dependencies(
            child(project, "dependencyManagement").and_then(|dm| child(dm, "dependencies")),
        );

        if let Some(licenses) = child(project, "licenses") {
            manifest.licenses = children(licenses, "license")
                .map(|license| LicenseDeclaration {
                    name: child_text(license, "name"),
                    url: child_text(license, "url"),
                })
                .collect();
        }

        if let Some(profiles) = child(project, "profiles") {
            manifest.profiles = children(profiles, "profile")
                .filter_map(|profile| {
                    let id = child_text(profile, "id")?;
                    let active_by_default = child(profile, "activation")
                        .and_then(|a| child_text(a, "activeByDefault"))
                        .map_or(false, |v| v.eq_ignore_ascii_case("true"));
                    Some(Profile { id, active_by_default })
                })
                .collect();
        }

        Ok(manifest)
    }
}

fn parse_parent(node: Node) -> ParentRef {
    ParentRef {
        group_id: child_text(node, "groupId"),
        artifact_id: child_text(node, "artifactId"),
        version: child_text(node, "version"),
        // keep an explicit empty element distinct from an absent one
        relative_path: child(node, "relativePath").map(|n| node_text(n).unwrap_or_default()),
    }
}

fn parse_dependencies(container: Option<Node>) -> Vec<DependencyDeclaration> {
    let Some(container) = container else {
        return Vec::new();
    };
    children(container, "dependency")
        .map(|dep| DependencyDeclaration {
            group_id: child_text(dep, "groupId").unwrap_or_default(),
            artifact_id: child_text(dep, "artifactId").unwrap_or_default(),
            version: child_text(dep, "version"),
            scope: child_text(dep, "scope"),
            dep_type: child_text(dep, "type"),
            optional: child_text(dep, "optional").map_or(false, |v| v.eq_ignore_ascii_case("true")),
        })
        .collect()
}

// Tag comparison ignores namespaces so both namespaced and bare POMs parse.
fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name).and_then(node_text)
}

fn node_text(node: Node) -> Option<String> {
    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
