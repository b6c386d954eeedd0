use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod parser;

pub use parser::{ManifestError, PomParser};

/// Default file name of a module manifest
pub const MANIFEST_FILE: &str = "pom.xml";

/// (group, artifact, version) identity triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Colon-joined identity key
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// True when every component is present
    pub fn is_complete(&self) -> bool {
        !self.group_id.trim().is_empty()
            && !self.artifact_id.trim().is_empty()
            && !self.version.trim().is_empty()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// `<parent>` reference of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// `None` when the element is absent, `Some("")` for an explicit empty `<relativePath/>`
    pub relative_path: Option<String>,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.group_id.clone().unwrap_or_default(),
            self.artifact_id.clone().unwrap_or_default(),
            self.version.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDeclaration {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    #[serde(rename = "type")]
    pub dep_type: Option<String>,
    pub optional: bool,
}

impl DependencyDeclaration {
    /// Scope trimmed and lower-cased; blank means `compile`
    pub fn normalized_scope(&self) -> String {
        normalize_scope(self.scope.as_deref())
    }

    pub fn type_or_default(&self) -> &str {
        match self.dep_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => "jar",
        }
    }

    /// `<type>pom</type><scope>import</scope>` inside dependencyManagement
    pub fn is_bom_import(&self) -> bool {
        self.type_or_default().eq_ignore_ascii_case("pom") && self.normalized_scope() == "import"
    }

    pub fn declared_version(&self) -> Option<&str> {
        self.version.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

pub fn normalize_scope(scope: Option<&str>) -> String {
    match scope.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => "compile".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDeclaration {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub active_by_default: bool,
}

/// Parsed build descriptor of one module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub parent: Option<ParentRef>,
    /// Declared `<properties>` in document order
    pub properties: IndexMap<String, String>,
    pub dependencies: Vec<DependencyDeclaration>,
    pub managed_dependencies: Vec<DependencyDeclaration>,
    pub licenses: Vec<LicenseDeclaration>,
    pub profiles: Vec<Profile>,
}

impl Manifest {
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
    }

    /// Never inherited from the parent
    pub fn effective_artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.version.as_deref()))
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.effective_group_id().unwrap_or_default(),
            self.effective_artifact_id().unwrap_or_default(),
            self.effective_version().unwrap_or_default(),
        )
    }

    pub fn packaging_or_default(&self) -> &str {
        self.packaging.as_deref().unwrap_or("jar")
    }
}
