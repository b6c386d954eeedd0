use indexmap::IndexMap;
use serde::Serialize;
use crate::pom::Manifest;

/// Upper bound on rewrite passes over a single string
pub const MAX_SUBSTITUTION_PASSES: usize = 10;

/// Ordered, first-write-wins property table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyTable {
    entries: IndexMap<String, String>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert unless the key is already present; returns whether it was inserted
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value.into());
        true
    }

    pub fn merge_absent<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in entries {
            self.insert_if_absent(key.as_str(), value.as_str());
        }
    }

    /// Merge a manifest's declared `<properties>` without overwriting
    pub fn merge_declared(&mut self, manifest: &Manifest) {
        self.merge_absent(&manifest.properties);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn substitute(&self, text: &str) -> String {
        substitute(text, self)
    }
}

impl<'a> IntoIterator for &'a PropertyTable {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Identity keys a manifest exposes to its own placeholders
pub fn identity_aliases(manifest: &Manifest) -> Vec<(String, String)> {
    let mut aliases = Vec::new();
    let identity = [
        ("groupId", manifest.effective_group_id()),
        ("artifactId", manifest.effective_artifact_id()),
        ("version", manifest.effective_version()),
    ];
    for prefix in ["project", "pom"] {
        for (name, value) in identity {
            if let Some(value) = value {
                aliases.push((format!("{prefix}.{name}"), value.to_string()));
            }
        }
    }
    if let Some(parent) = &manifest.parent {
        if let Some(group) = &parent.group_id {
            aliases.push(("project.parent.groupId".to_string(), group.clone()));
        }
        if let Some(version) = &parent.version {
            aliases.push(("project.parent.version".to_string(), version.clone()));
        }
    }
    aliases
}

/// Build the property table of `manifest` on top of `inherited`.
///
/// Values already present in `inherited` are never overwritten, so callers
/// walking a parent chain pass the child's table in as `inherited` when
/// resolving the parent.
pub fn resolve_properties(manifest: &Manifest, inherited: Option<&PropertyTable>) -> PropertyTable {
    let mut table = inherited.cloned().unwrap_or_default();
    for (key, value) in identity_aliases(manifest) {
        table.insert_if_absent(key, value);
    }
    table.merge_declared(manifest);
    table
}

/// Replace `${name}` tokens known to `table`.
///
/// Runs at most [`MAX_SUBSTITUTION_PASSES`] passes and stops early once a pass
/// replaces nothing. Unknown tokens are kept verbatim.
pub fn substitute(text: &str, table: &PropertyTable) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_SUBSTITUTION_PASSES {
        let (next, replaced) = substitute_pass(&current, table);
        current = next;
        if !replaced {
            break;
        }
    }
    current
}

fn substitute_pass(text: &str, table: &PropertyTable) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced = false;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // unterminated placeholder
            out.push_str(&rest[start..]);
            return (out, replaced);
        };
        let name = &after[..end];
        match table.get(name) {
            Some(value) => {
                out.push_str(value);
                replaced = true;
            }
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    (out, replaced)
}
