use std::collections::HashSet;

/// Split a license label on `OR` / `AND` (any case) into its component names.
///
/// Separators must be whole whitespace-delimited words, so names such as
/// `"ORACLE"` or `"BAND-1.0"` are left intact. Runs of whitespace inside a
/// name collapse to a single space; empty tokens are dropped.
pub fn license_tokens(label: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in label.split_whitespace() {
        if word.eq_ignore_ascii_case("or") || word.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                tokens.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        tokens.push(current.join(" "));
    }
    tokens
}

/// Lower-cased, trimmed set for case-insensitive membership tests
pub fn normalize_license_set<I, S>(licenses: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    licenses
        .into_iter()
        .map(|l| l.as_ref().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

/// First token of `label` found in `incompatible` (already normalized)
pub fn first_incompatible(label: &str, incompatible: &HashSet<String>) -> Option<String> {
    license_tokens(label)
        .into_iter()
        .find(|token| incompatible.contains(&token.to_lowercase()))
}
