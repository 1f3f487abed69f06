//! Sibling name disambiguation.

use std::collections::HashSet;

/// Return `base` if no sibling uses it, otherwise the first free `base_N` (N ≥ 1).
pub fn disambiguate<'a>(base: &str, siblings: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = siblings.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
