//! Path and filter utilities

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Predicate over root-relative file ids deciding what gets uploaded.
pub type IncludePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// File id for a root-relative path: its components joined with `/`, name bytes untouched.
/// `None` if any component is not valid UTF-8.
pub fn path_to_file_id(rel: &Path) -> Option<String> {
    let mut id = String::new();
    for component in rel.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        if !id.is_empty() {
            id.push('/');
        }
        id.push_str(part.to_str()?);
    }
    Some(id)
}

/// True if `id` ends with any of `suffixes`. Plain suffix match: `pdf` also matches `a.xpdf`.
pub fn has_any_suffix(id: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|s| id.ends_with(s.as_str()))
}

/// Build the inclusion predicate for a set of extensions. An empty set includes nothing.
pub fn extension_predicate(extensions: &[String]) -> IncludePredicate {
    let extensions = extensions.to_vec();
    Arc::new(move |id: &str| has_any_suffix(id, &extensions))
}

/// Split comma-separated extension lists, trimming whitespace and dropping empty items.
pub fn normalize_extensions<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .flat_map(|s| {
            s.as_ref()
                .split(',')
                .map(|e| e.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|e| !e.is_empty())
        .collect()
}
