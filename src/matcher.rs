//! Maps a publish item (declared name + optional relative path) to an
//! indexed local resource. Pure over its inputs; callers re-scan the
//! project immediately before matching so the index is fresh.

use crate::model::LocalResource;

/// Strip one leading `./` or `/` and unify separators to `/`.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified
        .strip_prefix("./")
        .or_else(|| unified.strip_prefix('/'))
        .unwrap_or(&unified);
    trimmed.to_string()
}

/// Both arguments must already be normalized. Accepts exact equality, either
/// path being a `/`-aligned suffix of the other, or the item path passing
/// through the project-local `.bluekit` staging subdirectory.
fn paths_match(item: &str, resource: &str) -> bool {
    if item == resource {
        return true;
    }
    if item.ends_with(&format!("/{resource}")) {
        return true;
    }
    if resource.ends_with(&format!("/{item}")) {
        return true;
    }
    item.contains(&format!("/.bluekit/{resource}"))
}

/// Find the resource record for a publish item, first by path, then by file
/// name (`name` or `name.md`). When several resources satisfy a rule, the
/// first in index order wins; intent for suffix collisions is an open
/// product question and no further tie-break is applied.
pub fn find_resource<'a>(
    name: &str,
    declared_path: Option<&str>,
    resources: &'a [LocalResource],
) -> Option<&'a LocalResource> {
    if let Some(path) = declared_path {
        let item = normalize_path(path);
        if let Some(hit) = resources
            .iter()
            .find(|r| paths_match(&item, &normalize_path(&r.relative_path)))
        {
            return Some(hit);
        }
    }

    let with_md = format!("{name}.md");
    resources
        .iter()
        .find(|r| r.file_name == name || r.file_name == with_md)
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
