//! Derives the grouped and ungrouped catalog views from the catalog list,
//! the ordered collection list, and the membership map. Pure recomputation
//! with no retained state.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::model::{Catalog, CatalogId, CatalogWithVariations, Collection, CollectionId};

/// Filters apply only to the ungrouped pool; grouped catalogs are always
/// shown in full inside their collection.
#[derive(Clone, Debug, Default)]
pub struct CatalogFilter {
    pub name_query: String,
    pub tags: BTreeSet<String>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.name_query.is_empty() && self.tags.is_empty()
    }

    pub fn matches(&self, catalog: &Catalog) -> bool {
        if !self.name_query.is_empty()
            && !catalog
                .name
                .to_lowercase()
                .contains(&self.name_query.to_lowercase())
        {
            return false;
        }
        if self.tags.is_empty() {
            return true;
        }
        let wanted: HashSet<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        catalog
            .tags
            .iter()
            .any(|tag| wanted.contains(&tag.to_lowercase()))
    }
}

#[derive(Debug, Default)]
pub struct LibraryViews {
    /// Collection id -> catalogs belonging to it, in catalog-list order.
    pub grouped: HashMap<CollectionId, Vec<CatalogWithVariations>>,
    /// Catalogs in no collection at all, post-filter.
    pub ungrouped: Vec<CatalogWithVariations>,
}

/// Strict total order for collections: order_index ascending, created_at
/// ascending. Created-at is RFC3339 UTC, so string comparison is
/// chronological.
pub fn sort_collections(collections: &mut [Collection]) {
    collections.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

pub fn derive_views(
    catalogs: &[CatalogWithVariations],
    collections: &[Collection],
    members: &HashMap<CollectionId, Vec<CatalogId>>,
    filter: &CatalogFilter,
) -> LibraryViews {
    let mut grouped_anywhere: HashSet<&CatalogId> = HashSet::new();
    for ids in members.values() {
        grouped_anywhere.extend(ids.iter());
    }

    let mut grouped = HashMap::new();
    for collection in collections {
        let member_ids: HashSet<&CatalogId> = members
            .get(&collection.id)
            .map(|ids| ids.iter().collect())
            .unwrap_or_default();
        let entries: Vec<CatalogWithVariations> = catalogs
            .iter()
            .filter(|entry| member_ids.contains(&entry.catalog.id))
            .cloned()
            .collect();
        grouped.insert(collection.id.clone(), entries);
    }

    let ungrouped = catalogs
        .iter()
        .filter(|entry| !grouped_anywhere.contains(&entry.catalog.id))
        .filter(|entry| filter.matches(&entry.catalog))
        .cloned()
        .collect();

    LibraryViews { grouped, ungrouped }
}

#[cfg(test)]
#[path = "tests/organize_tests.rs"]
mod tests;
