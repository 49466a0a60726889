//! Two keyed multi-select sets (catalogs, variations) with cascade rules
//! between them. Session-lifetime only, never persisted.

use std::collections::{HashMap, HashSet};

use crate::model::{Catalog, CatalogId, CatalogWithVariations, Variation, VariationId};

#[derive(Clone, Debug)]
pub struct SelectedVariation {
    pub variation: Variation,
    pub catalog: Catalog,
}

#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    variations: HashMap<VariationId, SelectedVariation>,
    catalogs: HashMap<CatalogId, CatalogWithVariations>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent, remove if present. Returns whether the variation is
    /// selected afterwards.
    pub fn toggle_variation(&mut self, variation: &Variation, catalog: &Catalog) -> bool {
        if self.variations.remove(&variation.id).is_some() {
            false
        } else {
            self.variations.insert(
                variation.id.clone(),
                SelectedVariation {
                    variation: variation.clone(),
                    catalog: catalog.clone(),
                },
            );
            true
        }
    }

    /// Selecting a catalog pulls every one of its variations into the
    /// variation set; deselecting removes exactly that catalog's variations
    /// and no others. Returns whether the catalog is selected afterwards.
    pub fn toggle_catalog(&mut self, entry: &CatalogWithVariations) -> bool {
        if self.catalogs.remove(&entry.catalog.id).is_some() {
            for variation in &entry.variations {
                self.variations.remove(&variation.id);
            }
            false
        } else {
            self.catalogs
                .insert(entry.catalog.id.clone(), entry.clone());
            for variation in &entry.variations {
                self.variations.insert(
                    variation.id.clone(),
                    SelectedVariation {
                        variation: variation.clone(),
                        catalog: entry.catalog.clone(),
                    },
                );
            }
            true
        }
    }

    /// Drop every entry referencing the given catalogs, including variations
    /// that were selected individually. Used when catalogs are deleted so no
    /// selection can point at data that no longer exists.
    pub fn purge_catalogs(&mut self, catalog_ids: &[CatalogId]) {
        let doomed: HashSet<&CatalogId> = catalog_ids.iter().collect();
        self.catalogs.retain(|id, _| !doomed.contains(id));
        self.variations
            .retain(|_, sel| !doomed.contains(&sel.catalog.id));
    }

    pub fn clear_variations(&mut self) {
        self.variations.clear();
    }

    pub fn clear_catalogs(&mut self) {
        self.catalogs.clear();
    }

    pub fn clear_all(&mut self) {
        self.variations.clear();
        self.catalogs.clear();
    }

    pub fn is_variation_selected(&self, id: &VariationId) -> bool {
        self.variations.contains_key(id)
    }

    pub fn is_catalog_selected(&self, id: &CatalogId) -> bool {
        self.catalogs.contains_key(id)
    }

    pub fn selected_variations(&self) -> impl Iterator<Item = &SelectedVariation> {
        self.variations.values()
    }

    pub fn selected_catalogs(&self) -> impl Iterator<Item = &CatalogWithVariations> {
        self.catalogs.values()
    }

    pub fn selected_catalog_ids(&self) -> Vec<CatalogId> {
        self.catalogs.keys().cloned().collect()
    }

    pub fn selected_variation_ids(&self) -> Vec<VariationId> {
        self.variations.keys().cloned().collect()
    }

    pub fn variation_count(&self) -> usize {
        self.variations.len()
    }

    pub fn catalog_count(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variations.is_empty() && self.catalogs.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
