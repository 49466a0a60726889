use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::cache::{CacheKind, CachePayload};
use crate::model::CatalogId;
use crate::remote::SyncReport;

use super::BrowseSession;

impl BrowseSession {
    /// Cache-first read of the catalog list; `force` bypasses the TTL.
    pub fn refresh_catalogs(&mut self, force: bool) -> Result<()> {
        self.load_catalogs(force)
    }

    pub fn refresh_collections(&mut self, force: bool) -> Result<()> {
        self.load_collections(force)
    }

    /// "Sync now" has no optimistic half: nothing local approximates newly
    /// discovered remote content. Both cache kinds are invalidated up front
    /// so nothing older than the user's explicit intent is served after.
    pub fn sync_workspace_catalog(&mut self) -> Result<SyncReport> {
        let workspace = self.workspace_id()?;
        self.cache.invalidate(&workspace, CacheKind::Catalogs);
        self.cache.invalidate(&workspace, CacheKind::Collections);
        let report = self
            .backend
            .sync_workspace_catalog(&workspace)
            .context("sync workspace catalog")?;
        self.load_catalogs(true)?;
        self.load_collections(true)?;
        Ok(report)
    }

    /// The optimistic step purges matching selection entries and membership
    /// rows before the remote call, so no later render can reference a
    /// catalog that no longer exists.
    pub fn delete_catalogs(&mut self, catalog_ids: &[CatalogId]) -> Result<u64> {
        let workspace = self.workspace_id()?;
        let catalogs_before = self.catalogs.clone();
        let collections_before = self.collections.clone();
        let selection_before = self.selection.clone();

        let doomed: HashSet<&CatalogId> = catalog_ids.iter().collect();
        self.selection.purge_catalogs(catalog_ids);
        self.catalogs
            .retain(|entry| !doomed.contains(&entry.catalog.id));
        for members in self.collections.members.values_mut() {
            members.retain(|id| !doomed.contains(id));
        }

        match self.backend.delete_catalogs(catalog_ids) {
            Ok(deleted) => {
                self.cache
                    .set(&workspace, CachePayload::Catalogs(self.catalogs.clone()));
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_catalogs(&workspace);
                self.reconcile_collections(&workspace);
                Ok(deleted)
            }
            Err(err) => {
                self.catalogs = catalogs_before;
                self.collections = collections_before;
                self.selection = selection_before;
                self.rollback_catalogs(&workspace);
                self.rollback_collections(&workspace);
                Err(err.context("delete catalogs"))
            }
        }
    }
}
