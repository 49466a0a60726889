//! A workspace browsing session: the explicitly constructed owner of the
//! backend handle, the TTL cache, loaded catalog/collection state, the
//! selection sets, and the active filters. Every mutation takes `&mut
//! self`, so mutations on one session are serialized by construction.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};

use crate::cache::{CacheKind, CachePayload, CollectionsSnapshot, LibraryCache};
use crate::model::{
    CatalogId, CatalogWithVariations, Collection, CollectionId, VariationId, Workspace,
    WorkspaceId,
};
use crate::organize::{CatalogFilter, LibraryViews, derive_views, sort_collections};
use crate::remote::LibraryBackend;
use crate::selection::SelectionState;

mod catalogs;
mod collections;
mod delivery;

pub use self::delivery::{
    PublishItem, PublishOutcome, PublishRecord, PublishSummary, PullOutcome, PullRecord,
    PullSummary,
};

pub struct BrowseSession {
    backend: Box<dyn LibraryBackend>,
    cache: LibraryCache,
    workspace: Option<Workspace>,
    catalogs: Vec<CatalogWithVariations>,
    collections: CollectionsSnapshot,
    selection: SelectionState,
    filter: CatalogFilter,
}

impl BrowseSession {
    pub fn new(backend: Box<dyn LibraryBackend>) -> Self {
        Self::with_cache(backend, LibraryCache::new())
    }

    pub fn with_cache(backend: Box<dyn LibraryBackend>, cache: LibraryCache) -> Self {
        Self {
            backend,
            cache,
            workspace: None,
            catalogs: Vec::new(),
            collections: CollectionsSnapshot::default(),
            selection: SelectionState::new(),
            filter: CatalogFilter::default(),
        }
    }

    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.backend.list_workspaces().context("list workspaces")
    }

    /// A different workspace implies a disjoint id space: the selection is
    /// wiped before anything else, never carried over even transiently.
    pub fn open_workspace(&mut self, workspace: Workspace) -> Result<()> {
        self.selection.clear_all();
        self.catalogs.clear();
        self.collections = CollectionsSnapshot::default();
        self.filter = CatalogFilter::default();
        self.workspace = Some(workspace);
        self.load_catalogs(false)?;
        self.load_collections(false)?;
        Ok(())
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub(crate) fn workspace_id(&self) -> Result<WorkspaceId> {
        self.workspace
            .as_ref()
            .map(|w| w.id.clone())
            .ok_or_else(|| anyhow!("no workspace open"))
    }

    pub fn catalogs(&self) -> &[CatalogWithVariations] {
        &self.catalogs
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections.collections
    }

    pub fn collection_members(&self) -> &HashMap<CollectionId, Vec<CatalogId>> {
        &self.collections.members
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: CatalogFilter) {
        self.filter = filter;
    }

    /// Recompute the grouped/ungrouped partition from current state.
    pub fn views(&self) -> LibraryViews {
        derive_views(
            &self.catalogs,
            &self.collections.collections,
            &self.collections.members,
            &self.filter,
        )
    }

    pub fn toggle_catalog(&mut self, catalog_id: &CatalogId) -> Result<bool> {
        let entry = self
            .catalogs
            .iter()
            .find(|e| &e.catalog.id == catalog_id)
            .ok_or_else(|| anyhow!("unknown catalog {}", catalog_id.as_str()))?
            .clone();
        Ok(self.selection.toggle_catalog(&entry))
    }

    pub fn toggle_variation(&mut self, variation_id: &VariationId) -> Result<bool> {
        for entry in &self.catalogs {
            if let Some(variation) = entry.variations.iter().find(|v| &v.id == variation_id) {
                let variation = variation.clone();
                let catalog = entry.catalog.clone();
                return Ok(self.selection.toggle_variation(&variation, &catalog));
            }
        }
        Err(anyhow!("unknown variation {}", variation_id.as_str()))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_all();
    }

    fn load_catalogs(&mut self, force: bool) -> Result<()> {
        let workspace = self.workspace_id()?;
        if !force && let Some(cached) = self.cache.catalogs(&workspace) {
            self.catalogs = cached.to_vec();
            return Ok(());
        }
        let catalogs = self.fetch_catalogs(&workspace)?;
        self.cache
            .set(&workspace, CachePayload::Catalogs(catalogs.clone()));
        self.catalogs = catalogs;
        Ok(())
    }

    fn load_collections(&mut self, force: bool) -> Result<()> {
        let workspace = self.workspace_id()?;
        if !force && let Some(cached) = self.cache.collections(&workspace) {
            self.collections = cached.clone();
            return Ok(());
        }
        let snapshot = self.fetch_collections(&workspace)?;
        self.cache
            .set(&workspace, CachePayload::Collections(snapshot.clone()));
        self.collections = snapshot;
        Ok(())
    }

    fn fetch_catalogs(&self, workspace: &WorkspaceId) -> Result<Vec<CatalogWithVariations>> {
        let mut catalogs = self
            .backend
            .list_catalogs(workspace)
            .context("list catalogs")?;
        for entry in &mut catalogs {
            entry.sort_variations();
        }
        Ok(catalogs)
    }

    fn fetch_collections(&self, workspace: &WorkspaceId) -> Result<CollectionsSnapshot> {
        let mut collections = self
            .backend
            .get_collections(workspace)
            .context("get collections")?;
        sort_collections(&mut collections);
        let mut members = HashMap::new();
        for collection in &collections {
            let ids = self
                .backend
                .get_collection_catalog_ids(&collection.id)
                .with_context(|| format!("get members of {}", collection.id.as_str()))?;
            members.insert(collection.id.clone(), ids);
        }
        Ok(CollectionsSnapshot {
            collections,
            members,
        })
    }

    /// Silent refresh after a successful mutation. The authoritative result
    /// always wins over the optimistic guess; a failed refresh keeps the
    /// guess, is logged, and is never surfaced (the primary operation
    /// already succeeded).
    fn reconcile_collections(&mut self, workspace: &WorkspaceId) {
        match self.fetch_collections(workspace) {
            Ok(snapshot) => {
                self.cache
                    .set(workspace, CachePayload::Collections(snapshot.clone()));
                self.collections = snapshot;
            }
            Err(err) => tracing::warn!(
                workspace = workspace.as_str(),
                "background collection refresh failed: {err:#}"
            ),
        }
    }

    fn reconcile_catalogs(&mut self, workspace: &WorkspaceId) {
        match self.fetch_catalogs(workspace) {
            Ok(catalogs) => {
                self.cache
                    .set(workspace, CachePayload::Catalogs(catalogs.clone()));
                self.catalogs = catalogs;
            }
            Err(err) => tracing::warn!(
                workspace = workspace.as_str(),
                "background catalog refresh failed: {err:#}"
            ),
        }
    }

    /// After a failed authoritative call: the optimistic state has already
    /// been rolled back to the pre-mutation snapshot; invalidate the cache
    /// and try to reload ground truth. If the reload also fails, the
    /// restored snapshot stands and only the original error surfaces.
    fn rollback_collections(&mut self, workspace: &WorkspaceId) {
        self.cache.invalidate(workspace, CacheKind::Collections);
        match self.fetch_collections(workspace) {
            Ok(snapshot) => {
                self.cache
                    .set(workspace, CachePayload::Collections(snapshot.clone()));
                self.collections = snapshot;
            }
            Err(err) => tracing::warn!(
                workspace = workspace.as_str(),
                "ground-truth reload after failed mutation failed: {err:#}"
            ),
        }
    }

    fn rollback_catalogs(&mut self, workspace: &WorkspaceId) {
        self.cache.invalidate(workspace, CacheKind::Catalogs);
        match self.fetch_catalogs(workspace) {
            Ok(catalogs) => {
                self.cache
                    .set(workspace, CachePayload::Catalogs(catalogs.clone()));
                self.catalogs = catalogs;
            }
            Err(err) => tracing::warn!(
                workspace = workspace.as_str(),
                "ground-truth reload after failed mutation failed: {err:#}"
            ),
        }
    }
}
