//! Optimistic collection mutations: apply locally first, confirm against
//! the remote, reconcile in the background or roll back.

use anyhow::{Context, Result};

use crate::cache::CachePayload;
use crate::model::{CatalogId, Collection, CollectionId, next_order_index, now_rfc3339};
use crate::organize::sort_collections;
use crate::remote::{CollectionPatch, NewCollection};

use super::BrowseSession;

fn placeholder_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

impl BrowseSession {
    /// The synthetic record sorts last (order index one above the current
    /// maximum) and carries a placeholder id that is patched with the
    /// server-issued one; the placeholder itself is never sent.
    pub fn create_collection(
        &mut self,
        name: &str,
        description: Option<String>,
        tags: Vec<String>,
    ) -> Result<CollectionId> {
        let workspace = self.workspace_id()?;
        let created_at = now_rfc3339()?;
        let placeholder = CollectionId(format!("local-{}", placeholder_nanos()));
        let before = self.collections.clone();

        self.collections.collections.push(Collection {
            id: placeholder.clone(),
            workspace_id: workspace.clone(),
            name: name.to_string(),
            description: description.clone(),
            color: None,
            tags: tags.clone(),
            order_index: next_order_index(&before.collections),
            created_at: created_at.clone(),
            updated_at: created_at,
        });
        sort_collections(&mut self.collections.collections);
        self.collections
            .members
            .insert(placeholder.clone(), Vec::new());

        let req = NewCollection {
            name: name.to_string(),
            description,
            tags,
        };
        match self.backend.create_collection(&workspace, &req) {
            Ok(server_id) => {
                if let Some(record) = self
                    .collections
                    .collections
                    .iter_mut()
                    .find(|c| c.id == placeholder)
                {
                    record.id = server_id.clone();
                }
                if let Some(members) = self.collections.members.remove(&placeholder) {
                    self.collections.members.insert(server_id.clone(), members);
                }
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_collections(&workspace);
                Ok(server_id)
            }
            Err(err) => {
                self.collections = before;
                self.rollback_collections(&workspace);
                Err(err.context("create collection"))
            }
        }
    }

    /// Membership gains the catalogs and the selection is cleared before the
    /// remote call, so the next `views()` already shows them grouped.
    pub fn move_catalogs_to_collection(
        &mut self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        let workspace = self.workspace_id()?;
        anyhow::ensure!(
            self.collections
                .collections
                .iter()
                .any(|c| &c.id == collection),
            "unknown collection {}",
            collection.as_str()
        );
        let before = self.collections.clone();
        let selection_before = self.selection.clone();

        let members = self
            .collections
            .members
            .entry(collection.clone())
            .or_default();
        for id in catalog_ids {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }
        self.selection.clear_all();

        match self
            .backend
            .add_catalogs_to_collection(collection, catalog_ids)
        {
            Ok(()) => {
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_collections(&workspace);
                Ok(())
            }
            Err(err) => {
                self.collections = before;
                self.selection = selection_before;
                self.rollback_collections(&workspace);
                Err(err.context("move catalogs to collection"))
            }
        }
    }

    pub fn remove_catalogs_from_collection(
        &mut self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        let workspace = self.workspace_id()?;
        let before = self.collections.clone();

        if let Some(members) = self.collections.members.get_mut(collection) {
            members.retain(|id| !catalog_ids.contains(id));
        }

        match self
            .backend
            .remove_catalogs_from_collection(collection, catalog_ids)
        {
            Ok(()) => {
                self.selection.clear_all();
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_collections(&workspace);
                Ok(())
            }
            Err(err) => {
                self.collections = before;
                self.rollback_collections(&workspace);
                Err(err.context("remove catalogs from collection"))
            }
        }
    }

    /// Name, description, tags, and color are overwritten wholesale;
    /// order_index and created_at stay put, so the ordering is stable.
    pub fn update_collection(
        &mut self,
        collection: &CollectionId,
        patch: CollectionPatch,
    ) -> Result<()> {
        let workspace = self.workspace_id()?;
        let before = self.collections.clone();
        let updated_at = now_rfc3339()?;

        {
            let record = self
                .collections
                .collections
                .iter_mut()
                .find(|c| &c.id == collection)
                .with_context(|| format!("unknown collection {}", collection.as_str()))?;
            record.name = patch.name.clone();
            record.description = patch.description.clone();
            record.tags = patch.tags.clone();
            record.color = patch.color.clone();
            record.updated_at = updated_at;
        }

        match self.backend.update_collection(collection, &patch) {
            Ok(()) => {
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_collections(&workspace);
                Ok(())
            }
            Err(err) => {
                self.collections = before;
                self.rollback_collections(&workspace);
                Err(err.context("update collection"))
            }
        }
    }

    /// Deleting a collection releases its catalogs back to the ungrouped
    /// pool; the catalogs themselves are untouched.
    pub fn delete_collection(&mut self, collection: &CollectionId) -> Result<()> {
        let workspace = self.workspace_id()?;
        anyhow::ensure!(
            self.collections
                .collections
                .iter()
                .any(|c| &c.id == collection),
            "unknown collection {}",
            collection.as_str()
        );
        let before = self.collections.clone();

        self.collections.collections.retain(|c| &c.id != collection);
        self.collections.members.remove(collection);

        match self.backend.delete_collection(collection) {
            Ok(()) => {
                self.cache.set(
                    &workspace,
                    CachePayload::Collections(self.collections.clone()),
                );
                self.reconcile_collections(&workspace);
                Ok(())
            }
            Err(err) => {
                self.collections = before;
                self.rollback_collections(&workspace);
                Err(err.context("delete collection"))
            }
        }
    }
}
