//! In-memory Library backend with failure injection and call counters, plus
//! fixture builders shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, anyhow};

use bluekit::model::{
    Catalog, CatalogId, CatalogWithVariations, Collection, CollectionId, LocalResource, ProjectId,
    ResourceId, Variation, VariationId, Workspace, WorkspaceId,
};
use bluekit::remote::{
    CollectionPatch, LibraryBackend, NewCollection, PublishOptions, PublishReceipt, PullReceipt,
    ScanReport, SyncReport,
};
use bluekit::session::BrowseSession;

#[derive(Default)]
pub struct FakeState {
    pub workspaces: Vec<Workspace>,
    pub catalogs: HashMap<WorkspaceId, Vec<CatalogWithVariations>>,
    pub collections: HashMap<WorkspaceId, Vec<Collection>>,
    pub members: HashMap<CollectionId, Vec<CatalogId>>,
    pub resources: HashMap<ProjectId, Vec<LocalResource>>,
}

/// Flip a flag to make the matching operation fail until unset.
#[derive(Default)]
pub struct Failures {
    pub create_collection: bool,
    pub add_catalogs: bool,
    pub remove_catalogs: bool,
    pub update_collection: bool,
    pub delete_collection: bool,
    pub delete_catalogs: bool,
    pub get_collections: bool,
    pub list_catalogs: bool,
    pub sync: bool,
    pub publish_resources: Vec<ResourceId>,
    pub pull_variations: Vec<VariationId>,
}

#[derive(Default)]
pub struct Counters {
    pub list_catalogs: Cell<usize>,
    pub get_collections: Cell<usize>,
    pub scans: Cell<usize>,
    pub publishes: Cell<usize>,
    pub pulls: Cell<usize>,
}

#[derive(Default)]
struct FakeInner {
    state: RefCell<FakeState>,
    failures: RefCell<Failures>,
    counters: Counters,
    next_id: Cell<u64>,
}

/// Cloneable handle; the session owns one clone, the test keeps another.
#[derive(Clone, Default)]
pub struct FakeLibrary {
    inner: Rc<FakeInner>,
}

impl FakeLibrary {
    pub fn state(&self) -> RefMut<'_, FakeState> {
        self.inner.state.borrow_mut()
    }

    pub fn peek(&self) -> Ref<'_, FakeState> {
        self.inner.state.borrow()
    }

    pub fn failures(&self) -> RefMut<'_, Failures> {
        self.inner.failures.borrow_mut()
    }

    pub fn counters(&self) -> &Counters {
        &self.inner.counters
    }

    fn next_id(&self) -> u64 {
        let n = self.inner.next_id.get() + 1;
        self.inner.next_id.set(n);
        n
    }
}

impl LibraryBackend for FakeLibrary {
    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        Ok(self.peek().workspaces.clone())
    }

    fn list_catalogs(&self, workspace: &WorkspaceId) -> Result<Vec<CatalogWithVariations>> {
        if self.inner.failures.borrow().list_catalogs {
            return Err(anyhow!("backend unavailable"));
        }
        self.inner
            .counters
            .list_catalogs
            .set(self.inner.counters.list_catalogs.get() + 1);
        Ok(self
            .peek()
            .catalogs
            .get(workspace)
            .cloned()
            .unwrap_or_default())
    }

    fn sync_workspace_catalog(&self, _workspace: &WorkspaceId) -> Result<SyncReport> {
        if self.inner.failures.borrow().sync {
            return Err(anyhow!("sync failed"));
        }
        Ok(SyncReport {
            catalogs_created: 1,
            catalogs_updated: 0,
            variations_created: 1,
            variations_updated: 0,
        })
    }

    fn get_collections(&self, workspace: &WorkspaceId) -> Result<Vec<Collection>> {
        if self.inner.failures.borrow().get_collections {
            return Err(anyhow!("backend unavailable"));
        }
        self.inner
            .counters
            .get_collections
            .set(self.inner.counters.get_collections.get() + 1);
        Ok(self
            .peek()
            .collections
            .get(workspace)
            .cloned()
            .unwrap_or_default())
    }

    fn get_collection_catalog_ids(&self, collection: &CollectionId) -> Result<Vec<CatalogId>> {
        Ok(self
            .peek()
            .members
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn create_collection(
        &self,
        workspace: &WorkspaceId,
        req: &NewCollection,
    ) -> Result<CollectionId> {
        if self.inner.failures.borrow().create_collection {
            return Err(anyhow!("backend rejected create collection"));
        }
        let n = self.next_id();
        let id = CollectionId(format!("srv-{n}"));
        let mut state = self.state();
        let list = state.collections.entry(workspace.clone()).or_default();
        let order_index = list.iter().map(|c| c.order_index).max().map_or(0, |m| m + 1);
        list.push(Collection {
            id: id.clone(),
            workspace_id: workspace.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            color: None,
            tags: req.tags.clone(),
            order_index,
            created_at: format!("2024-05-{:02}T00:00:00Z", n.min(28)),
            updated_at: format!("2024-05-{:02}T00:00:00Z", n.min(28)),
        });
        state.members.insert(id.clone(), Vec::new());
        Ok(id)
    }

    fn add_catalogs_to_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        if self.inner.failures.borrow().add_catalogs {
            return Err(anyhow!("backend rejected add catalogs"));
        }
        let mut state = self.state();
        let members = state.members.entry(collection.clone()).or_default();
        for id in catalog_ids {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }
        Ok(())
    }

    fn remove_catalogs_from_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        if self.inner.failures.borrow().remove_catalogs {
            return Err(anyhow!("backend rejected remove catalogs"));
        }
        let mut state = self.state();
        if let Some(members) = state.members.get_mut(collection) {
            members.retain(|id| !catalog_ids.contains(id));
        }
        Ok(())
    }

    fn update_collection(&self, collection: &CollectionId, patch: &CollectionPatch) -> Result<()> {
        if self.inner.failures.borrow().update_collection {
            return Err(anyhow!("backend rejected update collection"));
        }
        let mut state = self.state();
        for list in state.collections.values_mut() {
            if let Some(record) = list.iter_mut().find(|c| &c.id == collection) {
                record.name = patch.name.clone();
                record.description = patch.description.clone();
                record.tags = patch.tags.clone();
                record.color = patch.color.clone();
                return Ok(());
            }
        }
        Err(anyhow!("collection not found"))
    }

    fn delete_collection(&self, collection: &CollectionId) -> Result<()> {
        if self.inner.failures.borrow().delete_collection {
            return Err(anyhow!("backend rejected delete collection"));
        }
        let mut state = self.state();
        for list in state.collections.values_mut() {
            list.retain(|c| &c.id != collection);
        }
        state.members.remove(collection);
        Ok(())
    }

    fn delete_catalogs(&self, catalog_ids: &[CatalogId]) -> Result<u64> {
        if self.inner.failures.borrow().delete_catalogs {
            return Err(anyhow!("backend rejected delete catalogs"));
        }
        let mut state = self.state();
        let mut deleted = 0;
        for list in state.catalogs.values_mut() {
            let before = list.len();
            list.retain(|entry| !catalog_ids.contains(&entry.catalog.id));
            deleted += (before - list.len()) as u64;
        }
        for members in state.members.values_mut() {
            members.retain(|id| !catalog_ids.contains(id));
        }
        Ok(deleted)
    }

    fn scan_project_resources(
        &self,
        _project: &ProjectId,
        _project_path: &str,
    ) -> Result<ScanReport> {
        self.inner
            .counters
            .scans
            .set(self.inner.counters.scans.get() + 1);
        Ok(ScanReport::default())
    }

    fn get_project_resources(&self, project: &ProjectId) -> Result<Vec<LocalResource>> {
        Ok(self
            .peek()
            .resources
            .get(project)
            .cloned()
            .unwrap_or_default())
    }

    fn publish_resource(
        &self,
        resource: &ResourceId,
        _workspace: &WorkspaceId,
        _opts: &PublishOptions,
    ) -> Result<PublishReceipt> {
        if self
            .inner
            .failures
            .borrow()
            .publish_resources
            .contains(resource)
        {
            return Err(anyhow!("backend rejected publish"));
        }
        self.inner
            .counters
            .publishes
            .set(self.inner.counters.publishes.get() + 1);
        let n = self.next_id();
        Ok(PublishReceipt {
            variation_id: VariationId(format!("pub-{n}")),
            catalog_id: CatalogId(format!("cat-pub-{n}")),
            content_hash: format!("hash-pub-{n}"),
        })
    }

    fn pull_variation(
        &self,
        variation: &VariationId,
        _project: &ProjectId,
        project_path: &str,
        overwrite: bool,
    ) -> Result<PullReceipt> {
        if self
            .inner
            .failures
            .borrow()
            .pull_variations
            .contains(variation)
        {
            return Err(anyhow!("backend rejected pull"));
        }
        self.inner
            .counters
            .pulls
            .set(self.inner.counters.pulls.get() + 1);
        Ok(PullReceipt {
            path: format!("{project_path}/{}", variation.as_str()),
            overwritten: overwrite,
        })
    }
}

pub fn workspace(id: &str) -> Workspace {
    Workspace {
        id: WorkspaceId(id.to_string()),
        name: format!("{id} library"),
        owner: "acme".to_string(),
        repo: format!("{id}-content"),
        pinned: false,
    }
}

pub fn catalog_entry(ws: &str, id: &str, name: &str, variations: usize) -> CatalogWithVariations {
    let catalog = Catalog {
        id: CatalogId(id.to_string()),
        workspace_id: WorkspaceId(ws.to_string()),
        name: name.to_string(),
        description: None,
        artifact_type: "kit".to_string(),
        tags: Vec::new(),
        remote_path: format!("kits/{name}.md"),
    };
    let variations = (0..variations)
        .map(|i| Variation {
            id: VariationId(format!("{id}-v{}", i + 1)),
            catalog_id: catalog.id.clone(),
            workspace_id: catalog.workspace_id.clone(),
            remote_path: catalog.remote_path.clone(),
            content_hash: format!("hash-{id}-{}", i + 1),
            commit_ref: None,
            // i == 0 is the newest.
            published_at: format!("2024-{:02}-01T00:00:00Z", 9 - i.min(8)),
            publisher: Some("alice".to_string()),
            version_tag: None,
        })
        .collect();
    CatalogWithVariations {
        catalog,
        variations,
    }
}

pub fn collection_record(
    ws: &str,
    id: &str,
    name: &str,
    order_index: i64,
    created_at: &str,
) -> Collection {
    Collection {
        id: CollectionId(id.to_string()),
        workspace_id: WorkspaceId(ws.to_string()),
        name: name.to_string(),
        description: None,
        color: None,
        tags: Vec::new(),
        order_index,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

pub fn resource(project: &str, id: &str, file_name: &str, relative_path: &str) -> LocalResource {
    LocalResource {
        id: ResourceId(id.to_string()),
        project_id: ProjectId(project.to_string()),
        file_name: file_name.to_string(),
        relative_path: relative_path.to_string(),
        // Stand-in for hashing the file's bytes.
        content_hash: bluekit::model::hash_bytes(relative_path.as_bytes()),
    }
}

pub fn fake_with_workspace(ws: &str) -> FakeLibrary {
    let fake = FakeLibrary::default();
    {
        let mut state = fake.state();
        state.workspaces.push(workspace(ws));
        state.catalogs.insert(WorkspaceId(ws.to_string()), Vec::new());
        state
            .collections
            .insert(WorkspaceId(ws.to_string()), Vec::new());
    }
    fake
}

pub fn open_session(fake: &FakeLibrary, ws: &str) -> BrowseSession {
    let mut session = BrowseSession::new(Box::new(fake.clone()));
    session
        .open_workspace(workspace(ws))
        .expect("open workspace");
    session
}
