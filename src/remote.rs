//! The remote Library backend: the request/response contract the client
//! consumes, and its HTTP implementation.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::{
    CatalogId, CatalogWithVariations, Collection, CollectionId, LocalResource, ProjectId,
    ResourceId, VariationId, Workspace, WorkspaceId,
};

mod http_client;
use self::http_client::with_retries;

mod types;
pub use self::types::*;

mod operations;

// Operation weights per call class; a timed-out call is treated exactly like
// an authoritative failure.
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(30);
const SYNC_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the Library server offers, as seen from this client. Each
/// operation either succeeds with a typed result or fails with a
/// descriptive error; no other side channel exists.
pub trait LibraryBackend {
    fn list_workspaces(&self) -> Result<Vec<Workspace>>;

    fn list_catalogs(&self, workspace: &WorkspaceId) -> Result<Vec<CatalogWithVariations>>;

    /// Refresh the remote catalog from its backing repository. The only
    /// operation with no local approximation.
    fn sync_workspace_catalog(&self, workspace: &WorkspaceId) -> Result<SyncReport>;

    fn get_collections(&self, workspace: &WorkspaceId) -> Result<Vec<Collection>>;

    fn get_collection_catalog_ids(&self, collection: &CollectionId) -> Result<Vec<CatalogId>>;

    /// The server assigns the collection id; optimistic placeholders are
    /// never sent.
    fn create_collection(
        &self,
        workspace: &WorkspaceId,
        req: &NewCollection,
    ) -> Result<CollectionId>;

    fn add_catalogs_to_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()>;

    fn remove_catalogs_from_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()>;

    fn update_collection(&self, collection: &CollectionId, patch: &CollectionPatch) -> Result<()>;

    fn delete_collection(&self, collection: &CollectionId) -> Result<()>;

    fn delete_catalogs(&self, catalog_ids: &[CatalogId]) -> Result<u64>;

    fn scan_project_resources(&self, project: &ProjectId, project_path: &str)
    -> Result<ScanReport>;

    fn get_project_resources(&self, project: &ProjectId) -> Result<Vec<LocalResource>>;

    fn publish_resource(
        &self,
        resource: &ResourceId,
        workspace: &WorkspaceId,
        opts: &PublishOptions,
    ) -> Result<PublishReceipt>;

    fn pull_variation(
        &self,
        variation: &VariationId,
        project: &ProjectId,
        project_path: &str,
        overwrite: bool,
    ) -> Result<PullReceipt>;
}

pub struct RemoteClient {
    base_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("bluekit")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
