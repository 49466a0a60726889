//! One method per remote operation, mapped onto the Library HTTP API.

use super::*;

impl LibraryBackend for RemoteClient {
    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        with_retries("list workspaces", || {
            let resp = self
                .client
                .get(self.url("/workspaces"))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .timeout(READ_TIMEOUT)
                .send()
                .context("list workspaces request")?;
            let workspaces: Vec<Workspace> = self
                .ensure_ok(resp, "list workspaces")?
                .json()
                .context("parse workspaces")?;
            Ok(workspaces)
        })
    }

    fn list_catalogs(&self, workspace: &WorkspaceId) -> Result<Vec<CatalogWithVariations>> {
        with_retries("list catalogs", || {
            let resp = self
                .client
                .get(self.url(&format!("/workspaces/{}/catalogs", workspace.as_str())))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .timeout(READ_TIMEOUT)
                .send()
                .context("list catalogs request")?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                anyhow::bail!("workspace not found");
            }

            let records: Vec<CatalogRecordView> = self
                .ensure_ok(resp, "list catalogs")?
                .json()
                .context("parse catalogs")?;
            Ok(records
                .into_iter()
                .map(|record| CatalogWithVariations {
                    catalog: record.catalog.into_catalog(),
                    variations: record.variations,
                })
                .collect())
        })
    }

    fn sync_workspace_catalog(&self, workspace: &WorkspaceId) -> Result<SyncReport> {
        let resp = self
            .client
            .post(self.url(&format!("/workspaces/{}/sync", workspace.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(SYNC_TIMEOUT)
            .send()
            .context("sync workspace request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("workspace not found");
        }

        let report: SyncReport = self
            .ensure_ok(resp, "sync workspace")?
            .json()
            .context("parse sync report")?;
        Ok(report)
    }

    fn get_collections(&self, workspace: &WorkspaceId) -> Result<Vec<Collection>> {
        with_retries("get collections", || {
            let resp = self
                .client
                .get(self.url(&format!("/workspaces/{}/collections", workspace.as_str())))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .timeout(READ_TIMEOUT)
                .send()
                .context("get collections request")?;
            let views: Vec<CollectionView> = self
                .ensure_ok(resp, "get collections")?
                .json()
                .context("parse collections")?;
            Ok(views.into_iter().map(CollectionView::into_collection).collect())
        })
    }

    fn get_collection_catalog_ids(&self, collection: &CollectionId) -> Result<Vec<CatalogId>> {
        with_retries("get collection catalogs", || {
            let resp = self
                .client
                .get(self.url(&format!("/collections/{}/catalogs", collection.as_str())))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .timeout(READ_TIMEOUT)
                .send()
                .context("get collection catalogs request")?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                anyhow::bail!("collection not found");
            }

            let ids: Vec<String> = self
                .ensure_ok(resp, "get collection catalogs")?
                .json()
                .context("parse collection catalog ids")?;
            Ok(ids.into_iter().map(CatalogId).collect())
        })
    }

    fn create_collection(
        &self,
        workspace: &WorkspaceId,
        req: &NewCollection,
    ) -> Result<CollectionId> {
        let resp = self
            .client
            .post(self.url(&format!("/workspaces/{}/collections", workspace.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .json(&CreateCollectionRequest {
                name: req.name.clone(),
                description: req.description.clone(),
                tags: encode_tags(&req.tags)?,
            })
            .send()
            .context("create collection request")?;

        let resp = self.ensure_ok(resp, "create collection")?;
        let created: CreatedCollectionResponse =
            resp.json().context("parse create collection response")?;
        Ok(CollectionId(created.id))
    }

    fn add_catalogs_to_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("/collections/{}/catalogs", collection.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .json(&CatalogIdsRequest {
                catalog_ids: catalog_ids.iter().map(|id| id.0.clone()).collect(),
            })
            .send()
            .context("add catalogs request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("collection not found");
        }

        let _ = self.ensure_ok(resp, "add catalogs to collection")?;
        Ok(())
    }

    fn remove_catalogs_from_collection(
        &self,
        collection: &CollectionId,
        catalog_ids: &[CatalogId],
    ) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!(
                "/collections/{}/catalogs/remove",
                collection.as_str()
            )))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .json(&CatalogIdsRequest {
                catalog_ids: catalog_ids.iter().map(|id| id.0.clone()).collect(),
            })
            .send()
            .context("remove catalogs request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("collection not found");
        }

        let _ = self.ensure_ok(resp, "remove catalogs from collection")?;
        Ok(())
    }

    fn update_collection(&self, collection: &CollectionId, patch: &CollectionPatch) -> Result<()> {
        let resp = self
            .client
            .put(self.url(&format!("/collections/{}", collection.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .json(&UpdateCollectionRequest {
                name: patch.name.clone(),
                description: patch.description.clone(),
                tags: encode_tags(&patch.tags)?,
                color: patch.color.clone(),
            })
            .send()
            .context("update collection request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("collection not found");
        }

        let _ = self.ensure_ok(resp, "update collection")?;
        Ok(())
    }

    fn delete_collection(&self, collection: &CollectionId) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/collections/{}", collection.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .send()
            .context("delete collection request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("collection not found");
        }

        let _ = self.ensure_ok(resp, "delete collection")?;
        Ok(())
    }

    fn delete_catalogs(&self, catalog_ids: &[CatalogId]) -> Result<u64> {
        let resp = self
            .client
            .post(self.url("/catalogs/delete"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(WRITE_TIMEOUT)
            .json(&CatalogIdsRequest {
                catalog_ids: catalog_ids.iter().map(|id| id.0.clone()).collect(),
            })
            .send()
            .context("delete catalogs request")?;

        let resp = self.ensure_ok(resp, "delete catalogs")?;
        let deleted: DeleteCatalogsResponse =
            resp.json().context("parse delete catalogs response")?;
        Ok(deleted.deleted)
    }

    fn scan_project_resources(
        &self,
        project: &ProjectId,
        project_path: &str,
    ) -> Result<ScanReport> {
        let resp = self
            .client
            .post(self.url(&format!("/projects/{}/scan", project.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(TRANSFER_TIMEOUT)
            .json(&ScanProjectRequest {
                project_path: project_path.to_string(),
            })
            .send()
            .context("scan project request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("project not found");
        }

        let report: ScanReport = self
            .ensure_ok(resp, "scan project")?
            .json()
            .context("parse scan report")?;
        Ok(report)
    }

    fn get_project_resources(&self, project: &ProjectId) -> Result<Vec<LocalResource>> {
        with_retries("get project resources", || {
            let resp = self
                .client
                .get(self.url(&format!("/projects/{}/resources", project.as_str())))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .timeout(READ_TIMEOUT)
                .send()
                .context("get project resources request")?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                anyhow::bail!("project not found");
            }

            let resources: Vec<LocalResource> = self
                .ensure_ok(resp, "get project resources")?
                .json()
                .context("parse project resources")?;
            Ok(resources)
        })
    }

    fn publish_resource(
        &self,
        resource: &ResourceId,
        workspace: &WorkspaceId,
        opts: &PublishOptions,
    ) -> Result<PublishReceipt> {
        let resp = self
            .client
            .post(self.url(&format!("/resources/{}/publish", resource.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(TRANSFER_TIMEOUT)
            .json(&PublishResourceRequest {
                workspace_id: workspace.0.clone(),
                version_tag: opts.version_tag.clone(),
                overwrite_variation_id: opts.overwrite_variation_id.as_ref().map(|id| id.0.clone()),
            })
            .send()
            .context("publish resource request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("resource not found on remote (re-scan the project and retry)");
        }

        let receipt: PublishReceipt = self
            .ensure_ok(resp, "publish resource")?
            .json()
            .context("parse publish receipt")?;
        Ok(receipt)
    }

    fn pull_variation(
        &self,
        variation: &VariationId,
        project: &ProjectId,
        project_path: &str,
        overwrite: bool,
    ) -> Result<PullReceipt> {
        let resp = self
            .client
            .post(self.url(&format!("/variations/{}/pull", variation.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .timeout(TRANSFER_TIMEOUT)
            .json(&PullVariationRequest {
                project_id: project.0.clone(),
                project_path: project_path.to_string(),
                overwrite,
            })
            .send()
            .context("pull variation request")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("variation not found");
        }

        let receipt: PullReceipt = self
            .ensure_ok(resp, "pull variation")?
            .json()
            .context("parse pull receipt")?;
        Ok(receipt)
    }
}
