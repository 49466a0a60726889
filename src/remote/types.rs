//! DTOs and payload types for remote API requests/responses.
//!
//! Tag lists cross the wire as JSON-encoded strings; they are decoded into
//! typed `Vec<String>` here and nowhere else.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Catalog, CatalogId, Collection, CollectionId, Variation, VariationId, WorkspaceId};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub catalogs_created: u64,
    pub catalogs_updated: u64,
    pub variations_created: u64,
    pub variations_updated: u64,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub resources_created: u64,
    pub resources_updated: u64,
    pub resources_deleted: u64,
}

#[derive(Clone, Debug)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct CollectionPatch {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PublishOptions {
    pub version_tag: Option<String>,
    pub overwrite_variation_id: Option<VariationId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub variation_id: VariationId,
    pub catalog_id: CatalogId,
    pub content_hash: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PullReceipt {
    pub path: String,
    pub overwritten: bool,
}

pub(super) fn encode_tags(tags: &[String]) -> Result<Option<String>> {
    if tags.is_empty() {
        return Ok(None);
    }
    let encoded = serde_json::to_string(tags).context("encode tags")?;
    Ok(Some(encoded))
}

pub(super) fn decode_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    // Malformed tag strings degrade to no tags rather than failing the read.
    serde_json::from_str(raw).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub(super) struct CatalogView {
    pub(super) id: CatalogId,
    pub(super) workspace_id: WorkspaceId,
    pub(super) name: String,

    #[serde(default)]
    pub(super) description: Option<String>,

    pub(super) artifact_type: String,

    #[serde(default)]
    pub(super) tags: Option<String>,

    pub(super) remote_path: String,
}

impl CatalogView {
    pub(super) fn into_catalog(self) -> Catalog {
        let tags = decode_tags(self.tags.as_deref());
        Catalog {
            id: self.id,
            workspace_id: self.workspace_id,
            name: self.name,
            description: self.description,
            artifact_type: self.artifact_type,
            tags,
            remote_path: self.remote_path,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CatalogRecordView {
    #[serde(flatten)]
    pub(super) catalog: CatalogView,

    #[serde(default)]
    pub(super) variations: Vec<Variation>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CollectionView {
    pub(super) id: CollectionId,
    pub(super) workspace_id: WorkspaceId,
    pub(super) name: String,

    #[serde(default)]
    pub(super) description: Option<String>,

    #[serde(default)]
    pub(super) color: Option<String>,

    #[serde(default)]
    pub(super) tags: Option<String>,

    pub(super) order_index: i64,
    pub(super) created_at: String,
    pub(super) updated_at: String,
}

impl CollectionView {
    pub(super) fn into_collection(self) -> Collection {
        let tags = decode_tags(self.tags.as_deref());
        Collection {
            id: self.id,
            workspace_id: self.workspace_id,
            name: self.name,
            description: self.description,
            color: self.color,
            tags,
            order_index: self.order_index,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateCollectionRequest {
    pub(super) name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedCollectionResponse {
    pub(super) id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateCollectionRequest {
    pub(super) name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) tags: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) color: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CatalogIdsRequest {
    pub(super) catalog_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteCatalogsResponse {
    pub(super) deleted: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct ScanProjectRequest {
    pub(super) project_path: String,
}

#[derive(Debug, Serialize)]
pub(super) struct PublishResourceRequest {
    pub(super) workspace_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) version_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) overwrite_variation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PullVariationRequest {
    pub(super) project_id: String,
    pub(super) project_path: String,
    pub(super) overwrite: bool,
}

#[cfg(test)]
#[path = "../tests/remote/types_tests.rs"]
mod tests;
