use serde::{Deserialize, Serialize};

use super::ids::{CatalogId, VariationId, WorkspaceId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner: String,
    pub repo: String,

    #[serde(default)]
    pub pinned: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub id: CatalogId,
    pub workspace_id: WorkspaceId,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub artifact_type: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub remote_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variation {
    pub id: VariationId,
    pub catalog_id: CatalogId,
    pub workspace_id: WorkspaceId,
    pub remote_path: String,
    pub content_hash: String,

    #[serde(default)]
    pub commit_ref: Option<String>,

    pub published_at: String,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub version_tag: Option<String>,
}

/// A catalog together with its variations, newest first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogWithVariations {
    pub catalog: Catalog,
    pub variations: Vec<Variation>,
}

impl CatalogWithVariations {
    /// Published-at is RFC3339 UTC, so string order is chronological order.
    pub fn sort_variations(&mut self) {
        self.variations
            .sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }

    pub fn head_variation(&self) -> Option<&Variation> {
        self.variations.first()
    }
}

/// Display label for the variation at `position` in newest-first order.
/// The newest of `total` variations is `v{total}`, the oldest `v1`.
pub fn version_label(position: usize, total: usize) -> String {
    format!("v{}", total.saturating_sub(position))
}

#[cfg(test)]
#[path = "../tests/model/catalog_tests.rs"]
mod tests;
