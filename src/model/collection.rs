use serde::{Deserialize, Serialize};

use super::ids::{CollectionId, WorkspaceId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub workspace_id: WorkspaceId,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub order_index: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Order index for an optimistically inserted collection: one above the
/// current maximum, so it sorts last without a reload.
pub fn next_order_index(collections: &[Collection]) -> i64 {
    collections
        .iter()
        .map(|c| c.order_index)
        .max()
        .map_or(0, |max| max + 1)
}
