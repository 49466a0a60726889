use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, ResourceId};

/// A file indexed in a local project, independent of any catalog until
/// published.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalResource {
    pub id: ResourceId,
    pub project_id: ProjectId,
    pub file_name: String,
    pub relative_path: String,
    pub content_hash: String,
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn now_rfc3339() -> Result<String> {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("format time")
}

#[cfg(test)]
#[path = "../tests/model/resource_tests.rs"]
mod tests;
