//! Time-bounded cache of remote-derived state, keyed per workspace and
//! entity kind.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::{CatalogId, CatalogWithVariations, Collection, CollectionId, WorkspaceId};

pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Catalogs,
    Collections,
}

/// The ordered collection list and its membership map, captured together so
/// neither can go stale against the other.
#[derive(Clone, Debug, Default)]
pub struct CollectionsSnapshot {
    pub collections: Vec<Collection>,
    pub members: HashMap<CollectionId, Vec<CatalogId>>,
}

#[derive(Clone, Debug)]
pub enum CachePayload {
    Catalogs(Vec<CatalogWithVariations>),
    Collections(CollectionsSnapshot),
}

impl CachePayload {
    pub fn kind(&self) -> CacheKind {
        match self {
            CachePayload::Catalogs(_) => CacheKind::Catalogs,
            CachePayload::Collections(_) => CacheKind::Collections,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    payload: CachePayload,
    captured_at: Instant,
}

/// Per-workspace snapshots with a fixed validity window. Entries are bounded
/// by workspace count, so there is no eviction.
#[derive(Debug)]
pub struct LibraryCache {
    ttl: Duration,
    entries: HashMap<(WorkspaceId, CacheKind), CacheEntry>,
}

impl Default for LibraryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the payload only while it is younger than the TTL. An expired
    /// entry is ignored, not deleted, so a later `set` supersedes it.
    pub fn get(&self, workspace: &WorkspaceId, kind: CacheKind) -> Option<&CachePayload> {
        let entry = self.entries.get(&(workspace.clone(), kind))?;
        if entry.captured_at.elapsed() < self.ttl {
            Some(&entry.payload)
        } else {
            None
        }
    }

    pub fn set(&mut self, workspace: &WorkspaceId, payload: CachePayload) {
        let kind = payload.kind();
        self.entries.insert(
            (workspace.clone(), kind),
            CacheEntry {
                payload,
                captured_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&mut self, workspace: &WorkspaceId, kind: CacheKind) {
        self.entries.remove(&(workspace.clone(), kind));
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn catalogs(&self, workspace: &WorkspaceId) -> Option<&[CatalogWithVariations]> {
        match self.get(workspace, CacheKind::Catalogs)? {
            CachePayload::Catalogs(catalogs) => Some(catalogs),
            CachePayload::Collections(_) => None,
        }
    }

    pub fn collections(&self, workspace: &WorkspaceId) -> Option<&CollectionsSnapshot> {
        match self.get(workspace, CacheKind::Collections)? {
            CachePayload::Collections(snapshot) => Some(snapshot),
            CachePayload::Catalogs(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
