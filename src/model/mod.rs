mod catalog;
mod collection;
mod ids;
mod resource;

pub use self::catalog::{Catalog, CatalogWithVariations, Variation, Workspace, version_label};
pub use self::collection::{Collection, next_order_index};
pub use self::ids::{CatalogId, CollectionId, ProjectId, ResourceId, VariationId, WorkspaceId};
pub use self::resource::{LocalResource, hash_bytes, now_rfc3339};
