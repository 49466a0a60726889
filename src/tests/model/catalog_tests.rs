use super::*;

fn catalog(id: &str) -> Catalog {
    Catalog {
        id: CatalogId(id.to_string()),
        workspace_id: WorkspaceId("ws".to_string()),
        name: id.to_string(),
        description: None,
        artifact_type: "kit".to_string(),
        tags: Vec::new(),
        remote_path: format!("kits/{id}.md"),
    }
}

fn variation(id: &str, published_at: &str) -> Variation {
    Variation {
        id: VariationId(id.to_string()),
        catalog_id: CatalogId("cat".to_string()),
        workspace_id: WorkspaceId("ws".to_string()),
        remote_path: "kits/cat.md".to_string(),
        content_hash: format!("hash-{id}"),
        commit_ref: None,
        published_at: published_at.to_string(),
        publisher: None,
        version_tag: None,
    }
}

#[test]
fn variations_sort_newest_first() {
    let mut entry = CatalogWithVariations {
        catalog: catalog("cat"),
        variations: vec![
            variation("old", "2024-01-01T00:00:00Z"),
            variation("new", "2024-06-01T00:00:00Z"),
            variation("mid", "2024-03-01T00:00:00Z"),
        ],
    };
    entry.sort_variations();

    let order: Vec<&str> = entry.variations.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(order, vec!["new", "mid", "old"]);
    assert_eq!(entry.head_variation().map(|v| v.id.as_str()), Some("new"));
}

#[test]
fn version_labels_count_down_from_total() {
    assert_eq!(version_label(0, 3), "v3");
    assert_eq!(version_label(1, 3), "v2");
    assert_eq!(version_label(2, 3), "v1");
}

#[test]
fn version_label_of_sole_variation_is_v1() {
    assert_eq!(version_label(0, 1), "v1");
}
