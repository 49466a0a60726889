use super::*;

#[test]
fn empty_tags_encode_as_absent() {
    assert_eq!(encode_tags(&[]).expect("encode"), None);
}

#[test]
fn tags_round_trip_through_the_wire_form() {
    let tags = vec!["rust".to_string(), "cli".to_string()];
    let encoded = encode_tags(&tags).expect("encode").expect("non-empty");
    assert_eq!(decode_tags(Some(&encoded)), tags);
}

#[test]
fn absent_or_malformed_tag_strings_decode_to_empty() {
    assert!(decode_tags(None).is_empty());
    assert!(decode_tags(Some("not json")).is_empty());
    assert!(decode_tags(Some("{\"k\":1}")).is_empty());
}

#[test]
fn catalog_view_decodes_tags_into_typed_list() {
    let view: CatalogRecordView = serde_json::from_str(
        r#"{
            "id": "cat-1",
            "workspace_id": "ws-1",
            "name": "Sample",
            "artifact_type": "kit",
            "tags": "[\"rust\",\"cli\"]",
            "remote_path": "kits/sample.md",
            "variations": []
        }"#,
    )
    .expect("parse catalog record");

    let catalog = view.catalog.into_catalog();
    assert_eq!(catalog.tags, vec!["rust".to_string(), "cli".to_string()]);
}

#[test]
fn collection_view_tolerates_missing_optionals() {
    let view: CollectionView = serde_json::from_str(
        r#"{
            "id": "col-1",
            "workspace_id": "ws-1",
            "name": "Favorites",
            "order_index": 3,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#,
    )
    .expect("parse collection");

    let collection = view.into_collection();
    assert!(collection.tags.is_empty());
    assert!(collection.color.is_none());
    assert_eq!(collection.order_index, 3);
}
