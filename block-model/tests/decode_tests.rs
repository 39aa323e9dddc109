use block_model::{AnalysisDocument, BlockType, EntityType, RelationshipType, SelectionStatus};

const SAMPLE: &str = r#"{
  "DocumentMetadata": { "Pages": 1 },
  "Blocks": [
    { "BlockType": "PAGE", "Id": "p1", "Relationships": [{ "Type": "CHILD", "Ids": ["l1"] }] },
    { "BlockType": "LINE", "Id": "l1", "Text": "Name: John Doe", "Confidence": 99.1, "Page": 1 },
    { "BlockType": "WORD", "Id": "w1", "Text": "Name:" },
    { "BlockType": "SELECTION_ELEMENT", "Id": "s1", "SelectionStatus": "NOT_SELECTED" },
    {
      "BlockType": "KEY_VALUE_SET",
      "Id": "k1",
      "EntityTypes": ["KEY"],
      "Relationships": [
        { "Type": "VALUE", "Ids": ["v1"] },
        { "Type": "CHILD", "Ids": ["w1"] }
      ]
    },
    { "BlockType": "KEY_VALUE_SET", "Id": "v1", "EntityTypes": ["VALUE"] },
    { "BlockType": "QUERY", "Id": "q1", "Relationships": [{ "Type": "ANSWER", "Ids": [] }] }
  ]
}"#;

#[test]
fn decodes_engine_response() {
    let doc = AnalysisDocument::from_slice(SAMPLE.as_bytes()).expect("sample decodes");

    assert_eq!(doc.document_metadata.map(|m| m.pages), Some(1));
    assert_eq!(doc.blocks.len(), 7);

    let line = &doc.blocks[1];
    assert_eq!(line.block_type, BlockType::Line);
    assert_eq!(line.text.as_deref(), Some("Name: John Doe"));
    assert_eq!(line.page, Some(1));

    let mark = &doc.blocks[3];
    assert_eq!(mark.selection_status, Some(SelectionStatus::NotSelected));
    assert!(!mark.is_selected());

    let key = &doc.blocks[4];
    assert!(key.is_key());
    assert!(!key.is_value());
    assert_eq!(key.entity_types, vec![EntityType::Key]);
    let value_ids: Vec<&str> = key
        .relationships_of(RelationshipType::Value)
        .flat_map(|r| r.ids.iter().map(String::as_str))
        .collect();
    assert_eq!(value_ids, ["v1"]);

    assert!(doc.blocks[5].is_value());
}

#[test]
fn unknown_tags_fall_back_to_other() {
    let doc = AnalysisDocument::from_slice(SAMPLE.as_bytes()).expect("sample decodes");
    let query = &doc.blocks[6];
    assert_eq!(query.block_type, BlockType::Other);
    assert_eq!(query.relationships[0].kind, RelationshipType::Other);
    assert!(!query.is_key());
    assert!(!query.is_value());
}

#[test]
fn unknown_selection_status_is_not_selected() {
    let raw = br#"{ "Blocks": [
        { "BlockType": "SELECTION_ELEMENT", "Id": "s", "SelectionStatus": "PARTIALLY_SELECTED" }
    ] }"#;
    let doc = AnalysisDocument::from_slice(raw).expect("unknown status decodes");
    assert_eq!(doc.blocks[0].selection_status, Some(SelectionStatus::Other));
    assert!(!doc.blocks[0].is_selected());
}

#[test]
fn key_value_set_without_roles_is_a_value() {
    let json = r#"{ "Blocks": [{ "BlockType": "KEY_VALUE_SET", "Id": "v" }] }"#;
    let doc = AnalysisDocument::from_slice(json.as_bytes()).expect("decodes");
    assert!(doc.blocks[0].is_value());
    assert!(!doc.blocks[0].has_relationship(RelationshipType::Child));
}

#[test]
fn missing_blocks_field_is_rejected() {
    let err = AnalysisDocument::from_slice(br#"{ "DocumentMetadata": { "Pages": 2 } }"#);
    assert!(err.is_err());
}

#[test]
fn builders_serialize_in_engine_shape() {
    let key = block_model::Block::key("k1").with_values(["v1"]).with_children(["w1", "w2"]);
    let json = serde_json::to_value(&key).expect("serializes");
    assert_eq!(json["BlockType"], "KEY_VALUE_SET");
    assert_eq!(json["EntityTypes"][0], "KEY");
    assert_eq!(json["Relationships"][0]["Type"], "VALUE");
    assert_eq!(json["Relationships"][1]["Ids"][1], "w2");
    assert!(json.get("Text").is_none());
}
