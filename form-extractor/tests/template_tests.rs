use block_model::Block;
use form_extractor::template::TemplateError;
use form_extractor::{line_texts, LineRule, LineTemplate, RuleTemplate, TemplateRecord, TemplateRegistry};

fn certificate_lines() -> Vec<Block> {
    [
        "REPUBLIC OF KENYA",
        "THE REGISTRATION OF BUSINESS NAMES ACT",
        "CERTIFICATE OF REGISTRATION",
        "BUSINESS NO. BN-2023-XYZ",
        "I hereby certify that",
        "has been registered as",
        "ACME TRADERS",
        "Given under my hand at NAIROBI on 12th March 2023",
    ]
    .iter()
    .enumerate()
    .map(|(i, t)| Block::line(format!("l{i}"), *t))
    .collect()
}

fn registration_template() -> RuleTemplate {
    RuleTemplate::list_from_json(
        br#"[{
            "document_type": "BUSINESS_REGISTRATION",
            "fields": [
                { "name": "business_no", "rule": "prefix", "anchor": "BUSINESS NO." },
                { "name": "business_name", "rule": "index", "index": 6 },
                { "name": "registration_date", "rule": "contains", "anchor": "Given under my hand at NAIROBI on" }
            ]
        }]"#,
    )
    .expect("template parses")
    .remove(0)
}

#[test]
fn line_texts_keep_collection_order_and_skip_other_blocks() {
    let blocks = vec![
        Block::line("a", "first"),
        Block::word("w", "word"),
        Block::new("b", block_model::BlockType::Line),
        Block::line("c", "third"),
    ];
    assert_eq!(line_texts(&blocks), ["first", "", "third"]);
}

#[test]
fn rule_template_extracts_by_anchor_and_position() {
    let blocks = certificate_lines();
    let lines = line_texts(&blocks);
    let record = registration_template().extract(&lines);

    assert_eq!(record.get("business_no"), Some("BN-2023-XYZ"));
    assert_eq!(record.get("business_name"), Some("ACME TRADERS"));
    assert_eq!(record.get("registration_date"), Some("12th March 2023"));
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"business_no":"BN-2023-XYZ","business_name":"ACME TRADERS","registration_date":"12th March 2023"}"#
    );
}

#[test]
fn unmatched_fields_are_null() {
    let lines = ["only one line"];
    let record = registration_template().extract(&lines);
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("business_no"), None);
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        serde_json::json!({ "business_no": null, "business_name": null, "registration_date": null })
    );
}

#[test]
fn anchor_with_nothing_after_it_is_absent() {
    let rule = LineRule::Prefix { anchor: "BUSINESS NO.".into() };
    assert_eq!(rule.apply(&["BUSINESS NO.  "]), None);
    let rule = LineRule::Contains { anchor: "signed on".into() };
    assert_eq!(rule.apply(&["Issued at NAIROBI", "signed on  3 May "]), Some("3 May".into()));
    assert_eq!(rule.apply(&["signed on"]), None);
    assert_eq!(LineRule::Index { index: 4 }.apply(&["a", "b"]), None);
}

#[test]
fn anchored_value_stops_at_the_next_anchor() {
    let rule = LineRule::Contains { anchor: "on ".into() };
    assert_eq!(rule.apply(&["signed on Monday on Tuesday"]), Some("Monday".into()));
    let rule = LineRule::Prefix { anchor: "NO. ".into() };
    assert_eq!(rule.apply(&["NO. 42 NO. 43"]), Some("42".into()));
    assert_eq!(rule.apply(&["NO. 42"]), Some("42".into()));
}

#[test]
fn record_set_replaces_in_place() {
    let mut record = TemplateRecord::new();
    record.set("b", Some("1".into()));
    record.set("a", None);
    record.set("b", Some("2".into()));
    assert_eq!(record.len(), 2);
    assert_eq!(record.field_names().collect::<Vec<_>>(), ["b", "a"]);
    assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"b":"2","a":null}"#);
}

#[test]
fn invalid_templates_are_rejected() {
    let dup = br#"[{ "document_type": "X", "fields": [
        { "name": "a", "rule": "index", "index": 0 },
        { "name": "a", "rule": "index", "index": 1 }
    ]}]"#;
    assert!(matches!(RuleTemplate::list_from_json(dup), Err(TemplateError::DuplicateField { .. })));

    let blank = br#"[{ "document_type": " ", "fields": [] }]"#;
    assert!(matches!(RuleTemplate::list_from_json(blank), Err(TemplateError::EmptyDocumentType)));

    let bad_rule = br#"[{ "document_type": "X", "fields": [{ "name": "a", "rule": "regex" }] }]"#;
    assert!(matches!(RuleTemplate::list_from_json(bad_rule), Err(TemplateError::Parse(_))));

    let no_anchor = br#"[{ "document_type": "X", "fields": [{ "name": "a", "rule": "contains", "anchor": "" }] }]"#;
    assert!(matches!(RuleTemplate::list_from_json(no_anchor), Err(TemplateError::EmptyAnchor { .. })));
}

struct FirstLine;

impl LineTemplate for FirstLine {
    fn document_type(&self) -> &str {
        "FIRST_LINE"
    }

    fn extract(&self, lines: &[&str]) -> TemplateRecord {
        let mut record = TemplateRecord::new();
        record.set("title", lines.first().map(|l| l.to_string()));
        record
    }
}

#[test]
fn registry_dispatches_by_label() {
    let mut registry = TemplateRegistry::new();
    assert!(registry.register(Box::new(registration_template())).is_none());
    assert!(registry.register(Box::new(FirstLine)).is_none());
    assert_eq!(registry.len(), 2);
    assert!(registry.get("UNKNOWN").is_none());

    let blocks = certificate_lines();
    let lines = line_texts(&blocks);
    let record = registry.get("FIRST_LINE").expect("registered").extract(&lines);
    assert_eq!(record.get("title"), Some("REPUBLIC OF KENYA"));

    let replaced = registry.register(Box::new(FirstLine));
    assert!(replaced.is_some());
    assert_eq!(registry.len(), 2);
}
