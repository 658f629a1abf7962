use super::entities;
use crate::*;
use serde_json::json;

fn two_layers() -> Vec<Entity> {
    entities(json!([
        {
            "type": "group",
            "id": "g",
            "label": "Roads",
            "rule": [{ "_": "FeatureTypeStyle", "label": "Roads", "sort-by": "rank A", "sort-by-group": "roads" }]
        },
        {
            "type": "layer",
            "id": "r1",
            "groupId": "g",
            "label": "primary",
            "name": "roads",
            "prefix": "topp",
            "rule": [{ "_": "LineSymbolizer", "stroke": "#ff0000" }]
        },
        {
            "type": "layer",
            "id": "r2",
            "label": "lakes",
            "name": "water",
            "rule": [{ "_": "PolygonSymbolizer", "fill": "#0000ff" }]
        },
        {
            "type": "layer",
            "id": "r3",
            "groupId": "g",
            "label": "secondary",
            "name": "roads",
            "prefix": "topp",
            "rule": [{ "_": "LineSymbolizer", "stroke": "#00ff00" }]
        }
    ]))
}

#[test]
fn one_document_per_layer_in_first_appearance_order() {
    let docs = Engine::new().assemble_document(&two_layers(), &AssembleOptions::default());
    assert_eq!(
        docs.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["topp~roads", "water"]
    );
    let roads = &docs["topp~roads"];
    assert!(roads.contains(
        "<NamedLayer><Name>topp~roads</Name><UserStyle><Name>topp~roads</Name><Title>topp~roads</Title><Abstract>topp~roads</Abstract>"
    ));
    let primary = roads.find("<Name>primary</Name>").unwrap();
    let secondary = roads.find("<Name>secondary</Name>").unwrap();
    assert!(primary < secondary);
    assert!(!roads.contains("lakes"));
}

#[test]
fn layer_filter_selects_one_document() {
    let engine = Engine::new();
    let docs = engine.assemble_document(&two_layers(), &AssembleOptions::default().layer("water"));
    assert_eq!(docs.len(), 1);
    assert!(docs["water"].contains("<Name>lakes</Name>"));

    let none = engine.assemble_document(&two_layers(), &AssembleOptions::default().layer("rivers"));
    assert!(none.is_empty());
}

#[test]
fn preview_replaces_one_rule_without_touching_the_list() {
    let list = two_layers();
    let mut edited = list[1].as_rule().unwrap().data.clone();
    edited.rule = vec![Symbolizer::new(SymbolizerKind::Line).with("stroke", "#123456")];
    edited.filters = Some(FilterNode::input(Comparator::Gte, "lanes", "4"));

    let engine = Engine::new();
    let docs = engine.assemble_document(
        &list,
        &AssembleOptions::default().layer("topp~roads").preview("r1", &edited),
    );
    let xml = &docs["topp~roads"];
    assert!(xml.contains("#123456"));
    assert!(!xml.contains("#ff0000"));
    assert!(xml.contains("<ogc:PropertyIsGreaterThanOrEqualTo>"));
    assert!(xml.contains("#00ff00"));

    let plain = engine.assemble_layer(&list, "topp~roads").unwrap();
    assert!(plain.contains("#ff0000"));
}

#[test]
fn sort_vendor_options_round_trip() {
    let engine = Engine::new();
    let xml = engine.assemble_layer(&two_layers(), "topp~roads").unwrap();
    assert!(xml.contains(concat!(
        "</Rule>",
        r#"<VendorOption name="sortBy">rank A</VendorOption>"#,
        r#"<VendorOption name="sortByGroup">roads</VendorOption>"#,
        "</FeatureTypeStyle>"
    )));

    let parsed = engine.parse_document(&xml).unwrap();
    let options = parsed[0].as_group().unwrap().options().unwrap();
    assert_eq!(options.sort_by.as_deref(), Some("rank A"));
    assert_eq!(options.sort_by_group.as_deref(), Some("roads"));

    let rule = parsed[1].as_rule().unwrap();
    assert_eq!(rule.prefix.as_deref(), Some("topp"));
    assert_eq!(rule.name.as_deref(), Some("roads"));
    assert_eq!(rule.layer_key(), "topp~roads");
}

#[test]
fn assembly_is_byte_deterministic() {
    let engine = Engine::new();
    let list = two_layers();
    let first = engine.assemble_document(&list, &AssembleOptions::default());
    for _ in 0..3 {
        assert_eq!(engine.assemble_document(&list, &AssembleOptions::default()), first);
    }
}

#[test]
fn parsed_entities_serialize_to_the_editor_shape() {
    let engine = Engine::new();
    let xml = engine.assemble_layer(&two_layers(), "water").unwrap();
    let parsed = engine.parse_document(&xml).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json[0]["type"], json!("group"));
    assert_eq!(json[0]["rule"][0]["_"], json!("FeatureTypeStyle"));
    assert_eq!(json[1]["type"], json!("layer"));
    assert_eq!(json[1]["groupId"], json[0]["id"]);
    assert_eq!(json[1]["rule"][0]["_"], json!("PolygonSymbolizer"));
    assert!(json[1]["rule"][0]["_id"].is_string());

    let back: Vec<Entity> = serde_json::from_value(json).unwrap();
    assert_eq!(back, parsed);
}
