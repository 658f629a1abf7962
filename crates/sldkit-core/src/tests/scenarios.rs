use super::{entities, without_ids};
use crate::*;
use serde_json::json;

fn roads() -> Vec<Entity> {
    entities(json!([
        {
            "type": "layer",
            "id": "r1",
            "label": "roads",
            "rule": [
                {
                    "_": "LineSymbolizer",
                    "stroke": "#ff0000",
                    "stroke-width": { "number": 2, "unit": "px" }
                }
            ],
            "filters": {
                "type": "group",
                "operator": "AND",
                "rules": [
                    { "type": "input", "operator": "==", "param": "type", "value": "highway" }
                ]
            }
        }
    ]))
}

#[test]
fn assemble_roads_rule() {
    let engine = Engine::new();
    let docs = engine.assemble_document(&roads(), &AssembleOptions::default());
    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[""],
        concat!(
            r#"<?xml version="1.0" encoding="ISO-8859-1" standalone="no"?>"#,
            r#"<StyledLayerDescriptor version="1.0.0" xmlns="http://www.opengis.net/sld" "#,
            r#"xmlns:ogc="http://www.opengis.net/ogc" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:gml="http://www.opengis.net/gml">"#,
            "<NamedLayer><UserStyle><FeatureTypeStyle><Name>_</Name>",
            "<Rule><Name>roads</Name>",
            "<ogc:Filter><ogc:PropertyIsEqualTo>",
            "<ogc:PropertyName>type</ogc:PropertyName><ogc:Literal>highway</ogc:Literal>",
            "</ogc:PropertyIsEqualTo></ogc:Filter>",
            "<LineSymbolizer><Stroke>",
            r##"<CssParameter name="stroke">#ff0000</CssParameter>"##,
            r#"<CssParameter name="stroke-width">2</CssParameter>"#,
            "</Stroke></LineSymbolizer>",
            "</Rule></FeatureTypeStyle></UserStyle></NamedLayer></StyledLayerDescriptor>"
        )
    );
}

#[test]
fn parse_roads_rule_back() {
    let engine = Engine::new();
    let docs = engine.assemble_document(&roads(), &AssembleOptions::default());
    let parsed = engine.parse_document(&docs[""]).unwrap();

    assert_eq!(
        without_ids(&parsed),
        json!([
            {
                "type": "group",
                "label": "_",
                "rule": [{ "_": "FeatureTypeStyle", "label": "_" }]
            },
            {
                "type": "layer",
                "label": "roads",
                "general": [
                    { "name": "Name", "value": "roads" },
                    { "name": "Title" },
                    { "name": "Abstract" }
                ],
                "rule": [
                    {
                        "_": "LineSymbolizer",
                        "stroke": "#ff0000",
                        "stroke-width": { "number": 2.0, "unit": "px" }
                    }
                ],
                "scales": {},
                "filters": { "type": "input", "operator": "==", "param": "type", "value": "highway" }
            }
        ])
    );

    let group_id = parsed[0].id();
    assert_eq!(parsed[1].as_rule().unwrap().group_id.as_deref(), Some(group_id));
}

#[test]
fn symbolizers_without_whitelisted_keys_are_not_written() {
    let list = entities(json!([
        {
            "type": "layer",
            "label": "r",
            "rule": [
                { "_": "TextSymbolizer", "stroke": "#000000", "size": 4 },
                { "_": "PointSymbolizer", "mark-size": 4 },
                { "_": "PolygonSymbolizer", "fill": "#00ff00" }
            ]
        }
    ]));
    let docs = Engine::new().assemble_document(&list, &AssembleOptions::default());
    let xml = &docs[""];
    assert!(!xml.contains("TextSymbolizer"));
    assert!(!xml.contains("PointSymbolizer"));
    assert!(xml.contains(
        r##"<PolygonSymbolizer><Fill><CssParameter name="fill">#00ff00</CssParameter></Fill></PolygonSymbolizer>"##
    ));
}

#[test]
fn symbolizers_are_written_in_type_order() {
    let list = entities(json!([
        {
            "type": "layer",
            "label": "r",
            "rule": [
                { "_": "TextSymbolizer", "label": "name" },
                { "_": "PolygonSymbolizer", "fill": "#00ff00" },
                { "_": "PointSymbolizer", "wellknownname": "circle" },
                { "_": "LineSymbolizer", "stroke": "#000000" }
            ]
        }
    ]));
    let docs = Engine::new().assemble_document(&list, &AssembleOptions::default());
    let xml = &docs[""];
    let pos = |tag: &str| xml.find(tag).unwrap();
    assert!(pos("<PointSymbolizer>") < pos("<LineSymbolizer>"));
    assert!(pos("<LineSymbolizer>") < pos("<PolygonSymbolizer>"));
    assert!(pos("<PolygonSymbolizer>") < pos("<TextSymbolizer>"));
}

#[test]
fn rule_scales_title_and_abstract_are_written() {
    let list = entities(json!([
        {
            "type": "layer",
            "label": "r",
            "general": [
                { "name": "Name", "value": "Major roads" },
                { "name": "Title", "value": "Roads & highways" },
                { "name": "Abstract", "value": "" }
            ],
            "scales": { "minScaleDenominator": 68247.34, "maxScaleDenominator": 8735660.375 },
            "rule": [{ "_": "LineSymbolizer", "stroke": "#000000" }]
        }
    ]));
    let engine = Engine::new();
    let xml = engine.assemble_document(&list, &AssembleOptions::default())[""].clone();
    assert!(xml.contains(concat!(
        "<Rule><Name>Major roads</Name><Title>Roads &amp; highways</Title>",
        "<MinScaleDenominator>68247.34</MinScaleDenominator>",
        "<MaxScaleDenominator>8735660.375</MaxScaleDenominator><LineSymbolizer>"
    )));

    let parsed = engine.parse_document(&xml).unwrap();
    let rule = parsed[1].as_rule().unwrap();
    assert_eq!(rule.label, "Major roads");
    assert_eq!(rule.data.general_value("Title"), Some("Roads & highways"));
    assert_eq!(
        rule.data.scales,
        ScaleRange {
            min_scale_denominator: Some(68247.34),
            max_scale_denominator: Some(8735660.375),
            min_zoom: Some(6),
            max_zoom: Some(13),
        }
    );
}

#[test]
fn non_ascii_text_is_written_as_character_references() {
    let list = entities(json!([
        { "type": "layer", "label": "Straße", "rule": [{ "_": "LineSymbolizer", "stroke": "#000000" }] }
    ]));
    let engine = Engine::new();
    let xml = engine.assemble_document(&list, &AssembleOptions::default())[""].clone();
    assert!(xml.is_ascii());
    assert!(xml.contains("<Name>Stra&#223;e</Name>"));
    let parsed = engine.parse_document(&xml).unwrap();
    assert_eq!(parsed[1].as_rule().unwrap().label, "Straße");
}

#[test]
fn malformed_documents_parse_to_none() {
    let engine = Engine::new();
    assert!(engine.parse_document("<StyledLayerDescriptor>").is_none());
    assert!(engine.parse_document("not xml at all").is_none());
    assert!(
        engine
            .parse_document("<StyledLayerDescriptor><NamedLayer/></StyledLayerDescriptor>")
            .is_none()
    );
}

#[test]
fn try_parse_reports_the_missing_element() {
    let engine = Engine::new();
    let err = engine
        .try_parse_document("<StyledLayerDescriptor><NamedLayer/></StyledLayerDescriptor>")
        .unwrap_err();
    assert!(matches!(err, Error::MissingElement { element: "UserStyle" }));
    assert_eq!(
        err.to_string(),
        "Not an editable SLD document: missing <UserStyle>"
    );

    let err = engine.try_parse_document("<a><b></a>").unwrap_err();
    assert!(matches!(err, Error::Xml(_)));

    let err = engine.try_parse_document("<Other/>").unwrap_err();
    assert!(matches!(
        err,
        Error::MissingElement {
            element: "StyledLayerDescriptor"
        }
    ));
}

#[test]
fn strict_parse_options_surface_errors() {
    let engine = Engine::new();
    assert!(
        engine
            .parse_document_with("<a/>", ParseOptions::strict())
            .is_err()
    );
    assert!(
        engine
            .parse_document_with("<a/>", ParseOptions::lenient())
            .unwrap()
            .is_none()
    );
}

#[test]
fn editor_lists_skip_unsupported_symbolizers() {
    let engine = Engine::new();
    let list = engine
        .entities_from_json(json!([
            {
                "type": "layer",
                "label": "r",
                "rule": [
                    { "_": "RasterSymbolizer" },
                    { "_": "LineSymbolizer", "stroke": "#000000" }
                ]
            }
        ]))
        .unwrap();
    let rule = list[0].as_rule().unwrap();
    assert_eq!(rule.data.rule.len(), 1);
    assert_eq!(rule.data.rule[0].kind, SymbolizerKind::Line);

    let xml = engine.assemble_layer(&list, "").unwrap();
    assert!(xml.contains("<LineSymbolizer>"));
    assert!(!xml.contains("Raster"));
}
