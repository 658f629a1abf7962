//! `ogc:Function` encoding of Categorize / Interpolate / Recode transformations.
//!
//! Wire layout: `<ogc:Function name="Recode">`, then the argument (`ogc:PropertyName`, or a
//! nested `env` function), then the literals. The model stores steps in display order, which is
//! the reverse of wire order. `Categorize` carries one extra leading literal (the default
//! bucket); `Interpolate` carries a trailing method literal (`numeric` or `color`).

use roxmltree::Node;
use tracing::debug;

use super::value::{decode_value, encode_value};
use crate::models::{TransformItem, TransformKind, Transformation};
use crate::xml::{self, XmlElement};

/// Property name written when a transformation has no argument yet; servers reject an empty
/// `PropertyName`.
pub const EMPTY_PROPERTY_PLACEHOLDER: &str = " _am_ ";

const INTERPOLATE_NUMERIC: &str = "numeric";
const INTERPOLATE_COLOR: &str = "color";

/// Splits `env(name)` into `name`.
fn env_argument(name: &str) -> Option<&str> {
    let inner = name.trim().strip_prefix("env(")?.strip_suffix(')')?;
    Some(inner.trim())
}

pub fn encode_argument(name: &str) -> XmlElement {
    if let Some(arg) = env_argument(name) {
        return XmlElement::new("ogc:Function")
            .attr("name", "env")
            .child(XmlElement::with_text("ogc:Literal", arg));
    }
    let name = if name.is_empty() {
        EMPTY_PROPERTY_PLACEHOLDER
    } else {
        name
    };
    XmlElement::with_text("ogc:PropertyName", name)
}

fn interpolation_method(t: &Transformation) -> &'static str {
    let mut values = t.list.iter().filter_map(|i| i.value.as_ref()).peekable();
    if values.peek().is_some() && values.all(|v| v.as_number().is_some()) {
        INTERPOLATE_NUMERIC
    } else {
        INTERPOLATE_COLOR
    }
}

/// The literal sequence in wire order.
pub fn wire_literals(t: &Transformation) -> Vec<String> {
    let mut out = Vec::with_capacity(t.list.len() * 2 + 1);
    for item in t.list.iter().rev() {
        if let Some(literal) = &item.literal {
            out.push(literal.clone());
        }
        if let Some(value) = &item.value {
            out.push(encode_value(value));
        }
    }
    if t.kind == Some(TransformKind::Interpolate) {
        out.push(interpolation_method(t).to_string());
    }
    out
}

pub fn encode_transformation(t: &Transformation) -> XmlElement {
    let kind = t.kind.unwrap_or(TransformKind::Recode);
    let mut el = XmlElement::new("ogc:Function")
        .attr("name", kind.function_name())
        .child(encode_argument(&t.name));
    el.extend(
        wire_literals(t)
            .into_iter()
            .map(|lit| XmlElement::with_text("ogc:Literal", lit)),
    );
    el
}

fn decode_argument(function: Node<'_, '_>) -> Option<String> {
    if let Some(property) = xml::child(function, "PropertyName") {
        let name = xml::text_of(property).unwrap_or_default();
        if name == EMPTY_PROPERTY_PLACEHOLDER.trim() {
            return Some(String::new());
        }
        return Some(name);
    }
    let env = xml::function_child(function)?;
    if !env.attribute("name")?.eq_ignore_ascii_case("env") {
        return None;
    }
    let arg = xml::child_text(env, "Literal")?;
    Some(format!("env({arg})"))
}

/// Decodes an `ogc:Function` element. Returns `None` for unknown function names, a missing
/// argument, or a literal count that does not pair up.
pub fn decode_transformation(function: Node<'_, '_>) -> Option<Transformation> {
    let function_name = function.attribute("name")?;
    let Some(kind) = TransformKind::from_function_name(function_name) else {
        debug!(function = function_name, "unsupported function ignored");
        return None;
    };
    let name = decode_argument(function)?;
    let mut literals: Vec<String> = xml::children(function, "Literal")
        .into_iter()
        .map(|n| xml::text_of(n).unwrap_or_default())
        .collect();

    if kind == TransformKind::Interpolate
        && literals
            .last()
            .is_some_and(|l| l == INTERPOLATE_NUMERIC || l == INTERPOLATE_COLOR)
    {
        literals.pop();
    }

    let expect_odd = kind == TransformKind::Categorize;
    if (literals.len() % 2 == 1) != expect_odd {
        debug!(
            function = function_name,
            literals = literals.len(),
            "transformation literals do not pair up"
        );
        return None;
    }

    let mut rest = literals.as_slice();
    let mut list = Vec::with_capacity(rest.len() / 2 + 1);
    if expect_odd {
        let (first, tail) = rest.split_first()?;
        list.push(TransformItem {
            literal: None,
            value: Some(decode_value(first)),
        });
        rest = tail;
    }
    for pair in rest.chunks_exact(2) {
        list.push(TransformItem {
            literal: Some(pair[0].clone()),
            value: Some(decode_value(&pair[1])),
        });
    }
    list.reverse();

    Some(Transformation {
        name,
        kind: Some(kind),
        list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimension;

    fn parse_function(xml: &str) -> Option<Transformation> {
        let wrapped = format!(
            r#"<root xmlns:ogc="http://www.opengis.net/ogc">{xml}</root>"#
        );
        let doc = roxmltree::Document::parse(&wrapped).unwrap();
        let f = doc.root_element().first_element_child().unwrap();
        decode_transformation(f)
    }

    #[test]
    fn recode_literals_are_written_in_reverse_display_order() {
        let t = Transformation {
            name: "type".to_string(),
            kind: Some(TransformKind::Recode),
            list: vec![
                TransformItem::new("b", "#00ff00"),
                TransformItem::new("a", "#ff0000"),
            ],
        };
        assert_eq!(
            encode_transformation(&t).to_xml_string(),
            concat!(
                r#"<ogc:Function name="Recode"><ogc:PropertyName>type</ogc:PropertyName>"#,
                "<ogc:Literal>a</ogc:Literal><ogc:Literal>#ff0000</ogc:Literal>",
                "<ogc:Literal>b</ogc:Literal><ogc:Literal>#00ff00</ogc:Literal>",
                "</ogc:Function>"
            )
        );
    }

    #[test]
    fn categorize_round_trips_with_default_bucket() {
        let t = Transformation {
            name: "pop".to_string(),
            kind: Some(TransformKind::Categorize),
            list: vec![
                TransformItem::new("1000", Dimension::px(6.0)),
                TransformItem::fallback(Dimension::px(2.0)),
            ],
        };
        assert_eq!(wire_literals(&t), vec!["2", "1000", "6"]);
        let xml = encode_transformation(&t).to_xml_string();
        assert_eq!(parse_function(&xml), Some(t));
    }

    #[test]
    fn interpolate_appends_method_and_strips_it_on_read() {
        let mut t = Transformation {
            name: "elevation".to_string(),
            kind: Some(TransformKind::Interpolate),
            list: vec![
                TransformItem::new("100", "#ffffff"),
                TransformItem::new("0", "#000000"),
            ],
        };
        assert_eq!(wire_literals(&t).last().map(String::as_str), Some("color"));
        let xml = encode_transformation(&t).to_xml_string();
        assert_eq!(parse_function(&xml), Some(t.clone()));

        t.list = vec![
            TransformItem::new("100", Dimension::px(8.0)),
            TransformItem::new("0", Dimension::px(1.0)),
        ];
        assert_eq!(wire_literals(&t).last().map(String::as_str), Some("numeric"));
    }

    #[test]
    fn env_argument_uses_nested_function() {
        let t = Transformation {
            name: "env(color)".to_string(),
            kind: Some(TransformKind::Recode),
            list: vec![TransformItem::new("a", "#ff0000")],
        };
        let xml = encode_transformation(&t).to_xml_string();
        assert!(xml.contains(
            r#"<ogc:Function name="env"><ogc:Literal>color</ogc:Literal></ogc:Function>"#
        ));
        assert_eq!(parse_function(&xml), Some(t));
    }

    #[test]
    fn empty_argument_uses_placeholder() {
        let t = Transformation {
            name: String::new(),
            kind: None,
            list: Vec::new(),
        };
        let xml = encode_transformation(&t).to_xml_string();
        assert_eq!(
            xml,
            r#"<ogc:Function name="Recode"><ogc:PropertyName> _am_ </ogc:PropertyName></ogc:Function>"#
        );
        let back = parse_function(&xml).unwrap();
        assert_eq!(back.name, "");
        assert_eq!(back.kind, Some(TransformKind::Recode));
    }

    #[test]
    fn unpaired_or_unknown_functions_are_rejected() {
        assert_eq!(
            parse_function(
                r#"<ogc:Function name="Recode"><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>x</ogc:Literal></ogc:Function>"#
            ),
            None
        );
        assert_eq!(
            parse_function(
                r#"<ogc:Function name="Categorize"><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>x</ogc:Literal><ogc:Literal>y</ogc:Literal></ogc:Function>"#
            ),
            None
        );
        assert_eq!(
            parse_function(
                r#"<ogc:Function name="strConcat"><ogc:PropertyName>a</ogc:PropertyName></ogc:Function>"#
            ),
            None
        );
    }

    #[test]
    fn interpolate_parity_ignores_the_method_marker() {
        let function = |literals: &[&str]| {
            let body: String = literals
                .iter()
                .map(|l| format!("<ogc:Literal>{l}</ogc:Literal>"))
                .collect();
            format!(
                r#"<ogc:Function name="Interpolate"><ogc:PropertyName>h</ogc:PropertyName>{body}</ogc:Function>"#
            )
        };
        assert_eq!(parse_function(&function(&["0", "1", "10", "numeric"])), None);
        assert_eq!(parse_function(&function(&["0", "1", "10"])), None);
        assert_eq!(parse_function(&function(&["color"])).map(|t| t.list.len()), Some(0));

        let paired = parse_function(&function(&["0", "1", "10", "5", "numeric"])).unwrap();
        assert_eq!(paired.list.len(), 2);
        let unmarked = parse_function(&function(&["0", "1", "10", "5"])).unwrap();
        assert_eq!(unmarked, paired);
    }
}
