//! Symbolizer ⇄ XML element builders.
//!
//! Each SLD block (`Fill`, `Stroke`, `Font`, `Graphic/Mark`) has one builder that reads the
//! parameters it owns (optionally under a graphic prefix) and returns `None` when none of them
//! is set. The per-type encoders compose those builders in schema order.

use roxmltree::Node;
use tracing::debug;

use super::transform::{decode_transformation, encode_transformation};
use super::value::{decode_value, encode_value};
use crate::models::{ParamValue, StyleValue, Symbolizer, SymbolizerKind};
use crate::params::{GraphicPrefix, Param, ParamKey};
use crate::xml::{self, XmlElement};

fn key(prefix: GraphicPrefix, param: Param) -> Option<ParamKey> {
    ParamKey::prefixed(prefix, param)
}

fn get(sym: &Symbolizer, prefix: GraphicPrefix, param: Param) -> Option<&ParamValue> {
    sym.get(key(prefix, param)?)
}

/// Content of a value-bearing element: text, or a nested function.
fn value_content(mut el: XmlElement, value: &ParamValue) -> XmlElement {
    match value {
        ParamValue::Value(v) => el.push_text(encode_value(v)),
        ParamValue::Transformation(t) => el.push(encode_transformation(t)),
    }
    el
}

fn css_parameter(sym: &Symbolizer, prefix: GraphicPrefix, param: Param) -> Option<XmlElement> {
    let value = get(sym, prefix, param)?;
    Some(value_content(
        XmlElement::new("CssParameter").attr("name", param.name()),
        value,
    ))
}

fn css_block(
    sym: &Symbolizer,
    tag: &str,
    prefix: GraphicPrefix,
    params: &[Param],
) -> Option<XmlElement> {
    let mut el = XmlElement::new(tag);
    el.extend(params.iter().filter_map(|p| css_parameter(sym, prefix, *p)));
    (!el.is_empty()).then_some(el)
}

pub fn fill(sym: &Symbolizer, prefix: GraphicPrefix) -> Option<XmlElement> {
    css_block(sym, "Fill", prefix, &Param::FILL)
}

pub fn stroke(sym: &Symbolizer, prefix: GraphicPrefix) -> Option<XmlElement> {
    css_block(sym, "Stroke", prefix, &Param::STROKE)
}

pub fn font(sym: &Symbolizer) -> Option<XmlElement> {
    css_block(sym, "Font", GraphicPrefix::None, &Param::FONT)
}

fn simple_element(
    sym: &Symbolizer,
    tag: &str,
    prefix: GraphicPrefix,
    param: Param,
) -> Option<XmlElement> {
    let value = get(sym, prefix, param)?;
    Some(value_content(XmlElement::new(tag), value))
}

/// `Graphic{Mark{WellKnownName, Fill, Stroke}, Size, Rotation}` from the parameters under
/// `prefix`; `None` when none of them is set.
pub fn graphic(sym: &Symbolizer, prefix: GraphicPrefix) -> Option<XmlElement> {
    let present = Param::ALL
        .into_iter()
        .filter(|p| p.is_graphic())
        .any(|p| get(sym, prefix, p).is_some());
    if !present {
        return None;
    }

    let mut mark = XmlElement::new("Mark");
    mark.push_opt(simple_element(sym, "WellKnownName", prefix, Param::WellKnownName));
    mark.push_opt(fill(sym, prefix));
    mark.push_opt(stroke(sym, prefix));

    let mut graphic = XmlElement::new("Graphic").child(mark);
    graphic.push_opt(simple_element(sym, "Size", prefix, Param::Size));
    graphic.push_opt(simple_element(sym, "Rotation", prefix, Param::Rotation));
    Some(graphic)
}

/// `Stroke/GraphicStroke` wrapper for marker lines.
pub fn graphic_stroke(graphic: XmlElement) -> XmlElement {
    XmlElement::new("Stroke").child(XmlElement::new("GraphicStroke").child(graphic))
}

/// `Fill/GraphicFill` wrapper for pattern fills.
pub fn graphic_fill(graphic: XmlElement) -> XmlElement {
    XmlElement::new("Fill").child(XmlElement::new("GraphicFill").child(graphic))
}

fn label(sym: &Symbolizer) -> Option<XmlElement> {
    let text = match get(sym, GraphicPrefix::None, Param::Label)? {
        ParamValue::Value(v) => encode_value(v),
        ParamValue::Transformation(t) => {
            debug!(property = %t.name, "label transformation written as its property name");
            t.name.clone()
        }
    };
    Some(XmlElement::new("Label").child(XmlElement::with_text("ogc:PropertyName", text)))
}

/// Encodes a symbolizer; `None` when none of its parameters has a place on the wire.
pub fn encode_symbolizer(sym: &Symbolizer) -> Option<XmlElement> {
    if !sym.has_params() {
        return None;
    }
    let mut el = XmlElement::new(sym.kind.tag());
    match sym.kind {
        SymbolizerKind::Point => {
            el.push_opt(graphic(sym, GraphicPrefix::None));
        }
        SymbolizerKind::Line => {
            el.push_opt(
                graphic(sym, GraphicPrefix::Mark)
                    .map(graphic_stroke)
                    .or_else(|| stroke(sym, GraphicPrefix::None)),
            );
            el.push_opt(simple_element(
                sym,
                "PerpendicularOffset",
                GraphicPrefix::None,
                Param::PerpendicularOffset,
            ));
        }
        SymbolizerKind::Polygon => {
            el.push_opt(
                graphic(sym, GraphicPrefix::Pattern)
                    .map(graphic_fill)
                    .or_else(|| fill(sym, GraphicPrefix::None)),
            );
            el.push_opt(
                graphic(sym, GraphicPrefix::Mark)
                    .map(graphic_stroke)
                    .or_else(|| stroke(sym, GraphicPrefix::None)),
            );
        }
        SymbolizerKind::Text => {
            el.push_opt(label(sym));
            el.push_opt(font(sym));
            el.push_opt(fill(sym, GraphicPrefix::None));
        }
    }
    (!el.is_empty()).then_some(el)
}

fn decode_content(node: Node<'_, '_>) -> Option<ParamValue> {
    if let Some(function) = xml::function_child(node) {
        return decode_transformation(function).map(ParamValue::Transformation);
    }
    xml::text_of(node).map(|t| ParamValue::Value(decode_value(&t)))
}

fn set(sym: &mut Symbolizer, prefix: GraphicPrefix, param: Param, value: ParamValue) {
    if let Some(key) = key(prefix, param) {
        if !sym.set(key, value) {
            debug!(symbolizer = sym.kind.tag(), key = %key, "parameter not allowed here");
        }
    }
}

fn decode_css(block: Option<Node<'_, '_>>, prefix: GraphicPrefix, sym: &mut Symbolizer) {
    let Some(block) = block else {
        return;
    };
    for css in xml::children(block, "CssParameter") {
        let Some(name) = css.attribute("name") else {
            continue;
        };
        let Some(param) = Param::from_name(name) else {
            debug!(parameter = name, "unknown CssParameter ignored");
            continue;
        };
        if let Some(value) = decode_content(css) {
            set(sym, prefix, param, value);
        }
    }
}

fn decode_simple(
    node: Option<Node<'_, '_>>,
    prefix: GraphicPrefix,
    param: Param,
    sym: &mut Symbolizer,
) {
    if let Some(value) = node.and_then(decode_content) {
        set(sym, prefix, param, value);
    }
}

/// Reads `parent/Graphic/{Mark,Size,Rotation}` into prefixed parameters.
fn decode_graphic(parent: Node<'_, '_>, prefix: GraphicPrefix, sym: &mut Symbolizer) {
    let Some(graphic) = xml::child(parent, "Graphic") else {
        return;
    };
    if let Some(mark) = xml::child(graphic, "Mark") {
        if let Some(name) = xml::child_text(mark, "WellKnownName") {
            set(
                sym,
                prefix,
                Param::WellKnownName,
                ParamValue::Value(StyleValue::Text(name)),
            );
        }
        decode_css(xml::child(mark, "Fill"), prefix, sym);
        decode_css(xml::child(mark, "Stroke"), prefix, sym);
    }
    decode_simple(xml::child(graphic, "Size"), prefix, Param::Size, sym);
    decode_simple(xml::child(graphic, "Rotation"), prefix, Param::Rotation, sym);
}

/// Reads `block` (`Stroke` or `Fill`) of `node`: a `Graphic{Stroke,Fill}` inside it becomes
/// prefixed graphic parameters, otherwise its `CssParameter`s become plain ones.
fn decode_block(node: Node<'_, '_>, block: &str, prefix: GraphicPrefix, sym: &mut Symbolizer) {
    let Some(el) = xml::child(node, block) else {
        return;
    };
    match xml::child(el, &format!("Graphic{block}")) {
        Some(graphic) => decode_graphic(graphic, prefix, sym),
        None => decode_css(Some(el), GraphicPrefix::None, sym),
    }
}

/// Decodes a symbolizer element of the given kind; `None` when no recognized parameter is set.
pub fn decode_symbolizer(node: Node<'_, '_>, kind: SymbolizerKind) -> Option<Symbolizer> {
    let mut sym = Symbolizer::new(kind);
    match kind {
        SymbolizerKind::Point => {
            decode_css(xml::child(node, "Fill"), GraphicPrefix::None, &mut sym);
            decode_css(xml::child(node, "Stroke"), GraphicPrefix::None, &mut sym);
            decode_graphic(node, GraphicPrefix::None, &mut sym);
        }
        SymbolizerKind::Line => {
            decode_block(node, "Stroke", GraphicPrefix::Mark, &mut sym);
            decode_simple(
                xml::child(node, "PerpendicularOffset"),
                GraphicPrefix::None,
                Param::PerpendicularOffset,
                &mut sym,
            );
        }
        SymbolizerKind::Polygon => {
            decode_block(node, "Fill", GraphicPrefix::Pattern, &mut sym);
            decode_block(node, "Stroke", GraphicPrefix::Mark, &mut sym);
        }
        SymbolizerKind::Text => {
            if let Some(label) = xml::child(node, "Label") {
                let text = xml::child_text(label, "PropertyName").or_else(|| xml::text_of(label));
                if let Some(text) = text {
                    set(
                        &mut sym,
                        GraphicPrefix::None,
                        Param::Label,
                        ParamValue::Value(StyleValue::Text(text)),
                    );
                }
            }
            decode_css(xml::child(node, "Font"), GraphicPrefix::None, &mut sym);
            decode_css(xml::child(node, "Fill"), GraphicPrefix::None, &mut sym);
        }
    }
    if !sym.has_params() {
        debug!(symbolizer = kind.tag(), "symbolizer without recognized parameters dropped");
        return None;
    }
    Some(sym)
}
