//! `ogc:Filter` encoding of the editor's filter tree.
//!
//! Writing first folds the tree into an ordered map from element tag to children (repeated
//! tags accumulate), then serializes that map. Groups with a single child are inlined and
//! incomplete comparisons are skipped, so a half-edited tree still yields a valid filter.

use indexmap::IndexMap;
use roxmltree::Node;

use crate::models::{Comparator, FilterGroup, FilterInput, FilterNode, LogicalOperator};
use crate::xml::{self, XmlElement};

/// One element of the intermediate filter object.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterElement {
    Comparison {
        param: String,
        value: Option<String>,
    },
    Logical(FilterObject),
}

/// Element tag (`And`, `PropertyIsEqualTo`, ...) to its occurrences, in first-seen order.
pub type FilterObject = IndexMap<&'static str, Vec<FilterElement>>;

fn is_valid(node: &FilterNode) -> bool {
    match node {
        FilterNode::Group(_) => true,
        FilterNode::Input(FilterInput {
            operator,
            param,
            value,
        }) => match operator {
            Some(Comparator::IsNull) => param.is_some(),
            Some(_) => param.is_some() && value.is_some(),
            None => false,
        },
    }
}

/// The entries of `list` that can be written.
pub fn validate(list: &[FilterNode]) -> Vec<&FilterNode> {
    list.iter().filter(|n| is_valid(n)).collect()
}

/// Folds a list of sibling filter nodes into a filter object.
pub fn write_object(list: &[FilterNode]) -> FilterObject {
    let mut out = FilterObject::new();
    for entry in validate(list) {
        let node = match entry {
            FilterNode::Group(FilterGroup { rules, .. }) if rules.len() == 1 => &rules[0],
            other => other,
        };
        match node {
            FilterNode::Group(group) => {
                let inner = write_object(&group.rules);
                if inner.is_empty() {
                    continue;
                }
                out.entry(group.operator.tag())
                    .or_default()
                    .push(FilterElement::Logical(inner));
            }
            FilterNode::Input(input) => {
                let Some(comparison) = comparison_element(input) else {
                    continue;
                };
                if let Some(op) = input.operator {
                    out.entry(op.tag()).or_default().push(comparison);
                }
            }
        }
    }
    out
}

fn comparison_element(input: &FilterInput) -> Option<FilterElement> {
    let op = input.operator?;
    let param = input.param.as_deref().filter(|p| !p.is_empty())?;
    let value = if op.hides_value() {
        None
    } else {
        Some(input.value.as_deref().filter(|v| !v.is_empty())?.to_string())
    };
    Some(FilterElement::Comparison {
        param: param.to_string(),
        value,
    })
}

fn object_children(object: &FilterObject) -> Vec<XmlElement> {
    let mut out = Vec::new();
    for (tag, elements) in object {
        for element in elements {
            let mut el = XmlElement::new(format!("ogc:{tag}"));
            match element {
                FilterElement::Comparison { param, value } => {
                    el.push(XmlElement::with_text("ogc:PropertyName", param.as_str()));
                    if let Some(value) = value {
                        el.push(XmlElement::with_text("ogc:Literal", value.as_str()));
                    }
                }
                FilterElement::Logical(inner) => el.extend(object_children(inner)),
            }
            out.push(el);
        }
    }
    out
}

/// The `ogc:Filter` element for a rule, or `None` when nothing writable remains.
pub fn encode_filter(filter: Option<&FilterNode>) -> Option<XmlElement> {
    let filter = filter?;
    let object = write_object(std::slice::from_ref(filter));
    if object.is_empty() {
        return None;
    }
    let mut el = XmlElement::new("ogc:Filter");
    el.extend(object_children(&object));
    Some(el)
}

fn decode_comparison(node: Node<'_, '_>, op: Comparator) -> FilterNode {
    FilterNode::Input(FilterInput {
        operator: Some(op),
        param: xml::child_text(node, "PropertyName"),
        value: if op.hides_value() {
            None
        } else {
            xml::child_text(node, "Literal")
        },
    })
}

fn decode_group(node: Node<'_, '_>, operator: LogicalOperator) -> FilterNode {
    FilterNode::group(operator, decode_children(node))
}

fn decode_comparisons(node: Node<'_, '_>) -> Vec<FilterNode> {
    Comparator::ALL
        .into_iter()
        .flat_map(|op| {
            xml::children(node, op.tag())
                .into_iter()
                .map(move |c| decode_comparison(c, op))
        })
        .collect()
}

/// Children of a logical element: comparisons first, then `And` groups, then `Or` groups.
fn decode_children(node: Node<'_, '_>) -> Vec<FilterNode> {
    let mut out = decode_comparisons(node);
    for operator in [LogicalOperator::And, LogicalOperator::Or] {
        out.extend(
            xml::children(node, operator.tag())
                .into_iter()
                .map(|c| decode_group(c, operator)),
        );
    }
    out
}

/// Decodes a rule's `ogc:Filter` element. A missing filter matches everything.
pub fn decode_filter(filter: Option<Node<'_, '_>>) -> FilterNode {
    let Some(filter) = filter else {
        return FilterNode::match_all();
    };
    if let Some(or) = xml::child(filter, LogicalOperator::Or.tag()) {
        return decode_group(or, LogicalOperator::Or);
    }
    if let Some(and) = xml::child(filter, LogicalOperator::And.tag()) {
        return decode_group(and, LogicalOperator::And);
    }
    let mut comparisons = decode_comparisons(filter);
    if comparisons.len() == 1 {
        return comparisons.remove(0);
    }
    FilterNode::group(LogicalOperator::And, comparisons)
}
