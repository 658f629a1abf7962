use roxmltree::Node;

use super::{OGC_NS, SLD_NS};

/// Namespace classes tried in order when looking up a child by local name. Documents in the
/// wild qualify filter and style elements inconsistently (`ogc:`, `sld:`, `se:`, or nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NsClass {
    Ogc,
    Sld,
    Other,
}

const LOOKUP_ORDER: [NsClass; 3] = [NsClass::Ogc, NsClass::Sld, NsClass::Other];

fn ns_class(node: Node<'_, '_>) -> NsClass {
    match node.tag_name().namespace() {
        Some(OGC_NS) => NsClass::Ogc,
        Some(SLD_NS) => NsClass::Sld,
        _ => NsClass::Other,
    }
}

pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Children named `local`, taken from the first namespace class that has any.
pub fn children<'a, 'input>(node: Node<'a, 'input>, local: &str) -> Vec<Node<'a, 'input>> {
    let matching: Vec<Node<'a, 'input>> = element_children(node)
        .filter(|c| c.tag_name().name() == local)
        .collect();
    for class in LOOKUP_ORDER {
        let found: Vec<Node<'a, 'input>> = matching
            .iter()
            .copied()
            .filter(|c| ns_class(*c) == class)
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

pub fn child<'a, 'input>(node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    children(node, local).into_iter().next()
}

/// Direct text content, trimmed; `None` when blank.
pub fn text_of(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|t| t.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn child_text(node: Node<'_, '_>, local: &str) -> Option<String> {
    child(node, local).and_then(text_of)
}

pub fn function_child<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    child(node, "Function")
}
