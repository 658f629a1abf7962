use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{AssembleOptions, UNGROUPED_BLOCK, overflow_label, split_overflow_label};
use crate::codec::{encode_filter, encode_symbolizer};
use crate::models::{Entity, GeneralField, Group, Rule, RuleData, ScaleRange, Symbolizer};
use crate::utils::js_number;
use crate::xml::{
    GML_NS, OGC_NS, SLD_NS, XLINK_NS, XML_DECLARATION, XSI_NS, XmlElement,
};

/// Target `FeatureTypeStyle` block of a rule part. Sorting keys of this type yields document
/// order: the ungrouped block, then each group followed by its overflow blocks by z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum BlockKey {
    Ungrouped,
    Group { position: usize, z: u32 },
}

impl BlockKey {
    fn group(position: usize) -> Self {
        BlockKey::Group { position, z: 0 }
    }
}

/// The symbolizers of one rule that land in one block.
struct RulePart<'e> {
    rule: &'e Rule,
    data: &'e RuleData,
    symbolizers: Vec<&'e Symbolizer>,
}

type LayerBlocks<'e> = IndexMap<BlockKey, Vec<RulePart<'e>>>;

pub(crate) fn assemble(
    entities: &[Entity],
    options: &AssembleOptions<'_>,
    z_modulus: u32,
) -> IndexMap<String, String> {
    let groups: Vec<&Group> = entities.iter().filter_map(Entity::as_group).collect();
    let mut group_positions: HashMap<&str, usize> = HashMap::new();
    for (position, group) in groups.iter().enumerate() {
        group_positions.entry(group.id.as_str()).or_insert(position);
        let label = group.label.as_deref().unwrap_or_default();
        if split_overflow_label(label).is_some() {
            warn!(
                group = %group.id,
                label,
                "group label ends with an overflow marker and may be misread when parsed back"
            );
        }
    }

    let mut layers: IndexMap<String, LayerBlocks<'_>> = IndexMap::new();
    for rule in entities.iter().filter_map(Entity::as_rule) {
        let data = match options.preview {
            Some(preview) if preview.rule_id == rule.id => preview.data,
            _ => &rule.data,
        };
        let position = rule
            .group_id
            .as_deref()
            .and_then(|id| group_positions.get(id).copied());
        let blocks = layers.entry(rule.layer_key()).or_default();
        for (key, symbolizers) in split_by_z_index(data, position, z_modulus) {
            blocks.entry(key).or_default().push(RulePart {
                rule,
                data,
                symbolizers,
            });
        }
    }

    if let Some(layer) = options.layer {
        let Some(blocks) = layers.swap_remove(layer) else {
            debug!(layer, "requested layer has no rules");
            return IndexMap::new();
        };
        layers = IndexMap::from([(layer.to_string(), blocks)]);
    }

    layers
        .into_iter()
        .map(|(layer, mut blocks)| {
            blocks.sort_keys();
            let text = render_document(&layer, &blocks, &groups);
            (layer, text)
        })
        .collect()
}

/// Distributes a rule's symbolizers over blocks. Only grouped rules whose symbolizers span more
/// than one z-index are split. A split rule always keeps a part in the group's own block, even
/// with no z-index 0 symbolizers, so its overflow parts can be merged back.
fn split_by_z_index<'e>(
    data: &'e RuleData,
    position: Option<usize>,
    z_modulus: u32,
) -> Vec<(BlockKey, Vec<&'e Symbolizer>)> {
    let all = || data.rule.iter().collect::<Vec<_>>();
    let Some(position) = position else {
        return vec![(BlockKey::Ungrouped, all())];
    };

    let max_z = z_modulus.saturating_sub(1);
    let mut by_z: BTreeMap<u32, Vec<&'e Symbolizer>> = BTreeMap::new();
    for sym in &data.rule {
        let mut z = sym.z_index.unwrap_or(0);
        if z > max_z {
            warn!(symbolizer = %sym.id, z, max = max_z, "z-index out of range; clamped");
            z = max_z;
        }
        by_z.entry(z).or_default().push(sym);
    }
    if by_z.len() <= 1 {
        return vec![(BlockKey::group(position), all())];
    }
    by_z.entry(0).or_default();
    by_z.into_iter()
        .map(|(z, syms)| (BlockKey::Group { position, z }, syms))
        .collect()
}

fn block_name(key: BlockKey, groups: &[&Group]) -> String {
    match key {
        BlockKey::Ungrouped => UNGROUPED_BLOCK.to_string(),
        BlockKey::Group { position, z } => {
            let group = groups[position];
            let base = group
                .label
                .as_deref()
                .filter(|l| !l.is_empty())
                .unwrap_or(&group.id);
            if z == 0 {
                base.to_string()
            } else {
                overflow_label(base, z)
            }
        }
    }
}

fn vendor_option(name: &str, value: &str) -> XmlElement {
    XmlElement::with_text("VendorOption", value).attr("name", name)
}

fn render_block(key: BlockKey, parts: &[RulePart<'_>], groups: &[&Group]) -> XmlElement {
    let mut fts = XmlElement::new("FeatureTypeStyle")
        .child(XmlElement::with_text("Name", block_name(key, groups)));
    fts.extend(parts.iter().map(render_rule));
    let options = match key {
        BlockKey::Group { position, .. } => groups[position].options(),
        BlockKey::Ungrouped => None,
    };
    if let Some(opts) = options {
        if let Some(v) = opts.sort_by.as_deref().filter(|v| !v.is_empty()) {
            fts.push(vendor_option("sortBy", v));
        }
        if let Some(v) = opts.sort_by_group.as_deref().filter(|v| !v.is_empty()) {
            fts.push(vendor_option("sortByGroup", v));
        }
    }
    fts
}

fn scale_elements(scales: &ScaleRange) -> impl Iterator<Item = XmlElement> {
    let min = scales
        .min_scale_denominator
        .map(|v| XmlElement::with_text("MinScaleDenominator", js_number(v)));
    let max = scales
        .max_scale_denominator
        .map(|v| XmlElement::with_text("MaxScaleDenominator", js_number(v)));
    min.into_iter().chain(max)
}

fn render_rule(part: &RulePart<'_>) -> XmlElement {
    let data = part.data;
    let mut el = XmlElement::new("Rule");

    let name = data
        .general_value(GeneralField::NAME)
        .or_else(|| Some(part.rule.label.as_str()).filter(|l| !l.is_empty()));
    if let Some(name) = name {
        el.push(XmlElement::with_text("Name", name));
    }
    for field in [GeneralField::TITLE, GeneralField::ABSTRACT] {
        if let Some(value) = data.general_value(field) {
            el.push(XmlElement::with_text(field, value));
        }
    }
    el.push_opt(encode_filter(data.filters.as_ref()));
    el.extend(scale_elements(&data.scales));

    let mut symbolizers = part.symbolizers.clone();
    symbolizers.sort_by_key(|s| s.kind as u8);
    el.extend(symbolizers.into_iter().filter_map(encode_symbolizer));
    el
}

fn render_document(layer: &str, blocks: &LayerBlocks<'_>, groups: &[&Group]) -> String {
    let mut user_style = XmlElement::new("UserStyle");
    if !layer.is_empty() {
        for tag in ["Name", "Title", "Abstract"] {
            user_style.push(XmlElement::with_text(tag, layer));
        }
    }
    user_style.extend(
        blocks
            .iter()
            .map(|(key, parts)| render_block(*key, parts, groups)),
    );

    let mut named_layer = XmlElement::new("NamedLayer");
    if !layer.is_empty() {
        named_layer.push(XmlElement::with_text("Name", layer));
    }
    named_layer.push(user_style);

    let root = XmlElement::new("StyledLayerDescriptor")
        .attr("version", "1.0.0")
        .attr("xmlns", SLD_NS)
        .attr("xmlns:ogc", OGC_NS)
        .attr("xmlns:xlink", XLINK_NS)
        .attr("xmlns:xsi", XSI_NS)
        .attr("xmlns:gml", GML_NS)
        .child(named_layer);

    let mut out = String::from(XML_DECLARATION);
    root.write_into(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimension, SymbolizerKind};

    fn grouped_rule(group: &Group, label: &str, symbolizers: Vec<Symbolizer>) -> Rule {
        let mut rule = Rule::new(label);
        rule.group_id = Some(group.id.clone());
        rule.name = Some("roads".to_string());
        rule.data.rule = symbolizers;
        rule
    }

    #[test]
    fn single_z_index_stays_in_group() {
        let group = Group::new("G");
        let rule = grouped_rule(
            &group,
            "r",
            vec![
                Symbolizer::new(SymbolizerKind::Line)
                    .with("stroke", "#000000")
                    .with_z_index(4),
            ],
        );
        let keys: Vec<BlockKey> = split_by_z_index(&rule.data, Some(0), 20)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![BlockKey::group(0)]);
    }

    #[test]
    fn mixed_z_index_splits_and_clamps() {
        let group = Group::new("G");
        let rule = grouped_rule(
            &group,
            "r",
            vec![
                Symbolizer::new(SymbolizerKind::Line).with("stroke", "#000000"),
                Symbolizer::new(SymbolizerKind::Line)
                    .with("stroke", "#ffffff")
                    .with_z_index(99),
            ],
        );
        let keys: Vec<BlockKey> = split_by_z_index(&rule.data, Some(2), 20)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                BlockKey::Group { position: 2, z: 0 },
                BlockKey::Group { position: 2, z: 19 }
            ]
        );
    }

    #[test]
    fn split_without_base_symbolizers_keeps_an_empty_base_part() {
        let group = Group::new("G");
        let rule = grouped_rule(
            &group,
            "r",
            vec![
                Symbolizer::new(SymbolizerKind::Line)
                    .with("stroke", "#000000")
                    .with_z_index(2),
                Symbolizer::new(SymbolizerKind::Line)
                    .with("stroke", "#ffffff")
                    .with_z_index(3),
            ],
        );
        let parts = split_by_z_index(&rule.data, Some(0), 20);
        let shape: Vec<(BlockKey, usize)> = parts.iter().map(|(k, s)| (*k, s.len())).collect();
        assert_eq!(
            shape,
            vec![
                (BlockKey::Group { position: 0, z: 0 }, 0),
                (BlockKey::Group { position: 0, z: 2 }, 1),
                (BlockKey::Group { position: 0, z: 3 }, 1),
            ]
        );
    }

    #[test]
    fn ungrouped_rules_ignore_z_index() {
        let mut rule = Rule::new("r");
        rule.data.rule = vec![
            Symbolizer::new(SymbolizerKind::Point).with("size", Dimension::px(3.0)),
            Symbolizer::new(SymbolizerKind::Point)
                .with("size", Dimension::px(5.0))
                .with_z_index(2),
        ];
        let parts = split_by_z_index(&rule.data, None, 20);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, BlockKey::Ungrouped);
        assert_eq!(parts[0].1.len(), 2);
    }

    #[test]
    fn block_keys_sort_into_document_order() {
        let mut keys = vec![
            BlockKey::Group { position: 1, z: 0 },
            BlockKey::Group { position: 0, z: 3 },
            BlockKey::Ungrouped,
            BlockKey::Group { position: 0, z: 0 },
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                BlockKey::Ungrouped,
                BlockKey::Group { position: 0, z: 0 },
                BlockKey::Group { position: 0, z: 3 },
                BlockKey::Group { position: 1, z: 0 },
            ]
        );
    }

    #[test]
    fn unlabeled_group_blocks_use_the_group_id() {
        let mut group = Group::new("");
        group.id = "g1".to_string();
        let groups = vec![&group];
        assert_eq!(block_name(BlockKey::group(0), &groups), "g1");
        assert_eq!(
            block_name(BlockKey::Group { position: 0, z: 3 }, &groups),
            "g1${3}"
        );
        assert_eq!(block_name(BlockKey::Ungrouped, &groups), "_");
    }
}
