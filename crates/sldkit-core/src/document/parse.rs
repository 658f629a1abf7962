use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::split_overflow_label;
use crate::codec::{ScaleTable, decode_filter, decode_symbolizer};
use crate::error::{Error, Result};
use crate::models::{
    Entity, FeatureTypeStyleOptions, GeneralField, Group, Rule, RuleData, SymbolizerKind,
};
use crate::utils::{new_id, parse_finite};
use crate::xml;

struct ParsedRule {
    name: Option<String>,
    data: RuleData,
}

struct ParsedBlock {
    label: Option<String>,
    sort_by: Option<String>,
    sort_by_group: Option<String>,
    rules: Vec<ParsedRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockRole {
    Authored,
    /// Carries the non-zero z-index symbolizers of rules in block `base`.
    Overflow { base: usize, z: u32 },
}

/// Layer identity recovered from `NamedLayer/Name` (`prefix~name` or `name`).
#[derive(Debug, Default)]
struct LayerIdentity {
    name: Option<String>,
    prefix: Option<String>,
}

impl LayerIdentity {
    fn from_key(key: Option<String>) -> Self {
        let Some(key) = key else {
            return Self::default();
        };
        match key.split_once('~') {
            Some((prefix, name)) => Self {
                name: Some(name.to_string()),
                prefix: Some(prefix.to_string()),
            },
            None => Self {
                name: Some(key),
                prefix: None,
            },
        }
    }
}

fn required<'a, 'input>(
    node: Node<'a, 'input>,
    element: &'static str,
) -> Result<Node<'a, 'input>> {
    xml::child(node, element).ok_or(Error::MissingElement { element })
}

pub(crate) fn parse(text: &str, scales: &ScaleTable) -> Result<Vec<Entity>> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "StyledLayerDescriptor" {
        return Err(Error::MissingElement {
            element: "StyledLayerDescriptor",
        });
    }
    let named_layer = required(root, "NamedLayer")?;
    let user_style = required(named_layer, "UserStyle")?;
    let blocks = xml::children(user_style, "FeatureTypeStyle");
    if blocks.is_empty() {
        return Err(Error::MissingElement {
            element: "FeatureTypeStyle",
        });
    }

    let layer = LayerIdentity::from_key(xml::child_text(named_layer, "Name"));
    let blocks: Vec<ParsedBlock> = blocks
        .into_iter()
        .filter_map(|node| parse_block(node, scales))
        .collect();
    Ok(build_entities(blocks, &layer))
}

fn parse_block(node: Node<'_, '_>, scales: &ScaleTable) -> Option<ParsedBlock> {
    let label = xml::child_text(node, "Name");
    let rules: Vec<ParsedRule> = xml::children(node, "Rule")
        .into_iter()
        .map(|rule| parse_rule(rule, scales))
        .collect();
    if rules.is_empty() {
        debug!(label = label.as_deref(), "FeatureTypeStyle without rules dropped");
        return None;
    }

    let mut block = ParsedBlock {
        label,
        sort_by: None,
        sort_by_group: None,
        rules,
    };
    for option in xml::children(node, "VendorOption") {
        let value = xml::text_of(option);
        match option.attribute("name") {
            Some("sortBy") => block.sort_by = value,
            Some("sortByGroup") => block.sort_by_group = value,
            other => debug!(option = other, "unsupported FeatureTypeStyle vendor option"),
        }
    }
    Some(block)
}

fn parse_rule(node: Node<'_, '_>, scales: &ScaleTable) -> ParsedRule {
    let name = xml::child_text(node, GeneralField::NAME);
    let general = GeneralField::info(
        name.clone(),
        xml::child_text(node, GeneralField::TITLE),
        xml::child_text(node, GeneralField::ABSTRACT),
    );
    let denominator = |tag: &str| xml::child_text(node, tag).as_deref().and_then(parse_finite);
    let symbolizers = xml::element_children(node)
        .filter_map(|child| {
            let kind = SymbolizerKind::from_tag(child.tag_name().name())?;
            decode_symbolizer(child, kind)
        })
        .collect();

    ParsedRule {
        name,
        data: RuleData {
            general,
            rule: symbolizers,
            scales: scales.decode(
                denominator("MinScaleDenominator"),
                denominator("MaxScaleDenominator"),
            ),
            filters: Some(decode_filter(xml::child(node, "Filter"))),
        },
    }
}

/// An overflow block must follow an authored block carrying its base label; anything else that
/// merely looks like one is kept as an ordinary group.
fn classify(blocks: &[ParsedBlock]) -> Vec<BlockRole> {
    let mut roles: Vec<BlockRole> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let marker = block.label.as_deref().and_then(split_overflow_label);
        let role = match marker {
            None => BlockRole::Authored,
            Some((base_label, z)) => {
                let base = (0..roles.len()).rev().find(|&i| {
                    roles[i] == BlockRole::Authored
                        && blocks[i].label.as_deref() == Some(base_label)
                });
                match base {
                    Some(base) => BlockRole::Overflow { base, z },
                    None => {
                        warn!(
                            label = block.label.as_deref(),
                            "overflow-marked FeatureTypeStyle has no base block; kept as a group"
                        );
                        BlockRole::Authored
                    }
                }
            }
        };
        roles.push(role);
    }
    roles
}

fn build_entities(blocks: Vec<ParsedBlock>, layer: &LayerIdentity) -> Vec<Entity> {
    let roles = classify(&blocks);
    // Output slot of each authored block.
    let mut slots: Vec<Option<usize>> = vec![None; blocks.len()];
    let mut out: Vec<(Group, Vec<Rule>)> = Vec::new();

    for (i, (block, role)) in blocks.into_iter().zip(roles).enumerate() {
        match role {
            BlockRole::Authored => {
                let group = Group {
                    id: new_id(),
                    label: block.label.clone(),
                    rule: vec![FeatureTypeStyleOptions {
                        label: block.label,
                        sort_by: block.sort_by,
                        sort_by_group: block.sort_by_group,
                        ..FeatureTypeStyleOptions::default()
                    }],
                };
                let rules = block
                    .rules
                    .into_iter()
                    .map(|r| new_rule(&group, r, layer))
                    .collect();
                slots[i] = Some(out.len());
                out.push((group, rules));
            }
            BlockRole::Overflow { base, z } => {
                let Some(base_slot) = slots[base] else {
                    continue;
                };
                for parsed in block.rules {
                    merge_overflow_rule(&mut out, base_slot, parsed, z, layer);
                }
            }
        }
    }

    out.into_iter()
        .flat_map(|(group, rules)| {
            std::iter::once(Entity::Group(group)).chain(rules.into_iter().map(Entity::Rule))
        })
        .collect()
}

fn new_rule(group: &Group, parsed: ParsedRule, layer: &LayerIdentity) -> Rule {
    Rule {
        id: new_id(),
        group_id: Some(group.id.clone()),
        label: parsed.name.unwrap_or_default(),
        name: layer.name.clone(),
        prefix: layer.prefix.clone(),
        data: parsed.data,
    }
}

/// Tags the rule's symbolizers with `z` and appends them to the same-named rule of the base
/// block (or, failing that, of any authored block). Unmatched rules move into the base block.
fn merge_overflow_rule(
    out: &mut [(Group, Vec<Rule>)],
    base_slot: usize,
    mut parsed: ParsedRule,
    z: u32,
    layer: &LayerIdentity,
) {
    for sym in &mut parsed.data.rule {
        sym.z_index = Some(z);
    }

    if let Some(name) = parsed.name.as_deref() {
        let found = find_rule(&out[base_slot].1, name)
            .map(|r| (base_slot, r))
            .or_else(|| {
                out.iter()
                    .enumerate()
                    .find_map(|(slot, (_, rules))| find_rule(rules, name).map(|r| (slot, r)))
            });
        if let Some((slot, idx)) = found {
            out[slot].1[idx].data.rule.append(&mut parsed.data.rule);
            return;
        }
    }

    debug!(
        rule = parsed.name.as_deref(),
        z, "overflow rule without a matching rule moved into its base group"
    );
    let (group, rules) = &mut out[base_slot];
    let rule = new_rule(group, parsed, layer);
    rules.push(rule);
}

fn find_rule(rules: &[Rule], name: &str) -> Option<usize> {
    rules
        .iter()
        .position(|r| r.data.general_value(GeneralField::NAME) == Some(name))
}
