//! Whole-document transcoding: flat entity list ⇄ one SLD document per map layer.
//!
//! Symbolizers with different `z-index` values cannot share a `FeatureTypeStyle` (renderers
//! draw blocks in order, symbolizers inside a block together), so the assembler splits such
//! rules into synthetic "overflow" blocks placed right after their group. An overflow block is
//! named after its base block plus a `${z}` marker; the parser uses that marker to fold the
//! symbolizers back into the original rule.

mod assemble;
mod parse;

use std::sync::OnceLock;

use regex::Regex;

use crate::models::RuleData;

pub(crate) use assemble::assemble;
pub(crate) use parse::parse;

/// Name of the block collecting rules that belong to no group.
pub const UNGROUPED_BLOCK: &str = "_";

/// Replaces a single rule's content while assembling, for live previews of unsaved edits.
#[derive(Debug, Clone, Copy)]
pub struct RulePreview<'a> {
    pub rule_id: &'a str,
    pub data: &'a RuleData,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions<'a> {
    /// Only produce the document for this layer key (`prefix~name`).
    pub layer: Option<&'a str>,
    pub preview: Option<RulePreview<'a>>,
}

impl<'a> AssembleOptions<'a> {
    pub fn layer(mut self, layer: &'a str) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn preview(mut self, rule_id: &'a str, data: &'a RuleData) -> Self {
        self.preview = Some(RulePreview { rule_id, data });
        self
    }
}

fn overflow_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^(.*)\$\{(\d+)\}$").expect("valid regex"))
}

pub fn overflow_label(base: &str, z: u32) -> String {
    format!("{base}${{{z}}}")
}

/// Splits `roads${3}` into `("roads", 3)`.
pub fn split_overflow_label(label: &str) -> Option<(&str, u32)> {
    let caps = overflow_marker_re().captures(label)?;
    let base = caps.get(1)?.as_str();
    let z = caps.get(2)?.as_str().parse().ok()?;
    Some((base, z))
}
