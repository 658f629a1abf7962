use serde::{Deserialize, Serialize};

use super::symbolizer::de_symbolizers;
use super::{FilterNode, Symbolizer};
use crate::utils::{de_opt_string_or_number, de_string_or_number, new_id};

/// An item of the editor's flat style list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    /// One `FeatureTypeStyle` block.
    Group(Group),
    /// One `Rule`.
    #[serde(rename = "layer")]
    Rule(Rule),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Group(g) => &g.id,
            Entity::Rule(r) => &r.id,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Entity::Group(g) => Some(g),
            Entity::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Entity::Rule(r) => Some(r),
            Entity::Group(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default = "new_id", deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub rule: Vec<FeatureTypeStyleOptions>,
}

impl Group {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: new_id(),
            label: Some(label.clone()),
            rule: vec![FeatureTypeStyleOptions {
                label: Some(label),
                ..FeatureTypeStyleOptions::default()
            }],
        }
    }

    pub fn options(&self) -> Option<&FeatureTypeStyleOptions> {
        self.rule.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureTypeStyleTag {
    #[default]
    FeatureTypeStyle,
}

/// Editable options of a `FeatureTypeStyle` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTypeStyleOptions {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    #[serde(rename = "_", default)]
    pub tag: FeatureTypeStyleTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `VendorOption name="sortBy"`.
    #[serde(
        rename = "sort-by",
        alias = "sortBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_by: Option<String>,
    /// `VendorOption name="sortByGroup"`.
    #[serde(
        rename = "sort-by-group",
        alias = "sortByGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_by_group: Option<String>,
}

impl Default for FeatureTypeStyleOptions {
    fn default() -> Self {
        Self {
            id: new_id(),
            tag: FeatureTypeStyleTag::FeatureTypeStyle,
            label: None,
            sort_by: None,
            sort_by_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default = "new_id", deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(
        rename = "groupId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub group_id: Option<String>,
    #[serde(default)]
    pub label: String,
    /// Name of the map layer this rule styles; selects the output document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Workspace prefix of the layer (`topp` in `topp:states`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub data: RuleData,
}

impl Rule {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: new_id(),
            group_id: None,
            label: label.clone(),
            name: None,
            prefix: None,
            data: RuleData {
                general: GeneralField::info(Some(label), None, None),
                ..RuleData::default()
            },
        }
    }

    /// The key of the per-layer output document: `prefix~name`, or `name`.
    pub fn layer_key(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default();
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}~{name}"),
            _ => name.to_string(),
        }
    }
}

/// The editable content of a rule; also what a live preview substitutes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleData {
    #[serde(default)]
    pub general: Vec<GeneralField>,
    #[serde(default, deserialize_with = "de_symbolizers")]
    pub rule: Vec<Symbolizer>,
    #[serde(default)]
    pub scales: ScaleRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterNode>,
}

impl RuleData {
    pub fn general_value(&self, name: &str) -> Option<&str> {
        self.general
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// A `Name`/`Title`/`Abstract` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralField {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub value: Option<String>,
}

impl GeneralField {
    pub const NAME: &'static str = "Name";
    pub const TITLE: &'static str = "Title";
    pub const ABSTRACT: &'static str = "Abstract";

    pub fn info(name: Option<String>, title: Option<String>, abstract_: Option<String>) -> Vec<Self> {
        vec![
            Self {
                name: Self::NAME.to_string(),
                value: name,
            },
            Self {
                name: Self::TITLE.to_string(),
                value: title,
            },
            Self {
                name: Self::ABSTRACT.to_string(),
                value: abstract_,
            },
        ]
    }
}

/// Scale limits of a rule. Denominators are what goes on the wire; zooms are display-only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleRange {
    #[serde(
        rename = "minScaleDenominator",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_scale_denominator: Option<f64>,
    #[serde(
        rename = "maxScaleDenominator",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_scale_denominator: Option<f64>,
    #[serde(rename = "minZoom", default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<usize>,
    #[serde(rename = "maxZoom", default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<usize>,
}
