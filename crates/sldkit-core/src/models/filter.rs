use serde::{Deserialize, Serialize};

use crate::utils::de_opt_string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl LogicalOperator {
    pub fn tag(self) -> &'static str {
        match self {
            LogicalOperator::And => "And",
            LogicalOperator::Or => "Or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "isNull")]
    IsNull,
}

impl Comparator {
    /// Every comparator, in the order comparison children are decoded.
    pub const ALL: [Comparator; 7] = [
        Comparator::Eq,
        Comparator::NotEq,
        Comparator::Gt,
        Comparator::Gte,
        Comparator::Lt,
        Comparator::Lte,
        Comparator::IsNull,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::NotEq => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::IsNull => "isNull",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Comparator::Eq => "PropertyIsEqualTo",
            Comparator::NotEq => "PropertyIsNotEqualTo",
            Comparator::Gt => "PropertyIsGreaterThan",
            Comparator::Gte => "PropertyIsGreaterThanOrEqualTo",
            Comparator::Lt => "PropertyIsLessThan",
            Comparator::Lte => "PropertyIsLessThanOrEqualTo",
            Comparator::IsNull => "PropertyIsNull",
        }
    }

    /// `PropertyIsNull` carries no literal.
    pub fn hides_value(self) -> bool {
        matches!(self, Comparator::IsNull)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterNode {
    Group(FilterGroup),
    Input(FilterInput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub operator: LogicalOperator,
    #[serde(default)]
    pub rules: Vec<FilterNode>,
}

/// A single comparison. Fields stay optional because the editor stores half-filled rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterInput {
    #[serde(default)]
    pub operator: Option<Comparator>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub param: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub value: Option<String>,
}

impl FilterNode {
    pub fn group(operator: LogicalOperator, rules: Vec<FilterNode>) -> Self {
        Self::Group(FilterGroup { operator, rules })
    }

    /// The "match all" filter: an empty `AND` group.
    pub fn match_all() -> Self {
        Self::group(LogicalOperator::And, Vec::new())
    }

    pub fn input(operator: Comparator, param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Input(FilterInput {
            operator: Some(operator),
            param: Some(param.into()),
            value: Some(value.into()),
        })
    }

    pub fn is_null(param: impl Into<String>) -> Self {
        Self::Input(FilterInput {
            operator: Some(Comparator::IsNull),
            param: Some(param.into()),
            value: None,
        })
    }
}
