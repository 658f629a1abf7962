use serde::{Deserialize, Serialize};

use crate::utils::de_opt_string_or_number;

/// Units of measure understood by the value codec, in suffix-matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "px", alias = "")]
    Px,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "ft")]
    Ft,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Px, Unit::M, Unit::Ft];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::M => "m",
            Unit::Ft => "ft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub number: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Dimension {
    pub fn px(number: f64) -> Self {
        Self {
            number,
            unit: Unit::Px,
        }
    }

    pub fn new(number: f64, unit: Unit) -> Self {
        Self { number, unit }
    }
}

/// A plain (non-function) parameter value as the editor displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Dimension(Dimension),
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload of dimension and number values.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Dimension(d) => Some(d.number),
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<Dimension> for StyleValue {
    fn from(value: Dimension) -> Self {
        Self::Dimension(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Categorize,
    Interpolate,
    Recode,
}

impl TransformKind {
    /// The `ogc:Function` name used on the wire.
    pub fn function_name(self) -> &'static str {
        match self {
            TransformKind::Categorize => "Categorize",
            TransformKind::Interpolate => "Interpolate",
            TransformKind::Recode => "Recode",
        }
    }

    pub fn from_function_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "categorize" => Some(Self::Categorize),
            "interpolate" => Some(Self::Interpolate),
            "recode" => Some(Self::Recode),
            _ => None,
        }
    }
}

/// One `{literal, value}` step of a transformation, in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<StyleValue>,
}

impl TransformItem {
    pub fn new(literal: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        Self {
            literal: Some(literal.into()),
            value: Some(value.into()),
        }
    }

    /// The categorize default bucket: a value without a threshold literal.
    pub fn fallback(value: impl Into<StyleValue>) -> Self {
        Self {
            literal: None,
            value: Some(value.into()),
        }
    }
}

/// A `Categorize`/`Interpolate`/`Recode` function applied to a property (or `env(...)`).
///
/// `list` is stored in display order, which is the reverse of the on-wire literal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransformKind>,
    #[serde(default)]
    pub list: Vec<TransformItem>,
}

/// A symbolizer parameter: either a plain value or a transformation function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Value(StyleValue),
    Transformation(Transformation),
}

impl ParamValue {
    pub fn as_value(&self) -> Option<&StyleValue> {
        match self {
            Self::Value(v) => Some(v),
            Self::Transformation(_) => None,
        }
    }

    pub fn as_transformation(&self) -> Option<&Transformation> {
        match self {
            Self::Transformation(t) => Some(t),
            Self::Value(_) => None,
        }
    }
}

impl From<StyleValue> for ParamValue {
    fn from(value: StyleValue) -> Self {
        Self::Value(value)
    }
}

impl From<Dimension> for ParamValue {
    fn from(value: Dimension) -> Self {
        Self::Value(StyleValue::Dimension(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Value(StyleValue::text(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Value(StyleValue::Number(value))
    }
}

impl From<Transformation> for ParamValue {
    fn from(value: Transformation) -> Self {
        Self::Transformation(value)
    }
}
