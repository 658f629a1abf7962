use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::ParamValue;
use crate::params::{GraphicPrefix, Param, ParamKey};
use crate::utils::{new_id, parse_finite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolizerKind {
    #[serde(rename = "PointSymbolizer")]
    Point,
    #[serde(rename = "LineSymbolizer")]
    Line,
    #[serde(rename = "PolygonSymbolizer")]
    Polygon,
    #[serde(rename = "TextSymbolizer")]
    Text,
}

impl SymbolizerKind {
    /// Wire order of symbolizers inside a `Rule`.
    pub const ALL: [SymbolizerKind; 4] = [
        SymbolizerKind::Point,
        SymbolizerKind::Line,
        SymbolizerKind::Polygon,
        SymbolizerKind::Text,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SymbolizerKind::Point => "PointSymbolizer",
            SymbolizerKind::Line => "LineSymbolizer",
            SymbolizerKind::Polygon => "PolygonSymbolizer",
            SymbolizerKind::Text => "TextSymbolizer",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// The parameter whitelist of this symbolizer type.
    pub fn accepts(self, key: ParamKey) -> bool {
        use GraphicPrefix as G;
        use Param as P;

        let stroke = Param::STROKE.contains(&key.param);
        match (self, key.prefix) {
            (SymbolizerKind::Point, G::None) => {
                stroke
                    || matches!(
                        key.param,
                        P::WellKnownName | P::Size | P::Rotation | P::Fill | P::FillOpacity
                    )
            }
            (SymbolizerKind::Point, G::Mark | G::Pattern) => true,
            (SymbolizerKind::Line, G::None) => stroke || key.param == P::PerpendicularOffset,
            (SymbolizerKind::Line, G::Mark) => true,
            (SymbolizerKind::Line, G::Pattern) => false,
            (SymbolizerKind::Polygon, G::None) => {
                stroke || matches!(key.param, P::Fill | P::FillOpacity)
            }
            (SymbolizerKind::Polygon, G::Mark | G::Pattern) => true,
            (SymbolizerKind::Text, G::None) => {
                Param::FONT.contains(&key.param)
                    || matches!(key.param, P::Label | P::Fill | P::FillOpacity)
            }
            (SymbolizerKind::Text, G::Mark | G::Pattern) => false,
        }
    }
}

/// One rendering directive of a rule: a typed, whitelisted parameter map.
///
/// In JSON the parameters are flattened next to the `_` (type) and `_id` fields, using the
/// editor's hyphenated keys. Keys outside the type's whitelist are dropped on load.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbolizer {
    pub id: String,
    pub kind: SymbolizerKind,
    pub z_index: Option<u32>,
    params: BTreeMap<ParamKey, ParamValue>,
}

impl Symbolizer {
    pub fn new(kind: SymbolizerKind) -> Self {
        Self {
            id: new_id(),
            kind,
            z_index: None,
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        if let Some(key) = ParamKey::parse(key) {
            self.set(key, value.into());
        }
        self
    }

    pub fn with_z_index(mut self, z: u32) -> Self {
        self.z_index = Some(z);
        self
    }

    /// Sets a parameter; returns `false` (and stores nothing) when the key is not whitelisted.
    pub fn set(&mut self, key: ParamKey, value: ParamValue) -> bool {
        if !self.kind.accepts(key) {
            return false;
        }
        self.params.insert(key, value);
        true
    }

    pub fn get(&self, key: ParamKey) -> Option<&ParamValue> {
        self.params.get(&key)
    }

    pub fn get_named(&self, name: &str) -> Option<&ParamValue> {
        self.get(ParamKey::parse(name)?)
    }

    pub fn params(&self) -> &BTreeMap<ParamKey, ParamValue> {
        &self.params
    }

    /// Presence test: at least one whitelisted parameter is set.
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct RawSymbolizer {
    #[serde(rename = "_id", default = "new_id")]
    id: String,
    #[serde(rename = "_")]
    kind: SymbolizerKind,
    #[serde(rename = "z-index", default, skip_serializing_if = "Option::is_none")]
    z_index: Option<Value>,
    #[serde(flatten)]
    params: Map<String, Value>,
}

/// Accepts `3`, `"3"` and `{"number": 3, "unit": "px"}`.
fn z_index_from_value(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_finite(s),
        Value::Object(obj) => obj.get("number").and_then(Value::as_f64),
        _ => None,
    }?;
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u32)
}

impl From<RawSymbolizer> for Symbolizer {
    fn from(raw: RawSymbolizer) -> Self {
        let mut sym = Symbolizer {
            id: raw.id,
            kind: raw.kind,
            z_index: raw.z_index.as_ref().and_then(z_index_from_value),
            params: BTreeMap::new(),
        };
        for (name, value) in raw.params {
            if value.is_null() {
                continue;
            }
            let Some(key) = ParamKey::parse(&name) else {
                continue;
            };
            let Ok(value) = serde_json::from_value::<ParamValue>(value) else {
                continue;
            };
            sym.set(key, value);
        }
        sym
    }
}

impl From<Symbolizer> for RawSymbolizer {
    fn from(sym: Symbolizer) -> Self {
        let mut params = Map::new();
        for (key, value) in sym.params {
            if let Ok(v) = serde_json::to_value(value) {
                params.insert(key.to_string(), v);
            }
        }
        RawSymbolizer {
            id: sym.id,
            kind: sym.kind,
            z_index: sym.z_index.map(Value::from),
            params,
        }
    }
}

/// Reads a symbolizer list, skipping entries of unsupported types instead of failing the list.
pub(crate) fn de_symbolizers<'de, D>(deserializer: D) -> Result<Vec<Symbolizer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Symbolizer>(item) {
            Ok(sym) => Some(sym),
            Err(err) => {
                debug!(error = %err, "unsupported symbolizer dropped");
                None
            }
        })
        .collect())
}

impl Serialize for Symbolizer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawSymbolizer::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Symbolizer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSymbolizer::deserialize(deserializer).map(Symbolizer::from)
    }
}
