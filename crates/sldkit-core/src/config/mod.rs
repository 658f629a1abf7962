use serde_json::{Value, json};

use crate::codec::scale::ScaleTable;

/// Default bound for symbolizer `z-index` values; also the stride between group positions.
pub const DEFAULT_Z_INDEX_MODULUS: u32 = 20;

/// Transcoder configuration, stored as a JSON object so that callers can merge partial
/// overrides (e.g. a `--config` file) onto the defaults.
///
/// Recognized keys:
/// - `scales`: ascending scale denominators indexed by zoom level
/// - `zIndex.modulus`: exclusive upper bound for symbolizer z-index values
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig(Value);

impl Default for StyleConfig {
    fn default() -> Self {
        Self(json!({
            "scales": ScaleTable::web_mercator().denominators(),
            "zIndex": { "modulus": DEFAULT_Z_INDEX_MODULUS },
        }))
    }
}

impl StyleConfig {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_f64_array(&self, dotted_path: &str) -> Option<Vec<f64>> {
        let arr = self.get(dotted_path)?.as_array()?;
        arr.iter().map(Value::as_f64).collect()
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// The zoom-level scale table. Falls back to the Web Mercator table when the configured
    /// value is missing, empty, or not an array of numbers.
    pub fn scale_table(&self) -> ScaleTable {
        self.get_f64_array("scales")
            .filter(|v| !v.is_empty())
            .map(ScaleTable::new)
            .unwrap_or_else(ScaleTable::web_mercator)
    }

    pub fn z_index_modulus(&self) -> u32 {
        match self.get_f64("zIndex.modulus") {
            Some(v) if v >= 1.0 && v <= f64::from(u32::MAX) => v as u32,
            _ => DEFAULT_Z_INDEX_MODULUS,
        }
    }
}

/// Objects merge key by key; any other override replaces the value outright.
fn deep_merge_value(base: &mut Value, overrides: &Value) {
    let (Value::Object(target), Value::Object(source)) = (&mut *base, overrides) else {
        *base = overrides.clone();
        return;
    };
    for (key, value) in source {
        match target.get_mut(key) {
            Some(slot) => deep_merge_value(slot, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_web_mercator_table_and_modulus() {
        let cfg = StyleConfig::default();
        assert_eq!(cfg.z_index_modulus(), 20);
        assert_eq!(cfg.scale_table(), ScaleTable::web_mercator());
    }

    #[test]
    fn deep_merge_overrides_nested_keys_only() {
        let mut cfg = StyleConfig::default();
        cfg.deep_merge(&json!({ "zIndex": { "modulus": 10 } }));
        assert_eq!(cfg.z_index_modulus(), 10);
        assert_eq!(cfg.scale_table(), ScaleTable::web_mercator());
    }

    #[test]
    fn scalar_override_replaces_a_whole_subtree() {
        let mut cfg = StyleConfig::default();
        cfg.deep_merge(&json!({ "zIndex": 7, "scales": [10.0, 100.0] }));
        assert_eq!(cfg.as_value()["zIndex"], json!(7));
        assert_eq!(cfg.z_index_modulus(), DEFAULT_Z_INDEX_MODULUS);
        assert_eq!(cfg.scale_table().denominators(), &[10.0, 100.0]);
    }

    #[test]
    fn invalid_scales_fall_back_to_default_table() {
        let cfg = StyleConfig::from_value(json!({ "scales": ["a", "b"] }));
        assert_eq!(cfg.scale_table(), ScaleTable::web_mercator());
        let cfg = StyleConfig::from_value(json!({ "scales": [] }));
        assert_eq!(cfg.scale_table(), ScaleTable::web_mercator());
    }

    #[test]
    fn custom_scale_table_is_used() {
        let cfg = StyleConfig::from_value(json!({ "scales": [100.0, 1000.0, 10000.0] }));
        assert_eq!(cfg.scale_table().denominators(), &[100.0, 1000.0, 10000.0]);
    }
}
