#![forbid(unsafe_code)]

//! Bidirectional transcoder between OGC Styled Layer Descriptor (SLD 1.0.0) documents and a
//! flat, editor-friendly rule model.
//!
//! - [`Engine::parse_document`] turns SLD text into a list of [`Entity`] values: one `Group`
//!   per `FeatureTypeStyle`, followed by its `Rule`s.
//! - [`Engine::assemble_document`] turns such a list back into one SLD document per map layer.
//!
//! Both directions are pure: no I/O, no shared state besides fresh ids for parsed entities.

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod params;
pub mod utils;
pub mod xml;

use indexmap::IndexMap;
use tracing::debug;

pub use codec::ScaleTable;
pub use config::StyleConfig;
pub use document::{AssembleOptions, RulePreview};
pub use error::{Error, Result};
pub use models::{
    Comparator, Dimension, Entity, FilterNode, GeneralField, Group, LogicalOperator, ParamValue,
    Rule, RuleData, ScaleRange, StyleValue, Symbolizer, SymbolizerKind, TransformItem,
    TransformKind, Transformation, Unit,
};
pub use params::{GraphicPrefix, Param, ParamKey};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub suppress_errors: bool,
}

impl ParseOptions {
    /// Strict parsing (errors are returned).
    pub fn strict() -> Self {
        Self {
            suppress_errors: false,
        }
    }

    /// Lenient parsing: malformed or non-SLD input yields `Ok(None)`.
    pub fn lenient() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: StyleConfig,
    scales: ScaleTable,
    z_modulus: u32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(StyleConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_config(config: StyleConfig) -> Self {
        Self {
            scales: config.scale_table(),
            z_modulus: config.z_index_modulus(),
            config,
        }
    }

    /// Merges `config` onto the current configuration.
    pub fn with_config(self, config: StyleConfig) -> Self {
        let mut merged = self.config;
        merged.deep_merge(config.as_value());
        Self::from_config(merged)
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn scale_table(&self) -> &ScaleTable {
        &self.scales
    }

    pub fn z_index_modulus(&self) -> u32 {
        self.z_modulus
    }

    pub fn parse_document_with(
        &self,
        text: &str,
        options: ParseOptions,
    ) -> Result<Option<Vec<Entity>>> {
        match document::parse(text, &self.scales) {
            Ok(entities) => Ok(Some(entities)),
            Err(err) if options.suppress_errors => {
                debug!(error = %err, "SLD document not parsed");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Parses SLD text; `None` when the text is not a well-formed, editable SLD document.
    pub fn parse_document(&self, text: &str) -> Option<Vec<Entity>> {
        self.parse_document_with(text, ParseOptions::lenient())
            .ok()
            .flatten()
    }

    /// Like [`Engine::parse_document`], but reports why parsing failed.
    pub fn try_parse_document(&self, text: &str) -> Result<Vec<Entity>> {
        document::parse(text, &self.scales)
    }

    /// Assembles one SLD document per layer key (`prefix~name`, or `name`), in order of first
    /// appearance. Output is byte-identical for identical input.
    pub fn assemble_document(
        &self,
        entities: &[Entity],
        options: &AssembleOptions<'_>,
    ) -> IndexMap<String, String> {
        document::assemble(entities, options, self.z_modulus)
    }

    /// Assembles the document of a single layer.
    pub fn assemble_layer(&self, entities: &[Entity], layer: &str) -> Option<String> {
        self.assemble_document(entities, &AssembleOptions::default().layer(layer))
            .swap_remove(layer)
    }

    /// Decodes a JSON entity list as stored by editors.
    pub fn entities_from_json(&self, value: serde_json::Value) -> Result<Vec<Entity>> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests;
