#![forbid(unsafe_code)]

//! `sldkit` edits map styles as flat rule lists and persists them as OGC SLD 1.0.0 documents.
//!
//! The transcoder itself lives in `sldkit-core` and is re-exported here. This crate adds
//! [`Transcoder`], a convenience bundle for callers that parse and assemble repeatedly with the
//! same options, and [`layer_file_stem`] for writing one file per layer document.

pub use sldkit_core::*;

use indexmap::IndexMap;

/// Converts a layer key (`prefix~name`, `name`, or the empty key) into a conservative file
/// stem.
///
/// - trims whitespace
/// - keeps ASCII alphanumerics, `-`, `_` and `.`; the workspace separator `~` becomes `__`
/// - replaces anything else with `-`
/// - the empty key and keys with nothing usable become `untitled`
pub fn layer_file_stem(layer_key: &str) -> String {
    let raw = layer_key.trim();
    let mut out = String::with_capacity(raw.len() + 2);
    for ch in raw.chars() {
        match ch {
            '~' => out.push_str("__"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => out.push(c),
            _ => out.push('-'),
        }
    }

    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches(|c| c == '-' || c == '.');
    if out.is_empty() {
        return "untitled".to_string();
    }
    out.to_string()
}

/// Bundles an [`Engine`] with the parse options used for every call.
///
/// All work is CPU-bound and performs no I/O, so one value can be shared freely between
/// callers.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    pub engine: Engine,
    pub parse: ParseOptions,
}

impl Transcoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: StyleConfig) -> Self {
        self.engine = self.engine.with_config(config);
        self
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Option<Vec<Entity>>> {
        self.engine.parse_document_with(text, self.parse)
    }

    /// Assembles every layer document, keyed by layer.
    pub fn assemble(&self, entities: &[Entity]) -> IndexMap<String, String> {
        self.engine
            .assemble_document(entities, &AssembleOptions::default())
    }

    pub fn assemble_layer(&self, entities: &[Entity], layer: &str) -> Option<String> {
        self.engine.assemble_layer(entities, layer)
    }

    /// Assembles, then parses every produced document back, concatenating the entities in layer
    /// order. Useful to normalize hand-written documents.
    pub fn normalize(&self, entities: &[Entity]) -> Result<Vec<Entity>> {
        let mut out = Vec::new();
        for xml in self.assemble(entities).values() {
            out.extend(self.engine.try_parse_document(xml)?);
        }
        Ok(out)
    }
}
