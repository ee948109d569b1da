//! Codec configuration (loaded from crumb.toml)
//!
//! The single symmetric secret lives here as explicit configuration — not a
//! process-wide singleton — so tests can rotate it by simply building a new
//! codec from a different config. Which logical field maps to which cookie
//! name, along with path/domain/expiry attributes, belongs to the scope
//! layer and is deliberately absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::EnvelopeFlags;

/// Top-level codec configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Secret the symmetric codec key is derived from
    pub secret: String,
    /// Transform flags applied to fields without an explicit entry
    pub defaults: EnvelopeFlags,
    /// Per-field transform flags, keyed by logical field name
    pub fields: BTreeMap<String, EnvelopeFlags>,
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading codec config: {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("parsing codec config: {}", path.display()))?;
        tracing::debug!(fields = config.fields.len(), "codec config loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Flags for a logical field, falling back to the configured defaults.
    pub fn field_flags(&self, name: &str) -> EnvelopeFlags {
        self.fields.get(name).copied().unwrap_or(self.defaults)
    }
}
