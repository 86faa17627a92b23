use crate::engine::StrengthThresholds;
use crate::normalizer::FieldMapping;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,

    /// Default budget ceilings, keyed by tier name. Only used to seed a
    /// fresh budget database; a live database wins afterwards.
    pub budgets: Option<HashMap<String, f64>>,

    /// Strength threshold overrides.
    pub thresholds: Option<ThresholdsConfig>,

    /// Where roster fields live in the source rows.
    pub field_mapping: Option<FieldMapping>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub marketing: Option<StrengthThresholds>,
    pub donation: Option<StrengthThresholds>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
