use anyhow::{Context, Result};
use midiscope_events::LabelStyle;
use midiscope_filter::FilterCriteria;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings read from `--config`; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub style: Option<LabelStyle>,
    pub criteria: FilterCriteria,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}

/// Read a whole `FilterCriteria`; `.toml` files are TOML, anything else JSON
pub fn load_criteria(path: &Path) -> Result<FilterCriteria> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria {}", path.display()))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&text).with_context(|| format!("Invalid criteria {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("Invalid criteria {}", path.display()))
    }
}
