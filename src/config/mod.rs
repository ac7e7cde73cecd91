// src/config/mod.rs
//! Application config loaded from TOML.
//!
//! Lookup order:
//! 1) $RENT_SPLIT_CONFIG_PATH (must exist)
//! 2) config/app.toml
//! 3) built-in defaults
//!
//! ```toml
//! default_currency = "USD"
//! max_share_token_len = 65536
//! ai_config_path = "config/ai.json"
//!
//! [default_weights]
//! size = 40
//! features = 30
//! comfort = 30
//!
//! [counter_seed]
//! helped = 0
//! links = 0
//! ```

pub mod ai;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::share::DEFAULT_MAX_TOKEN_LEN;
use crate::stats::StatName;
use crate::weights::WeightVector;

pub const ENV_CONFIG_PATH: &str = "RENT_SPLIT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

fn default_currency() -> String {
    "USD".to_string()
}
fn default_max_token_len() -> usize {
    DEFAULT_MAX_TOKEN_LEN
}
fn default_ai_config_path() -> PathBuf {
    PathBuf::from(ai::DEFAULT_AI_CONFIG_PATH)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default)]
    pub default_weights: WeightVector,
    #[serde(default = "default_max_token_len")]
    pub max_share_token_len: usize,
    #[serde(default = "default_ai_config_path")]
    pub ai_config_path: PathBuf,
    /// Starting totals for the usage counters, keyed by stat name.
    #[serde(skip)]
    pub counter_seed: BTreeMap<StatName, u64>,
    #[serde(default, rename = "counter_seed")]
    raw_counter_seed: BTreeMap<String, u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            default_weights: WeightVector::default(),
            max_share_token_len: default_max_token_len(),
            ai_config_path: default_ai_config_path(),
            counter_seed: BTreeMap::new(),
            raw_counter_seed: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.default_weights
            .validate()
            .map_err(|e| anyhow!("default_weights: {e}"))?;
        if cfg.max_share_token_len == 0 {
            return Err(anyhow!("max_share_token_len must be positive"));
        }
        for (name, &value) in &cfg.raw_counter_seed {
            let stat: StatName = name.parse().map_err(|e| anyhow!("counter_seed: {e}"))?;
            cfg.counter_seed.insert(stat, value);
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading app config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Env path, then `config/app.toml`, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }
}
