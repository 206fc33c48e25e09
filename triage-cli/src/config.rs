use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use triage_core::{RawValue, ScoringRequest, Strategy, WeightInput};

use crate::state::{default_config_path, ensure_triage_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringSection,
    pub clock: ClockSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub strategy: Strategy,
    /// Partial weight map; missing keys count as 0 and the rest is rescaled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSection {
    /// IANA timezone that decides what "today" is.
    pub timezone: String,
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl ScoringSection {
    pub fn weight_input(&self) -> Option<WeightInput> {
        self.weights.as_ref().map(|w| {
            w.iter()
                .map(|(k, v)| (k.clone(), RawValue::Float(*v)))
                .collect()
        })
    }
}

impl Config {
    /// Fill whatever the request document left unset from the config.
    pub fn apply_defaults(&self, request: &mut ScoringRequest) {
        if request.strategy.is_none() {
            request.strategy = Some(self.scoring.strategy);
        }
        if request.weights.is_none() {
            request.weights = self.scoring.weight_input();
        }
    }
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the config. A missing default file means built-in defaults; a
/// missing file that was asked for explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = resolve_path(path)?;
    if !p.exists() {
        if path.is_some() {
            bail!("config not found: {}", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => ensure_triage_home()?.join("config.toml"),
    };
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let p = resolve_path(path)?;
    if p.exists() && !force {
        println!("Config already exists: {} (use --force to overwrite)", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default(), path)?;
    println!("Wrote {}", written.display());
    Ok(())
}
