use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::domain::pool::PoolFilterCriteria;
use crate::report::DEFAULT_MAX_DIAGNOSTICS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    pub min_apy: f64,
    pub min_usd_total: f64,
    pub pool_type: String,
    pub excluded_name_keywords: Vec<String>,
}

impl Default for FilterCfg {
    fn default() -> Self {
        let criteria = PoolFilterCriteria::default();
        Self {
            min_apy: criteria.min_apy,
            min_usd_total: criteria.min_usd_total,
            pool_type: criteria.pool_type,
            excluded_name_keywords: criteria.excluded_name_keywords,
        }
    }
}

impl From<FilterCfg> for PoolFilterCriteria {
    fn from(cfg: FilterCfg) -> Self {
        Self {
            min_apy: cfg.min_apy,
            min_usd_total: cfg.min_usd_total,
            pool_type: cfg.pool_type,
            excluded_name_keywords: cfg.excluded_name_keywords,
        }
    }
}

/// Snapshot and output locations. Relative paths resolve against `data_dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsCfg {
    pub data_dir: PathBuf,
    pub gauges: PathBuf,
    pub pools: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            gauges: PathBuf::from("curvefi-all-guages.json"),
            pools: PathBuf::from("all-pools.json"),
            output: PathBuf::from("high_apy_stable_pools_1m_plus.json"),
        }
    }
}

impl PathsCfg {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        // Path::join keeps absolute paths as they are
        self.data_dir.join(path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    pub save: bool,
    pub max_diagnostics: usize,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            save: true,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterCfg,
    pub paths: PathsCfg,
    pub output: OutputCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
