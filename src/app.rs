// src/app.rs
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::pool::{LiquidityIndex, PoolAnalysis, PoolAnalyzer, PoolFilterCriteria, ScoredPool};
use crate::infrastructure::{ResultWriter, SnapshotLoader};
use crate::report::PoolReport;
use crate::shared::errors::AppError;
use crate::shared::utils::format_usd;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub criteria: PoolFilterCriteria,
    pub gauges_path: PathBuf,
    pub pools_path: PathBuf,
    pub output_path: PathBuf,
    pub save_results: bool,
    pub max_diagnostics: usize,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Result<Self, AppError> {
        if !cfg.filter.min_apy.is_finite() {
            return Err(AppError::ConfigError(format!(
                "min_apy must be a finite number, got {}",
                cfg.filter.min_apy
            )));
        }
        if !cfg.filter.min_usd_total.is_finite() {
            return Err(AppError::ConfigError(format!(
                "min_usd_total must be a finite number, got {}",
                cfg.filter.min_usd_total
            )));
        }

        Ok(Self {
            gauges_path: cfg.paths.resolve(&cfg.paths.gauges),
            pools_path: cfg.paths.resolve(&cfg.paths.pools),
            output_path: cfg.paths.resolve(&cfg.paths.output),
            save_results: cfg.output.save,
            max_diagnostics: cfg.output.max_diagnostics,
            criteria: cfg.filter.into(),
        })
    }
}

/// One full pass, report written to stdout
pub fn run(app_cfg: &AppCfg) -> Vec<ScoredPool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(app_cfg, &mut out)
}

/// Load, score, report and persist. Failures are logged and leave an
/// empty result; nothing propagates.
pub fn run_with_output<W: Write>(app_cfg: &AppCfg, out: &mut W) -> Vec<ScoredPool> {
    let criteria = &app_cfg.criteria;
    info!("Configuration: {:?}", app_cfg);

    if let Err(e) = writeln!(
        out,
        "Filtering Curve {} pools with Total APY > {:?}% and USD total > {}...",
        criteria.pool_type,
        criteria.min_apy,
        format_usd(criteria.min_usd_total, 0)
    ) {
        warn!("Failed to write report: {}", e);
    }

    let analysis = match scan(app_cfg) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Error: {}", e);
            let empty = PoolAnalysis::default();
            if let Err(e) = PoolReport::new(&empty, criteria.min_apy).write_results(out) {
                warn!("Failed to write report: {}", e);
            }
            return Vec::new();
        }
    };

    let report = PoolReport::new(&analysis, criteria.min_apy).with_max_diagnostics(app_cfg.max_diagnostics);
    if let Err(e) = report.write_to(out) {
        warn!("Failed to write report: {}", e);
    }

    if app_cfg.save_results && !analysis.pools.is_empty() {
        match persist(app_cfg, &analysis.pools) {
            Ok(path) => {
                if let Err(e) = writeln!(out, "\nResults saved to: {}", path.display()) {
                    warn!("Failed to write report: {}", e);
                }
            }
            Err(e) => error!("Error saving results: {}", e),
        }
    }

    analysis.pools
}

/// Load both snapshots, build the liquidity index and score the gauges
pub fn scan(app_cfg: &AppCfg) -> Result<PoolAnalysis, AppError> {
    let gauges = SnapshotLoader::load_gauges(&app_cfg.gauges_path)?;
    let pools = SnapshotLoader::load_pools(&app_cfg.pools_path)?;

    let index = LiquidityIndex::from_records(&pools.pool_data);
    info!("Indexed {} pool addresses", index.len());

    let analyzer = PoolAnalyzer::new(app_cfg.criteria.clone());
    Ok(analyzer.analyze(&gauges, &index))
}

fn persist(app_cfg: &AppCfg, pools: &[ScoredPool]) -> Result<PathBuf, AppError> {
    ResultWriter::save(&app_cfg.output_path, pools)?;
    Ok(app_cfg.output_path.clone())
}
