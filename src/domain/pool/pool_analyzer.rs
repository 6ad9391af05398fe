//! Pool scoring and filtering

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use super::{
    total_apy_range, ApyDiagnostic, GaugeApy, GaugeEntry, GaugeRecord, GaugeSnapshot,
    LiquidityIndex, PoolAnalysis, PoolFilterCriteria, ScoredPool,
};

/// Why a gauge entry did not make it into the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    NotAPool,
    MissingGaugeApy,
    NoCrv,
    WrongPoolType,
    ExcludedName,
    InsufficientLiquidity,
    BelowApyThreshold,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NotAPool => "not_a_pool",
            Rejection::MissingGaugeApy => "missing_gauge_apy",
            Rejection::NoCrv => "no_crv",
            Rejection::WrongPoolType => "wrong_pool_type",
            Rejection::ExcludedName => "excluded_name",
            Rejection::InsufficientLiquidity => "insufficient_liquidity",
            Rejection::BelowApyThreshold => "below_apy_threshold",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores gauge entries against the liquidity index and applies the filter criteria
pub struct PoolAnalyzer {
    criteria: PoolFilterCriteria,
    excluded_keywords: Vec<String>,
}

impl PoolAnalyzer {
    pub fn new(criteria: PoolFilterCriteria) -> Self {
        let excluded_keywords = criteria
            .excluded_name_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            criteria,
            excluded_keywords,
        }
    }

    pub fn criteria(&self) -> &PoolFilterCriteria {
        &self.criteria
    }

    /// Score every gauge entry. Never fails: entries missing required
    /// fields are skipped.
    pub fn analyze(&self, gauges: &GaugeSnapshot, index: &LiquidityIndex) -> PoolAnalysis {
        let mut analysis = PoolAnalysis::default();
        let mut rejections: BTreeMap<Rejection, usize> = BTreeMap::new();

        for entry in &gauges.entries {
            let gauge_apy = match self.screen(&entry.record) {
                Ok(gauge_apy) => gauge_apy,
                Err(reason) => {
                    debug!("Skipping {}: {}", entry.name, reason);
                    *rejections.entry(reason).or_default() += 1;
                    continue;
                }
            };

            let address = entry.record.join_key();
            let extra_rewards_apy = index.extra_rewards_apy(&address);
            let usd_total = index.usd_total(&address);
            let total = total_apy_range(gauge_apy, extra_rewards_apy);

            // Collected ahead of the name and liquidity checks
            if total[0] > 0.0 || total[1] > 0.0 {
                analysis.non_zero_apy.push(ApyDiagnostic {
                    name: entry.name.clone(),
                    gauge_crv_apy: gauge_apy,
                    extra_rewards_apy,
                    has_no_crv: entry.record.has_no_crv(),
                });
            }

            match self.qualify(entry, usd_total, total) {
                Ok(()) => {
                    debug!(
                        "Accepted {}: total APY [{:.2}, {:.2}], usd_total {:.2}",
                        entry.name, total[0], total[1], usd_total
                    );
                    analysis
                        .pools
                        .push(ScoredPool::new(entry, gauge_apy, extra_rewards_apy, usd_total));
                }
                Err(reason) => {
                    debug!(
                        "Skipping {}: {} (total APY [{:.2}, {:.2}], usd_total {:.2})",
                        entry.name, reason, total[0], total[1], usd_total
                    );
                    *rejections.entry(reason).or_default() += 1;
                }
            }
        }

        analysis.pools.sort_by(|a, b| b.max_apy.total_cmp(&a.max_apy));

        info!(
            "Scored {} gauge entries: {} qualifying, {} with non-zero APY",
            gauges.len(),
            analysis.pools.len(),
            analysis.non_zero_apy.len()
        );
        for (reason, count) in &rejections {
            info!("  rejected {}: {}", reason, count);
        }

        analysis
    }

    /// Structural checks on the gauge record itself
    fn screen(&self, record: &GaugeRecord) -> Result<GaugeApy, Rejection> {
        if !record.is_pool() {
            return Err(Rejection::NotAPool);
        }
        let gauge_apy = record.gauge_apy().ok_or(Rejection::MissingGaugeApy)?;
        if record.has_no_crv() {
            return Err(Rejection::NoCrv);
        }
        if record.pool_type.as_deref() != Some(self.criteria.pool_type.as_str()) {
            return Err(Rejection::WrongPoolType);
        }
        Ok(gauge_apy)
    }

    /// Name, liquidity and yield thresholds
    fn qualify(&self, entry: &GaugeEntry, usd_total: f64, total: [f64; 2]) -> Result<(), Rejection> {
        if self.is_excluded_name(&entry.name) {
            return Err(Rejection::ExcludedName);
        }
        if usd_total < self.criteria.min_usd_total {
            return Err(Rejection::InsufficientLiquidity);
        }
        let min_apy = self.criteria.min_apy;
        if !(total[0] > min_apy || total[1] > min_apy) {
            return Err(Rejection::BelowApyThreshold);
        }
        Ok(())
    }

    fn is_excluded_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.excluded_keywords
            .iter()
            .any(|keyword| name.contains(keyword.as_str()))
    }
}
