// src/report.rs
use std::io::{self, Write};

use crate::domain::pool::{ApyDiagnostic, PoolAnalysis, ScoredPool};
use crate::shared::utils::{format_pct, format_usd};

pub const DEFAULT_MAX_DIAGNOSTICS: usize = 10;
const RULE_WIDTH: usize = 80;

/// Human-readable rendering of a pool analysis
pub struct PoolReport<'a> {
    analysis: &'a PoolAnalysis,
    min_apy: f64,
    max_diagnostics: usize,
}

impl<'a> PoolReport<'a> {
    pub fn new(analysis: &'a PoolAnalysis, min_apy: f64) -> Self {
        Self {
            analysis,
            min_apy,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }

    pub fn with_max_diagnostics(mut self, max_diagnostics: usize) -> Self {
        self.max_diagnostics = max_diagnostics;
        self
    }

    /// Diagnostic listing followed by the qualifying pools
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_diagnostics(out)?;
        self.write_results(out)
    }

    pub fn write_diagnostics<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let listed = &self.analysis.non_zero_apy;
        if listed.is_empty() {
            return writeln!(out, "No pools found with non-zero APY values");
        }

        writeln!(
            out,
            "Found {} pools with non-zero APY (CRV + Extra):",
            listed.len()
        )?;
        for entry in listed.iter().take(self.max_diagnostics) {
            write_diagnostic(out, entry)?;
        }
        if listed.len() > self.max_diagnostics {
            writeln!(out, "  ... and {} more", listed.len() - self.max_diagnostics)?;
        }
        Ok(())
    }

    pub fn write_results<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let pools = &self.analysis.pools;
        if pools.is_empty() {
            return writeln!(out, "No pools found with Total APY > {:?}%", self.min_apy);
        }

        writeln!(
            out,
            "Found {} pools with Total APY > {:?}%:",
            pools.len(),
            self.min_apy
        )?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        for (i, pool) in pools.iter().enumerate() {
            write_pool(out, i + 1, pool)?;
            writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        }
        Ok(())
    }
}

fn write_diagnostic<W: Write>(out: &mut W, entry: &ApyDiagnostic) -> io::Result<()> {
    writeln!(
        out,
        "  {}: CRV[{}, {}] + Extra[{:.2}%]",
        entry.name,
        format_pct(entry.gauge_crv_apy[0]),
        format_pct(entry.gauge_crv_apy[1]),
        entry.extra_rewards_apy
    )
}

fn write_pool<W: Write>(out: &mut W, rank: usize, pool: &ScoredPool) -> io::Result<()> {
    writeln!(out, "{}. {}", rank, pool.name)?;
    writeln!(
        out,
        "   Base CRV APY:   [{}, {}]",
        format_pct(pool.gauge_crv_apy[0]),
        format_pct(pool.gauge_crv_apy[1])
    )?;
    writeln!(out, "   Extra APY:      {:.2}%", pool.extra_rewards_apy)?;
    writeln!(
        out,
        "   Total APY:      [{:.2}%, {:.2}%]",
        pool.total_apy_range[0], pool.total_apy_range[1]
    )?;
    writeln!(out, "   Max Total APY:  {:.2}%", pool.max_apy)?;
    writeln!(out, "   USD Total:      {}", format_usd(pool.usd_total, 2))?;
    writeln!(out, "   Type:           {}", pool.record.pool_type_label())?;
    writeln!(out, "   Blockchain:     {}", pool.record.blockchain_label())?;
    if let Some(url) = pool.record.first_swap_url() {
        writeln!(out, "   Swap URL:       {}", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::{GaugeEntry, GaugeRecord};
    use serde_json::json;

    fn scored(name: &str, apy: [Option<f64>; 2], extra: f64, usd_total: f64) -> ScoredPool {
        let raw = json!({
            "isPool": true,
            "type": "stable",
            "blockchainId": "ethereum",
            "poolUrls": { "swap": [format!("https://curve.fi/#/ethereum/pools/{name}/swap")] }
        });
        let entry = GaugeEntry {
            name: name.to_string(),
            record: serde_json::from_value::<GaugeRecord>(raw.clone()).unwrap(),
            raw,
        };
        ScoredPool::new(&entry, apy, extra, usd_total)
    }

    fn diagnostic(name: &str) -> ApyDiagnostic {
        ApyDiagnostic {
            name: name.to_string(),
            gauge_crv_apy: [Some(1.0), None],
            extra_rewards_apy: 0.5,
            has_no_crv: false,
        }
    }

    fn render(report: &PoolReport<'_>) -> String {
        let mut buf = Vec::new();
        report.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_report_lists_pool_details() {
        let analysis = PoolAnalysis {
            pools: vec![scored("stable3pool", [Some(5.0), Some(6.0)], 3.0, 6_000_000.0)],
            non_zero_apy: vec![diagnostic("stable3pool")],
        };

        let text = render(&PoolReport::new(&analysis, 7.0));
        assert!(text.contains("Found 1 pools with non-zero APY (CRV + Extra):"));
        assert!(text.contains("  stable3pool: CRV[1.00%, n/a] + Extra[0.50%]"));
        assert!(text.contains("Found 1 pools with Total APY > 7.0%:"));
        assert!(text.contains(&"=".repeat(80)));
        assert!(text.contains("1. stable3pool"));
        assert!(text.contains("   Base CRV APY:   [5.00%, 6.00%]"));
        assert!(text.contains("   Extra APY:      3.00%"));
        assert!(text.contains("   Total APY:      [8.00%, 9.00%]"));
        assert!(text.contains("   Max Total APY:  9.00%"));
        assert!(text.contains("   USD Total:      $6,000,000.00"));
        assert!(text.contains("   Type:           stable"));
        assert!(text.contains("   Blockchain:     ethereum"));
        assert!(text.contains("   Swap URL:       https://curve.fi/#/ethereum/pools/stable3pool/swap"));
        assert!(text.trim_end().ends_with(&"-".repeat(80)));
    }

    #[test]
    fn test_report_truncates_diagnostics() {
        let analysis = PoolAnalysis {
            pools: Vec::new(),
            non_zero_apy: (0..12).map(|i| diagnostic(&format!("pool{i}"))).collect(),
        };

        let text = render(&PoolReport::new(&analysis, 7.0));
        assert!(text.contains("Found 12 pools with non-zero APY"));
        assert!(text.contains("  pool9: "));
        assert!(!text.contains("  pool10: "));
        assert!(text.contains("  ... and 2 more"));
        assert!(text.contains("No pools found with Total APY > 7.0%"));

        let text = render(&PoolReport::new(&analysis, 7.5).with_max_diagnostics(3));
        assert!(text.contains("  pool2: "));
        assert!(!text.contains("  pool3: "));
        assert!(text.contains("  ... and 9 more"));
        assert!(text.contains("No pools found with Total APY > 7.5%"));
    }

    #[test]
    fn test_report_empty_analysis() {
        let analysis = PoolAnalysis::default();
        let text = render(&PoolReport::new(&analysis, 7.0));
        assert_eq!(
            text,
            "No pools found with non-zero APY values\nNo pools found with Total APY > 7.0%\n"
        );
    }

    #[test]
    fn test_report_ranks_in_order_and_omits_missing_url() {
        let mut bare = scored("bare", [Some(20.0), Some(20.0)], 0.0, 7_500_000.0);
        bare.record.pool_urls = None;
        let analysis = PoolAnalysis {
            pools: vec![bare, scored("second", [Some(8.0), Some(9.0)], 0.0, 6_000_000.0)],
            non_zero_apy: Vec::new(),
        };

        let text = render(&PoolReport::new(&analysis, 7.0));
        let first = text.find("1. bare").unwrap();
        let second = text.find("2. second").unwrap();
        assert!(first < second);
        assert_eq!(text.matches("Swap URL:").count(), 1);
        assert!(text.contains("   USD Total:      $7,500,000.00"));
    }
}
