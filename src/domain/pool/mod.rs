//! Pool domain - gauge/liquidity records and yield scoring

mod pool_analyzer;
mod pool_index;

pub use pool_analyzer::{PoolAnalyzer, Rejection};
pub use pool_index::LiquidityIndex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Base CRV yield range as published by the gauge, either bound may be null
pub type GaugeApy = [Option<f64>; 2];

/// Pool filtering criteria
#[derive(Debug, Clone, PartialEq)]
pub struct PoolFilterCriteria {
    /// Minimum total APY, in percentage points (strictly exceeded)
    pub min_apy: f64,
    /// Minimum pool liquidity in USD (inclusive)
    pub min_usd_total: f64,
    /// Gauge `type` a pool must carry
    pub pool_type: String,
    /// Case-insensitive name fragments that exclude a pool
    pub excluded_name_keywords: Vec<String>,
}

impl Default for PoolFilterCriteria {
    fn default() -> Self {
        Self {
            min_apy: 7.0,
            min_usd_total: 5_000_000.0,
            pool_type: "stable".to_string(),
            excluded_name_keywords: vec!["btc".to_string(), "eth".to_string()],
        }
    }
}

/// Gauge metadata for one pool, as found in the gauges snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeRecord {
    #[serde(default)]
    pub is_pool: Option<bool>,
    #[serde(rename = "type", default)]
    pub pool_type: Option<String>,
    #[serde(default)]
    pub has_no_crv: Option<bool>,
    #[serde(default)]
    pub swap: Option<String>,
    #[serde(default)]
    pub gauge_crv_apy: Option<Value>,
    #[serde(default)]
    pub blockchain_id: Option<Value>,
    #[serde(default)]
    pub pool_urls: Option<Value>,
}

impl GaugeRecord {
    pub fn is_pool(&self) -> bool {
        self.is_pool.unwrap_or(false)
    }

    pub fn has_no_crv(&self) -> bool {
        self.has_no_crv.unwrap_or(false)
    }

    /// Lower-cased swap address used as the join key
    pub fn join_key(&self) -> String {
        self.swap.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Validated `gaugeCrvApy`: exactly two elements, each a number or null
    pub fn gauge_apy(&self) -> Option<GaugeApy> {
        let items = self.gauge_crv_apy.as_ref()?.as_array()?;
        if items.len() != 2 {
            return None;
        }

        let mut pair: GaugeApy = [None, None];
        for (slot, item) in pair.iter_mut().zip(items) {
            *slot = match item {
                Value::Null => None,
                Value::Number(n) => Some(n.as_f64()?),
                _ => return None,
            };
        }
        Some(pair)
    }

    pub fn pool_type_label(&self) -> &str {
        self.pool_type.as_deref().unwrap_or("unknown")
    }

    pub fn blockchain_label(&self) -> String {
        match &self.blockchain_id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// First entry of `poolUrls.swap`, if any
    pub fn first_swap_url(&self) -> Option<&str> {
        self.pool_urls
            .as_ref()?
            .get("swap")?
            .as_array()?
            .first()?
            .as_str()
    }
}

/// Named gauge entry with its raw JSON retained for persistence
#[derive(Debug, Clone)]
pub struct GaugeEntry {
    pub name: String,
    pub record: GaugeRecord,
    pub raw: Value,
}

/// Gauges snapshot in document order
#[derive(Debug, Clone, Default)]
pub struct GaugeSnapshot {
    pub entries: Vec<GaugeEntry>,
}

impl GaugeSnapshot {
    /// Build from the `data` mapping. Entries whose fields cannot be read
    /// are dropped here, the same as entries missing required fields.
    pub fn from_map(data: Map<String, Value>) -> Self {
        let mut entries = Vec::with_capacity(data.len());
        for (name, raw) in data {
            match serde_json::from_value::<GaugeRecord>(raw.clone()) {
                Ok(record) => entries.push(GaugeEntry { name, record, raw }),
                Err(e) => debug!("Skipping unreadable gauge entry {}: {}", name, e),
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GaugeReward {
    #[serde(default)]
    pub apy: Option<f64>,
}

/// Liquidity and reward streams for one pool, as found in the pools snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolLiquidityRecord {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub usd_total: Option<f64>,
    #[serde(default)]
    pub gauge_rewards: Option<Vec<GaugeReward>>,
}

impl PoolLiquidityRecord {
    pub fn join_key(&self) -> String {
        self.address.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Sum of all extra reward APYs
    pub fn extra_rewards_apy(&self) -> f64 {
        self.gauge_rewards
            .iter()
            .flatten()
            .map(|reward| reward.apy.unwrap_or(0.0))
            .sum()
    }
}

/// Pools snapshot payload (`data` of the pools document)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    pub pool_data: Vec<PoolLiquidityRecord>,
}

/// Combined CRV + extra yield for one bound of the range
pub fn total_apy_range(gauge_apy: GaugeApy, extra_rewards_apy: f64) -> [f64; 2] {
    [
        gauge_apy[0].unwrap_or(0.0) + extra_rewards_apy,
        gauge_apy[1].unwrap_or(0.0) + extra_rewards_apy,
    ]
}

/// Pool that passed every filter, with its derived yield figures
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPool {
    pub name: String,
    pub pool_info: Value,
    #[serde(rename = "gaugeCrvApy")]
    pub gauge_crv_apy: GaugeApy,
    pub extra_rewards_apy: f64,
    pub total_apy_range: [f64; 2],
    pub max_apy: f64,
    pub usd_total: f64,
    #[serde(skip)]
    pub record: GaugeRecord,
}

impl ScoredPool {
    pub fn new(entry: &GaugeEntry, gauge_apy: GaugeApy, extra_rewards_apy: f64, usd_total: f64) -> Self {
        let total = total_apy_range(gauge_apy, extra_rewards_apy);
        Self {
            name: entry.name.clone(),
            pool_info: entry.raw.clone(),
            gauge_crv_apy: gauge_apy,
            extra_rewards_apy,
            total_apy_range: total,
            max_apy: total[0].max(total[1]),
            usd_total,
            record: entry.record.clone(),
        }
    }
}

/// Entry of the non-zero APY diagnostic listing
#[derive(Debug, Clone, Serialize)]
pub struct ApyDiagnostic {
    pub name: String,
    #[serde(rename = "gaugeCrvApy")]
    pub gauge_crv_apy: GaugeApy,
    pub extra_rewards_apy: f64,
    #[serde(rename = "hasNoCrv")]
    pub has_no_crv: bool,
}

/// Pool analysis result
#[derive(Debug, Clone, Default)]
pub struct PoolAnalysis {
    /// Qualifying pools, highest max APY first
    pub pools: Vec<ScoredPool>,
    /// Pools with any non-zero total APY. Skips only the first four
    /// qualification checks, so volatile-named and thin pools show up here.
    pub non_zero_apy: Vec<ApyDiagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> GaugeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_gauge_apy_accepts_numeric_or_null_pairs() {
        let r = record(json!({ "gaugeCrvApy": [5.0, 6.5] }));
        assert_eq!(r.gauge_apy(), Some([Some(5.0), Some(6.5)]));

        let r = record(json!({ "gaugeCrvApy": [null, 3] }));
        assert_eq!(r.gauge_apy(), Some([None, Some(3.0)]));
    }

    #[test]
    fn test_gauge_apy_rejects_malformed_values() {
        assert_eq!(record(json!({})).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": null })).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": [] })).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": [1.0] })).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": [1.0, 2.0, 3.0] })).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": [1.0, "2.0"] })).gauge_apy(), None);
        assert_eq!(record(json!({ "gaugeCrvApy": "1.0" })).gauge_apy(), None);
    }

    #[test]
    fn test_display_fields() {
        let r = record(json!({
            "type": "stable",
            "blockchainId": "ethereum",
            "poolUrls": { "swap": ["https://curve.fi/3pool", "https://alt"] }
        }));
        assert_eq!(r.pool_type_label(), "stable");
        assert_eq!(r.blockchain_label(), "ethereum");
        assert_eq!(r.first_swap_url(), Some("https://curve.fi/3pool"));

        let bare = record(json!({ "poolUrls": { "swap": [] } }));
        assert_eq!(bare.pool_type_label(), "unknown");
        assert_eq!(bare.blockchain_label(), "unknown");
        assert_eq!(bare.first_swap_url(), None);
    }

    #[test]
    fn test_snapshot_keeps_document_order_and_drops_unreadable() {
        let data = json!({
            "zeta": { "isPool": true },
            "alpha": { "isPool": "yes" },
            "mid": { "isPool": false }
        });
        let Value::Object(map) = data else { unreachable!() };

        let snapshot = GaugeSnapshot::from_map(map);
        let names: Vec<_> = snapshot.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "mid"]);
    }

    #[test]
    fn test_extra_rewards_sum() {
        let r: PoolLiquidityRecord = serde_json::from_value(json!({
            "address": "0xAB",
            "usdTotal": 10.0,
            "gaugeRewards": [{ "apy": 1.5 }, { "apy": 2.0 }, { "symbol": "X" }]
        }))
        .unwrap();
        assert_eq!(r.extra_rewards_apy(), 3.5);
        assert_eq!(r.join_key(), "0xab");

        let none: PoolLiquidityRecord = serde_json::from_value(json!({ "gaugeRewards": null })).unwrap();
        assert_eq!(none.extra_rewards_apy(), 0.0);
        assert_eq!(none.join_key(), "");
    }

    #[test]
    fn test_total_apy_range_treats_null_as_zero() {
        assert_eq!(total_apy_range([Some(5.0), Some(6.0)], 3.0), [8.0, 9.0]);
        assert_eq!(total_apy_range([None, Some(6.0)], 1.0), [1.0, 7.0]);
    }
}
