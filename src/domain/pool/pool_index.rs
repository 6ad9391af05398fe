//! Address-keyed lookups over the pools snapshot

use std::collections::HashMap;

use super::PoolLiquidityRecord;

/// Liquidity and extra-reward lookups keyed by lower-cased pool address.
/// Misses resolve to zero.
#[derive(Debug, Clone, Default)]
pub struct LiquidityIndex {
    usd_totals: HashMap<String, f64>,
    extra_rewards: HashMap<String, f64>,
}

impl LiquidityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records with the same address replace earlier ones
    pub fn from_records(records: &[PoolLiquidityRecord]) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    pub fn insert(&mut self, record: &PoolLiquidityRecord) {
        let key = record.join_key();
        self.usd_totals
            .insert(key.clone(), record.usd_total.unwrap_or(0.0));
        self.extra_rewards.insert(key, record.extra_rewards_apy());
    }

    pub fn usd_total(&self, address: &str) -> f64 {
        self.usd_totals
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn extra_rewards_apy(&self, address: &str) -> f64 {
        self.extra_rewards
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.usd_totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usd_totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<PoolLiquidityRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = LiquidityIndex::from_records(&records(json!([
            { "address": "0xAbCd", "usdTotal": 6000000.0, "gaugeRewards": [{ "apy": 3.0 }] }
        ])));

        assert_eq!(index.usd_total("0xabcd"), 6_000_000.0);
        assert_eq!(index.usd_total("0xABCD"), 6_000_000.0);
        assert_eq!(index.extra_rewards_apy("0XABCD"), 3.0);
    }

    #[test]
    fn test_misses_default_to_zero() {
        let index = LiquidityIndex::from_records(&records(json!([
            { "address": "0x01" }
        ])));

        assert_eq!(index.len(), 1);
        assert_eq!(index.usd_total("0x01"), 0.0);
        assert_eq!(index.extra_rewards_apy("0x01"), 0.0);
        assert_eq!(index.usd_total("0xmissing"), 0.0);
        assert_eq!(index.extra_rewards_apy("0xmissing"), 0.0);
    }

    #[test]
    fn test_duplicate_address_keeps_last() {
        let index = LiquidityIndex::from_records(&records(json!([
            { "address": "0x01", "usdTotal": 1.0, "gaugeRewards": [{ "apy": 1.0 }] },
            { "address": "0X01", "usdTotal": 2.0 }
        ])));

        assert_eq!(index.len(), 1);
        assert_eq!(index.usd_total("0x01"), 2.0);
        assert_eq!(index.extra_rewards_apy("0x01"), 0.0);
    }

    #[test]
    fn test_empty_index() {
        let index = LiquidityIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.usd_total(""), 0.0);
    }
}
