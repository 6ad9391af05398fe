//! Loading of the gauges and pools JSON snapshots

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::pool::{GaugeSnapshot, PoolSnapshot};
use crate::shared::errors::LoadError;

const GAUGES: &str = "gauges";
const POOLS: &str = "all-pools";

/// Reads `{ "success": true, "data": ... }` snapshot documents
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Gauges document: `data` is a mapping of pool name to gauge record
    pub fn load_gauges(path: &Path) -> Result<GaugeSnapshot, LoadError> {
        let data = Self::read_payload(path, GAUGES)?;
        let Value::Object(map) = data else {
            return Err(LoadError::InvalidShape {
                kind: GAUGES,
                path: path.to_path_buf(),
                reason: "`data` is not an object".to_string(),
            });
        };

        let snapshot = GaugeSnapshot::from_map(map);
        info!("Loaded {} gauge entries from {}", snapshot.len(), path.display());
        Ok(snapshot)
    }

    /// Pools document: `data.poolData` is a list of liquidity records
    pub fn load_pools(path: &Path) -> Result<PoolSnapshot, LoadError> {
        let data = Self::read_payload(path, POOLS)?;
        let snapshot: PoolSnapshot =
            serde_json::from_value(data).map_err(|e| LoadError::InvalidShape {
                kind: POOLS,
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded {} pool liquidity records from {}",
            snapshot.pool_data.len(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Parse the envelope and hand back its `data` payload
    fn read_payload(path: &Path, kind: &'static str) -> Result<Value, LoadError> {
        debug!("Reading {} snapshot {}", kind, path.display());
        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let document: Value =
            serde_json::from_str(&contents).map_err(|source| LoadError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;

        let shape_error = |reason: &str| LoadError::InvalidShape {
            kind,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let Value::Object(mut envelope) = document else {
            return Err(shape_error("top level is not an object"));
        };
        if envelope.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(shape_error("`success` flag missing or false"));
        }
        envelope
            .remove("data")
            .ok_or_else(|| shape_error("`data` payload missing"))
    }
}
