//! Persistence of the scored pool list

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::pool::ScoredPool;
use crate::shared::errors::PersistError;

/// Writes scored pools as a pretty-printed JSON array
pub struct ResultWriter;

impl ResultWriter {
    pub fn to_json(pools: &[ScoredPool]) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(pools)?)
    }

    pub fn save(path: &Path, pools: &[ScoredPool]) -> Result<(), PersistError> {
        let json = Self::to_json(pools)?;
        fs::write(path, json).map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} pools to {}", pools.len(), path.display());
        Ok(())
    }
}
