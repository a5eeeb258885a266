use crate::periods::paths::PeriodPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncState {
    pub schema_version: u32,
    pub last_sync_epoch_secs: u64,
    pub last_source_path: Option<String>,
    pub last_source_digest: Option<String>,
    pub last_record_count: Option<usize>,
    pub database: Option<String>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            schema_version: 1,
            last_sync_epoch_secs: 0,
            last_source_path: None,
            last_source_digest: None,
            last_record_count: None,
            database: None,
        }
    }
}

pub fn epoch_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before UNIX_EPOCH")?
        .as_secs())
}

/// Hex SHA-256 of a source file, used to recognize an unchanged log
/// between syncs.
pub fn source_digest(path: &Path) -> Result<String> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&raw);
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn load(paths: &PeriodPaths) -> Result<SyncState> {
    let file = &paths.state_file;
    if !file.exists() {
        return Ok(SyncState::default());
    }

    let raw =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let parsed: SyncState = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    Ok(parsed)
}

pub fn save(paths: &PeriodPaths, state: &SyncState) -> Result<PathBuf> {
    let file = &paths.state_file;
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(state)?;
    fs::write(file, format!("{data}\n"))
        .with_context(|| format!("failed to write {}", file.display()))?;
    Ok(file.clone())
}
