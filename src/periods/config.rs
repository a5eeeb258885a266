use crate::couch::server::is_valid_database_name;
use crate::error::PeriodError;
use crate::periods::guard::{DEFAULT_DURATION_CAP_SECS, DurationPolicy};
use crate::periods::overlap::OverlapPolicy;
use crate::periods::paths::PeriodPaths;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5984".to_string(),
            database: "pf-periods".to_string(),
            username: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    pub duration_cap_secs: i64,
    pub overlap_policy: String,
    pub duration_policy: String,
    pub strict_offsets: bool,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            duration_cap_secs: DEFAULT_DURATION_CAP_SECS,
            overlap_policy: "truncate".to_string(),
            duration_policy: "discard".to_string(),
            strict_offsets: false,
        }
    }
}

/// The integrity knobs in their validated, typed form. Built once at
/// configuration time; the pipeline never re-checks policy values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegritySettings {
    pub overlap: OverlapPolicy,
    pub duration: DurationPolicy,
    pub duration_cap_secs: i64,
    pub strict_offsets: bool,
}

impl Default for IntegritySettings {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::default(),
            duration: DurationPolicy::default(),
            duration_cap_secs: DEFAULT_DURATION_CAP_SECS,
            strict_offsets: false,
        }
    }
}

impl IntegrityConfig {
    pub fn settings(&self) -> Result<IntegritySettings, PeriodError> {
        Ok(IntegritySettings {
            overlap: self.overlap_policy.parse()?,
            duration: self.duration_policy.parse()?,
            duration_cap_secs: self.duration_cap_secs,
            strict_offsets: self.strict_offsets,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PeriodsConfig {
    pub store: StoreConfig,
    pub integrity: IntegrityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialPeriodsConfig {
    store: Option<StoreConfig>,
    integrity: Option<IntegrityConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_i64(var: &str, fallback: i64) -> i64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<i64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            match trimmed {
                "1" | "true" | "TRUE" | "yes" | "on" => true,
                "0" | "false" | "FALSE" | "no" | "off" => false,
                _ => fallback,
            }
        }
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_opt_string(var: &str, fallback: Option<String>) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => fallback,
    }
}

fn validate(cfg: &PeriodsConfig) -> Result<()> {
    if cfg.store.url.trim().is_empty() {
        return Err(anyhow!("invalid store url: cannot be empty"));
    }
    if !is_valid_database_name(&cfg.store.database) {
        return Err(anyhow!(
            "invalid database name `{}`: must start with a lowercase letter and use [a-z0-9_$()+/-]",
            cfg.store.database
        ));
    }
    if cfg.store.timeout_secs == 0 {
        return Err(anyhow!("invalid store timeout: must be >= 1 second"));
    }
    if cfg.integrity.duration_cap_secs < 1 {
        return Err(anyhow!("invalid duration cap: must be >= 1 second"));
    }
    cfg.integrity.settings()?;
    Ok(())
}

fn merge_file_config(base: &mut PeriodsConfig, paths: &PeriodPaths) -> Result<()> {
    if !paths.config_path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&paths.config_path)?;
    let parsed: PartialPeriodsConfig = toml::from_str(&raw).map_err(|err| {
        anyhow!(
            "failed to parse config {}: {err}",
            paths.config_path.display()
        )
    })?;
    if let Some(store) = parsed.store {
        base.store = store;
    }
    if let Some(integrity) = parsed.integrity {
        base.integrity = integrity;
    }
    Ok(())
}

pub fn load_config(paths: &PeriodPaths) -> Result<PeriodsConfig> {
    let mut cfg = PeriodsConfig::default();
    merge_file_config(&mut cfg, paths)?;

    cfg.store.url = env_or_string("PF_STORE_URL", &cfg.store.url);
    cfg.store.database = env_or_string("PF_STORE_DATABASE", &cfg.store.database);
    cfg.store.username = env_or_opt_string("PF_STORE_USERNAME", cfg.store.username.take());
    cfg.store.password = env_or_opt_string("PF_STORE_PASSWORD", cfg.store.password.take());
    cfg.store.timeout_secs = env_or_u64("PF_STORE_TIMEOUT_SECS", cfg.store.timeout_secs);
    cfg.integrity.duration_cap_secs =
        env_or_i64("PF_DURATION_CAP_SECS", cfg.integrity.duration_cap_secs);
    cfg.integrity.overlap_policy = env_or_string("PF_OVERLAP_POLICY", &cfg.integrity.overlap_policy);
    cfg.integrity.duration_policy =
        env_or_string("PF_DURATION_POLICY", &cfg.integrity.duration_policy);
    cfg.integrity.strict_offsets = env_or_bool("PF_STRICT_OFFSETS", cfg.integrity.strict_offsets);

    validate(&cfg)?;
    Ok(cfg)
}
