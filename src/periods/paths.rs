use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PeriodPaths {
    pub home_dir: PathBuf,
    pub config_path: PathBuf,
    pub state_file: PathBuf,
    pub lock_file: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<PeriodPaths> {
    let home = required_home_dir()?;
    let home_dir = env_or_default_path("PF_HOME", home.join(".pf-periods"));

    let config_path = env_or_default_path("PF_CONFIG_PATH", home_dir.join("config.toml"));
    let state_file = env_or_default_path("PF_STATE_FILE", home_dir.join("state.json"));
    let lock_file = home_dir.join("sync.lock");

    Ok(PeriodPaths {
        home_dir,
        config_path,
        state_file,
        lock_file,
    })
}
