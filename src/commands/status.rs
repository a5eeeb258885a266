use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::periods::config::load_config;
use crate::periods::paths::resolve_paths;
use crate::periods::state;

include!(concat!(env!("OUT_DIR"), "/pf_env_allowlist.rs"));

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build={}", env!("BUILD_UUID")));
    report.detail(format!("config_path={}", paths.config_path.display()));
    report.detail(format!("state_file={}", paths.state_file.display()));

    let cfg = load_config(&paths)?;
    report.detail(format!("store_url={}", cfg.store.url));
    report.detail(format!("database={}", cfg.store.database));
    report.detail(format!("timeout_secs={}", cfg.store.timeout_secs));
    report.detail(format!(
        "duration_cap_secs={}",
        cfg.integrity.duration_cap_secs
    ));
    report.detail(format!("overlap_policy={}", cfg.integrity.overlap_policy));
    report.detail(format!("duration_policy={}", cfg.integrity.duration_policy));
    report.detail(format!("strict_offsets={}", cfg.integrity.strict_offsets));

    let sync_state = state::load(&paths)?;
    report.detail(format!(
        "last_sync_epoch_secs={}",
        sync_state.last_sync_epoch_secs
    ));
    if let Some(path) = &sync_state.last_source_path {
        report.detail(format!("last_source_path={path}"));
    }
    if let Some(count) = sync_state.last_record_count {
        report.detail(format!("last_record_count={count}"));
    }

    for key in GENERATED_PF_ENV_ALLOWLIST {
        if env::var_os(key).is_some() {
            report.detail(format!("env_override={key}"));
        }
    }

    Ok(report)
}
