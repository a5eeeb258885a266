use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::PathBuf;

use crate::commands::{CommandReport, attach_summary};
use crate::couch::server::CouchServer;
use crate::periods::config::load_config;
use crate::periods::paths::{PeriodPaths, resolve_paths};
use crate::periods::pipeline::collect_periods;
use crate::periods::span::SystemClock;
use crate::periods::state::{self, SyncState, epoch_now, source_digest};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub file: PathBuf,
    pub force: bool,
}

fn acquire_run_lock(paths: &PeriodPaths) -> Result<fs::File> {
    let lock = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&paths.lock_file)
        .with_context(|| format!("failed to open {}", paths.lock_file.display()))?;
    lock.try_lock_exclusive().with_context(|| {
        format!(
            "another sync holds the lock at {}",
            paths.lock_file.display()
        )
    })?;
    Ok(lock)
}

fn should_skip(state: &SyncState, digest: &str, database: &str, force: bool) -> bool {
    !force
        && state.last_source_digest.as_deref() == Some(digest)
        && state.database.as_deref() == Some(database)
}

pub fn run(opts: &SyncOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    fs::create_dir_all(&paths.home_dir)
        .with_context(|| format!("failed to create {}", paths.home_dir.display()))?;
    let _lock = acquire_run_lock(&paths)?;

    let cfg = load_config(&paths)?;
    let settings = cfg.integrity.settings()?;
    let database = cfg.store.database.as_str();

    let mut report = CommandReport::new("sync");
    report.detail(format!("file={}", opts.file.display()));
    report.detail(format!("database={database}"));

    let digest = source_digest(&opts.file)?;
    let mut sync_state = state::load(&paths)?;

    if should_skip(&sync_state, &digest, database, opts.force) {
        report.detail("source unchanged since last sync; nothing to do (use --force to resync)");
        return Ok(report);
    }

    let (records, summary) = collect_periods(&opts.file, &settings, &SystemClock)?;
    attach_summary(&mut report, &summary);

    let server = CouchServer::connect(&cfg.store)?;
    if !server.exists(database)? {
        server.create(database)?;
        report.detail(format!("created database {database}"));
    }

    let outcome = server.bulk_upsert(database, &records)?;
    report.detail(format!("stored={}", outcome.stored));
    for rejection in &outcome.rejected {
        report.issue(format!("store rejected {rejection}"));
    }

    sync_state.last_sync_epoch_secs = epoch_now()?;
    sync_state.last_source_path = Some(opts.file.display().to_string());
    sync_state.last_source_digest = Some(digest);
    sync_state.last_record_count = Some(records.len());
    sync_state.database = Some(database.to_string());
    let state_file = state::save(&paths, &sync_state)?;
    report.detail(format!("state_file={}", state_file.display()));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::should_skip;
    use crate::periods::state::SyncState;

    fn synced_state() -> SyncState {
        SyncState {
            last_source_digest: Some("abc".to_string()),
            database: Some("pf-periods".to_string()),
            ..SyncState::default()
        }
    }

    #[test]
    fn unchanged_source_skips_unless_forced() {
        let state = synced_state();
        assert!(should_skip(&state, "abc", "pf-periods", false));
        assert!(!should_skip(&state, "abc", "pf-periods", true));
    }

    #[test]
    fn changed_source_or_database_always_syncs() {
        let state = synced_state();
        assert!(!should_skip(&state, "def", "pf-periods", false));
        assert!(!should_skip(&state, "abc", "other-db", false));
        assert!(!should_skip(&SyncState::default(), "abc", "pf-periods", false));
    }
}
