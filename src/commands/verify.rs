use anyhow::Result;

use crate::commands::CommandReport;
use crate::couch::server::CouchServer;
use crate::periods::config::load_config;
use crate::periods::paths::resolve_paths;
use crate::periods::state;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let database = cfg.store.database.as_str();

    let mut report = CommandReport::new("verify");
    report.detail(format!("store_url={}", cfg.store.url));
    report.detail(format!("database={database}"));

    let server = CouchServer::connect(&cfg.store)?;
    match server.ping() {
        Ok(version) => report.detail(format!("store_version={version}")),
        Err(err) => {
            report.issue(format!("store unreachable: {err:#}"));
            return Ok(report);
        }
    }

    if !server.exists(database)? {
        report.issue(format!("database {database} does not exist; run `sync` first"));
        return Ok(report);
    }

    let count = server.doc_count(database)?;
    report.detail(format!("doc_count={count}"));

    let sync_state = state::load(&paths)?;
    if let Some(expected) = sync_state.last_record_count {
        if (count as usize) < expected {
            report.issue(format!(
                "doc_count {count} is below the {expected} records stored by the last sync"
            ));
        } else {
            report.detail(format!("covers the {expected} records from the last sync"));
        }
    }

    Ok(report)
}
