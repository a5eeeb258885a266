use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

// Sync needs a live document store, so these tests only exercise the
// failure paths that stop before any write happens.

#[test]
fn sync_fails_cleanly_when_the_store_is_unreachable() {
    let tmp = tempdir().expect("tempdir");
    let log = tmp.path().join("worklog.org");
    fs::write(&log, "CLOCK: [2014-01-10 Fri 11:20]--[2014-01-10 Fri 12:20]\n").expect("write log");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .env("PF_STORE_URL", "http://127.0.0.1:1")
        .env("PF_STORE_TIMEOUT_SECS", "2")
        .arg("sync")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("document store unreachable"));
}

#[test]
fn sync_fails_before_contacting_the_store_on_a_bad_database_name() {
    let tmp = tempdir().expect("tempdir");
    let log = tmp.path().join("worklog.org");
    fs::write(&log, "CLOCK: [2014-01-10 Fri 11:20]--[2014-01-10 Fri 12:20]\n").expect("write log");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .env("PF_STORE_DATABASE", "Not-Valid")
        .arg("sync")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid database name"));
}

#[test]
fn sync_fails_when_the_log_file_is_missing() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .arg("sync")
        .arg(tmp.path().join("no-such.org"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
