use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn status_reports_defaults_without_any_config() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("database=pf-periods")
                .and(predicate::str::contains("overlap_policy=truncate"))
                .and(predicate::str::contains("duration_policy=discard"))
                .and(predicate::str::contains("duration_cap_secs=86400"))
                .and(predicate::str::contains("last_sync_epoch_secs=0")),
        );
}

#[test]
fn status_reflects_env_overrides() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .env("PF_STORE_DATABASE", "team-periods")
        .env("PF_DURATION_POLICY", "truncate")
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("database=team-periods")
                .and(predicate::str::contains("duration_policy=truncate"))
                .and(predicate::str::contains("env_override=PF_STORE_DATABASE"))
                .and(predicate::str::contains("env_override=PF_DURATION_POLICY")),
        );
}

#[test]
fn status_reads_the_config_file_under_pf_home() {
    let tmp = tempdir().expect("tempdir");
    let pf_home = tmp.path().join("pf-home");
    fs::create_dir_all(&pf_home).expect("mkdir pf-home");
    fs::write(
        pf_home.join("config.toml"),
        "[integrity]\nduration_cap_secs = 43200\noverlap_policy = \"discard\"\nduration_policy = \"discard\"\nstrict_offsets = false\n",
    )
    .expect("write config");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", &pf_home)
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("duration_cap_secs=43200")
                .and(predicate::str::contains("overlap_policy=discard")),
        );
}

#[test]
fn status_fails_on_an_unknown_policy_value() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pf-periods")
        .current_dir(tmp.path())
        .env("PF_HOME", tmp.path().join("pf-home"))
        .env("PF_OVERLAP_POLICY", "maybe")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlap policy"));
}
