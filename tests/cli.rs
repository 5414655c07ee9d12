//! Command line tests; all runs are offline and seeded

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn seo_forge() -> Command {
    let mut cmd = Command::cargo_bin("seo-forge").unwrap();
    for key in [
        "SEO_FORGE_PROBE_DELAY_MS",
        "SEO_FORGE_TREND_DELAY_MS",
        "SEO_FORGE_PROBE_TIMEOUT_SECS",
        "SEO_FORGE_TABLES",
        "SEO_FORGE_SEED",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd.args(["--offline", "--seed", "42"]);
    cmd
}

#[test]
fn test_seo_outputs_json_envelope() {
    seo_forge()
        .args(["seo", "gold", "--locale", "US", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"domain\": \"gold.com\""));
}

#[test]
fn test_same_seed_same_output() {
    let run = || {
        seo_forge()
            .args(["backlinks", "gold", "--locale", "US", "--min-backlinks", "500", "--limit", "10"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_empty_keyword_is_a_failure_payload() {
    seo_forge()
        .args(["seo", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_trends_falls_back_offline() {
    seo_forge()
        .args(["trends", "borsa", "--locale", "TR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_used\": \"related_estimates\""));
}

#[test]
fn test_check_without_network() {
    seo_forge()
        .args(["check", "altin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"domain\": \"altin.com\""))
        .stdout(predicate::str::contains("possibly available"));
}

#[test]
fn test_tables_file_overrides_extensions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[extensions]
default = ["com"]
DE = ["de"]
"#
    )
    .unwrap();

    seo_forge()
        .arg("--tables")
        .arg(file.path())
        .args(["seo", "gold", "--locale", "DE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"domain\": \"gold.de\""))
        .stdout(predicate::str::contains(".com\"").not());
}

#[test]
fn test_invalid_tables_file_exits_with_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[extensions]
DE = ["de"]
"#
    )
    .unwrap();

    seo_forge()
        .arg("--tables")
        .arg(file.path())
        .args(["seo", "gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default"));
}
