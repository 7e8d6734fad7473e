// domain-quote/tests/cli_integration.rs

//! CLI tests that never reach the registrar: help, argument validation and
//! `--dry-run` candidate expansion.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

/// Helper to create a test domains file
fn create_test_domains_file(lines: &[&str]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), lines.join("\n")).expect("Failed to write to temp file");
    file
}

fn domain_quote() -> Command {
    let mut cmd = Command::cargo_bin("domain-quote").unwrap();
    for var in [
        "DQ_CONCURRENCY",
        "DQ_TIMEOUT",
        "DQ_SUBSIDIARY",
        "DQ_SORT",
        "DQ_ASCENDING",
        "DQ_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_flags() {
    domain_quote()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--descending"))
        .stdout(predicate::str::contains("--hack"))
        .stdout(predicate::str::contains("--list-tlds"))
        .stdout(predicate::str::contains("--max-order"))
        .stdout(predicate::str::contains("--no-match"));
}

#[test]
fn test_no_input_is_an_error() {
    domain_quote()
        .arg("--no-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must specify domain names"));
}

#[test]
fn test_dry_run_normalizes_and_dedupes() {
    domain_quote()
        .args(["--no-config", "--dry-run", "Zeta.ES", "alpha.com", "zeta.es"])
        .assert()
        .success()
        .stdout("alpha.com\nzeta.es\n");
}

#[test]
fn test_dry_run_expands_bare_names_with_explicit_tlds() {
    domain_quote()
        .args(["--no-config", "--dry-run", "mybrand", "-t", "es,com", "-t", "org"])
        .assert()
        .success()
        .stdout("mybrand.com\nmybrand.es\nmybrand.org\n");
}

#[test]
fn test_dry_run_domain_hacks() {
    domain_quote()
        .args(["--no-config", "--dry-run", "--hack", "delicious", "-t", "us,es"])
        .assert()
        .success()
        .stdout("delicio.us\n");
}

#[test]
fn test_dry_run_reads_file_with_comments() {
    let file = create_test_domains_file(&["# my list", "first.es", "", "second.com # inline"]);

    domain_quote()
        .args(["--no-config", "--dry-run", "-f"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("first.es\nsecond.com\n");
}

#[test]
fn test_dry_run_reads_stdin() {
    domain_quote()
        .args(["--no-config", "--dry-run", "-f", "-"])
        .write_stdin("b.es\na.es\n")
        .assert()
        .success()
        .stdout("a.es\nb.es\n");
}

#[test]
fn test_invalid_domains_are_skipped() {
    domain_quote()
        .args(["--no-config", "--dry-run", "bad_name.com", "good.com"])
        .assert()
        .success()
        .stdout("good.com\n");

    domain_quote()
        .args(["--no-config", "--dry-run", "exa mple.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid domains to check"));
}

#[test]
fn test_missing_file() {
    domain_quote()
        .args(["--no-config", "--dry-run", "-f", "/definitely/not/here.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_argument_validation() {
    domain_quote()
        .args(["--no-config", "x.com", "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));

    domain_quote()
        .args(["--no-config", "x.com", "--sort", "cheapest"])
        .assert()
        .failure();

    domain_quote()
        .args(["--no-config", "x.com", "--precision", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Precision must be at most 8"));

    domain_quote()
        .args(["--no-config", "x.com", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));

    domain_quote()
        .args(["--no-config", "x.com", "--max-renew", "-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-renew may not be negative"));
}

#[test]
fn test_conflicting_flags() {
    domain_quote()
        .args(["--list-tlds", "x.com"])
        .assert()
        .failure();

    domain_quote()
        .args(["x.com", "--config", "a.toml", "--no-config"])
        .assert()
        .failure();
}

#[test]
fn test_explicit_config_file() {
    let config = NamedTempFile::new().unwrap();
    fs::write(
        config.path(),
        "[defaults]\nconcurrency = 4\nsubsidiary = \"FR\"\n\n[sorting]\nkey = \"price\"\n",
    )
    .unwrap();

    domain_quote()
        .args(["--dry-run", "x.com", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout("x.com\n");
}

#[test]
fn test_invalid_config_file() {
    let config = NamedTempFile::new().unwrap();
    fs::write(config.path(), "[defaults]\nconcurrency = 500\n").unwrap();

    domain_quote()
        .args(["--dry-run", "x.com", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_config_file_from_environment() {
    let config = NamedTempFile::new().unwrap();
    fs::write(config.path(), "this is = not [valid toml").unwrap();

    domain_quote()
        .args(["--dry-run", "x.com"])
        .env("DQ_CONFIG", config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}
