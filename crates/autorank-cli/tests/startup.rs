//! Startup behaviour of the `autorank` binary.
//!
//! The service is never reachable here: the endpoint points at a closed local
//! port, so every run that gets as far as ranking fails there.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const UNREACHABLE: &str = "http://127.0.0.1:1/";

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "autorank_cli_test_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("failed to create temporary directory {dir:?}: {e}"));
    dir
}

fn write(dir: &Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).unwrap_or_else(|e| panic!("failed to write {path:?}: {e}"));
    path
}

fn autorank(catalog: &Path, credentials: &Path) -> Command {
    let mut cmd = Command::cargo_bin("autorank").expect("binary should be built");
    cmd.args(["--endpoint", UNREACHABLE, "--timeout-secs", "2"])
        .arg("--catalog")
        .arg(catalog)
        .arg("--credentials")
        .arg(credentials);
    cmd
}

#[test]
fn missing_credentials_file_is_fatal() {
    let dir = temp_dir("missing_credentials");
    let catalog = write(&dir, "cars.csv", "Model,Type,Extra\nGolf,Compact,x\n");

    autorank(&catalog, &dir.join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load credentials"));
}

#[test]
fn malformed_credentials_line_is_fatal() {
    let dir = temp_dir("malformed_credentials");
    let catalog = write(&dir, "cars.csv", "Model,Type,Extra\nGolf,Compact,x\n");
    let credentials = write(&dir, "secrets.txt", "no-colon-here\n");

    autorank(&catalog, &credentials)
        .assert()
        .failure()
        .stderr(predicate::str::contains("label:key"));
}

#[test]
fn missing_catalog_is_fatal() {
    let dir = temp_dir("missing_catalog");
    let credentials = write(&dir, "secrets.txt", "MyKey:abc123\n");

    autorank(&dir.join("absent.csv"), &credentials)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read catalog"));
}

#[test]
fn short_catalog_row_is_fatal() {
    let dir = temp_dir("short_row");
    let catalog = write(&dir, "cars.csv", "Model,Type,Features,Price\nGolf,Compact\n");
    let credentials = write(&dir, "secrets.txt", "MyKey:abc123\n");

    autorank(&catalog, &credentials)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 1 has 2 fields"));
}

#[test]
fn show_catalog_prints_actions_then_ranking_fails() {
    let dir = temp_dir("show_catalog");
    let catalog = write(
        &dir,
        "cars.csv",
        "Model,Type,Features,Price\nTiguan,SUV,Family,35000\nGolf,Compact,Sports,25000\n",
    );
    let credentials = write(&dir, "secrets.txt", "MyKey:abc123\n");

    autorank(&catalog, &credentials)
        .arg("--show-catalog")
        .write_stdin("2\n6\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"Tiguan\"").and(predicate::str::contains("\"Golf\"")))
        .stdout(predicate::str::contains("\"Price\"").not())
        .stdout(predicate::str::contains("Iteration: 1"))
        .stdout(predicate::str::contains("Context: Type = SUV, Features = Family"))
        .stderr(predicate::str::contains("Ranking request failed"));
}

#[test]
fn invalid_menu_input_defaults_before_ranking() {
    let dir = temp_dir("invalid_menu");
    let catalog = write(&dir, "cars.csv", "Model,Type,Features,Price\nPolo,Compact,Sports,20000\n");
    let credentials = write(&dir, "secrets.txt", "MyKey:abc123\n");

    autorank(&catalog, &credentials)
        .write_stdin("z\n0\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Setting feature value to Sedan."))
        .stdout(predicate::str::contains("Setting feature value to Compact."));
}
