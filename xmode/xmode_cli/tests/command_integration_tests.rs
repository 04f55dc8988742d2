use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn xmode() -> Command {
    let mut cmd = Command::cargo_bin("xmode").expect("Failed to find xmode binary");
    cmd.env_remove("XMODE_CONFIG");
    cmd
}

#[test]
fn test_eval_literal_scenarios() {
    xmode()
        .args(["eval", "700", "g+x"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("710 rwx--x---"));

    xmode()
        .args(["eval", "510", "ugo-x"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("400 "));

    xmode()
        .args(["eval", "756", "=r"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("444 r--r--r--"));
}

#[test]
fn test_eval_accepts_rwx_base_and_leading_operator() {
    xmode()
        .args(["eval", "rw-r--r--", "-r,u+x"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("300 -wx------"));
}

#[test]
fn test_eval_rejects_malformed_expression() {
    xmode()
        .args(["eval", "644", "zz+x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid expression"));
}

#[test]
fn test_set_rejects_malformed_mode_before_touching_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "notes").unwrap();

    xmode()
        .arg("set")
        .arg("u+q")
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn test_get_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();

    xmode()
        .arg("get")
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent"));
}

#[test]
fn test_unreadable_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("xmode.toml");
    fs::write(&config, "other_principal = [1, 2]").unwrap();

    xmode()
        .arg("--config")
        .arg(&config)
        .args(["eval", "644", "u+x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn test_set_and_get_round_trip() {
    // Native modes only exist on unix hosts
    if cfg!(not(unix)) {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("deploy.sh");
    fs::write(&file, "#!/bin/sh\n").unwrap();

    xmode().arg("set").arg("755").arg(&file).assert().success();

    xmode()
        .arg("get")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("755 rwxr-xr-x file"));

    xmode().arg("set").arg("go-rx").arg(&file).assert().success();

    xmode()
        .arg("get")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("700 "));
}

#[test]
fn test_recursive_set_with_directory_mode() {
    if cfg!(not(unix)) {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    fs::create_dir_all(a.join("b")).unwrap();
    fs::write(a.join("file1"), "1").unwrap();
    fs::write(a.join("b").join("file2"), "2").unwrap();

    xmode()
        .args(["set", "-R", "--dir-mode", "700", "600"])
        .arg(&a)
        .assert()
        .success();

    xmode()
        .arg("get")
        .arg(&a)
        .arg(a.join("b"))
        .arg(a.join("file1"))
        .arg(a.join("b").join("file2"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("700 rwx------ directory")
                .and(predicate::str::contains("600 rw------- file")),
        );
}
