use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tubemod() -> Command {
    let mut cmd = Command::cargo_bin("tubemod").unwrap();
    cmd.env_remove("TUBEMOD_STORE_URL")
        .env_remove("TUBEMOD_SESSION")
        .env_remove("TUBEMOD_CLASSIFIER_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    tubemod()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("moderate"));
}

#[test]
fn test_config_init_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    tubemod()
        .args(["config", "init", "--force", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    tubemod()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All values valid"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[review]\npage_size = 500\n").unwrap();

    tubemod()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size"));
}

#[test]
fn test_moderate_requires_ids() {
    tubemod().args(["moderate", "v1"]).assert().failure();
}

#[test]
fn test_unreachable_store_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[store]\nbase_url = \"http://127.0.0.1:1\"\nsession_cookie = \"abc\"\ntimeout_secs = 2\n",
    )
    .unwrap();

    tubemod()
        .args(["whoami", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Network error"));
}

#[test]
fn test_logout_without_cookie_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[store]\nbase_url = \"http://127.0.0.1:1\"\n").unwrap();

    tubemod()
        .args(["logout", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to log out"));
}

#[test]
fn test_zero_timeout_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[store]\ntimeout_secs = 0\n").unwrap();

    tubemod()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}
