// tests/config_test.rs
use flowtest::config::{load_config, Config};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.trunk, "master");
    assert_eq!(config.remote, "origin");
    assert_eq!(
        config.git_config.get("user.name"),
        Some(&"flowtest".to_string())
    );
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
remote_url = "/srv/git/flowtest.git"
workdir = "/tmp/flowtest-demo"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.remote_url, "/srv/git/flowtest.git");
    assert_eq!(config.workdir, PathBuf::from("/tmp/flowtest-demo"));
    assert_eq!(config.trunk, "master");
    assert!(config.git_config.contains_key("tag.gpgsign"));
}

#[test]
fn test_load_fixture() {
    let config = load_config(Some(&fixture("flowtest.toml"))).expect("Failed to load test config");
    assert_eq!(config.remote, "upstream");
    assert_eq!(config.trunk, "main");
    assert_eq!(config.workdir, PathBuf::from("demo"));
    assert_eq!(config.git_config.len(), 2);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    assert!(load_config(Some(&fixture("does-not-exist.toml"))).is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"trunk = [unterminated").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("Cannot parse configuration"));
}

#[test]
#[serial]
fn test_config_in_current_directory_is_found() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("flowtest.toml"), "trunk = \"develop\"\n").unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(config.unwrap().trunk, "develop");
}

#[test]
#[serial]
fn test_fixture_found_while_current_directory_moves() {
    let dir = TempDir::new().unwrap();
    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(Some(&fixture("flowtest.toml")));
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(config.unwrap().trunk, "main");
}
