use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Represents the complete configuration for flowtest.
///
/// Contains the remote to publish to, the trunk branch name, the working
/// directory the demonstration repository is created in, and the local git
/// settings applied right after `git init`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_trunk")]
    pub trunk: String,

    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    #[serde(default = "default_git_config")]
    pub git_config: BTreeMap<String, String>,
}

fn default_remote_url() -> String {
    "git@github.com:legdba/flowtest.git".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_trunk() -> String {
    "master".to_string()
}

fn default_workdir() -> PathBuf {
    PathBuf::from("flowtest")
}

/// Returns the local git settings applied to the new repository.
///
/// Identity is set so commits never depend on the caller's global config, and
/// signing is off so no step ever waits on a passphrase prompt.
fn default_git_config() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("user.name".to_string(), "flowtest".to_string());
    map.insert("user.email".to_string(), "flowtest@localhost".to_string());
    map.insert("commit.gpgsign".to_string(), "false".to_string());
    map.insert("tag.gpgsign".to_string(), "false".to_string());
    map
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote_url: default_remote_url(),
            remote: default_remote(),
            trunk: default_trunk(),
            workdir: default_workdir(),
            git_config: default_git_config(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `flowtest.toml` in current directory
/// 3. `.flowtest.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./flowtest.toml").exists() {
        fs::read_to_string("./flowtest.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".flowtest.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
