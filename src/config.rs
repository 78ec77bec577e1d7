use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::git::remote::Account;
use crate::theme::Theme;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountEntry {
    pub host: String,
    pub login: String,
}

#[derive(Debug, Clone)]
pub struct StagediffConfig {
    pub theme: Theme,
    pub ignore_whitespace: Option<bool>,
    /// Last directory a repository was cloned into; the clone dialog
    /// derives its default destination from this.
    pub default_clone_dir: Option<PathBuf>,
    pub accounts: Vec<Account>,
}

impl Default for StagediffConfig {
    fn default() -> Self {
        Self {
            theme: Theme::from_name("one-dark"),
            ignore_whitespace: None,
            default_clone_dir: None,
            accounts: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    ignore_whitespace: Option<bool>,
    #[serde(default)]
    default_clone_dir: Option<PathBuf>,
    #[serde(default)]
    accounts: Vec<AccountEntry>,
}

fn config_path() -> PathBuf {
    let mut path = home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("stagediff");
    path.push("config.toml");
    path
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/stagediff/config.toml`, falling back to
/// defaults when the file is missing or unparseable.
pub fn load_config() -> StagediffConfig {
    let contents = match std::fs::read_to_string(config_path()) {
        Ok(c) => c,
        Err(_) => return StagediffConfig::default(),
    };

    let file: ConfigFile = match toml::from_str(&contents) {
        Ok(f) => f,
        Err(_) => return StagediffConfig::default(),
    };

    StagediffConfig {
        theme: Theme::from_name(file.theme.as_deref().unwrap_or("one-dark")),
        ignore_whitespace: file.ignore_whitespace,
        default_clone_dir: file.default_clone_dir,
        accounts: file
            .accounts
            .into_iter()
            .map(|a| Account {
                host: a.host,
                login: a.login,
            })
            .collect(),
    }
}

/// The directory the clone dialog should offer. Falls back to the last
/// used one, then `~/src`, then the current directory.
pub fn default_clone_dir(config: &StagediffConfig) -> PathBuf {
    config
        .default_clone_dir
        .clone()
        .or_else(|| home_dir().map(|h| h.join("src")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Persist the last-used clone directory, leaving every other key in the
/// config file untouched.
pub fn save_default_clone_dir(dir: &Path) {
    let path = config_path();

    let mut table = if let Ok(contents) = std::fs::read_to_string(&path) {
        contents
            .parse::<toml::Table>()
            .unwrap_or_else(|_| toml::Table::new())
    } else {
        toml::Table::new()
    };

    table.insert(
        "default_clone_dir".to_string(),
        toml::Value::String(dir.to_string_lossy().into_owned()),
    );

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let toml_string = toml::to_string_pretty(&table).unwrap_or_default();
    let _ = std::fs::write(&path, toml_string);
}
