use crate::account::Account;
use anyhow::Context;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DAEMON_CONFIG_FILE: &str = "daemon.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_sync: default_auto_sync(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_auto_sync() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    5
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub daemon_dir: Option<PathBuf>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub current_account: Option<usize>,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    pub fn daemon_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.daemon_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_daemon_dir(),
        }
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current_account
            .and_then(|index| self.accounts.get(index))
            .or_else(|| self.accounts.first())
    }

    /// Adds or replaces the account for the same server and user, and makes it
    /// the current one.
    pub fn upsert_account(&mut self, account: Account) {
        let existing = self.accounts.iter().position(|candidate| {
            candidate.server_url == account.server_url && candidate.username == account.username
        });
        let index = match existing {
            Some(index) => {
                self.accounts[index] = account;
                index
            }
            None => {
                self.accounts.push(account);
                self.accounts.len() - 1
            }
        };
        self.current_account = Some(index);
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load daemon config dir {}: {source}", dir.display())]
    Read {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse daemon config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct DaemonConfigFile {
    sync_socket: Option<PathBuf>,
    peer_socket: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

/// Connection parameters for the local daemon, read from its config dir.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonConfig {
    pub dir: PathBuf,
    pub sync_socket: PathBuf,
    pub peer_socket: PathBuf,
    pub timeout_secs: u64,
}

impl DaemonConfig {
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let read_err = |source| ConfigError::Read {
            dir: dir.to_path_buf(),
            source,
        };
        let meta = fs::metadata(dir).map_err(read_err)?;
        if !meta.is_dir() {
            return Err(read_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let path = dir.join(DAEMON_CONFIG_FILE);
        let file = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => DaemonConfigFile::default(),
            Err(err) => return Err(read_err(err)),
        };

        let resolve = |value: Option<PathBuf>, default: &str| {
            let value = value.unwrap_or_else(|| PathBuf::from(default));
            if value.is_absolute() {
                value
            } else {
                dir.join(value)
            }
        };
        Ok(Self {
            dir: dir.to_path_buf(),
            sync_socket: resolve(file.sync_socket, "sync.sock"),
            peer_socket: resolve(file.peer_socket, "peer.sock"),
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "sync-applet", "sync-applet").context("resolve project dirs")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn default_daemon_dir() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("daemon"))
}

pub fn default_download_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_app_config_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load(&tmp.path().join("config.json")).unwrap();
        assert!(config.settings.auto_sync);
        assert!(config.accounts.is_empty());
        assert!(config.current_account().is_none());
    }

    #[test]
    fn app_config_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.settings.auto_sync = false;
        config.upsert_account(Account::new("https://example.com", "me@example.com", "t").unwrap());
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert!(!loaded.settings.auto_sync);
        assert_eq!(loaded.current_account().unwrap().username, "me@example.com");
    }

    #[test]
    fn upsert_replaces_matching_account() {
        let mut config = AppConfig::default();
        config.upsert_account(Account::new("https://a.example.com", "me", "old").unwrap());
        config.upsert_account(Account::new("https://b.example.com", "me", "b").unwrap());
        config.upsert_account(Account::new("https://a.example.com", "me", "new").unwrap());
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.current_account, Some(0));
        assert_eq!(config.current_account().unwrap().token, "new");
    }

    #[test]
    fn daemon_config_defaults_to_sockets_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config = DaemonConfig::load(tmp.path()).unwrap();
        assert_eq!(config.sync_socket, tmp.path().join("sync.sock"));
        assert_eq!(config.peer_socket, tmp.path().join("peer.sock"));
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn daemon_config_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DAEMON_CONFIG_FILE),
            r#"{"sync_socket": "run/s.sock", "peer_socket": "/tmp/p.sock", "timeout_secs": 3}"#,
        )
        .unwrap();
        let config = DaemonConfig::load(tmp.path()).unwrap();
        assert_eq!(config.sync_socket, tmp.path().join("run/s.sock"));
        assert_eq!(config.peer_socket, PathBuf::from("/tmp/p.sock"));
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn missing_daemon_dir_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = DaemonConfig::load(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("failed to load daemon config dir"));
    }

    #[test]
    fn malformed_daemon_config_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DAEMON_CONFIG_FILE), "{not json").unwrap();
        let err = DaemonConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
