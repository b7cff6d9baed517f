use crate::bag::PropertyBag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub state: String,
    pub error: Option<String>,
}

impl SyncInfo {
    pub fn label(&self) -> String {
        match self.error.as_deref() {
            Some(error) if !error.is_empty() => format!("{} ({error})", self.state),
            _ => self.state.clone(),
        }
    }
}

/// A repo the daemon knows about on this machine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalRepo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub worktree: PathBuf,
    pub auto_sync: bool,
    pub encrypted: bool,
    pub relay_id: String,
    pub last_modified: i64,
    pub sync_info: SyncInfo,
}

impl LocalRepo {
    pub fn from_bag(bag: &PropertyBag) -> Self {
        Self {
            id: bag.str_or_default("id"),
            name: bag.str_or_default("name"),
            description: bag.str_or_default("desc"),
            worktree: PathBuf::from(bag.str_or_default("worktree")),
            auto_sync: bag.bool_or_default("auto_sync"),
            encrypted: bag.bool_or_default("encrypted"),
            relay_id: bag.str_or_default("relay_id"),
            last_modified: bag.int_or_default("last_modify"),
            sync_info: SyncInfo::default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn set_sync_info(&mut self, state: impl Into<String>, error: Option<String>) {
        self.sync_info = SyncInfo {
            state: state.into(),
            error,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RepoCategory {
    Mine,
    Shared,
    Group(String),
}

impl RepoCategory {
    pub fn label(&self) -> String {
        match self {
            RepoCategory::Mine => "My Libraries".to_string(),
            RepoCategory::Shared => "Shared Libraries".to_string(),
            RepoCategory::Group(name) => name.clone(),
        }
    }
}

impl fmt::Display for RepoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A repo as listed by the account's server, whether or not it exists locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerRepo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub encrypted: bool,
    pub size: u64,
    pub mtime: u64,
    pub category: RepoCategory,
}
