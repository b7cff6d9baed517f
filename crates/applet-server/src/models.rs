use applet_core::client::DownloadRequest;
use applet_core::model::{RepoCategory, ServerRepo};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub(crate) struct RepoItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) desc: String,
    #[serde(default)]
    pub(crate) owner: String,
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub(crate) encrypted: bool,
    #[serde(default)]
    pub(crate) size: u64,
    #[serde(default)]
    pub(crate) mtime: u64,
    #[serde(default)]
    pub(crate) group_name: Option<String>,
}

impl RepoItem {
    fn category(&self) -> RepoCategory {
        match self.kind.as_str() {
            "srepo" => RepoCategory::Shared,
            // Group repos carry the group as owner on older servers.
            "grepo" => RepoCategory::Group(
                self.group_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| self.owner.clone()),
            ),
            _ => RepoCategory::Mine,
        }
    }

    pub(crate) fn into_server_repo(self) -> ServerRepo {
        let category = self.category();
        ServerRepo {
            id: self.id,
            name: self.name,
            description: self.desc,
            owner: self.owner,
            encrypted: self.encrypted,
            size: self.size,
            mtime: self.mtime,
            category,
        }
    }
}

/// What the server hands out so the daemon can fetch a repo.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DownloadInfo {
    pub repo_id: String,
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub relay_id: String,
    #[serde(default)]
    pub relay_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub relay_port: String,
    #[serde(default)]
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub magic: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub encrypted: bool,
}

impl DownloadInfo {
    /// Builds the daemon request. Password and magic only travel for
    /// encrypted repos.
    pub fn into_request(self, worktree: &Path, password: Option<String>) -> DownloadRequest {
        let (password, magic) = if self.encrypted {
            (password.filter(|value| !value.is_empty()), self.magic)
        } else {
            (None, None)
        };
        DownloadRequest {
            repo_id: self.repo_id,
            relay_id: self.relay_id,
            name: self.repo_name,
            worktree: worktree.display().to_string(),
            token: self.token,
            password,
            magic,
            peer_addr: self.relay_addr,
            port: self.relay_port,
            email: self.email,
        }
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(value) => value,
        Value::Number(value) => value.as_i64().is_some_and(|value| value != 0),
        Value::String(value) => matches!(value.as_str(), "true" | "1"),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Number(value) => value.to_string(),
        _ => String::new(),
    })
}
