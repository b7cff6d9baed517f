pub mod api;
mod http;
pub mod models;

use anyhow::Result;
use applet_core::model::ServerRepo;
use models::DownloadInfo;

/// Where the repo tree gets the account's repo listing and download details.
pub trait RepoSource {
    fn list_repos(&self) -> Result<Vec<ServerRepo>>;
    fn download_info(&self, repo_id: &str) -> Result<DownloadInfo>;
}
