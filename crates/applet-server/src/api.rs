use crate::RepoSource;
use crate::http::send_with_retry;
use crate::models::{DownloadInfo, RepoItem};
use anyhow::{Context, bail};
use applet_core::account::Account;
use applet_core::model::ServerRepo;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the account's web API (`/api2/...`).
pub struct ServerApi {
    client: Client,
    account: Account,
}

impl ServerApi {
    pub fn new(account: Account) -> anyhow::Result<Self> {
        if !account.is_valid() {
            bail!(
                "account {} on {} has no usable server url or token",
                account.username,
                account.server_url
            );
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self { client, account })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    fn get(&self, path: &str) -> anyhow::Result<Response> {
        let url = self.account.api_url(path);
        let auth = format!("Token {}", self.account.token);
        send_with_retry(|| {
            self.client
                .get(url.clone())
                .header(AUTHORIZATION, auth.as_str())
                .header(ACCEPT, "application/json")
        })
        .with_context(|| format!("GET {url}"))
    }
}

impl RepoSource for ServerApi {
    fn list_repos(&self) -> anyhow::Result<Vec<ServerRepo>> {
        info!(server = %self.account.server_url, "listing server repos");
        let items: Vec<RepoItem> = self
            .get("repos/")?
            .json()
            .context("decode repos response")?;
        Ok(items.into_iter().map(RepoItem::into_server_repo).collect())
    }

    fn download_info(&self, repo_id: &str) -> anyhow::Result<DownloadInfo> {
        info!(repo_id, "fetching download info");
        self.get(&format!("repos/{repo_id}/download-info/"))?
            .json()
            .context("decode download info")
    }
}
