use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub server_url: Url,
    pub username: String,
    pub token: String,
}

impl Account {
    pub fn new(server_url: &str, username: &str, token: &str) -> anyhow::Result<Self> {
        let server_url = Url::parse(server_url.trim())
            .with_context(|| format!("parse server url {server_url}"))?;
        Ok(Self {
            server_url,
            username: username.trim().to_string(),
            token: token.trim().to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.server_url.scheme(), "http" | "https") && !self.token.is_empty()
    }

    /// Web page for a repo: the server url's path with `/repo/<id>` appended.
    pub fn repo_web_url(&self, repo_id: &str) -> Url {
        self.join_path(&format!("repo/{repo_id}"))
    }

    pub fn api_url(&self, path: &str) -> Url {
        self.join_path(&format!("api2/{}", path.trim_start_matches('/')))
    }

    fn join_path(&self, suffix: &str) -> Url {
        let mut url = self.server_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}/{suffix}"));
        url
    }
}
