use anyhow::{Context, bail};
use std::path::Path;
use tracing::info;
use url::Url;

/// Hands paths and links to the desktop's default applications.
pub trait Opener {
    fn open_folder(&self, path: &Path) -> anyhow::Result<()>;
    fn open_url(&self, url: &Url) -> anyhow::Result<()>;
}

pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_folder(&self, path: &Path) -> anyhow::Result<()> {
        if !path.is_dir() {
            bail!("folder {} does not exist", path.display());
        }
        open::that(path).with_context(|| format!("open folder {}", path.display()))?;
        info!(path = %path.display(), "opened local folder");
        Ok(())
    }

    fn open_url(&self, url: &Url) -> anyhow::Result<()> {
        open::that(url.as_str()).with_context(|| format!("open {url}"))?;
        info!(%url, "opened web page");
        Ok(())
    }
}
