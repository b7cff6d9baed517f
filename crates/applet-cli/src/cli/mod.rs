use crate::desktop::SystemOpener;
use crate::logging::{self, LogBuffer, LogMode};
use crate::tui::{self, TuiContext};
use anyhow::{Context, bail};
use applet_core::account::Account;
use applet_core::client::{RpcClient, Service};
use applet_core::clone_task::CloneTask;
use applet_core::config::{AppConfig, default_config_path, default_download_dir};
use applet_core::model::LocalRepo;
use applet_server::RepoSource;
use applet_server::api::ServerApi;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

mod app;
mod args;
mod clone_cmd;
mod config_cmd;
mod repo_cmd;
mod shared;
#[cfg(test)]
mod tests;

use args::*;

use clone_cmd::handle_clone_tasks;
use config_cmd::{handle_account, handle_config};
use repo_cmd::{handle_auto_sync, handle_download, handle_repos};
use shared::{clone_task_line, connect_client, local_repo_line, resolve_daemon_dir};

pub fn run() -> anyhow::Result<()> {
    app::run()
}
